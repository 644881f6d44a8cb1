//! Dataset-wide recall evaluation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{load_labels, ClassNameTable, DatasetWalker, RecallAccumulator, RecallReport, WalkMode};
use crate::matching::{match_frame_with, MatchStrategy};
use crate::{Error, Result};

/// Default IoU threshold for a ground truth to count as detected.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.3;

fn default_iou_threshold() -> f64 {
    DEFAULT_IOU_THRESHOLD
}

fn default_video_prefix() -> Option<String> {
    Some("video".to_string())
}

/// Evaluation settings.
///
/// Can be built with [`EvalConfig::new`] and adjusted field by field, or
/// loaded from JSON where every field except the two roots is optional:
///
/// ```json
/// {
///   "labels_root": "data/comp/labels",
///   "predictions_root": "data/comp/predictions",
///   "iou_threshold": 0.5,
///   "classes_path": "data/class.json",
///   "strategy": "optimal"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvalConfig {
    /// Root holding one ground-truth directory per video
    pub labels_root: PathBuf,
    /// Root holding one prediction directory per video
    pub predictions_root: PathBuf,
    /// Minimum IoU for a match, in [0, 1]
    #[serde(default = "default_iou_threshold")]
    pub iou_threshold: f64,
    /// Optional `.json` or `.txt` class names file
    #[serde(default)]
    pub classes_path: Option<PathBuf>,
    /// Only directories with this prefix are videos (None = all)
    #[serde(default = "default_video_prefix")]
    pub video_prefix: Option<String>,
    #[serde(default)]
    pub strategy: MatchStrategy,
    #[serde(default)]
    pub walk_mode: WalkMode,
}

impl EvalConfig {
    /// Create a config with default settings.
    pub fn new<P1: AsRef<Path>, P2: AsRef<Path>>(labels_root: P1, predictions_root: P2) -> Self {
        Self {
            labels_root: labels_root.as_ref().to_path_buf(),
            predictions_root: predictions_root.as_ref().to_path_buf(),
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            classes_path: None,
            video_prefix: default_video_prefix(),
            strategy: MatchStrategy::default(),
            walk_mode: WalkMode::default(),
        }
    }

    /// Load a config from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let path = file_path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::IoError(std::io::Error::new(
                e.kind(),
                format!("failed to read config file '{}': {}", path.display(), e),
            ))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Check the threshold range and that both roots are directories.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(Error::InvalidConfig(format!(
                "iou_threshold must be in [0, 1], got {}",
                self.iou_threshold
            )));
        }
        for (label, root) in [
            ("labels_root", &self.labels_root),
            ("predictions_root", &self.predictions_root),
        ] {
            if !root.is_dir() {
                return Err(Error::InvalidConfig(format!(
                    "{} '{}' is not a directory",
                    label,
                    root.display()
                )));
            }
        }
        Ok(())
    }

    /// Load the class name table, degrading to an empty table on failure.
    pub fn class_names(&self) -> ClassNameTable {
        let Some(path) = &self.classes_path else {
            log::info!("no class names file configured, using numeric class labels");
            return ClassNameTable::default();
        };
        match ClassNameTable::load(path) {
            Ok(table) => {
                log::info!("loaded {} class names from {}", table.len(), path.display());
                table
            }
            Err(e) => {
                log::warn!("{}; using numeric class labels", e);
                ClassNameTable::default()
            }
        }
    }
}

/// Evaluate recall over every frame of every video.
///
/// Returns an error only for an invalid configuration or unreadable dataset
/// roots. Bad label lines, missing label files and a missing or invalid
/// class names file are logged and skipped.
pub fn evaluate_recall(config: &EvalConfig) -> Result<RecallReport> {
    config.validate()?;

    log::info!(
        "evaluating recall at IoU >= {} ({} matching, {} frames)",
        config.iou_threshold,
        config.strategy,
        config.walk_mode
    );

    let class_names = config.class_names();
    let videos = DatasetWalker::new(&config.labels_root, &config.predictions_root)
        .with_video_prefix(config.video_prefix.clone())
        .with_mode(config.walk_mode)
        .videos()?;

    if videos.is_empty() {
        log::warn!(
            "no video directories found under {}",
            config.predictions_root.display()
        );
    }

    let mut acc = RecallAccumulator::new();

    for video in &videos {
        let mut video_acc = RecallAccumulator::new();

        for frame in &video.frames {
            let ground_truths = load_labels(&frame.ground_truth);
            let predictions = load_labels(&frame.prediction);

            let result = match_frame_with(
                config.strategy,
                &ground_truths,
                &predictions,
                config.iou_threshold,
            );
            log::debug!(
                "{}/{}: gt={} pred={} tp={} fn={}",
                video.name,
                frame.frame,
                ground_truths.len(),
                predictions.len(),
                result.true_positives(),
                result.false_negatives()
            );
            video_acc.observe_frame(&result);
        }

        let totals = video_acc.totals();
        log::info!(
            "{}: {} frames, TP={}, FN={}, recall={:.4}",
            video.name,
            video_acc.num_frames(),
            totals.true_positives,
            totals.false_negatives,
            totals.recall()
        );
        acc.merge(video_acc);
    }

    let report = acc.finalize(&class_names, config.iou_threshold);
    log::info!(
        "evaluated {} frames: TP={}, FN={}, overall recall={:.4}",
        report.num_frames,
        report.true_positives,
        report.false_negatives,
        report.overall_recall
    );
    Ok(report)
}

/// Compute overall and per-class recall with default settings.
///
/// # Arguments
/// * `predictions_root` - Root of the prediction label directories
/// * `labels_root` - Root of the ground-truth label directories
/// * `iou_threshold` - IoU threshold (default: 0.3)
/// * `classes_path` - Optional class names file
///
/// # Returns
/// `(overall_recall, per_class_recall)` with classes by ascending id.
pub fn calculate_recall<P1: AsRef<Path>, P2: AsRef<Path>>(
    predictions_root: P1,
    labels_root: P2,
    iou_threshold: Option<f64>,
    classes_path: Option<&Path>,
) -> Result<(f64, Vec<(String, f64)>)> {
    let mut config = EvalConfig::new(labels_root, predictions_root);
    config.iou_threshold = iou_threshold.unwrap_or(DEFAULT_IOU_THRESHOLD);
    config.classes_path = classes_path.map(Path::to_path_buf);

    let report = evaluate_recall(&config)?;
    let per_class = report.per_class_recall();
    Ok((report.overall_recall, per_class))
}
