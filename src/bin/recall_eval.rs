//! recall-eval - Dataset-wide detection recall
//!
//! Walks `<labels>/videoN/*.txt` and `<predictions>/videoN/*.txt`, matches
//! each frame's predicted boxes against its ground-truth boxes and prints
//! per-class and overall recall.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use detection_recall::metrics::{evaluate_recall, EvalConfig, WalkMode};
use detection_recall::MatchStrategy;

#[derive(Parser, Debug)]
#[command(
    name = "recall-eval",
    about = "Compute per-class and overall recall of detections against ground truth"
)]
struct Args {
    /// Root directory of ground-truth label folders (one per video)
    #[arg(long, env = "RECALL_LABELS", value_name = "DIR")]
    labels: Option<PathBuf>,

    /// Root directory of prediction label folders (one per video)
    #[arg(long, env = "RECALL_PREDICTIONS", value_name = "DIR")]
    predictions: Option<PathBuf>,

    /// Class names file (.json list/object or .txt, one name per line)
    #[arg(long, env = "RECALL_CLASSES", value_name = "PATH")]
    classes: Option<PathBuf>,

    /// Minimum IoU for a ground truth to count as detected [default: 0.3]
    #[arg(long, env = "RECALL_IOU_THRESHOLD", value_name = "IOU")]
    iou_threshold: Option<f64>,

    /// Matching strategy (greedy|optimal) [default: greedy]
    #[arg(long, value_name = "STRATEGY")]
    strategy: Option<MatchStrategy>,

    /// Frames to visit (union|predictions) [default: union]
    #[arg(long, value_name = "MODE")]
    walk_mode: Option<WalkMode>,

    /// Only sub-directories starting with this prefix are videos [default: video]
    #[arg(long, value_name = "PREFIX", conflicts_with = "all_dirs")]
    video_prefix: Option<String>,

    /// Treat every sub-directory as a video
    #[arg(long)]
    all_dirs: bool,

    /// JSON config file; explicit flags override its values
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output (per-frame logging)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<(EvalConfig, bool)> {
        let mut config = match &self.config {
            Some(path) => EvalConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => {
                let labels = self
                    .labels
                    .clone()
                    .ok_or_else(|| anyhow!("--labels is required without --config"))?;
                let predictions = self
                    .predictions
                    .clone()
                    .ok_or_else(|| anyhow!("--predictions is required without --config"))?;
                EvalConfig::new(labels, predictions)
            }
        };

        if let Some(labels) = self.labels {
            config.labels_root = labels;
        }
        if let Some(predictions) = self.predictions {
            config.predictions_root = predictions;
        }
        if let Some(classes) = self.classes {
            config.classes_path = Some(classes);
        }
        if let Some(iou_threshold) = self.iou_threshold {
            config.iou_threshold = iou_threshold;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(walk_mode) = self.walk_mode {
            config.walk_mode = walk_mode;
        }
        if self.all_dirs {
            config.video_prefix = None;
        } else if let Some(prefix) = self.video_prefix {
            config.video_prefix = Some(prefix);
        }

        Ok((config, self.json))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let (config, json) = args.into_config()?;
    let report = evaluate_recall(&config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}
