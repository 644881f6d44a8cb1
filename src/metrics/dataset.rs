//! Dataset traversal: videos and their frame label files.
//!
//! Expected layout, mirrored under the ground-truth and prediction roots:
//!
//! ```text
//! <root>/
//!   video1/
//!     frame0000.txt
//!     frame0001.txt
//!   video2/
//!     ...
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Which frames of a video are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalkMode {
    /// Frames with a label file on either side.
    #[default]
    Union,
    /// Only frames that have a prediction file.
    Predictions,
}

impl fmt::Display for WalkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalkMode::Union => f.write_str("union"),
            WalkMode::Predictions => f.write_str("predictions"),
        }
    }
}

impl FromStr for WalkMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "union" => Ok(WalkMode::Union),
            "predictions" => Ok(WalkMode::Predictions),
            other => Err(Error::InvalidConfig(format!(
                "unknown walk mode '{}' (expected 'union' or 'predictions')",
                other
            ))),
        }
    }
}

/// Ground-truth and prediction label files for one frame.
///
/// Either path may point at a file that does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePair {
    /// Frame key (file stem).
    pub frame: String,
    pub ground_truth: PathBuf,
    pub prediction: PathBuf,
}

/// A video directory and its frames in ascending key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    pub name: String,
    pub frames: Vec<FramePair>,
}

/// Enumerates videos and frames under a ground-truth root and a prediction root.
///
/// Videos are visited in ascending name order and frames in ascending key
/// order, so runs are reproducible.
#[derive(Debug, Clone)]
pub struct DatasetWalker {
    labels_root: PathBuf,
    predictions_root: PathBuf,
    video_prefix: Option<String>,
    mode: WalkMode,
}

impl DatasetWalker {
    /// Create a walker accepting directories prefixed `video`, in union mode.
    pub fn new<P1: AsRef<Path>, P2: AsRef<Path>>(labels_root: P1, predictions_root: P2) -> Self {
        Self {
            labels_root: labels_root.as_ref().to_path_buf(),
            predictions_root: predictions_root.as_ref().to_path_buf(),
            video_prefix: Some("video".to_string()),
            mode: WalkMode::Union,
        }
    }

    /// Only directories starting with `prefix` are videos; `None` accepts all.
    pub fn with_video_prefix(mut self, prefix: Option<String>) -> Self {
        self.video_prefix = prefix;
        self
    }

    pub fn with_mode(mut self, mode: WalkMode) -> Self {
        self.mode = mode;
        self
    }

    /// List every video with its frames.
    ///
    /// Fails only when a root directory cannot be read. A video directory
    /// missing on one side contributes no files from that side.
    pub fn videos(&self) -> Result<Vec<Video>> {
        let mut names = self.video_names(&self.predictions_root)?;
        if self.mode == WalkMode::Union {
            names.extend(self.video_names(&self.labels_root)?);
        }

        Ok(names.into_iter().map(|name| self.video(name)).collect())
    }

    fn video(&self, name: String) -> Video {
        let label_dir = self.labels_root.join(&name);
        let pred_dir = self.predictions_root.join(&name);

        let pred_files = label_files(&pred_dir);
        let gt_files = label_files(&label_dir);

        let mut keys: BTreeSet<&String> = pred_files.keys().collect();
        if self.mode == WalkMode::Union {
            keys.extend(gt_files.keys());
        }

        let frames = keys
            .into_iter()
            .map(|key| FramePair {
                frame: key.clone(),
                ground_truth: gt_files
                    .get(key)
                    .cloned()
                    .unwrap_or_else(|| label_dir.join(format!("{}.txt", key))),
                prediction: pred_files
                    .get(key)
                    .cloned()
                    .unwrap_or_else(|| pred_dir.join(format!("{}.txt", key))),
            })
            .collect();

        Video { name, frames }
    }

    fn video_names(&self, root: &Path) -> Result<BTreeSet<String>> {
        let entries = fs::read_dir(root).map_err(|e| {
            Error::Dataset(format!("failed to read directory '{}': {}", root.display(), e))
        })?;

        let mut names = BTreeSet::new();
        for entry in entries.flatten() {
            if !entry.path().is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                log::warn!("skipping non UTF-8 directory name in {}", root.display());
                continue;
            };
            let accepted = self
                .video_prefix
                .as_deref()
                .map_or(true, |prefix| name.starts_with(prefix));
            if accepted {
                names.insert(name);
            }
        }
        Ok(names)
    }
}

/// Map of frame key to `.txt` file (extension matched case-insensitively).
fn label_files(dir: &Path) -> BTreeMap<String, PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("video directory {} not found", dir.display());
            return BTreeMap::new();
        }
        Err(e) => {
            log::warn!("failed to read video directory {}: {}", dir.display(), e);
            return BTreeMap::new();
        }
    };

    let mut files = BTreeMap::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_txt = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
        if !is_txt {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            files.insert(stem.to_string(), path.clone());
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn layout() -> (TempDir, PathBuf, PathBuf) {
        let dir = TempDir::new().unwrap();
        let labels = dir.path().join("labels");
        let preds = dir.path().join("predictions");

        touch(&labels, "video2/frame0001.txt");
        touch(&labels, "video1/frame0000.txt");
        touch(&labels, "video1/frame0002.txt");
        touch(&labels, "video3/frame0000.txt");
        touch(&preds, "video1/frame0001.TXT");
        touch(&preds, "video1/frame0000.txt");
        touch(&preds, "video1/notes.md");
        touch(&preds, "video2/frame0001.txt");
        touch(&preds, "clips/frame0000.txt");

        (dir, labels, preds)
    }

    fn frame_keys(video: &Video) -> Vec<&str> {
        video.frames.iter().map(|f| f.frame.as_str()).collect()
    }

    #[test]
    fn test_union_mode() {
        let (_dir, labels, preds) = layout();
        let videos = DatasetWalker::new(&labels, &preds).videos().unwrap();

        let names: Vec<&str> = videos.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["video1", "video2", "video3"]);
        assert_eq!(
            frame_keys(&videos[0]),
            vec!["frame0000", "frame0001", "frame0002"]
        );
        assert_eq!(frame_keys(&videos[2]), vec!["frame0000"]);

        // Prediction file discovered with its original extension
        assert_eq!(
            videos[0].frames[1].prediction,
            preds.join("video1").join("frame0001.TXT")
        );
        // Missing ground truth falls back to the expected location
        assert_eq!(
            videos[0].frames[1].ground_truth,
            labels.join("video1").join("frame0001.txt")
        );
    }

    #[test]
    fn test_predictions_mode() {
        let (_dir, labels, preds) = layout();
        let videos = DatasetWalker::new(&labels, &preds)
            .with_mode(WalkMode::Predictions)
            .videos()
            .unwrap();

        let names: Vec<&str> = videos.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["video1", "video2"]);
        assert_eq!(frame_keys(&videos[0]), vec!["frame0000", "frame0001"]);
    }

    #[test]
    fn test_no_prefix_accepts_all_directories() {
        let (_dir, labels, preds) = layout();
        let videos = DatasetWalker::new(&labels, &preds)
            .with_video_prefix(None)
            .with_mode(WalkMode::Predictions)
            .videos()
            .unwrap();

        let names: Vec<&str> = videos.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["clips", "video1", "video2"]);
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = TempDir::new().unwrap();
        let result = DatasetWalker::new(dir.path().join("labels"), dir.path().join("preds")).videos();
        assert!(matches!(result, Err(Error::Dataset(_))));
    }

    #[test]
    fn test_walk_mode_from_str() {
        assert_eq!("Union".parse::<WalkMode>().unwrap(), WalkMode::Union);
        assert_eq!("predictions".parse::<WalkMode>().unwrap(), WalkMode::Predictions);
        assert!("labels".parse::<WalkMode>().is_err());
    }
}
