//! # Detection Recall
//!
//! Evaluate object-detection recall by matching predicted bounding boxes
//! against ground-truth boxes, frame by frame, across a corpus of videos.
//!
//! ## Features
//!
//! - IoU on center-form normalized boxes
//! - Class-aware one-to-one matching per frame (greedy or optimal)
//! - Per-class and overall recall, with false positives tallied alongside
//! - YOLO-style label files and `.json`/`.txt` class name tables
//!
//! ## Example
//!
//! ```rust
//! use detection_recall::{match_frame, BoundingBox, RecallAccumulator};
//! use detection_recall::metrics::ClassNameTable;
//!
//! let gts = vec![BoundingBox::new(0, 0.5, 0.5, 0.2, 0.2)];
//! let preds = vec![BoundingBox::new(0, 0.5, 0.5, 0.2, 0.2)];
//!
//! let mut acc = RecallAccumulator::new();
//! acc.observe_frame(&match_frame(&gts, &preds, 0.3));
//!
//! let report = acc.finalize(&ClassNameTable::default(), 0.3);
//! assert_eq!(report.true_positives, 1);
//! assert_eq!(report.overall_recall, 1.0);
//! ```

// Numeric helpers (IoU matrices, linear sum assignment)
pub(crate) mod internal;

// Public modules
pub mod bbox;
pub mod matching;
pub mod metrics;

#[cfg(feature = "python")]
mod python;

// Re-exports for convenience
pub use bbox::{iou, BoundingBox};
pub use matching::{match_frame, match_frame_with, FrameMatch, MatchOutcome, MatchStrategy};
pub use metrics::{evaluate_recall, EvalConfig, RecallAccumulator, RecallReport};

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors that can occur while evaluating recall
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Invalid configuration: {0}")]
        InvalidConfig(String),

        #[error("Class names error: {0}")]
        ClassNames(String),

        #[error("Dataset error: {0}")]
        Dataset(String),

        #[error("JSON error: {0}")]
        Json(#[from] serde_json::Error),

        #[error("IO error: {0}")]
        IoError(#[from] std::io::Error),
    }

    /// Result type for recall evaluation
    pub type Result<T> = std::result::Result<T, Error>;
}
