//! Recall evaluation over a dataset of video frames.
//!
//! This module provides the pieces around per-frame matching:
//!
//! - `load_labels` / `parse_label_line` - Read YOLO-style box files
//! - `ClassNameTable` - Resolve class ids to display names
//! - `DatasetWalker` - Enumerate videos and frame file pairs
//! - `RecallAccumulator` - Fold frame outcomes into per-class counters
//! - `evaluate_recall` - Run the whole pipeline and build a `RecallReport`

mod accumulator;
mod class_names;
mod dataset;
mod evaluation;
mod label_parser;
mod report;

pub use accumulator::{ClassStats, RecallAccumulator};
pub use class_names::ClassNameTable;
pub use dataset::{DatasetWalker, FramePair, Video, WalkMode};
pub use evaluation::{calculate_recall, evaluate_recall, EvalConfig, DEFAULT_IOU_THRESHOLD};
pub use label_parser::{load_labels, parse_label_line, parse_labels};
pub use report::{ClassRecall, RecallReport};
