//! Python bindings for detection-recall using PyO3.
//!
//! Exposes the dataset evaluation with the same call shape as the Python
//! evaluation script it replaces:
//!
//! ```python
//! from detection_recall import calculate_recall
//! overall, per_class = calculate_recall("comp/predictions", "comp/labels", iou_threshold=0.3)
//! ```

use std::path::PathBuf;

use pyo3::exceptions::{PyOSError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::metrics::{evaluate_recall, EvalConfig, DEFAULT_IOU_THRESHOLD};
use crate::{BoundingBox, Error, MatchStrategy};

fn to_py_err(err: Error) -> PyErr {
    match err {
        Error::IoError(e) => PyOSError::new_err(e.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

/// Compute overall and per-class recall for a dataset.
///
/// Args:
///     predictions_root: Directory with one prediction folder per video.
///     labels_root: Directory with one ground-truth folder per video.
///     iou_threshold: Minimum IoU for a match. Default: 0.3.
///     classes_path: Optional .json or .txt class names file.
///     strategy: "greedy" (default) or "optimal".
///
/// Returns:
///     Tuple of (overall_recall, {class_name: recall}) with classes in
///     ascending id order.
#[pyfunction]
#[pyo3(signature = (
    predictions_root,
    labels_root,
    iou_threshold=DEFAULT_IOU_THRESHOLD,
    classes_path=None,
    strategy="greedy"
))]
fn calculate_recall<'py>(
    py: Python<'py>,
    predictions_root: PathBuf,
    labels_root: PathBuf,
    iou_threshold: f64,
    classes_path: Option<PathBuf>,
    strategy: &str,
) -> PyResult<(f64, Bound<'py, PyDict>)> {
    let mut config = EvalConfig::new(labels_root, predictions_root);
    config.iou_threshold = iou_threshold;
    config.classes_path = classes_path;
    config.strategy = strategy.parse::<MatchStrategy>().map_err(to_py_err)?;

    let report = py
        .allow_threads(|| evaluate_recall(&config))
        .map_err(to_py_err)?;

    let per_class = PyDict::new_bound(py);
    for (name, recall) in report.per_class_recall() {
        per_class.set_item(name, recall)?;
    }
    Ok((report.overall_recall, per_class))
}

/// IoU of two `[x_center, y_center, width, height]` boxes.
#[pyfunction]
fn calculate_iou(box1: [f64; 4], box2: [f64; 4]) -> f64 {
    let a = BoundingBox::new(0, box1[0], box1[1], box1[2], box1[3]);
    let b = BoundingBox::new(0, box2[0], box2[1], box2[2], box2[3]);
    crate::iou(&a, &b)
}

/// Python module for detection-recall.
#[pymodule]
fn detection_recall(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(calculate_recall, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_iou, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
