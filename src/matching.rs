//! Ground-truth-to-prediction matching for a single frame.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bbox::{iou, BoundingBox};
use crate::internal::{class_aware_iou_matrix, linear_sum_assignment};
use crate::{Error, Result};

/// How ground-truth boxes are paired with predictions inside a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Ground truths claim their best unused prediction in input order.
    #[default]
    Greedy,
    /// Maximum number of qualifying pairs, then maximum total IoU.
    Optimal,
}

impl MatchStrategy {
    /// Lowercase name, as accepted by `FromStr` and serde.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::Greedy => "greedy",
            MatchStrategy::Optimal => "optimal",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(MatchStrategy::Greedy),
            "optimal" | "hungarian" => Ok(MatchStrategy::Optimal),
            other => Err(Error::InvalidConfig(format!(
                "unknown match strategy '{}' (expected 'greedy' or 'optimal')",
                other
            ))),
        }
    }
}

/// Outcome for one ground-truth box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOutcome {
    /// Index of the ground-truth box in the frame's input order.
    pub ground_truth: usize,
    /// Class of the ground-truth box.
    pub class_id: u32,
    /// Index of the consumed prediction, `None` for a false negative.
    pub prediction: Option<usize>,
    /// IoU with the consumed prediction, 0.0 when unmatched.
    pub iou: f64,
}

impl MatchOutcome {
    /// Whether this ground truth is a true positive.
    pub fn is_matched(&self) -> bool {
        self.prediction.is_some()
    }
}

/// Result of matching one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameMatch {
    /// One outcome per ground truth, in input order.
    pub outcomes: Vec<MatchOutcome>,
    prediction_classes: Vec<u32>,
    prediction_used: Vec<bool>,
}

impl FrameMatch {
    /// Number of matched ground truths.
    pub fn true_positives(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_matched()).count()
    }

    /// Number of unmatched ground truths.
    pub fn false_negatives(&self) -> usize {
        self.outcomes.len() - self.true_positives()
    }

    /// Indices of predictions no ground truth consumed.
    pub fn unused_predictions(&self) -> Vec<usize> {
        self.prediction_used
            .iter()
            .enumerate()
            .filter(|(_, &used)| !used)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Classes of the unused predictions, one entry per prediction.
    pub fn unused_prediction_classes(&self) -> impl Iterator<Item = u32> + '_ {
        self.prediction_used
            .iter()
            .zip(&self.prediction_classes)
            .filter(|(&used, _)| !used)
            .map(|(_, &class_id)| class_id)
    }

    /// Number of predictions in the frame.
    pub fn num_predictions(&self) -> usize {
        self.prediction_used.len()
    }
}

/// Match a frame with the greedy, ground-truth-ordered strategy.
///
/// See [`match_frame_with`].
pub fn match_frame(
    ground_truths: &[BoundingBox],
    predictions: &[BoundingBox],
    iou_threshold: f64,
) -> FrameMatch {
    match_frame_with(MatchStrategy::Greedy, ground_truths, predictions, iou_threshold)
}

/// Match ground-truth boxes to predictions.
///
/// A pair qualifies when both boxes share a class and their IoU is at
/// least `iou_threshold`. Each prediction is consumed by at most one
/// ground truth. Predictions left over are not classified here; see
/// [`FrameMatch::unused_predictions`].
///
/// # Arguments
/// * `strategy` - Greedy (input-order dependent) or optimal assignment
/// * `ground_truths` - Ground-truth boxes, in the order they were read
/// * `predictions` - Predicted boxes
/// * `iou_threshold` - Minimum IoU for a match, in [0, 1]
///
/// # Returns
/// A [`FrameMatch`] with exactly one outcome per ground truth, in input order.
pub fn match_frame_with(
    strategy: MatchStrategy,
    ground_truths: &[BoundingBox],
    predictions: &[BoundingBox],
    iou_threshold: f64,
) -> FrameMatch {
    let prediction_classes: Vec<u32> = predictions.iter().map(|p| p.class_id).collect();

    if ground_truths.is_empty() {
        return FrameMatch {
            outcomes: Vec::new(),
            prediction_used: vec![false; predictions.len()],
            prediction_classes,
        };
    }

    let (outcomes, prediction_used) = match strategy {
        MatchStrategy::Greedy => greedy_assignment(ground_truths, predictions, iou_threshold),
        MatchStrategy::Optimal => optimal_assignment(ground_truths, predictions, iou_threshold),
    };

    FrameMatch {
        outcomes,
        prediction_classes,
        prediction_used,
    }
}

/// Each ground truth, in order, takes the unused same-class prediction with
/// the highest IoU. Ties keep the first prediction seen. Decisions are final.
fn greedy_assignment(
    ground_truths: &[BoundingBox],
    predictions: &[BoundingBox],
    iou_threshold: f64,
) -> (Vec<MatchOutcome>, Vec<bool>) {
    let mut used = vec![false; predictions.len()];
    let mut outcomes = Vec::with_capacity(ground_truths.len());

    for (gt_idx, gt) in ground_truths.iter().enumerate() {
        let mut best: Option<(usize, f64)> = None;

        for (pred_idx, pred) in predictions.iter().enumerate() {
            if used[pred_idx] || pred.class_id != gt.class_id {
                continue;
            }
            let overlap = iou(gt, pred);
            if best.map_or(true, |(_, best_iou)| overlap > best_iou) {
                best = Some((pred_idx, overlap));
            }
        }

        let outcome = match best {
            Some((pred_idx, overlap)) if overlap >= iou_threshold => {
                used[pred_idx] = true;
                MatchOutcome {
                    ground_truth: gt_idx,
                    class_id: gt.class_id,
                    prediction: Some(pred_idx),
                    iou: overlap,
                }
            }
            _ => MatchOutcome {
                ground_truth: gt_idx,
                class_id: gt.class_id,
                prediction: None,
                iou: 0.0,
            },
        };
        outcomes.push(outcome);
    }

    (outcomes, used)
}

/// Solve the assignment globally. Qualifying pairs cost `1 - IoU`, all other
/// pairs are forbidden, so the solver first maximizes the number of matches
/// and then the summed IoU.
fn optimal_assignment(
    ground_truths: &[BoundingBox],
    predictions: &[BoundingBox],
    iou_threshold: f64,
) -> (Vec<MatchOutcome>, Vec<bool>) {
    let iou_mat = class_aware_iou_matrix(ground_truths, predictions);

    let cost = iou_mat.map_with_location(|i, j, overlap| {
        let same_class = ground_truths[i].class_id == predictions[j].class_id;
        if same_class && overlap >= iou_threshold {
            1.0 - overlap
        } else {
            f64::INFINITY
        }
    });

    let result = linear_sum_assignment(&cost, f64::INFINITY);

    let mut used = vec![false; predictions.len()];
    let mut outcomes: Vec<MatchOutcome> = ground_truths
        .iter()
        .enumerate()
        .map(|(gt_idx, gt)| MatchOutcome {
            ground_truth: gt_idx,
            class_id: gt.class_id,
            prediction: None,
            iou: 0.0,
        })
        .collect();

    for a in result.assignments {
        used[a.col_idx] = true;
        outcomes[a.row_idx].prediction = Some(a.col_idx);
        outcomes[a.row_idx].iou = iou_mat[(a.row_idx, a.col_idx)];
    }

    (outcomes, used)
}
