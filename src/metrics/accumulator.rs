//! Per-class TP/FN/FP accumulation across frames.

use std::collections::BTreeMap;

use serde::Serialize;

use super::report::{ClassRecall, RecallReport};
use super::ClassNameTable;
use crate::matching::{FrameMatch, MatchOutcome};

/// Running counters for one class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassStats {
    /// Ground truths matched to a prediction
    pub true_positives: usize,
    /// Ground truths left unmatched
    pub false_negatives: usize,
    /// Predictions no ground truth consumed
    pub false_positives: usize,
}

impl ClassStats {
    /// Number of ground-truth boxes observed (TP + FN).
    pub fn ground_truths(&self) -> usize {
        self.true_positives + self.false_negatives
    }

    /// TP / (TP + FN), or 0 without ground truth.
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.ground_truths())
    }

    /// TP / (TP + FP), or 0 without any matched or unmatched prediction.
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    fn add(&mut self, other: &ClassStats) {
        self.true_positives += other.true_positives;
        self.false_negatives += other.false_negatives;
        self.false_positives += other.false_positives;
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64
    } else {
        0.0
    }
}

/// Accumulator for recall statistics.
///
/// Frames are folded in one at a time and in any order; the totals do not
/// depend on the order. Accumulators built independently (for example one
/// per worker) can be combined with [`RecallAccumulator::merge`].
#[derive(Debug, Clone, Default)]
pub struct RecallAccumulator {
    classes: BTreeMap<u32, ClassStats>,
    num_frames: usize,
}

impl RecallAccumulator {
    /// Create a new accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one frame's ground-truth outcomes into the counters.
    ///
    /// Matched outcomes count as true positives and unmatched ones as false
    /// negatives, both under the ground truth's class.
    pub fn observe(&mut self, outcomes: &[MatchOutcome]) {
        for outcome in outcomes {
            let stats = self.classes.entry(outcome.class_id).or_default();
            if outcome.is_matched() {
                stats.true_positives += 1;
            } else {
                stats.false_negatives += 1;
            }
        }
        self.num_frames += 1;
    }

    /// Fold a full frame match, also counting unused predictions as false
    /// positives under the prediction's class.
    pub fn observe_frame(&mut self, frame: &FrameMatch) {
        self.observe(&frame.outcomes);
        for class_id in frame.unused_prediction_classes() {
            self.classes.entry(class_id).or_default().false_positives += 1;
        }
    }

    /// Add the counters of another accumulator into this one.
    pub fn merge(&mut self, other: RecallAccumulator) {
        for (class_id, stats) in &other.classes {
            self.classes.entry(*class_id).or_default().add(stats);
        }
        self.num_frames += other.num_frames;
    }

    /// Counters for one class, if it was ever observed.
    pub fn class_stats(&self, class_id: u32) -> Option<&ClassStats> {
        self.classes.get(&class_id)
    }

    /// Counters summed over all classes.
    pub fn totals(&self) -> ClassStats {
        let mut totals = ClassStats::default();
        for stats in self.classes.values() {
            totals.add(stats);
        }
        totals
    }

    /// Number of frames observed.
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Overall recall, 0 when no ground truth was observed.
    pub fn recall(&self) -> f64 {
        self.totals().recall()
    }

    /// Derive the recall report.
    ///
    /// Classes without any ground-truth box are left out of the per-class
    /// section; entries are sorted by ascending class id.
    pub fn finalize(&self, class_names: &ClassNameTable, iou_threshold: f64) -> RecallReport {
        let totals = self.totals();

        let per_class = self
            .classes
            .iter()
            .filter(|(_, stats)| stats.ground_truths() > 0)
            .map(|(&class_id, stats)| ClassRecall {
                class_id,
                name: class_names.name_for(class_id),
                true_positives: stats.true_positives,
                false_negatives: stats.false_negatives,
                false_positives: stats.false_positives,
                recall: stats.recall(),
                precision: stats.precision(),
            })
            .collect();

        RecallReport {
            iou_threshold,
            num_frames: self.num_frames,
            true_positives: totals.true_positives,
            false_negatives: totals.false_negatives,
            false_positives: totals.false_positives,
            overall_recall: totals.recall(),
            overall_precision: totals.precision(),
            per_class,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BoundingBox;
    use crate::matching::match_frame;
    use approx::assert_relative_eq;

    fn outcome(class_id: u32, matched: bool) -> MatchOutcome {
        MatchOutcome {
            ground_truth: 0,
            class_id,
            prediction: matched.then_some(0),
            iou: if matched { 1.0 } else { 0.0 },
        }
    }

    #[test]
    fn test_accumulator_empty() {
        let acc = RecallAccumulator::new();
        assert_eq!(acc.totals(), ClassStats::default());
        assert_eq!(acc.recall(), 0.0);

        let report = acc.finalize(&ClassNameTable::default(), 0.3);
        assert_eq!(report.overall_recall, 0.0);
        assert!(report.per_class.is_empty());
    }

    #[test]
    fn test_observe_counts_per_class() {
        let mut acc = RecallAccumulator::new();
        acc.observe(&[outcome(0, true), outcome(0, false), outcome(2, true)]);
        acc.observe(&[outcome(2, true)]);

        assert_eq!(acc.num_frames(), 2);
        assert_eq!(acc.class_stats(0).unwrap().true_positives, 1);
        assert_eq!(acc.class_stats(0).unwrap().false_negatives, 1);
        assert_eq!(acc.class_stats(2).unwrap().true_positives, 2);
        assert!(acc.class_stats(1).is_none());
        assert_relative_eq!(acc.recall(), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_frame_still_counted() {
        let mut acc = RecallAccumulator::new();
        acc.observe(&[]);
        assert_eq!(acc.num_frames(), 1);
        assert_eq!(acc.totals().ground_truths(), 0);
    }

    #[test]
    fn test_observe_frame_counts_false_positives() {
        let gts = vec![BoundingBox::new(0, 0.5, 0.5, 0.2, 0.2)];
        let preds = vec![
            BoundingBox::new(0, 0.5, 0.5, 0.2, 0.2),
            BoundingBox::new(0, 0.1, 0.1, 0.1, 0.1),
            BoundingBox::new(3, 0.8, 0.8, 0.1, 0.1),
        ];
        let mut acc = RecallAccumulator::new();
        acc.observe_frame(&match_frame(&gts, &preds, 0.3));

        let class0 = acc.class_stats(0).unwrap();
        assert_eq!(class0.true_positives, 1);
        assert_eq!(class0.false_positives, 1);
        assert_relative_eq!(class0.precision(), 0.5, epsilon = 1e-12);

        // Prediction-only class is tracked but never reported
        assert_eq!(acc.class_stats(3).unwrap().false_positives, 1);
        let report = acc.finalize(&ClassNameTable::default(), 0.3);
        assert_eq!(report.per_class.len(), 1);
        assert_eq!(report.per_class[0].class_id, 0);
        assert_eq!(report.false_positives, 2);
    }

    #[test]
    fn test_merge_matches_sequential() {
        let frames = vec![
            vec![outcome(0, true), outcome(1, false)],
            vec![outcome(1, true)],
            vec![outcome(0, false), outcome(0, false)],
        ];

        let mut sequential = RecallAccumulator::new();
        for f in &frames {
            sequential.observe(f);
        }

        let mut left = RecallAccumulator::new();
        left.observe(&frames[2]);
        let mut right = RecallAccumulator::new();
        right.observe(&frames[1]);
        right.observe(&frames[0]);
        left.merge(right);

        assert_eq!(left.totals(), sequential.totals());
        assert_eq!(left.num_frames(), sequential.num_frames());
        assert_eq!(left.class_stats(0), sequential.class_stats(0));
        assert_eq!(left.class_stats(1), sequential.class_stats(1));
    }

    #[test]
    fn test_finalize_orders_and_names_classes() {
        let mut acc = RecallAccumulator::new();
        acc.observe(&[outcome(5, true), outcome(1, false), outcome(1, true)]);

        let names = ClassNameTable::from_lines("person\ncar\n");
        let report = acc.finalize(&names, 0.5);

        assert_eq!(report.iou_threshold, 0.5);
        assert_eq!(report.per_class.len(), 2);
        assert_eq!(report.per_class[0].class_id, 1);
        assert_eq!(report.per_class[0].name, "car");
        assert_relative_eq!(report.per_class[0].recall, 0.5, epsilon = 1e-12);
        assert_eq!(report.per_class[1].class_id, 5);
        assert_eq!(report.per_class[1].name, "Class 5");
        assert_relative_eq!(report.per_class[1].recall, 1.0, epsilon = 1e-12);
        assert_eq!(report.true_positives + report.false_negatives, 3);
    }
}
