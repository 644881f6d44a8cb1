//! Recall report produced at the end of an evaluation run.

use std::fmt;

use serde::Serialize;

/// Recall statistics for one class with at least one ground-truth box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRecall {
    pub class_id: u32,
    /// Display name, `Class <id>` when the class has no known name.
    pub name: String,
    pub true_positives: usize,
    pub false_negatives: usize,
    pub false_positives: usize,
    pub recall: f64,
    pub precision: f64,
}

/// Dataset-wide recall, overall and per class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecallReport {
    /// IoU threshold the run was evaluated at
    pub iou_threshold: f64,
    /// Number of frames folded into the report
    pub num_frames: usize,
    pub true_positives: usize,
    pub false_negatives: usize,
    pub false_positives: usize,
    /// TP / (TP + FN) over every class, 0 without ground truth
    pub overall_recall: f64,
    /// TP / (TP + FP) over every class, 0 without predictions
    pub overall_precision: f64,
    /// Classes sorted by ascending id
    pub per_class: Vec<ClassRecall>,
}

impl RecallReport {
    /// Per-class recall as `(name, recall)`, by ascending class id.
    pub fn per_class_recall(&self) -> Vec<(String, f64)> {
        self.per_class
            .iter()
            .map(|c| (c.name.clone(), c.recall))
            .collect()
    }

    /// Recall of one class, if it had ground truth.
    pub fn recall_for(&self, class_id: u32) -> Option<f64> {
        self.per_class
            .iter()
            .find(|c| c.class_id == class_id)
            .map(|c| c.recall)
    }
}

impl fmt::Display for RecallReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Frames evaluated: {}", self.num_frames)?;
        writeln!(f, "Total true positives (TP): {}", self.true_positives)?;
        writeln!(f, "Total false negatives (FN): {}", self.false_negatives)?;
        writeln!(
            f,
            "Overall recall @ IoU={:.2}: {:.4}",
            self.iou_threshold, self.overall_recall
        )?;
        writeln!(f)?;
        writeln!(f, "Per-class recall:")?;
        if self.per_class.is_empty() {
            writeln!(f, "  (no ground-truth boxes)")?;
        }
        for c in &self.per_class {
            writeln!(
                f,
                "  - {} (ID: {}): TP={}, FN={}, Recall={:.4}",
                c.name, c.class_id, c.true_positives, c.false_negatives, c.recall
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> RecallReport {
        RecallReport {
            iou_threshold: 0.3,
            num_frames: 4,
            true_positives: 3,
            false_negatives: 1,
            false_positives: 2,
            overall_recall: 0.75,
            overall_precision: 0.6,
            per_class: vec![
                ClassRecall {
                    class_id: 0,
                    name: "drone".to_string(),
                    true_positives: 1,
                    false_negatives: 1,
                    false_positives: 0,
                    recall: 0.5,
                    precision: 1.0,
                },
                ClassRecall {
                    class_id: 4,
                    name: "Class 4".to_string(),
                    true_positives: 2,
                    false_negatives: 0,
                    false_positives: 2,
                    recall: 1.0,
                    precision: 0.5,
                },
            ],
        }
    }

    #[test]
    fn test_display() {
        let text = sample_report().to_string();
        assert!(text.contains("Total true positives (TP): 3"));
        assert!(text.contains("Overall recall @ IoU=0.30: 0.7500"));
        assert!(text.contains("  - drone (ID: 0): TP=1, FN=1, Recall=0.5000"));
        assert!(text.contains("  - Class 4 (ID: 4): TP=2, FN=0, Recall=1.0000"));
    }

    #[test]
    fn test_per_class_lookup() {
        let report = sample_report();
        assert_eq!(
            report.per_class_recall(),
            vec![("drone".to_string(), 0.5), ("Class 4".to_string(), 1.0)]
        );
        assert_eq!(report.recall_for(4), Some(1.0));
        assert_eq!(report.recall_for(2), None);
    }

    #[test]
    fn test_serialize_json() {
        let value = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(value["true_positives"], 3);
        assert_eq!(value["per_class"][0]["name"], "drone");
        assert_eq!(value["per_class"][1]["class_id"], 4);
    }
}
