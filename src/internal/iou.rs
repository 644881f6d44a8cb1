//! Pairwise IoU matrices.

use nalgebra::DMatrix;

use crate::bbox::{iou, BoundingBox};

/// Compute the IoU matrix between two box sets.
///
/// Entry `(i, j)` is the IoU of `boxes_a[i]` and `boxes_b[j]` when both
/// share a class, and `0.0` otherwise.
///
/// # Returns
/// Matrix of shape (n, m)
pub fn class_aware_iou_matrix(boxes_a: &[BoundingBox], boxes_b: &[BoundingBox]) -> DMatrix<f64> {
    let n = boxes_a.len();
    let m = boxes_b.len();

    if n == 0 || m == 0 {
        return DMatrix::zeros(n, m);
    }

    DMatrix::from_fn(n, m, |i, j| {
        let a = &boxes_a[i];
        let b = &boxes_b[j];
        if a.class_id == b.class_id {
            iou(a, b)
        } else {
            0.0
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_matrix_shape_empty() {
        let boxes = vec![BoundingBox::new(0, 0.5, 0.5, 0.2, 0.2)];
        let result = class_aware_iou_matrix(&boxes, &[]);
        assert_eq!(result.nrows(), 1);
        assert_eq!(result.ncols(), 0);
    }

    #[test]
    fn test_matrix_values() {
        let gts = vec![
            BoundingBox::new(0, 0.5, 0.5, 0.2, 0.2),
            BoundingBox::new(1, 0.5, 0.5, 0.2, 0.2),
        ];
        let preds = vec![
            BoundingBox::new(0, 0.5, 0.5, 0.2, 0.2),
            BoundingBox::new(1, 0.1, 0.1, 0.1, 0.1),
        ];
        let result = class_aware_iou_matrix(&gts, &preds);

        assert_relative_eq!(result[(0, 0)], 1.0, epsilon = 1e-12);
        // Different class, perfect geometry
        assert_eq!(result[(1, 0)], 0.0);
        assert_eq!(result[(0, 1)], 0.0);
        assert_eq!(result[(1, 1)], 0.0);
    }
}
