//! Labeled bounding boxes and IoU geometry.

use serde::{Deserialize, Serialize};

/// A labeled box in center form, normalized coordinates.
///
/// Values are expected in [0, 1] but are not validated; only the relative
/// geometry of two boxes is ever used. A non-positive width or height
/// yields a box without positive area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Class index.
    pub class_id: u32,
    /// Horizontal center.
    pub x_center: f64,
    /// Vertical center.
    pub y_center: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

impl BoundingBox {
    /// Create a new box.
    pub fn new(class_id: u32, x_center: f64, y_center: f64, width: f64, height: f64) -> Self {
        Self {
            class_id,
            x_center,
            y_center,
            width,
            height,
        }
    }

    /// Area of the box (`width * height`, not clamped).
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Corner form `(x1, y1, x2, y2)`.
    pub fn corners(&self) -> (f64, f64, f64, f64) {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        (
            self.x_center - half_w,
            self.y_center - half_h,
            self.x_center + half_w,
            self.y_center + half_h,
        )
    }

    /// Geometry as `[x_center, y_center, width, height]`.
    pub fn xywh(&self) -> [f64; 4] {
        [self.x_center, self.y_center, self.width, self.height]
    }
}

/// Intersection over Union of two boxes, ignoring their classes.
///
/// The intersection is clamped to zero for disjoint boxes. Areas come from
/// the unclamped width and height, and a non-positive union gives 0 rather
/// than a division fault.
pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let (a_x1, a_y1, a_x2, a_y2) = a.corners();
    let (b_x1, b_y1, b_x2, b_y2) = b.corners();

    let inter_w = (a_x2.min(b_x2) - a_x1.max(b_x1)).max(0.0);
    let inter_h = (a_y2.min(b_y2) - a_y1.max(b_y1)).max(0.0);
    let inter_area = inter_w * inter_h;

    let union_area = a.area() + b.area() - inter_area;

    if union_area > 0.0 {
        inter_area / union_area
    } else {
        0.0
    }
}
