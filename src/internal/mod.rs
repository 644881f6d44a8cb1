//! Internal numeric helpers backing the public matching API.
//!
//! - `iou`: pairwise IoU matrices over box slices
//! - `optimize`: linear sum assignment (Hungarian algorithm)

pub mod iou;
pub mod optimize;

pub use iou::*;
pub use optimize::*;
