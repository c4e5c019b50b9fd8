use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::grid::RasterGrid;

/// Summary of valid and changed cells in a delta grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub valid_pixels: usize,
    pub changed_pixels: usize,
    /// `changed / valid * 100`; `None` (JSON `null`) when no cell is valid.
    pub percent_changed: Option<f64>,
}

/// Count finite cells and finite cells with `delta >= threshold`.
pub fn delta_statistics(delta: &RasterGrid, threshold: f32) -> Statistics {
    let mut valid_pixels = 0usize;
    let mut changed_pixels = 0usize;
    for &d in delta.data().iter() {
        if d.is_finite() {
            valid_pixels += 1;
            if d >= threshold {
                changed_pixels += 1;
            }
        }
    }
    let percent_changed = if valid_pixels > 0 {
        Some(changed_pixels as f64 * 100.0 / valid_pixels as f64)
    } else {
        None
    };
    info!(
        "Statistics (threshold {}): valid={}, changed={}, percent={:?}",
        threshold, valid_pixels, changed_pixels, percent_changed
    );
    Statistics {
        valid_pixels,
        changed_pixels,
        percent_changed,
    }
}
