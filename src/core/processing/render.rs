use image::{Rgba, RgbaImage};
use ndarray::Array2;
use tracing::{debug, info};

use crate::core::grid::RasterGrid;
use crate::core::processing::classify::classify;
use crate::core::processing::palette::{Rgb, inferno, severity_color};
use crate::types::{SeverityClass, VisualKind};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

fn opaque(c: Rgb) -> Rgba<u8> {
    Rgba([c.r, c.g, c.b, 255])
}

/// Percentile `p` (0-100) of ascending `sorted` values with linear
/// interpolation between closest ranks. `None` for an empty slice.
pub fn percentile(sorted: &[f32], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] as f64 + (sorted[hi] as f64 - sorted[lo] as f64) * frac)
}

/// Linear value-to-[0,1] mapping with clipping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub vmin: f64,
    pub vmax: f64,
}

impl Normalize {
    pub fn apply(&self, v: f64) -> f64 {
        if self.vmax <= self.vmin {
            return 0.0;
        }
        ((v - self.vmin) / (self.vmax - self.vmin)).clamp(0.0, 1.0)
    }
}

fn sorted_values(data: &Array2<f32>, keep: impl Fn(f32) -> bool) -> Vec<f32> {
    let mut values: Vec<f32> = data.iter().copied().filter(|&v| keep(v)).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

fn image_from(data: &Array2<f32>, mut pixel: impl FnMut(f32) -> Rgba<u8>) -> RgbaImage {
    let (rows, cols) = data.dim();
    let mut img = RgbaImage::new(cols as u32, rows as u32);
    for ((r, c), &v) in data.indexed_iter() {
        img.put_pixel(c as u32, r as u32, pixel(v));
    }
    img
}

/// Class codes through the severity palette; background is transparent.
pub fn render_classes(classes: &Array2<u8>) -> RgbaImage {
    let (rows, cols) = classes.dim();
    let mut img = RgbaImage::new(cols as u32, rows as u32);
    for ((r, c), &code) in classes.indexed_iter() {
        let px = match SeverityClass::from_code(code) {
            Some(SeverityClass::Background) | None => TRANSPARENT,
            Some(class) => opaque(severity_color(class)),
        };
        img.put_pixel(c as u32, r as u32, px);
    }
    img
}

/// Range used to color burned cells: 2nd-99th percentile of the qualifying
/// values, widened by 0.01 when degenerate. `None` when nothing qualifies.
pub fn burn_normalization(delta: &RasterGrid, threshold: f32) -> Option<Normalize> {
    let burned = sorted_values(delta.data(), |d| d.is_finite() && d >= threshold);
    let vmin = percentile(&burned, 2.0)?;
    let mut vmax = percentile(&burned, 99.0)?;
    if vmin == vmax {
        vmax = vmin + 0.01;
    }
    Some(Normalize { vmin, vmax })
}

/// Cells at/above `threshold` colored by the inferno ramp, everything else
/// fully transparent.
pub fn render_burn_only(delta: &RasterGrid, threshold: f32) -> RgbaImage {
    let Some(norm) = burn_normalization(delta, threshold) else {
        info!("No cells at/above burn threshold {}; image fully transparent", threshold);
        let (rows, cols) = delta.shape();
        return RgbaImage::new(cols as u32, rows as u32);
    };
    debug!("Burn ramp normalization: {:?}", norm);
    image_from(delta.data(), |d| {
        if d.is_finite() && d >= threshold {
            opaque(inferno(norm.apply(d as f64)))
        } else {
            TRANSPARENT
        }
    })
}

/// Range for the contrast stretch: 2nd-98th percentile of finite values,
/// min..max if those coincide, 0..1 when nothing is finite.
pub fn stretch_normalization(delta: &RasterGrid) -> Normalize {
    let valid = sorted_values(delta.data(), f32::is_finite);
    match (percentile(&valid, 2.0), percentile(&valid, 98.0)) {
        (Some(lo), Some(hi)) if lo != hi => Normalize { vmin: lo, vmax: hi },
        (Some(_), Some(_)) => Normalize {
            vmin: valid[0] as f64,
            vmax: valid[valid.len() - 1] as f64,
        },
        _ => Normalize {
            vmin: 0.0,
            vmax: 1.0,
        },
    }
}

/// Every finite cell through the inferno ramp; missing cells transparent.
pub fn render_stretched(delta: &RasterGrid) -> RgbaImage {
    let norm = stretch_normalization(delta);
    debug!("Stretch normalization: {:?}", norm);
    image_from(delta.data(), |d| {
        if d.is_finite() {
            opaque(inferno(norm.apply(d as f64)))
        } else {
            TRANSPARENT
        }
    })
}

pub fn render_visual(delta: &RasterGrid, kind: VisualKind, burn_threshold: f32) -> RgbaImage {
    match kind {
        VisualKind::Classified => render_classes(&classify(delta)),
        VisualKind::BurnOnly => render_burn_only(delta, burn_threshold),
        VisualKind::Stretched => render_stretched(delta),
    }
}
