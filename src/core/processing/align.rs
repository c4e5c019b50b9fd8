use ndarray::Array2;
use tracing::{debug, info};

use crate::core::crs::CrsTransform;
use crate::core::grid::{GeoProfile, RasterGrid};
use crate::error::{Error, Result};
use crate::types::Resampling;

/// Fractional source pixel position (edge convention) of every target cell
/// center. NaN where the target cell could not be mapped.
struct PixelMap {
    cols: Array2<f64>,
    rows: Array2<f64>,
}

impl PixelMap {
    fn build(source: &GeoProfile, target: &GeoProfile) -> Result<Self> {
        if !source.transform.is_invertible() {
            return Err(Error::Alignment(format!(
                "source transform is not invertible: {:?}",
                source.transform
            )));
        }
        if !target.transform.is_invertible() {
            return Err(Error::Alignment(format!(
                "target transform is not invertible: {:?}",
                target.transform
            )));
        }
        let to_source = CrsTransform::between(&target.crs, &source.crs)?;
        debug!(
            "Pixel map {}x{} -> {}x{} ({:?})",
            target.width, target.height, source.width, source.height, to_source
        );

        let shape = target.shape();
        let mut cols = Array2::from_elem(shape, f64::NAN);
        let mut rows = Array2::from_elem(shape, f64::NAN);
        let mut xs = vec![0.0; target.width];
        let mut ys = vec![0.0; target.width];
        for r in 0..target.height {
            for c in 0..target.width {
                let (x, y) = target.transform.pixel_center(c, r);
                xs[c] = x;
                ys[c] = y;
            }
            to_source.transform_points(&mut xs, &mut ys)?;
            for c in 0..target.width {
                if let Some((sc, sr)) = source.transform.world_to_pixel(xs[c], ys[c]) {
                    cols[[r, c]] = sc;
                    rows[[r, c]] = sr;
                }
            }
        }
        Ok(Self { cols, rows })
    }

    fn shape(&self) -> (usize, usize) {
        self.cols.dim()
    }
}

/// Index of the source cell containing fractional position (col, row), if any.
#[inline]
fn containing_cell(col: f64, row: f64, width: usize, height: usize) -> Option<(usize, usize)> {
    if col >= 0.0 && row >= 0.0 && col < width as f64 && row < height as f64 {
        Some((row.floor() as usize, col.floor() as usize))
    } else {
        None
    }
}

/// Blend of the 4 source cells whose centers surround (col, row). Missing or
/// nodata neighbours drop out and the remaining weights are renormalised.
fn sample_bilinear(src: &Array2<f32>, profile: &GeoProfile, col: f64, row: f64) -> f32 {
    let (height, width) = src.dim();
    if containing_cell(col, row, width, height).is_none() {
        return f32::NAN;
    }
    // Shift to center convention
    let x = col - 0.5;
    let y = row - 0.5;
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as isize, y0 as isize);

    let mut acc = 0.0_f64;
    let mut weight_sum = 0.0_f64;
    for (dy, wy) in [(0, 1.0 - fy), (1, fy)] {
        for (dx, wx) in [(0, 1.0 - fx), (1, fx)] {
            let weight = wx * wy;
            if weight <= 0.0 {
                continue;
            }
            let r = (y0 + dy).clamp(0, height as isize - 1) as usize;
            let c = (x0 + dx).clamp(0, width as isize - 1) as usize;
            let v = src[[r, c]];
            if !v.is_finite() || profile.is_nodata(v) {
                continue;
            }
            acc += weight * v as f64;
            weight_sum += weight;
        }
    }
    if weight_sum > 0.0 {
        (acc / weight_sum) as f32
    } else {
        f32::NAN
    }
}

fn resample_nearest<T: Copy>(src: &Array2<T>, map: &PixelMap, fill: T) -> Array2<T> {
    let (height, width) = src.dim();
    let mut out = Array2::from_elem(map.shape(), fill);
    for ((r, c), cell) in out.indexed_iter_mut() {
        if let Some(idx) = containing_cell(map.cols[[r, c]], map.rows[[r, c]], width, height) {
            *cell = src[idx];
        }
    }
    out
}

/// Resample a continuous grid onto the target profile's exact grid and CRS.
///
/// Cells outside the source footprint, or with no valid source neighbour,
/// are missing (NaN). The result carries the target profile with no nodata
/// sentinel since missing cells are NaN.
pub fn align_grid(
    source: &RasterGrid,
    target: &GeoProfile,
    method: Resampling,
) -> Result<RasterGrid> {
    let src_profile = source.profile();
    info!(
        "Aligning {}x{} grid onto {}x{} target ({})",
        src_profile.width, src_profile.height, target.width, target.height, method
    );
    let map = PixelMap::build(src_profile, target)?;
    let data = match method {
        Resampling::Bilinear => {
            let mut out = Array2::from_elem(map.shape(), f32::NAN);
            for ((r, c), cell) in out.indexed_iter_mut() {
                *cell = sample_bilinear(source.data(), src_profile, map.cols[[r, c]], map.rows[[r, c]]);
            }
            out
        }
        Resampling::Nearest => resample_nearest(source.data(), &map, f32::NAN).mapv(|v| {
            if src_profile.is_nodata(v) { f32::NAN } else { v }
        }),
    };
    RasterGrid::new(data, target.with_nodata(None))
}

/// Resample a boolean mask onto the target grid with nearest-neighbour, so
/// the output stays strictly boolean. Target cells outside the source
/// footprint are marked unusable.
pub fn align_mask(
    mask: &Array2<bool>,
    source: &GeoProfile,
    target: &GeoProfile,
) -> Result<Array2<bool>> {
    if mask.dim() != source.shape() {
        return Err(Error::ShapeMismatch {
            expected: source.shape(),
            actual: mask.dim(),
        });
    }
    info!(
        "Aligning {}x{} mask onto {}x{} target (nearest)",
        source.width, source.height, target.width, target.height
    );
    let map = PixelMap::build(source, target)?;
    Ok(resample_nearest(mask, &map, true))
}
