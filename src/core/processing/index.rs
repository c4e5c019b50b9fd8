use ndarray::{Array2, Zip};
use tracing::info;

use crate::core::grid::RasterGrid;
use crate::error::{Error, Result};

fn ensure_same_shape(expected: (usize, usize), actual: (usize, usize)) -> Result<()> {
    if expected != actual {
        return Err(Error::ShapeMismatch { expected, actual });
    }
    Ok(())
}

/// Normalized difference `(nir - swir) / (nir + swir)` (NBR for NIR/SWIR2).
///
/// A cell is missing (NaN) where the denominator is zero, where either band
/// is missing or equal to its nodata sentinel, or where `mask` marks it
/// unusable. The result takes the NIR grid's profile without a sentinel.
pub fn normalized_difference(
    nir: &RasterGrid,
    swir: &RasterGrid,
    mask: Option<&Array2<bool>>,
) -> Result<RasterGrid> {
    let shape = nir.shape();
    ensure_same_shape(shape, swir.shape())?;
    if let Some(m) = mask {
        ensure_same_shape(shape, m.dim())?;
    }
    let (nir_profile, swir_profile) = (nir.profile(), swir.profile());

    let mut index = Array2::from_elem(shape, f32::NAN);
    Zip::from(&mut index)
        .and(nir.data())
        .and(swir.data())
        .for_each(|out, &a, &b| {
            if nir_profile.is_nodata(a) || swir_profile.is_nodata(b) {
                return;
            }
            let denom = a + b;
            if denom != 0.0 {
                *out = (a - b) / denom;
            }
        });
    if let Some(m) = mask {
        Zip::from(&mut index).and(m).for_each(|out, &unusable| {
            if unusable {
                *out = f32::NAN;
            }
        });
    }

    let grid = RasterGrid::new(index, nir_profile.with_nodata(None))?;
    info!(
        "Normalized difference: {} of {} cells missing",
        grid.missing_count(),
        shape.0 * shape.1
    );
    Ok(grid)
}

/// Change between two index grids: `pre - post`, missing wherever either is.
pub fn delta(pre: &RasterGrid, post: &RasterGrid) -> Result<RasterGrid> {
    ensure_same_shape(pre.shape(), post.shape())?;
    let mut out = Array2::from_elem(pre.shape(), f32::NAN);
    Zip::from(&mut out)
        .and(pre.data())
        .and(post.data())
        .for_each(|d, &a, &b| {
            if a.is_finite() && b.is_finite() {
                *d = a - b;
            }
        });
    let grid = RasterGrid::new(out, pre.profile().with_nodata(None))?;
    info!("Delta: {} cells missing", grid.missing_count());
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::{GeoProfile, GeoTransform};
    use ndarray::array;

    fn profile(width: usize, height: usize, nodata: Option<f64>) -> GeoProfile {
        GeoProfile {
            transform: GeoTransform::north_up(0.0, 0.0, 30.0, -30.0),
            crs: "EPSG:32618".to_string(),
            width,
            height,
            nodata,
        }
    }

    fn grid(data: Array2<f32>) -> RasterGrid {
        let (h, w) = data.dim();
        RasterGrid::new(data, profile(w, h, None)).unwrap()
    }

    #[test]
    fn equal_bands_give_zero() {
        let a = grid(array![[0.3, 1.0], [-2.0, 1e-4]]);
        let idx = normalized_difference(&a, &a, None).unwrap();
        assert!(idx.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zero_denominator_is_missing_not_an_error() {
        let nir = grid(array![[0.5, 0.0]]);
        let swir = grid(array![[-0.5, 0.0]]);
        let idx = normalized_difference(&nir, &swir, None).unwrap();
        assert!(idx.data()[[0, 0]].is_nan());
        assert!(idx.data()[[0, 1]].is_nan());
    }

    #[test]
    fn known_values() {
        let nir = grid(array![[0.4, 0.3]]);
        let swir = grid(array![[0.1, 0.3]]);
        let idx = normalized_difference(&nir, &swir, None).unwrap();
        assert!((idx.data()[[0, 0]] - 0.6).abs() < 1e-6);
        assert_eq!(idx.data()[[0, 1]], 0.0);
    }

    #[test]
    fn mask_forces_missing() {
        let nir = grid(array![[0.4, 0.4]]);
        let swir = grid(array![[0.1, 0.1]]);
        let mask = array![[false, true]];
        let idx = normalized_difference(&nir, &swir, Some(&mask)).unwrap();
        assert!(idx.data()[[0, 0]].is_finite());
        assert!(idx.data()[[0, 1]].is_nan());
    }

    #[test]
    fn nodata_cells_are_missing() {
        let nir = RasterGrid::new(array![[0.0, 0.5]], profile(2, 1, Some(0.0))).unwrap();
        let swir = grid(array![[0.2, 0.2]]);
        let idx = normalized_difference(&nir, &swir, None).unwrap();
        assert!(idx.data()[[0, 0]].is_nan());
        assert!(idx.data()[[0, 1]].is_finite());
        assert_eq!(idx.profile().nodata, None);
    }

    #[test]
    fn shape_mismatch_is_an_input_error() {
        let a = grid(Array2::zeros((2, 2)));
        let b = grid(Array2::zeros((2, 3)));
        assert!(normalized_difference(&a, &b, None).unwrap_err().is_input_error());
        let mask = Array2::from_elem((3, 3), false);
        assert!(normalized_difference(&a, &a, Some(&mask)).unwrap_err().is_input_error());
        assert!(delta(&a, &b).unwrap_err().is_input_error());
    }

    #[test]
    fn delta_of_identical_indices_is_zero() {
        let idx = grid(array![[0.2, -0.7], [f32::NAN, 0.9]]);
        let d = delta(&idx, &idx).unwrap();
        assert_eq!(d.data()[[0, 0]], 0.0);
        assert_eq!(d.data()[[0, 1]], 0.0);
        assert!(d.data()[[1, 0]].is_nan());
        assert_eq!(d.data()[[1, 1]], 0.0);
    }

    #[test]
    fn delta_propagates_missing_from_either_side() {
        let pre = grid(array![[0.5, f32::NAN, 0.5]]);
        let post = grid(array![[0.1, 0.1, f32::NAN]]);
        let d = delta(&pre, &post).unwrap();
        assert!((d.data()[[0, 0]] - 0.4).abs() < 1e-6);
        assert!(d.data()[[0, 1]].is_nan());
        assert!(d.data()[[0, 2]].is_nan());
    }
}
