use ndarray::Array2;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::core::grid::{GeoProfile, RasterGrid};
use crate::core::processing::align::{align_grid, align_mask};
use crate::core::processing::index::{delta, normalized_difference};
use crate::core::processing::mask::{combine_masks, decode_quality_mask};
use crate::error::{Error, Result};
use crate::io::gdal::{load_band, load_quality_band};
use crate::types::Resampling;

/// Band files of one acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionPaths {
    pub nir: PathBuf,
    pub swir: PathBuf,
    pub qa: PathBuf,
}

/// One acquisition in memory: both bands and the decoded quality mask, all on
/// the NIR band's grid.
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub nir: RasterGrid,
    pub swir: RasterGrid,
    /// `true` where the quality band marks the pixel unusable
    pub mask: Array2<bool>,
}

impl Acquisition {
    pub fn new(nir: RasterGrid, swir: RasterGrid, mask: Array2<bool>) -> Result<Self> {
        let expected = nir.shape();
        for actual in [swir.shape(), mask.dim()] {
            if actual != expected {
                return Err(Error::ShapeMismatch { expected, actual });
            }
        }
        Ok(Self { nir, swir, mask })
    }

    pub fn profile(&self) -> &GeoProfile {
        self.nir.profile()
    }
}

/// Index grids for both dates and their difference, on the pre NIR grid.
#[derive(Debug, Clone)]
pub struct BurnProducts {
    pub index_pre: RasterGrid,
    pub index_post: RasterGrid,
    pub delta: RasterGrid,
}

/// Load NIR, SWIR and QA for one acquisition and decode the quality mask.
pub fn load_acquisition(paths: &AcquisitionPaths) -> Result<Acquisition> {
    let nir = load_band(&paths.nir)?;
    let swir = load_band(&paths.swir)?;
    if swir.shape() != nir.shape() {
        return Err(Error::input(
            &paths.swir,
            format!("shape {:?} differs from NIR {:?}", swir.shape(), nir.shape()),
        ));
    }
    let (codes, _) = load_quality_band(&paths.qa)?;
    if codes.dim() != nir.shape() {
        return Err(Error::input(
            &paths.qa,
            format!("shape {:?} differs from NIR {:?}", codes.dim(), nir.shape()),
        ));
    }
    let mask = decode_quality_mask(&codes);
    Acquisition::new(nir, swir, mask)
}

fn same_grid(a: &GeoProfile, b: &GeoProfile) -> bool {
    a.shape() == b.shape() && a.transform == b.transform && a.crs == b.crs
}

fn onto_reference(band: &RasterGrid, reference: &GeoProfile) -> Result<RasterGrid> {
    if same_grid(band.profile(), reference) {
        debug!("Band already on reference grid, skipping resampling");
        return Ok(band.clone());
    }
    align_grid(band, reference, Resampling::Bilinear)
}

/// Run the change pipeline on in-memory acquisitions.
///
/// The pre NIR grid is the reference: post bands are resampled onto it
/// (bilinear) and the post mask with nearest-neighbour. Both indices use the
/// union of the two masks, so a pixel unusable on either date is missing in
/// both.
pub fn process_grids(pre: &Acquisition, post: &Acquisition) -> Result<BurnProducts> {
    let reference = pre.profile().clone();

    let post_mask = if same_grid(post.profile(), &reference) {
        post.mask.clone()
    } else {
        align_mask(&post.mask, post.profile(), &reference)?
    };
    let mask = combine_masks(&pre.mask, &post_mask)?;

    let pre_swir = onto_reference(&pre.swir, &reference)?;
    let post_nir = onto_reference(&post.nir, &reference)?;
    let post_swir = onto_reference(&post.swir, &reference)?;

    let index_pre = normalized_difference(&pre.nir, &pre_swir, Some(&mask))?;
    let index_post = normalized_difference(&post_nir, &post_swir, Some(&mask))?;
    let delta = delta(&index_pre, &index_post)?;
    info!(
        "Delta computed on {}x{} grid, {} missing cells",
        reference.width,
        reference.height,
        delta.missing_count()
    );
    Ok(BurnProducts {
        index_pre,
        index_post,
        delta,
    })
}

/// Load both acquisitions from disk and run [`process_grids`].
pub fn process_acquisitions(
    pre: &AcquisitionPaths,
    post: &AcquisitionPaths,
) -> Result<BurnProducts> {
    info!("Loading pre-fire acquisition from {:?}", pre.nir);
    let pre = load_acquisition(pre)?;
    info!("Loading post-fire acquisition from {:?}", post.nir);
    let post = load_acquisition(post)?;
    process_grids(&pre, &post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::GeoTransform;
    use ndarray::array;

    fn profile(origin_x: f64) -> GeoProfile {
        GeoProfile {
            transform: GeoTransform::north_up(origin_x, 100.0, 10.0, -10.0),
            crs: "EPSG:32610".to_string(),
            width: 2,
            height: 2,
            nodata: None,
        }
    }

    fn acquisition(nir: Array2<f32>, swir: Array2<f32>, mask: Array2<bool>) -> Acquisition {
        let p = profile(0.0);
        Acquisition::new(
            RasterGrid::new(nir, p.clone()).unwrap(),
            RasterGrid::new(swir, p).unwrap(),
            mask,
        )
        .unwrap()
    }

    #[test]
    fn mask_from_either_date_removes_the_cell() {
        let pre = acquisition(
            array![[0.6, 0.6], [0.6, 0.6]],
            array![[0.2, 0.2], [0.2, 0.2]],
            array![[true, false], [false, false]],
        );
        let post = acquisition(
            array![[0.2, 0.2], [0.2, 0.2]],
            array![[0.6, 0.6], [0.6, 0.6]],
            array![[false, true], [false, false]],
        );
        let out = process_grids(&pre, &post).unwrap();
        let d = out.delta.data();
        assert!(d[[0, 0]].is_nan());
        assert!(d[[0, 1]].is_nan());
        assert!(out.index_post.data()[[0, 0]].is_nan());
        assert!((d[[1, 0]] - 1.0).abs() < 1e-6);
        assert!((d[[1, 1]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn identical_acquisitions_give_zero_change() {
        let a = acquisition(
            array![[0.5, 0.3], [0.1, 0.0]],
            array![[0.1, 0.3], [0.4, 0.0]],
            Array2::from_elem((2, 2), false),
        );
        let out = process_grids(&a, &a.clone()).unwrap();
        for (&d, &i) in out.delta.data().iter().zip(out.index_pre.data().iter()) {
            if i.is_finite() {
                assert_eq!(d, 0.0);
            } else {
                assert!(d.is_nan());
            }
        }
        assert!(out.delta.data()[[1, 1]].is_nan());
    }

    #[test]
    fn shifted_post_grid_is_resampled_onto_pre() {
        let pre = acquisition(
            Array2::from_elem((2, 2), 0.5),
            Array2::from_elem((2, 2), 0.5),
            Array2::from_elem((2, 2), false),
        );
        let p = profile(10.0);
        let post = Acquisition::new(
            RasterGrid::new(Array2::from_elem((2, 2), 0.5), p.clone()).unwrap(),
            RasterGrid::new(Array2::from_elem((2, 2), 0.5), p).unwrap(),
            Array2::from_elem((2, 2), false),
        )
        .unwrap();
        let out = process_grids(&pre, &post).unwrap();
        assert_eq!(out.delta.profile().transform, pre.profile().transform);
        // column 0 of the pre grid lies outside the post footprint
        assert!(out.delta.data()[[0, 0]].is_nan());
        assert!(out.delta.data()[[1, 0]].is_nan());
        assert_eq!(out.delta.data()[[0, 1]], 0.0);
    }

    #[test]
    fn mismatched_band_shapes_are_rejected() {
        let p = profile(0.0);
        let nir = RasterGrid::new(Array2::zeros((2, 2)), p.clone()).unwrap();
        let swir = RasterGrid::new(
            Array2::zeros((1, 2)),
            GeoProfile { height: 1, ..p },
        )
        .unwrap();
        let err = Acquisition::new(nir, swir, Array2::from_elem((2, 2), false)).unwrap_err();
        assert!(err.is_input_error());
    }
}
