use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use gdal::{Dataset, DriverManager};
use ndarray::Array2;
use std::path::Path;

use crate::core::grid::{GeoProfile, RasterGrid};
use crate::error::Result;
use crate::io::gdal::{GdalError, load_band};

/// Sentinel stored in place of missing cells in the numeric artifact.
pub const DELTA_NODATA: f64 = -9999.0;

/// Everything needed to create an output raster: the reference profile with
/// explicit driver, band count and nodata overrides applied.
#[derive(Debug, Clone, PartialEq)]
pub struct TiffProfile {
    pub driver: &'static str,
    pub band_count: usize,
    pub profile: GeoProfile,
}

impl TiffProfile {
    /// Single-band float GeoTIFF on the reference grid with the `-9999` sentinel.
    pub fn delta_from(reference: &GeoProfile) -> Self {
        Self {
            driver: "GTiff",
            band_count: 1,
            profile: reference.with_nodata(Some(DELTA_NODATA)),
        }
    }

    pub fn nodata(&self) -> f64 {
        self.profile.nodata.unwrap_or(DELTA_NODATA)
    }
}

/// Write `data` as a float32 raster, substituting the nodata sentinel for
/// every non-finite cell. Returns the open dataset for further metadata.
pub fn write_tiff_f32(
    output: &Path,
    data: &Array2<f32>,
    out: &TiffProfile,
) -> std::result::Result<Dataset, GdalError> {
    let (rows, cols) = data.dim();
    if (rows, cols) != out.profile.shape() {
        return Err(GdalError::DimensionMismatch(
            out.profile.width,
            out.profile.height,
            cols,
            rows,
        ));
    }
    let nodata = out.nodata();
    let driver = DriverManager::get_driver_by_name(out.driver)?;
    let mut ds = driver.create_with_band_type::<f32, _>(output, cols, rows, out.band_count)?;
    if !out.profile.transform.is_identity() {
        ds.set_geo_transform(&out.profile.transform.to_gdal())?;
    }
    if !out.profile.crs.is_empty() {
        ds.set_spatial_ref(&SpatialRef::from_definition(&out.profile.crs)?)?;
    }

    let values: Vec<f32> = data
        .iter()
        .map(|&v| if v.is_finite() { v } else { nodata as f32 })
        .collect();
    let mut buf = Buffer::new((cols, rows), values);
    let mut band = ds.rasterband(1)?;
    band.set_no_data_value(Some(nodata))?;
    band.write((0, 0), (cols, rows), &mut buf)?;
    Ok(ds)
}

/// Read a numeric artifact back, restoring missing cells wherever the stored
/// value equals the file's nodata sentinel.
pub fn read_delta_tiff(path: &Path) -> Result<RasterGrid> {
    let (data, profile) = load_band(path)?.into_parts();
    let restored = data.mapv(|v| if profile.is_nodata(v) { f32::NAN } else { v });
    RasterGrid::new(restored, profile.with_nodata(None))
}
