use gdal::raster::GdalType;
use gdal::spatial_ref::SpatialRef;
use gdal::{Dataset, errors::GdalError as GdalCrateError};
use ndarray::Array2;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::core::grid::{GeoProfile, GeoTransform, RasterGrid};
use crate::error::{Error, Result};

/// Errors encountered when using the GDAL reader
#[derive(Debug, Error)]
pub enum GdalError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] GdalCrateError),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Dimension mismatch: expected {0}x{1}, got {2}x{3}")]
    DimensionMismatch(usize, usize, usize, usize),
}

/// Compact identifier for a dataset projection: `EPSG:<code>` when the CRS
/// itself (the root node) carries an EPSG authority, otherwise the WKT as-is.
/// Authorities of nested nodes (datum, unit) never identify the CRS.
pub(crate) fn crs_identifier(wkt: &str) -> String {
    let wkt = wkt.trim();
    if wkt.is_empty() || wkt.starts_with("EPSG:") {
        return wkt.to_string();
    }
    let Ok(srs) = SpatialRef::from_wkt(wkt) else {
        return wkt.to_string();
    };
    match (srs.auth_name(), srs.auth_code()) {
        (Some(name), Ok(code)) if name.eq_ignore_ascii_case("EPSG") => format!("EPSG:{}", code),
        _ => wkt.to_string(),
    }
}

/// Reader for single-band georeferenced rasters via GDAL. The dataset is
/// closed when the reader is dropped.
pub struct GdalBandReader {
    pub dataset: Dataset,
    pub profile: GeoProfile,
}

impl GdalBandReader {
    /// Open a GDAL-supported raster (GeoTIFF, COG, ENVI, ...)
    pub fn open<P: AsRef<Path>>(path: P) -> std::result::Result<Self, GdalError> {
        let dataset = Dataset::open(path.as_ref())?;
        let (width, height) = dataset.raster_size();
        if dataset.raster_count() == 0 {
            return Err(GdalError::UnsupportedFormat("No raster bands found".into()));
        }
        let geotransform = match dataset.geo_transform() {
            Ok(gt) => gt,
            Err(_) => [0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        };
        let crs = crs_identifier(&dataset.projection());
        let nodata = dataset.rasterband(1)?.no_data_value();
        Ok(GdalBandReader {
            dataset,
            profile: GeoProfile {
                transform: GeoTransform::from_gdal(geotransform),
                crs,
                width,
                height,
                nodata,
            },
        })
    }

    /// Read the first band as an ndarray of shape (height, width)
    pub fn read_band<T: GdalType + Copy>(&self) -> std::result::Result<Array2<T>, GdalError> {
        let band = self.dataset.rasterband(1)?;
        let window = (self.profile.width, self.profile.height);
        let buf = band.read_as::<T>((0, 0), window, window, None)?;
        let data_vec = buf.data().to_vec();
        Array2::from_shape_vec(self.profile.shape(), data_vec).map_err(|_| {
            GdalError::DimensionMismatch(
                self.profile.width,
                self.profile.height,
                buf.shape().0,
                buf.shape().1,
            )
        })
    }
}

fn open_for_input(path: &Path) -> Result<GdalBandReader> {
    if !path.is_file() {
        return Err(Error::input(path, "file not found"));
    }
    GdalBandReader::open(path).map_err(|e| Error::input(path, e))
}

/// Load one single-band raster as 32-bit float samples plus its profile.
pub fn load_band(path: &Path) -> Result<RasterGrid> {
    let reader = open_for_input(path)?;
    let data = reader
        .read_band::<f32>()
        .map_err(|e| Error::input(path, e))?;
    info!(
        "Loaded band {:?}: {}x{} crs={} nodata={:?}",
        path, reader.profile.width, reader.profile.height, reader.profile.crs, reader.profile.nodata
    );
    RasterGrid::new(data, reader.profile.clone())
}

/// Load a bit-encoded quality band as raw integer codes.
pub fn load_quality_band(path: &Path) -> Result<(Array2<u16>, GeoProfile)> {
    let reader = open_for_input(path)?;
    let codes = reader
        .read_band::<u16>()
        .map_err(|e| Error::input(path, e))?;
    info!(
        "Loaded quality band {:?}: {}x{}",
        path, reader.profile.width, reader.profile.height
    );
    Ok((codes, reader.profile.clone()))
}
