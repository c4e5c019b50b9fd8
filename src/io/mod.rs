//! I/O layer for GDAL-backed rasters.
//! Provides the `gdal` band reader and `writers` for GeoTIFF/PNG/JPEG outputs,
//! world/projection sidecars and metadata embedding.
pub mod gdal;
pub use gdal::{GdalBandReader, GdalError, load_band, load_quality_band};

pub mod writers;
