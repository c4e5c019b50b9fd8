//! Artifact writers: float GeoTIFF with nodata sentinel, PNG/JPEG images,
//! world and projection sidecars, and dataset/JSON metadata.
pub mod jpeg;
pub mod metadata;
pub mod png;
pub mod tiff;
pub mod worldfile;
