//! Core building blocks: georeferenced grids and CRS handling, parameters,
//! and the processing stages. These are internal primitives consumed by the
//! high-level `api` module.
pub mod crs;
pub mod grid;
pub mod params;
pub mod processing;
