//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, GDAL, image and JSON errors, and provides semantic
//! variants for unusable inputs and grids that cannot be aligned.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GDAL error: {0}")]
    Gdal(#[from] crate::io::GdalError),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required band file is missing, unreadable or not a raster container.
    #[error("Input error for {path}: {reason}")]
    Input { path: PathBuf, reason: String },

    #[error("Shape mismatch: expected {expected:?} (rows, cols), got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Source and target grids have no usable CRS/transform pairing.
    #[error("Alignment error: {0}")]
    Alignment(String),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("External error: {0}")]
    External(String),
}

impl Error {
    pub fn external<E: std::fmt::Display>(e: E) -> Self {
        Error::External(e.to_string())
    }

    pub(crate) fn input<P: Into<PathBuf>, R: std::fmt::Display>(path: P, reason: R) -> Self {
        Error::Input {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for the input-error family (bad files, incompatible shapes).
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::Input { .. } | Error::ShapeMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_input_and_shape_errors_are_input_errors() {
        assert!(Error::input("/data/B5.TIF", "missing").is_input_error());
        let shape = Error::ShapeMismatch {
            expected: (2, 2),
            actual: (3, 2),
        };
        assert!(shape.is_input_error());
        assert!(!Error::Alignment("no CRS".into()).is_input_error());
        assert!(!Error::external("encoder").is_input_error());
        assert_eq!(Error::external("encoder").to_string(), "External error: encoder");
    }
}
