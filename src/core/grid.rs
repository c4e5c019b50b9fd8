//! Georeferenced grid data model: affine `GeoTransform`, `GeoProfile`,
//! the immutable `RasterGrid` and WGS84 `GeoBounds`.
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Affine pixel-to-world transform.
///
/// `x = pixel_width * col + row_rotation * row + origin_x`
/// `y = column_rotation * col + pixel_height * row + origin_y`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub column_rotation: f64,
    pub pixel_height: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl GeoTransform {
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            pixel_width,
            row_rotation: 0.0,
            column_rotation: 0.0,
            pixel_height,
            origin_x,
            origin_y,
        }
    }

    /// Build from GDAL coefficient order `[origin_x, pixel_width, row_rot, origin_y, col_rot, pixel_height]`.
    pub fn from_gdal(gt: [f64; 6]) -> Self {
        Self {
            pixel_width: gt[1],
            row_rotation: gt[2],
            column_rotation: gt[4],
            pixel_height: gt[5],
            origin_x: gt[0],
            origin_y: gt[3],
        }
    }

    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.column_rotation,
            self.pixel_height,
        ]
    }

    /// GDAL's default transform for rasters without georeferencing.
    pub fn is_identity(&self) -> bool {
        self.to_gdal() == [0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
    }

    /// World coordinates of fractional pixel position (col, row), edge convention.
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.pixel_width * col + self.row_rotation * row + self.origin_x,
            self.column_rotation * col + self.pixel_height * row + self.origin_y,
        )
    }

    pub fn pixel_center(&self, col: usize, row: usize) -> (f64, f64) {
        self.apply(col as f64 + 0.5, row as f64 + 0.5)
    }

    fn determinant(&self) -> f64 {
        self.pixel_width * self.pixel_height - self.row_rotation * self.column_rotation
    }

    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();
        det.is_finite() && det != 0.0
    }

    /// Fractional pixel position (col, row) of a world coordinate, or `None`
    /// for a degenerate transform.
    pub fn world_to_pixel(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !self.is_invertible() {
            return None;
        }
        let det = self.determinant();
        let dx = x - self.origin_x;
        let dy = y - self.origin_y;
        let col = (self.pixel_height * dx - self.row_rotation * dy) / det;
        let row = (-self.column_rotation * dx + self.pixel_width * dy) / det;
        Some((col, row))
    }
}

/// Geospatial description of a single-band raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoProfile {
    pub transform: GeoTransform,
    /// CRS definition: `EPSG:XXXX` when an authority code is known, WKT otherwise.
    pub crs: String,
    pub width: usize,
    pub height: usize,
    pub nodata: Option<f64>,
}

impl GeoProfile {
    /// Array shape `(rows, cols)` this profile describes.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// New profile identical to this one apart from the nodata value.
    pub fn with_nodata(&self, nodata: Option<f64>) -> Self {
        Self {
            nodata,
            ..self.clone()
        }
    }

    /// Native-CRS extent `(min_x, min_y, max_x, max_y)` over the four grid corners.
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        let (w, h) = (self.width as f64, self.height as f64);
        let corners = [
            self.transform.apply(0.0, 0.0),
            self.transform.apply(w, 0.0),
            self.transform.apply(0.0, h),
            self.transform.apply(w, h),
        ];
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for (x, y) in corners {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        (min_x, min_y, max_x, max_y)
    }

    /// True when `value` is this profile's nodata sentinel.
    pub fn is_nodata(&self, value: f32) -> bool {
        match self.nodata {
            Some(nd) if nd.is_nan() => value.is_nan(),
            Some(nd) => value as f64 == nd,
            None => false,
        }
    }
}

/// A 2-D grid of `f32` samples plus the profile that places it on the ground.
///
/// The array shape always equals `(profile.height, profile.width)`. Grids are
/// never mutated after construction; stages produce new grids.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterGrid {
    data: Array2<f32>,
    profile: GeoProfile,
}

impl RasterGrid {
    pub fn new(data: Array2<f32>, profile: GeoProfile) -> Result<Self> {
        if data.dim() != profile.shape() {
            return Err(Error::ShapeMismatch {
                expected: profile.shape(),
                actual: data.dim(),
            });
        }
        Ok(Self { data, profile })
    }

    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    pub fn profile(&self) -> &GeoProfile {
        &self.profile
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn into_parts(self) -> (Array2<f32>, GeoProfile) {
        (self.data, self.profile)
    }

    /// Number of missing (non-finite) cells.
    pub fn missing_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_finite()).count()
    }
}

/// Geographic bounding box in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    /// `(min_lat, min_lon, max_lat, max_lon)`
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.min_lat, self.min_lon, self.max_lat, self.max_lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utm_profile(width: usize, height: usize) -> GeoProfile {
        GeoProfile {
            transform: GeoTransform::north_up(500_000.0, 4_600_000.0, 30.0, -30.0),
            crs: "EPSG:32618".to_string(),
            width,
            height,
            nodata: None,
        }
    }

    #[test]
    fn gdal_order_round_trips() {
        let gt = [500_000.0, 30.0, 0.5, 4_600_000.0, -0.25, -30.0];
        let t = GeoTransform::from_gdal(gt);
        assert_eq!(t.pixel_width, 30.0);
        assert_eq!(t.row_rotation, 0.5);
        assert_eq!(t.column_rotation, -0.25);
        assert_eq!(t.to_gdal(), gt);
    }

    #[test]
    fn world_to_pixel_inverts_apply() {
        let t = GeoTransform::from_gdal([100.0, 2.0, 0.3, 200.0, 0.1, -2.0]);
        let (x, y) = t.apply(7.25, 3.5);
        let (col, row) = t.world_to_pixel(x, y).unwrap();
        assert!((col - 7.25).abs() < 1e-9);
        assert!((row - 3.5).abs() < 1e-9);
    }

    #[test]
    fn degenerate_transform_has_no_inverse() {
        let t = GeoTransform::north_up(0.0, 0.0, 0.0, -30.0);
        assert!(t.world_to_pixel(1.0, 1.0).is_none());
    }

    #[test]
    fn extent_of_north_up_grid() {
        let p = utm_profile(4, 2);
        assert_eq!(p.extent(), (500_000.0, 4_599_940.0, 500_120.0, 4_600_000.0));
    }

    #[test]
    fn grid_rejects_wrong_shape() {
        let err = RasterGrid::new(Array2::zeros((3, 4)), utm_profile(4, 2)).unwrap_err();
        assert!(err.is_input_error());
        assert!(RasterGrid::new(Array2::zeros((2, 4)), utm_profile(4, 2)).is_ok());
    }

    #[test]
    fn nodata_matching() {
        let p = utm_profile(1, 1).with_nodata(Some(-9999.0));
        assert!(p.is_nodata(-9999.0));
        assert!(!p.is_nodata(0.0));
        assert!(!utm_profile(1, 1).is_nodata(-9999.0));
    }
}
