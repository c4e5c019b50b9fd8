//! Coordinate reference system plumbing on top of GDAL/OSR: relating two CRS
//! definitions, batch point transforms, and WGS84 bounds of a profile.
use gdal::spatial_ref::{AxisMappingStrategy, CoordTransform, SpatialRef};
use tracing::debug;

use crate::core::grid::{GeoBounds, GeoProfile};
use crate::error::{Error, Result};

pub const WGS84: &str = "EPSG:4326";

fn normalized(def: &str) -> String {
    def.trim().to_ascii_uppercase()
}

fn spatial_ref(def: &str) -> Result<SpatialRef> {
    let mut srs = SpatialRef::from_definition(def)
        .map_err(|e| Error::Alignment(format!("cannot parse CRS `{}`: {}", def, e)))?;
    // Always x = easting/longitude, y = northing/latitude
    srs.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
    Ok(srs)
}

/// Maps world coordinates from one CRS into another.
pub enum CrsTransform {
    Identity,
    Gdal(CoordTransform),
}

impl std::fmt::Debug for CrsTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrsTransform::Identity => write!(f, "CrsTransform::Identity"),
            CrsTransform::Gdal(_) => write!(f, "CrsTransform::Gdal"),
        }
    }
}

impl CrsTransform {
    /// Transform from `source` CRS coordinates into `target` CRS coordinates.
    ///
    /// Two rasters without any CRS are treated as sharing one; a raster with a
    /// CRS cannot be related to one without.
    pub fn between(source: &str, target: &str) -> Result<Self> {
        let (src, dst) = (source.trim(), target.trim());
        match (src.is_empty(), dst.is_empty()) {
            (true, true) => return Ok(CrsTransform::Identity),
            (true, false) | (false, true) => {
                return Err(Error::Alignment(format!(
                    "cannot relate CRS `{}` to `{}`: one side has no CRS",
                    src, dst
                )));
            }
            (false, false) => {}
        }
        if normalized(src) == normalized(dst) {
            return Ok(CrsTransform::Identity);
        }
        let src_srs = spatial_ref(src)?;
        let dst_srs = spatial_ref(dst)?;
        if src_srs == dst_srs {
            debug!("CRS definitions differ textually but are equivalent");
            return Ok(CrsTransform::Identity);
        }
        let transform = CoordTransform::new(&src_srs, &dst_srs)
            .map_err(|e| Error::Alignment(format!("no transform from `{}` to `{}`: {}", src, dst, e)))?;
        Ok(CrsTransform::Gdal(transform))
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, CrsTransform::Identity)
    }

    /// Transform points in place. Points the transform cannot handle (e.g.
    /// outside the target projection's domain) become NaN; the others are
    /// still transformed.
    pub fn transform_points(&self, xs: &mut [f64], ys: &mut [f64]) -> Result<()> {
        let CrsTransform::Gdal(ct) = self else {
            return Ok(());
        };
        if xs.len() != ys.len() {
            return Err(Error::Alignment(format!(
                "coordinate arrays differ in length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        let (orig_xs, orig_ys) = (xs.to_vec(), ys.to_vec());
        let mut zs = vec![0.0; xs.len()];
        if ct.transform_coords(xs, ys, &mut zs).is_err() {
            // Batch call fails as a whole; redo point by point
            let mut failed = 0usize;
            for i in 0..xs.len() {
                let (mut x, mut y, mut z) = ([orig_xs[i]], [orig_ys[i]], [0.0]);
                if ct.transform_coords(&mut x, &mut y, &mut z).is_ok() {
                    xs[i] = x[0];
                    ys[i] = y[0];
                } else {
                    xs[i] = f64::NAN;
                    ys[i] = f64::NAN;
                    failed += 1;
                }
            }
            debug!("{} of {} points could not be transformed", failed, xs.len());
        }
        for (x, y) in xs.iter_mut().zip(ys.iter_mut()) {
            if !x.is_finite() || !y.is_finite() {
                *x = f64::NAN;
                *y = f64::NAN;
            }
        }
        Ok(())
    }
}

/// WGS84 bounds of a profile: native extent, then its two diagonal corners
/// reprojected to latitude/longitude.
pub fn latlon_bounds(profile: &GeoProfile) -> Result<GeoBounds> {
    let (min_x, min_y, max_x, max_y) = profile.extent();
    let transform = CrsTransform::between(&profile.crs, WGS84)?;
    let mut xs = [min_x, max_x];
    let mut ys = [min_y, max_y];
    transform.transform_points(&mut xs, &mut ys)?;
    if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
        return Err(Error::Alignment(format!(
            "extent of `{}` cannot be expressed in WGS84",
            profile.crs
        )));
    }
    let bounds = GeoBounds {
        min_lat: ys[0],
        min_lon: xs[0],
        max_lat: ys[1],
        max_lon: xs[1],
    };
    debug!("Lat/lon bounds: {:?}", bounds.as_tuple());
    Ok(bounds)
}
