//! USGS-style dNBR burn severity classification.
//!
//! Cut points are literal values from the standard severity table and are
//! compared in `f32`, the precision of the delta grid, so a delta stored as
//! e.g. `-0.251f32` lands exactly on its boundary.
use ndarray::Array2;
use tracing::info;

use crate::core::grid::RasterGrid;
use crate::types::SeverityClass;

/// Severity band for a single delta value. Non-finite values and values in
/// none of the ranges are `Background`.
pub fn classify_value(d: f32) -> SeverityClass {
    if !d.is_finite() {
        return SeverityClass::Background;
    }
    if (-0.500..=-0.251).contains(&d) {
        SeverityClass::EnhancedRegrowthHigh
    } else if (-0.250..=-0.101).contains(&d) {
        SeverityClass::EnhancedRegrowthLow
    } else if d > -0.100 && d <= 0.099 {
        SeverityClass::Unburned
    } else if (0.100..=0.269).contains(&d) {
        SeverityClass::LowSeverity
    } else if (0.270..=0.439).contains(&d) {
        SeverityClass::ModerateLowSeverity
    } else if (0.440..=0.659).contains(&d) {
        SeverityClass::ModerateHighSeverity
    } else if (0.660..=1.300).contains(&d) {
        SeverityClass::HighSeverity
    } else {
        SeverityClass::Background
    }
}

/// Class code (0-7) for every cell of a delta grid.
pub fn classify(delta: &RasterGrid) -> Array2<u8> {
    let classes = delta.data().mapv(|d| classify_value(d).code());
    let mut histogram = [0usize; 8];
    for &c in classes.iter() {
        histogram[c as usize] += 1;
    }
    info!("Severity class histogram (codes 0-7): {:?}", histogram);
    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use SeverityClass::*;

    #[test]
    fn table_boundaries() {
        assert_eq!(classify_value(-0.500), EnhancedRegrowthHigh);
        assert_eq!(classify_value(-0.251), EnhancedRegrowthHigh);
        assert_eq!(classify_value(-0.250), EnhancedRegrowthLow);
        assert_eq!(classify_value(-0.101), EnhancedRegrowthLow);
        assert_eq!(classify_value(0.099), Unburned);
        assert_eq!(classify_value(0.100), LowSeverity);
        assert_eq!(classify_value(0.269), LowSeverity);
        assert_eq!(classify_value(0.270), ModerateLowSeverity);
        assert_eq!(classify_value(0.439), ModerateLowSeverity);
        assert_eq!(classify_value(0.440), ModerateHighSeverity);
        assert_eq!(classify_value(0.659), ModerateHighSeverity);
        assert_eq!(classify_value(0.660), HighSeverity);
        assert_eq!(classify_value(1.300), HighSeverity);
    }

    #[test]
    fn interior_values() {
        assert_eq!(classify_value(-0.4), EnhancedRegrowthHigh);
        assert_eq!(classify_value(-0.2), EnhancedRegrowthLow);
        assert_eq!(classify_value(0.0), Unburned);
        assert_eq!(classify_value(0.2), LowSeverity);
        assert_eq!(classify_value(0.3), ModerateLowSeverity);
        assert_eq!(classify_value(0.5), ModerateHighSeverity);
        assert_eq!(classify_value(0.9), HighSeverity);
    }

    #[test]
    fn out_of_range_and_non_finite_are_background() {
        for d in [-0.5001, 1.3001, -3.0, 2.0, f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert_eq!(classify_value(d), Background, "{}", d);
        }
        // Gaps between literal cut points
        assert_eq!(classify_value(-0.1005), Background);
        assert_eq!(classify_value(-0.100), Background);
        assert_eq!(classify_value(0.0995), Background);
    }

    #[test]
    fn every_value_gets_exactly_one_code() {
        let mut d = -0.6_f32;
        while d <= 1.4 {
            let code = classify_value(d).code();
            assert!(code <= 7);
            if (-0.500..=-0.251).contains(&d) {
                assert_eq!(code, 1);
            }
            if (0.660..=1.300).contains(&d) {
                assert_eq!(code, 7);
            }
            d += 0.0005;
        }
    }

    #[test]
    fn classify_grid() {
        use crate::core::grid::{GeoProfile, GeoTransform};
        use ndarray::array;
        let profile = GeoProfile {
            transform: GeoTransform::north_up(0.0, 0.0, 1.0, -1.0),
            crs: "EPSG:4326".to_string(),
            width: 3,
            height: 1,
            nodata: None,
        };
        let delta = RasterGrid::new(array![[f32::NAN, 0.0, 0.7]], profile).unwrap();
        assert_eq!(classify(&delta), array![[0u8, 3, 7]]);
    }
}
