use ndarray::{Array2, Zip};
use tracing::info;

use crate::error::{Error, Result};

/// Bit positions in the pixel quality band that mark a pixel unusable.
pub const FILL_BIT: u16 = 0;
pub const DILATED_CLOUD_BIT: u16 = 1;
pub const CIRRUS_BIT: u16 = 2;
pub const CLOUD_BIT: u16 = 3;
pub const SHADOW_BIT: u16 = 4;
pub const SNOW_BIT: u16 = 5;

/// Union of the fill, dilated-cloud, cirrus, cloud, shadow and snow flags.
pub const UNUSABLE_FLAGS: u16 = (1 << FILL_BIT)
    | (1 << DILATED_CLOUD_BIT)
    | (1 << CIRRUS_BIT)
    | (1 << CLOUD_BIT)
    | (1 << SHADOW_BIT)
    | (1 << SNOW_BIT);

/// True if any of the six unusable-pixel flags is set in `code`.
#[inline]
pub fn is_unusable(code: u16) -> bool {
    code & UNUSABLE_FLAGS != 0
}

/// Decode a quality band into a boolean "unusable" mask of the same shape.
pub fn decode_quality_mask(qa: &Array2<u16>) -> Array2<bool> {
    let mask = qa.mapv(is_unusable);
    let unusable = mask.iter().filter(|&&m| m).count();
    info!(
        "Quality mask: {} of {} pixels unusable",
        unusable,
        mask.len()
    );
    mask
}

/// Logical OR of two masks that must already share a grid.
pub fn combine_masks(a: &Array2<bool>, b: &Array2<bool>) -> Result<Array2<bool>> {
    if a.dim() != b.dim() {
        return Err(Error::ShapeMismatch {
            expected: a.dim(),
            actual: b.dim(),
        });
    }
    let mut combined = Array2::from_elem(a.dim(), false);
    Zip::from(&mut combined)
        .and(a)
        .and(b)
        .for_each(|out, &x, &y| *out = x || y);
    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn every_flag_bit_marks_unusable() {
        for bit in [
            FILL_BIT,
            DILATED_CLOUD_BIT,
            CIRRUS_BIT,
            CLOUD_BIT,
            SHADOW_BIT,
            SNOW_BIT,
        ] {
            assert!(is_unusable(1 << bit), "bit {}", bit);
        }
        assert!(!is_unusable(0b000000));
    }

    #[test]
    fn decode_matches_bitwise_definition_for_all_codes() {
        for code in 0..=u16::MAX {
            let expected = (0..6).any(|bit| code & (1 << bit) != 0);
            assert_eq!(is_unusable(code), expected, "code {:#b}", code);
        }
    }

    #[test]
    fn higher_bits_alone_are_clear() {
        // Landsat clear (bit 6) and water (bit 7) flags, confidence pairs above
        assert!(!is_unusable(1 << 6));
        assert!(!is_unusable(1 << 7));
        assert!(!is_unusable(0b1010_1000_0100_0000));
        assert!(is_unusable(21824 | 1 << 3));
    }

    #[test]
    fn decode_grid() {
        let qa = array![[0u16, 1, 64], [8, 21824, 32]];
        let mask = decode_quality_mask(&qa);
        assert_eq!(mask, array![[false, true, false], [true, false, true]]);
    }

    #[test]
    fn combine_is_elementwise_or() {
        let a = array![[true, false], [false, false]];
        let b = array![[false, false], [true, false]];
        let c = combine_masks(&a, &b).unwrap();
        assert_eq!(c, array![[true, false], [true, false]]);
    }

    #[test]
    fn combine_rejects_mismatched_shapes() {
        let a = Array2::from_elem((2, 2), false);
        let b = Array2::from_elem((2, 3), false);
        assert!(combine_masks(&a, &b).unwrap_err().is_input_error());
    }
}
