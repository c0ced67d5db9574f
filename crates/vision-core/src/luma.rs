//! Fixed-point BT.601 luminance.
//!
//! Weights 0.299/0.587/0.114 are scaled by 2^16 (they sum to exactly 2^16),
//! so every result is bit-exact across platforms.

pub const LUMA_R: u32 = 19595;
pub const LUMA_G: u32 = 38470;
pub const LUMA_B: u32 = 7471;

const HALF: u32 = 1 << 15;

/// Luminance of an opaque 8-bit color.
#[inline]
pub fn luma8(r: u8, g: u8, b: u8) -> u8 {
    ((weighted(r as u32, g as u32, b as u32) + HALF) >> 16) as u8
}

/// Luminance of a non-premultiplied 8-bit color composited over black.
///
/// `a == 0` yields 0 and `a == 255` matches [`luma8`].
#[inline]
pub fn luma8_over_black(r: u8, g: u8, b: u8, a: u8) -> u8 {
    match a {
        0 => 0,
        0xff => luma8(r, g, b),
        _ => {
            let a = a as u32;
            ((weighted(r as u32, g as u32, b as u32) * a + HALF * 255) / ((1 << 16) * 255)) as u8
        }
    }
}

/// Luminance of 16-bit channels (`0..=0xffff`), reduced to 8 bits.
#[inline]
pub fn luma16(r: u32, g: u32, b: u32) -> u8 {
    ((weighted(r, g, b) + HALF) >> 24) as u8
}

/// Scale an 8-bit channel by coverage `a`, rounding to nearest.
#[inline]
pub fn scale_by_alpha(c: u8, a: u8) -> u8 {
    ((c as u32 * a as u32 + 127) / 255) as u8
}

#[inline]
fn weighted(r: u32, g: u32, b: u32) -> u32 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_unity() {
        assert_eq!(LUMA_R + LUMA_G + LUMA_B, 1 << 16);
    }

    #[test]
    fn opaque_reference_value() {
        assert_eq!(luma8(200, 100, 50), 124);
        assert_eq!(luma8(255, 255, 255), 255);
        assert_eq!(luma8(0, 0, 0), 0);
        assert_eq!(luma8(255, 0, 0), 76);
    }

    #[test]
    fn alpha_edges() {
        assert_eq!(luma8_over_black(200, 100, 50, 0), 0);
        assert_eq!(luma8_over_black(200, 100, 50, 255), 124);
        // (8139550 * 128 + 32768 * 255) / (65536 * 255)
        assert_eq!(luma8_over_black(200, 100, 50, 128), 62);
        assert_eq!(luma8_over_black(255, 255, 255, 254), 254);
    }

    #[test]
    fn sixteen_bit_matches_eight_bit_for_widened_input() {
        for v in [0u8, 1, 17, 128, 200, 254, 255] {
            let w = v as u32 * 0x101;
            assert_eq!(luma16(w, w, w), v, "gray {v}");
        }
        assert_eq!(luma16(0xffff, 0xffff, 0xffff), 255);
    }

    #[test]
    fn alpha_scaling_rounds() {
        assert_eq!(scale_by_alpha(200, 0), 0);
        assert_eq!(scale_by_alpha(200, 255), 200);
        assert_eq!(scale_by_alpha(255, 128), 128);
        assert_eq!(scale_by_alpha(100, 128), 50);
    }
}
