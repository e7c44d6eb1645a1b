//! Unicode Private Use Area ranges.
//!
//! Exported documents often carry icon-font glyphs mapped into these ranges;
//! without the original font they render as boxes.

use std::ops::RangeInclusive;

/// Basic Multilingual Plane private use area.
pub const BMP_PRIVATE_USE: RangeInclusive<u32> = 0xE000..=0xF8FF;

/// Supplementary Private Use Area-A (plane 15).
pub const PLANE_15_PRIVATE_USE: RangeInclusive<u32> = 0xF0000..=0xFFFFD;

/// Supplementary Private Use Area-B (plane 16).
pub const PLANE_16_PRIVATE_USE: RangeInclusive<u32> = 0x100000..=0x10FFFD;

/// Whether `c` lies in one of the Private Use Areas.
pub fn is_private_use(c: char) -> bool {
    let cp = u32::from(c);
    BMP_PRIVATE_USE.contains(&cp)
        || PLANE_15_PRIVATE_USE.contains(&cp)
        || PLANE_16_PRIVATE_USE.contains(&cp)
}
