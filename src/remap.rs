//! The linear rescale kernel.
//!
//! Every byte is remapped independently of its channel:
//! `v' = clamp((v - min) * 255 / (max - min), 0, 255)`, with the float
//! result truncated to an integer. Truncation (not rounding) is the defined
//! conversion; with bounds (10, 90) the scale is 3.1875 and 50 maps to 127.

use crate::histogram::Bounds;

/// Scale factor stretching `[min, max]` onto `[0, 255]`.
///
/// Only meaningful for non-degenerate bounds; callers check
/// `Bounds::is_degenerate` first.
#[inline]
pub(crate) fn division(bounds: Bounds) -> f32 {
    255.0 / bounds.span() as f32
}

/// Remap one byte.
#[inline]
pub(crate) fn remap_sample(value: u8, min: u8, division: f32) -> u8 {
    let scaled = ((value as i32 - min as i32) as f32 * division) as i32;
    scaled.clamp(0, 255) as u8
}

/// Remap a slice in place.
pub(crate) fn remap_slice(samples: &mut [u8], min: u8, division: f32) {
    for sample in samples {
        *sample = remap_sample(*sample, min, division);
    }
}
