//! An internal module for casting byte buffers to pixels.
//!
//! This serves as a wrapper around `bytemuck` to provide panic safety. All
//! functions in this module are guaranteed to be safe and **NEVER** panic.

use crate::Rgba32;

/// Casts a slice of RGBA bytes to pixels. Returns `None` if the length is
/// not a multiple of 4.
pub(crate) fn as_pixels(bytes: &[u8]) -> Option<&[Rgba32]> {
    bytemuck::try_cast_slice(bytes).ok()
}
