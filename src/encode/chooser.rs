//! Palette index selection.
//!
//! Given a palette decoded from candidate endpoints, these functions pick the
//! palette entry for a pixel. All of them resolve ties in favor of the lower
//! index.

use crate::{Rgb24, Rgba32};

/// Per-channel weights of the RGB distance used by the 4-entry choosers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ChannelWeights {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}
impl ChannelWeights {
    /// Weights that roughly follow the sensitivity of the human eye.
    pub const PERCEPTUAL: Self = Self {
        r: 0.3,
        g: 0.6,
        b: 0.1,
    };
    pub const UNIFORM: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    #[inline(always)]
    fn distance(&self, a: Rgb24, b: Rgb24) -> f32 {
        let dr = (a.r as f32 - b.r as f32).abs();
        let dg = (a.g as f32 - b.g as f32).abs();
        let db = (a.b as f32 - b.b as f32).abs();
        dr * self.r + dg * self.g + db * self.b
    }
}

/// Chooses among the entries of a 4-color BC1 palette
/// `[c0, c1, 2/3 c0 + 1/3 c1, 1/3 c0 + 2/3 c1]`.
///
/// The decision is made with comparisons only. It relies on the palette
/// being ordered along a line as `c0, c2, c3, c1`.
#[inline]
pub(crate) fn choose_4(palette: &[Rgb24; 4], color: Rgb24, weights: ChannelWeights) -> u8 {
    let d0 = weights.distance(palette[0], color);
    let d1 = weights.distance(palette[1], color);
    let d2 = weights.distance(palette[2], color);
    let d3 = weights.distance(palette[3], color);

    let b0 = (d0 > d3) as u8;
    let b1 = (d1 > d2) as u8;
    let b2 = (d0 > d2) as u8;
    let b3 = (d1 > d3) as u8;
    let b4 = (d2 > d3) as u8;

    let x0 = b1 & b2;
    let x1 = b0 & b3;
    let x2 = b0 & b4;

    x2 | ((x0 | x1) << 1)
}

/// Chooses among the entries of a 3-color BC1 palette
/// `[c0, c1, 1/2 c0 + 1/2 c1, transparent]`.
///
/// Pixels with an alpha below `alpha_cutoff` map to the transparent entry,
/// all other pixels to one of the first three.
#[inline]
pub(crate) fn choose_3_with_cutoff(
    palette: &[Rgb24; 4],
    color: Rgba32,
    weights: ChannelWeights,
    alpha_cutoff: u8,
) -> u8 {
    if color.a < alpha_cutoff {
        return 3;
    }

    let rgb = color.rgb();
    let d0 = weights.distance(palette[0], rgb);
    let d1 = weights.distance(palette[1], rgb);
    let d2 = weights.distance(palette[2], rgb);
    // index 3 decodes as transparent or black, depending on the format
    let d3 = f32::INFINITY;

    let b0 = (d0 > d2) as u8;
    let b1 = (d1 > d3) as u8;
    let b2 = (d0 > d3) as u8;
    let b3 = (d1 > d2) as u8;
    let nb3 = (d1 <= d2) as u8;
    let b4 = (d0 > d1) as u8;
    let b5 = (d2 > d3) as u8;

    (nb3 & b4) | (b2 & b5) | (((b0 & b3) | (b1 & b2)) << 1)
}

/// Chooses the palette entry with the smallest squared distance over all
/// `N` channels.
///
/// Returns the index and its squared error.
#[inline]
pub(crate) fn choose_nearest<const N: usize>(palette: &[[u8; N]], color: [u8; N]) -> (u8, u32) {
    let mut best_index = 0;
    let mut best_error = u32::MAX;
    for (i, entry) in palette.iter().enumerate() {
        let mut error = 0;
        for c in 0..N {
            let d = entry[c] as i32 - color[c] as i32;
            error += (d * d) as u32;
        }
        if error < best_error {
            best_error = error;
            best_index = i;
        }
    }
    (best_index as u8, best_error)
}
