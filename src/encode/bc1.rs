use crate::{
    bits,
    color::{blend, expand, Rgb565},
    decode::bc::{bc1_palette, is_four_color},
    Rgb24, Rgba32, Tile,
};

use super::bcn_util::{self, diff_sq, SearchBudget, VAR_PATTERN_COUNT};
use super::chooser::{choose_3_with_cutoff, choose_4, ChannelWeights};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Bc1Options {
    pub budget: SearchBudget,
    /// Pixels with an alpha below this value are encoded as transparent.
    /// `None` for formats without alpha.
    pub alpha_cutoff: Option<u8>,
    /// Setting this to `true` will disable the 3-color mode. This is required
    /// for BC2 and BC3, which always decode color blocks with 4 colors.
    pub no_default: bool,
}

/// A completely transparent BC1 block in 3-color mode.
///
/// Any endpoints with `c0 <= c1` work. Equal endpoints are avoided, since
/// some decoders don't handle `c0 == c1` correctly.
const TRANSPARENT_BLOCK: [u8; 8] = [0, 0, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];

/// Encodes the color of a tile as a BC1 block.
pub(crate) fn compress_bc1_block(tile: &Tile, options: Bc1Options) -> [u8; 8] {
    compress(tile, options).0
}

/// Returns the block and its squared RGB error over all pixels that aren't
/// encoded as transparent.
fn compress(tile: &Tile, options: Bc1Options) -> ([u8; 8], u32) {
    // BC2 and BC3 don't have a 3-color mode
    if options.no_default {
        return compress_p4(tile, options);
    }

    let cutoff = options.alpha_cutoff.unwrap_or(0);
    let transparent = tile.iter().filter(|p| p.a < cutoff).count();

    if transparent == 16 {
        return (TRANSPARENT_BLOCK, 0);
    }
    if transparent > 0 {
        return compress_p3_default(tile, options);
    }

    // We have a choice to make. So just try both and pick whichever is better
    let (p4, p4_error) = compress_p4(tile, options);
    let (p3, p3_error) = compress_p3_default(tile, options);
    if p4_error <= p3_error {
        (p4, p4_error)
    } else {
        (p3, p3_error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    P4,
    P3,
}

fn compress_p4(tile: &Tile, options: Bc1Options) -> ([u8; 8], u32) {
    // single-color optimization
    if let Some(color) = get_single_color(tile) {
        return compress_single_color_p4(tile, color, options);
    }

    let colors = tile.map(|p| [p.r, p.g, p.b]);
    let (min, max) = bcn_util::pca_endpoints_565(&colors);

    let seed = EndPoints::new_p4(max, min);
    let (best, _) = bcn_util::search(
        seed,
        &options.budget,
        VAR_PATTERN_COUNT,
        |e, i| {
            let (c0, c1) = bcn_util::variate_565(e.c0, e.c1, i);
            EndPoints::new_p4(c0, c1)
        },
        |e| e.evaluate(tile, Mode::P4, options).1 as f32,
    );

    let (indexes, error) = best.evaluate(tile, Mode::P4, options);
    (best.with_indexes(indexes), error)
}

fn compress_p3_default(tile: &Tile, options: Bc1Options) -> ([u8; 8], u32) {
    let cutoff = options.alpha_cutoff.unwrap_or(0);

    let mut buffer = [[0_u8; 3]; 16];
    let mut count = 0;
    for pixel in tile.iter().filter(|p| p.a >= cutoff) {
        buffer[count] = [pixel.r, pixel.g, pixel.b];
        count += 1;
    }
    let colors = &buffer[..count];
    if colors.is_empty() {
        return (TRANSPARENT_BLOCK, 0);
    }

    let (min, max) = bcn_util::pca_endpoints_565(colors);

    let seed = EndPoints::new_p3_default(min, max);
    let (best, _) = bcn_util::search(
        seed,
        &options.budget,
        VAR_PATTERN_COUNT,
        |e, i| {
            let (c0, c1) = bcn_util::variate_565(e.c0, e.c1, i);
            EndPoints::new_p3_default(c0, c1)
        },
        |e| e.evaluate(tile, Mode::P3, options).1 as f32,
    );

    let (indexes, error) = best.evaluate(tile, Mode::P3, options);
    (best.with_indexes(indexes), error)
}

fn get_single_color(tile: &Tile) -> Option<Rgb24> {
    let first = tile[0].rgb();
    if tile.iter().all(|p| p.rgb() == first) {
        Some(first)
    } else {
        None
    }
}

fn compress_single_color_p4(tile: &Tile, color: Rgb24, options: Bc1Options) -> ([u8; 8], u32) {
    let mut candidates = CandidateList::new(tile, options);

    // add baseline
    let nearest = Rgb565::from_rgb24(color);
    candidates.add_p4(nearest, nearest);

    // A 1/3 blend between two endpoints might approximate the color more
    // closely. The 2/3 blend is the same with swapped endpoints.
    let (c0, c1) = find_optimal_single_color_endpoints(color);
    candidates.add_p4(c0, c1);

    candidates.get_best()
}

/// Finds the 565 endpoints `(c0, c1)` for which the 1/3 blend
/// `blend(c0, c1, 1, 3)` is closest to `color`, independently per channel.
fn find_optimal_single_color_endpoints(color: Rgb24) -> (Rgb565, Rgb565) {
    fn optimal_channel(value: u8, bits: u8) -> (u8, u8) {
        let max = (1_u8 << bits) - 1;

        let mut best = (0, 0);
        let mut best_error = u32::MAX;
        for c0 in 0..=max {
            let e0 = expand(c0, bits);
            for c1 in 0..=max {
                let e1 = expand(c1, bits);
                let error = diff_sq(blend(e0, e1, 1, 3), value);
                if error < best_error {
                    best = (c0, c1);
                    best_error = error;
                }
            }
        }
        best
    }

    let r = optimal_channel(color.r, 5);
    let g = optimal_channel(color.g, 6);
    let b = optimal_channel(color.b, 5);

    (Rgb565::new(r.0, g.0, b.0), Rgb565::new(r.1, g.1, b.1))
}

struct CandidateList<'a> {
    tile: &'a Tile,
    options: Bc1Options,
    data: [u8; 8],
    error: u32,
}
impl<'a> CandidateList<'a> {
    fn new(tile: &'a Tile, options: Bc1Options) -> Self {
        Self {
            tile,
            options,
            data: [0; 8],
            error: u32::MAX,
        }
    }
    fn get_best(self) -> ([u8; 8], u32) {
        debug_assert!(self.error != u32::MAX);
        (self.data, self.error)
    }

    fn add_p4(&mut self, c0: Rgb565, c1: Rgb565) {
        let endpoints = EndPoints::new_p4(c0, c1);
        let (indexes, error) = endpoints.evaluate(self.tile, Mode::P4, self.options);

        if error < self.error {
            self.data = endpoints.with_indexes(indexes);
            self.error = error;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EndPoints {
    c0: Rgb565,
    c1: Rgb565,
}
impl EndPoints {
    /// Endpoints that select the 4-color mode, `c0 > c1`.
    fn new_p4(mut c0: Rgb565, mut c1: Rgb565) -> Self {
        let c0_u = c0.to_u16();
        let c1_u = c1.to_u16();
        #[allow(clippy::comparison_chain)]
        if c0_u < c1_u {
            std::mem::swap(&mut c0, &mut c1);
        } else if c0_u == c1_u {
            // change the b channel
            if c1.b == 0 {
                c0.b = 1;
            } else {
                c1.b -= 1;
            }
        }

        debug_assert!(is_four_color(c0, c1));
        Self { c0, c1 }
    }
    /// Endpoints that select the 3-color mode, `c0 < c1`.
    fn new_p3_default(mut c0: Rgb565, mut c1: Rgb565) -> Self {
        let c0_u = c0.to_u16();
        let c1_u = c1.to_u16();
        #[allow(clippy::comparison_chain)]
        if c0_u > c1_u {
            std::mem::swap(&mut c0, &mut c1);
        } else if c0_u == c1_u {
            // change the b channel
            if c1.b == 31 {
                c0.b -= 1;
            } else {
                c1.b += 1;
            }
        }

        debug_assert!(c0.to_u16() < c1.to_u16());
        Self { c0, c1 }
    }

    /// Chooses the index of every pixel and returns the indexes together with
    /// the squared RGB error of all non-transparent pixels.
    fn evaluate(&self, tile: &Tile, mode: Mode, options: Bc1Options) -> ([u8; 16], u32) {
        let palette = bc1_palette(self.c0, self.c1, mode == Mode::P4);
        let rgb = palette.map(Rgba32::rgb);
        let cutoff = options.alpha_cutoff.unwrap_or(0);

        let mut indexes = [0_u8; 16];
        let mut error = 0;
        for (pixel, index) in tile.iter().zip(indexes.iter_mut()) {
            *index = match mode {
                Mode::P4 => choose_4(&rgb, pixel.rgb(), ChannelWeights::PERCEPTUAL),
                Mode::P3 => choose_3_with_cutoff(&rgb, *pixel, ChannelWeights::UNIFORM, cutoff),
            };

            if pixel.a >= cutoff {
                let decoded = rgb[*index as usize];
                error += diff_sq(decoded.r, pixel.r)
                    + diff_sq(decoded.g, pixel.g)
                    + diff_sq(decoded.b, pixel.b);
            }
        }

        (indexes, error)
    }

    fn with_indexes(&self, indexes: [u8; 16]) -> [u8; 8] {
        let mut low = 0;
        let mut high = 0;
        bits::store(&mut low, &mut high, 0, 16, self.c0.to_u16() as u32);
        bits::store(&mut low, &mut high, 16, 16, self.c1.to_u16() as u32);
        for (i, &index) in indexes.iter().enumerate() {
            bits::store(&mut low, &mut high, 32 + 2 * i as u32, 2, index as u32);
        }
        low.to_le_bytes()
    }
}
