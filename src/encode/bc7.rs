//! BC7 encoder.
//!
//! The driver picks a set of candidate (mode, partition, rotation, index
//! mode) combinations based on the block and the quality tier, encodes every
//! candidate and keeps the one with the lowest squared error. Each candidate
//! is encoded subset by subset: endpoints are seeded with the principal axis
//! of the subset's pixels, quantized to the mode's precision and refined with
//! the shared variation search.

use glam::Vec4;

use crate::{
    bcn_data::{get_partition, get_weights, interpolate},
    color::{expand, quantize},
    decode::bc7::{Bc7Fields, ModeInfo, PBits, MODES},
    Rgba32, Tile,
};

use super::{
    bcn_util::{self, diff_sq, variation_count, vec4_to_u8, ColorLine, SearchBudget},
    chooser::choose_nearest,
    Bc7Modes, CompressionQuality,
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Bc7Options {
    pub quality: CompressionQuality,
    /// The modes the encoder may use.
    pub modes: Bc7Modes,
}

/// Encodes a tile as a BC7 block.
pub(crate) fn compress_bc7_block(tile: &Tile, options: Bc7Options) -> [u8; 16] {
    compress(tile, options).0.pack()
}

/// Returns the fields of the best block found and its squared RGBA error.
fn compress(tile: &Tile, options: Bc7Options) -> (Bc7Fields, u32) {
    let stats = BlockStats::new(tile);

    // a block of a single color can be compressed exactly
    if options.modes.contains(Bc7Modes::MODE_5) {
        if let Some(color) = stats.single_color() {
            log::trace!("BC7 single color block {:?}", color);
            return (compress_single_color(color), 0);
        }
    }

    let pixels = tile.map(Rgba32::to_array);
    let budget = SearchBudget::bc7(options.quality);

    let candidates = get_candidates(&pixels, stats.opaque(), options);
    debug_assert!(!candidates.is_empty());

    let mut best = (Bc7Fields::default(), u32::MAX);
    for candidate in candidates {
        let (fields, error) = compress_candidate(&pixels, candidate, &budget);
        if error < best.1 {
            best = (fields, error);
            if error == 0 {
                break;
            }
        }
    }

    log::trace!(
        "BC7 mode {} partition {} rotation {} error {}",
        best.0.mode,
        best.0.partition,
        best.0.rotation,
        best.1
    );
    best
}

struct BlockStats {
    and: u32,
    or: u32,
}
impl BlockStats {
    fn new(tile: &Tile) -> Self {
        let mut and = u32::MAX;
        let mut or = 0;
        for pixel in tile {
            let u = u32::from_le_bytes(pixel.to_array());
            and &= u;
            or |= u;
        }
        Self { and, or }
    }

    fn single_color(&self) -> Option<Rgba32> {
        if self.and == self.or {
            Some(Rgba32::from_array(self.and.to_le_bytes()))
        } else {
            None
        }
    }

    /// Returns whether alpha is 255 everywhere.
    fn opaque(&self) -> bool {
        self.and >> 24 == 0xFF
    }
}

/// Encodes a single color with mode 5.
///
/// All pixels use color index 1 (weight 21) and every 8-bit channel value
/// can be reached exactly by interpolating two 7-bit endpoints with it.
/// Alpha is stored with 8 bits, so both alpha endpoints are simply the alpha
/// value.
fn compress_single_color(color: Rgba32) -> Bc7Fields {
    fn channel_endpoints(value: u8) -> (u8, u8) {
        let weight = get_weights(2)[1];
        let center = value as i16 / 2;
        let range = (center - 2).max(0)..=(center + 2).min(127);

        let mut best = (0, 0);
        let mut best_error = u32::MAX;
        for e0 in range.clone() {
            for e1 in range.clone() {
                let (e0, e1) = (e0 as u8, e1 as u8);
                let decoded = interpolate(expand(e0, 7), expand(e1, 7), weight);
                let error = diff_sq(decoded, value);
                if error < best_error {
                    best = (e0, e1);
                    best_error = error;
                }
            }
        }
        best
    }

    let [r, g, b, a] = color.to_array();
    let (r0, r1) = channel_endpoints(r);
    let (g0, g1) = channel_endpoints(g);
    let (b0, b1) = channel_endpoints(b);

    let mut fields = Bc7Fields {
        mode: 5,
        ..Default::default()
    };
    fields.endpoints[0] = [r0, g0, b0, a];
    fields.endpoints[1] = [r1, g1, b1, a];
    fields.indices = [1; 16];
    // the anchor index must not have its MSB set, but index 1 is fine
    fields
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    mode: u8,
    partition: u8,
    rotation: u8,
    index_mode: u8,
}

fn mode_flag(mode: u8) -> Bc7Modes {
    Bc7Modes::from_bits_truncate(1 << mode)
}

/// The modes to try for a block.
///
/// The candidates of a lower quality tier are always a subset of the
/// candidates of a higher tier.
fn select_modes(opaque: bool, options: Bc7Options) -> Vec<u8> {
    let allowed = |mode: &u8| options.modes.contains(mode_flag(*mode));

    let preferred: &[u8] = if opaque {
        &[0, 1, 2, 3, 6]
    } else {
        &[4, 5, 6, 7]
    };

    let mut modes: Vec<u8> = preferred.iter().copied().filter(allowed).collect();
    if modes.is_empty() {
        modes = (0..8).filter(allowed).collect();
    } else if opaque && options.quality == CompressionQuality::BestQuality {
        modes.extend([4, 5].iter().copied().filter(allowed));
        modes.sort_unstable();
    }

    if modes.is_empty() {
        // no modes at all were allowed
        modes.push(6);
    }
    modes
}

/// Returns the partitions to try, best first.
///
/// Partitions are ranked by the summed squared distance of each pixel to the
/// mean of its subset. Ties are broken by the partition id.
fn select_partitions(
    pixels: &[[u8; 4]; 16],
    mode: u8,
    info: &ModeInfo,
    quality: CompressionQuality,
) -> Vec<u8> {
    if info.subsets == 1 {
        return vec![0];
    }

    let count = 1_u16 << info.partition_bits;
    let mut ranked: Vec<(f32, u8)> = (0..count)
        .map(|id| {
            let id = id as u8;
            (partition_variance(pixels, info.subsets, id), id)
        })
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let keep = match quality {
        CompressionQuality::Fast => 1,
        CompressionQuality::Balanced if info.subsets == 2 => 8,
        CompressionQuality::Balanced => 4,
        CompressionQuality::BestQuality => ranked.len(),
    };
    ranked.truncate(keep);
    log::trace!("BC7 mode {} partitions {:?}", mode, ranked);

    ranked.into_iter().map(|(_, id)| id).collect()
}

fn partition_variance(pixels: &[[u8; 4]; 16], subsets: u8, id: u8) -> f32 {
    let partition = get_partition(subsets, id);

    let mut count = [0_u32; 3];
    let mut sum = [[0_u32; 4]; 3];
    let mut sum_sq = [[0_u32; 4]; 3];
    for (i, pixel) in pixels.iter().enumerate() {
        let subset = partition.subset(i);
        count[subset] += 1;
        for c in 0..4 {
            let v = pixel[c] as u32;
            sum[subset][c] += v;
            sum_sq[subset][c] += v * v;
        }
    }

    let mut variance = 0.0;
    for subset in 0..subsets as usize {
        if count[subset] == 0 {
            continue;
        }
        for c in 0..4 {
            let s = sum[subset][c] as f32;
            variance += sum_sq[subset][c] as f32 - s * s / count[subset] as f32;
        }
    }
    variance
}

/// Returns the `(rotation, index_mode)` pairs to try for a mode.
fn select_rotations(info: &ModeInfo, quality: CompressionQuality) -> Vec<(u8, u8)> {
    let rotations = if info.rotation_bits == 0 || quality == CompressionQuality::Fast {
        1
    } else {
        4
    };
    let index_modes = if info.index_mode_bits == 0 || quality != CompressionQuality::BestQuality {
        1
    } else {
        2
    };

    (0..rotations)
        .flat_map(|rotation| (0..index_modes).map(move |index_mode| (rotation, index_mode)))
        .collect()
}

fn get_candidates(pixels: &[[u8; 4]; 16], opaque: bool, options: Bc7Options) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for mode in select_modes(opaque, options) {
        let info = &MODES[mode as usize];
        let rotations = select_rotations(info, options.quality);
        for partition in select_partitions(pixels, mode, info, options.quality) {
            for &(rotation, index_mode) in &rotations {
                candidates.push(Candidate {
                    mode,
                    partition,
                    rotation,
                    index_mode,
                });
            }
        }
    }
    candidates
}

/// How the endpoints of one channel group are stored.
#[derive(Debug, Clone, Copy)]
struct EndpointFormat {
    /// Stored bits per channel without the p-bit
    bits: u8,
    p_bits: PBits,
    index_bits: u8,
}
impl EndpointFormat {
    fn max(self) -> u8 {
        ((1_u16 << self.bits) - 1) as u8
    }

    /// All p-bit assignments of the two endpoints of a subset.
    fn p_bit_choices(self) -> &'static [[u8; 2]] {
        match self.p_bits {
            PBits::None => &[[0, 0]],
            PBits::Shared => &[[0, 0], [1, 1]],
            PBits::Unique => &[[0, 0], [0, 1], [1, 0], [1, 1]],
        }
    }

    fn unquantize(self, stored: u8, p_bit: u8) -> u8 {
        match self.p_bits {
            PBits::None => expand(stored, self.bits),
            _ => expand(stored << 1 | p_bit, self.bits + 1),
        }
    }

    /// Returns the stored value that, together with the given p-bit, is
    /// closest to `value`.
    fn quantize(self, value: u8, p_bit: u8) -> u8 {
        if self.p_bits == PBits::None {
            return quantize(value, self.bits);
        }

        let q = quantize(value, self.bits + 1) >> 1;
        let mut best = q;
        for stored in q.saturating_sub(2)..=(q + 2).min(self.max()) {
            let error = diff_sq(self.unquantize(stored, p_bit), value);
            if error < diff_sq(self.unquantize(best, p_bit), value) {
                best = stored;
            }
        }
        best
    }
}

/// Quantized endpoints of one subset over `N` channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EndPoints<const N: usize> {
    stored: [[u8; N]; 2],
    p_bits: [u8; 2],
}
impl<const N: usize> EndPoints<N> {
    fn quantize(colors: [[u8; N]; 2], p_bits: [u8; 2], format: EndpointFormat) -> Self {
        let mut stored = [[0; N]; 2];
        for i in 0..2 {
            for c in 0..N {
                stored[i][c] = format.quantize(colors[i][c], p_bits[i]);
            }
        }
        Self { stored, p_bits }
    }

    fn swapped(self) -> Self {
        Self {
            stored: [self.stored[1], self.stored[0]],
            p_bits: [self.p_bits[1], self.p_bits[0]],
        }
    }

    fn color(&self, endpoint: usize, format: EndpointFormat) -> [u8; N] {
        self.stored[endpoint].map(|v| format.unquantize(v, self.p_bits[endpoint]))
    }

    /// Chooses the nearest palette entry for every pixel. Returns the indexes
    /// and the total squared error.
    fn evaluate(&self, pixels: &[[u8; N]], format: EndpointFormat) -> ([u8; 16], u32) {
        let e0 = self.color(0, format);
        let e1 = self.color(1, format);

        let weights = get_weights(format.index_bits);
        let mut palette = [[0_u8; N]; 16];
        for (entry, &w) in palette.iter_mut().zip(weights) {
            for c in 0..N {
                entry[c] = interpolate(e0[c], e1[c], w);
            }
        }
        let palette = &palette[..weights.len()];

        let mut indexes = [0; 16];
        let mut error = 0;
        for (&pixel, index) in pixels.iter().zip(indexes.iter_mut()) {
            let (i, e) = choose_nearest(palette, pixel);
            *index = i;
            error += e;
        }
        (indexes, error)
    }
}

struct SubsetResult<const N: usize> {
    endpoints: EndPoints<N>,
    /// The index of each pixel, in the order the pixels were given
    indexes: [u8; 16],
    error: u32,
}

fn select_channels<const N: usize>(pixel: [u8; 4]) -> [u8; N] {
    let mut out = [0; N];
    out.copy_from_slice(&pixel[..N]);
    out
}

fn initial_endpoints<const N: usize>(pixels: &[[u8; N]]) -> [[u8; N]; 2] {
    let mut buffer = [Vec4::ZERO; 16];
    for (point, pixel) in buffer.iter_mut().zip(pixels) {
        let mut v = [0.0; 4];
        for (x, &c) in v.iter_mut().zip(pixel) {
            *x = c as f32;
        }
        *point = Vec4::from_array(v);
    }
    let points = &buffer[..pixels.len()];

    let line = ColorLine::new(points);
    let (min, max) = line.extremes(points);
    [
        select_channels(vec4_to_u8(min)),
        select_channels(vec4_to_u8(max)),
    ]
}

/// Finds endpoints and indexes for the given pixels of one subset.
///
/// `anchor` is the position of the anchor pixel in `pixels`. The MSB of its
/// index is guaranteed to be 0.
fn compress_subset<const N: usize>(
    pixels: &[[u8; N]],
    format: EndpointFormat,
    budget: &SearchBudget,
    anchor: usize,
) -> SubsetResult<N> {
    debug_assert!(!pixels.is_empty() && pixels.len() <= 16);

    let colors = initial_endpoints(pixels);

    // pick the p-bits that work best for the initial endpoints
    let choices = format.p_bit_choices();
    let mut seed = EndPoints::quantize(colors, choices[0], format);
    let mut seed_error = seed.evaluate(pixels, format).1;
    for &p_bits in &choices[1..] {
        let candidate = EndPoints::quantize(colors, p_bits, format);
        let error = candidate.evaluate(pixels, format).1;
        if error < seed_error {
            seed = candidate;
            seed_error = error;
        }
    }

    let max = [format.max(); N];
    let (mut endpoints, _) = bcn_util::search(
        seed,
        budget,
        variation_count(N),
        |e: EndPoints<N>, i| {
            let (c0, c1) = bcn_util::variate(e.stored[0], e.stored[1], max, i);
            EndPoints {
                stored: [c0, c1],
                p_bits: e.p_bits,
            }
        },
        |e| e.evaluate(pixels, format).1 as f32,
    );

    let (mut indexes, error) = endpoints.evaluate(pixels, format);

    // The anchor index is stored without its MSB. Swapping the endpoints
    // mirrors the palette, which flips all index bits without changing the
    // error.
    let msb = 1 << (format.index_bits - 1);
    if indexes[anchor] & msb != 0 {
        endpoints = endpoints.swapped();
        indexes = endpoints.evaluate(pixels, format).0;
    }
    debug_assert!(indexes[anchor] & msb == 0);

    SubsetResult {
        endpoints,
        indexes,
        error,
    }
}

/// Writes the result of a subset into the block fields.
fn store_subset<const N: usize>(
    fields: &mut Bc7Fields,
    subset: usize,
    members: &[usize],
    result: &SubsetResult<N>,
) {
    for i in 0..2 {
        fields.endpoints[subset * 2 + i][..N].copy_from_slice(&result.endpoints.stored[i]);
        fields.p_bits[subset * 2 + i] = result.endpoints.p_bits[i];
    }
    for (&pixel, &index) in members.iter().zip(&result.indexes) {
        fields.indices[pixel] = index;
    }
}

/// Encodes the block with the given mode, partition, rotation and index
/// mode. Returns the fields and the squared RGBA error of the decoded block.
fn compress_candidate(
    pixels: &[[u8; 4]; 16],
    candidate: Candidate,
    budget: &SearchBudget,
) -> (Bc7Fields, u32) {
    let info = &MODES[candidate.mode as usize];

    let mut pixels = *pixels;
    if candidate.rotation > 0 {
        for pixel in pixels.iter_mut() {
            pixel.swap(3, candidate.rotation as usize - 1);
        }
    }

    let mut fields = Bc7Fields {
        mode: candidate.mode,
        partition: candidate.partition,
        rotation: candidate.rotation,
        index_mode: candidate.index_mode,
        ..Default::default()
    };

    if info.has_separate_alpha() {
        let (color_index_bits, alpha_index_bits) = if candidate.index_mode == 0 {
            (info.index_bits, info.index_bits_2)
        } else {
            (info.index_bits_2, info.index_bits)
        };
        let color_format = EndpointFormat {
            bits: info.color_bits,
            p_bits: PBits::None,
            index_bits: color_index_bits,
        };
        let alpha_format = EndpointFormat {
            bits: info.alpha_bits,
            p_bits: PBits::None,
            index_bits: alpha_index_bits,
        };

        let colors: [[u8; 3]; 16] = pixels.map(select_channels);
        let alphas: [[u8; 1]; 16] = pixels.map(|p| [p[3]]);
        let color = compress_subset(&colors, color_format, budget, 0);
        let alpha = compress_subset(&alphas, alpha_format, budget, 0);

        for i in 0..2 {
            fields.endpoints[i][..3].copy_from_slice(&color.endpoints.stored[i]);
            fields.endpoints[i][3] = alpha.endpoints.stored[i][0];
        }
        if candidate.index_mode == 0 {
            fields.indices = color.indexes;
            fields.indices_2 = alpha.indexes;
        } else {
            fields.indices = alpha.indexes;
            fields.indices_2 = color.indexes;
        }

        return (fields, color.error + alpha.error);
    }

    let format = EndpointFormat {
        bits: info.color_bits,
        p_bits: info.p_bits,
        index_bits: info.index_bits,
    };
    let partition = fields.partition();

    let mut error = 0;
    for subset in 0..info.subsets as usize {
        let mut members = [0_usize; 16];
        let mut count = 0;
        for pixel in partition.members(subset) {
            members[count] = pixel;
            count += 1;
        }
        let members = &members[..count];
        let anchor = members
            .iter()
            .position(|&pixel| pixel == partition.anchor(subset))
            .unwrap_or(0);

        if info.has_alpha() {
            let mut values = [[0_u8; 4]; 16];
            for (value, &pixel) in values.iter_mut().zip(members) {
                *value = pixels[pixel];
            }
            let result = compress_subset(&values[..count], format, budget, anchor);
            store_subset(&mut fields, subset, members, &result);
            error += result.error;
        } else {
            let mut values = [[0_u8; 3]; 16];
            for (value, &pixel) in values.iter_mut().zip(members) {
                *value = select_channels(pixels[pixel]);
                // alpha decodes as 255
                error += diff_sq(pixels[pixel][3], 255);
            }
            let result = compress_subset(&values[..count], format, budget, anchor);
            store_subset(&mut fields, subset, members, &result);
            error += result.error;
        }
    }

    (fields, error)
}
