#![allow(unused)]

use bcn_codec::*;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

pub const QUALITIES: [CompressionQuality; 3] = [
    CompressionQuality::Fast,
    CompressionQuality::Balanced,
    CompressionQuality::BestQuality,
];

pub fn create_rng() -> impl Rng {
    rand_chacha::ChaChaRng::seed_from_u64(123456789)
}

pub fn hash_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let bytes: [u8; 32] = result.into();

    let mut hex = String::new();
    for byte in bytes.iter() {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex
}

pub fn random_tile(rng: &mut impl Rng) -> Tile {
    let mut bytes = [0_u8; 64];
    rng.fill(&mut bytes[..]);
    std::array::from_fn(|i| {
        Rgba32::new(
            bytes[i * 4],
            bytes[i * 4 + 1],
            bytes[i * 4 + 2],
            bytes[i * 4 + 3],
        )
    })
}

pub fn random_opaque_tile(rng: &mut impl Rng) -> Tile {
    random_tile(rng).map(|p| Rgba32 { a: 255, ..p })
}

/// A smooth tile, more like the blocks of real images than random noise.
pub fn gradient_tile(rng: &mut impl Rng) -> Tile {
    let start: [u8; 4] = rng.gen();
    let dx: [i8; 4] = rng.gen();
    let dy: [i8; 4] = rng.gen();

    std::array::from_fn(|i| {
        let (x, y) = ((i % 4) as i32, (i / 4) as i32);
        let channel = |c: usize| {
            let v = start[c] as i32 + (dx[c] as i32 / 8) * x + (dy[c] as i32 / 8) * y;
            v.clamp(0, 255) as u8
        };
        Rgba32::new(channel(0), channel(1), channel(2), channel(3))
    })
}

/// Alternates between noise and gradient tiles.
pub fn random_tiles(rng: &mut impl Rng, count: usize) -> Vec<Tile> {
    (0..count)
        .map(|i| {
            if i % 2 == 0 {
                random_tile(rng)
            } else {
                gradient_tile(rng)
            }
        })
        .collect()
}

/// The sum of squared differences over the channels the format stores.
pub fn tile_error(format: Format, original: &Tile, decoded: &Tile) -> u64 {
    let channels = format.channels().count() as usize;
    original
        .iter()
        .zip(decoded)
        .map(|(a, b)| {
            let (a, b) = (a.to_array(), b.to_array());
            (0..channels)
                .map(|c| {
                    let d = a[c] as i64 - b[c] as i64;
                    (d * d) as u64
                })
                .sum::<u64>()
        })
        .sum()
}

pub fn options_with_quality(quality: CompressionQuality) -> EncodeOptions {
    let mut options = EncodeOptions::default();
    options.quality = quality;
    options
}

/// Encodes a single tile and decodes it again.
pub fn round_trip(tile: &Tile, format: Format, options: &EncodeOptions) -> Tile {
    let block = encode_block(tile, format, options);
    decode_block(format, block.as_bytes()).unwrap()
}
