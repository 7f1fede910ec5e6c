//! Decoders for BC1-BC5 blocks.
//!
//! The palette functions in this module are also used by the encoders to
//! score candidate endpoints.

use crate::{
    bits,
    color::{blend, Rgb565},
    Rgb24, Rgba32, Tile,
};

/// Returns the 4-entry palette of a BC1 color block.
///
/// If `four_color` is false, the third entry is the midpoint of both
/// endpoints and the fourth is transparent black.
pub(crate) fn bc1_palette(color0: Rgb565, color1: Rgb565, four_color: bool) -> [Rgba32; 4] {
    let c0 = color0.to_rgb24();
    let c1 = color1.to_rgb24();

    if four_color {
        [
            c0.with_alpha(255),
            c1.with_alpha(255),
            c0.blend(c1, 1, 3).with_alpha(255),
            c0.blend(c1, 2, 3).with_alpha(255),
        ]
    } else {
        [
            c0.with_alpha(255),
            c1.with_alpha(255),
            c0.blend(c1, 1, 2).with_alpha(255),
            Rgba32::TRANSPARENT,
        ]
    }
}

/// Whether the endpoint order selects the 4-color mode of BC1.
#[inline]
pub(crate) fn is_four_color(color0: Rgb565, color1: Rgb565) -> bool {
    color0.to_u16() > color1.to_u16()
}

/// Decodes the 8-byte color part of a BC1-BC3 block.
///
/// BC2 and BC3 always use the 4-color mode, independent of the endpoint
/// order. If `opaque` is set, the transparent entry of the 3-color mode
/// decodes as opaque black.
fn decode_color(block: [u8; 8], force_four_color: bool, opaque: bool) -> Tile {
    let value = u64::from_le_bytes(block);
    let color0 = Rgb565::from_u16(bits::extract(value, 0, 0, 16) as u16);
    let color1 = Rgb565::from_u16(bits::extract(value, 0, 16, 16) as u16);

    let four_color = force_four_color || is_four_color(color0, color1);
    let mut palette = bc1_palette(color0, color1, four_color);
    if opaque {
        palette[3].a = 255;
    }

    let mut output = [Rgba32::TRANSPARENT; 16];
    for (i, pixel) in output.iter_mut().enumerate() {
        let index = bits::extract(value, 0, 32 + 2 * i as u32, 2);
        *pixel = palette[index as usize];
    }
    output
}

/// Returns the 8-entry palette of a BC4 block.
///
/// If `red0 > red1`, 6 values are interpolated between both endpoints.
/// Otherwise, only 4 values are interpolated and the last two entries are
/// 0 and 255.
pub(crate) fn bc4_palette(red0: u8, red1: u8) -> [u8; 8] {
    let mut palette = [0; 8];
    palette[0] = red0;
    palette[1] = red1;

    if red0 > red1 {
        for (k, entry) in palette.iter_mut().enumerate().skip(2) {
            *entry = blend(red0, red1, k as u32 - 1, 7);
        }
    } else {
        for (k, entry) in palette.iter_mut().enumerate().take(6).skip(2) {
            *entry = blend(red0, red1, k as u32 - 1, 5);
        }
        palette[6] = 0;
        palette[7] = 255;
    }

    palette
}

/// Decodes a single BC4 channel block into 16 values.
pub(crate) fn decode_bc4_channel(block: [u8; 8]) -> [u8; 16] {
    let value = u64::from_le_bytes(block);
    let palette = bc4_palette(block[0], block[1]);

    let mut output = [0; 16];
    for (i, v) in output.iter_mut().enumerate() {
        let index = bits::extract(value, 0, 16 + 3 * i as u32, 3);
        *v = palette[index as usize];
    }
    output
}

/// Decodes a BC2 alpha block, 16 4-bit values.
fn decode_bc2_alpha(block: [u8; 8]) -> [u8; 16] {
    let value = u64::from_le_bytes(block);

    let mut output = [0; 16];
    for (i, a) in output.iter_mut().enumerate() {
        let nibble = bits::extract(value, 0, 4 * i as u32, 4) as u8;
        *a = nibble * 17;
    }
    output
}

fn split_16(block: [u8; 16]) -> ([u8; 8], [u8; 8]) {
    let mut first = [0; 8];
    let mut second = [0; 8];
    first.copy_from_slice(&block[..8]);
    second.copy_from_slice(&block[8..]);
    (first, second)
}

/// Decodes a BC1 block with 1-bit alpha. The endpoint order selects the
/// mode.
pub(crate) fn decode_bc1_block(block: [u8; 8]) -> Tile {
    decode_color(block, false, false)
}

/// Decodes a BC1 block of a format without alpha. Index 3 of the 3-color
/// mode is black.
pub(crate) fn decode_bc1_opaque_block(block: [u8; 8]) -> Tile {
    decode_color(block, false, true)
}

/// Decodes a BC2 block: explicit 4-bit alpha followed by a color block.
pub(crate) fn decode_bc2_block(block: [u8; 16]) -> Tile {
    let (alpha, color) = split_16(block);
    let alpha = decode_bc2_alpha(alpha);

    let mut output = decode_color(color, true, false);
    for (pixel, a) in output.iter_mut().zip(alpha) {
        pixel.a = a;
    }
    output
}

/// Decodes a BC3 block: a BC4 alpha block followed by a color block.
pub(crate) fn decode_bc3_block(block: [u8; 16]) -> Tile {
    let (alpha, color) = split_16(block);
    let alpha = decode_bc4_channel(alpha);

    let mut output = decode_color(color, true, false);
    for (pixel, a) in output.iter_mut().zip(alpha) {
        pixel.a = a;
    }
    output
}

/// Decodes a BC4 block into the red channel of opaque pixels.
pub(crate) fn decode_bc4_block(block: [u8; 8]) -> Tile {
    decode_bc4_channel(block).map(|r| Rgba32::new(r, 0, 0, 255))
}

/// Decodes a BC5 block into the red and green channels of opaque pixels.
pub(crate) fn decode_bc5_block(block: [u8; 16]) -> Tile {
    let (red, green) = split_16(block);
    let red = decode_bc4_channel(red);
    let green = decode_bc4_channel(green);

    let mut output = [Rgba32::TRANSPARENT; 16];
    for i in 0..16 {
        output[i] = Rgb24::new(red[i], green[i], 0).with_alpha(255);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bc1_block(color0: u16, color1: u16, indices: u32) -> [u8; 8] {
        let mut block = [0; 8];
        block[..2].copy_from_slice(&color0.to_le_bytes());
        block[2..4].copy_from_slice(&color1.to_le_bytes());
        block[4..].copy_from_slice(&indices.to_le_bytes());
        block
    }

    #[test]
    fn bc1_four_color() {
        // index i for pixel i % 4
        let block = bc1_block(0xFFFF, 0x0000, 0xE4E4_E4E4);
        let tile = decode_bc1_block(block);

        assert_eq!(tile[0], Rgba32::new(255, 255, 255, 255));
        assert_eq!(tile[1], Rgba32::new(0, 0, 0, 255));
        assert_eq!(tile[2], Rgba32::new(170, 170, 170, 255));
        assert_eq!(tile[3], Rgba32::new(85, 85, 85, 255));
        assert_eq!(tile[4..8], tile[0..4]);
    }

    #[test]
    fn bc1_three_color() {
        let block = bc1_block(0x0000, 0xFFFF, 0xE4E4_E4E4);
        let tile = decode_bc1_block(block);

        assert_eq!(tile[0], Rgba32::new(0, 0, 0, 255));
        assert_eq!(tile[1], Rgba32::new(255, 255, 255, 255));
        assert_eq!(tile[2], Rgba32::new(128, 128, 128, 255));
        assert_eq!(tile[3], Rgba32::TRANSPARENT);

        // equal endpoints also select the 3-color mode
        let tile = decode_bc1_block(bc1_block(0x1234, 0x1234, 0xFFFF_FFFF));
        assert_eq!(tile, [Rgba32::TRANSPARENT; 16]);
    }

    #[test]
    fn bc1_opaque_three_color() {
        let block = bc1_block(0x0000, 0xFFFF, 0xE4E4_E4E4);
        let tile = decode_bc1_opaque_block(block);

        assert_eq!(tile[2], Rgba32::new(128, 128, 128, 255));
        assert_eq!(tile[3], Rgba32::new(0, 0, 0, 255));
        assert!(tile.iter().all(|p| p.a == 255));

        // the 4-color mode is the same for both variants
        let block = bc1_block(0xFFFF, 0x0000, 0xE4E4_E4E4);
        assert_eq!(decode_bc1_opaque_block(block), decode_bc1_block(block));
    }

    #[test]
    fn bc2_and_bc3_ignore_endpoint_order() {
        let mut block = [0; 16];
        block[..8].copy_from_slice(&u64::MAX.to_le_bytes());
        block[8..].copy_from_slice(&bc1_block(0x0000, 0xFFFF, 0xFFFF_FFFF));

        let tile = decode_bc2_block(block);
        assert_eq!(tile, [Rgba32::new(170, 170, 170, 255); 16]);
    }

    #[test]
    fn bc2_alpha_nibbles() {
        let mut block = [0; 16];
        block[..8].copy_from_slice(&0xFEDC_BA98_7654_3210_u64.to_le_bytes());
        let tile = decode_bc2_block(block);
        for (i, pixel) in tile.iter().enumerate() {
            assert_eq!(pixel.a, i as u8 * 17);
        }
    }

    #[test]
    fn bc4_palettes() {
        assert_eq!(
            bc4_palette(255, 0),
            [255, 0, 219, 182, 146, 109, 73, 36]
        );
        assert_eq!(bc4_palette(0, 255), [0, 255, 51, 102, 153, 204, 0, 255]);
        assert_eq!(bc4_palette(40, 40), [40, 40, 40, 40, 40, 40, 0, 255]);
    }

    #[test]
    fn bc4_indices() {
        // red0 = 255, red1 = 0, pixel i uses index i % 8
        let mut indices = 0_u64;
        for i in 0..16 {
            indices |= ((i % 8) as u64) << (3 * i);
        }
        let value = 255 | (indices << 16);
        let decoded = decode_bc4_channel(value.to_le_bytes());
        let palette = bc4_palette(255, 0);
        for i in 0..16 {
            assert_eq!(decoded[i], palette[i % 8]);
        }

        let tile = decode_bc4_block(value.to_le_bytes());
        assert_eq!(tile[2], Rgba32::new(219, 0, 0, 255));
    }

    #[test]
    fn bc5_channels() {
        let mut block = [0; 16];
        block[0] = 10;
        block[1] = 10;
        block[8] = 200;
        block[9] = 200;
        let tile = decode_bc5_block(block);
        assert_eq!(tile, [Rgba32::new(10, 200, 0, 255); 16]);
    }
}
