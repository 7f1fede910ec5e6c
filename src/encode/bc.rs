//! BC1-BC5 block encoders built from the color and gradient encoders.

use crate::{color::quantize, Tile, YCbCr};

use super::{
    bc1, bc4,
    bcn_util::{GradientBudget, SearchBudget},
    EncodeOptions,
};

fn concat_blocks(left: [u8; 8], right: [u8; 8]) -> [u8; 16] {
    let mut out = [0; 16];
    out[0..8].copy_from_slice(&left);
    out[8..].copy_from_slice(&right);
    out
}

fn get_alpha(tile: &Tile) -> [u8; 16] {
    tile.map(|p| p.a)
}
fn get_channel<const CHANNEL: usize>(tile: &Tile) -> [u8; 16] {
    tile.map(|p| p.to_array()[CHANNEL])
}
fn get_luma(tile: &Tile) -> [u8; 16] {
    tile.map(|p| YCbCr::from_rgb24(p.rgb()).luma_u8())
}

fn get_bc1_options(options: &EncodeOptions) -> bc1::Bc1Options {
    bc1::Bc1Options {
        budget: SearchBudget::color(options.quality),
        alpha_cutoff: None,
        no_default: false,
    }
}
/// The color options of BC2 and BC3, which only have the 4-color mode.
fn get_bc1_options_no_default(options: &EncodeOptions) -> bc1::Bc1Options {
    bc1::Bc1Options {
        no_default: true,
        ..get_bc1_options(options)
    }
}

pub(crate) fn encode_bc1(tile: &Tile, options: &EncodeOptions) -> [u8; 8] {
    bc1::compress_bc1_block(tile, get_bc1_options(options))
}

pub(crate) fn encode_bc1_with_alpha(tile: &Tile, options: &EncodeOptions) -> [u8; 8] {
    let mut bc1_options = get_bc1_options(options);
    bc1_options.alpha_cutoff = Some(options.alpha_cutoff);
    bc1::compress_bc1_block(tile, bc1_options)
}

/// Quantizes alpha to 4 bits per pixel.
fn bc2_alpha(alpha: [u8; 16]) -> [u8; 8] {
    let mut indexes: u64 = 0;
    for (i, a) in alpha.into_iter().enumerate() {
        let value = quantize(a, 4);
        debug_assert!(value < 16);
        indexes |= (value as u64) << (i * 4);
    }
    indexes.to_le_bytes()
}

pub(crate) fn encode_bc2(tile: &Tile, options: &EncodeOptions) -> [u8; 16] {
    let alpha_block = bc2_alpha(get_alpha(tile));
    let bc1_block = bc1::compress_bc1_block(tile, get_bc1_options_no_default(options));

    concat_blocks(alpha_block, bc1_block)
}

pub(crate) fn encode_bc3(tile: &Tile, options: &EncodeOptions) -> [u8; 16] {
    let bc4_budget = GradientBudget::bc4(options.quality);

    let bc4_block = bc4::compress_bc4_block(&get_alpha(tile), &bc4_budget);
    let bc1_block = bc1::compress_bc1_block(tile, get_bc1_options_no_default(options));

    concat_blocks(bc4_block, bc1_block)
}

pub(crate) fn encode_bc4(tile: &Tile, options: &EncodeOptions) -> [u8; 8] {
    let budget = GradientBudget::bc4(options.quality);
    let values = if options.luminance_as_red {
        get_luma(tile)
    } else {
        get_channel::<0>(tile)
    };
    bc4::compress_bc4_block(&values, &budget)
}

pub(crate) fn encode_bc5(tile: &Tile, options: &EncodeOptions) -> [u8; 16] {
    let budget = GradientBudget::bc5(options.quality);
    let red = bc4::compress_bc4_block(&get_channel::<0>(tile), &budget);
    let green = bc4::compress_bc4_block(&get_channel::<1>(tile), &budget);
    concat_blocks(red, green)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompressionQuality, Rgba32};
    use crate::decode::bc::{decode_bc2_block, decode_bc3_block, decode_bc4_block};

    fn gradient_tile() -> Tile {
        let mut tile = [Rgba32::TRANSPARENT; 16];
        for (i, p) in tile.iter_mut().enumerate() {
            let i = i as u8;
            *p = Rgba32::new(i * 16, 100, 255 - i * 16, i * 17);
        }
        tile
    }

    #[test]
    fn bc2_alpha_rounds() {
        let tile = gradient_tile();
        let decoded = decode_bc2_block(encode_bc2(&tile, &EncodeOptions::default()));
        for (a, b) in tile.iter().zip(decoded.iter()) {
            assert_eq!(a.a, b.a);
        }

        let mut tile = tile;
        tile[0].a = 8;
        tile[1].a = 9;
        tile[2].a = 247;
        let decoded = decode_bc2_block(encode_bc2(&tile, &EncodeOptions::default()));
        assert_eq!(decoded[0].a, 0);
        assert_eq!(decoded[1].a, 17);
        assert_eq!(decoded[2].a, 255);
    }

    #[test]
    fn bc3_alpha_is_a_bc4_block() {
        let tile = gradient_tile();
        let options = EncodeOptions::default();
        let block = encode_bc3(&tile, &options);

        let budget = GradientBudget::bc4(options.quality);
        let alpha = bc4::compress_bc4_block(&get_alpha(&tile), &budget);
        assert_eq!(block[..8], alpha);

        let decoded = decode_bc3_block(block);
        let decoded_alpha = crate::decode::bc::decode_bc4_channel(alpha);
        for (pixel, a) in decoded.iter().zip(decoded_alpha) {
            assert_eq!(pixel.a, a);
        }
    }

    #[test]
    fn bc2_and_bc3_share_the_4_color_block() {
        let tile = gradient_tile();
        for quality in [CompressionQuality::Fast, CompressionQuality::BestQuality] {
            let options = EncodeOptions {
                quality,
                ..Default::default()
            };
            let color = bc1::compress_bc1_block(
                &tile,
                bc1::Bc1Options {
                    budget: SearchBudget::color(quality),
                    alpha_cutoff: None,
                    no_default: true,
                },
            );

            assert_eq!(encode_bc2(&tile, &options)[8..], color);
            assert_eq!(encode_bc3(&tile, &options)[8..], color);
        }
    }

    #[test]
    fn bc5_channels_use_their_own_budget() {
        let tile = gradient_tile();
        for quality in [CompressionQuality::Fast, CompressionQuality::Balanced] {
            let options = EncodeOptions {
                quality,
                ..Default::default()
            };
            let budget = GradientBudget::bc5(quality);
            let block = encode_bc5(&tile, &options);

            let red = bc4::compress_bc4_block(&get_channel::<0>(&tile), &budget);
            let green = bc4::compress_bc4_block(&get_channel::<1>(&tile), &budget);
            assert_eq!(block[..8], red);
            assert_eq!(block[8..], green);
        }
    }

    #[test]
    fn bc4_luminance() {
        let tile = [Rgba32::new(255, 0, 0, 255); 16];

        let red = decode_bc4_block(encode_bc4(&tile, &EncodeOptions::default()));
        assert_eq!(red, [Rgba32::new(255, 0, 0, 255); 16]);

        let options = EncodeOptions {
            luminance_as_red: true,
            ..Default::default()
        };
        let luma = decode_bc4_block(encode_bc4(&tile, &options));
        assert_eq!(luma, [Rgba32::new(76, 0, 0, 255); 16]);
    }
}
