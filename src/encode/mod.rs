use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{util, EncodeError, Format, Tile};

mod bc;
mod bc1;
mod bc4;
mod bc7;
mod bcn_util;
mod chooser;

/// Encodes a grid of tiles in the given format.
///
/// `tiles` are the tiles of a `width` x `height` grid in row-major order.
/// The returned buffer contains one block per tile in the same order, so its
/// length is always `width * height * format.block_size()`.
///
/// The output does not depend on [`EncodeOptions::parallel`].
pub fn encode(
    tiles: &[Tile],
    width: u32,
    height: u32,
    format: Format,
    options: &EncodeOptions,
) -> Result<Vec<u8>, EncodeError> {
    let expected = util::grid_len(width, height).ok_or(EncodeError::EmptyGrid { width, height })?;
    if tiles.len() != expected {
        return Err(EncodeError::TileCountMismatch {
            expected,
            actual: tiles.len(),
        });
    }

    let block_size = format.block_size();
    let mut output = vec![0_u8; tiles.len() * block_size];

    #[cfg(feature = "rayon")]
    if options.parallel {
        use rayon::prelude::*;

        log::debug!(
            "encoding {}x{} blocks as {:?} ({:?}, parallel)",
            width,
            height,
            format,
            options.quality
        );
        output
            .par_chunks_exact_mut(block_size)
            .zip(tiles.par_iter())
            .for_each(|(block, tile)| encode_into(tile, format, options, block));
        return Ok(output);
    }

    log::debug!(
        "encoding {}x{} blocks as {:?} ({:?})",
        width,
        height,
        format,
        options.quality
    );
    for (block, tile) in output.chunks_exact_mut(block_size).zip(tiles) {
        encode_into(tile, format, options, block);
    }
    Ok(output)
}

fn encode_into(tile: &Tile, format: Format, options: &EncodeOptions, output: &mut [u8]) {
    output.copy_from_slice(encode_block(tile, format, options).as_bytes());
}

/// Encodes a single tile.
pub fn encode_block(tile: &Tile, format: Format, options: &EncodeOptions) -> Block {
    match format {
        Format::BC1_UNORM => Block::Bytes8(bc::encode_bc1(tile, options)),
        Format::BC1_UNORM_ALPHA => Block::Bytes8(bc::encode_bc1_with_alpha(tile, options)),
        Format::BC2_UNORM => Block::Bytes16(bc::encode_bc2(tile, options)),
        Format::BC3_UNORM => Block::Bytes16(bc::encode_bc3(tile, options)),
        Format::BC4_UNORM => Block::Bytes8(bc::encode_bc4(tile, options)),
        Format::BC5_UNORM => Block::Bytes16(bc::encode_bc5(tile, options)),
        Format::BC7_UNORM => Block::Bytes16(bc7::compress_bc7_block(
            tile,
            bc7::Bc7Options {
                quality: options.quality,
                modes: options.bc7_modes,
            },
        )),
    }
}

/// An encoded block of 8 or 16 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Block {
    Bytes8([u8; 8]),
    Bytes16([u8; 16]),
}
impl Block {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Block::Bytes8(bytes) => bytes,
            Block::Bytes16(bytes) => bytes,
        }
    }
}

/// Options for encoding blocks.
///
/// ## See also
///
/// - [`encode`]
/// - [`encode_block`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct EncodeOptions {
    /// The compression quality.
    ///
    /// Default: [`CompressionQuality::Balanced`]
    pub quality: CompressionQuality,
    /// Whether to use rayon for parallel encoding.
    ///
    /// Blocks are independent of each other, so they can be encoded in any
    /// order. The output is the same whether this is enabled or not.
    ///
    /// This option is ignored if the `rayon` feature is not enabled.
    ///
    /// Default: `true`
    pub parallel: bool,
    /// Pixels with an alpha value below this cutoff are encoded as fully
    /// transparent in [`Format::BC1_UNORM_ALPHA`]. All other formats ignore
    /// this option.
    ///
    /// Default: `128`
    pub alpha_cutoff: u8,
    /// Whether [`Format::BC4_UNORM`] stores the luminance of the pixels
    /// instead of their red channel.
    ///
    /// Default: `false`
    pub luminance_as_red: bool,
    /// The modes the BC7 encoder may choose from.
    ///
    /// If the encoder can't use any of the given modes, it falls back to
    /// mode 6.
    ///
    /// Default: [`Bc7Modes::all()`]
    pub bc7_modes: Bc7Modes,
}
impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            quality: CompressionQuality::Balanced,
            parallel: true,
            alpha_cutoff: 128,
            luminance_as_red: false,
            bc7_modes: Bc7Modes::all(),
        }
    }
}

/// The level of trade-off between compression quality and speed.
///
/// Higher levels never produce blocks with a larger error than lower
/// levels for the same input.
///
/// - `Fast`: Only the initial endpoint estimate is used.
/// - `Balanced`: Endpoints are refined with a short local search.
/// - `BestQuality`: Endpoints are refined until the search stops finding
///   improvements. BC7 tries all partitions and rotations.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    IntoPrimitive,
    TryFromPrimitive,
)]
#[repr(u8)]
pub enum CompressionQuality {
    Fast = 0,
    #[default]
    Balanced = 1,
    BestQuality = 2,
}

bitflags! {
    /// A set of BC7 modes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Bc7Modes: u8 {
        /// 3 subsets, RGB, 4-bit endpoints with unique p-bits.
        const MODE_0 = 1 << 0;
        /// 2 subsets, RGB, 6-bit endpoints with shared p-bits.
        const MODE_1 = 1 << 1;
        /// 3 subsets, RGB, 5-bit endpoints.
        const MODE_2 = 1 << 2;
        /// 2 subsets, RGB, 7-bit endpoints with unique p-bits.
        const MODE_3 = 1 << 3;
        /// 1 subset, 5-bit RGB and 6-bit alpha with separate indexes.
        const MODE_4 = 1 << 4;
        /// 1 subset, 7-bit RGB and 8-bit alpha with separate indexes.
        const MODE_5 = 1 << 5;
        /// 1 subset, RGBA, 7-bit endpoints with unique p-bits.
        const MODE_6 = 1 << 6;
        /// 2 subsets, RGBA, 5-bit endpoints with unique p-bits.
        const MODE_7 = 1 << 7;
    }
}
impl Default for Bc7Modes {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rgba32;

    #[test]
    fn quality_from_integer() {
        assert_eq!(
            CompressionQuality::try_from(2_u8).unwrap(),
            CompressionQuality::BestQuality
        );
        assert!(CompressionQuality::try_from(3_u8).is_err());
        assert_eq!(u8::from(CompressionQuality::Fast), 0);
        assert!(CompressionQuality::Fast < CompressionQuality::BestQuality);
    }

    #[test]
    fn block_sizes() {
        let tile = [Rgba32::new(1, 2, 3, 4); 16];
        for format in Format::ALL {
            let block = encode_block(&tile, format, &EncodeOptions::default());
            assert_eq!(block.as_bytes().len(), format.block_size(), "{format:?}");
        }
    }

    #[test]
    fn grid_validation() {
        let tiles = [[Rgba32::TRANSPARENT; 16]; 6];
        let options = EncodeOptions::default();

        assert!(matches!(
            encode(&tiles, 0, 6, Format::BC1_UNORM, &options),
            Err(EncodeError::EmptyGrid { width: 0, height: 6 })
        ));
        assert!(matches!(
            encode(&tiles, 2, 2, Format::BC1_UNORM, &options),
            Err(EncodeError::TileCountMismatch {
                expected: 4,
                actual: 6
            })
        ));
        assert_eq!(
            encode(&tiles, 3, 2, Format::BC7_UNORM, &options)
                .unwrap()
                .len(),
            6 * 16
        );
    }
}
