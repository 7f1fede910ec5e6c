use crate::{util, DecodeError, Format, Rgba32, Tile};

pub(crate) mod bc;
pub(crate) mod bc7;

/// The tile that blocks without a defined meaning decode to.
const FALLBACK_TILE: Tile = [Rgba32::TRANSPARENT; 16];

/// Decodes a buffer of blocks into tiles.
///
/// `data` must contain exactly `width * height` blocks of the given format
/// in row-major order.
///
/// Reserved BC7 blocks (mode 8) decode to transparent black. Use
/// [`decode_strict`] to reject them instead.
pub fn decode(
    data: &[u8],
    width: u32,
    height: u32,
    format: Format,
) -> Result<Vec<Tile>, DecodeError> {
    check_buffer_len(data, width, height, format)?;
    log::debug!("decoding {}x{} blocks of {:?}", width, height, format);

    Ok(data
        .chunks_exact(format.block_size())
        .map(|block| try_decode(format, block).unwrap_or(FALLBACK_TILE))
        .collect())
}

/// Same as [`decode`], but returns [`DecodeError::ReservedBlock`] for the
/// first block that doesn't have a defined meaning.
pub fn decode_strict(
    data: &[u8],
    width: u32,
    height: u32,
    format: Format,
) -> Result<Vec<Tile>, DecodeError> {
    check_buffer_len(data, width, height, format)?;
    log::debug!("decoding {}x{} blocks of {:?} (strict)", width, height, format);

    data.chunks_exact(format.block_size())
        .enumerate()
        .map(|(index, block)| try_decode(format, block).ok_or(DecodeError::ReservedBlock { index }))
        .collect()
}

/// Decodes a single block.
///
/// `block` must be exactly [`Format::block_size`] bytes long. Reserved BC7
/// blocks decode to transparent black.
pub fn decode_block(format: Format, block: &[u8]) -> Result<Tile, DecodeError> {
    let expected = format.block_size();
    if block.len() != expected {
        return Err(DecodeError::UnexpectedBufferSize {
            expected,
            actual: block.len(),
        });
    }

    Ok(try_decode(format, block).unwrap_or(FALLBACK_TILE))
}

/// Verifies that the buffer is exactly as long as expected.
fn check_buffer_len(
    data: &[u8],
    width: u32,
    height: u32,
    format: Format,
) -> Result<(), DecodeError> {
    let blocks = util::grid_len(width, height).ok_or(DecodeError::EmptyGrid { width, height })?;
    // overflows are reported as a size mismatch
    let expected = blocks.saturating_mul(format.block_size());
    if data.len() != expected {
        return Err(DecodeError::UnexpectedBufferSize {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Decodes a block of the correct size. Returns `None` for reserved blocks.
fn try_decode(format: Format, block: &[u8]) -> Option<Tile> {
    debug_assert_eq!(block.len(), format.block_size());

    match format {
        Format::BC1_UNORM => Some(bc::decode_bc1_opaque_block(to_array(block))),
        Format::BC1_UNORM_ALPHA => Some(bc::decode_bc1_block(to_array(block))),
        Format::BC2_UNORM => Some(bc::decode_bc2_block(to_array(block))),
        Format::BC3_UNORM => Some(bc::decode_bc3_block(to_array(block))),
        Format::BC4_UNORM => Some(bc::decode_bc4_block(to_array(block))),
        Format::BC5_UNORM => Some(bc::decode_bc5_block(to_array(block))),
        Format::BC7_UNORM => bc7::decode_bc7_block(to_array(block)),
    }
}

fn to_array<const N: usize>(block: &[u8]) -> [u8; N] {
    let mut array = [0; N];
    array.copy_from_slice(block);
    array
}
