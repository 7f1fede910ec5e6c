//! Encoder and decoder for the BC1-BC7 block compressed texture formats.
//!
//! Images are processed in tiles of 4x4 pixels. Each tile is compressed into
//! one block of 8 or 16 bytes, depending on the [`Format`].
//!
//! ```
//! use bcn_codec::*;
//!
//! let size = Size::new(8, 8);
//! let pixels = vec![128_u8; 8 * 8 * 4];
//!
//! let tiles = image_to_tiles(&pixels, size).unwrap();
//! let (width, height) = size.tile_grid();
//! let options = EncodeOptions::default();
//! let blocks = encode(&tiles, width, height, Format::BC7_UNORM, &options).unwrap();
//! assert_eq!(blocks.len(), 4 * 16);
//!
//! let decoded = decode(&blocks, width, height, Format::BC7_UNORM).unwrap();
//! assert_eq!(tiles_to_image(&decoded, size).unwrap(), pixels);
//! ```

#![forbid(unsafe_code)]

mod bcn_data;
mod bits;
mod cast;
mod color;
mod decode;
mod dxgi_format;
mod encode;
mod error;
mod format;
mod gl_format;
mod image;
mod util;

pub use color::{Rgb24, Rgba32, YCbCr};
pub use decode::{decode, decode_block, decode_strict};
pub use dxgi_format::*;
pub use encode::{encode, encode_block, Bc7Modes, Block, CompressionQuality, EncodeOptions};
pub use error::*;
pub use format::*;
pub use gl_format::*;
pub use image::*;

/// The 16 pixels of a 4x4 block in row-major order.
pub type Tile = [Rgba32; 16];
