//! Conversion between row-major RGBA images and tile grids.

use crate::{cast, DecodeError, EncodeError, Rgba32, Tile};

/// The size of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}
impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The width and height of the grid of 4x4 tiles covering the image.
    pub const fn tile_grid(&self) -> (u32, u32) {
        (self.width.div_ceil(4), self.height.div_ceil(4))
    }
}
impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// Splits an image into tiles.
///
/// `pixels` are the RGBA bytes of the image in row-major order without
/// padding. The tiles are returned in row-major order of the grid given by
/// [`Size::tile_grid`]. Tiles extending past the right or bottom edge of the
/// image repeat the last column or row of pixels.
pub fn image_to_tiles(pixels: &[u8], size: Size) -> Result<Vec<Tile>, EncodeError> {
    if size.is_empty() {
        return Err(EncodeError::EmptyGrid {
            width: size.width,
            height: size.height,
        });
    }

    // sizes that don't fit into memory can't match any buffer
    let expected = usize::try_from(size.pixels())
        .ok()
        .and_then(|pixels| pixels.checked_mul(4))
        .unwrap_or(usize::MAX);
    let pixels = match cast::as_pixels(pixels) {
        Some(pixels) if pixels.len() * 4 == expected => pixels,
        _ => {
            return Err(EncodeError::ImageSize {
                expected,
                actual: pixels.len(),
            })
        }
    };

    let width = size.width as usize;
    let height = size.height as usize;
    let (grid_width, grid_height) = size.tile_grid();

    let mut tiles = Vec::with_capacity(grid_width as usize * grid_height as usize);
    for tile_y in 0..grid_height as usize {
        for tile_x in 0..grid_width as usize {
            let mut tile = [Rgba32::TRANSPARENT; 16];
            for (i, pixel) in tile.iter_mut().enumerate() {
                let x = (tile_x * 4 + i % 4).min(width - 1);
                let y = (tile_y * 4 + i / 4).min(height - 1);
                *pixel = pixels[y * width + x];
            }
            tiles.push(tile);
        }
    }
    Ok(tiles)
}

/// Assembles an image from tiles. This is the inverse of [`image_to_tiles`].
///
/// Pixels of tiles that lie outside the image are ignored.
pub fn tiles_to_image(tiles: &[Tile], size: Size) -> Result<Vec<u8>, DecodeError> {
    if size.is_empty() {
        return Err(DecodeError::EmptyGrid {
            width: size.width,
            height: size.height,
        });
    }

    let (grid_width, grid_height) = size.tile_grid();
    let grid_width = grid_width as usize;
    let expected = grid_width.saturating_mul(grid_height as usize);
    if tiles.len() != expected {
        return Err(DecodeError::TileCountMismatch {
            expected,
            actual: tiles.len(),
        });
    }

    let width = size.width as usize;
    let height = size.height as usize;
    let mut output = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let tile = &tiles[(y / 4) * grid_width + x / 4];
            output.extend_from_slice(&tile[(y % 4) * 4 + x % 4].to_array());
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(size: Size) -> Vec<u8> {
        let mut pixels = Vec::new();
        for y in 0..size.height {
            for x in 0..size.width {
                pixels.extend_from_slice(&[x as u8, y as u8, 7, 255]);
            }
        }
        pixels
    }

    #[test]
    fn partial_tiles_repeat_edges() {
        let size = Size::new(5, 3);
        assert_eq!(size.tile_grid(), (2, 1));

        let tiles = image_to_tiles(&test_image(size), size).unwrap();
        assert_eq!(tiles.len(), 2);

        // right tile: only x = 4 is inside the image
        for (i, pixel) in tiles[1].iter().enumerate() {
            let y = (i / 4).min(2) as u8;
            assert_eq!(*pixel, Rgba32::new(4, y, 7, 255));
        }
        // the last row is repeated
        assert_eq!(tiles[0][12], tiles[0][8]);
    }

    #[test]
    fn image_round_trip() {
        for size in [Size::new(1, 1), Size::new(4, 4), Size::new(9, 6)] {
            let image = test_image(size);
            let tiles = image_to_tiles(&image, size).unwrap();
            assert_eq!(tiles_to_image(&tiles, size).unwrap(), image);
        }
    }

    #[test]
    fn size_errors() {
        assert!(matches!(
            image_to_tiles(&[0; 12], Size::new(2, 2)),
            Err(EncodeError::ImageSize {
                expected: 16,
                actual: 12
            })
        ));
        assert!(matches!(
            image_to_tiles(&[0; 16], Size::new(u32::MAX, u32::MAX)),
            Err(EncodeError::ImageSize {
                expected: usize::MAX,
                actual: 16
            })
        ));
        assert!(matches!(
            image_to_tiles(&[], Size::new(0, 2)),
            Err(EncodeError::EmptyGrid { .. })
        ));
        assert!(matches!(
            tiles_to_image(&[[Rgba32::TRANSPARENT; 16]; 3], Size::new(8, 4)),
            Err(DecodeError::TileCountMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }
}
