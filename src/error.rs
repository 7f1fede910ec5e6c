#[derive(Debug)]
#[non_exhaustive]
pub enum EncodeError {
    /// The number of tiles doesn't match the size of the tile grid.
    TileCountMismatch { expected: usize, actual: usize },
    /// The width or height of the tile grid is zero.
    EmptyGrid { width: u32, height: u32 },
    /// The pixel buffer given to [`crate::image_to_tiles`] doesn't have
    /// exactly `4 * width * height` bytes.
    ImageSize { expected: usize, actual: usize },
}
impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::TileCountMismatch { expected, actual } => {
                write!(f, "Expected {} tiles, but got {}", expected, actual)
            }
            EncodeError::EmptyGrid { width, height } => {
                write!(f, "The tile grid {}x{} is empty", width, height)
            }
            EncodeError::ImageSize { expected, actual } => {
                write!(
                    f,
                    "Unexpected image buffer size: expected {} bytes, but got {}",
                    expected, actual
                )
            }
        }
    }
}
impl std::error::Error for EncodeError {}

#[derive(Debug)]
#[non_exhaustive]
pub enum DecodeError {
    /// The buffer must contain exactly one block per tile. No more, no less.
    UnexpectedBufferSize { expected: usize, actual: usize },
    /// The number of tiles given to [`crate::tiles_to_image`] doesn't match
    /// the image size.
    TileCountMismatch { expected: usize, actual: usize },
    /// The width or height of the tile grid is zero.
    EmptyGrid { width: u32, height: u32 },
    /// A block without a defined meaning, e.g. a BC7 block of the reserved
    /// mode 8.
    ///
    /// This error is only returned by [`crate::decode_strict`].
    ReservedBlock { index: usize },
}
impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::UnexpectedBufferSize { expected, actual } => {
                write!(
                    f,
                    "Unexpected buffer size: expected {} bytes, but got {}",
                    expected, actual
                )
            }
            DecodeError::TileCountMismatch { expected, actual } => {
                write!(f, "Expected {} tiles, but got {}", expected, actual)
            }
            DecodeError::EmptyGrid { width, height } => {
                write!(f, "The tile grid {}x{} is empty", width, height)
            }
            DecodeError::ReservedBlock { index } => {
                write!(f, "Block {} uses a reserved encoding", index)
            }
        }
    }
}
impl std::error::Error for DecodeError {}
