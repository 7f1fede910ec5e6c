use crate::{util, DxgiFormat, GlFormat, GlInternalFormat};

/// The block compressed formats supported by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum Format {
    /// BC1 in the opaque 4-color mode.
    ///
    /// Blocks may still use the 3-color mode if it represents the block
    /// better. The encoder never uses its fourth palette entry, and the
    /// decoder reads it as opaque black.
    BC1_UNORM,
    /// BC1 with 1-bit alpha.
    ///
    /// Pixels with an alpha value below [`crate::EncodeOptions::alpha_cutoff`]
    /// are encoded as transparent black.
    BC1_UNORM_ALPHA,
    /// BC1 color with explicit 4-bit alpha.
    BC2_UNORM,
    /// BC1 color with interpolated alpha.
    BC3_UNORM,
    /// A single channel, decoded as red.
    BC4_UNORM,
    /// Two channels, decoded as red and green.
    BC5_UNORM,
    BC7_UNORM,
}

impl Format {
    pub const ALL: [Format; 7] = [
        Format::BC1_UNORM,
        Format::BC1_UNORM_ALPHA,
        Format::BC2_UNORM,
        Format::BC3_UNORM,
        Format::BC4_UNORM,
        Format::BC5_UNORM,
        Format::BC7_UNORM,
    ];

    /// The size of one encoded 4x4 block in bytes.
    pub const fn block_size(self) -> usize {
        match self {
            Format::BC1_UNORM | Format::BC1_UNORM_ALPHA | Format::BC4_UNORM => 8,
            Format::BC2_UNORM | Format::BC3_UNORM | Format::BC5_UNORM | Format::BC7_UNORM => 16,
        }
    }

    /// The channels the format stores.
    pub const fn channels(self) -> Channels {
        match self {
            Format::BC1_UNORM => Channels::Rgb,
            Format::BC4_UNORM => Channels::Red,
            Format::BC5_UNORM => Channels::RedGreen,
            Format::BC1_UNORM_ALPHA | Format::BC2_UNORM | Format::BC3_UNORM | Format::BC7_UNORM => {
                Channels::Rgba
            }
        }
    }

    /// Whether the format stores alpha values.
    pub const fn has_alpha(self) -> bool {
        matches!(self.channels(), Channels::Rgba)
    }

    /// The number of bytes needed to store a `width` x `height` grid of
    /// tiles. Returns `None` if the grid is empty or the size overflows.
    pub fn encoded_size(self, width: u32, height: u32) -> Option<usize> {
        util::grid_len(width, height)?.checked_mul(self.block_size())
    }

    pub const fn dxgi_format(self) -> DxgiFormat {
        match self {
            Format::BC1_UNORM | Format::BC1_UNORM_ALPHA => DxgiFormat::BC1_UNORM,
            Format::BC2_UNORM => DxgiFormat::BC2_UNORM,
            Format::BC3_UNORM => DxgiFormat::BC3_UNORM,
            Format::BC4_UNORM => DxgiFormat::BC4_UNORM,
            Format::BC5_UNORM => DxgiFormat::BC5_UNORM,
            Format::BC7_UNORM => DxgiFormat::BC7_UNORM,
        }
    }

    pub const fn gl_internal_format(self) -> GlInternalFormat {
        match self {
            Format::BC1_UNORM => GlInternalFormat::GL_COMPRESSED_RGB_S3TC_DXT1_EXT,
            Format::BC1_UNORM_ALPHA => GlInternalFormat::GL_COMPRESSED_RGBA_S3TC_DXT1_EXT,
            Format::BC2_UNORM => GlInternalFormat::GL_COMPRESSED_RGBA_S3TC_DXT3_EXT,
            Format::BC3_UNORM => GlInternalFormat::GL_COMPRESSED_RGBA_S3TC_DXT5_EXT,
            Format::BC4_UNORM => GlInternalFormat::GL_COMPRESSED_RED_RGTC1_EXT,
            Format::BC5_UNORM => GlInternalFormat::GL_COMPRESSED_RED_GREEN_RGTC2_EXT,
            Format::BC7_UNORM => GlInternalFormat::GL_COMPRESSED_RGBA_BPTC_UNORM_ARB,
        }
    }

    pub const fn gl_format(self) -> GlFormat {
        match self.channels() {
            Channels::Red => GlFormat::GL_RED,
            Channels::RedGreen => GlFormat::GL_RG,
            Channels::Rgb => GlFormat::GL_RGB,
            Channels::Rgba => GlFormat::GL_RGBA,
        }
    }

    /// Returns the format that can decode blocks of the given DXGI format.
    ///
    /// Typeless and sRGB variants map to the same format, since the stored
    /// blocks are identical. BC1 maps to [`Format::BC1_UNORM_ALPHA`], since
    /// BC1 blocks may always contain transparent pixels.
    pub const fn from_dxgi(format: DxgiFormat) -> Option<Self> {
        Some(match format {
            DxgiFormat::BC1_TYPELESS | DxgiFormat::BC1_UNORM | DxgiFormat::BC1_UNORM_SRGB => {
                Format::BC1_UNORM_ALPHA
            }
            DxgiFormat::BC2_TYPELESS | DxgiFormat::BC2_UNORM | DxgiFormat::BC2_UNORM_SRGB => {
                Format::BC2_UNORM
            }
            DxgiFormat::BC3_TYPELESS | DxgiFormat::BC3_UNORM | DxgiFormat::BC3_UNORM_SRGB => {
                Format::BC3_UNORM
            }
            DxgiFormat::BC4_TYPELESS | DxgiFormat::BC4_UNORM => Format::BC4_UNORM,
            DxgiFormat::BC5_TYPELESS | DxgiFormat::BC5_UNORM => Format::BC5_UNORM,
            DxgiFormat::BC7_TYPELESS | DxgiFormat::BC7_UNORM | DxgiFormat::BC7_UNORM_SRGB => {
                Format::BC7_UNORM
            }
            _ => return None,
        })
    }
}

/// The channels stored by a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channels {
    Red,
    RedGreen,
    Rgb,
    Rgba,
}
impl Channels {
    /// Returns the number of channels.
    pub const fn count(&self) -> u8 {
        match self {
            Self::Red => 1,
            Self::RedGreen => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dxgi_round_trip() {
        for format in Format::ALL {
            let dxgi = format.dxgi_format();
            let back = Format::from_dxgi(dxgi).unwrap();
            assert_eq!(back.block_size(), format.block_size());
            assert_eq!(back.dxgi_format(), dxgi);
        }

        assert_eq!(Format::from_dxgi(DxgiFormat::BC6H_UF16), None);
        assert_eq!(Format::from_dxgi(DxgiFormat::Unknown), None);
        assert_eq!(
            Format::from_dxgi(DxgiFormat::try_from(99).unwrap()),
            Some(Format::BC7_UNORM)
        );
    }

    #[test]
    fn metadata() {
        assert_eq!(Format::BC4_UNORM.channels().count(), 1);
        assert!(!Format::BC1_UNORM.has_alpha());
        assert!(Format::BC1_UNORM_ALPHA.has_alpha());
        assert_eq!(u32::from(Format::BC7_UNORM.gl_internal_format()), 0x8E8C);
        assert_eq!(Format::BC5_UNORM.gl_format(), GlFormat::GL_RG);

        assert_eq!(Format::BC1_UNORM.encoded_size(3, 5), Some(120));
        assert_eq!(Format::BC7_UNORM.encoded_size(3, 5), Some(240));
        assert_eq!(Format::BC7_UNORM.encoded_size(0, 5), None);
    }
}
