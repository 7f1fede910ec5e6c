//! Fixed-point color types shared by the encoders and decoders.

use bytemuck::{Pod, Zeroable};

/// An 8-bit per channel RGBA color.
///
/// This is the pixel type of [`Tile`](crate::Tile). It has the same memory
/// layout as `[u8; 4]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Rgba32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}
impl Rgba32 {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
    pub const fn from_array([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Drops the alpha channel.
    pub const fn rgb(self) -> Rgb24 {
        Rgb24::new(self.r, self.g, self.b)
    }
}
impl From<[u8; 4]> for Rgba32 {
    fn from(value: [u8; 4]) -> Self {
        Self::from_array(value)
    }
}
impl From<Rgba32> for [u8; 4] {
    fn from(value: Rgba32) -> Self {
        value.to_array()
    }
}

/// An 8-bit per channel RGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb24 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}
impl Rgb24 {
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn with_alpha(self, a: u8) -> Rgba32 {
        Rgba32::new(self.r, self.g, self.b, a)
    }

    /// Returns `self * (den - num) / den + other * num / den`, rounded to
    /// nearest.
    pub fn blend(self, other: Self, num: u32, den: u32) -> Self {
        Self {
            r: blend(self.r, other.r, num, den),
            g: blend(self.g, other.g, num, den),
            b: blend(self.b, other.b, num, den),
        }
    }
}

/// Returns `a * (den - num) / den + b * num / den`, rounded to nearest.
///
/// All palette entries of BC1-BC5 are derived with this function, so the
/// encoders see exactly the values the decoders produce.
#[inline(always)]
pub(crate) fn blend(a: u8, b: u8, num: u32, den: u32) -> u8 {
    debug_assert!(0 < den && num <= den);
    ((a as u32 * (den - num) + b as u32 * num + den / 2) / den) as u8
}

/// A 16-bit color with 5 bits of red, 6 bits of green and 5 bits of blue.
///
/// The `u16` representation has red in the most significant bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub(crate) struct Rgb565 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}
impl Rgb565 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        debug_assert!(r < 32);
        debug_assert!(g < 64);
        debug_assert!(b < 32);
        Self { r, g, b }
    }

    pub const fn from_u16(value: u16) -> Self {
        Self {
            r: (value >> 11) as u8 & 0x1F,
            g: (value >> 5) as u8 & 0x3F,
            b: value as u8 & 0x1F,
        }
    }
    pub const fn to_u16(self) -> u16 {
        (self.r as u16) << 11 | (self.g as u16) << 5 | self.b as u16
    }

    /// The nearest 565 color.
    pub fn from_rgb24(color: Rgb24) -> Self {
        Self {
            r: quantize(color.r, 5),
            g: quantize(color.g, 6),
            b: quantize(color.b, 5),
        }
    }

    /// Expands to 8 bits per channel by replicating the top bits of each
    /// channel into the revealed low bits.
    pub const fn to_rgb24(self) -> Rgb24 {
        Rgb24 {
            r: expand(self.r, 5),
            g: expand(self.g, 6),
            b: expand(self.b, 5),
        }
    }
}

/// Rounds an 8-bit value to the nearest `bits`-bit value.
#[inline]
pub(crate) fn quantize(value: u8, bits: u8) -> u8 {
    debug_assert!(0 < bits && bits <= 8);
    let max = (1_u32 << bits) - 1;
    ((value as u32 * max + 127) / 255) as u8
}

/// Widens a `bits`-bit value to 8 bits with MSB replication.
#[inline]
pub(crate) const fn expand(value: u8, bits: u8) -> u8 {
    debug_assert!(0 < bits && bits <= 8);
    if bits == 8 {
        return value;
    }
    // `bits` may be smaller than the gap, so replicate until the byte is full
    let mut result = value << (8 - bits);
    let mut filled = bits;
    while filled < 8 {
        result |= result >> filled;
        filled *= 2;
    }
    result
}

/// A luma/chroma color in the BT.601 full range convention.
///
/// `y` is in `0..=1`, `cb` and `cr` are in `-0.5..=0.5`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YCbCr {
    pub y: f32,
    pub cb: f32,
    pub cr: f32,
}
impl YCbCr {
    pub fn from_rgb24(color: Rgb24) -> Self {
        let r = color.r as f32 / 255.0;
        let g = color.g as f32 / 255.0;
        let b = color.b as f32 / 255.0;

        Self {
            y: 0.299 * r + 0.587 * g + 0.114 * b,
            cb: -0.168736 * r - 0.331264 * g + 0.5 * b,
            cr: 0.5 * r - 0.418688 * g - 0.081312 * b,
        }
    }

    pub fn to_rgb24(self) -> Rgb24 {
        let r = self.y + 1.402 * self.cr;
        let g = self.y - 0.344136 * self.cb - 0.714136 * self.cr;
        let b = self.y + 1.772 * self.cb;

        let to_u8 = |v: f32| (v * 255.0 + 0.5).clamp(0.0, 255.0) as u8;
        Rgb24::new(to_u8(r), to_u8(g), to_u8(b))
    }

    /// The luma as an 8-bit value, rounded to nearest.
    pub fn luma_u8(self) -> u8 {
        (self.y * 255.0 + 0.5).clamp(0.0, 255.0) as u8
    }
}
