//! BC7 block layout and decoder.
//!
//! All eight modes share one field order: the unary mode prefix, the
//! partition id, the rotation, the index selector, the endpoint values
//! (channel by channel, all endpoints of one channel before the next
//! channel), the p-bits and finally one or two index fields. The modes only
//! differ in the widths of these fields.

use crate::{
    bcn_data::{get_partition, get_weights, interpolate, Partition},
    bits::{BitReader, BitWriter},
    color::expand,
    Rgba32, Tile,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PBits {
    None,
    /// One p-bit per subset, shared by both endpoints.
    Shared,
    /// One p-bit per endpoint.
    Unique,
}

/// The field widths of one BC7 mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ModeInfo {
    pub subsets: u8,
    pub partition_bits: u8,
    pub rotation_bits: u8,
    pub index_mode_bits: u8,
    /// Stored bits per color channel, not counting the p-bit.
    pub color_bits: u8,
    /// Stored bits of alpha, not counting the p-bit. 0 means no alpha.
    pub alpha_bits: u8,
    pub p_bits: PBits,
    pub index_bits: u8,
    /// Bits per index of the second index field. 0 means there is none.
    pub index_bits_2: u8,
}
impl ModeInfo {
    const fn new(
        subsets: u8,
        partition_bits: u8,
        rotation_bits: u8,
        index_mode_bits: u8,
        color_bits: u8,
        alpha_bits: u8,
        p_bits: PBits,
        index_bits: u8,
        index_bits_2: u8,
    ) -> Self {
        Self {
            subsets,
            partition_bits,
            rotation_bits,
            index_mode_bits,
            color_bits,
            alpha_bits,
            p_bits,
            index_bits,
            index_bits_2,
        }
    }

    pub const fn has_p_bits(&self) -> bool {
        !matches!(self.p_bits, PBits::None)
    }
    /// Whether alpha is stored as part of the endpoints.
    pub const fn has_alpha(&self) -> bool {
        self.alpha_bits > 0
    }
    /// Whether color and alpha are interpolated with separate indices.
    pub const fn has_separate_alpha(&self) -> bool {
        self.index_bits_2 > 0
    }
}

pub(crate) const MODES: [ModeInfo; 8] = [
    ModeInfo::new(3, 4, 0, 0, 4, 0, PBits::Unique, 3, 0),
    ModeInfo::new(2, 6, 0, 0, 6, 0, PBits::Shared, 3, 0),
    ModeInfo::new(3, 6, 0, 0, 5, 0, PBits::None, 2, 0),
    ModeInfo::new(2, 6, 0, 0, 7, 0, PBits::Unique, 2, 0),
    ModeInfo::new(1, 0, 2, 1, 5, 6, PBits::None, 2, 3),
    ModeInfo::new(1, 0, 2, 0, 7, 8, PBits::None, 2, 2),
    ModeInfo::new(1, 0, 0, 0, 7, 7, PBits::Unique, 4, 0),
    ModeInfo::new(2, 6, 0, 0, 5, 5, PBits::Unique, 2, 0),
];

/// The stored fields of a BC7 block.
///
/// Endpoints and p-bits are indexed by `2 * subset + i`. Endpoint values are
/// stored values without their p-bit. For shared p-bits, both endpoints of a
/// subset hold the same p-bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Bc7Fields {
    pub mode: u8,
    pub partition: u8,
    pub rotation: u8,
    pub index_mode: u8,
    pub endpoints: [[u8; 4]; 6],
    pub p_bits: [u8; 6],
    pub indices: [u8; 16],
    pub indices_2: [u8; 16],
}
impl Bc7Fields {
    pub fn info(&self) -> &'static ModeInfo {
        &MODES[self.mode as usize]
    }
    pub fn partition(&self) -> Partition {
        get_partition(self.info().subsets, self.partition)
    }

    /// Reads the fields of a block. Returns `None` for the reserved mode 8.
    pub fn unpack(block: [u8; 16]) -> Option<Self> {
        let mode = block[0].trailing_zeros() as u8;
        if mode >= 8 {
            return None;
        }

        let info = &MODES[mode as usize];
        let mut reader = BitReader::new(block);
        reader.skip(mode + 1);

        let mut fields = Self {
            mode,
            partition: reader.read(info.partition_bits),
            rotation: reader.read(info.rotation_bits),
            index_mode: reader.read(info.index_mode_bits),
            ..Self::default()
        };

        let endpoint_count = info.subsets as usize * 2;
        for channel in 0..3 {
            for endpoint in &mut fields.endpoints[..endpoint_count] {
                endpoint[channel] = reader.read(info.color_bits);
            }
        }
        for endpoint in &mut fields.endpoints[..endpoint_count] {
            endpoint[3] = reader.read(info.alpha_bits);
        }

        match info.p_bits {
            PBits::None => {}
            PBits::Shared => {
                for subset in 0..info.subsets as usize {
                    let p = reader.read(1);
                    fields.p_bits[subset * 2] = p;
                    fields.p_bits[subset * 2 + 1] = p;
                }
            }
            PBits::Unique => {
                for p in &mut fields.p_bits[..endpoint_count] {
                    *p = reader.read(1);
                }
            }
        }

        let partition = fields.partition();
        for (pixel, index) in fields.indices.iter_mut().enumerate() {
            let bits = info.index_bits - partition.is_anchor(pixel) as u8;
            *index = reader.read(bits);
        }
        if info.has_separate_alpha() {
            for (pixel, index) in fields.indices_2.iter_mut().enumerate() {
                let bits = info.index_bits_2 - (pixel == 0) as u8;
                *index = reader.read(bits);
            }
        }

        debug_assert_eq!(reader.offset(), 128);
        Some(fields)
    }

    /// Writes the fields into a block.
    ///
    /// The most significant bit of every anchor index must be 0.
    pub fn pack(&self) -> [u8; 16] {
        let info = self.info();
        let mut writer = BitWriter::new();

        writer.write(self.mode + 1, 1 << self.mode);
        writer.write(info.partition_bits, self.partition as u32);
        writer.write(info.rotation_bits, self.rotation as u32);
        writer.write(info.index_mode_bits, self.index_mode as u32);

        let endpoint_count = info.subsets as usize * 2;
        for channel in 0..3 {
            for endpoint in &self.endpoints[..endpoint_count] {
                writer.write(info.color_bits, endpoint[channel] as u32);
            }
        }
        for endpoint in &self.endpoints[..endpoint_count] {
            writer.write(info.alpha_bits, endpoint[3] as u32);
        }

        match info.p_bits {
            PBits::None => {}
            PBits::Shared => {
                for subset in 0..info.subsets as usize {
                    writer.write(1, self.p_bits[subset * 2] as u32);
                }
            }
            PBits::Unique => {
                for &p in &self.p_bits[..endpoint_count] {
                    writer.write(1, p as u32);
                }
            }
        }

        let partition = self.partition();
        for (pixel, &index) in self.indices.iter().enumerate() {
            let bits = info.index_bits - partition.is_anchor(pixel) as u8;
            debug_assert!(index < 1 << bits, "anchor index {index} has its MSB set");
            writer.write(bits, index as u32);
        }
        if info.has_separate_alpha() {
            for (pixel, &index) in self.indices_2.iter().enumerate() {
                let bits = info.index_bits_2 - (pixel == 0) as u8;
                debug_assert!(index < 1 << bits, "anchor index {index} has its MSB set");
                writer.write(bits, index as u32);
            }
        }

        writer.finish()
    }

    /// The 8-bit RGBA value of the endpoint `2 * subset + i`.
    pub fn endpoint_color(&self, endpoint: usize) -> [u8; 4] {
        unquantize_endpoint(self.info(), self.endpoints[endpoint], self.p_bits[endpoint])
    }

    /// Reconstructs the 16 pixels of the block.
    pub fn decode(&self) -> Tile {
        let info = self.info();
        let partition = self.partition();

        let mut colors = [[0_u8; 4]; 6];
        for (i, color) in colors.iter_mut().enumerate().take(info.subsets as usize * 2) {
            *color = self.endpoint_color(i);
        }

        let (color_indices, color_bits, alpha_indices, alpha_bits) =
            match (info.has_separate_alpha(), self.index_mode) {
                (false, _) => (&self.indices, info.index_bits, &self.indices, info.index_bits),
                (true, 0) => (
                    &self.indices,
                    info.index_bits,
                    &self.indices_2,
                    info.index_bits_2,
                ),
                (true, _) => (
                    &self.indices_2,
                    info.index_bits_2,
                    &self.indices,
                    info.index_bits,
                ),
            };
        let color_weights = get_weights(color_bits);
        let alpha_weights = get_weights(alpha_bits);

        let mut output = [Rgba32::TRANSPARENT; 16];
        for (pixel, out) in output.iter_mut().enumerate() {
            let subset = partition.subset(pixel);
            let e0 = colors[subset * 2];
            let e1 = colors[subset * 2 + 1];

            let w = color_weights[color_indices[pixel] as usize];
            let wa = alpha_weights[alpha_indices[pixel] as usize];

            let mut rgba = [
                interpolate(e0[0], e1[0], w),
                interpolate(e0[1], e1[1], w),
                interpolate(e0[2], e1[2], w),
                interpolate(e0[3], e1[3], wa),
            ];
            if self.rotation > 0 {
                rgba.swap(3, self.rotation as usize - 1);
            }
            *out = Rgba32::from_array(rgba);
        }

        output
    }
}

/// Expands stored endpoint values of the given mode to 8 bits per channel.
///
/// Alpha is 255 for modes without alpha.
pub(crate) fn unquantize_endpoint(info: &ModeInfo, stored: [u8; 4], p_bit: u8) -> [u8; 4] {
    let widen = |value: u8, bits: u8| {
        if info.has_p_bits() {
            expand(value << 1 | p_bit, bits + 1)
        } else {
            expand(value, bits)
        }
    };

    [
        widen(stored[0], info.color_bits),
        widen(stored[1], info.color_bits),
        widen(stored[2], info.color_bits),
        if info.has_alpha() {
            widen(stored[3], info.alpha_bits)
        } else {
            255
        },
    ]
}

/// Decodes a BC7 block. Returns `None` for blocks of the reserved mode 8.
pub(crate) fn decode_bc7_block(block: [u8; 16]) -> Option<Tile> {
    let fields = Bc7Fields::unpack(block)?;
    let tile = fields.decode();
    log::trace!("BC7 mode {} block", fields.mode);
    Some(tile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_fill_128_bits() {
        for (mode, info) in MODES.iter().enumerate() {
            let endpoints = info.subsets as u32 * 2;
            let p_bits = match info.p_bits {
                PBits::None => 0,
                PBits::Shared => info.subsets as u32,
                PBits::Unique => endpoints,
            };
            let indices_2 = if info.index_bits_2 > 0 {
                info.index_bits_2 as u32 * 16 - 1
            } else {
                0
            };
            let total = mode as u32
                + 1
                + info.partition_bits as u32
                + info.rotation_bits as u32
                + info.index_mode_bits as u32
                + endpoints * (3 * info.color_bits as u32 + info.alpha_bits as u32)
                + p_bits
                + info.index_bits as u32 * 16
                - info.subsets as u32
                + indices_2;
            assert_eq!(total, 128, "mode {mode}");
        }
    }

    #[test]
    fn reserved_mode() {
        assert_eq!(decode_bc7_block([0; 16]), None);

        let mut block = [0xFF; 16];
        block[0] = 0;
        assert_eq!(Bc7Fields::unpack(block), None);
    }

    #[test]
    fn mode_6_layout() {
        let mut writer = BitWriter::new();
        writer.write(7, 0b100_0000);
        for value in [0x7F, 0, 0, 0x7F, 0x40, 0x40, 0x7F, 0x7F] {
            writer.write(7, value);
        }
        writer.write(1, 1);
        writer.write(1, 0);
        writer.write(3, 0);
        for _ in 1..16 {
            writer.write(4, 15);
        }
        let block = writer.finish();
        assert_eq!(block[0], 0x40 | 0x80);

        let tile = decode_bc7_block(block).unwrap();
        assert_eq!(tile[0], Rgba32::new(255, 1, 129, 255));
        for pixel in &tile[1..] {
            assert_eq!(*pixel, Rgba32::new(0, 254, 128, 254));
        }
    }

    #[test]
    fn mode_4_rotation_and_index_mode() {
        let mut fields = Bc7Fields {
            mode: 4,
            rotation: 1,
            index_mode: 0,
            ..Default::default()
        };
        fields.endpoints[0] = [31, 0, 0, 0];
        fields.endpoints[1] = [0, 0, 31, 63];
        fields.indices_2 = [3; 16];
        fields.indices_2[0] = 0;

        let block = fields.pack();
        assert_eq!(Bc7Fields::unpack(block), Some(fields));

        let tile = decode_bc7_block(block).unwrap();
        // red and alpha are swapped
        assert_eq!(tile[0], Rgba32::new(0, 0, 0, 255));
        assert_eq!(tile[1], Rgba32::new(108, 0, 0, 255));

        // with the index selector set, color uses the 3-bit indices
        fields.index_mode = 1;
        let tile = Bc7Fields::unpack(fields.pack()).unwrap().decode();
        let w = get_weights(3)[3];
        assert_eq!(
            tile[1],
            Rgba32::new(0, 0, interpolate(0, 255, w), interpolate(255, 0, w))
        );
    }

    #[test]
    fn pack_unpack_partitioned_modes() {
        for mode in [0_u8, 1, 2, 3, 7] {
            let info = &MODES[mode as usize];
            let mut fields = Bc7Fields {
                mode,
                partition: 13,
                ..Default::default()
            };
            let color_max = (1 << info.color_bits) - 1;
            let alpha_max = ((1_u16 << info.alpha_bits) - 1) as u8;
            for (i, endpoint) in fields.endpoints[..info.subsets as usize * 2]
                .iter_mut()
                .enumerate()
            {
                let v = (i as u8 * 5 + 3) & color_max;
                *endpoint = [v, color_max - v, v / 2, alpha_max];
            }
            if info.has_p_bits() {
                fields.p_bits = match info.p_bits {
                    PBits::Shared => [1, 1, 0, 0, 0, 0],
                    _ => [1, 0, 1, 1, 0, 1],
                };
                for p in &mut fields.p_bits[info.subsets as usize * 2..] {
                    *p = 0;
                }
            }

            let partition = fields.partition();
            let index_max = (1 << info.index_bits) - 1;
            for (pixel, index) in fields.indices.iter_mut().enumerate() {
                *index = if partition.is_anchor(pixel) {
                    index_max >> 1
                } else {
                    (pixel as u8 * 3) & index_max
                };
            }

            let block = fields.pack();
            assert_eq!(block[0].trailing_zeros(), mode as u32);
            assert_eq!(Bc7Fields::unpack(block), Some(fields), "mode {mode}");
        }
    }

    #[test]
    fn modes_without_alpha_are_opaque() {
        let fields = Bc7Fields {
            mode: 2,
            partition: 5,
            ..Default::default()
        };
        let tile = Bc7Fields::unpack(fields.pack()).unwrap().decode();
        assert_eq!(tile, [Rgba32::new(0, 0, 0, 255); 16]);
    }
}
