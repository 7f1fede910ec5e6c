//! Static data for the BC7 encoder and decoder.

/// The assignment of the 16 pixels of a block to up to 3 subsets.
///
/// Subset indexes are stored as 2 bits per pixel in a `u32`, pixel 0 in the
/// least significant bits. Each subset has an anchor pixel whose index has
/// an implicit most significant bit of 0. The anchor of subset 0 is always
/// pixel 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Partition {
    subsets: u32,
    anchors: [u8; 3],
}
impl Partition {
    const fn new(subsets: u32, anchors: [u8; 3]) -> Self {
        Self { subsets, anchors }
    }

    #[inline(always)]
    pub const fn subset(self, pixel: usize) -> usize {
        debug_assert!(pixel < 16);
        ((self.subsets >> (pixel * 2)) & 0b11) as usize
    }

    #[inline(always)]
    pub const fn anchor(self, subset: usize) -> usize {
        self.anchors[subset] as usize
    }

    /// Whether the index of the given pixel is stored with one bit less.
    #[inline]
    pub const fn is_anchor(self, pixel: usize) -> bool {
        self.anchor(self.subset(pixel)) == pixel
    }

    /// The pixels of the given subset in ascending order.
    pub fn members(self, subset: usize) -> impl Iterator<Item = usize> {
        (0..16).filter(move |&pixel| self.subset(pixel) == subset)
    }
}

/// The partition of modes without subsets.
pub(crate) const SINGLE_SUBSET: Partition = Partition::new(0, [0, 0, 0]);

/// Returns the partition with the given id for a mode with `subsets` subsets.
pub(crate) fn get_partition(subsets: u8, id: u8) -> Partition {
    match subsets {
        1 => SINGLE_SUBSET,
        2 => PARTITIONS_2[id as usize],
        3 => PARTITIONS_3[id as usize],
        _ => unreachable!("BC7 modes have 1 to 3 subsets"),
    }
}

pub(crate) const WEIGHTS_2: [u8; 4] = [0, 21, 43, 64];
pub(crate) const WEIGHTS_3: [u8; 8] = [0, 9, 18, 27, 37, 46, 55, 64];
pub(crate) const WEIGHTS_4: [u8; 16] = [0, 4, 9, 13, 17, 21, 26, 30, 34, 38, 43, 47, 51, 55, 60, 64];

/// The interpolation weights (out of 64) for indexes of the given bit count.
pub(crate) const fn get_weights(index_bits: u8) -> &'static [u8] {
    match index_bits {
        2 => &WEIGHTS_2,
        3 => &WEIGHTS_3,
        4 => &WEIGHTS_4,
        _ => panic!("BC7 indexes are 2 to 4 bits"),
    }
}

/// Interpolates between two endpoint channel values with a weight out of 64.
#[inline(always)]
pub(crate) fn interpolate(e0: u8, e1: u8, weight: u8) -> u8 {
    debug_assert!(weight <= 64);
    (((64 - weight as u32) * e0 as u32 + weight as u32 * e1 as u32 + 32) >> 6) as u8
}

pub(crate) const PARTITIONS_2: [Partition; 64] = [
    Partition::new(0x50505050, [0, 15, 0]),
    Partition::new(0x40404040, [0, 15, 0]),
    Partition::new(0x54545454, [0, 15, 0]),
    Partition::new(0x54505040, [0, 15, 0]),
    Partition::new(0x50404000, [0, 15, 0]),
    Partition::new(0x55545450, [0, 15, 0]),
    Partition::new(0x55545040, [0, 15, 0]),
    Partition::new(0x54504000, [0, 15, 0]),
    Partition::new(0x50400000, [0, 15, 0]),
    Partition::new(0x55555450, [0, 15, 0]),
    Partition::new(0x55544000, [0, 15, 0]),
    Partition::new(0x54400000, [0, 15, 0]),
    Partition::new(0x55555440, [0, 15, 0]),
    Partition::new(0x55550000, [0, 15, 0]),
    Partition::new(0x55555500, [0, 15, 0]),
    Partition::new(0x55000000, [0, 15, 0]),
    Partition::new(0x55150100, [0, 15, 0]),
    Partition::new(0x00004054, [0, 2, 0]),
    Partition::new(0x15010000, [0, 8, 0]),
    Partition::new(0x00405054, [0, 2, 0]),
    Partition::new(0x00004050, [0, 2, 0]),
    Partition::new(0x15050100, [0, 8, 0]),
    Partition::new(0x05010000, [0, 8, 0]),
    Partition::new(0x40505054, [0, 15, 0]),
    Partition::new(0x00404050, [0, 2, 0]),
    Partition::new(0x05010100, [0, 8, 0]),
    Partition::new(0x14141414, [0, 2, 0]),
    Partition::new(0x05141450, [0, 2, 0]),
    Partition::new(0x01155440, [0, 8, 0]),
    Partition::new(0x00555500, [0, 8, 0]),
    Partition::new(0x15014054, [0, 2, 0]),
    Partition::new(0x05414150, [0, 2, 0]),
    Partition::new(0x44444444, [0, 15, 0]),
    Partition::new(0x55005500, [0, 15, 0]),
    Partition::new(0x11441144, [0, 6, 0]),
    Partition::new(0x05055050, [0, 8, 0]),
    Partition::new(0x05500550, [0, 2, 0]),
    Partition::new(0x11114444, [0, 8, 0]),
    Partition::new(0x41144114, [0, 15, 0]),
    Partition::new(0x44111144, [0, 15, 0]),
    Partition::new(0x15055054, [0, 2, 0]),
    Partition::new(0x01055040, [0, 8, 0]),
    Partition::new(0x05041050, [0, 2, 0]),
    Partition::new(0x05455150, [0, 2, 0]),
    Partition::new(0x14414114, [0, 2, 0]),
    Partition::new(0x50050550, [0, 15, 0]),
    Partition::new(0x41411414, [0, 15, 0]),
    Partition::new(0x00141400, [0, 6, 0]),
    Partition::new(0x00041504, [0, 6, 0]),
    Partition::new(0x00105410, [0, 2, 0]),
    Partition::new(0x10541000, [0, 6, 0]),
    Partition::new(0x04150400, [0, 8, 0]),
    Partition::new(0x50410514, [0, 15, 0]),
    Partition::new(0x41051450, [0, 15, 0]),
    Partition::new(0x05415014, [0, 2, 0]),
    Partition::new(0x14054150, [0, 2, 0]),
    Partition::new(0x41050514, [0, 15, 0]),
    Partition::new(0x41505014, [0, 15, 0]),
    Partition::new(0x40011554, [0, 15, 0]),
    Partition::new(0x54150140, [0, 15, 0]),
    Partition::new(0x50505500, [0, 15, 0]),
    Partition::new(0x00555050, [0, 2, 0]),
    Partition::new(0x15151010, [0, 2, 0]),
    Partition::new(0x54540404, [0, 15, 0]),
];
pub(crate) const PARTITIONS_3: [Partition; 64] = [
    Partition::new(0xAA685050, [0, 3, 15]),
    Partition::new(0x6A5A5040, [0, 3, 8]),
    Partition::new(0x5A5A4200, [0, 15, 8]),
    Partition::new(0x5450A0A8, [0, 15, 3]),
    Partition::new(0xA5A50000, [0, 8, 15]),
    Partition::new(0xA0A05050, [0, 3, 15]),
    Partition::new(0x5555A0A0, [0, 15, 3]),
    Partition::new(0x5A5A5050, [0, 15, 8]),
    Partition::new(0xAA550000, [0, 8, 15]),
    Partition::new(0xAA555500, [0, 8, 15]),
    Partition::new(0xAAAA5500, [0, 6, 15]),
    Partition::new(0x90909090, [0, 6, 15]),
    Partition::new(0x94949494, [0, 6, 15]),
    Partition::new(0xA4A4A4A4, [0, 5, 15]),
    Partition::new(0xA9A59450, [0, 3, 15]),
    Partition::new(0x2A0A4250, [0, 3, 8]),
    Partition::new(0xA5945040, [0, 3, 15]),
    Partition::new(0x0A425054, [0, 3, 8]),
    Partition::new(0xA5A5A500, [0, 8, 15]),
    Partition::new(0x55A0A0A0, [0, 15, 3]),
    Partition::new(0xA8A85454, [0, 3, 15]),
    Partition::new(0x6A6A4040, [0, 3, 8]),
    Partition::new(0xA4A45000, [0, 6, 15]),
    Partition::new(0x1A1A0500, [0, 10, 8]),
    Partition::new(0x0050A4A4, [0, 5, 3]),
    Partition::new(0xAAA59090, [0, 8, 15]),
    Partition::new(0x14696914, [0, 8, 6]),
    Partition::new(0x69691400, [0, 6, 10]),
    Partition::new(0xA08585A0, [0, 8, 15]),
    Partition::new(0xAA821414, [0, 5, 15]),
    Partition::new(0x50A4A450, [0, 15, 10]),
    Partition::new(0x6A5A0200, [0, 15, 8]),
    Partition::new(0xA9A58000, [0, 8, 15]),
    Partition::new(0x5090A0A8, [0, 15, 3]),
    Partition::new(0xA8A09050, [0, 3, 15]),
    Partition::new(0x24242424, [0, 5, 10]),
    Partition::new(0x00AA5500, [0, 6, 10]),
    Partition::new(0x24924924, [0, 10, 8]),
    Partition::new(0x24499224, [0, 8, 9]),
    Partition::new(0x50A50A50, [0, 15, 10]),
    Partition::new(0x500AA550, [0, 15, 6]),
    Partition::new(0xAAAA4444, [0, 3, 15]),
    Partition::new(0x66660000, [0, 15, 8]),
    Partition::new(0xA5A0A5A0, [0, 5, 15]),
    Partition::new(0x50A050A0, [0, 15, 3]),
    Partition::new(0x69286928, [0, 15, 6]),
    Partition::new(0x44AAAA44, [0, 15, 6]),
    Partition::new(0x66666600, [0, 15, 8]),
    Partition::new(0xAA444444, [0, 3, 15]),
    Partition::new(0x54A854A8, [0, 15, 3]),
    Partition::new(0x95809580, [0, 5, 15]),
    Partition::new(0x96969600, [0, 5, 15]),
    Partition::new(0xA85454A8, [0, 5, 15]),
    Partition::new(0x80959580, [0, 8, 15]),
    Partition::new(0xAA141414, [0, 5, 15]),
    Partition::new(0x96960000, [0, 10, 15]),
    Partition::new(0xAAAA1414, [0, 5, 15]),
    Partition::new(0xA05050A0, [0, 10, 15]),
    Partition::new(0xA0A5A5A0, [0, 8, 15]),
    Partition::new(0x96000000, [0, 13, 15]),
    Partition::new(0x40804080, [0, 15, 3]),
    Partition::new(0xA9A8A9A8, [0, 12, 15]),
    Partition::new(0xAAAAAA44, [0, 3, 15]),
    Partition::new(0x2A4A5254, [0, 3, 8]),
];
