//! Bit-level access to 128-bit blocks.
//!
//! Every block format is a little-endian bit string. A 128-bit block is kept
//! as two 64-bit words, `low` holding bits 0..64 and `high` holding bits
//! 64..128. 64-bit blocks simply use `high = 0`.

/// Reads `count` bits starting at bit `offset`, right-aligned.
///
/// Fields may straddle the boundary between `low` and `high`.
///
/// # Panics
///
/// If `count > 32` or `offset + count > 128`.
#[inline]
pub(crate) fn extract(low: u64, high: u64, offset: u32, count: u32) -> u32 {
    check_range(offset, count);
    if count == 0 {
        return 0;
    }

    let value = join(low, high) >> offset;
    (value & mask(count)) as u32
}

/// Writes the low `count` bits of `value` at bit `offset`, leaving all other
/// bits untouched.
///
/// # Panics
///
/// If `count > 32` or `offset + count > 128`.
#[inline]
pub(crate) fn store(low: &mut u64, high: &mut u64, offset: u32, count: u32, value: u32) {
    check_range(offset, count);
    if count == 0 {
        return;
    }

    let field = mask(count) << offset;
    let mut data = join(*low, *high);
    data = (data & !field) | ((value as u128) << offset & field);
    *low = data as u64;
    *high = (data >> 64) as u64;
}

#[inline(always)]
fn check_range(offset: u32, count: u32) {
    assert!(count <= 32, "bit field of {count} bits is too wide");
    assert!(
        offset + count <= 128,
        "bit field {offset}..{} is out of bounds",
        offset + count
    );
}
#[inline(always)]
fn join(low: u64, high: u64) -> u128 {
    (low as u128) | ((high as u128) << 64)
}
#[inline(always)]
fn mask(count: u32) -> u128 {
    (1_u128 << count) - 1
}

/// A 128-bit block split into its two little-endian words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Bits128 {
    pub low: u64,
    pub high: u64,
}
impl Bits128 {
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        let value = u128::from_le_bytes(bytes);
        Self {
            low: value as u64,
            high: (value >> 64) as u64,
        }
    }
    pub fn to_bytes(self) -> [u8; 16] {
        join(self.low, self.high).to_le_bytes()
    }

    #[inline]
    pub fn get(&self, offset: u32, count: u32) -> u32 {
        extract(self.low, self.high, offset, count)
    }
    #[inline]
    pub fn set(&mut self, offset: u32, count: u32, value: u32) {
        store(&mut self.low, &mut self.high, offset, count, value)
    }
}

/// Reads consecutive fields from a block, starting at bit 0.
pub(crate) struct BitReader {
    bits: Bits128,
    offset: u32,
}
impl BitReader {
    pub fn new(block: [u8; 16]) -> Self {
        Self {
            bits: Bits128::from_bytes(block),
            offset: 0,
        }
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    #[inline]
    pub fn read(&mut self, count: u8) -> u8 {
        debug_assert!(count <= 8);
        self.read_u32(count) as u8
    }
    #[inline]
    pub fn read_u32(&mut self, count: u8) -> u32 {
        let value = self.bits.get(self.offset, count as u32);
        self.offset += count as u32;
        value
    }
    pub fn skip(&mut self, count: u8) {
        self.offset += count as u32;
    }
}

/// Writes consecutive fields into a block, starting at bit 0.
pub(crate) struct BitWriter {
    bits: Bits128,
    offset: u32,
}
impl BitWriter {
    pub fn new() -> Self {
        Self {
            bits: Bits128::default(),
            offset: 0,
        }
    }

    #[inline]
    pub fn write(&mut self, count: u8, value: u32) {
        debug_assert!(count == 32 || value < (1 << count));
        self.bits.set(self.offset, count as u32, value);
        self.offset += count as u32;
    }

    pub fn finish(self) -> [u8; 16] {
        debug_assert!(self.offset == 128);
        self.bits.to_bytes()
    }
}
