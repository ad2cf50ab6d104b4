#![forbid(unsafe_code)]

/// Null channel for a block: one bit per position, set when the position is null.
///
/// Bits are stored little-endian within each `u64` word:
/// - bit 0 is the LSB of word 0
/// - bit 63 is the MSB of word 0
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NullBits {
    words: Vec<u64>,
    len: usize,
    nulls: usize,
}

impl NullBits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(positions: usize) -> Self {
        Self {
            words: Vec::with_capacity(positions.div_ceil(64)),
            len: 0,
            nulls: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, is_null: bool) {
        let bit = self.len % 64;
        if bit == 0 {
            self.words.push(0);
        }

        if is_null {
            let word = self.len / 64;
            self.words[word] |= 1u64 << bit;
            self.nulls += 1;
        }

        self.len += 1;
    }

    pub fn is_null(&self, position: usize) -> bool {
        debug_assert!(position < self.len, "NullBits position out of bounds");
        let word = self.words[position / 64];
        ((word >> (position % 64)) & 1) == 1
    }

    /// Number of null positions.
    pub fn null_count(&self) -> usize {
        self.nulls
    }

    pub fn has_nulls(&self) -> bool {
        self.nulls > 0
    }

    pub fn size_in_bytes(&self) -> usize {
        self.words.len() * std::mem::size_of::<u64>()
    }
}
