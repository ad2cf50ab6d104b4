#![forbid(unsafe_code)]

use crate::bitmap::NullBits;
use crate::error::PageError;
use crate::flat::{SIZE_OF_INT, SIZE_OF_LONG};

/// Page budget used when a builder is created without a [`BlockBuilderStatus`].
pub const DEFAULT_MAX_PAGE_SIZE_IN_BYTES: usize = 1024 * 1024;

const FIXED12_SIZE: usize = SIZE_OF_LONG + SIZE_OF_INT;
// Each position also pays one byte for its null flag.
const NULL_FLAG_SIZE: usize = 1;

/// Per-page sizing configuration handed to block builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockBuilderStatus {
    pub max_page_size_bytes: usize,
}

impl Default for BlockBuilderStatus {
    fn default() -> Self {
        Self {
            max_page_size_bytes: DEFAULT_MAX_PAGE_SIZE_IN_BYTES,
        }
    }
}

/// Physical slot layout of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// One 8-byte slot per position.
    LongArray,
    /// One 12-byte slot per position (8-byte long followed by a 4-byte int).
    Fixed12,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LongArrayBlock {
    values: Vec<i64>,
    nulls: Option<NullBits>,
}

impl LongArrayBlock {
    pub fn position_count(&self) -> usize {
        self.values.len()
    }

    pub fn is_null(&self, position: usize) -> bool {
        self.nulls.as_ref().is_some_and(|n| n.is_null(position))
    }

    pub fn get_long(&self, position: usize) -> i64 {
        self.values[position]
    }
}

/// Fixed 12-byte slots stored as three `i32` words per position.
///
/// Word layout per position: low half of the long, high half of the long, then the int.
#[derive(Clone, Debug, PartialEq)]
pub struct Fixed12Block {
    values: Vec<i32>,
    nulls: Option<NullBits>,
}

impl Fixed12Block {
    pub fn position_count(&self) -> usize {
        self.values.len() / 3
    }

    pub fn is_null(&self, position: usize) -> bool {
        self.nulls.as_ref().is_some_and(|n| n.is_null(position))
    }

    pub fn get_fixed12_first(&self, position: usize) -> i64 {
        decode_fixed12_first(&self.values, position)
    }

    pub fn get_fixed12_second(&self, position: usize) -> i32 {
        self.values[position * 3 + 2]
    }
}

fn encode_fixed12(first: i64, second: i32, values: &mut Vec<i32>) {
    values.push(first as i32);
    values.push((first >> 32) as i32);
    values.push(second);
}

fn decode_fixed12_first(values: &[i32], position: usize) -> i64 {
    let index = position * 3;
    let low = values[index] as u32 as i64;
    let high = values[index + 1] as i64;
    (high << 32) | low
}

/// A column of values for one page, addressed by position.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    LongArray(LongArrayBlock),
    Fixed12(Fixed12Block),
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::LongArray(_) => BlockKind::LongArray,
            Block::Fixed12(_) => BlockKind::Fixed12,
        }
    }

    pub fn position_count(&self) -> usize {
        match self {
            Block::LongArray(b) => b.position_count(),
            Block::Fixed12(b) => b.position_count(),
        }
    }

    pub fn is_null(&self, position: usize) -> bool {
        match self {
            Block::LongArray(b) => b.is_null(position),
            Block::Fixed12(b) => b.is_null(position),
        }
    }

    /// Read the 8-byte value stored at byte `offset` within the slot at `position`.
    ///
    /// # Panics
    ///
    /// If the slot has no long at `offset`.
    pub fn get_long(&self, position: usize, offset: usize) -> i64 {
        match (self, offset) {
            (Block::LongArray(b), 0) => b.get_long(position),
            (Block::Fixed12(b), 0) => b.get_fixed12_first(position),
            (block, offset) => panic!("{:?} block has no long at offset {offset}", block.kind()),
        }
    }

    /// Read the 4-byte value stored at byte `offset` within the slot at `position`.
    ///
    /// # Panics
    ///
    /// If the slot has no int at `offset`.
    pub fn get_int(&self, position: usize, offset: usize) -> i32 {
        match (self, offset) {
            (Block::Fixed12(b), SIZE_OF_LONG) => b.get_fixed12_second(position),
            (block, offset) => panic!("{:?} block has no int at offset {offset}", block.kind()),
        }
    }

    pub fn size_in_bytes(&self) -> usize {
        let (slot, nulls) = match self {
            Block::LongArray(b) => (SIZE_OF_LONG, &b.nulls),
            Block::Fixed12(b) => (FIXED12_SIZE, &b.nulls),
        };
        self.position_count() * slot + nulls.as_ref().map_or(0, NullBits::size_in_bytes)
    }
}

#[derive(Clone, Debug)]
pub struct LongArrayBlockBuilder {
    status: Option<BlockBuilderStatus>,
    expected_entries: usize,
    values: Vec<i64>,
    nulls: NullBits,
}

impl LongArrayBlockBuilder {
    pub fn new(status: Option<BlockBuilderStatus>, expected_entries: usize) -> Self {
        Self {
            status,
            expected_entries,
            values: Vec::with_capacity(expected_entries),
            nulls: NullBits::with_capacity(expected_entries),
        }
    }

    pub fn write_long(&mut self, value: i64) {
        self.values.push(value);
        self.nulls.push(false);
    }

    pub fn append_null(&mut self) {
        self.values.push(0);
        self.nulls.push(true);
    }

    pub fn position_count(&self) -> usize {
        self.values.len()
    }

    pub fn build(self) -> LongArrayBlock {
        LongArrayBlock {
            values: self.values,
            nulls: self.nulls.has_nulls().then_some(self.nulls),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Fixed12BlockBuilder {
    status: Option<BlockBuilderStatus>,
    expected_entries: usize,
    values: Vec<i32>,
    nulls: NullBits,
}

impl Fixed12BlockBuilder {
    pub fn new(status: Option<BlockBuilderStatus>, expected_entries: usize) -> Self {
        Self {
            status,
            expected_entries,
            values: Vec::with_capacity(expected_entries * 3),
            nulls: NullBits::with_capacity(expected_entries),
        }
    }

    pub fn write_fixed12(&mut self, first: i64, second: i32) {
        encode_fixed12(first, second, &mut self.values);
        self.nulls.push(false);
    }

    pub fn append_null(&mut self) {
        encode_fixed12(0, 0, &mut self.values);
        self.nulls.push(true);
    }

    pub fn position_count(&self) -> usize {
        self.values.len() / 3
    }

    pub fn build(self) -> Fixed12Block {
        Fixed12Block {
            values: self.values,
            nulls: self.nulls.has_nulls().then_some(self.nulls),
        }
    }
}

/// Append-only builder producing a [`Block`].
#[derive(Clone, Debug)]
pub enum BlockBuilder {
    LongArray(LongArrayBlockBuilder),
    Fixed12(Fixed12BlockBuilder),
}

impl BlockBuilder {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockBuilder::LongArray(_) => BlockKind::LongArray,
            BlockBuilder::Fixed12(_) => BlockKind::Fixed12,
        }
    }

    pub fn append_null(&mut self) {
        match self {
            BlockBuilder::LongArray(b) => b.append_null(),
            BlockBuilder::Fixed12(b) => b.append_null(),
        }
    }

    /// # Panics
    ///
    /// If this is not a [`BlockKind::LongArray`] builder.
    pub fn write_long(&mut self, value: i64) {
        match self {
            BlockBuilder::LongArray(b) => b.write_long(value),
            other => panic!("cannot write a long into a {:?} block builder", other.kind()),
        }
    }

    /// # Panics
    ///
    /// If this is not a [`BlockKind::Fixed12`] builder.
    pub fn write_fixed12(&mut self, first: i64, second: i32) {
        match self {
            BlockBuilder::Fixed12(b) => b.write_fixed12(first, second),
            other => panic!(
                "cannot write a fixed12 value into a {:?} block builder",
                other.kind()
            ),
        }
    }

    pub fn position_count(&self) -> usize {
        match self {
            BlockBuilder::LongArray(b) => b.position_count(),
            BlockBuilder::Fixed12(b) => b.position_count(),
        }
    }

    /// Number of entries reserved when the builder was created.
    pub fn expected_entries(&self) -> usize {
        match self {
            BlockBuilder::LongArray(b) => b.expected_entries,
            BlockBuilder::Fixed12(b) => b.expected_entries,
        }
    }

    pub fn size_in_bytes(&self) -> usize {
        let slot = match self {
            BlockBuilder::LongArray(_) => SIZE_OF_LONG,
            BlockBuilder::Fixed12(_) => FIXED12_SIZE,
        };
        self.position_count() * (slot + NULL_FLAG_SIZE)
    }

    /// Whether the appended data reached the page budget of the builder's status.
    ///
    /// Builders created without a status never report full.
    pub fn is_full(&self) -> bool {
        let status = match self {
            BlockBuilder::LongArray(b) => b.status,
            BlockBuilder::Fixed12(b) => b.status,
        };
        status.is_some_and(|s| self.size_in_bytes() >= s.max_page_size_bytes)
    }

    pub fn build(self) -> Block {
        match self {
            BlockBuilder::LongArray(b) => Block::LongArray(b.build()),
            BlockBuilder::Fixed12(b) => Block::Fixed12(b.build()),
        }
    }
}

/// A batch of rows: one [`Block`] per channel, all with the same position count.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    blocks: Vec<Block>,
    position_count: usize,
}

impl Page {
    pub fn new(blocks: Vec<Block>) -> Result<Self, PageError> {
        let position_count = blocks.first().map_or(0, Block::position_count);
        for (channel, block) in blocks.iter().enumerate() {
            if block.position_count() != position_count {
                return Err(PageError::PositionCountMismatch {
                    channel,
                    expected: position_count,
                    actual: block.position_count(),
                });
            }
        }
        Ok(Self {
            blocks,
            position_count,
        })
    }

    /// A page with `position_count` rows and no channels.
    pub fn with_position_count(position_count: usize) -> Self {
        Self {
            blocks: Vec::new(),
            position_count,
        }
    }

    pub fn position_count(&self) -> usize {
        self.position_count
    }

    pub fn channel_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block(&self, channel: usize) -> Option<&Block> {
        self.blocks.get(channel)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}
