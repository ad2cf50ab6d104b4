//! Group table keyed by flat-encoded key tuples.
//!
//! Each distinct key tuple is stored once, flat, in a single byte buffer; group ids are the
//! tuple's index in that buffer. The hash table itself only stores group ids, and
//! asks a [`GroupKeyStrategy`] how to hash, store and compare key tuples. It knows nothing
//! about the indexer that drives it.

use crate::error::{GroupByError, GroupByResult};
use hashbrown::HashTable;
use std::fmt;
use vexec_types::hash::{combine_hash, INITIAL_HASH_VALUE, NULL_HASH_CODE};
use vexec_types::{Block, BlockBuilder, TypeOperators, TypeRef};

/// Group ids are dense `u32`s, kept within the positive `i32` range.
pub const MAX_GROUP_COUNT: usize = i32::MAX as usize;

/// Upper bound on the number of groups a new table reserves room for.
pub const MAX_PRESIZED_GROUPS: usize = 1 << 16;

/// Equality + hash capability over the key channels of a page.
pub trait GroupKeyStrategy {
    /// Bytes needed to store one key tuple.
    fn row_size(&self) -> usize;

    fn hash(&self, blocks: &[Block], position: usize) -> u64;

    /// Store the key tuple at `position` into `row` (exactly `row_size` bytes, zeroed).
    fn write_row(&self, blocks: &[Block], position: usize, row: &mut [u8]);

    fn row_equals(&self, row: &[u8], blocks: &[Block], position: usize) -> bool;

    /// Append the stored key tuple to one builder per channel.
    fn append_row_to(&self, row: &[u8], builders: &mut [BlockBuilder]);
}

#[derive(Debug)]
struct KeyChannel {
    operators: &'static TypeOperators,
    // Null flag byte; the flat value follows it.
    offset: usize,
}

/// Key strategy driven by each channel type's operator table.
///
/// Record layout: for every channel, one null-flag byte followed by the type's flat encoding.
/// Null keys are equal to each other and to nothing else.
#[derive(Debug)]
pub struct TypedGroupKeys {
    channels: Vec<KeyChannel>,
    row_size: usize,
}

impl TypedGroupKeys {
    pub fn new(types: &[TypeRef]) -> Self {
        let mut offset = 0;
        let channels = types
            .iter()
            .map(|ty| {
                let channel = KeyChannel {
                    operators: ty.type_operators(),
                    offset,
                };
                offset += 1 + ty.flat_fixed_size();
                channel
            })
            .collect();
        Self {
            channels,
            row_size: offset,
        }
    }
}

impl GroupKeyStrategy for TypedGroupKeys {
    fn row_size(&self) -> usize {
        self.row_size
    }

    fn hash(&self, blocks: &[Block], position: usize) -> u64 {
        self.channels
            .iter()
            .zip(blocks)
            .fold(INITIAL_HASH_VALUE, |hash, (channel, block)| {
                let value_hash = if block.is_null(position) {
                    NULL_HASH_CODE
                } else {
                    (channel.operators.hash_code)(block, position)
                };
                combine_hash(hash, value_hash)
            })
    }

    fn write_row(&self, blocks: &[Block], position: usize, row: &mut [u8]) {
        for (channel, block) in self.channels.iter().zip(blocks) {
            if block.is_null(position) {
                row[channel.offset] = 1;
            } else {
                (channel.operators.write_block_flat)(block, position, row, channel.offset + 1);
            }
        }
    }

    fn row_equals(&self, row: &[u8], blocks: &[Block], position: usize) -> bool {
        for (channel, block) in self.channels.iter().zip(blocks) {
            let row_null = row[channel.offset] != 0;
            let block_null = block.is_null(position);
            if row_null || block_null {
                if row_null != block_null {
                    return false;
                }
                continue;
            }
            if !(channel.operators.flat_block_equal)(row, channel.offset + 1, block, position) {
                return false;
            }
        }
        true
    }

    fn append_row_to(&self, row: &[u8], builders: &mut [BlockBuilder]) {
        for (channel, builder) in self.channels.iter().zip(builders) {
            if row[channel.offset] != 0 {
                builder.append_null();
            } else {
                (channel.operators.read_flat_to_block)(row, channel.offset + 1, builder);
            }
        }
    }
}

/// Map from key tuple to dense group id.
///
/// The hash table holds only group ids; hashes and key records live in side vectors indexed
/// by id, so rehashing never touches the keys.
pub struct FlatGroupTable<S> {
    strategy: S,
    records: Vec<u8>,
    hashes: Vec<u64>,
    groups: HashTable<u32>,
}

impl<S> fmt::Debug for FlatGroupTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatGroupTable")
            .field("groups", &self.hashes.len())
            .field("capacity", &self.groups.capacity())
            .finish_non_exhaustive()
    }
}

impl<S: GroupKeyStrategy> FlatGroupTable<S> {
    /// Create a table pre-sized for `expected_groups`, up to [`MAX_PRESIZED_GROUPS`]; larger
    /// tables grow on demand.
    pub fn new(strategy: S, expected_groups: usize) -> Self {
        Self {
            strategy,
            records: Vec::new(),
            hashes: Vec::new(),
            groups: HashTable::with_capacity(initial_capacity(expected_groups)),
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn group_count(&self) -> usize {
        self.hashes.len()
    }

    /// Number of groups the table holds before it has to grow.
    pub fn capacity(&self) -> usize {
        self.groups.capacity()
    }

    /// Group id of the key tuple at `position`, allocating the next id if it is new.
    pub fn put_if_absent(&mut self, blocks: &[Block], position: usize) -> GroupByResult<u32> {
        let hash = self.strategy.hash(blocks, position);
        let found = self
            .groups
            .find(hash, |&group_id| {
                self.hashes[group_id as usize] == hash
                    && self
                        .strategy
                        .row_equals(self.group_row(group_id), blocks, position)
            })
            .copied();
        match found {
            Some(group_id) => Ok(group_id),
            None => self.add_new_group(hash, blocks, position),
        }
    }

    /// The stored key tuple of `group_id`.
    pub fn group_row(&self, group_id: u32) -> &[u8] {
        let row_size = self.strategy.row_size();
        let start = group_id as usize * row_size;
        &self.records[start..start + row_size]
    }

    pub fn append_group_to(&self, group_id: u32, builders: &mut [BlockBuilder]) {
        self.strategy.append_row_to(self.group_row(group_id), builders);
    }

    fn add_new_group(
        &mut self,
        hash: u64,
        blocks: &[Block],
        position: usize,
    ) -> GroupByResult<u32> {
        let group_count = self.group_count();
        if group_count >= MAX_GROUP_COUNT {
            return Err(GroupByError::TooManyGroups {
                limit: MAX_GROUP_COUNT,
            });
        }
        if group_count == self.groups.capacity() {
            log::debug!(
                "growing group table past {} groups",
                self.groups.capacity()
            );
        }

        let group_id = group_count as u32;
        let start = self.records.len();
        self.records.resize(start + self.strategy.row_size(), 0);
        self.strategy
            .write_row(blocks, position, &mut self.records[start..]);
        self.hashes.push(hash);

        let hashes = &self.hashes;
        self.groups
            .insert_unique(hash, group_id, |&id| hashes[id as usize]);
        Ok(group_id)
    }
}

fn initial_capacity(expected_groups: usize) -> usize {
    expected_groups.min(MAX_PRESIZED_GROUPS)
}
