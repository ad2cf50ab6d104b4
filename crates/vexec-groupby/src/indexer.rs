//! Page indexers: map every row of a page to a dense group id.

use crate::error::{GroupByError, GroupByResult};
use crate::flat_hash::{FlatGroupTable, TypedGroupKeys};
use vexec_types::{BlockBuilder, Page, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupByOptions {
    /// Number of distinct groups the table is sized for up front.
    pub expected_groups: usize,
}

impl Default for GroupByOptions {
    fn default() -> Self {
        Self {
            expected_groups: 10_000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupIndexerFactory {
    options: GroupByOptions,
}

impl GroupIndexerFactory {
    pub fn new(options: GroupByOptions) -> Self {
        Self { options }
    }

    /// Create an indexer over the key channels `types`, in page channel order.
    ///
    /// Without key channels every row belongs to one implicit group, and no hash table is
    /// built.
    pub fn create(&self, types: Vec<TypeRef>) -> GroupIndexer {
        if types.is_empty() {
            log::trace!("creating page indexer without key channels");
            return GroupIndexer::NoHash(NoHashPageIndexer);
        }
        log::trace!(
            "creating hashing page indexer over {} key channels",
            types.len()
        );
        GroupIndexer::Hash(GroupByHashPageIndexer::new(
            types,
            self.options.expected_groups,
        ))
    }
}

/// Assigns group ids to page rows.
///
/// Ids start at 0 and grow by one for every key tuple not seen before. An indexer keeps
/// accumulating for its whole life; drop it when grouping is done.
#[derive(Debug)]
pub enum GroupIndexer {
    NoHash(NoHashPageIndexer),
    Hash(GroupByHashPageIndexer),
}

impl GroupIndexer {
    pub fn create(types: Vec<TypeRef>) -> Self {
        GroupIndexerFactory::default().create(types)
    }

    pub fn index_page(&mut self, page: &Page) -> GroupByResult<Vec<u32>> {
        match self {
            GroupIndexer::NoHash(indexer) => Ok(indexer.index_page(page)),
            GroupIndexer::Hash(indexer) => indexer.index_page(page),
        }
    }

    /// Highest group id assigned so far.
    pub fn max_index(&self) -> Option<u32> {
        match self {
            GroupIndexer::NoHash(indexer) => Some(indexer.max_index()),
            GroupIndexer::Hash(indexer) => indexer.max_index(),
        }
    }

    pub fn group_count(&self) -> usize {
        match self {
            GroupIndexer::NoHash(_) => 1,
            GroupIndexer::Hash(indexer) => indexer.group_count(),
        }
    }
}

/// Global aggregation: every row is in group 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHashPageIndexer;

impl NoHashPageIndexer {
    pub fn index_page(&self, page: &Page) -> Vec<u32> {
        vec![0; page.position_count()]
    }

    pub fn max_index(&self) -> u32 {
        0
    }
}

#[derive(Debug)]
pub struct GroupByHashPageIndexer {
    types: Vec<TypeRef>,
    table: FlatGroupTable<TypedGroupKeys>,
}

impl GroupByHashPageIndexer {
    pub fn new(types: Vec<TypeRef>, expected_groups: usize) -> Self {
        let table = FlatGroupTable::new(TypedGroupKeys::new(&types), expected_groups);
        Self { types, table }
    }

    pub fn index_page(&mut self, page: &Page) -> GroupByResult<Vec<u32>> {
        self.check_page(page)?;

        let blocks = page.blocks();
        let mut group_ids = Vec::with_capacity(page.position_count());
        for position in 0..page.position_count() {
            group_ids.push(self.table.put_if_absent(blocks, position)?);
        }
        Ok(group_ids)
    }

    pub fn max_index(&self) -> Option<u32> {
        self.group_count().checked_sub(1).map(|max| max as u32)
    }

    pub fn group_count(&self) -> usize {
        self.table.group_count()
    }

    /// One row per group, in group id order, holding the group's key values.
    pub fn group_keys_page(&self) -> GroupByResult<Page> {
        let group_count = self.group_count();
        let mut builders: Vec<BlockBuilder> = self
            .types
            .iter()
            .map(|ty| ty.create_fixed_size_block_builder(group_count))
            .collect();
        for group_id in 0..group_count {
            self.table.append_group_to(group_id as u32, &mut builders);
        }
        Ok(Page::new(
            builders.into_iter().map(BlockBuilder::build).collect(),
        )?)
    }

    fn check_page(&self, page: &Page) -> GroupByResult<()> {
        if page.channel_count() != self.types.len() {
            return Err(GroupByError::ChannelCountMismatch {
                expected: self.types.len(),
                actual: page.channel_count(),
            });
        }
        for (channel, (ty, block)) in self.types.iter().zip(page.blocks()).enumerate() {
            if block.kind() != ty.block_kind() {
                return Err(GroupByError::BlockTypeMismatch {
                    channel,
                    type_name: ty.display_name(),
                    expected: ty.block_kind(),
                    actual: block.kind(),
                });
            }
        }
        Ok(())
    }
}
