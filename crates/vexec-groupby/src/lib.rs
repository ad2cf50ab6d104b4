//! Group assignment for hash aggregation.
//!
//! A [`GroupIndexer`] is bound to an ordered list of key column types. Each page fed to it
//! comes back as one group id per row: rows with equal keys (under each type's equality
//! operator) share an id, and ids are handed out densely in first-seen order.

#![forbid(unsafe_code)]

mod error;
mod flat_hash;
mod indexer;

pub use crate::error::{GroupByError, GroupByResult};
pub use crate::flat_hash::{
    FlatGroupTable, GroupKeyStrategy, TypedGroupKeys, MAX_GROUP_COUNT, MAX_PRESIZED_GROUPS,
};
pub use crate::indexer::{
    GroupByHashPageIndexer, GroupByOptions, GroupIndexer, GroupIndexerFactory, NoHashPageIndexer,
};
