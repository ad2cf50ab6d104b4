//! Value types for the vectorized execution core.
//!
//! This crate focuses on:
//! - Fixed-width columnar blocks (8- and 12-byte slots) with a separate null bitmap.
//! - Per-type operator tables (equality, hashing, ordering, flat read/write) built as static
//!   tables of function pointers, so hot loops never box values or dispatch per value.
//! - `TIME WITH TIME ZONE` values whose precision needs the 12-byte "long" representation.

#![forbid(unsafe_code)]

mod bigint;
mod bitmap;
mod block;
mod error;
mod flat;
pub mod hash;
mod long_time_with_time_zone;
mod operators;
mod registry;
pub mod time;
mod types;

pub use crate::bigint::BigintType;
pub use crate::bitmap::NullBits;
pub use crate::block::{
    Block, BlockBuilder, BlockBuilderStatus, BlockKind, Fixed12Block, Fixed12BlockBuilder,
    LongArrayBlock, LongArrayBlockBuilder, Page, DEFAULT_MAX_PAGE_SIZE_IN_BYTES,
};
pub use crate::error::{PageError, TypeError};
pub use crate::long_time_with_time_zone::LongTimeWithTimeZoneType;
pub use crate::operators::{
    BlockComparison, BlockEqual, BlockHash, BlockLessThan, ColumnCodec, FlatBlockEqual,
    FlatCodec, OperatorType, ReadFlatToBlock, ScalarOperator, TypeOperators, WriteBlockFlat,
};
pub use crate::registry::LongTimeWithTimeZoneTypes;
pub use crate::time::{LongTimeWithTimeZone, SqlTimeWithTimeZone};
pub use crate::types::{Type, TypeRef, Value};
