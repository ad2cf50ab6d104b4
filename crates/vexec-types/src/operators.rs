//! Operator tables and codec traits.
//!
//! Execution code resolves the operators it needs once per query (per operator kind) and then
//! calls plain `fn` pointers in its per-row loops. Every type exposes one `static`
//! [`TypeOperators`] table; nothing is registered or discovered at runtime.

use crate::block::{Block, BlockBuilder};
use crate::types::Type;
use std::cmp::Ordering;
use std::fmt;

/// Operator kinds a type can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorType {
    Equal,
    HashCode,
    XxHash64,
    ComparisonUnorderedLast,
    LessThan,
    LessThanOrEqual,
    ReadValue,
    WriteValue,
}

impl OperatorType {
    pub const ALL: [OperatorType; 8] = [
        OperatorType::Equal,
        OperatorType::HashCode,
        OperatorType::XxHash64,
        OperatorType::ComparisonUnorderedLast,
        OperatorType::LessThan,
        OperatorType::LessThanOrEqual,
        OperatorType::ReadValue,
        OperatorType::WriteValue,
    ];
}

pub type BlockEqual = fn(&Block, usize, &Block, usize) -> bool;
pub type BlockLessThan = fn(&Block, usize, &Block, usize) -> bool;
pub type BlockHash = fn(&Block, usize) -> u64;
pub type BlockComparison = fn(&Block, usize, &Block, usize) -> Ordering;
/// Equality of a flat-encoded value (`fixed`, `offset`) and a block position.
pub type FlatBlockEqual = fn(&[u8], usize, &Block, usize) -> bool;
pub type ReadFlatToBlock = fn(&[u8], usize, &mut BlockBuilder);
pub type WriteBlockFlat = fn(&Block, usize, &mut [u8], usize);

/// Block-position operators of one type.
///
/// All positions handed to these functions must be non-null; callers check nullity first.
pub struct TypeOperators {
    pub equal: BlockEqual,
    pub flat_block_equal: FlatBlockEqual,
    pub hash_code: BlockHash,
    pub xx_hash64: BlockHash,
    pub comparison_unordered_last: BlockComparison,
    pub less_than: BlockLessThan,
    pub less_than_or_equal: BlockLessThan,
    pub read_flat_to_block: ReadFlatToBlock,
    pub write_block_flat: WriteBlockFlat,
}

impl fmt::Debug for TypeOperators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeOperators").finish_non_exhaustive()
    }
}

/// An operator resolved by kind.
#[derive(Clone, Copy)]
pub enum ScalarOperator {
    Equal(BlockEqual),
    Hash(BlockHash),
    Comparison(BlockComparison),
    LessThan(BlockLessThan),
    ReadValue(ReadFlatToBlock),
    WriteFlat(WriteBlockFlat),
}

impl fmt::Debug for ScalarOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarOperator::Equal(_) => "Equal",
            ScalarOperator::Hash(_) => "Hash",
            ScalarOperator::Comparison(_) => "Comparison",
            ScalarOperator::LessThan(_) => "LessThan",
            ScalarOperator::ReadValue(_) => "ReadValue",
            ScalarOperator::WriteFlat(_) => "WriteFlat",
        };
        f.write_str(name)
    }
}

impl TypeOperators {
    pub fn get(&self, kind: OperatorType) -> ScalarOperator {
        match kind {
            OperatorType::Equal => ScalarOperator::Equal(self.equal),
            OperatorType::HashCode => ScalarOperator::Hash(self.hash_code),
            OperatorType::XxHash64 => ScalarOperator::Hash(self.xx_hash64),
            OperatorType::ComparisonUnorderedLast => {
                ScalarOperator::Comparison(self.comparison_unordered_last)
            }
            OperatorType::LessThan => ScalarOperator::LessThan(self.less_than),
            OperatorType::LessThanOrEqual => ScalarOperator::LessThan(self.less_than_or_equal),
            OperatorType::ReadValue => ScalarOperator::ReadValue(self.read_flat_to_block),
            OperatorType::WriteValue => ScalarOperator::WriteFlat(self.write_block_flat),
        }
    }
}

/// Typed columnar access to a type's values.
///
/// Slot size, builder creation and copying between blocks live on the [`Type`] supertrait,
/// which is object safe.
pub trait ColumnCodec: Type {
    type Value;

    /// Decode the non-null value at `position`.
    fn read_value(&self, block: &Block, position: usize) -> Self::Value;

    fn write_value(&self, builder: &mut BlockBuilder, value: &Self::Value);
}

/// Flat (hash key / aggregation state) encoding of a type's values.
///
/// The flat form occupies [`Type::flat_fixed_size`] bytes starting at `offset`.
pub trait FlatCodec: ColumnCodec {
    fn read_flat(&self, fixed: &[u8], offset: usize) -> Self::Value;

    /// Decode the flat value at `offset` straight into the next slot of `builder`.
    fn read_flat_to_block(&self, fixed: &[u8], offset: usize, builder: &mut BlockBuilder);

    fn write_flat(&self, value: &Self::Value, fixed: &mut [u8], offset: usize);

    /// Encode the non-null value at `position` of `block` straight into `fixed`.
    fn write_block_flat(&self, block: &Block, position: usize, fixed: &mut [u8], offset: usize);
}
