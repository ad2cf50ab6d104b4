use crate::block::{Block, BlockBuilder, BlockBuilderStatus, BlockKind, LongArrayBlockBuilder};
use crate::error::TypeError;
use crate::flat::{read_i64_le, write_i64_le, SIZE_OF_LONG};
use crate::hash::{long_hash, xx_hash64};
use crate::operators::{ColumnCodec, FlatCodec, TypeOperators};
use crate::types::{capped_entries, check_builder_kind, Type, Value};
use std::cmp::Ordering;

static BIGINT_OPERATORS: TypeOperators = TypeOperators {
    equal: equal_operator,
    flat_block_equal: flat_block_equal_operator,
    hash_code: hash_code_operator,
    xx_hash64: xx_hash64_operator,
    comparison_unordered_last: comparison_operator,
    less_than: less_than_operator,
    less_than_or_equal: less_than_or_equal_operator,
    read_flat_to_block: read_flat_to_block_operator,
    write_block_flat: write_block_flat_operator,
};

fn equal_operator(left: &Block, left_position: usize, right: &Block, right_position: usize) -> bool {
    left.get_long(left_position, 0) == right.get_long(right_position, 0)
}

fn flat_block_equal_operator(fixed: &[u8], offset: usize, block: &Block, position: usize) -> bool {
    read_i64_le(fixed, offset) == block.get_long(position, 0)
}

fn hash_code_operator(block: &Block, position: usize) -> u64 {
    long_hash(block.get_long(position, 0))
}

fn xx_hash64_operator(block: &Block, position: usize) -> u64 {
    xx_hash64(block.get_long(position, 0))
}

fn comparison_operator(
    left: &Block,
    left_position: usize,
    right: &Block,
    right_position: usize,
) -> Ordering {
    left.get_long(left_position, 0).cmp(&right.get_long(right_position, 0))
}

fn less_than_operator(
    left: &Block,
    left_position: usize,
    right: &Block,
    right_position: usize,
) -> bool {
    left.get_long(left_position, 0) < right.get_long(right_position, 0)
}

fn less_than_or_equal_operator(
    left: &Block,
    left_position: usize,
    right: &Block,
    right_position: usize,
) -> bool {
    left.get_long(left_position, 0) <= right.get_long(right_position, 0)
}

fn read_flat_to_block_operator(fixed: &[u8], offset: usize, builder: &mut BlockBuilder) {
    builder.write_long(read_i64_le(fixed, offset));
}

fn write_block_flat_operator(block: &Block, position: usize, fixed: &mut [u8], offset: usize) {
    write_i64_le(fixed, offset, block.get_long(position, 0));
}

/// 64-bit signed integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BigintType;

impl Type for BigintType {
    fn display_name(&self) -> String {
        "bigint".to_owned()
    }

    fn block_kind(&self) -> BlockKind {
        BlockKind::LongArray
    }

    fn fixed_size(&self) -> usize {
        SIZE_OF_LONG
    }

    fn flat_fixed_size(&self) -> usize {
        SIZE_OF_LONG
    }

    fn create_block_builder(
        &self,
        status: Option<&BlockBuilderStatus>,
        expected_entries: usize,
        _expected_bytes_per_entry: usize,
    ) -> BlockBuilder {
        BlockBuilder::LongArray(LongArrayBlockBuilder::new(
            status.copied(),
            capped_entries(status, expected_entries, SIZE_OF_LONG),
        ))
    }

    fn create_fixed_size_block_builder(&self, position_count: usize) -> BlockBuilder {
        BlockBuilder::LongArray(LongArrayBlockBuilder::new(None, position_count))
    }

    fn append_to(&self, block: &Block, position: usize, builder: &mut BlockBuilder) {
        if block.is_null(position) {
            builder.append_null();
        } else {
            builder.write_long(block.get_long(position, 0));
        }
    }

    fn get_object(&self, block: &Block, position: usize) -> Value {
        if block.is_null(position) {
            return Value::Null;
        }
        Value::Bigint(self.read_value(block, position))
    }

    fn write_object(&self, builder: &mut BlockBuilder, value: &Value) -> Result<(), TypeError> {
        check_builder_kind(self, builder)?;
        match value {
            Value::Null => builder.append_null(),
            Value::Bigint(v) => builder.write_long(*v),
            other => {
                return Err(TypeError::ValueTypeMismatch {
                    type_name: self.display_name(),
                    value: other.to_string(),
                })
            }
        }
        Ok(())
    }

    fn type_operators(&self) -> &'static TypeOperators {
        &BIGINT_OPERATORS
    }
}

impl ColumnCodec for BigintType {
    type Value = i64;

    fn read_value(&self, block: &Block, position: usize) -> i64 {
        block.get_long(position, 0)
    }

    fn write_value(&self, builder: &mut BlockBuilder, value: &i64) {
        builder.write_long(*value);
    }
}

impl FlatCodec for BigintType {
    fn read_flat(&self, fixed: &[u8], offset: usize) -> i64 {
        read_i64_le(fixed, offset)
    }

    fn read_flat_to_block(&self, fixed: &[u8], offset: usize, builder: &mut BlockBuilder) {
        read_flat_to_block_operator(fixed, offset, builder);
    }

    fn write_flat(&self, value: &i64, fixed: &mut [u8], offset: usize) {
        write_i64_le(fixed, offset, *value);
    }

    fn write_block_flat(&self, block: &Block, position: usize, fixed: &mut [u8], offset: usize) {
        write_block_flat_operator(block, position, fixed, offset);
    }
}
