//! `TIME(p) WITH TIME ZONE` for precisions that need more than one word.
//!
//! Values are stored as a picoseconds-of-day long plus an offset-minutes int, both in columnar
//! form (12-byte [`Fixed12Block`](crate::Fixed12Block) slots) and in flat form (12 bytes,
//! little-endian long then int). Every operator compares the UTC-normalized time of day, never
//! the raw fields.

use crate::block::{Block, BlockBuilder, BlockBuilderStatus, BlockKind, Fixed12BlockBuilder};
use crate::error::TypeError;
use crate::flat::{read_i32_le, read_i64_le, write_i32_le, write_i64_le, SIZE_OF_INT, SIZE_OF_LONG};
use crate::hash::{long_hash, xx_hash64};
use crate::operators::{ColumnCodec, FlatCodec, TypeOperators};
use crate::time::{
    normalize_picos, LongTimeWithTimeZone, SqlTimeWithTimeZone, MAX_PRECISION,
    MAX_SHORT_PRECISION,
};
use crate::types::{capped_entries, check_builder_kind, Type, Value};
use std::cmp::Ordering;

const FIXED_SIZE: usize = SIZE_OF_LONG + SIZE_OF_INT;

static LONG_TIME_WITH_TIME_ZONE_OPERATORS: TypeOperators = TypeOperators {
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

#[derive(Debug, Clone)]
pub struct LongTimeWithTimeZoneType {
    precision: u32,
    operators: &'static TypeOperators,
}

impl PartialEq for LongTimeWithTimeZoneType {
    fn eq(&self, other: &Self) -> bool {
        self.precision == other.precision
    }
}

impl Eq for LongTimeWithTimeZoneType {}

impl LongTimeWithTimeZoneType {
    pub const MIN_PRECISION: u32 = MAX_SHORT_PRECISION + 1;
    pub const MAX_PRECISION: u32 = MAX_PRECISION;

    pub fn new(precision: u32) -> Result<Self, TypeError> {
        if !(Self::MIN_PRECISION..=Self::MAX_PRECISION).contains(&precision) {
            return Err(TypeError::InvalidPrecision {
                precision,
                min: Self::MIN_PRECISION,
                max: Self::MAX_PRECISION,
            });
        }
        Ok(Self {
            precision,
            operators: &LONG_TIME_WITH_TIME_ZONE_OPERATORS,
        })
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Presentation value at `position`, or `None` for null.
    pub fn object_value(&self, block: &Block, position: usize) -> Option<SqlTimeWithTimeZone> {
        if block.is_null(position) {
            return None;
        }
        Some(SqlTimeWithTimeZone::new(
            self.precision,
            get_picos(block, position),
            get_offset_minutes(block, position),
        ))
    }

    pub fn equal(&self, left: &LongTimeWithTimeZone, right: &LongTimeWithTimeZone) -> bool {
        equal(
            left.picoseconds(),
            left.offset_minutes(),
            right.picoseconds(),
            right.offset_minutes(),
        )
    }

    pub fn hash_code(&self, value: &LongTimeWithTimeZone) -> u64 {
        hash_code(value.picoseconds(), value.offset_minutes())
    }

    pub fn xx_hash64(&self, value: &LongTimeWithTimeZone) -> u64 {
        xx_hash(value.picoseconds(), value.offset_minutes())
    }

    pub fn comparison(&self, left: &LongTimeWithTimeZone, right: &LongTimeWithTimeZone) -> Ordering {
        comparison(
            left.picoseconds(),
            left.offset_minutes(),
            right.picoseconds(),
            right.offset_minutes(),
        )
    }

    pub fn less_than(&self, left: &LongTimeWithTimeZone, right: &LongTimeWithTimeZone) -> bool {
        less_than(
            left.picoseconds(),
            left.offset_minutes(),
            right.picoseconds(),
            right.offset_minutes(),
        )
    }

    pub fn less_than_or_equal(
        &self,
        left: &LongTimeWithTimeZone,
        right: &LongTimeWithTimeZone,
    ) -> bool {
        less_than_or_equal(
            left.picoseconds(),
            left.offset_minutes(),
            right.picoseconds(),
            right.offset_minutes(),
        )
    }
}

impl Type for LongTimeWithTimeZoneType {
    fn display_name(&self) -> String {
        format!("time({}) with time zone", self.precision)
    }

    fn block_kind(&self) -> BlockKind {
        BlockKind::Fixed12
    }

    fn fixed_size(&self) -> usize {
        FIXED_SIZE
    }

    fn flat_fixed_size(&self) -> usize {
        FIXED_SIZE
    }

    fn create_block_builder(
        &self,
        status: Option<&BlockBuilderStatus>,
        expected_entries: usize,
        _expected_bytes_per_entry: usize,
    ) -> BlockBuilder {
        BlockBuilder::Fixed12(Fixed12BlockBuilder::new(
            status.copied(),
            capped_entries(status, expected_entries, FIXED_SIZE),
        ))
    }

    fn create_fixed_size_block_builder(&self, position_count: usize) -> BlockBuilder {
        BlockBuilder::Fixed12(Fixed12BlockBuilder::new(None, position_count))
    }

    fn append_to(&self, block: &Block, position: usize, builder: &mut BlockBuilder) {
        if block.is_null(position) {
            builder.append_null();
        } else {
            write(
                builder,
                get_picos(block, position),
                get_offset_minutes(block, position),
            );
        }
    }

    fn get_object(&self, block: &Block, position: usize) -> Value {
        if block.is_null(position) {
            return Value::Null;
        }
        Value::TimeWithTimeZone(self.read_value(block, position))
    }

    fn write_object(&self, builder: &mut BlockBuilder, value: &Value) -> Result<(), TypeError> {
        check_builder_kind(self, builder)?;
        match value {
            Value::Null => builder.append_null(),
            Value::TimeWithTimeZone(v) => self.write_value(builder, v),
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
        self.operators
    }
}

impl ColumnCodec for LongTimeWithTimeZoneType {
    type Value = LongTimeWithTimeZone;

    fn read_value(&self, block: &Block, position: usize) -> LongTimeWithTimeZone {
        LongTimeWithTimeZone::new(
            get_picos(block, position),
            get_offset_minutes(block, position),
        )
    }

    fn write_value(&self, builder: &mut BlockBuilder, value: &LongTimeWithTimeZone) {
        write(builder, value.picoseconds(), value.offset_minutes());
    }
}

impl FlatCodec for LongTimeWithTimeZoneType {
    fn read_flat(&self, fixed: &[u8], offset: usize) -> LongTimeWithTimeZone {
        LongTimeWithTimeZone::new(
            read_i64_le(fixed, offset),
            read_i32_le(fixed, offset + SIZE_OF_LONG),
        )
    }

    fn read_flat_to_block(&self, fixed: &[u8], offset: usize, builder: &mut BlockBuilder) {
        read_flat_to_block_operator(fixed, offset, builder);
    }

    fn write_flat(&self, value: &LongTimeWithTimeZone, fixed: &mut [u8], offset: usize) {
        write_i64_le(fixed, offset, value.picoseconds());
        write_i32_le(fixed, offset + SIZE_OF_LONG, value.offset_minutes());
    }

    fn write_block_flat(&self, block: &Block, position: usize, fixed: &mut [u8], offset: usize) {
        write_block_flat_operator(block, position, fixed, offset);
    }
}

fn get_picos(block: &Block, position: usize) -> i64 {
    block.get_long(position, 0)
}

fn get_offset_minutes(block: &Block, position: usize) -> i32 {
    block.get_int(position, SIZE_OF_LONG)
}

fn write(builder: &mut BlockBuilder, picoseconds: i64, offset_minutes: i32) {
    builder.write_fixed12(picoseconds, offset_minutes);
}

fn read_flat_to_block_operator(fixed: &[u8], offset: usize, builder: &mut BlockBuilder) {
    write(
        builder,
        read_i64_le(fixed, offset),
        read_i32_le(fixed, offset + SIZE_OF_LONG),
    );
}

fn write_block_flat_operator(block: &Block, position: usize, fixed: &mut [u8], offset: usize) {
    write_i64_le(fixed, offset, get_picos(block, position));
    write_i32_le(fixed, offset + SIZE_OF_LONG, get_offset_minutes(block, position));
}

fn equal_operator(left: &Block, left_position: usize, right: &Block, right_position: usize) -> bool {
    equal(
        get_picos(left, left_position),
        get_offset_minutes(left, left_position),
        get_picos(right, right_position),
        get_offset_minutes(right, right_position),
    )
}

fn flat_block_equal_operator(fixed: &[u8], offset: usize, block: &Block, position: usize) -> bool {
    equal(
        read_i64_le(fixed, offset),
        read_i32_le(fixed, offset + SIZE_OF_LONG),
        get_picos(block, position),
        get_offset_minutes(block, position),
    )
}

fn equal(left_picos: i64, left_offset: i32, right_picos: i64, right_offset: i32) -> bool {
    normalize_picos(left_picos, left_offset) == normalize_picos(right_picos, right_offset)
}

fn hash_code_operator(block: &Block, position: usize) -> u64 {
    hash_code(get_picos(block, position), get_offset_minutes(block, position))
}

fn hash_code(picos: i64, offset_minutes: i32) -> u64 {
    long_hash(normalize_picos(picos, offset_minutes))
}

fn xx_hash64_operator(block: &Block, position: usize) -> u64 {
    xx_hash(get_picos(block, position), get_offset_minutes(block, position))
}

fn xx_hash(picos: i64, offset_minutes: i32) -> u64 {
    xx_hash64(normalize_picos(picos, offset_minutes))
}

fn comparison_operator(
    left: &Block,
    left_position: usize,
    right: &Block,
    right_position: usize,
) -> Ordering {
    comparison(
        get_picos(left, left_position),
        get_offset_minutes(left, left_position),
        get_picos(right, right_position),
        get_offset_minutes(right, right_position),
    )
}

fn comparison(left_picos: i64, left_offset: i32, right_picos: i64, right_offset: i32) -> Ordering {
    normalize_picos(left_picos, left_offset).cmp(&normalize_picos(right_picos, right_offset))
}

fn less_than_operator(
    left: &Block,
    left_position: usize,
    right: &Block,
    right_position: usize,
) -> bool {
    less_than(
        get_picos(left, left_position),
        get_offset_minutes(left, left_position),
        get_picos(right, right_position),
        get_offset_minutes(right, right_position),
    )
}

fn less_than(left_picos: i64, left_offset: i32, right_picos: i64, right_offset: i32) -> bool {
    normalize_picos(left_picos, left_offset) < normalize_picos(right_picos, right_offset)
}

fn less_than_or_equal_operator(
    left: &Block,
    left_position: usize,
    right: &Block,
    right_position: usize,
) -> bool {
    less_than_or_equal(
        get_picos(left, left_position),
        get_offset_minutes(left, left_position),
        get_picos(right, right_position),
        get_offset_minutes(right, right_position),
    )
}

fn less_than_or_equal(
    left_picos: i64,
    left_offset: i32,
    right_picos: i64,
    right_offset: i32,
) -> bool {
    normalize_picos(left_picos, left_offset) <= normalize_picos(right_picos, right_offset)
}
