use crate::block::{Block, BlockBuilder, BlockBuilderStatus, BlockKind};
use crate::error::TypeError;
use crate::operators::TypeOperators;
use crate::time::{LongTimeWithTimeZone, SqlTimeWithTimeZone, MAX_PRECISION};
use std::fmt;
use std::sync::Arc;

/// Shared handle to a type descriptor.
pub type TypeRef = Arc<dyn Type>;

/// A boxed value, used at API edges (tests, literal rows, debugging). Hot paths work on blocks.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Bigint(i64),
    TimeWithTimeZone(LongTimeWithTimeZone),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bigint(v) => write!(f, "{v}"),
            Value::TimeWithTimeZone(v) => write!(
                f,
                "{}",
                SqlTimeWithTimeZone::new(MAX_PRECISION, v.picoseconds(), v.offset_minutes())
            ),
        }
    }
}

/// Descriptor of a SQL value type: its storage layouts and its operator table.
///
/// Descriptors are immutable and shared freely across threads.
pub trait Type: fmt::Debug + Send + Sync {
    fn display_name(&self) -> String;

    fn block_kind(&self) -> BlockKind;

    /// Size in bytes of one columnar slot.
    fn fixed_size(&self) -> usize;

    /// Size in bytes of the flat encoding.
    fn flat_fixed_size(&self) -> usize;

    /// Create a builder for about `expected_entries` values.
    ///
    /// The reservation is capped so a single block never targets more than the page budget of
    /// `status` (or [`crate::DEFAULT_MAX_PAGE_SIZE_IN_BYTES`] without one).
    fn create_block_builder(
        &self,
        status: Option<&BlockBuilderStatus>,
        expected_entries: usize,
        expected_bytes_per_entry: usize,
    ) -> BlockBuilder;

    /// Create a builder reserving exactly `position_count` entries.
    fn create_fixed_size_block_builder(&self, position_count: usize) -> BlockBuilder;

    /// Copy the value (or null) at `position` of `block` into `builder`.
    fn append_to(&self, block: &Block, position: usize, builder: &mut BlockBuilder);

    fn get_object(&self, block: &Block, position: usize) -> Value;

    fn write_object(&self, builder: &mut BlockBuilder, value: &Value) -> Result<(), TypeError>;

    fn type_operators(&self) -> &'static TypeOperators;
}

/// Number of entries a builder may reserve without exceeding the page budget.
pub(crate) fn capped_entries(
    status: Option<&BlockBuilderStatus>,
    expected_entries: usize,
    fixed_size: usize,
) -> usize {
    let max_page_size_bytes = status.copied().unwrap_or_default().max_page_size_bytes;
    expected_entries.min(max_page_size_bytes / fixed_size)
}

pub(crate) fn check_builder_kind(
    ty: &dyn Type,
    builder: &BlockBuilder,
) -> Result<(), TypeError> {
    if builder.kind() == ty.block_kind() {
        Ok(())
    } else {
        Err(TypeError::BuilderKindMismatch {
            type_name: ty.display_name(),
            expected: ty.block_kind(),
            actual: builder.kind(),
        })
    }
}
