use crate::block::BlockKind;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("precision must be in the range [{min}, {max}], got {precision}")]
    InvalidPrecision { precision: u32, min: u32, max: u32 },

    #[error("cannot write {value} into a {type_name} column")]
    ValueTypeMismatch { type_name: String, value: String },

    #[error("cannot write into a {actual:?} block builder for a {type_name} column (expected {expected:?})")]
    BuilderKindMismatch {
        type_name: String,
        expected: BlockKind,
        actual: BlockKind,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("block {channel} has {actual} positions, expected {expected}")]
    PositionCountMismatch {
        channel: usize,
        expected: usize,
        actual: usize,
    },
}
