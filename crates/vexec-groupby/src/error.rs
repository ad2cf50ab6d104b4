use vexec_types::{BlockKind, PageError};

pub type GroupByResult<T> = Result<T, GroupByError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GroupByError {
    #[error("page has {actual} channels, expected {expected}")]
    ChannelCountMismatch { expected: usize, actual: usize },

    #[error("channel {channel} holds a {actual:?} block, but {type_name} expects {expected:?}")]
    BlockTypeMismatch {
        channel: usize,
        type_name: String,
        expected: BlockKind,
        actual: BlockKind,
    },

    #[error("group table cannot hold more than {limit} groups")]
    TooManyGroups { limit: usize },

    #[error(transparent)]
    Page(#[from] PageError),
}
