use thiserror::Error;

/// Error types for skeleton and animation clip loading
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimError {
    /// The source model declares no bones, so the asset is not animated
    #[error("source model has no bones")]
    NoBonesInSource,

    /// The source model has more bones than the bone palette can hold
    #[error("too many bones: {count} (including the sentinel) exceeds the maximum of {max}")]
    TooManyBones { count: usize, max: usize },

    /// A bone references a parent that does not precede it in storage order
    #[error("bone {bone} has parent {parent}, which does not precede it")]
    UnorderedHierarchy { bone: usize, parent: i32 },

    /// A position or rotation reference points outside the vertex pool
    #[error("vertex reference {index} is out of range (pool has {pool_len} entries)")]
    InvalidVertexRef { index: usize, pool_len: usize },

    /// A caller-provided buffer is shorter than the bone count
    #[error("buffer holds {len} entries but {needed} are required")]
    BufferTooSmall { needed: usize, len: usize },
}

/// Result type using `AnimError`
pub type Result<T> = std::result::Result<T, AnimError>;
