//! Error kinds for index-based access.
//!
//! Missing keys, duplicate inserts and deletes of absent keys are ordinary
//! outcomes reported through `bool`/`Option`, not through this type.

/// Failure of an index-based operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashListError {
    /// Index outside `[0, len)`.
    #[error("index {index} out of range for hash list of length {len}")]
    OutOfRange { index: usize, len: usize },

    /// The active list did not lead back to its root; the structure is
    /// corrupt and must not be used further.
    #[error("internal error: entry for key {key:?} is not reachable from the active list root")]
    Corrupted { key: String },
}

pub type Result<T> = std::result::Result<T, HashListError>;
