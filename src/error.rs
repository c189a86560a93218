use thiserror::Error;

/// Errors signaled by tree operations. Lookups that miss return `None` instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The item to remove is not stored in the tree.
    #[error("item not in tree")]
    NotFound,
}

/// Result alias for fallible tree operations.
pub type Result<T> = std::result::Result<T, Error>;
