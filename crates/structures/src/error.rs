//! Error types for the structures crate.
//!
//! Only one condition here is recoverable: asking a sequence for an index it
//! does not hold. Everything else (e.g. a zero initial capacity) is a
//! programming error and panics at construction.

use thiserror::Error;

/// Errors reported by the containers in this crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// Requested index is outside `[0, len)`
    #[error("Index {index} out of bounds for sequence of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StructureError>;
