//! Error types for the core primitives.

use thiserror::Error;

use crate::tech::BuildableItem;

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Top-level error type for all core primitive errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Grid shape passed to a rasterizer was not two-dimensional.
    #[error("grid shape must have exactly 2 dimensions, got {0}")]
    InvalidGridShape(usize),

    /// Tech-table lookup failed for the given item.
    #[error("unknown buildable item: {0:?}")]
    UnknownItem(BuildableItem),

    /// Centroid requested for an empty point set.
    #[error("cannot compute the centroid of an empty point set")]
    EmptyPointSet,

    /// Line projection requested with a zero direction vector.
    #[error("cannot project onto a line with a zero direction vector")]
    ZeroDirection,

    /// Data table parsing error.
    #[error("failed to parse data table: {0}")]
    DataParse(String),
}
