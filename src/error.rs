use thiserror::Error;

/// Errors produced by `boxtree`.
///
/// Queries and removals never fail; the only fallible entry point is index
/// configuration. Broken internal invariants are treated as bugs and panic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoxTreeError {
    /// The configured node fan-out cap is too small to form a tree.
    #[error("max_entries must be at least 2, got {0}")]
    InvalidMaxEntries(usize),
}

/// Result type for `boxtree` operations.
pub type Result<T> = std::result::Result<T, BoxTreeError>;
