use thiserror::Error;

/// Failure states of a surface adapter
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// Bookmark refers to a child node that no longer exists or changed kind
    #[error("Bookmark node {0} is gone or no longer a text node")]
    StaleNode(usize),

    /// Bookmark span does not lie inside the surface value
    #[error("Bookmark span {start}..{end} is out of bounds")]
    StaleSpan { start: usize, end: usize },

    /// Bookmark token unknown to the host document
    #[error("Unknown bookmark token {0}")]
    UnknownToken(u64),

    /// Bookmark variant does not match this surface's caret model
    #[error("Bookmark kind not supported by this surface")]
    BookmarkKind,
}

/// Type alias for cleaner function signatures
pub type Result<T> = std::result::Result<T, SurfaceError>;
