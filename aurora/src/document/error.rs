//! Error types for the document model

use thiserror::Error;

use super::selection::Point;

/// Errors raised by the document model
///
/// Commands are fire-and-forget, so these never reach the caller of
/// `dispatch`; they are handed to the model's error hook instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// A selection point does not address an existing position
    #[error("selection point {point:?} does not exist in the document")]
    InvalidPoint {
        /// The offending point
        point: Point,
    },

    /// A snapshot could not be parsed as JSON
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// A snapshot parsed but describes an impossible tree
    #[error("unsupported node in snapshot: {0}")]
    UnsupportedNode(String),
}
