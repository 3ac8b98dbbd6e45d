//! Unified error types for the Rambutan library.
//!
//! Every failure in this crate is a synchronous structural violation raised
//! while building the document tree. There is no transient or retryable
//! failure class: a violation aborts the current build operation and is
//! surfaced to the caller of the builder API.

use thiserror::Error;

/// Main error type for Rambutan operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A text node was created without an owning parent node
    #[error("Text nodes must have a parent node")]
    InvalidParent,

    /// A style of the wrong kind was supplied to an operation
    #[error("Invalid style kind: expected {expected}, got {got}")]
    InvalidStyleKind {
        expected: &'static str,
        got: &'static str,
    },

    /// A list nesting depth outside the valid 1-9 range
    #[error("Invalid list level: {0} (levels must be between 1 and 9)")]
    InvalidListLevel(u8),

    /// A structural mutation forbidden by the node's capabilities
    #[error("Unsupported mutation: {0}")]
    UnsupportedMutation(&'static str),

    /// Unrecognized or undecodable image data
    #[error("Unsupported image: {0}")]
    UnsupportedImage(&'static str),
}

/// Result type for Rambutan operations.
pub type Result<T> = std::result::Result<T, Error>;
