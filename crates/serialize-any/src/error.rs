//! Error types for envelope encoding and decoding.

use thiserror::Error;

/// Errors that can occur while encoding a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Recursion went past the configured depth budget, which usually means
    /// a circular reference or pathologically deep nesting.
    #[error("maximum recursion depth {0} exceeded")]
    DepthExceeded(u32),
    /// The value (or one of its descendants) cannot produce a wire form:
    /// a weak collection, or a type whose capability is disabled.
    #[error("cannot serialize value of type {0:?}")]
    UnsupportedType(String),
}

/// Errors that can occur while decoding envelope text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Recursion went past the configured depth budget.
    #[error("maximum recursion depth {0} exceeded")]
    DepthExceeded(u32),
    /// The input was not produced by this format: unparseable text, a
    /// non-object top level, a missing envelope marker, or a malformed
    /// per-type payload.
    #[error("not produced by this format: {0}")]
    Format(&'static str),
    /// A custom type's resolver returned no usable instance.
    #[error("unsupported type {0:?}: no usable instance")]
    UnsupportedType(String),
    /// A custom type needs caller resolution but no resolver was supplied.
    #[error("custom type {0:?} requires a resolver")]
    MissingResolver(String),
}
