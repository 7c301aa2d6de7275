//! Error types for pulley-core
//!
//! Joint lifecycle and parameter forwarding never fail; only the reflection
//! surface (string-keyed property access) can reject input.

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Type error for {property}: expected {expected}, got {got}")]
    TypeMismatch {
        property: String,
        expected: &'static str,
        got: &'static str,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
