//! Field path module - Dotted paths and navigation over nested maps.
//!
//! All "is this really a map" checks for manifest traversal live here.

mod access;
mod path;

pub use access::*;
pub use path::*;

use crate::value::Value;
use thiserror::Error;

/// AccessError is returned when a path cannot be followed through a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("key '{key}' not found at '{path_so_far}'")]
    KeyNotFound { key: String, path_so_far: String },

    #[error("{path}: type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("path is empty")]
    EmptyPath,

    #[error("path '{path}' contains an empty segment")]
    EmptySegment { path: String },
}

impl AccessError {
    /// Creates a key not found error.
    pub fn key_not_found(key: impl Into<String>, path_so_far: impl Into<String>) -> Self {
        AccessError::KeyNotFound {
            key: key.into(),
            path_so_far: path_so_far.into(),
        }
    }

    /// Creates an error for a value that should have been a map.
    pub fn type_mismatch(path: impl Into<String>, actual: &Value) -> Self {
        AccessError::TypeMismatch {
            path: path.into(),
            expected: "map",
            actual: actual.type_name(),
        }
    }
}
