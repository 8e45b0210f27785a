//! Manifest module - Kubernetes manifests as order-preserving documents.
//!
//! This module loads, patches and writes Deployment manifests without
//! touching content it was not asked to change.

mod annotations;
mod deployment;
mod image;
mod manifest;

pub use annotations::*;
pub use deployment::*;
pub use image::*;
pub use manifest::*;

use crate::fieldpath::AccessError;
use crate::value::CodecError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Kind is the value of a manifest's top-level `kind` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Kind(String);

impl Kind {
    pub const DEPLOYMENT: &'static str = "Deployment";

    /// Creates a new Kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Kind(kind.into())
    }

    /// Returns the kind string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_deployment(&self) -> bool {
        self.0 == Self::DEPLOYMENT
    }
}

impl From<&str> for Kind {
    fn from(s: &str) -> Self {
        Kind(s.to_string())
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds that [`Manifest::load`] accepts.
pub const SUPPORTED_KINDS: &[&str] = &[Kind::DEPLOYMENT];

/// ManifestError is returned by manifest loading, patching and storing.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("error accessing manifest file '{}': {reason}", .path.display())]
    FileAccess { path: PathBuf, reason: String },

    #[error("error parsing manifest: {0}")]
    Parse(#[source] CodecError),

    #[error("error serializing manifest: {0}")]
    Serialize(#[source] CodecError),

    #[error("invalid/unsupported manifest kind: '{}'", .kind.as_deref().unwrap_or("<missing>"))]
    UnsupportedKind { kind: Option<String> },

    #[error("'{}' does not end with .yaml, .yml or .json", .0.display())]
    InvalidExtension(PathBuf),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("deployment has no containers")]
    NoContainers,

    #[error("image name '{expected}' does not match container image name '{actual}'")]
    NameMismatch { expected: String, actual: String },

    #[error("deployment has several containers; an image name is required to pick one")]
    ImageNameRequired,

    #[error("no container runs an image named '{0}'")]
    NoMatchingContainer(String),
}

impl ManifestError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ManifestError::FileAccess {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
