//! Crate-level error type.

use crate::config::ConfigError;
use crate::manifest::ManifestError;
use crate::version::VersionError;
use thiserror::Error;

/// Error is any failure that ends a run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}
