//! # Kubernite
//!
//! Resolves a release tag from a git repository and patches a Kubernetes
//! Deployment manifest with it, leaving unrelated manifest content as it was.
//!
//! ## Modules
//!
//! - [`value`] - Order-preserving in-memory representation of YAML/JSON documents
//! - [`fieldpath`] - Dotted paths and strict or get-or-create navigation over documents
//! - [`version`] - Deployment tag resolution from repository tags and commits
//! - [`manifest`] - Manifest load/store, annotation and image tag patching
//! - [`config`] - Explicit run configuration
//! - [`run`] - The load, patch, store pipeline

pub mod config;
pub mod error;
pub mod fieldpath;
pub mod manifest;
pub mod run;
pub mod telemetry;
pub mod value;
pub mod version;

pub use config::{Config, ConfigError};
pub use error::Error;
pub use fieldpath::{AccessError, Path};
pub use manifest::{AnnotationScope, Deployment, ImageRef, Manifest, ManifestError};
pub use run::{run, Outcome};
pub use value::{Map, Value};
pub use version::{resolve, Repository, ResolvedTag, TagSource, VersionError};
