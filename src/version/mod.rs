//! Version module - Derives a deployment tag from git repository state.
//!
//! Precedence, first match wins: an explicit override, the first tag the
//! repository enumerates, the first commit of a walk from HEAD.

mod repository;
mod resolver;

pub use repository::*;
pub use resolver::*;

use std::path::PathBuf;
use thiserror::Error;

/// VersionError covers every way tag resolution and repository access can fail.
#[derive(Debug, Error)]
pub enum VersionError {
    #[error("error opening repository '{}': {reason}", .path.display())]
    RepositoryOpen { path: PathBuf, reason: String },

    #[error("error enumerating repository tags: {0}")]
    TagEnumeration(#[source] git2::Error),

    #[error("error enumerating repository commits: {0}")]
    CommitEnumeration(#[source] git2::Error),

    #[error("repository '{}' has no tags and no commits", .0.display())]
    NoVersionAvailable(PathBuf),

    #[error("error committing '{}': {reason}", .path.display())]
    Commit { path: PathBuf, reason: String },
}

impl VersionError {
    pub(crate) fn repository_open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        VersionError::RepositoryOpen {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn commit(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        VersionError::Commit {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
