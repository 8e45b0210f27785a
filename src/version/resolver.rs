//! Deployment tag resolution.

use super::{Repository, VersionError};
use std::fmt;
use std::path::Path;
use tracing::info;

/// TagSource records which precedence rule produced a deployment tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSource {
    /// The caller supplied the tag.
    Override,
    /// The first tag the repository enumerated.
    Tag,
    /// The first commit of a walk from HEAD.
    Commit,
}

impl fmt::Display for TagSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagSource::Override => write!(f, "override"),
            TagSource::Tag => write!(f, "tag"),
            TagSource::Commit => write!(f, "commit"),
        }
    }
}

/// ResolvedTag is a deployment tag together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTag {
    pub tag: String,
    pub source: TagSource,
}

/// Resolves the deployment tag for the repository at `repository_path`.
///
/// A non-empty `explicit_override` is returned verbatim without opening the
/// repository. Otherwise the first enumerated tag wins over the first commit.
pub fn resolve(
    repository_path: impl AsRef<Path>,
    explicit_override: Option<&str>,
) -> Result<String, VersionError> {
    resolve_tag(repository_path, explicit_override).map(|resolved| resolved.tag)
}

/// Like [`resolve`], but also reports which rule matched.
pub fn resolve_tag(
    repository_path: impl AsRef<Path>,
    explicit_override: Option<&str>,
) -> Result<ResolvedTag, VersionError> {
    if let Some(tag) = explicit_override.filter(|tag| !tag.is_empty()) {
        return Ok(found(tag.to_string(), TagSource::Override));
    }

    let repository = Repository::open(repository_path)?;
    if let Some(tag) = repository.first_tag_name()? {
        return Ok(found(tag, TagSource::Tag));
    }
    if let Some(hash) = repository.first_commit_hash()? {
        return Ok(found(hash, TagSource::Commit));
    }

    Err(VersionError::NoVersionAvailable(
        repository.path().to_path_buf(),
    ))
}

fn found(tag: String, source: TagSource) -> ResolvedTag {
    info!(tag = %tag, source = %source, "resolved deployment tag");
    ResolvedTag { tag, source }
}
