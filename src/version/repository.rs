//! Read access to a git repository, plus committing a written manifest.

use super::VersionError;
use git2::{ErrorCode, Signature};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Author name recorded on deployment commits.
pub const COMMIT_AUTHOR: &str = "Kubernite";
/// Author email recorded on deployment commits.
pub const COMMIT_EMAIL: &str = "-";
/// Message used for deployment commits.
pub const COMMIT_MESSAGE: &str = "Kubernite deployment";

/// Repository is an opened git repository rooted at a directory.
pub struct Repository {
    inner: git2::Repository,
    path: PathBuf,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository").field("path", &self.path).finish()
    }
}

impl Repository {
    /// Opens the repository whose root (or `.git` directory) is `path`.
    ///
    /// No discovery is done: a subdirectory of a work tree is not a repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, VersionError> {
        let given = path.as_ref();
        if given.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(VersionError::repository_open(
                given,
                "given path to repository is blank",
            ));
        }

        let metadata = fs::metadata(given).map_err(|e| {
            VersionError::repository_open(given, format!("getting repository file info: {}", e))
        })?;
        if !metadata.is_dir() {
            return Err(VersionError::repository_open(
                given,
                format!("'{}' is not a directory", given.display()),
            ));
        }

        let inner = git2::Repository::open(given)
            .map_err(|e| VersionError::repository_open(given, e.message()))?;
        debug!(path = %given.display(), "opened repository");

        Ok(Repository {
            inner,
            path: given.to_path_buf(),
        })
    }

    /// Returns the path the repository was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns short tag names in the order the repository enumerates them.
    ///
    /// The order is neither chronological nor semver sorted.
    pub fn tag_names(&self) -> Result<Vec<String>, VersionError> {
        let names = self
            .inner
            .tag_names(None)
            .map_err(VersionError::TagEnumeration)?;
        Ok(names.iter().flatten().map(str::to_string).collect())
    }

    /// Returns the first tag name enumerated, if any.
    pub fn first_tag_name(&self) -> Result<Option<String>, VersionError> {
        Ok(self.tag_names()?.into_iter().next())
    }

    /// Returns the full hash of the first commit in a history walk from HEAD.
    ///
    /// A repository whose HEAD points at an unborn branch has no commits.
    pub fn first_commit_hash(&self) -> Result<Option<String>, VersionError> {
        if self.inner.is_empty().map_err(VersionError::CommitEnumeration)? {
            return Ok(None);
        }
        match self.inner.head() {
            Ok(_) => {}
            Err(e) if is_unborn(&e) => return Ok(None),
            Err(e) => return Err(VersionError::CommitEnumeration(e)),
        }

        let mut walk = self
            .inner
            .revwalk()
            .map_err(VersionError::CommitEnumeration)?;
        walk.push_head().map_err(VersionError::CommitEnumeration)?;
        match walk.next() {
            None => Ok(None),
            Some(Ok(oid)) => Ok(Some(oid.to_string())),
            Some(Err(e)) => Err(VersionError::CommitEnumeration(e)),
        }
    }

    /// Stages `file` and commits it on top of HEAD, returning the new commit hash.
    ///
    /// `file` must live inside the repository's working directory. Nothing is pushed.
    pub fn commit_file(&self, file: impl AsRef<Path>, message: &str) -> Result<String, VersionError> {
        let file = file.as_ref();
        let git_err = |e: git2::Error| VersionError::commit(file, e.message());

        let workdir = self
            .inner
            .workdir()
            .ok_or_else(|| VersionError::commit(file, "repository has no working directory"))?;
        let workdir = fs::canonicalize(workdir).map_err(|e| VersionError::commit(file, e))?;
        let absolute = fs::canonicalize(file).map_err(|e| VersionError::commit(file, e))?;
        let relative = absolute.strip_prefix(&workdir).map_err(|_| {
            VersionError::commit(
                file,
                format!("file is outside repository '{}'", workdir.display()),
            )
        })?;

        let mut index = self.inner.index().map_err(git_err)?;
        index.add_path(relative).map_err(git_err)?;
        index.write().map_err(git_err)?;
        let tree_id = index.write_tree().map_err(git_err)?;
        let tree = self.inner.find_tree(tree_id).map_err(git_err)?;

        let parent = match self.inner.head() {
            Ok(head) => Some(head.peel_to_commit().map_err(git_err)?),
            Err(e) if is_unborn(&e) => None,
            Err(e) => return Err(git_err(e)),
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let signature = Signature::now(COMMIT_AUTHOR, COMMIT_EMAIL).map_err(git_err)?;
        let oid = self
            .inner
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .map_err(git_err)?;

        info!(commit = %oid, file = %relative.display(), "committed deployment manifest");
        Ok(oid.to_string())
    }
}

fn is_unborn(e: &git2::Error) -> bool {
    matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound)
}
