//! The deployment pipeline: resolve a tag, patch the manifest, write it out.

use crate::config::Config;
use crate::error::Error;
use crate::manifest::Deployment;
use crate::version::{self, Repository, ResolvedTag, COMMIT_MESSAGE};
use tracing::info;

/// Outcome describes what a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// The deployment tag and the rule that produced it.
    pub tag: ResolvedTag,
    /// Index of the container whose image was rewritten.
    pub container: usize,
    /// Patched manifest text, set on dry runs instead of writing the file.
    pub rendered: Option<String>,
    /// Hash of the deployment commit, when one was made.
    pub commit: Option<String>,
}

/// Runs the pipeline described by `config`.
///
/// Patches are applied in order and are not rolled back: when the image patch
/// fails, annotations already set on the in-memory document stay set, but
/// nothing is written.
pub fn run(config: &Config) -> Result<Outcome, Error> {
    config.validate()?;

    let tag = version::resolve_tag(&config.tag_repository, config.deployment_tag.as_deref())?;

    let mut deployment = Deployment::load(&config.deployment_file)?;
    deployment.set_change_cause(&config.change_cause_for(&tag.tag))?;
    let container = deployment.set_image_tag(config.image_name.as_deref(), &tag.tag)?;

    if config.dry_run {
        info!(path = %config.deployment_file.display(), "dry run, manifest not written");
        return Ok(Outcome {
            tag,
            container,
            rendered: Some(deployment.render()?),
            commit: None,
        });
    }

    deployment.write()?;

    let commit = match (&config.file_repository, config.commit_deployment) {
        (Some(repository), true) => {
            let repository = Repository::open(repository)?;
            Some(repository.commit_file(&config.deployment_file, COMMIT_MESSAGE)?)
        }
        _ => None,
    };

    Ok(Outcome {
        tag,
        container,
        rendered: None,
        commit,
    })
}
