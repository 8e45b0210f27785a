//! Run configuration.
//!
//! Every option can be given as a flag or through the environment variable a
//! Drone pipeline step sets for plugin settings.

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

/// Default location of the checked out source in a Drone pipeline.
pub const DEFAULT_TAG_REPOSITORY: &str = "/drone/src";

/// Config is the explicit configuration threaded through a run.
#[derive(Debug, Clone, Parser)]
#[command(name = "kubernite", version, about)]
pub struct Config {
    /// Deployment manifest to patch.
    #[arg(long, env = "PLUGIN_DEPLOYMENT_FILE_PATH")]
    pub deployment_file: PathBuf,

    /// Repository whose tags and commits provide the deployment tag.
    #[arg(long, env = "PLUGIN_DEPLOYMENT_TAG_REPOSITORY_PATH", default_value = DEFAULT_TAG_REPOSITORY)]
    pub tag_repository: PathBuf,

    /// Deployment tag to use instead of one derived from the repository.
    #[arg(long, env = "PLUGIN_DEPLOYMENT_TAG")]
    pub deployment_tag: Option<String>,

    /// Image name selecting the container to patch.
    #[arg(long, env = "PLUGIN_DEPLOYMENT_IMAGE_NAME")]
    pub image_name: Option<String>,

    /// Value of the change-cause annotation.
    #[arg(long, env = "PLUGIN_CHANGE_CAUSE")]
    pub change_cause: Option<String>,

    /// Print the patched manifest instead of writing it.
    #[arg(long, env = "PLUGIN_DRY_RUN")]
    pub dry_run: bool,

    /// Commit the written manifest to the file repository.
    #[arg(long, env = "PLUGIN_COMMIT_DEPLOYMENT")]
    pub commit_deployment: bool,

    /// Repository containing the deployment manifest.
    #[arg(long, env = "PLUGIN_DEPLOYMENT_FILE_REPOSITORY_PATH")]
    pub file_repository: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, env = "PLUGIN_LOG_JSON")]
    pub log_json: bool,
}

/// ConfigError is returned for option combinations that cannot run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("deployment file path is blank")]
    BlankDeploymentFile,

    #[error("committing the deployment requires a file repository path")]
    MissingFileRepository,
}

impl Config {
    /// Creates a config for `deployment_file` with every other option at its default.
    pub fn new(deployment_file: impl Into<PathBuf>) -> Self {
        Config {
            deployment_file: deployment_file.into(),
            tag_repository: PathBuf::from(DEFAULT_TAG_REPOSITORY),
            deployment_tag: None,
            image_name: None,
            change_cause: None,
            dry_run: false,
            commit_deployment: false,
            file_repository: None,
            log_json: false,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deployment_file.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(ConfigError::BlankDeploymentFile);
        }
        if self.commit_deployment && self.file_repository.is_none() {
            return Err(ConfigError::MissingFileRepository);
        }
        Ok(())
    }

    /// Returns the change-cause annotation value for `tag`.
    pub fn change_cause_for(&self, tag: &str) -> String {
        match self.change_cause.as_deref().filter(|cause| !cause.is_empty()) {
            Some(cause) => cause.to_string(),
            None => format!("kubernite: deploy {}", tag),
        }
    }
}
