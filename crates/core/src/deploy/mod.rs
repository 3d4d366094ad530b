//! Deploy trigger: launches the external deploy executable for an artifact.
//!
//! Launching is fire-and-forget. The child runs in its own process group,
//! its output is discarded and nothing waits for it to exit.

mod config;
mod process;

pub use config::{DeployConfig, SpawnFailurePolicy};
pub use process::ProcessDeployer;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable pointing the deploy executable at the artifact
pub const ARTIFACT_ENV_VAR: &str = "JSON_FILE";

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Failed to start deploy executable {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A deploy that was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchedDeploy {
    pub pid: Option<u32>,
}

/// Starts deployments for artifact files.
pub trait Deployer: Send + Sync {
    /// Returns the name of this deployer implementation.
    fn name(&self) -> &str;

    /// Start a deployment for `artifact` and return without waiting for it.
    fn launch(&self, artifact: &Path) -> Result<LaunchedDeploy, DeployError>;
}
