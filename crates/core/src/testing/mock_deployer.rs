//! Mock deployer for testing.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::deploy::{DeployError, Deployer, LaunchedDeploy};

/// Mock implementation of the Deployer trait.
///
/// Records every artifact path it was asked to deploy and can be told to
/// fail the next launch as if the executable were missing.
#[derive(Debug, Default)]
pub struct MockDeployer {
    launches: Mutex<Vec<PathBuf>>,
    fail_next: Mutex<bool>,
}

impl MockDeployer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next launch fail.
    pub fn fail_next(&self) {
        *self.fail_next.lock().unwrap() = true;
    }

    /// Artifact paths of successful launches, in order.
    pub fn launches(&self) -> Vec<PathBuf> {
        self.launches.lock().unwrap().clone()
    }
}

impl Deployer for MockDeployer {
    fn name(&self) -> &str {
        "mock"
    }

    fn launch(&self, artifact: &Path) -> Result<LaunchedDeploy, DeployError> {
        if std::mem::take(&mut *self.fail_next.lock().unwrap()) {
            return Err(DeployError::Spawn {
                path: PathBuf::from("/mock/deploy"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }

        let mut launches = self.launches.lock().unwrap();
        launches.push(artifact.to_path_buf());
        Ok(LaunchedDeploy {
            pid: Some(launches.len() as u32),
        })
    }
}
