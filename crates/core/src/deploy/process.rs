//! Process-based deployer.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

use super::config::DeployConfig;
use super::{DeployError, Deployer, LaunchedDeploy, ARTIFACT_ENV_VAR};

/// Starts the configured executable as a detached process.
///
/// The child inherits the server's environment plus `JSON_FILE`. Must be
/// called from within a tokio runtime, which reaps the child once it exits.
pub struct ProcessDeployer {
    config: DeployConfig,
}

impl ProcessDeployer {
    pub fn new(config: DeployConfig) -> Self {
        Self { config }
    }

    fn command(&self, artifact: &Path) -> Command {
        let mut command = Command::new(&self.config.exec_file);
        command
            .env(ARTIFACT_ENV_VAR, artifact)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // New process group so signals aimed at the server don't reach the deploy
        #[cfg(unix)]
        command.process_group(0);

        command
    }
}

impl Deployer for ProcessDeployer {
    fn name(&self) -> &str {
        "process"
    }

    fn launch(&self, artifact: &Path) -> Result<LaunchedDeploy, DeployError> {
        let child = self
            .command(artifact)
            .spawn()
            .map_err(|source| DeployError::Spawn {
                path: self.config.exec_file.clone(),
                source,
            })?;

        let pid = child.id();
        info!(
            exec_file = %self.config.exec_file.display(),
            artifact = %artifact.display(),
            pid,
            "Started deploy"
        );

        // Dropping the handle detaches the child; it is not killed
        drop(child);

        Ok(LaunchedDeploy { pid })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::deploy::SpawnFailurePolicy;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use std::time::Duration;

    /// Write an executable shell script that records `$JSON_FILE` to `out`.
    fn write_script(dir: &Path, out: &Path) -> PathBuf {
        let script = dir.join("deploy.sh");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\nprintf '%s' \"$JSON_FILE\" > {}.tmp\nmv {}.tmp {}\n",
                out.display(),
                out.display(),
                out.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    fn deployer(exec_file: PathBuf) -> ProcessDeployer {
        ProcessDeployer::new(DeployConfig {
            exec_file,
            on_spawn_failure: SpawnFailurePolicy::Log,
        })
    }

    /// Launch, retrying while another test thread briefly holds the script open.
    fn launch_with_retry(deployer: &ProcessDeployer, artifact: &Path) -> LaunchedDeploy {
        for _ in 0..20 {
            match deployer.launch(artifact) {
                Ok(launched) => return launched,
                Err(DeployError::Spawn { ref source, .. })
                    if source.raw_os_error() == Some(26) =>
                {
                    std::thread::sleep(Duration::from_millis(25));
                }
                Err(e) => panic!("launch failed: {e}"),
            }
        }
        panic!("script stayed busy");
    }

    async fn wait_for_file(path: &Path) -> String {
        for _ in 0..100 {
            if let Ok(contents) = tokio::fs::read_to_string(path).await {
                return contents;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("{} was never written", path.display());
    }

    #[tokio::test]
    async fn test_launch_passes_artifact_path() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("seen");
        let script = write_script(dir.path(), &out);
        let artifact = dir.path().join("AB12.json");

        let launched = launch_with_retry(&deployer(script), &artifact);
        assert!(launched.pid.is_some());

        let seen = wait_for_file(&out).await;
        assert_eq!(seen, artifact.display().to_string());
    }

    #[tokio::test]
    async fn test_launch_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.sh");

        let err = deployer(missing.clone())
            .launch(&dir.path().join("AB12.json"))
            .unwrap_err();

        let DeployError::Spawn { path, source } = err;
        assert_eq!(path, missing);
        assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_launch_non_executable_file() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("plain.txt");
        std::fs::write(&script, "not a program").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o644)).unwrap();

        let result = deployer(script).launch(&dir.path().join("AB12.json"));
        assert!(matches!(result, Err(DeployError::Spawn { .. })));
    }

    #[test]
    fn test_name() {
        assert_eq!(deployer(PathBuf::from("/bin/true")).name(), "process");
    }
}
