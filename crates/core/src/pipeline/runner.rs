//! Pipeline runner.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::error::PipelineError;
use super::types::{DeployStatus, PipelineOutcome};
use crate::artifact::{render_indented, ArtifactWriter};
use crate::config::Config;
use crate::deploy::{Deployer, ProcessDeployer, SpawnFailurePolicy};
use crate::payload::validate;
use crate::store::{BuildStore, SqliteBuildStore};

/// Turns a raw request body into an artifact file, a build record and a
/// started deploy.
pub struct Pipeline {
    artifacts: ArtifactWriter,
    store: Arc<dyn BuildStore>,
    deployer: Arc<dyn Deployer>,
    on_spawn_failure: SpawnFailurePolicy,
}

impl Pipeline {
    pub fn new(
        artifacts: ArtifactWriter,
        store: Arc<dyn BuildStore>,
        deployer: Arc<dyn Deployer>,
        on_spawn_failure: SpawnFailurePolicy,
    ) -> Self {
        Self {
            artifacts,
            store,
            deployer,
            on_spawn_failure,
        }
    }

    /// Build a pipeline backed by SQLite and a real deploy process.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ArtifactWriter::new(&config.artifacts.data_dir),
            Arc::new(SqliteBuildStore::new(&config.database.path)),
            Arc::new(ProcessDeployer::new(config.deploy.clone())),
            config.deploy.on_spawn_failure,
        )
    }

    pub fn store(&self) -> &dyn BuildStore {
        self.store.as_ref()
    }

    pub fn artifacts(&self) -> &ArtifactWriter {
        &self.artifacts
    }

    /// Run every stage for one request body.
    pub async fn run(&self, body: &[u8]) -> Result<PipelineOutcome, PipelineError> {
        let payload = validate(body).inspect_err(|e| {
            warn!(error = %e, "Rejected payload");
        })?;
        let ticket = payload.ticket;
        debug!(%ticket, "Payload validated");

        let rendered = render_indented(&payload.compact)?;

        let artifact = self
            .artifacts
            .write(&ticket, &rendered)
            .await
            .inspect_err(|e| error!(%ticket, error = %e, "Failed to write artifact"))?;

        let outcome = self.record_and_deploy(&payload.compact, artifact)?;
        info!(
            %ticket,
            record_id = outcome.record.id,
            artifact = %outcome.artifact.display(),
            "Build accepted"
        );
        Ok(outcome)
    }

    /// Insert the build record for an already written artifact, then start
    /// the deploy. The deploy only starts once the record is stored.
    pub fn record_and_deploy(
        &self,
        compact: &str,
        artifact: PathBuf,
    ) -> Result<PipelineOutcome, PipelineError> {
        let record = self.store.insert(compact).inspect_err(|e| {
            error!(artifact = %artifact.display(), error = %e, "Failed to record build");
        })?;

        let deploy = match self.deployer.launch(&artifact) {
            Ok(launched) => DeployStatus::Launched { pid: launched.pid },
            Err(e) => match self.on_spawn_failure {
                SpawnFailurePolicy::Log => {
                    error!(
                        record_id = record.id,
                        deployer = self.deployer.name(),
                        error = %e,
                        "Deploy did not start"
                    );
                    DeployStatus::Failed {
                        reason: e.to_string(),
                    }
                }
                SpawnFailurePolicy::Terminate => {
                    error!(
                        record_id = record.id,
                        deployer = self.deployer.name(),
                        error = %e,
                        "Deploy did not start, server will terminate"
                    );
                    return Err(PipelineError::DeployFailed(e));
                }
            },
        };

        Ok(PipelineOutcome {
            record,
            artifact,
            deploy,
        })
    }
}
