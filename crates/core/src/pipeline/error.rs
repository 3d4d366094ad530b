use std::path::PathBuf;
use thiserror::Error;

use super::types::Stage;
use crate::artifact::ArtifactError;
use crate::deploy::DeployError;
use crate::payload::PayloadError;
use crate::store::StoreError;

/// Why a pipeline run stopped.
///
/// Each variant maps to the HTTP status the webhook answers with; see
/// [`PipelineError::status_code`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Could not convert POST data to JSON")]
    MalformedJson(#[source] serde_json::Error),

    /// Aggregated message listing every violated field.
    #[error("{0}")]
    Validation(String),

    #[error("Could not convert payload to indented JSON")]
    Render(#[source] serde_json::Error),

    #[error("Unable to create {}", path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Fields are empty")]
    EmptyPayload,

    #[error("Failed to store build record: {0}")]
    Persistence(String),

    /// Only returned under the terminate spawn-failure policy.
    #[error("Failed to start deploy: {0}")]
    DeployFailed(#[source] DeployError),
}

impl PipelineError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::MalformedJson(_) => 452,
            PipelineError::Validation(_) => 453,
            PipelineError::Render(_) => 454,
            PipelineError::ArtifactWrite { .. } => 455,
            PipelineError::EmptyPayload => 456,
            PipelineError::Persistence(_) => 500,
            PipelineError::DeployFailed(_) => 500,
        }
    }

    /// The stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::MalformedJson(_) | PipelineError::Validation(_) => Stage::Validate,
            PipelineError::Render(_) => Stage::Render,
            PipelineError::ArtifactWrite { .. } => Stage::WriteArtifact,
            PipelineError::EmptyPayload | PipelineError::Persistence(_) => Stage::Record,
            PipelineError::DeployFailed(_) => Stage::Deploy,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::MalformedJson(_) => "malformed_json",
            PipelineError::Validation(_) => "validation",
            PipelineError::Render(_) => "render",
            PipelineError::ArtifactWrite { .. } => "artifact_write",
            PipelineError::EmptyPayload => "empty_payload",
            PipelineError::Persistence(_) => "persistence",
            PipelineError::DeployFailed(_) => "deploy_failed",
        }
    }
}

impl From<PayloadError> for PipelineError {
    fn from(e: PayloadError) -> Self {
        match e {
            PayloadError::MalformedJson(source) => PipelineError::MalformedJson(source),
            validation @ PayloadError::Validation(_) => {
                PipelineError::Validation(validation.to_string())
            }
        }
    }
}

impl From<ArtifactError> for PipelineError {
    fn from(e: ArtifactError) -> Self {
        match e {
            ArtifactError::Render(source) => PipelineError::Render(source),
            ArtifactError::Write { path, source } => PipelineError::ArtifactWrite { path, source },
        }
    }
}

impl From<StoreError> for PipelineError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::EmptyPayload => PipelineError::EmptyPayload,
            StoreError::Database(msg) => PipelineError::Persistence(msg),
        }
    }
}
