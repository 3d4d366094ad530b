use serde::Serialize;
use std::path::PathBuf;

use crate::store::BuildRecord;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validate,
    Render,
    WriteArtifact,
    Record,
    Deploy,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validate => "validate",
            Stage::Render => "render",
            Stage::WriteArtifact => "write_artifact",
            Stage::Record => "record",
            Stage::Deploy => "deploy",
        }
    }
}

/// How the deploy stage ended for a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeployStatus {
    Launched { pid: Option<u32> },
    /// The executable could not be started and the failure was only logged.
    Failed { reason: String },
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub record: BuildRecord,
    /// Absolute path of the artifact file
    pub artifact: PathBuf,
    pub deploy: DeployStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names_match_serde() {
        for stage in [
            Stage::Validate,
            Stage::Render,
            Stage::WriteArtifact,
            Stage::Record,
            Stage::Deploy,
        ] {
            let json = serde_json::to_value(stage).unwrap();
            assert_eq!(json, stage.as_str());
        }
    }

    #[test]
    fn test_deploy_status_serialization() {
        let json = serde_json::to_value(DeployStatus::Launched { pid: Some(42) }).unwrap();
        assert_eq!(json["status"], "launched");
        assert_eq!(json["pid"], 42);

        let json = serde_json::to_value(DeployStatus::Failed {
            reason: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "boom");
    }
}
