//! Configuration for the deploy trigger.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to do when the deploy executable cannot be started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnFailurePolicy {
    /// Log the failure and still answer the request with the stored record.
    #[default]
    Log,
    /// Fail the request and shut the server down.
    Terminate,
}

/// Configuration for the deploy trigger.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeployConfig {
    /// Executable started for every accepted payload.
    pub exec_file: PathBuf,

    #[serde(default)]
    pub on_spawn_failure: SpawnFailurePolicy,
}
