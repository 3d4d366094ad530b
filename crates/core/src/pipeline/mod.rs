//! Request pipeline: validate, write the artifact, record the build, deploy.
//!
//! Stages run strictly in order and the first failure ends the run. Nothing
//! an earlier stage wrote is rolled back when a later stage fails, so a
//! failed insert leaves its artifact file behind.
//!
//! # Example
//!
//! ```ignore
//! use buildhook_core::pipeline::Pipeline;
//!
//! let pipeline = Pipeline::from_config(&config);
//! let outcome = pipeline.run(br#"{"ticket":"AB12","x":1}"#).await?;
//! println!("record {} -> {}", outcome.record.id, outcome.artifact.display());
//! ```

mod error;
mod runner;
mod types;

pub use error::PipelineError;
pub use runner::Pipeline;
pub use types::{DeployStatus, PipelineOutcome, Stage};
