pub mod artifact;
pub mod auth;
pub mod config;
pub mod deploy;
pub mod payload;
pub mod pipeline;
pub mod store;
pub mod testing;

pub use artifact::{render_indented, ArtifactError, ArtifactWriter};
pub use auth::{
    create_authenticator, AuthError, Authenticator, Credentials, Identity, NoneAuthenticator,
    TokenAuthenticator, TOKEN_HEADER,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, LogFormat,
    LoggingConfig, SanitizedConfig, API_TOKEN_ENV,
};
pub use deploy::{
    DeployConfig, DeployError, Deployer, LaunchedDeploy, ProcessDeployer, SpawnFailurePolicy,
    ARTIFACT_ENV_VAR,
};
pub use payload::{validate, PayloadError, Ticket, ValidatedPayload};
pub use pipeline::{DeployStatus, Pipeline, PipelineError, PipelineOutcome, Stage};
pub use store::{BuildRecord, BuildStore, SqliteBuildStore, StoreError};
