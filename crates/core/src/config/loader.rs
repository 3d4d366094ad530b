use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable holding the API token
pub const API_TOKEN_ENV: &str = "API_TOKEN";

/// Load configuration from file with environment variable overrides.
///
/// `BUILDHOOK_SECTION__KEY` overrides `section.key`, and `API_TOKEN`
/// overrides `auth.token`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("BUILDHOOK_").split("__"))
        .merge(Env::raw().only(&[API_TOKEN_ENV]).map(|_| "auth.token".into()))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
