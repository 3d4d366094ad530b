use std::path::Path;

use super::{types::Config, ConfigError};

/// Lowest port the server may bind to
const MIN_PORT: u16 = 1025;

/// Validate configuration before the server starts listening.
///
/// Checks:
/// - server port is above 1024
/// - parent directories of the database and log file exist
/// - the artifact directory exists
/// - the deploy executable exists
/// - TLS certificate and key exist when TLS is configured
///
/// Every problem found is reported in a single error.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut problems = Vec::new();

    if config.server.port < MIN_PORT {
        problems.push(format!(
            "server.port ({}) needs to be greater than 1024",
            config.server.port
        ));
    }

    check_parent_dir(&config.database.path, "database.path", &mut problems);

    if let Some(ref log_file) = config.logging.file {
        check_parent_dir(log_file, "logging.file", &mut problems);
    }

    if !config.artifacts.data_dir.is_dir() {
        problems.push(format!(
            "directory {} for artifacts.data_dir does not exist",
            config.artifacts.data_dir.display()
        ));
    }

    check_file(&config.deploy.exec_file, "deploy.exec_file", &mut problems);

    if let Some(ref tls) = config.server.tls {
        check_file(&tls.cert, "server.tls.cert", &mut problems);
        check_file(&tls.key, "server.tls.key", &mut problems);
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(problems.join("; ")))
    }
}

fn check_parent_dir(path: &Path, field: &str, problems: &mut Vec<String>) {
    // A bare file name lives in the working directory
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return,
    };
    if !parent.is_dir() {
        problems.push(format!(
            "directory {} for {} does not exist",
            parent.display(),
            field
        ));
    }
}

fn check_file(path: &Path, field: &str, problems: &mut Vec<String>) {
    if !path.exists() {
        problems.push(format!("file {} for {} does not exist", path.display(), field));
    }
}
