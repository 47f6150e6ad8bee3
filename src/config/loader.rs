//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ClientConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `credentials.corp_code`.
pub const CORP_CODE_ENV_VAR: &str = "ZYB_CORP_CODE";
/// Environment variable overriding `credentials.user_name`.
pub const USER_NAME_ENV_VAR: &str = "ZYB_USERNAME";
/// Environment variable overriding `credentials.private_key`.
pub const PRIVATE_KEY_ENV_VAR: &str = "ZYB_PRIVATE_KEY";
/// Environment variable overriding `credentials.application`.
pub const APPLICATION_ENV_VAR: &str = "ZYB_APPLICATION";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, apply environment overrides to, and validate a TOML config file.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: ClientConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

impl ClientConfig {
    /// Defaults plus credentials from `ZYB_*` environment variables.
    ///
    /// Reads `ZYB_CORP_CODE`, `ZYB_USERNAME`, `ZYB_PRIVATE_KEY` and optionally
    /// `ZYB_APPLICATION`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = ClientConfig::default();
        apply_env_overrides(&mut config, |name| std::env::var(name).ok());
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

/// Overlay credential values looked up through `lookup`.
///
/// Empty values are ignored so an unset-but-exported variable does not wipe
/// a value from the file.
pub fn apply_env_overrides<F>(config: &mut ClientConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let credentials = &mut config.credentials;
    for (name, slot) in [
        (CORP_CODE_ENV_VAR, &mut credentials.corp_code),
        (USER_NAME_ENV_VAR, &mut credentials.user_name),
        (PRIVATE_KEY_ENV_VAR, &mut credentials.private_key),
        (APPLICATION_ENV_VAR, &mut credentials.application),
    ] {
        if let Some(value) = lookup(name).filter(|v| !v.is_empty()) {
            *slot = value;
        }
    }
}
