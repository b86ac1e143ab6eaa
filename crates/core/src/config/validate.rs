use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Index URL and index name are set
/// - Index timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let url = config.index.url.trim();
    if url.is_empty() {
        return Err(ConfigError::ValidationError(
            "index.url cannot be empty".to_string(),
        ));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::ValidationError(format!(
            "index.url must be an http(s) URL, got {}",
            url
        )));
    }

    if config.index.name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "index.name cannot be empty".to_string(),
        ));
    }

    if config.index.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "index.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
