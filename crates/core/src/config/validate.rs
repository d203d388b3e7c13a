use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Extensions are bare (non-empty, no dot or path separator)
/// - Upload and output areas are distinct
/// - Retention interval and TTL are non-zero when retention is enabled
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Storage validation
    for (key, ext) in [
        ("storage.upload_extension", &config.storage.upload_extension),
        ("storage.artifact_extension", &config.storage.artifact_extension),
    ] {
        if ext.is_empty() || ext.contains(&['.', '/', '\\'][..]) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be a bare extension, got {:?}",
                key, ext
            )));
        }
    }
    if config.storage.upload_dir == config.storage.output_dir {
        return Err(ConfigError::ValidationError(
            "storage.upload_dir and storage.output_dir must differ".to_string(),
        ));
    }

    // Retention validation
    if config.retention.enabled {
        if config.retention.interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "retention.interval_secs cannot be 0".to_string(),
            ));
        }
        if config.retention.ttl_secs == 0 {
            return Err(ConfigError::ValidationError(
                "retention.ttl_secs cannot be 0".to_string(),
            ));
        }
    }

    Ok(())
}
