use super::{types::Config, ConfigError};
use crate::staging::{BACKUP_SUFFIX, STAGING_SUFFIX};

/// Validate configuration
/// Currently validates:
/// - Encoder path (and launcher, if set) are not empty
/// - Cache directory is not empty and the read buffer is not 0
/// - Temp suffix is a plain, non-empty extension distinct from the staging
///   and backup ones
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.encoder.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "encoder.path cannot be empty".to_string(),
        ));
    }
    if let Some(launcher) = &config.encoder.launcher {
        if launcher.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "encoder.launcher cannot be empty".to_string(),
            ));
        }
    }

    if config.cache.dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "cache.dir cannot be empty".to_string(),
        ));
    }
    if config.cache.buffer_size == 0 {
        return Err(ConfigError::ValidationError(
            "cache.buffer_size cannot be 0".to_string(),
        ));
    }

    let suffix = config.pipeline.temp_suffix.as_str();
    if suffix.is_empty() || suffix.contains(['/', '\\']) {
        return Err(ConfigError::ValidationError(format!(
            "pipeline.temp_suffix must be a plain extension, got '{}'",
            suffix
        )));
    }
    if suffix == STAGING_SUFFIX || suffix == BACKUP_SUFFIX {
        return Err(ConfigError::ValidationError(format!(
            "pipeline.temp_suffix cannot be '{}'",
            suffix
        )));
    }

    Ok(())
}
