use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "songconv.toml";

const ENV_PREFIX: &str = "SONGCONV_";

fn base() -> Figment {
    Figment::from(Serialized::defaults(Config::default()))
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(base().merge(Toml::file(path)))
}

/// Load configuration from an explicit file, else `songconv.toml` in the
/// working directory if present, else built-in defaults. Environment
/// overrides apply in every case.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            load_config(Path::new(DEFAULT_CONFIG_FILE))
        }
        None => extract(base()),
    }
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::FingerprintAlgorithm;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_empty() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[encoder]
path = "/opt/xact/AdpcmEncode.exe"
launcher = "wine"

[cache]
dir = "build/checksums"
algorithm = "sha256"

[pipeline]
keep_temp_files = true
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.encoder.path, PathBuf::from("/opt/xact/AdpcmEncode.exe"));
        assert_eq!(config.encoder.launcher, Some(PathBuf::from("wine")));
        assert_eq!(config.cache.dir, PathBuf::from("build/checksums"));
        assert_eq!(config.cache.algorithm, FingerprintAlgorithm::Sha256);
        assert!(config.pipeline.keep_temp_files);
        assert_eq!(config.pipeline.temp_suffix, "temp");
    }

    #[test]
    fn test_load_config_from_str_bad_algorithm() {
        let toml = r#"
[cache]
algorithm = "crc32"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/songconv.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_or_default_explicit_missing() {
        let result = load_config_or_default(Some(Path::new("/nonexistent/songconv.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[encoder]
path = "tools/AdpcmEncode"

[pipeline]
temp_suffix = "tmp"
log_headers = true
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.encoder.path, PathBuf::from("tools/AdpcmEncode"));
        assert_eq!(config.pipeline.temp_suffix, "tmp");
        assert!(config.pipeline.log_headers);
        assert_eq!(config.cache.dir, PathBuf::from("checksums"));
    }
}
