//! Configuration file support
//!
//! Loads application configuration from TOML files. Every section is
//! optional; missing values fall back to `AppConfig::default()`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{AppConfig, LogFormat, LoggingConfig, ToolsConfig};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "media-tools.toml";

/// Configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// External tool settings
    pub tools: Option<ToolsSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsSettings {
    /// ffmpeg binary
    pub ffmpeg: Option<PathBuf>,
    /// ffprobe binary
    pub ffprobe: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,
    /// Output format (json, pretty)
    pub format: Option<LogFormat>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let defaults = AppConfig::default();
        Self {
            tools: Some(ToolsSettings {
                ffmpeg: Some(defaults.tools.ffmpeg),
                ffprobe: Some(defaults.tools.ffprobe),
            }),
            logging: Some(LoggingSettings {
                level: Some(defaults.logging.level),
                format: Some(defaults.logging.format),
            }),
        }
    }

    /// Convert to AppConfig
    pub fn into_app_config(self) -> AppConfig {
        let defaults = AppConfig::default();
        let tools = match self.tools {
            Some(t) => ToolsConfig {
                ffmpeg: t.ffmpeg.unwrap_or(defaults.tools.ffmpeg),
                ffprobe: t.ffprobe.unwrap_or(defaults.tools.ffprobe),
            },
            None => defaults.tools,
        };
        let logging = match self.logging {
            Some(l) => LoggingConfig {
                level: l.level.unwrap_or(defaults.logging.level),
                format: l.format.unwrap_or(defaults.logging.format),
            },
            None => defaults.logging,
        };
        AppConfig { tools, logging }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}

/// Resolve the effective configuration.
///
/// An explicit path that fails to load, or the default file failing to
/// parse, falls back to defaults. The second value then carries the warning
/// to log; loading runs before logging is initialised.
pub fn load_config(explicit: Option<&Path>) -> (AppConfig, Option<String>) {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(DEFAULT_CONFIG_PATH),
    };
    if explicit.is_none() && !path.exists() {
        return (AppConfig::default(), None);
    }
    match ConfigFile::from_file(&path) {
        Ok(cf) => (cf.into_app_config(), None),
        Err(e) => {
            let warning = format!(
                "Failed to load config file {}: {}. Using defaults.",
                path.display(),
                e
            );
            (AppConfig::default(), Some(warning))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default_config();
        let tools = config.tools.unwrap();
        assert_eq!(tools.ffmpeg, Some(PathBuf::from("ffmpeg")));
        assert_eq!(config.logging.unwrap().format, Some(LogFormat::Pretty));
    }

    #[test]
    fn test_config_file_roundtrip() {
        let config = ConfigFile::default_config();

        let mut temp_file = NamedTempFile::new().unwrap();
        let content = toml::to_string_pretty(&config).unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let loaded = ConfigFile::from_file(temp_file.path()).unwrap();
        assert_eq!(
            loaded.tools.unwrap().ffprobe,
            config.tools.unwrap().ffprobe
        );
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[tools]\nffmpeg = \"/usr/local/bin/ffmpeg\"\n")
            .unwrap();

        let config = ConfigFile::from_file(temp_file.path())
            .unwrap()
            .into_app_config();
        assert_eq!(config.tools.ffmpeg, PathBuf::from("/usr/local/bin/ffmpeg"));
        assert_eq!(config.tools.ffprobe, PathBuf::from("ffprobe"));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_empty_file_is_default() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = ConfigFile::from_file(temp_file.path())
            .unwrap()
            .into_app_config();
        assert_eq!(config.tools.ffmpeg, PathBuf::from("ffmpeg"));
    }

    #[test]
    fn test_generate_default_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        generate_default_config(&path).unwrap();

        assert!(path.exists());
        let (loaded, warning) = load_config(Some(&path));
        assert_eq!(loaded.tools.ffmpeg, PathBuf::from("ffmpeg"));
        assert!(warning.is_none());
    }

    #[test]
    fn test_load_config_invalid_falls_back() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[tools\nbroken").unwrap();

        let (config, warning) = load_config(Some(temp_file.path()));
        assert_eq!(config.tools.ffprobe, PathBuf::from("ffprobe"));

        let warning = warning.unwrap();
        assert!(warning.starts_with("Failed to load config file"));
        assert!(warning.contains(&temp_file.path().display().to_string()));
        assert!(warning.ends_with("Using defaults."));
    }

    #[test]
    fn test_load_config_missing_explicit_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warning) = load_config(Some(&dir.path().join("absent.toml")));
        assert_eq!(config.logging.level, "warn");
        assert!(warning.is_some());
    }
}
