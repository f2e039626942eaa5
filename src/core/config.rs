//=========================================================================
// Application Configuration
//=========================================================================
//
// TOML-backed settings read once at startup.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== ConfigError =========================================================

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

//=== AppConfig ===========================================================

/// Window, pacing, asset and logging settings.
///
/// Missing keys fall back to [`AppConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Frames per second the demo driver aims for.
    pub target_fps: u32,
    /// Directory resource references are resolved against.
    pub asset_root: PathBuf,
    /// Only asset owners under this module path are discovered. Empty = all.
    pub namespace: String,
    /// `env_logger` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Proscenium".to_owned(),
            width: 720,
            height: 480,
            target_fps: 60,
            asset_root: PathBuf::from("."),
            namespace: String::new(),
            log_filter: "info".to_owned(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Rejects a zero window size or a zero `target_fps`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be positive".into()));
        }
        Ok(())
    }

    /// Seconds per frame at `target_fps`.
    pub fn frame_time(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_match_reference_window() {
        let config = AppConfig::default();
        assert_eq!((config.width, config.height), (720, 480));
        assert_relative_eq!(config.frame_time(), 1.0 / 60.0);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.toml");

        let config = AppConfig {
            title: "Demo".into(),
            namespace: "demo::actors".into(),
            ..AppConfig::default()
        };
        config.save_to_file(&path).unwrap();

        assert_eq!(AppConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        fs::write(&path, "title = \"Partial\"\ntarget_fps = 30\n").unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.title, "Partial");
        assert_eq!(config.target_fps, 30);
        assert_eq!(config.width, 720);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "width = \"wide\"").unwrap();

        assert!(matches!(
            AppConfig::load_from_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            AppConfig::load_from_file("/no/such/config.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn zero_fps_or_size_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.toml");

        fs::write(&path, "target_fps = 0\n").unwrap();
        assert!(matches!(
            AppConfig::load_from_file(&path),
            Err(ConfigError::Invalid(_))
        ));

        fs::write(&path, "width = 0\n").unwrap();
        assert!(matches!(
            AppConfig::load_from_file(&path),
            Err(ConfigError::Invalid(_))
        ));
        assert!(AppConfig::default().validate().is_ok());
    }
}
