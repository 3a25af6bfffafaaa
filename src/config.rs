//! Engine configuration
//!
//! Supports multiple profiles (debug, release) with different settings.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset
    pub filter: String,
    /// Log file; stderr when unset
    pub file: Option<PathBuf>,
    /// Whether to emit ANSI colours
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: None,
            ansi: true,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    /// Target frame rate; must be greater than zero
    pub fps: u32,
    /// Whether the engine registers its own quit handler
    pub quit: bool,
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profile: "debug".to_string(),
            fps: 60,
            quit: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Sources, later ones overriding earlier ones:
    /// 1. config/default.toml
    /// 2. config/{profile}.toml
    /// 3. Environment variables with prefix ENGINE_ (e.g., ENGINE_LOGGING__FILTER=debug)
    ///
    /// Config files are searched for in:
    /// 1. Next to the executable (target/debug/config or target/release/config)
    /// 2. In the current directory (./config)
    ///
    /// Missing files are skipped.
    pub fn load(profile: &str) -> Result<Self> {
        let dir = Self::find_config_dir().unwrap_or_else(|| PathBuf::from("config"));
        Self::load_from(&dir, profile)
    }

    /// Loads configuration from the profile files in `dir`
    pub fn load_from(dir: &Path, profile: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(dir.join("default").as_path()).required(false))
            .add_source(File::from(dir.join(profile).as_path()).required(false))
            // Use __ as separator for nested fields (e.g., ENGINE_LOGGING__FILE)
            .add_source(
                Environment::with_prefix("ENGINE")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override("profile", profile)?
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Finds the config directory by searching in multiple locations
    fn find_config_dir() -> Option<PathBuf> {
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        let cwd_config = PathBuf::from("config");
        cwd_config.exists().then_some(cwd_config)
    }

    /// Loads configuration using the ENGINE_PROFILE environment variable,
    /// defaulting to "debug"
    pub fn load_from_env() -> Result<Self> {
        let profile = std::env::var("ENGINE_PROFILE").unwrap_or_else(|_| "debug".to_string());
        Self::load(&profile)
    }

    /// Rejects settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(Error::InvalidConfig("fps must be greater than zero".to_string()));
        }
        Ok(())
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_quit(mut self, quit: bool) -> Self {
        self.quit = quit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.fps, 60);
        assert!(config.quit);
        assert_eq!(config.logging.filter, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_profile_overrides_default_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "fps = 60\nquit = true\n\n[logging]\nfilter = \"info\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("release.toml"),
            "fps = 30\n\n[logging]\nfile = \"engine.log\"\nansi = false\n",
        )
        .unwrap();

        let config = EngineConfig::load_from(dir.path(), "release").unwrap();
        assert_eq!(config.profile, "release");
        assert_eq!(config.fps, 30);
        assert!(config.quit);
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.logging.file, Some(PathBuf::from("engine.log")));
        assert!(!config.logging.ansi);
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load_from(dir.path(), "nowhere").unwrap();
        assert_eq!(config.profile, "nowhere");
        assert_eq!(config.fps, 60);
    }

    #[test]
    fn test_zero_fps_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.toml"), "fps = 0\n").unwrap();
        assert!(matches!(
            EngineConfig::load_from(dir.path(), "broken"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(EngineConfig::default().with_fps(0).validate().is_err());
    }
}
