//! Configuration file handling for backdrop.
//!
//! The file is TOML, read from the platform config directory unless a path
//! is given. Every key is optional; missing keys take their defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use backdrop_core::EffectKind;
use backdrop_effects::EffectSettings;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// File name inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Accepted `log_level` values.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// How terminal cells map onto surface units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Surface units per cell column.
    pub cell_width: f32,
    /// Surface units per cell row.
    pub cell_height: f32,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            cell_height: 16.0,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Effect shown at start-up.
    pub effect: EffectKind,
    /// Fixed random seed. Random per run when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Target time between frames.
    pub frame_interval_ms: u64,
    pub log_level: String,
    pub terminal: TerminalConfig,
    /// One table per effect, e.g. `[aurora]`.
    #[serde(flatten)]
    pub effects: EffectSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            effect: EffectKind::default(),
            seed: None,
            frame_interval_ms: 16,
            log_level: "info".to_string(),
            terminal: TerminalConfig::default(),
            effects: EffectSettings::default(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "backdrop", "backdrop")
}

/// Default location of the config file, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Directory for log files, if the platform has one.
pub fn log_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_local_dir().to_path_buf())
}

impl Config {
    /// Load from `path`, or the default location when `None`.
    ///
    /// A file that does not exist yields the defaults. A file that exists but
    /// does not parse or validate is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => {
                    tracing::warn!("no config directory on this platform, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&text)
            .wrap_err_with(|| format!("invalid config file {}", path.display()))?;
        tracing::info!(path = %path.display(), effect = %config.effect, "config loaded");
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).wrap_err("failed to parse config")?;
        config.validate()
    }

    /// Reject values outside their documented ranges.
    pub fn validate(self) -> Result<Self> {
        if !(1..=1000).contains(&self.frame_interval_ms) {
            bail!(
                "frame_interval_ms must be within 1..=1000, got {}",
                self.frame_interval_ms
            );
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            bail!(
                "log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                self.log_level
            );
        }
        let cell = [self.terminal.cell_width, self.terminal.cell_height];
        if !cell.iter().all(|v| v.is_finite() && *v > 0.0) {
            bail!(
                "terminal cell size must be positive and finite, got {}x{}",
                cell[0],
                cell[1]
            );
        }
        Ok(self)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}
