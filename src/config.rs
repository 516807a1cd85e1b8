// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::storage::LocalStorage;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use strum::{EnumIter, IntoEnumIterator};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

    /// "off, error, warn, ..." for help and error text.
    pub fn choices() -> String {
        LogLevel::iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Off => write!(f, "off"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Overrides `<data dir>/tasks.json`.
    #[serde(default)]
    pub tasks_file: Option<PathBuf>,
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default = "default_true")]
    pub confirm_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks_file: None,
            log_level: LogLevel::default(),
            // Match the serde defaults
            confirm_delete: true,
        }
    }
}

impl Config {
    /// Load the configuration from disk. A missing file yields the defaults;
    /// an unreadable or malformed one is an error.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

        let config: Config = toml::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse config file '{}' (log_level is one of: {})",
                path.display(),
                LogLevel::choices()
            )
        })?;

        Ok(config)
    }

    /// Like `load`, but writes the defaults out on first run so the user has
    /// a file to edit.
    pub fn load_or_init(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;
        if path.exists() {
            return Self::load(ctx);
        }
        let config = Self::default();
        config.save(ctx)?;
        log::info!("Wrote default config to {:?}", path);
        Ok(config)
    }

    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    /// Task file to use: the configured override or the context default.
    pub fn tasks_path(&self, ctx: &dyn AppContext) -> Result<PathBuf> {
        match &self.tasks_file {
            Some(p) => Ok(p.clone()),
            None => ctx.get_tasks_path(),
        }
    }
}
