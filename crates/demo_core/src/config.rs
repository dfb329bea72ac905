use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    markup::DEFAULT_CANVAS_SIZE,
    timeline::{Timings, MAX_SPEED, MIN_SPEED},
};

pub const DEFAULT_CONFIG_FILE: &str = "demo.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Time scale for every staged delay; 2.0 runs twice as fast. Must lie in
    /// `MIN_SPEED..=MAX_SPEED`.
    pub speed: f64,
    pub seed: Option<u64>,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub log_filter: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            seed: None,
            canvas_width: DEFAULT_CANVAS_SIZE.0,
            canvas_height: DEFAULT_CANVAS_SIZE.1,
            log_filter: "info".into(),
        }
    }
}

impl DemoConfig {
    pub fn from_toml(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `DEMO__*` overrides read through `lookup`.
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(v) = lookup("DEMO__SPEED") {
            self.speed = v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "DEMO__SPEED",
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup("DEMO__SEED") {
            self.seed = Some(v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "DEMO__SEED",
                value: v.clone(),
            })?);
        }
        if let Some(v) = lookup("DEMO__LOG_FILTER") {
            if !v.trim().is_empty() {
                self.log_filter = v;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.speed) {
            return Err(ConfigError::InvalidValue {
                key: "speed",
                value: self.speed.to_string(),
            });
        }
        if self.canvas_width == 0 {
            return Err(ConfigError::InvalidValue {
                key: "canvas_width",
                value: "0".into(),
            });
        }
        if self.canvas_height == 0 {
            return Err(ConfigError::InvalidValue {
                key: "canvas_height",
                value: "0".into(),
            });
        }
        Ok(())
    }

    pub fn timings(&self) -> Timings {
        Timings::scaled(self.speed)
    }
}

/// Defaults, then the TOML file, then `DEMO__*` environment variables.
///
/// An explicit `path` must exist; the default `demo.toml` is optional.
pub fn load_config(path: Option<&Path>) -> Result<DemoConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                read_file(default_path)?
            } else {
                DemoConfig::default()
            }
        }
    };

    config.apply_env_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<DemoConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    DemoConfig::from_toml(&raw, path)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
