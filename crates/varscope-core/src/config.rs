//! Process configuration
//!
//! Settings are read from TOML, with any missing key falling back to its
//! default, and can then be overridden from `VARSCOPE_*` environment variables.

use crate::errors::{Result, VarscopeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_MAX_DEPTH: &str = "VARSCOPE_MAX_DEPTH";
pub const ENV_DB_PATH: &str = "VARSCOPE_DB_PATH";
pub const ENV_QUEUE_CAPACITY: &str = "VARSCOPE_QUEUE_CAPACITY";
pub const ENV_SUBMIT_TIMEOUT_MS: &str = "VARSCOPE_SUBMIT_TIMEOUT_MS";

/// Runtime configuration for introspection and recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Deepest level the introspector descends to; the root is level 0
    pub max_depth: usize,
    /// SQLite database the recorder writes to and the viewer reads from
    pub db_path: PathBuf,
    /// Number of snapshots the recorder queue holds before submissions block
    pub queue_capacity: usize,
    /// How long `submit` waits on a full queue before dropping the snapshot
    pub submit_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 5,
            db_path: PathBuf::from(".varscope/varscope.db"),
            queue_capacity: 100,
            submit_timeout_ms: 100,
        }
    }
}

impl Config {
    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the text is not valid TOML, a key has the wrong
    ///   type, or the resulting values fail [`Config::validate`]
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|e| VarscopeError::ConfigParse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    ///
    /// # Errors
    ///
    /// - `Io` if the file cannot be read
    /// - `InvalidConfig` as for [`Config::from_toml_str`]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| VarscopeError::ConfigUnreadable {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Self::from_toml_str(&text)
    }

    /// Apply `VARSCOPE_*` overrides from the process environment.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if a numeric variable does not parse
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up through `lookup`, so callers and tests can
    /// supply their own environment.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if a numeric value does not parse or the result fails
    ///   validation
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MAX_DEPTH) {
            self.max_depth = parse_number(ENV_MAX_DEPTH, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DB_PATH) {
            self.db_path = PathBuf::from(raw);
        }
        if let Some(raw) = lookup(ENV_QUEUE_CAPACITY) {
            self.queue_capacity = parse_number(ENV_QUEUE_CAPACITY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SUBMIT_TIMEOUT_MS) {
            self.submit_timeout_ms = parse_number(ENV_SUBMIT_TIMEOUT_MS, &raw)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if `queue_capacity` is zero
    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(VarscopeError::ConfigValue {
                key: "queue_capacity".to_string(),
                reason: "queue capacity must be at least 1".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Submit timeout as a `Duration`.
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| {
        VarscopeError::ConfigValue {
            key: key.to_string(),
            reason: format!("cannot parse {:?}: {}", raw, e),
        }
        .into()
    })
}
