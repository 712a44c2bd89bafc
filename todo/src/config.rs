//! Configuration for the todo demo, read from the environment.
//!
//! | Variable | Values | Default |
//! |---|---|---|
//! | `TODO_BROADCAST_CAPACITY` | integer in `1..=65536` | `16` |
//! | `TODO_RENDER` | `rows`, `json` | `rows` |

use std::str::FromStr;
use thiserror::Error;
use todo_store_runtime::{DEFAULT_BROADCAST_CAPACITY, MAX_BROADCAST_CAPACITY, StoreConfig};

/// Environment variable holding the subscriber buffer size
pub const BROADCAST_CAPACITY_VAR: &str = "TODO_BROADCAST_CAPACITY";

/// Environment variable selecting the output format
pub const RENDER_VAR: &str = "TODO_RENDER";

/// Errors from reading configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable holds a value that cannot be used
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        /// Name of the environment variable
        var: &'static str,
        /// The rejected value
        value: String,
        /// What was expected instead
        reason: &'static str,
    },
}

/// How the demo prints the list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderFormat {
    /// One line per item: check mark, name, priority
    #[default]
    Rows,
    /// The whole list as pretty-printed JSON
    Json,
}

impl FromStr for RenderFormat {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rows" => Ok(Self::Rows),
            "json" => Ok(Self::Json),
            _ => Err("expected `rows` or `json`"),
        }
    }
}

/// Demo settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoConfig {
    /// Snapshots buffered per subscriber
    pub broadcast_capacity: usize,
    /// Output format
    pub render: RenderFormat,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
            render: RenderFormat::default(),
        }
    }
}

impl DemoConfig {
    /// Read settings from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set to an
    /// unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read settings through an arbitrary variable lookup
    ///
    /// Unset variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set to an
    /// unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(BROADCAST_CAPACITY_VAR) {
            config.broadcast_capacity = match value.trim().parse::<usize>() {
                Ok(capacity) if (1..=MAX_BROADCAST_CAPACITY).contains(&capacity) => capacity,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: BROADCAST_CAPACITY_VAR,
                        value,
                        reason: "expected a positive integer no larger than 65536",
                    });
                },
            };
        }

        if let Some(value) = lookup(RENDER_VAR) {
            config.render = value.parse().map_err(|reason| ConfigError::InvalidValue {
                var: RENDER_VAR,
                value: value.clone(),
                reason,
            })?;
        }

        Ok(config)
    }

    /// Store settings derived from this configuration
    #[must_use]
    pub const fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.broadcast_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = DemoConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DemoConfig::default());
        assert_eq!(config.store_config().broadcast_capacity, 16);
    }

    #[test]
    fn reads_both_variables() {
        let config = DemoConfig::from_lookup(lookup(&[
            ("TODO_BROADCAST_CAPACITY", "64"),
            ("TODO_RENDER", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.broadcast_capacity, 64);
        assert_eq!(config.render, RenderFormat::Json);
    }

    #[test]
    fn rejects_zero_capacity() {
        let err = DemoConfig::from_lookup(lookup(&[("TODO_BROADCAST_CAPACITY", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "TODO_BROADCAST_CAPACITY", .. }));
    }

    #[test]
    fn rejects_capacity_above_limit() {
        let huge = (usize::MAX / 2 + 1).to_string();
        let err = DemoConfig::from_lookup(lookup(&[("TODO_BROADCAST_CAPACITY", &huge)])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                var: "TODO_BROADCAST_CAPACITY",
                value: huge,
                reason: "expected a positive integer no larger than 65536",
            }
        );

        let err =
            DemoConfig::from_lookup(lookup(&[("TODO_BROADCAST_CAPACITY", "1000000000000")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "TODO_BROADCAST_CAPACITY", .. }));
    }

    #[test]
    fn accepts_capacity_at_limit() {
        let config = DemoConfig::from_lookup(lookup(&[("TODO_BROADCAST_CAPACITY", "65536")])).unwrap();
        assert_eq!(config.broadcast_capacity, MAX_BROADCAST_CAPACITY);
        assert_eq!(config.store_config().effective_capacity(), MAX_BROADCAST_CAPACITY);
    }

    #[test]
    fn rejects_unknown_format() {
        let err = DemoConfig::from_lookup(lookup(&[("TODO_RENDER", "html")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value \"html\" for TODO_RENDER: expected `rows` or `json`"
        );
    }
}
