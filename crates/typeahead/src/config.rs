//! Search input configuration.
//!
//! A [`SearchInputConfig`] can be built in code or loaded from TOML:
//!
//! ```toml
//! placeholder = "Search packages"
//! debounce_ms = 300
//! ```
//!
//! Every key is optional; missing keys take their defaults (no placeholder,
//! a 1000 ms debounce interval).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use typeahead_core::debounce::DEFAULT_INTERVAL;

use crate::error::{ConfigError, ConfigResult};

/// Configuration for a [`SearchInput`](crate::SearchInput).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchInputConfig {
    /// Hint text shown while the input is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Quiet period between the last keystroke and the lookup.
    #[serde(rename = "debounce_ms", with = "duration_ms")]
    pub debounce: Duration,
}

impl Default for SearchInputConfig {
    fn default() -> Self {
        Self {
            placeholder: None,
            debounce: DEFAULT_INTERVAL,
        }
    }
}

impl SearchInputConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the placeholder using builder pattern.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set the debounce interval using builder pattern.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Parse a configuration from a TOML document.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Render the configuration as a TOML document.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Load a configuration from a TOML file.
    pub fn load_toml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_toml_str(&source)
    }

    /// Save the configuration to a TOML file.
    pub fn save_toml(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let source = self.to_toml_string()?;
        std::fs::write(path, source).map_err(|e| ConfigError::io(path, e))
    }
}

/// Durations as whole milliseconds.
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
