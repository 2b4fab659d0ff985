//! Registry configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SwitchboardError};

/// Separator placed between a namespace and a task.
pub const DEFAULT_SEPARATOR: char = ':';

/// Settings shared by every entity built against a [`Registry`](crate::Registry).
///
/// ```ignore
/// let config = RegistryConfig::from_json(r#"{ "separator": "." }"#)?;
/// let registry = Registry::with_config(config)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Character joining a namespace and a task into one event name.
    pub separator: char,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
        }
    }
}

impl RegistryConfig {
    /// Replace the separator.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Check that the settings can be used to build event names.
    pub fn validate(&self) -> Result<()> {
        if self.separator.is_whitespace() {
            return Err(SwitchboardError::InvalidSeparator(self.separator));
        }
        Ok(())
    }

    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
