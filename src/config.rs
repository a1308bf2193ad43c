//! Runtime configuration.

use serde::{Deserialize, Serialize};

use crate::registry::DEFAULT_STATE_TAG;

/// Settings shared by the builder, the compiler and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Metadata tag whose value registers an element by key.
    pub state_tag: String,
    /// Fallback log filter when `RUST_LOG` is not set.
    pub log_level: String,
    /// Log a warning when a node declares both text and html content.
    pub warn_on_mixed_content: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_tag: DEFAULT_STATE_TAG.to_string(),
            log_level: "info".to_string(),
            warn_on_mixed_content: true,
        }
    }
}

impl Config {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config = Config::from_json(r#"{"stateTag":"key"}"#).unwrap();
        assert_eq!(config.state_tag, "key");
        assert_eq!(config.log_level, "info");
        assert!(config.warn_on_mixed_content);
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }
}
