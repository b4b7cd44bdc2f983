//! Shell configuration.
//!
//! `ShellConfig` carries the welcome banner, the static prompt and the
//! initial environment. With the `config` feature it can be loaded from TOML:
//!
//! ```toml
//! welcome = "Welcome to the shell"
//! prompt = "> "
//!
//! [environment]
//! USER = "guest"
//! ```

use std::collections::BTreeMap;

/// Default prompt when neither the config nor a prompt provider sets one.
pub const DEFAULT_PROMPT: &str = "$ ";

/// Runtime configuration for a [`Shell`](crate::Shell).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default, deny_unknown_fields))]
pub struct ShellConfig {
    /// Banner printed by `activate()`
    pub welcome: Option<String>,

    /// Static prompt (ignored once a prompt provider is installed)
    pub prompt: String,

    /// Initial environment entries
    pub environment: BTreeMap<String, String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            welcome: None,
            prompt: DEFAULT_PROMPT.to_string(),
            environment: BTreeMap::new(),
        }
    }
}

impl ShellConfig {
    /// Builder method to set the welcome banner.
    pub fn with_welcome(mut self, welcome: impl Into<String>) -> Self {
        self.welcome = Some(welcome.into());
        self
    }

    /// Builder method to set the static prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Builder method to add an initial environment entry.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }
}

/// Error loading a configuration file.
#[cfg(feature = "config")]
#[derive(Debug, thiserror::Error)]
#[error("invalid shell config: {0}")]
pub struct ConfigError(#[from] toml::de::Error);

#[cfg(feature = "config")]
impl ShellConfig {
    /// Parse a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}
