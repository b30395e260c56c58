//! Environment variable registry source.

use super::RegistrySource;
use crate::error::{Result, WatchError};
use config::Environment;
use std::collections::HashMap;

/// Environment variable registry source.
///
/// Reads candidate lists from variables named
/// `<PREFIX>_INTERPRETERS<SEP><EXT>`. The value is a platform path-list
/// (`:`-separated on Unix, `;` on Windows) and replaces the candidate list
/// of that extension.
///
/// # Examples
///
/// ```rust
/// use hotrun::sources::EnvSource;
///
/// // HOTRUN_INTERPRETERS__PY=/opt/py/bin/python3:/usr/bin/python3
/// let source = EnvSource::new("HOTRUN", "__");
/// ```
pub struct EnvSource {
    prefix: String,
    separator: String,
    priority: i32,
    vars: Option<HashMap<String, String>>,
}

impl EnvSource {
    /// Create a new environment variable source.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Prefix for environment variables (e.g., "HOTRUN")
    /// * `separator` - Separator for nested keys (e.g., "__" for HOTRUN_INTERPRETERS__PY)
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: separator.into(),
            priority: 300,
            vars: None,
        }
    }

    /// Set the priority for this source.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Read from the given map instead of the process environment.
    pub fn with_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.vars = Some(vars);
        self
    }
}

impl RegistrySource for EnvSource {
    fn load(&self) -> Result<HashMap<String, config::Value>> {
        // Values stay strings: a path-list is never a number or a bool.
        let env_source = Environment::with_prefix(&self.prefix)
            .prefix_separator("_")
            .separator(&self.separator)
            .source(self.vars.clone());

        let config_builder = config::Config::builder()
            .add_source(env_source)
            .build()
            .map_err(|e| {
                WatchError::LoadError(format!("Failed to load environment variables: {}", e))
            })?;

        let map = config_builder
            .try_deserialize::<HashMap<String, config::Value>>()
            .map_err(|e| {
                WatchError::DeserializationError(format!(
                    "Failed to parse environment variables: {}",
                    e
                ))
            })?;

        Ok(map)
    }

    fn name(&self) -> String {
        format!("env:{}*", self.prefix)
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
