//! Interpreter registry source trait.

use crate::error::Result;
use std::collections::HashMap;

/// Trait for interpreter registry sources.
///
/// A source yields `interpreters.<extension>` keys mapped to candidate path
/// lists. Sources are merged by the loader in priority order, and a higher
/// priority source replaces the whole candidate list of an extension it names.
pub trait RegistrySource: Send + Sync {
    /// Load registry entries as a raw key-value map.
    ///
    /// Keys may be dotted (`interpreters.py`) or nested tables
    /// (`interpreters` -> `{ py = ... }`); the loader flattens both.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read.
    fn load(&self) -> Result<HashMap<String, config::Value>>;

    /// Get a human-readable name for this source (for logging/debugging).
    fn name(&self) -> String;

    /// Get the priority of this source (higher = takes precedence).
    ///
    /// Default priorities:
    /// - Environment variables: 300
    /// - Built-in defaults: 100
    fn priority(&self) -> i32 {
        100
    }
}
