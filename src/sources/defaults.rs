//! Built-in interpreter locations.

use super::RegistrySource;
use crate::error::Result;
use std::collections::HashMap;

/// Conventional interpreter locations, probed in the listed order.
const DEFAULT_INTERPRETERS: &[(&str, &[&str])] = &[
    (
        "py",
        &[
            "/usr/bin/python3",
            "/usr/local/bin/python3",
            "/opt/homebrew/bin/python3",
            "/usr/bin/python",
        ],
    ),
    (
        "js",
        &["/usr/bin/node", "/usr/local/bin/node", "/opt/homebrew/bin/node"],
    ),
    (
        "mjs",
        &["/usr/bin/node", "/usr/local/bin/node", "/opt/homebrew/bin/node"],
    ),
    (
        "rb",
        &["/usr/bin/ruby", "/usr/local/bin/ruby", "/opt/homebrew/bin/ruby"],
    ),
    ("pl", &["/usr/bin/perl", "/usr/local/bin/perl"]),
    (
        "php",
        &["/usr/bin/php", "/usr/local/bin/php", "/opt/homebrew/bin/php"],
    ),
    (
        "lua",
        &["/usr/bin/lua", "/usr/local/bin/lua", "/opt/homebrew/bin/lua"],
    ),
    ("sh", &["/bin/sh", "/usr/bin/sh"]),
    ("bash", &["/bin/bash", "/usr/bin/bash", "/usr/local/bin/bash"]),
];

/// Registry source backed by the built-in table of common script interpreters.
///
/// # Examples
///
/// ```rust
/// use hotrun::sources::{DefaultsSource, RegistrySource};
///
/// let source = DefaultsSource::new();
/// let entries = source.load().unwrap();
/// assert!(entries.contains_key("interpreters.py"));
/// ```
pub struct DefaultsSource {
    priority: i32,
}

impl DefaultsSource {
    /// Create the defaults source with its usual priority (100).
    pub fn new() -> Self {
        Self { priority: 100 }
    }

    /// Set the priority for this source.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl Default for DefaultsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrySource for DefaultsSource {
    fn load(&self) -> Result<HashMap<String, config::Value>> {
        Ok(DEFAULT_INTERPRETERS
            .iter()
            .map(|(ext, paths)| {
                let candidates: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
                (format!("interpreters.{ext}"), config::Value::from(candidates))
            })
            .collect())
    }

    fn name(&self) -> String {
        "defaults".to_string()
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_extension_has_candidates() {
        for (ext, paths) in DEFAULT_INTERPRETERS {
            assert!(!paths.is_empty(), "no candidates for {ext}");
            assert!(paths.iter().all(|p| p.starts_with('/')), "relative path for {ext}");
        }
    }

    #[test]
    fn test_load_keys() {
        let map = DefaultsSource::new().load().unwrap();
        assert_eq!(map.len(), DEFAULT_INTERPRETERS.len());
        assert!(map.contains_key("interpreters.py"));
        assert!(map.contains_key("interpreters.sh"));
    }

    #[test]
    fn test_candidates_keep_order() {
        let map = DefaultsSource::new().load().unwrap();
        let py = map["interpreters.py"].clone().into_array().unwrap();
        let first = py[0].clone().into_string().unwrap();
        assert_eq!(first, "/usr/bin/python3");
    }

    #[test]
    fn test_with_priority() {
        let source = DefaultsSource::new().with_priority(10);
        assert_eq!(source.priority(), 10);
        assert_eq!(source.name(), "defaults");
    }
}
