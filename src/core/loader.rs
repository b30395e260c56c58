//! Registry loader that merges multiple sources.

use crate::core::registry::{InterpreterRegistry, RegistrySettings};
use crate::error::{Result, WatchError};
use crate::sources::RegistrySource;
use std::collections::HashMap;
use tracing::debug;

/// Loads and merges the interpreter registry from multiple sources.
///
/// Sources are applied lowest priority first, so a higher priority source
/// replaces the candidate list of every extension it names and leaves the
/// others untouched.
pub struct RegistryLoader {
    sources: Vec<Box<dyn RegistrySource>>,
}

impl RegistryLoader {
    /// Create a new registry loader.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Add a registry source.
    pub fn add_source(&mut self, source: Box<dyn RegistrySource>) {
        self.sources.push(source);
    }

    /// Load and merge the registry from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any source fails to load
    /// - The merged entries are not candidate lists
    pub fn load(&self) -> Result<InterpreterRegistry> {
        let mut builder = config::Config::builder();

        for source in self.sorted_sources() {
            let values = source.load().map_err(|e| {
                WatchError::LoadError(format!("Failed to load source '{}': {}", source.name(), e))
            })?;

            let mut flat = HashMap::new();
            for (key, value) in values {
                flatten_into(key, value, &mut flat);
            }
            debug!(source = %source.name(), entries = flat.len(), "merging registry source");

            for (key, value) in flat {
                builder = builder.set_override(&key, value).map_err(|e| {
                    WatchError::LoadError(format!(
                        "Failed to merge source '{}': {}",
                        source.name(),
                        e
                    ))
                })?;
            }
        }

        let config = builder
            .build()
            .map_err(|e| WatchError::LoadError(format!("Failed to build registry: {}", e)))?;

        let settings = config.try_deserialize::<RegistrySettings>().map_err(|e| {
            WatchError::DeserializationError(format!("Failed to deserialize registry: {}", e))
        })?;

        Ok(settings.into())
    }

    /// Get the list of source names in priority order.
    pub fn source_names(&self) -> Vec<String> {
        self.sorted_sources().iter().map(|s| s.name()).collect()
    }

    fn sorted_sources(&self) -> Vec<&dyn RegistrySource> {
        let mut sorted: Vec<&dyn RegistrySource> = self.sources.iter().map(|s| s.as_ref()).collect();
        sorted.sort_by_key(|s| s.priority());
        sorted
    }
}

impl Default for RegistryLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand nested tables into dotted keys so an override replaces single
/// extensions rather than the whole `interpreters` table.
fn flatten_into(key: String, value: config::Value, out: &mut HashMap<String, config::Value>) {
    match value.clone().into_table() {
        Ok(table) => {
            for (child, nested) in table {
                flatten_into(format!("{key}.{child}"), nested, out);
            }
        }
        Err(_) => {
            out.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{DefaultsSource, EnvSource};
    use std::path::PathBuf;

    struct MockSource {
        name: String,
        priority: i32,
        values: HashMap<String, config::Value>,
    }

    impl MockSource {
        fn new(name: &str, priority: i32) -> Self {
            Self {
                name: name.to_string(),
                priority,
                values: HashMap::new(),
            }
        }

        fn with_list(mut self, ext: &str, paths: &[&str]) -> Self {
            let paths: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
            self.values
                .insert(format!("interpreters.{ext}"), config::Value::from(paths));
            self
        }
    }

    impl RegistrySource for MockSource {
        fn load(&self) -> Result<HashMap<String, config::Value>> {
            Ok(self.values.clone())
        }

        fn name(&self) -> String {
            self.name.clone()
        }

        fn priority(&self) -> i32 {
            self.priority
        }
    }

    #[test]
    fn test_empty_loader() {
        let registry = RegistryLoader::new().load().unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_single_source() {
        let mut loader = RegistryLoader::new();
        loader.add_source(Box::new(
            MockSource::new("test", 100).with_list("py", &["/a/python3", "/b/python3"]),
        ));

        let registry = loader.load().unwrap();
        assert_eq!(
            registry.candidates("py").unwrap(),
            &[PathBuf::from("/a/python3"), PathBuf::from("/b/python3")]
        );
    }

    #[test]
    fn test_precedence_replaces_per_extension() {
        let mut loader = RegistryLoader::new();
        loader.add_source(Box::new(
            MockSource::new("override", 200).with_list("py", &["/custom/python3"]),
        ));
        loader.add_source(Box::new(
            MockSource::new("base", 100)
                .with_list("py", &["/usr/bin/python3", "/usr/local/bin/python3"])
                .with_list("rb", &["/usr/bin/ruby"]),
        ));

        let registry = loader.load().unwrap();
        assert_eq!(
            registry.candidates("py").unwrap(),
            &[PathBuf::from("/custom/python3")]
        );
        assert_eq!(registry.candidates("rb").unwrap(), &[PathBuf::from("/usr/bin/ruby")]);
    }

    #[test]
    fn test_env_overrides_defaults() {
        let mut loader = RegistryLoader::new();
        loader.add_source(Box::new(DefaultsSource::new()));
        let joined = std::env::join_paths(["/opt/py/python3", "/usr/bin/python3"]).unwrap();
        let vars = HashMap::from([(
            "HOTRUN_INTERPRETERS__PY".to_string(),
            joined.to_string_lossy().into_owned(),
        )]);
        loader.add_source(Box::new(EnvSource::new("HOTRUN", "__").with_vars(vars)));

        let registry = loader.load().unwrap();
        assert_eq!(
            registry.candidates("py").unwrap(),
            &[PathBuf::from("/opt/py/python3"), PathBuf::from("/usr/bin/python3")]
        );
        // Untouched defaults survive the override.
        assert_eq!(registry.candidates("sh").unwrap()[0], PathBuf::from("/bin/sh"));
    }

    #[test]
    fn test_source_names() {
        let mut loader = RegistryLoader::new();
        loader.add_source(Box::new(MockSource::new("source1", 100)));
        loader.add_source(Box::new(MockSource::new("source2", 200)));
        loader.add_source(Box::new(MockSource::new("source3", 50)));

        assert_eq!(loader.source_names(), vec!["source3", "source1", "source2"]);
    }
}
