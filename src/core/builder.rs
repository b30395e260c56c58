//! Builder for constructing WatchSession instances.

use crate::core::{InterpreterRegistry, RegistryLoader, WatchSession};
use crate::error::{Result, WatchError};
use crate::sources::{DefaultsSource, EnvSource, RegistrySource};
use crate::trigger::{DEFAULT_PACE, ExecutionTrigger};
use crate::watch::input::InputReader;
use crate::watch::{ChangeSource, DEFAULT_INPUT_INTERVAL, DEFAULT_POLL_INTERVAL};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Where the reload command is read from.
enum InputMode {
    Stdin,
    Reader(InputReader),
    Disabled,
}

/// Builder for constructing a `WatchSession`.
///
/// Resolution happens in [`build`](Self::build): an unsupported extension or
/// a missing interpreter fails there, before any watching starts.
///
/// # Examples
///
/// ```rust,no_run
/// use hotrun::prelude::*;
/// use std::time::Duration;
///
/// # async fn example() -> Result<()> {
/// let session = WatchSession::builder()
///     .with_file("script.py")
///     .with_env_overrides("HOTRUN", "__")
///     .with_poll_interval(Duration::from_millis(500))
///     .build()?;
///
/// session.run().await
/// # }
/// ```
pub struct WatchSessionBuilder {
    file: Option<PathBuf>,
    env_prefix: Option<String>,
    env_separator: Option<String>,
    custom_sources: Vec<Box<dyn RegistrySource>>,
    use_defaults: bool,
    registry: Option<InterpreterRegistry>,
    poll_interval: Duration,
    input_interval: Duration,
    pace: Duration,
    input: InputMode,
}

impl WatchSessionBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            file: None,
            env_prefix: None,
            env_separator: None,
            custom_sources: Vec::new(),
            use_defaults: true,
            registry: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            input_interval: DEFAULT_INPUT_INTERVAL,
            pace: DEFAULT_PACE,
            input: InputMode::Stdin,
        }
    }

    /// File to watch. Relative paths are made absolute against the current
    /// directory.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Add environment variable overrides for the registry.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Prefix for environment variables (e.g., "HOTRUN")
    /// * `separator` - Separator for nested keys (e.g., "__" for HOTRUN_INTERPRETERS__PY)
    ///
    /// Environment variables have the highest priority by default (300).
    pub fn with_env_overrides(mut self, prefix: &str, separator: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self.env_separator = Some(separator.to_string());
        self
    }

    /// Add a custom registry source.
    pub fn with_source<S: RegistrySource + 'static>(mut self, source: S) -> Self {
        self.custom_sources.push(Box::new(source));
        self
    }

    /// Leave the built-in interpreter table out of the registry.
    pub fn without_default_interpreters(mut self) -> Self {
        self.use_defaults = false;
        self
    }

    /// Use `registry` as is, skipping every registry source.
    pub fn with_registry(mut self, registry: InterpreterRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the interval between timestamp polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the pause before each read of the reload command.
    pub fn with_input_interval(mut self, interval: Duration) -> Self {
        self.input_interval = interval;
        self
    }

    /// Set the pause between the reload notice and the interpreter start.
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    /// Read the reload command from `reader` instead of stdin.
    pub fn with_input<R: BufRead + Send + 'static>(mut self, reader: R) -> Self {
        self.input = InputMode::Reader(Box::new(reader));
        self
    }

    /// Do not listen for the reload command.
    pub fn without_input(mut self) -> Self {
        self.input = InputMode::Disabled;
        self
    }

    /// Assemble the registry from the configured sources.
    ///
    /// # Errors
    ///
    /// Returns an error if a source fails to load or the merged entries are
    /// malformed.
    pub fn load_registry(&mut self) -> Result<InterpreterRegistry> {
        if let Some(registry) = &self.registry {
            return Ok(registry.clone());
        }

        let mut loader = RegistryLoader::new();
        if self.use_defaults {
            loader.add_source(Box::new(DefaultsSource::new()));
        }

        for source in self.custom_sources.drain(..) {
            loader.add_source(source);
        }

        if let (Some(prefix), Some(separator)) = (&self.env_prefix, &self.env_separator) {
            loader.add_source(Box::new(EnvSource::new(prefix.as_str(), separator.as_str())));
        }

        debug!(sources = ?loader.source_names(), "loading interpreter registry");
        loader.load()
    }

    /// Build the session.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No file was given, or it is not an existing file
    /// - The registry cannot be loaded
    /// - The file's extension is unsupported or has no interpreter on disk
    pub fn build(mut self) -> Result<WatchSession> {
        let file = self
            .file
            .take()
            .ok_or_else(|| WatchError::Other("No file to watch was specified".to_string()))?;
        let path = std::path::absolute(&file)?;
        if !path.is_file() {
            return Err(WatchError::FileNotFound(path));
        }

        let registry = self.load_registry()?;
        let trigger = ExecutionTrigger::new(&path, &registry)?.with_pace(self.pace);

        let source = ChangeSource::new(&path)
            .with_poll_interval(self.poll_interval)
            .with_input_interval(self.input_interval);
        let source = match self.input {
            InputMode::Stdin => source,
            InputMode::Reader(reader) => source.with_input(reader),
            InputMode::Disabled => source.without_input(),
        };

        Ok(WatchSession::new(source, Arc::new(trigger)))
    }
}

impl Default for WatchSessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builder_defaults() {
        let builder = WatchSessionBuilder::new();
        assert!(builder.file.is_none());
        assert!(builder.use_defaults);
        assert_eq!(builder.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(builder.pace, DEFAULT_PACE);
        assert!(matches!(builder.input, InputMode::Stdin));
    }

    #[test]
    fn test_builder_env_overrides() {
        let builder = WatchSessionBuilder::new().with_env_overrides("HOTRUN", "__");
        assert_eq!(builder.env_prefix, Some("HOTRUN".to_string()));
        assert_eq!(builder.env_separator, Some("__".to_string()));
    }

    #[test]
    fn test_build_requires_file() {
        let result = WatchSessionBuilder::new().build();
        assert!(matches!(result, Err(WatchError::Other(_))));
    }

    #[test]
    fn test_build_rejects_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = WatchSessionBuilder::new()
            .with_file(dir.path().join("missing.py"))
            .build();
        assert!(matches!(result, Err(WatchError::FileNotFound(_))));
    }

    #[test]
    fn test_build_rejects_directory() {
        let dir = TempDir::new().unwrap();
        let result = WatchSessionBuilder::new().with_file(dir.path()).build();
        assert!(matches!(result, Err(WatchError::FileNotFound(_))));
    }

    #[test]
    fn test_custom_source_without_defaults() {
        let dir = TempDir::new().unwrap();
        let interpreter = dir.path().join("interp");
        fs::write(&interpreter, "").unwrap();

        let vars = HashMap::from([(
            "TEST_INTERPRETERS__XYZ".to_string(),
            interpreter.to_string_lossy().into_owned(),
        )]);
        let mut builder = WatchSessionBuilder::new()
            .without_default_interpreters()
            .with_source(EnvSource::new("TEST", "__").with_vars(vars));

        let registry = builder.load_registry().unwrap();
        assert_eq!(registry.extensions(), vec!["xyz"]);
        assert_eq!(registry.resolve("xyz").unwrap().path(), interpreter.as_path());
    }

    #[test]
    fn test_build_with_explicit_registry() {
        let dir = TempDir::new().unwrap();
        let interpreter = dir.path().join("interp");
        let file = dir.path().join("app.xyz");
        fs::write(&interpreter, "").unwrap();
        fs::write(&file, "").unwrap();

        let session = WatchSessionBuilder::new()
            .with_file(&file)
            .with_registry(InterpreterRegistry::new().with_interpreter("xyz", [interpreter.clone()]))
            .without_input()
            .build()
            .unwrap();

        assert_eq!(session.trigger().interpreter().path(), interpreter.as_path());
        assert_eq!(session.path(), file.as_path());
    }

    #[test]
    fn test_build_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("notes.unknownext");
        fs::write(&file, "").unwrap();

        let result = WatchSessionBuilder::new().with_file(&file).build();
        assert!(matches!(
            result,
            Err(WatchError::UnsupportedExtension { extension }) if extension == "unknownext"
        ));
    }
}
