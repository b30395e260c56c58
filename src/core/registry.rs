//! Extension to interpreter mapping and one-shot resolution.

use crate::error::{Result, WatchError};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Candidate list as it appears in a registry source.
///
/// Built-in entries arrive as lists, environment overrides as a single
/// path-list string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Candidates {
    List(Vec<PathBuf>),
    Joined(String),
}

impl Candidates {
    fn into_paths(self) -> Vec<PathBuf> {
        match self {
            Self::List(paths) => paths,
            Self::Joined(joined) => std::env::split_paths(&joined)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
        }
    }
}

/// Shape of the merged registry configuration.
#[derive(Debug, Deserialize)]
pub(crate) struct RegistrySettings {
    #[serde(default)]
    interpreters: HashMap<String, Candidates>,
}

impl From<RegistrySettings> for InterpreterRegistry {
    fn from(settings: RegistrySettings) -> Self {
        settings
            .interpreters
            .into_iter()
            .map(|(ext, candidates)| (ext, candidates.into_paths()))
            .collect()
    }
}

/// Static mapping from file extension to an ordered list of candidate
/// interpreter paths.
///
/// # Examples
///
/// ```rust
/// use hotrun::core::InterpreterRegistry;
///
/// let registry = InterpreterRegistry::new()
///     .with_interpreter("sh", ["/bin/sh", "/usr/bin/sh"]);
/// assert!(registry.contains("sh"));
/// assert!(!registry.contains("py"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterpreterRegistry {
    entries: HashMap<String, Vec<PathBuf>>,
}

impl InterpreterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the candidates for an extension.
    pub fn with_interpreter<I, P>(mut self, extension: impl Into<String>, candidates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.entries.insert(
            extension.into(),
            candidates.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Candidate paths for an extension, in probe order.
    pub fn candidates(&self, extension: &str) -> Option<&[PathBuf]> {
        self.entries.get(extension).map(Vec::as_slice)
    }

    /// Whether the extension has an entry.
    pub fn contains(&self, extension: &str) -> bool {
        self.entries.contains_key(extension)
    }

    /// Registered extensions, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Number of registered extensions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve the interpreter for `extension`.
    ///
    /// Returns the first candidate that exists on disk at call time.
    ///
    /// # Errors
    ///
    /// - [`WatchError::UnsupportedExtension`] if the extension has no entry
    /// - [`WatchError::InterpreterNotFound`] if no candidate exists
    pub fn resolve(&self, extension: &str) -> Result<ResolvedInterpreter> {
        let candidates =
            self.candidates(extension)
                .ok_or_else(|| WatchError::UnsupportedExtension {
                    extension: extension.to_string(),
                })?;

        for candidate in candidates {
            if candidate.exists() {
                debug!(extension, interpreter = %candidate.display(), "interpreter resolved");
                return Ok(ResolvedInterpreter {
                    extension: extension.to_string(),
                    path: candidate.clone(),
                });
            }
            debug!(extension, candidate = %candidate.display(), "candidate missing");
        }

        Err(WatchError::InterpreterNotFound {
            extension: extension.to_string(),
            candidates: candidates.to_vec(),
        })
    }
}

impl FromIterator<(String, Vec<PathBuf>)> for InterpreterRegistry {
    fn from_iter<T: IntoIterator<Item = (String, Vec<PathBuf>)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Resolve an interpreter for `extension` against `registry`.
///
/// Free-function form of [`InterpreterRegistry::resolve`].
pub fn resolve_interpreter(extension: &str, registry: &InterpreterRegistry) -> Result<ResolvedInterpreter> {
    registry.resolve(extension)
}

/// The interpreter chosen for a watched file.
///
/// Selected once at startup and never re-resolved, even if the executable
/// later disappears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInterpreter {
    extension: String,
    path: PathBuf,
}

impl ResolvedInterpreter {
    /// Extension this interpreter was resolved for.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Path of the interpreter executable.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ResolvedInterpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Extension of `path` as used for registry lookup.
///
/// Everything after the last `.` of the file name; empty when there is none.
/// A leading dot counts too, so `.py` has the extension `py`.
pub fn extension_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext.to_string()))
        .unwrap_or_default()
}
