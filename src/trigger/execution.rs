//! Running the watched file through its interpreter.

use crate::console;
use crate::core::{InterpreterRegistry, ResolvedInterpreter, extension_of};
use crate::error::{Result, WatchError};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Default pause between the reload notice and the interpreter start.
pub const DEFAULT_PACE: Duration = Duration::from_millis(300);

/// Runs one file through an interpreter resolved once at construction.
///
/// Holds no mutable state, so concurrent [`run_once`](Self::run_once) calls
/// are safe; their console output may interleave.
///
/// # Examples
///
/// ```rust,no_run
/// use hotrun::core::InterpreterRegistry;
/// use hotrun::trigger::ExecutionTrigger;
///
/// # async fn example() -> hotrun::error::Result<()> {
/// let registry = InterpreterRegistry::new().with_interpreter("sh", ["/bin/sh"]);
/// let trigger = ExecutionTrigger::new("/tmp/hello.sh", &registry)?;
/// let output = trigger.run_once().await?;
/// println!("exit: {}", output.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ExecutionTrigger {
    file: PathBuf,
    interpreter: ResolvedInterpreter,
    pace: Duration,
}

impl ExecutionTrigger {
    /// Resolve the interpreter for `file`'s extension and announce it.
    ///
    /// # Errors
    ///
    /// - [`WatchError::UnsupportedExtension`] if the extension is not registered
    /// - [`WatchError::InterpreterNotFound`] if no candidate exists on disk
    pub fn new(file: impl Into<PathBuf>, registry: &InterpreterRegistry) -> Result<Self> {
        let file = file.into();
        let interpreter = registry.resolve(&extension_of(&file))?;

        console::warn(format!("Compiler: {interpreter}"));
        info!(file = %file.display(), interpreter = %interpreter, "interpreter selected");

        Ok(Self::with_interpreter(file, interpreter))
    }

    /// Build a trigger around an already resolved interpreter.
    pub fn with_interpreter(file: impl Into<PathBuf>, interpreter: ResolvedInterpreter) -> Self {
        Self {
            file: file.into(),
            interpreter,
            pace: DEFAULT_PACE,
        }
    }

    /// Set the pause between the reload notice and the interpreter start.
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    /// File handed to the interpreter.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Interpreter used for every run.
    pub fn interpreter(&self) -> &ResolvedInterpreter {
        &self.interpreter
    }

    /// Announce the reload, run the file and relay its output.
    ///
    /// Only non-empty streams are printed: stdout to stdout, stderr to
    /// stderr. A failing exit status is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Spawn`] if the interpreter cannot be started.
    pub async fn run_once(&self) -> Result<RunOutput> {
        console::info(format!("Reload file changes [ {} ]", self.file.display()));
        if !self.pace.is_zero() {
            tokio::time::sleep(self.pace).await;
        }

        let output = self.execute().await?;
        output.relay();
        Ok(output)
    }

    /// Run the file and capture its output without printing anything.
    ///
    /// Waits for the interpreter to exit; there is no timeout.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Spawn`] if the interpreter cannot be started.
    pub async fn execute(&self) -> Result<RunOutput> {
        let interpreter = self.interpreter.path();
        debug!(interpreter = %interpreter.display(), file = %self.file.display(), "spawning");

        let output = Command::new(interpreter)
            .arg(&self.file)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| WatchError::Spawn {
                interpreter: interpreter.to_path_buf(),
                source,
            })?;

        let output = RunOutput::from(output);
        debug!(status = %output.status, "interpreter exited");
        Ok(output)
    }
}

/// Captured result of one interpreter run.
///
/// Both streams are decoded as UTF-8 (invalid sequences replaced) and
/// trimmed of surrounding whitespace.
#[derive(Debug, Clone)]
pub struct RunOutput {
    stdout: String,
    stderr: String,
    status: ExitStatus,
}

impl RunOutput {
    /// Trimmed standard output.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Trimmed standard error.
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Exit status of the interpreter.
    pub fn status(&self) -> ExitStatus {
        self.status
    }

    /// Print each non-empty stream to its console counterpart.
    pub fn relay(&self) {
        if !self.stdout.is_empty() {
            console::relay_stdout(&self.stdout);
        }
        if !self.stderr.is_empty() {
            console::relay_stderr(&self.stderr);
        }
    }
}

impl From<Output> for RunOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            status: output.status,
        }
    }
}
