//! # hotrun
//!
//! Re-run a script through its interpreter whenever the file changes, or when
//! `reload` is typed on stdin.
//!
//! ## Overview
//!
//! `hotrun` watches a single file by polling its modification timestamp and
//! runs it with the interpreter registered for its extension:
//! - The interpreter is picked once at startup: the first existing path in the
//!   extension's ordered candidate list
//! - The file runs once immediately, then on every timestamp change
//! - Typing `reload` forces a run without touching the timestamp
//! - The interpreter's stdout and stderr are captured, trimmed and relayed
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hotrun::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let session = WatchSession::builder()
//!     .with_file("script.py")
//!     .with_env_overrides("HOTRUN", "__")
//!     .build()?;
//!
//! // Runs until Ctrl-C
//! session.run().await
//! # }
//! ```
//!
//! ## Interpreter registry
//!
//! The registry starts from a built-in table of common script interpreters.
//! `HOTRUN_INTERPRETERS__<EXT>` replaces the candidates of one extension with
//! a path-list, e.g. `HOTRUN_INTERPRETERS__PY=/opt/py/bin/python3:/usr/bin/python3`.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod console;
pub mod core;
pub mod error;
pub mod sources;
pub mod trigger;
pub mod watch;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{InterpreterRegistry, ResolvedInterpreter, WatchSession, WatchSessionBuilder};
    pub use crate::error::{Result, WatchError};
    pub use crate::trigger::{ExecutionTrigger, RunOutput};
    pub use crate::watch::ChangeSource;
}
