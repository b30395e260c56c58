//! Change detection for the watched file.
//!
//! Merges timestamp polling and the interactive reload command into one
//! stream of callback runs.

pub mod event;
pub mod input;
pub mod watched_file;
pub mod watcher;

pub use event::{ChangeEvent, ChangeOrigin};
pub use input::{RELOAD_COMMAND, is_reload_command};
pub use watched_file::WatchedFile;
pub use watcher::{ChangeSource, DEFAULT_INPUT_INTERVAL, DEFAULT_POLL_INTERVAL};
