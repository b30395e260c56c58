//! The action fired on every detected change.

mod execution;

pub use execution::{DEFAULT_PACE, ExecutionTrigger, RunOutput};
