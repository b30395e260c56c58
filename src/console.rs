//! Terminal output for status lines and relayed interpreter output.
//!
//! Status lines are colored with `crossterm` (green for information, yellow
//! for warnings). Relayed child output is printed verbatim.

use crossterm::style::Stylize;
use std::fmt::Display;

/// Print an informational status line.
pub fn info(message: impl Display) {
    println!("{}", message.to_string().green());
}

/// Print a warning-colored status line.
pub fn warn(message: impl Display) {
    println!("{}", message.to_string().yellow());
}

/// Relay text captured from a child's standard output.
pub fn relay_stdout(text: &str) {
    println!("{text}");
}

/// Relay text captured from a child's standard error.
pub fn relay_stderr(text: &str) {
    eprintln!("{text}");
}
