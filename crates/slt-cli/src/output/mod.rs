//! Output formatting utilities
//!
//! Everything user-facing goes to stdout, including failures: scripts read
//! the exit code, people read the line.

use crate::error::Result;
use console::style;
use serde::Serialize;

/// Output data as JSON
pub fn json_output<T: Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{json}");
    Ok(())
}

/// Print a success message in green
pub fn print_success(message: &str) {
    println!("{}", style(message).green());
}

/// Print an error message in red
pub fn print_error(message: &str) {
    println!("{}", style(message).red());
}

/// Print an informational message
pub fn print_info(message: &str) {
    println!("{}", style(message).yellow());
}
