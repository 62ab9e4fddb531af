//! User interface module - styled terminal output.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Styling and printing

use std::collections::BTreeMap;

use console::style;

use crate::boundary::BoundaryWarning;
use crate::command::CommandStep;
use crate::profile::ProfileConfig;

pub mod formatter;

pub use formatter::{format_error_banner, format_profiles, format_steps, FAILURE_BANNER};

/// Print a fatal error inside the failure banner on stderr.
pub fn display_error(message: &str) {
    let banner = style(FAILURE_BANNER).for_stderr().red().bold().to_string();
    eprint!("{}", formatter::frame_message(&banner, message));
}

/// Print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print a non-fatal warning on stderr.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Print the configured deployment profiles.
pub fn display_profiles(profiles: &BTreeMap<String, ProfileConfig>) {
    println!("{}", style("Configured profiles:").bold());
    println!("{}", format_profiles(profiles));
}

/// Print the commands a release would run, without running them.
pub fn display_planned_steps(steps: &[CommandStep]) {
    println!("{}", style("Commands to run:").bold());
    println!("{}", format_steps(steps));
}
