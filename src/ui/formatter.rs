//! Pure formatting functions for UI output.
//!
//! Everything here returns plain text; styling and printing happen in the
//! parent module.

use std::collections::BTreeMap;

use crate::command::CommandStep;
use crate::profile::ProfileConfig;

/// Line framing every fatal error.
pub const FAILURE_BANNER: &str = " * * * * * * * FAILED * * * * * * * * *";

/// Frame `message` between two failure banners.
pub fn format_error_banner(message: &str) -> String {
    frame_message(FAILURE_BANNER, message)
}

/// Frame `message` between two copies of `banner`, which may carry styling.
pub fn frame_message(banner: &str, message: &str) -> String {
    format!(
        "\n{banner}\n\n{message}\n\n{banner}\n",
        banner = banner,
        message = message
    )
}

/// One line per profile: key, display name, bump level and branch policy.
pub fn format_profiles(profiles: &BTreeMap<String, ProfileConfig>) -> String {
    let width = profiles.keys().map(String::len).max().unwrap_or(0);
    profiles
        .iter()
        .map(|(key, profile)| {
            let branch = if profile.branch.is_empty() {
                "any branch".to_string()
            } else {
                format!("branch {}", profile.branch)
            };
            format!(
                "  {:<width$}  {} ({} bump, {})",
                key,
                profile.name,
                profile.bump,
                branch,
                width = width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Numbered command list, as shown by a dry run.
pub fn format_steps(steps: &[CommandStep]) -> String {
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("  {}. {}", i + 1, step))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::default_profiles;

    #[test]
    fn test_error_banner_frames_message() {
        let text = format_error_banner("Fatal error: You must specify one of demo, prod, staging");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], FAILURE_BANNER);
        assert_eq!(lines[3], "Fatal error: You must specify one of demo, prod, staging");
        assert_eq!(lines[5], FAILURE_BANNER);
    }

    #[test]
    fn test_frame_message_keeps_styled_banner() {
        let styled = format!("\x1b[31m{}\x1b[0m", FAILURE_BANNER);
        let text = frame_message(&styled, "boom");
        assert_eq!(text.matches(styled.as_str()).count(), 2);
        assert_eq!(
            frame_message(FAILURE_BANNER, "boom"),
            format_error_banner("boom")
        );
    }

    #[test]
    fn test_format_profiles() {
        let text = format_profiles(&default_profiles());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "  demo     demo (minor bump, branch develop)");
        assert_eq!(lines[1], "  prod     production (minor bump, branch master)");
        assert_eq!(lines[2], "  staging  staging (patch bump, branch develop)");
    }

    #[test]
    fn test_format_steps() {
        let steps = vec![
            CommandStep::new("git", ["pull"]),
            CommandStep::new("git", ["push", "--tags"]),
        ];
        assert_eq!(format_steps(&steps), "  1. git pull\n  2. git push --tags");
    }
}
