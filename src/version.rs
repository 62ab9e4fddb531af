use std::fmt;
use std::path::Path;

use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::boundary::BoundaryWarning;
use crate::command::{CommandRunner, CommandTemplate};
use crate::error::{ReleaseError, Result};
use crate::manifest::Manifest;

/// Which segment of a semantic version gets incremented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpLevel {
    Major,
    Minor,
    Patch,
}

impl BumpLevel {
    /// Picks the level to apply: an explicit command-line override wins over
    /// the profile's configured default.
    pub fn resolve(profile_default: BumpLevel, cli_override: Option<BumpLevel>) -> BumpLevel {
        cli_override.unwrap_or(profile_default)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BumpLevel::Major => "major",
            BumpLevel::Minor => "minor",
            BumpLevel::Patch => "patch",
        }
    }
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bumps a version according to the specified level.
///
/// Increments the appropriate component and resets lower components to 0:
/// - **Major**: major += 1, minor = 0, patch = 0
/// - **Minor**: minor += 1, patch = 0
/// - **Patch**: patch += 1
///
/// Pre-release and build metadata are dropped, matching `npm version`.
///
/// # Example
/// ```
/// use release_deploy::version::{bump_version, BumpLevel};
/// use semver::Version;
///
/// let v = Version::new(1, 2, 5);
/// assert_eq!(bump_version(&v, BumpLevel::Patch), Version::new(1, 2, 6));
/// assert_eq!(bump_version(&v, BumpLevel::Minor), Version::new(1, 3, 0));
/// assert_eq!(bump_version(&v, BumpLevel::Major), Version::new(2, 0, 0));
/// ```
pub fn bump_version(version: &Version, level: BumpLevel) -> Version {
    let mut next = match level {
        BumpLevel::Major => Version::new(version.major + 1, 0, 0),
        BumpLevel::Minor => Version::new(version.major, version.minor + 1, 0),
        BumpLevel::Patch => Version::new(version.major, version.minor, version.patch + 1),
    };
    next.pre = Prerelease::EMPTY;
    next.build = BuildMetadata::EMPTY;
    next
}

/// Result of the version bump stage.
#[derive(Debug, Clone, PartialEq)]
pub struct BumpOutcome {
    /// Version found in the manifest before the stage ran
    pub previous: Version,
    /// Version the release will carry
    pub current: Version,
    /// Whether the external increment command was executed
    pub bumped: bool,
    /// Non-fatal observations made while bumping
    pub warnings: Vec<BoundaryWarning>,
}

/// Runs the external version-increment command and re-reads the manifest.
///
/// The command mutates the manifest on disk, so the new version is taken from
/// a fresh read rather than from the computed expectation. When `skip` is set
/// nothing runs and the manifest version is returned unchanged.
pub fn run_bump<R: CommandRunner>(
    runner: &R,
    manifest_path: &Path,
    bump_command: &CommandTemplate,
    level: BumpLevel,
    skip: bool,
) -> Result<BumpOutcome> {
    let previous = Manifest::load(manifest_path)?.version;

    if skip {
        debug!(version = %previous, "version bump suppressed");
        let warnings = vec![BoundaryWarning::BumpSkipped {
            version: previous.to_string(),
        }];
        return Ok(BumpOutcome {
            current: previous.clone(),
            previous,
            bumped: false,
            warnings,
        });
    }

    let step = bump_command.to_step(&[("level", level.as_str())]);
    debug!(command = %step, "executing version bump");
    runner.run(&step).map_err(|e| match e {
        ReleaseError::CommandFailed { command, .. } => ReleaseError::BumpFailed { command },
        other => other,
    })?;

    let current = Manifest::load(manifest_path)?.version;
    let expected = bump_version(&previous, level);
    let mut warnings = Vec::new();
    if current != expected {
        warnings.push(BoundaryWarning::UnexpectedBumpResult {
            expected: expected.to_string(),
            found: current.to_string(),
        });
    }

    Ok(BumpOutcome {
        previous,
        current,
        bumped: true,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_patch() {
        let v = Version::parse("1.2.5").unwrap();
        assert_eq!(bump_version(&v, BumpLevel::Patch).to_string(), "1.2.6");
    }

    #[test]
    fn test_bump_minor() {
        let v = Version::parse("1.2.5").unwrap();
        assert_eq!(bump_version(&v, BumpLevel::Minor).to_string(), "1.3.0");
    }

    #[test]
    fn test_bump_major() {
        let v = Version::parse("1.2.5").unwrap();
        assert_eq!(bump_version(&v, BumpLevel::Major).to_string(), "2.0.0");
    }

    #[test]
    fn test_bump_drops_prerelease() {
        let v = Version::parse("1.2.5-beta.1+build.7").unwrap();
        assert_eq!(bump_version(&v, BumpLevel::Patch).to_string(), "1.2.6");
    }

    #[test]
    fn test_resolve_prefers_override() {
        assert_eq!(
            BumpLevel::resolve(BumpLevel::Patch, Some(BumpLevel::Major)),
            BumpLevel::Major
        );
        assert_eq!(BumpLevel::resolve(BumpLevel::Minor, None), BumpLevel::Minor);
    }

    #[test]
    fn test_level_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            bump: BumpLevel,
        }
        let w: Wrapper = toml::from_str("bump = \"minor\"").unwrap();
        assert_eq!(w.bump, BumpLevel::Minor);
    }
}
