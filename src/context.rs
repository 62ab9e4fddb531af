use chrono::{DateTime, SecondsFormat, Utc};
use semver::Version;

use crate::guard::BranchCheck;
use crate::profile::DeploymentProfile;

/// Release metadata shared by the renderer and the publisher.
///
/// Built once after the guards and the version bump have run; nothing
/// modifies it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseContext {
    pub version: Version,
    pub branch: String,
    pub commit: String,
    pub timestamp: DateTime<Utc>,
    /// `<branch>-v<version>`
    pub tag: String,
    /// Display name of the selected profile
    pub profile: String,
}

impl ReleaseContext {
    pub fn new(
        check: BranchCheck,
        version: Version,
        profile: &DeploymentProfile,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let tag = release_tag(&check.branch, &version);
        ReleaseContext {
            version,
            branch: check.branch,
            commit: check.commit,
            timestamp,
            tag,
            profile: profile.name.clone(),
        }
    }

    /// Name of the annotated git tag: `v<version>.<profile>`.
    pub fn git_tag_name(&self) -> String {
        format!("v{}.{}", self.version, self.profile)
    }

    /// Timestamp as RFC 3339 with second precision.
    pub fn timestamp_text(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Branch-qualified release tag, e.g. `develop-v0.9.1`.
pub fn release_tag(branch: &str, version: &Version) -> String {
    format!("{}-v{}", branch, version)
}
