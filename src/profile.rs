use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ReleaseError, Result};
use crate::version::BumpLevel;

/// How a profile is written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Display name; also names the `deployment/<name>/` directory
    pub name: String,

    #[serde(default = "default_bump")]
    pub bump: BumpLevel,

    /// Branch the release must be cut from; empty allows any branch
    #[serde(default)]
    pub branch: String,
}

fn default_bump() -> BumpLevel {
    BumpLevel::Patch
}

/// A deployment target selected from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentProfile {
    pub key: String,
    pub name: String,
    pub bump: BumpLevel,
    pub required_branch: String,
}

impl DeploymentProfile {
    fn from_config(key: &str, config: &ProfileConfig) -> Self {
        DeploymentProfile {
            key: key.to_string(),
            name: config.name.clone(),
            bump: config.bump,
            required_branch: config.branch.clone(),
        }
    }

    /// Whether releases from `branch` are allowed.
    pub fn allows_branch(&self, branch: &str) -> bool {
        self.required_branch.is_empty() || self.required_branch == branch
    }
}

/// Built-in profiles used when the configuration file defines none.
pub fn default_profiles() -> BTreeMap<String, ProfileConfig> {
    let mut profiles = BTreeMap::new();
    profiles.insert(
        "prod".to_string(),
        ProfileConfig {
            name: "production".to_string(),
            bump: BumpLevel::Minor,
            branch: "master".to_string(),
        },
    );
    profiles.insert(
        "demo".to_string(),
        ProfileConfig {
            name: "demo".to_string(),
            bump: BumpLevel::Minor,
            branch: "develop".to_string(),
        },
    );
    profiles.insert(
        "staging".to_string(),
        ProfileConfig {
            name: "staging".to_string(),
            bump: BumpLevel::Patch,
            branch: "develop".to_string(),
        },
    );
    profiles
}

/// Selects the profile whose key exactly matches `key`.
///
/// # Errors
/// * `ReleaseError::UnknownProfile` - `key` is missing or not configured; the
///   error lists every valid key
pub fn select_profile(
    key: Option<&str>,
    profiles: &BTreeMap<String, ProfileConfig>,
) -> Result<DeploymentProfile> {
    match key.and_then(|k| profiles.get_key_value(k)) {
        Some((key, config)) => Ok(DeploymentProfile::from_config(key, config)),
        None => Err(ReleaseError::UnknownProfile {
            key: key.map(str::to_string),
            choices: profiles.keys().cloned().collect(),
        }),
    }
}
