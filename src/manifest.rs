//! Project manifest access.
//!
//! The manifest is a `package.json`-style JSON document. Only the `version`
//! field is required; `name` is read when present.

use std::fs;
use std::path::Path;

use semver::Version;
use serde::Deserialize;

use crate::error::{ReleaseError, Result};

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    name: Option<String>,
    version: Option<String>,
}

/// The fields of the project manifest the release needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub name: Option<String>,
    pub version: Version,
}

impl Manifest {
    /// Reads and parses the manifest at `path`.
    ///
    /// # Errors
    /// * `ReleaseError::Manifest` - file missing, not JSON, no `version`, or
    ///   a version that is not valid semver
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            ReleaseError::manifest(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&text).map_err(|e| match e {
            ReleaseError::Manifest(msg) => {
                ReleaseError::manifest(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn parse(text: &str) -> Result<Self> {
        let raw: RawManifest = serde_json::from_str(text)
            .map_err(|e| ReleaseError::manifest(format!("invalid JSON: {}", e)))?;
        let version_str = raw
            .version
            .ok_or_else(|| ReleaseError::manifest("missing \"version\" field"))?;
        let version = Version::parse(version_str.trim()).map_err(|e| {
            ReleaseError::manifest(format!("invalid version '{}': {}", version_str, e))
        })?;

        Ok(Manifest {
            name: raw.name,
            version,
        })
    }
}
