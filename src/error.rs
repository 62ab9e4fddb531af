use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for release-deploy operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fatal error: You must specify one of {}", choices.join(", "))]
    UnknownProfile {
        key: Option<String>,
        choices: Vec<String>,
    },

    #[error(
        "Git is showing {} dirty files, ({}) please fix and retry",
        paths.len(),
        paths.join(", ")
    )]
    DirtyWorkingTree { paths: Vec<String> },

    #[error(
        "You need to be on the [{required}] branch to deploy to the '{profile}' server (currently on '{current}')"
    )]
    WrongBranch {
        required: String,
        current: String,
        profile: String,
    },

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Error: version bump command failed ({command})")]
    BumpFailed { command: String },

    #[error("Error: command failed ({command})")]
    CommandFailed { command: String, code: Option<i32> },

    #[error("Error: could not launch command ({command})")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render template '{}'", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-deploy
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        ReleaseError::Manifest(msg.into())
    }
}
