use std::fmt;

/// Non-fatal issues met during a release.
/// These are reported to the user and never abort the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The template walk could not read an entry
    TemplateTraversal { path: String, reason: String },
    /// The template root holds no files
    EmptyTemplateSet { root: String },
    /// Version bumping was suppressed on the command line
    BumpSkipped { version: String },
    /// The manifest version after bumping is not the computed next version
    UnexpectedBumpResult { expected: String, found: String },
    /// A file the deployment tool is pointed at does not exist
    MissingDeploymentFile { path: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::TemplateTraversal { path, reason } => {
                write!(f, "Could not read template entry '{}': {}", path, reason)
            }
            BoundaryWarning::EmptyTemplateSet { root } => {
                write!(f, "No template files found under '{}'", root)
            }
            BoundaryWarning::BumpSkipped { version } => {
                write!(f, "Not bumping version, releasing {} as is", version)
            }
            BoundaryWarning::UnexpectedBumpResult { expected, found } => {
                write!(
                    f,
                    "Manifest version is {} after bumping, expected {}",
                    found, expected
                )
            }
            BoundaryWarning::MissingDeploymentFile { path } => {
                write!(f, "Deployment file '{}' does not exist", path)
            }
        }
    }
}
