//! Release publishing: commit, tag, push, deploy.
//!
//! The steps run strictly in order and the first failure stops the sequence.
//! Nothing is undone: a commit or tag that was already pushed stays pushed.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::boundary::BoundaryWarning;
use crate::command::{CommandRunner, CommandStep, CommandTemplate};
use crate::context::ReleaseContext;

/// Files handed to the deployment tool for one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentFiles {
    pub settings: PathBuf,
    pub config: PathBuf,
}

impl DeploymentFiles {
    /// `./<deployment_dir>/<profile>/settings.json` and `.../mup.js`.
    pub fn for_profile(deployment_dir: &Path, profile_name: &str) -> Self {
        let dir = Path::new(".").join(deployment_dir).join(profile_name);
        DeploymentFiles {
            settings: dir.join("settings.json"),
            config: dir.join("mup.js"),
        }
    }

    /// Warnings for files missing under `root`.
    pub fn missing_under(&self, root: &Path) -> Vec<BoundaryWarning> {
        [&self.settings, &self.config]
            .into_iter()
            .filter(|path| !root.join(path).exists())
            .map(|path| BoundaryWarning::MissingDeploymentFile {
                path: path.display().to_string(),
            })
            .collect()
    }
}

/// Builds the ordered publish commands for a release.
pub fn publish_steps(
    ctx: &ReleaseContext,
    deploy: &CommandTemplate,
    files: &DeploymentFiles,
) -> Vec<CommandStep> {
    let settings = files.settings.display().to_string();
    let config = files.config.display().to_string();

    vec![
        CommandStep::new(
            "git",
            [
                "commit".to_string(),
                "-am".to_string(),
                format!("Completed templating of {}", ctx.version),
            ],
        ),
        CommandStep::new("git", ["pull"]),
        CommandStep::new(
            "git",
            [
                "tag".to_string(),
                "-a".to_string(),
                ctx.git_tag_name(),
                "-m".to_string(),
                format!("Tag message {}", ctx.timestamp_text()),
            ],
        ),
        CommandStep::new("git", ["push"]),
        CommandStep::new("git", ["push", "--tags"]),
        deploy.to_step(&[("settings", settings.as_str()), ("config", config.as_str())]),
    ]
}

/// Runs `steps` one at a time and returns how many ran.
///
/// `on_step` sees each step just before it executes.
///
/// # Errors
/// The failing step's error, unchanged. Steps after it never run.
pub fn run_steps<R: CommandRunner>(
    runner: &R,
    steps: &[CommandStep],
    mut on_step: impl FnMut(&CommandStep),
) -> crate::error::Result<usize> {
    for (i, step) in steps.iter().enumerate() {
        debug!(step = i + 1, total = steps.len(), command = %step, "publishing");
        on_step(step);
        runner.run(step)?;
    }
    Ok(steps.len())
}
