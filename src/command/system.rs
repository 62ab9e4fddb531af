use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::command::{CommandRunner, CommandStep};
use crate::error::{ReleaseError, Result};

/// Runs commands as child processes of the current process.
///
/// Children inherit stdin, stdout and stderr so tool output (npm, git, the
/// deploy tool) reaches the user unchanged. Each child runs to completion;
/// there is no timeout.
pub struct SystemRunner {
    workdir: PathBuf,
}

impl SystemRunner {
    /// Create a runner whose children start in `workdir`
    pub fn new(workdir: impl AsRef<Path>) -> Self {
        SystemRunner {
            workdir: workdir.as_ref().to_path_buf(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, step: &CommandStep) -> Result<()> {
        debug!(command = %step, workdir = %self.workdir.display(), "executing command");

        let status = Command::new(&step.program)
            .args(&step.args)
            .current_dir(&self.workdir)
            .status()
            .map_err(|e| ReleaseError::CommandSpawn {
                command: step.to_string(),
                source: e,
            })?;

        if !status.success() {
            debug!(command = %step, code = ?status.code(), "command exited unsuccessfully");
            return Err(ReleaseError::CommandFailed {
                command: step.to_string(),
                code: status.code(),
            });
        }

        Ok(())
    }
}
