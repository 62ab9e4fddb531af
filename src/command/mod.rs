//! External process invocation
//!
//! Every external tool the release touches (version increment, git porcelain,
//! the deployment tool) is described as a [CommandStep]: a program plus an
//! argument list. Steps are handed to a [CommandRunner] one at a time, so no
//! command line is ever assembled or parsed by a shell.
//!
//! - [system::SystemRunner]: spawns real processes
//! - [mock::MockRunner]: records steps for tests

pub mod mock;
pub mod system;

pub use mock::MockRunner;
pub use system::SystemRunner;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single external command: program name plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStep {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandStep {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandStep {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// First argument, which for git is the subcommand.
    pub fn subcommand(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

impl fmt::Display for CommandStep {
    /// Renders the step as a readable command line. Arguments containing
    /// whitespace are double-quoted; the result is for display only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.chars().any(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// A configurable command with `{placeholder}` arguments.
///
/// Placeholders are substituted with plain string replacement, the same way
/// tag patterns substitute `{version}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandTemplate {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandTemplate {
    pub fn new(program: &str, args: &[&str]) -> Self {
        CommandTemplate {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Builds a concrete step, replacing each `{key}` with its value.
    pub fn to_step(&self, values: &[(&str, &str)]) -> CommandStep {
        let args = self.args.iter().map(|arg| {
            values.iter().fold(arg.clone(), |acc, (key, value)| {
                acc.replace(&format!("{{{}}}", key), value)
            })
        });
        CommandStep::new(self.program.clone(), args)
    }
}

/// Executes external commands.
///
/// A step succeeds only when the process exits with status 0. Any other exit
/// is reported as [crate::error::ReleaseError::CommandFailed] carrying the
/// step's display text.
pub trait CommandRunner {
    fn run(&self, step: &CommandStep) -> Result<()>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, step: &CommandStep) -> Result<()> {
        (**self).run(step)
    }
}
