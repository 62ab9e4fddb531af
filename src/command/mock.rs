use std::sync::Mutex;

use crate::command::{CommandRunner, CommandStep};
use crate::error::{ReleaseError, Result};

type Effect = Box<dyn Fn(&CommandStep) + Send + Sync>;

/// Mock runner for testing without spawning processes
///
/// Records every step it is asked to run, including the one that fails.
pub struct MockRunner {
    executed: Mutex<Vec<CommandStep>>,
    failures: Vec<(String, Option<String>)>,
    effects: Vec<(String, Effect)>,
}

impl MockRunner {
    /// Create a runner where every command succeeds
    pub fn new() -> Self {
        MockRunner {
            executed: Mutex::new(Vec::new()),
            failures: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Make steps for `program` fail; with `subcommand`, only steps whose
    /// first argument matches
    pub fn fail_on(mut self, program: &str, subcommand: Option<&str>) -> Self {
        self.failures
            .push((program.to_string(), subcommand.map(str::to_string)));
        self
    }

    /// Run `effect` whenever a step for `program` executes, before the exit
    /// status is decided. Used to emulate tools that modify files.
    pub fn with_effect<F>(mut self, program: &str, effect: F) -> Self
    where
        F: Fn(&CommandStep) + Send + Sync + 'static,
    {
        self.effects.push((program.to_string(), Box::new(effect)));
        self
    }

    /// Steps run so far, in order
    pub fn executed(&self) -> Vec<CommandStep> {
        self.executed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Display text of the steps run so far
    pub fn executed_lines(&self) -> Vec<String> {
        self.executed().iter().map(ToString::to_string).collect()
    }

    fn should_fail(&self, step: &CommandStep) -> bool {
        self.failures.iter().any(|(program, sub)| {
            *program == step.program
                && sub
                    .as_deref()
                    .map_or(true, |s| step.subcommand() == Some(s))
        })
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, step: &CommandStep) -> Result<()> {
        self.executed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(step.clone());

        for (program, effect) in &self.effects {
            if *program == step.program {
                effect(step);
            }
        }

        if self.should_fail(step) {
            return Err(ReleaseError::CommandFailed {
                command: step.to_string(),
                code: Some(1),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_mock_records_steps() {
        let runner = MockRunner::new();
        runner.run(&CommandStep::new("git", ["pull"])).unwrap();
        runner.run(&CommandStep::new("git", ["push"])).unwrap();
        assert_eq!(runner.executed_lines(), vec!["git pull", "git push"]);
    }

    #[test]
    fn test_mock_fails_on_subcommand_only() {
        let runner = MockRunner::new().fail_on("git", Some("push"));
        assert!(runner.run(&CommandStep::new("git", ["pull"])).is_ok());
        assert!(runner.run(&CommandStep::new("git", ["push"])).is_err());
        assert_eq!(runner.executed().len(), 2);
    }

    #[test]
    fn test_mock_fails_on_program() {
        let runner = MockRunner::new().fail_on("mup", None);
        let err = runner
            .run(&CommandStep::new("mup", ["deploy"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Error: command failed (mup deploy)");
    }

    #[test]
    fn test_mock_runs_effects() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let runner = MockRunner::new().with_effect("npm", move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        runner.run(&CommandStep::new("npm", ["version", "patch"])).unwrap();
        runner.run(&CommandStep::new("git", ["pull"])).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
