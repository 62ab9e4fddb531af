use std::cell::Cell;

use crate::error::{ReleaseError, Result};
use crate::git::{Repository, StatusEntry};

/// Mock repository for testing without actual git operations
///
/// Counts every query so tests can assert which ones ran.
pub struct MockRepository {
    status: Vec<StatusEntry>,
    branch: Option<String>,
    head: Option<String>,
    status_calls: Cell<usize>,
    branch_calls: Cell<usize>,
    head_calls: Cell<usize>,
}

impl MockRepository {
    /// Create a clean repository on `branch` with the given HEAD hash
    pub fn new(branch: impl Into<String>, head: impl Into<String>) -> Self {
        MockRepository {
            status: Vec::new(),
            branch: Some(branch.into()),
            head: Some(head.into()),
            status_calls: Cell::new(0),
            branch_calls: Cell::new(0),
            head_calls: Cell::new(0),
        }
    }

    /// Add a status row
    pub fn with_status(mut self, entry: StatusEntry) -> Self {
        self.status.push(entry);
        self
    }

    /// Make the HEAD hash query fail, as in a repository with no commits
    pub fn without_head(mut self) -> Self {
        self.head = None;
        self
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.get()
    }

    pub fn branch_calls(&self) -> usize {
        self.branch_calls.get()
    }

    pub fn head_calls(&self) -> usize {
        self.head_calls.get()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new("develop", "0000000000000000000000000000000000000000")
    }
}

impl Repository for MockRepository {
    fn status(&self) -> Result<Vec<StatusEntry>> {
        self.status_calls.set(self.status_calls.get() + 1);
        Ok(self.status.clone())
    }

    fn current_branch(&self) -> Result<String> {
        self.branch_calls.set(self.branch_calls.get() + 1);
        self.branch
            .clone()
            .ok_or_else(|| ReleaseError::Git(git2::Error::from_str("no branch checked out")))
    }

    fn head_commit_hash(&self) -> Result<String> {
        self.head_calls.set(self.head_calls.get() + 1);
        self.head
            .clone()
            .ok_or_else(|| ReleaseError::Git(git2::Error::from_str("reference 'HEAD' not found")))
    }
}
