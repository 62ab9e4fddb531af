//! Git query abstraction layer
//!
//! The guards only need three answers from version control: the working-tree
//! status, the current branch and the HEAD commit hash. The [Repository] trait
//! captures exactly those, so the release workflow can run against a real
//! repository or a mock.
//!
//! - [repository::Git2Repository]: real implementation using the `git2` crate
//! - [mock::MockRepository]: mock implementation for testing
//!
//! Committing, tagging and pushing are not part of this trait; they run as
//! external commands (see [crate::command]).

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// One row of working-tree status.
///
/// Change codes follow `git status --porcelain`: `M` modified, `A` added,
/// `D` deleted, `R` renamed, `T` type change, `?` untracked, space unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Change code between HEAD and the index
    pub index: char,
    /// Change code between the index and the working tree
    pub worktree: char,
    /// Current path of the file
    pub path: String,
    /// Original path when the entry is a rename
    pub from: Option<String>,
}

impl StatusEntry {
    pub fn new(index: char, worktree: char, path: impl Into<String>) -> Self {
        StatusEntry {
            index,
            worktree,
            path: path.into(),
            from: None,
        }
    }

    pub fn renamed(from: impl Into<String>, path: impl Into<String>) -> Self {
        StatusEntry {
            index: 'R',
            worktree: ' ',
            path: path.into(),
            from: Some(from.into()),
        }
    }

    /// A rename, or a file modified in the working tree.
    pub fn is_dirty(&self) -> bool {
        self.from.is_some() || self.worktree == 'M'
    }
}

/// Read-only version-control queries used by the release guards
///
/// Each call is a single blocking round-trip; callers receive a complete
/// answer before moving on.
pub trait Repository {
    /// Working-tree status, one entry per changed tracked path
    fn status(&self) -> Result<Vec<StatusEntry>>;

    /// Short name of the checked-out branch (e.g. "develop")
    fn current_branch(&self) -> Result<String>;

    /// Full 40-character hash of the HEAD commit
    fn head_commit_hash(&self) -> Result<String>;
}
