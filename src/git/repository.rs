use std::path::Path;

use git2::{DiffDelta, Repository as Git2Repo, Status, StatusOptions};

use crate::error::{ReleaseError, Result};
use crate::git::StatusEntry;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

fn index_code(status: Status) -> char {
    if status.is_index_renamed() {
        'R'
    } else if status.is_index_new() {
        'A'
    } else if status.is_index_modified() {
        'M'
    } else if status.is_index_deleted() {
        'D'
    } else if status.is_index_typechange() {
        'T'
    } else if status.is_wt_new() {
        '?'
    } else {
        ' '
    }
}

fn worktree_code(status: Status) -> char {
    if status.is_wt_renamed() {
        'R'
    } else if status.is_wt_modified() {
        'M'
    } else if status.is_wt_deleted() {
        'D'
    } else if status.is_wt_typechange() {
        'T'
    } else if status.is_wt_new() {
        '?'
    } else {
        ' '
    }
}

fn delta_path(delta: &DiffDelta<'_>, old: bool) -> Option<String> {
    let file = if old { delta.old_file() } else { delta.new_file() };
    file.path().map(|p| p.to_string_lossy().into_owned())
}

impl super::Repository for Git2Repository {
    fn status(&self) -> Result<Vec<StatusEntry>> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(false)
            .include_ignored(false)
            .renames_head_to_index(true)
            .renames_index_to_workdir(true);

        let statuses = self.repo.statuses(Some(&mut options))?;

        let mut entries = Vec::with_capacity(statuses.len());
        for entry in statuses.iter() {
            let status = entry.status();

            // For renames the delta carries both sides; prefer the new path.
            let rename_delta = if status.is_index_renamed() {
                entry.head_to_index()
            } else if status.is_wt_renamed() {
                entry.index_to_workdir()
            } else {
                None
            };

            let (path, from) = match rename_delta {
                Some(delta) => (delta_path(&delta, false), delta_path(&delta, true)),
                None => (entry.path().map(str::to_string), None),
            };

            entries.push(StatusEntry {
                index: index_code(status),
                worktree: worktree_code(status),
                path: path.unwrap_or_default(),
                from,
            });
        }

        Ok(entries)
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;

        // Detached HEAD reports "HEAD", like `git rev-parse --abbrev-ref HEAD`.
        if !head.is_branch() {
            return Ok("HEAD".to_string());
        }

        head.shorthand().map(str::to_string).ok_or_else(|| {
            ReleaseError::Git(git2::Error::from_str("branch name is not valid UTF-8"))
        })
    }

    fn head_commit_hash(&self) -> Result<String> {
        let commit = self.repo.head()?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }
}
