//! Preconditions checked before anything irreversible happens.

use tracing::debug;

use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::profile::DeploymentProfile;

/// What the branch guard learned about the checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchCheck {
    pub branch: String,
    /// Full hash of HEAD
    pub commit: String,
}

/// Paths the status reports as renamed or modified in the working tree.
pub fn dirty_paths<R: Repository>(repo: &R) -> Result<Vec<String>> {
    let entries = repo.status()?;
    debug!(entries = entries.len(), "working tree status");

    Ok(entries
        .into_iter()
        .filter(|entry| entry.is_dirty())
        .map(|entry| entry.path)
        .collect())
}

/// Fails with every dirty path when the working tree is not clean.
pub fn ensure_clean_tree<R: Repository>(repo: &R) -> Result<()> {
    let paths = dirty_paths(repo)?;
    if !paths.is_empty() {
        return Err(ReleaseError::DirtyWorkingTree { paths });
    }
    Ok(())
}

/// Checks the current branch against the profile and reads the HEAD hash.
///
/// The hash is read only after the branch passes, and is complete before this
/// returns, so later stages never see it unset.
pub fn check_branch<R: Repository>(repo: &R, profile: &DeploymentProfile) -> Result<BranchCheck> {
    let branch = repo.current_branch()?;
    debug!(branch = %branch, required = %profile.required_branch, "current branch");

    if !profile.allows_branch(&branch) {
        return Err(ReleaseError::WrongBranch {
            required: profile.required_branch.clone(),
            current: branch,
            profile: profile.name.clone(),
        });
    }

    let commit = repo.head_commit_hash()?;
    debug!(commit = %commit, "head commit");

    Ok(BranchCheck { branch, commit })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{MockRepository, StatusEntry};
    use crate::profile::{default_profiles, select_profile};

    fn staging() -> DeploymentProfile {
        select_profile(Some("staging"), &default_profiles()).unwrap()
    }

    #[test]
    fn test_clean_tree_passes() {
        let repo = MockRepository::default()
            .with_status(StatusEntry::new('?', '?', "notes.txt"))
            .with_status(StatusEntry::new('M', ' ', "staged.js"));
        assert!(ensure_clean_tree(&repo).is_ok());
    }

    #[test]
    fn test_dirty_tree_lists_paths() {
        let repo = MockRepository::default()
            .with_status(StatusEntry::new(' ', 'M', "client/main.js"))
            .with_status(StatusEntry::new('A', ' ', "added.js"))
            .with_status(StatusEntry::renamed("old.html", "new.html"));

        match ensure_clean_tree(&repo).unwrap_err() {
            ReleaseError::DirtyWorkingTree { paths } => {
                assert_eq!(paths, vec!["client/main.js", "new.html"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(repo.branch_calls(), 0);
    }

    #[test]
    fn test_matching_branch_records_commit() {
        let repo = MockRepository::new("develop", "f00dfeed");
        let check = check_branch(&repo, &staging()).unwrap();
        assert_eq!(check.branch, "develop");
        assert_eq!(check.commit, "f00dfeed");
    }

    #[test]
    fn test_wrong_branch_names_required_branch() {
        let repo = MockRepository::new("feature/login", "f00dfeed");
        let err = check_branch(&repo, &staging()).unwrap_err();
        assert!(err.to_string().contains("[develop]"));
        assert!(err.to_string().contains("'staging'"));
        assert_eq!(repo.head_calls(), 0);
    }

    #[test]
    fn test_missing_head_is_fatal() {
        let repo = MockRepository::new("develop", "").without_head();
        assert!(check_branch(&repo, &staging()).is_err());
    }
}
