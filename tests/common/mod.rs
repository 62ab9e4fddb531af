#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use git2::{Commit, IndexAddOption, Oid, Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;

use release_deploy::cli::ReleaseWorkflowArgs;
use release_deploy::command::MockRunner;
use release_deploy::manifest::Manifest;
use release_deploy::profile::{default_profiles, select_profile};
use release_deploy::version::{bump_version, BumpLevel};

/// A scratch project laid out the way the release expects.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new(version: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        fs::write(
            root.join("package.json"),
            format!(
                "{{\n  \"name\": \"web-app\",\n  \"version\": \"{}\",\n  \"private\": true\n}}\n",
                version
            ),
        )
        .unwrap();

        fs::create_dir_all(root.join("templates/server/lib")).unwrap();
        fs::write(root.join("templates/version.txt"), "{{ version }}").unwrap();
        fs::write(
            root.join("templates/server/lib/release.js"),
            "module.exports = { tag: '{{ tag }}', commit: '{{ commit }}', at: '{{ timestamp }}' };\n",
        )
        .unwrap();

        for profile in ["staging", "production", "demo"] {
            let deploy = root.join("deployment").join(profile);
            fs::create_dir_all(&deploy).unwrap();
            fs::write(deploy.join("settings.json"), "{}").unwrap();
            fs::write(deploy.join("mup.js"), "module.exports = {};").unwrap();
        }

        Project { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn manifest_version(&self) -> String {
        Manifest::load(&self.path("package.json"))
            .unwrap()
            .version
            .to_string()
    }

    /// A runner whose `npm version <level>` rewrites package.json like npm does.
    pub fn npm_runner(&self) -> MockRunner {
        let manifest = self.path("package.json");
        MockRunner::new().with_effect("npm", move |step| {
            let level = match step.args.get(1).map(String::as_str) {
                Some("major") => BumpLevel::Major,
                Some("minor") => BumpLevel::Minor,
                _ => BumpLevel::Patch,
            };
            let current = Manifest::load(&manifest).unwrap().version;
            let next = bump_version(&current, level);
            let text = fs::read_to_string(&manifest).unwrap().replace(
                &format!("\"version\": \"{}\"", current),
                &format!("\"version\": \"{}\"", next),
            );
            fs::write(&manifest, text).unwrap();
        })
    }

    pub fn args(&self, key: &str) -> ReleaseWorkflowArgs {
        ReleaseWorkflowArgs {
            profile: select_profile(Some(key), &default_profiles()).unwrap(),
            bump_override: None,
            no_bump: false,
            dry_run: false,
            root: self.root().to_path_buf(),
            timestamp: Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap(),
        }
    }
}

/// Initializes a repository whose HEAD points at `branch`.
pub fn init_repo(dir: &Path, branch: &str) -> Repository {
    let mut options = RepositoryInitOptions::new();
    options.initial_head(branch);
    Repository::init_opts(dir, &options).unwrap()
}

/// Stages everything in the working tree and commits it.
pub fn commit_all(repo: &Repository, message: &str) -> Oid {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let signature = Signature::now("Release Bot", "release@example.com").unwrap();

    let parents: Vec<Commit> = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().unwrap()],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<&Commit> = parents.iter().collect();

    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parent_refs,
    )
    .unwrap()
}
