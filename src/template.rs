//! Template rendering
//!
//! Every file under the template root is rendered with Tera against a fixed
//! set of release fields and written to the same relative path under the
//! output root:
//!
//! | variable      | value                              |
//! |---------------|------------------------------------|
//! | `version`     | released version, e.g. `0.9.1`     |
//! | `branch`      | branch the release was cut from    |
//! | `commit`      | full HEAD hash                     |
//! | `timestamp`   | RFC 3339 release time              |
//! | `tag`         | `<branch>-v<version>`              |
//! | `profile`     | profile display name               |

use std::fs;
use std::path::{Path, PathBuf};

use tera::{Context, Tera};
use tracing::debug;
use walkdir::WalkDir;

use crate::boundary::BoundaryWarning;
use crate::context::ReleaseContext;
use crate::error::{ReleaseError, Result};

/// One template file and where its rendered output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl FileTask {
    /// Maps `source` under `template_root` to the same relative path under
    /// `output_root`. Returns `None` when `source` is not under the root.
    pub fn new(source: &Path, template_root: &Path, output_root: &Path) -> Option<Self> {
        let relative = source.strip_prefix(template_root).ok()?;
        Some(FileTask {
            source: source.to_path_buf(),
            destination: output_root.join(relative),
        })
    }
}

/// Files found under the template root, plus any entries that could not be read.
#[derive(Debug, Default)]
pub struct Discovery {
    pub files: Vec<PathBuf>,
    pub warnings: Vec<BoundaryWarning>,
}

/// Walks `root` recursively and collects every regular file.
///
/// Symlinks are followed. Unreadable entries and symlink loops are recorded
/// as warnings and skipped; the walk goes on with whatever it can reach. Results are sorted by file name within each
/// directory.
pub fn discover_templates(root: &Path) -> Discovery {
    let mut discovery = Discovery::default();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() {
                    discovery.files.push(entry.into_path());
                }
            }
            Err(e) => {
                let path = e
                    .path()
                    .unwrap_or(root)
                    .display()
                    .to_string();
                debug!(path = %path, error = %e, "template traversal error");
                discovery.warnings.push(BoundaryWarning::TemplateTraversal {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    debug!(root = %root.display(), files = discovery.files.len(), "discovered templates");
    discovery
}

/// Discovers templates and pairs each with its destination.
pub fn plan_tasks(template_root: &Path, output_root: &Path) -> (Vec<FileTask>, Vec<BoundaryWarning>) {
    let Discovery { files, mut warnings } = discover_templates(template_root);

    if files.is_empty() && warnings.is_empty() {
        warnings.push(BoundaryWarning::EmptyTemplateSet {
            root: template_root.display().to_string(),
        });
    }

    let tasks = files
        .iter()
        .filter_map(|file| FileTask::new(file, template_root, output_root))
        .collect();
    (tasks, warnings)
}

/// Renders templates against one release.
pub struct TemplateRenderer {
    context: Context,
}

impl TemplateRenderer {
    pub fn new(release: &ReleaseContext) -> Self {
        let mut context = Context::new();
        context.insert("version", &release.version.to_string());
        context.insert("branch", &release.branch);
        context.insert("commit", &release.commit);
        context.insert("timestamp", &release.timestamp_text());
        context.insert("tag", &release.tag);
        context.insert("profile", &release.profile);
        TemplateRenderer { context }
    }

    /// Renders `text`; `path` only labels errors.
    pub fn render(&self, path: &Path, text: &str) -> Result<String> {
        Tera::one_off(text, &self.context, false).map_err(|e| ReleaseError::Template {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Renders one file, creating the destination directory if needed.
    pub fn render_task(&self, task: &FileTask) -> Result<()> {
        let text = fs::read_to_string(&task.source)?;
        let rendered = self.render(&task.source, &text)?;

        if let Some(parent) = task.destination.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!(from = %task.source.display(), to = %task.destination.display(), "writing rendered template");
        fs::write(&task.destination, rendered)?;
        Ok(())
    }

    /// Renders every task in order, stopping at the first failure.
    pub fn render_all(&self, tasks: &[FileTask]) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(tasks.len());
        for task in tasks {
            self.render_task(task)?;
            written.push(task.destination.clone());
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::BranchCheck;
    use crate::profile::{default_profiles, select_profile};
    use chrono::{TimeZone, Utc};
    use semver::Version;

    fn release() -> ReleaseContext {
        let profile = select_profile(Some("staging"), &default_profiles()).unwrap();
        ReleaseContext::new(
            BranchCheck {
                branch: "develop".to_string(),
                commit: "c0ffee".to_string(),
            },
            Version::new(0, 9, 1),
            &profile,
            Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        )
    }

    #[test]
    fn test_file_task_mirrors_relative_path() {
        let task = FileTask::new(
            Path::new("templates/client/config.js"),
            Path::new("templates"),
            Path::new("app"),
        )
        .unwrap();
        assert_eq!(task.destination, PathBuf::from("app/client/config.js"));
    }

    #[test]
    fn test_file_task_outside_root() {
        assert!(FileTask::new(Path::new("other/x"), Path::new("templates"), Path::new("app")).is_none());
    }

    #[test]
    fn test_render_all_fields() {
        let renderer = TemplateRenderer::new(&release());
        let out = renderer
            .render(
                Path::new("t"),
                "{{ version }}|{{ branch }}|{{ commit }}|{{ timestamp }}|{{ tag }}|{{ profile }}",
            )
            .unwrap();
        assert_eq!(
            out,
            "0.9.1|develop|c0ffee|2026-01-02T03:04:05Z|develop-v0.9.1|staging"
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let renderer = TemplateRenderer::new(&release());
        let text = "export const VERSION = '{{ version }}'; // {{ commit }}\n";
        let first = renderer.render(Path::new("t"), text).unwrap();
        let second = TemplateRenderer::new(&release())
            .render(Path::new("t"), text)
            .unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_render_does_not_escape_html() {
        let renderer = TemplateRenderer::new(&release());
        let out = renderer.render(Path::new("t"), "<b>{{ tag }}</b>").unwrap();
        assert_eq!(out, "<b>develop-v0.9.1</b>");
    }

    #[test]
    fn test_unknown_variable_is_error() {
        let renderer = TemplateRenderer::new(&release());
        let err = renderer
            .render(Path::new("templates/bad.txt"), "{{ password }}")
            .unwrap_err();
        assert!(err.to_string().contains("templates/bad.txt"));
    }

    #[test]
    fn test_discover_and_render_tree() {
        let dir = tempfile::tempdir().unwrap();
        let templates = dir.path().join("templates");
        let output = dir.path().join("app");
        fs::create_dir_all(templates.join("server/lib")).unwrap();
        fs::write(templates.join("version.txt"), "{{ version }}").unwrap();
        fs::write(templates.join("server/lib/build.js"), "module.exports = '{{ tag }}';").unwrap();

        let (tasks, warnings) = plan_tasks(&templates, &output);
        assert!(warnings.is_empty());
        assert_eq!(tasks.len(), 2);

        let written = TemplateRenderer::new(&release()).render_all(&tasks).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(fs::read_to_string(output.join("version.txt")).unwrap(), "0.9.1");
        assert_eq!(
            fs::read_to_string(output.join("server/lib/build.js")).unwrap(),
            "module.exports = 'develop-v0.9.1';"
        );
        assert_eq!(
            fs::read_to_string(templates.join("version.txt")).unwrap(),
            "{{ version }}"
        );
    }

    #[test]
    fn test_empty_template_root_warns() {
        let dir = tempfile::tempdir().unwrap();
        let (tasks, warnings) = plan_tasks(dir.path(), &dir.path().join("out"));
        assert!(tasks.is_empty());
        assert!(matches!(warnings[0], BoundaryWarning::EmptyTemplateSet { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_template_is_rendered() {
        let dir = tempfile::tempdir().unwrap();
        let templates = dir.path().join("templates");
        let shared = dir.path().join("shared");
        fs::create_dir_all(&templates).unwrap();
        fs::create_dir_all(&shared).unwrap();
        fs::write(shared.join("banner.txt"), "release {{ tag }}").unwrap();
        std::os::unix::fs::symlink(shared.join("banner.txt"), templates.join("banner.txt"))
            .unwrap();

        let (tasks, warnings) = plan_tasks(&templates, &dir.path().join("app"));
        assert!(warnings.is_empty());
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].destination, dir.path().join("app/banner.txt"));

        TemplateRenderer::new(&release()).render_all(&tasks).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("app/banner.txt")).unwrap(),
            "release develop-v0.9.1"
        );
    }

    #[test]
    fn test_missing_root_is_soft() {
        let discovery = discover_templates(Path::new("/nonexistent/templates"));
        assert!(discovery.files.is_empty());
        assert_eq!(discovery.warnings.len(), 1);
    }
}
