//! Main workflow orchestration logic
//!
//! Chains the release stages: repository guard, branch guard, version bump,
//! template rendering and publishing. It is kept apart from CLI parsing so
//! the workflow can be driven programmatically, with any [Repository] and
//! [CommandRunner].

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use semver::Version;
use tracing::{debug, info};

use crate::boundary::BoundaryWarning;
use crate::command::{CommandRunner, CommandStep};
use crate::config::{self, Config};
use crate::context::ReleaseContext;
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::guard;
use crate::manifest::Manifest;
use crate::profile::DeploymentProfile;
use crate::publish::{self, DeploymentFiles};
use crate::template::{self, TemplateRenderer};
use crate::ui;
use crate::version::{self, BumpLevel, BumpOutcome};

/// Arguments for the release workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// This decoupling allows the workflow to be called programmatically
/// without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseWorkflowArgs {
    /// Profile chosen by the target selector
    pub profile: DeploymentProfile,

    /// `--minor` / `--major` override of the profile's bump level
    pub bump_override: Option<BumpLevel>,

    /// Skip the version-increment command
    pub no_bump: bool,

    /// Preview mode - no commands, no writes
    pub dry_run: bool,

    /// Project root; configured paths are relative to it
    pub root: PathBuf,

    /// Release time recorded in templates and the tag message
    pub timestamp: DateTime<Utc>,
}

/// Result of a successful release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Version the release carries
    pub version: Version,

    /// `<branch>-v<version>`
    pub tag: String,

    /// Annotated git tag, `v<version>.<profile>`
    pub git_tag: String,

    /// The branch the release was cut from
    pub branch: String,

    /// Files written by the template renderer (empty for dry runs)
    pub rendered: Vec<PathBuf>,

    /// Publish commands, in order
    pub steps: Vec<CommandStep>,

    /// How many publish commands ran (0 for dry runs)
    pub executed: usize,

    /// Non-fatal issues met along the way
    pub warnings: Vec<BoundaryWarning>,
}

fn report(warnings: &mut Vec<BoundaryWarning>, new: Vec<BoundaryWarning>) {
    for warning in new {
        ui::display_boundary_warning(&warning);
        warnings.push(warning);
    }
}

/// Main release workflow
///
/// Orchestrates the entire release:
/// 1. Refuse to run from a dirty working tree
/// 2. Check the branch policy and read the HEAD hash
/// 3. Bump the manifest version (unless suppressed)
/// 4. Render templates into the output directory
/// 5. Commit, tag, push and deploy
///
/// Any failure returns immediately. Publish commands that already ran are not
/// undone.
pub fn run_release_workflow<G, C>(
    args: &ReleaseWorkflowArgs,
    config: &Config,
    repo: &G,
    runner: &C,
) -> Result<WorkflowResult>
where
    G: Repository,
    C: CommandRunner,
{
    let profile = &args.profile;
    let template_root = args.root.join(&config.paths.templates);
    let output_root = args.root.join(&config.paths.output);
    let manifest_path = args.root.join(&config.paths.manifest);
    let mut warnings = Vec::new();

    if !template_root.is_dir() {
        return Err(ReleaseError::config(format!(
            "Can't find templates directory {}",
            template_root.display()
        )));
    }

    ensure_output_outside_templates(&template_root, &output_root)?;

    ui::display_status("Checking working tree...");
    guard::ensure_clean_tree(repo)?;

    let check = guard::check_branch(repo, profile)?;
    let short_commit: String = check.commit.chars().take(7).collect();
    ui::display_success(&format!("On branch {} at {}", check.branch, short_commit));

    let level = BumpLevel::resolve(profile.bump, args.bump_override);
    let bump = if args.dry_run {
        preview_bump(&manifest_path, level, args.no_bump)?
    } else {
        version::run_bump(
            runner,
            &manifest_path,
            &config.commands.bump,
            level,
            args.no_bump,
        )?
    };
    report(&mut warnings, bump.warnings);
    if bump.bumped || args.dry_run {
        ui::display_success(&format!(
            "Version {} -> {} ({} bump)",
            bump.previous, bump.current, level
        ));
    }

    let ctx = ReleaseContext::new(check, bump.current, profile, args.timestamp);
    debug!(?ctx, "release context");
    ui::display_status(&format!("Releasing {} as {}", ctx.tag, ctx.git_tag_name()));

    let (tasks, traversal) = template::plan_tasks(&template_root, &output_root);
    report(&mut warnings, traversal);

    let rendered = if args.dry_run {
        for task in &tasks {
            ui::display_status(&format!(
                "Would template {} -> {}",
                task.source.display(),
                task.destination.display()
            ));
        }
        Vec::new()
    } else {
        let renderer = TemplateRenderer::new(&ctx);
        for task in &tasks {
            ui::display_status(&format!("Templating file {}", task.source.display()));
        }
        let written = renderer.render_all(&tasks)?;
        ui::display_success(&format!("Done templating {} files", written.len()));
        written
    };

    let files = DeploymentFiles::for_profile(&config.paths.deployment, &profile.name);
    report(&mut warnings, files.missing_under(&args.root));
    let steps = publish::publish_steps(&ctx, &config.commands.deploy, &files);

    let executed = if args.dry_run {
        ui::display_planned_steps(&steps);
        0
    } else {
        let deploy_program = config.commands.deploy.program.as_str();
        let executed = publish::run_steps(runner, &steps, |step| {
            if step.program == deploy_program {
                ui::display_status("Deploying files to remote server");
            }
        })?;
        info!(executed, "publish complete");
        ui::display_success("Done.");
        executed
    };

    Ok(WorkflowResult {
        version: ctx.version.clone(),
        tag: ctx.tag.clone(),
        git_tag: ctx.git_tag_name(),
        branch: ctx.branch.clone(),
        rendered,
        steps,
        executed,
        warnings,
    })
}

/// Refuses an output root that resolves to the template root or a directory
/// beneath it. Symlinks are resolved when both directories exist.
fn ensure_output_outside_templates(template_root: &Path, output_root: &Path) -> Result<()> {
    let inside = config::output_inside_templates(template_root, output_root)
        || match (template_root.canonicalize(), output_root.canonicalize()) {
            (Ok(templates), Ok(output)) => output.starts_with(templates),
            _ => false,
        };

    if inside {
        return Err(ReleaseError::config(format!(
            "output directory '{}' must not be inside the templates directory '{}'",
            output_root.display(),
            template_root.display()
        )));
    }
    Ok(())
}

/// Computes what the bump stage would produce without touching the manifest.
fn preview_bump(
    manifest_path: &Path,
    level: BumpLevel,
    skip: bool,
) -> Result<BumpOutcome> {
    let previous = Manifest::load(manifest_path)?.version;
    let current = if skip {
        previous.clone()
    } else {
        version::bump_version(&previous, level)
    };
    Ok(BumpOutcome {
        previous,
        current,
        bumped: false,
        warnings: Vec::new(),
    })
}
