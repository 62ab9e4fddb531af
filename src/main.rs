use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use release_deploy::cli::{run_release_workflow, ReleaseWorkflowArgs};
use release_deploy::command::SystemRunner;
use release_deploy::config;
use release_deploy::git::Git2Repository;
use release_deploy::profile::select_profile;
use release_deploy::ui;
use release_deploy::version::BumpLevel;

#[derive(clap::Parser)]
#[command(
    name = "release-deploy",
    about = "Bump, template, tag and deploy a release to a named target",
    after_help = "The patch level is bumped by default (eg 1.2.5 => 1.2.6) unless the \
                  target's profile says otherwise or --minor/--major is given."
)]
struct Args {
    #[arg(help = "Deployment target (profile key, eg prod, demo, staging)")]
    target: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Log commands and intermediate values")]
    debug: bool,

    #[arg(long = "no-bump", visible_alias = "nobump", help = "Do not bump the version")]
    no_bump: bool,

    #[arg(long, help = "Bump the minor version, eg 1.2.5 => 1.3.0 (wins over --major)")]
    minor: bool,

    #[arg(long, help = "Bump the major version, eg 1.2.5 => 2.0.0")]
    major: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Show configured deployment targets and exit")]
    list: bool,

    #[arg(short = 'V', long, help = "Print version information")]
    version: bool,
}

impl Args {
    fn bump_override(&self) -> Option<BumpLevel> {
        if self.minor {
            Some(BumpLevel::Minor)
        } else if self.major {
            Some(BumpLevel::Major)
        } else {
            None
        }
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("release_deploy=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        // Help output is not an error and exits 0.
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            ui::display_error(e.to_string().trim_end());
            return ExitCode::FAILURE;
        }
    };
    init_logging(args.debug);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    if args.version {
        println!("release-deploy {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    if args.list {
        ui::display_profiles(&config.profiles);
        return Ok(());
    }

    let profile = select_profile(args.target.as_deref(), &config.profiles)?;
    tracing::debug!(?profile, "selected profile");

    let root = std::env::current_dir().context("Cannot determine working directory")?;
    let repo = Git2Repository::open(&root).context("Not in a git repository")?;
    let runner = SystemRunner::new(&root);

    let workflow_args = ReleaseWorkflowArgs {
        profile,
        bump_override: args.bump_override(),
        no_bump: args.no_bump,
        dry_run: args.dry_run,
        root,
        timestamp: Utc::now(),
    };

    let result = run_release_workflow(&workflow_args, &config, &repo, &runner)?;

    if args.dry_run {
        ui::display_success(&format!("Dry run complete for {}", result.git_tag));
    } else {
        ui::display_success(&format!(
            "Released {} ({}) from branch {}",
            result.git_tag, result.tag, result.branch
        ));
    }

    Ok(())
}
