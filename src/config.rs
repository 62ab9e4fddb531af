use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::command::CommandTemplate;
use crate::error::{ReleaseError, Result};
use crate::profile::{default_profiles, ProfileConfig};

/// Name of the project-local configuration file.
pub const CONFIG_FILE_NAME: &str = "release-deploy.toml";

/// Represents the complete configuration for release-deploy.
///
/// Contains deployment profiles, project paths and the external commands used
/// for bumping and deploying.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_profiles")]
    pub profiles: BTreeMap<String, ProfileConfig>,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub commands: CommandsConfig,
}

/// Project layout, relative to the project root.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PathsConfig {
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    #[serde(default = "default_templates")]
    pub templates: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default = "default_deployment")]
    pub deployment: PathBuf,
}

fn default_manifest() -> PathBuf {
    PathBuf::from("package.json")
}

fn default_templates() -> PathBuf {
    PathBuf::from("templates")
}

fn default_output() -> PathBuf {
    PathBuf::from("app")
}

fn default_deployment() -> PathBuf {
    PathBuf::from("deployment")
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            manifest: default_manifest(),
            templates: default_templates(),
            output: default_output(),
            deployment: default_deployment(),
        }
    }
}

/// External commands.
///
/// `bump` understands the `{level}` placeholder; `deploy` understands
/// `{settings}` and `{config}`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommandsConfig {
    #[serde(default = "default_bump_command")]
    pub bump: CommandTemplate,

    #[serde(default = "default_deploy_command")]
    pub deploy: CommandTemplate,
}

fn default_bump_command() -> CommandTemplate {
    CommandTemplate::new("npm", &["version", "{level}", "--no-git-tag-version"])
}

fn default_deploy_command() -> CommandTemplate {
    CommandTemplate::new(
        "mup",
        &["deploy", "--settings", "{settings}", "--config", "{config}"],
    )
}

impl Default for CommandsConfig {
    fn default() -> Self {
        CommandsConfig {
            bump: default_bump_command(),
            deploy: default_deploy_command(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            profiles: default_profiles(),
            paths: PathsConfig::default(),
            commands: CommandsConfig::default(),
        }
    }
}

impl Config {
    /// Rejects configurations the release cannot run with.
    ///
    /// The output root must not be the template root or lie inside it, since
    /// rendering would then write into its own source tree.
    pub fn validate(&self) -> Result<()> {
        if self.profiles.is_empty() {
            return Err(ReleaseError::config("no deployment profiles configured"));
        }

        if let Some((key, _)) = self.profiles.iter().find(|(_, p)| p.name.trim().is_empty()) {
            return Err(ReleaseError::config(format!(
                "profile '{}' has an empty name",
                key
            )));
        }

        if output_inside_templates(&self.paths.templates, &self.paths.output) {
            return Err(ReleaseError::config(format!(
                "output directory '{}' must not be inside the templates directory '{}'",
                self.paths.output.display(),
                self.paths.templates.display()
            )));
        }

        if self.commands.bump.program.is_empty() || self.commands.deploy.program.is_empty() {
            return Err(ReleaseError::config("command program must not be empty"));
        }

        Ok(())
    }
}

/// Resolves `.` and `..` components lexically, without touching the
/// filesystem. A leading `..` on a relative path is kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Whether `output` is `templates` itself or lies beneath it.
pub fn output_inside_templates(templates: &Path, output: &Path) -> bool {
    normalize_path(output).starts_with(normalize_path(templates))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release-deploy.toml` in the current directory
/// 3. `.release-deploy.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration, validated
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        Some(PathBuf::from(path))
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        Some(PathBuf::from(CONFIG_FILE_NAME))
    } else {
        dirs::config_dir()
            .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
            .filter(|path| path.exists())
    };

    let config = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            let text = fs::read_to_string(&path).map_err(|e| {
                ReleaseError::config(format!("cannot read {}: {}", path.display(), e))
            })?;
            parse_config(&text)?
        }
        None => Config::default(),
    };

    config.validate()?;
    Ok(config)
}

/// Parses configuration TOML; missing sections take their defaults.
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| ReleaseError::config(e.to_string()))
}
