//! Application configuration for shellhelp.
//!
//! User config lives at `~/.shellhelp/shellhelp.toml`.
//! CLI flags override the environment, which overrides config file values,
//! which override the build-time defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HelpError, Result};
use crate::types::LevelNode;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "shellhelp.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".shellhelp";

/// Environment variable pointing at an alternate help document.
pub const HELP_FILE_ENV: &str = "SHELLHELP_HELP_FILE";

/// File name of the help document inside the share directory.
const HELP_FILE_NAME: &str = "shellhelp.adoc";

/// Share directory baked in at build time, if the packager set one.
const SHARE_DIR: Option<&str> = option_env!("SHELLHELP_SHAREDIR");

const FALLBACK_SHARE_DIR: &str = "/usr/share/shellhelp";

// ---------------------------------------------------------------------------
// Config structs (matching shellhelp.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the help document and command hierarchy come from.
    #[serde(default)]
    pub source: SourceConfig,

    /// Terminal rendering settings.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// `[source]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Help document path (defaults to the share directory copy).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_file: Option<String>,

    /// TOML file describing the shell's levels, commands and aliases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy_file: Option<String>,
}

/// `[display]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Emit ANSI styling when rendering help.
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Help document location
// ---------------------------------------------------------------------------

/// The help document shipped in the share directory.
pub fn default_help_file() -> PathBuf {
    Path::new(SHARE_DIR.unwrap_or(FALLBACK_SHARE_DIR)).join(HELP_FILE_NAME)
}

/// Resolve the help document path: `cli` > `$SHELLHELP_HELP_FILE` > config > default.
pub fn resolve_help_file(config: &AppConfig, cli: Option<&Path>) -> PathBuf {
    let env = std::env::var(HELP_FILE_ENV).ok();
    resolve_help_file_with(config, cli, env.as_deref())
}

fn resolve_help_file_with(config: &AppConfig, cli: Option<&Path>, env: Option<&str>) -> PathBuf {
    if let Some(path) = cli {
        return path.to_path_buf();
    }
    if let Some(path) = env.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    if let Some(path) = &config.source.help_file {
        return PathBuf::from(path);
    }
    default_help_file()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.shellhelp/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| HelpError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.shellhelp/shellhelp.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| HelpError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| HelpError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| HelpError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| HelpError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| HelpError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Load a command hierarchy (root level and everything below it) from TOML.
pub fn load_hierarchy_from(path: &Path) -> Result<LevelNode> {
    let content = std::fs::read_to_string(path).map_err(|e| HelpError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        HelpError::config(format!("failed to parse hierarchy {}: {e}", path.display()))
    })
}
