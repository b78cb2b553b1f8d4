//! User configuration.
//!
//! Read from `config.toml` in the platform config dir (or `--config`):
//!
//! ```toml
//! [style]
//! background = [255, 255, 255]
//! foreground = [0, 0, 0]
//! font = "Arial"
//!
//! [storage]
//! root = "/path/to/workbooks"
//! ```
//!
//! Every key is optional and defaults on its own.

use directories::ProjectDirs;
use serde::Deserialize;
use sheetline_engine::engine::StyleSpec;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Default style applied to appended rows.
    pub style: StyleSpec,
    pub storage: StorageConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding one subdirectory per spreadsheet.
    pub root: Option<PathBuf>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "sheetline")
}

fn user_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

fn default_workbook_root() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("workbooks"))
}

pub fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

/// Load configuration, falling back to defaults.
///
/// Problems are returned as warnings rather than errors: a missing default
/// file is silent, a missing explicit file or a malformed one is reported.
pub fn load_config(explicit: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();
    let Some(path) = explicit.map(Path::to_path_buf).or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if explicit.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    let config = match std::fs::read_to_string(&path) {
        Ok(content) => match parse_config(&content) {
            Ok(config) => config,
            Err(err) => {
                warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                Config::default()
            }
        },
        Err(err) => {
            warnings.push(format!("Failed to read {}: {}", path.display(), err));
            Config::default()
        }
    };
    (config, warnings)
}

impl Config {
    /// Workbook root: the command line wins, then the config file, then the
    /// platform data dir.
    pub fn workbook_root(&self, cli_root: Option<&Path>) -> Option<PathBuf> {
        cli_root
            .map(Path::to_path_buf)
            .or_else(|| self.storage.root.clone())
            .or_else(default_workbook_root)
    }
}
