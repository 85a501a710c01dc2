use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AtofetchError;

/// Base URL package names are resolved under: `<index>/<package-name>`.
pub const DEFAULT_PACKAGE_INDEX: &str = "https://gitlab.atopile.io/packages";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub package_index: String,
}

impl Config {
    pub fn package_url(&self, package_name: &str) -> String {
        format!(
            "{}/{}",
            self.package_index.trim_end_matches('/'),
            package_name
        )
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
struct PartialConfig {
    package_index: Option<String>,
}

/// Layered load: global config file, then project `atofetch.toml`, then
/// `ATOFETCH_*` environment variables, later layers winning.
pub fn load(cwd: &Path) -> Result<Config, AtofetchError> {
    let global = match global_config_path() {
        Some(path) => load_partial_if_exists(&path)?,
        None => PartialConfig::default(),
    };
    let project = load_partial_if_exists(&cwd.join("atofetch.toml"))?;
    let env = partial_from_env();

    Ok(merge_config(global, project, env))
}

fn global_config_path() -> Option<PathBuf> {
    let config_root = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)?;
    Some(config_root.join("atofetch").join("config.toml"))
}

fn load_partial_if_exists(path: &Path) -> Result<PartialConfig, AtofetchError> {
    if !path.exists() {
        return Ok(PartialConfig::default());
    }

    let raw = std::fs::read_to_string(path).map_err(|source| AtofetchError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&raw).map_err(|source| AtofetchError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

fn partial_from_env() -> PartialConfig {
    PartialConfig {
        package_index: std::env::var("ATOFETCH_PACKAGE_INDEX").ok(),
    }
}

fn merge_config(global: PartialConfig, project: PartialConfig, env: PartialConfig) -> Config {
    Config {
        package_index: env
            .package_index
            .or(project.package_index)
            .or(global.package_index)
            .unwrap_or_else(|| DEFAULT_PACKAGE_INDEX.to_string()),
    }
}
