use crate::{Error, Result};
use agmerge_engine::OtherEventsPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "AGMERGE_CONFIG";

/// Where the config file was found, and whether the user asked for it explicitly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    pub explicit: bool,
}

/// Resolve the config file path based on priority:
/// 1. Explicit path (`--config`, with tilde expansion)
/// 2. AGMERGE_CONFIG environment variable (with tilde expansion)
/// 3. `<config dir>/agmerge/config.toml`
pub fn resolve_config_path(explicit_path: Option<&str>) -> Option<ConfigLocation> {
    if let Some(path) = explicit_path {
        return Some(ConfigLocation {
            path: expand_tilde(path),
            explicit: true,
        });
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV)
        && !env_path.is_empty()
    {
        return Some(ConfigLocation {
            path: expand_tilde(&env_path),
            explicit: false,
        });
    }

    dirs::config_dir().map(|dir| ConfigLocation {
        path: dir.join("agmerge").join("config.toml"),
        explicit: false,
    })
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    #[serde(default)]
    pub other_events: OtherEventsPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub merge: MergeConfig,
}

impl Config {
    /// Load from the resolved location. A missing implicit file means defaults;
    /// a missing file the user named explicitly is an error.
    pub fn load(explicit_path: Option<&str>) -> Result<Self> {
        match resolve_config_path(explicit_path) {
            Some(location) if location.explicit && !location.path.exists() => Err(Error::Config(
                format!("Config file not found: {}", location.path.display()),
            )),
            Some(location) => Self::load_from(&location.path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }
}
