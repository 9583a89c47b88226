use chrono::Weekday;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, ErrorKind, Result};

const CONFIG_PATH_ENV_VAR: &str = "DAYBYDAY_CONFIG_FILE";

pub const DEFAULT_MARKER_CLASS: &str = "day-by-day";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    let config_xdg = if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        Some(PathBuf::from(dir))
    } else {
        dirs::config_dir()
    };

    if let Some(dir) = config_xdg {
        locations.push(dir.join("daybyday").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".daybyday.toml"));
    }

    locations
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: Option<String>,
    pub week_start: Weekday,
    pub weekday_initials: bool,
    pub marker_class: String,
    #[serde(rename = "tick_rate")]
    tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            locale: None,
            week_start: Weekday::Sun,
            weekday_initials: true,
            marker_class: DEFAULT_MARKER_CLASS.to_owned(),
            tick_rate_ms: 500,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;

        if config.marker_class.trim().is_empty() {
            return Err(Error::new(
                ErrorKind::ConfigParse,
                "'marker_class' must not be empty",
            ));
        }

        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Config::from_toml(&content).map_err(|e| {
            let msg = format!(
                "{}: {}",
                path.display(),
                e.message.as_deref().unwrap_or_default()
            );
            e.with_msg(&msg)
        })
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

/// Loads `path` if given, otherwise the first existing default location.
/// Falls back to the default configuration if nothing is found.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::load(path);
    }

    for location in find_configfile_locations() {
        if location.is_file() {
            log::info!("Loading config from '{}'", location.display());
            return Config::load(&location);
        }
    }

    log::info!("No config file found, using defaults");
    Ok(Config::default())
}
