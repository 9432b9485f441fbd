//! CLI configuration handling.

use std::path::{Path, PathBuf};

use keel_migrate::{AdapterConfig, DesiredSchema};
use regex_lite::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Default config file name (lives in project root)
pub const CONFIG_FILE_NAME: &str = "keel.toml";

/// Locations searched, in order, when no explicit path is given
pub const CONFIG_CANDIDATES: &[&str] = &[
    "keel.toml",
    ".keel.toml",
    "config/keel.toml",
    ".config/keel.toml",
];

/// Environment variable used when no database URL is configured
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Keel CLI configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,

    /// Declared tables
    pub tables: DesiredSchema,
}

/// Database configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Adapter kind (sqlite, prisma, drizzle)
    pub adapter: Option<String>,

    /// Database connection URL
    pub url: Option<String>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Build the adapter settings, expanding `${VAR}` references in the URL.
    ///
    /// Without a configured URL, adapters that connect directly fall back to
    /// `DATABASE_URL`.
    pub fn to_adapter_config(&self) -> CliResult<AdapterConfig> {
        self.adapter_config_with(|name| std::env::var(name).ok())
    }

    fn adapter_config_with<F>(&self, lookup: F) -> CliResult<AdapterConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AdapterConfig {
            adapter: self.database.adapter.clone(),
            url: None,
        };

        config.url = match &self.database.url {
            Some(url) => Some(expand_env(url, &lookup)?),
            None if config.takes_url() => lookup(DATABASE_URL_ENV),
            None => None,
        };

        Ok(config)
    }
}

/// Find the configuration file for `working_dir`.
///
/// An explicit path is taken relative to the working directory and must exist.
pub fn find_config(working_dir: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => {
            let path = working_dir.join(path);
            path.is_file().then_some(path)
        }
        None => CONFIG_CANDIDATES
            .iter()
            .map(|candidate| working_dir.join(candidate))
            .find(|path| path.is_file()),
    }
}

/// Find and load the configuration for `working_dir`, if any.
pub fn load_configuration(working_dir: &Path, explicit: Option<&Path>) -> CliResult<Option<Config>> {
    let Some(path) = find_config(working_dir, explicit) else {
        return Ok(None);
    };

    debug!(path = %path.display(), "Loading configuration");
    Config::load(&path).map(Some)
}

/// Replace every `${VAR}` in `value` using `lookup`.
fn expand_env<F>(value: &str, lookup: F) -> CliResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
        .map_err(|e| CliError::Config(e.to_string()))?;

    let mut expanded = String::with_capacity(value.len());
    let mut last = 0;
    for caps in re.captures_iter(value) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let resolved = lookup(name.as_str()).ok_or_else(|| {
            CliError::Config(format!(
                "environment variable {} is not set",
                name.as_str()
            ))
        })?;
        expanded.push_str(&value[last..whole.start()]);
        expanded.push_str(&resolved);
        last = whole.end();
    }
    expanded.push_str(&value[last..]);

    Ok(expanded)
}
