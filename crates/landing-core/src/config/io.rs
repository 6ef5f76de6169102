use super::models::LandingConfig;
use super::tables::ConfigTables;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load configuration from the given path, falling back to defaults on error.
pub fn load_config(path: &Path) -> LandingConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return LandingConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err:#}");
            LandingConfig::default()
        }
    }
}

pub fn parse_config(contents: &str) -> Result<LandingConfig> {
    let tables: ConfigTables =
        toml::from_str(contents).context("failed to parse sectioned config")?;
    Ok(tables.into())
}

pub fn serialize_config(config: &LandingConfig) -> Result<String> {
    let tables = ConfigTables::from(config);
    toml::to_string(&tables).context("failed to serialize config")
}
