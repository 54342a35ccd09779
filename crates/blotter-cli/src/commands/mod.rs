//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod fetch;
pub mod process;
pub mod status;

use std::path::Path;

use blotter_core::models::config::BlotterConfig;

/// Load the config given with `-c`, else the user config file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BlotterConfig> {
    if let Some(path) = config_path {
        return Ok(BlotterConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(BlotterConfig::from_file(&default_path)?)
    } else {
        Ok(BlotterConfig::default())
    }
}
