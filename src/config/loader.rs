use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::config::credentials::ServiceConfig;

/// Load and validate config from YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServiceConfig> {
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config '{}'", path.as_ref().display()))?;
    let config: ServiceConfig = serde_yaml::from_str(&raw)?;

    if config.credentials.is_empty() {
        bail!("config: 'credentials' is empty; at least one credential required");
    }

    Ok(config)
}
