//! Configuration loader for YAML files
//!
//! The YAML file is optional: when it does not exist the built-in defaults
//! are used. Environment overrides are applied on top and the result is
//! validated once.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::info;

use crate::error::AppError;

use super::constants::{min_gain_ratio_override, quote_api_base_url_override};
use super::types::AppConfig;

/// Load configuration from a YAML file
///
/// # Returns
/// * `Ok(AppConfig)` - Successfully loaded and validated configuration
/// * `Err(AppError)` - File not found, parse error, or validation failure
pub fn load_config(path: &Path) -> Result<AppConfig, AppError> {
    if !path.exists() {
        return Err(AppError::Config(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let config: AppConfig = serde_yaml::from_reader(reader).map_err(|e| {
        AppError::Config(format!("YAML parse error in '{}': {}", path.display(), e))
    })?;

    config.validate()?;

    Ok(config)
}

/// Load configuration from a YAML string (useful for testing)
pub fn load_config_from_str(yaml_content: &str) -> Result<AppConfig, AppError> {
    let config: AppConfig = serde_yaml::from_str(yaml_content)
        .map_err(|e| AppError::Config(format!("YAML parse error: {}", e)))?;

    config.validate()?;

    Ok(config)
}

/// Overlay `MIN_GAIN_PERCENT` and `QUOTE_API_BASE_URL` onto a configuration
pub fn apply_env_overrides(config: &mut AppConfig) {
    if let Some(ratio) = min_gain_ratio_override() {
        config.alerts.min_gain_ratio = ratio;
    }
    if let Some(url) = quote_api_base_url_override() {
        config.fetch.base_url = url;
    }
}

/// Startup entry point: YAML file if present, defaults otherwise, then env
pub fn load_runtime_config(path: &Path) -> Result<AppConfig, AppError> {
    let mut config = if path.exists() {
        info!(path = %path.display(), "Loading configuration file");
        load_config(path)?
    } else {
        info!(path = %path.display(), "No configuration file, using defaults");
        AppConfig::default()
    };

    apply_env_overrides(&mut config);
    config.validate()?;

    Ok(config)
}

// ============================================================================
// Tests
// ============================================================================
