//! Configuration module
//!
//! This module provides:
//! - Configuration types (`AppConfig`, `MarketConfig`, `FetchConfig`, `AlertConfig`, `ScheduleConfig`)
//! - YAML loading with environment overrides (`load_runtime_config`)
//! - Telegram credentials from the environment (`TelegramConfig`)
//! - Logging setup (`init_logging`)
//! - Defaults (`constants`)

pub mod constants;
mod loader;
pub mod logging;
mod telegram;
mod types;

// Re-export types
pub use types::{AlertConfig, AppConfig, FetchConfig, MarketConfig, ScheduleConfig};

// Re-export loader functions
pub use loader::{apply_env_overrides, load_config, load_config_from_str, load_runtime_config};

pub use telegram::TelegramConfig;

// Re-export logging functions
pub use logging::{init_logging, SanitizedValue};
