//! Crypto arbitrage alert bot
//!
//! Periodically polls a quote aggregator for every configured
//! asset/currency/volume, looks for cross-exchange price gaps and sends an
//! alert for each one above the configured gain.
//!
//! - `adapters`: quote-API client with retry, Telegram/stdout notifiers
//! - `core`: normalization, matching, filtering, formatting, scheduling
//! - `config`: YAML + environment configuration, logging setup

pub mod adapters;
pub mod config;
pub mod core;
pub mod error;

pub use error::AppError;
