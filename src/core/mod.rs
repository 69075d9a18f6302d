//! Core module - backoff, normalization, matching, filtering, alerts, scheduling
//!
//! This module uses **explicit re-exports** instead of glob exports
//! (`pub use module::*`) so the public API only changes on purpose.
//!
//! ## Usage
//! Prefer importing from `crate::core`:
//! ```ignore
//! use crate::core::{match_opportunities, filter_and_rank, FilterPolicy};
//! ```

pub mod alert;
pub mod backoff;
pub mod filter;
pub mod matcher;
pub mod pipeline;
pub mod quote;
pub mod scheduler;

// Explicit re-exports for backoff module
pub use backoff::{retry_with_backoff, RetryExhausted, RetryPolicy};

// Explicit re-exports for quote module
pub use quote::{normalize, MarketKey, Quote};

// Explicit re-exports for matcher module
pub use matcher::{match_opportunities, Opportunity};

// Explicit re-exports for filter module
pub use filter::{filter_and_rank, FilterPolicy};

// Explicit re-exports for alert module
pub use alert::{
    escape_markdown, format_amount, format_none, format_opportunity, format_percent,
    NO_OPPORTUNITIES_MESSAGE,
};

// Explicit re-exports for pipeline module
pub use pipeline::{Pipeline, TickReport};

// Explicit re-exports for scheduler module
pub use scheduler::{Clock, ScheduledTask, Scheduler, SchedulerReport, StopReason, TokioClock};
