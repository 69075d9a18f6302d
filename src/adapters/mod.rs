//! External adapters: the quote provider and the alert sinks
//!
//! The pipeline depends only on the `QuoteSource` and `Notifier` traits;
//! concrete HTTP clients live here.

pub mod errors;
pub mod quote_api;
pub mod telegram;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use errors::{FetchError, NotifyError};
pub use quote_api::{HttpReply, HttpTransport, QuoteApiClient, ReqwestTransport};
pub use telegram::{AlertSink, StdoutNotifier, TelegramNotifier};
pub use traits::{Notifier, QuoteSource};
pub use types::{FetchFailure, FetchOutcome, QuoteRequestKey, RawQuote};
