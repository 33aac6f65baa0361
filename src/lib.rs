//! Async client for the Email Verification API.
//!
//! ```no_run
//! use email_verifier::{Client, RequestOption};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), email_verifier::EvapiError> {
//!     let client = Client::new("at_your_api_key");
//!     let (result, _raw) = client
//!         .get("support@whoisxmlapi.com", &[RequestOption::check_catch_all(0)])
//!         .await?;
//!
//!     if let Some(smtp) = result.smtp_check {
//!         println!("{}: smtp={}", result.email_address, smtp);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! [`Client::get`] always requests and parses JSON. [`Client::get_raw`] hands
//! back the body untouched and rejects non-2xx statuses instead.

pub mod api;
pub mod core;
pub mod utils;

pub use crate::api::{Client, ClientBuilder, QueryOptions, RequestOption};
pub use crate::core::config::{Config, ConfigFile, DEFAULT_BASE_URL};
pub use crate::core::error::{EvapiError, Result};
pub use crate::core::models::{Audit, ErrorMessage, RawResponse, VerificationResult};
pub use crate::utils::values::{ApiTime, StringBool, TimestampError};
