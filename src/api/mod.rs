//! Request construction and execution against the Email Verification API.

pub mod client;
pub mod options;
pub(crate) mod transport;

pub use client::{Client, ClientBuilder};
pub use options::{QueryOptions, RequestOption};
