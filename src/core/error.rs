//! Defines the error type returned by every Email Verification API call.

use crate::core::models::{ErrorMessage, RawResponse};
use reqwest::StatusCode;
use thiserror::Error;

/// The error type for the Email Verification API client.
#[derive(Error, Debug)]
pub enum EvapiError {
    /// A required argument was empty. Raised before any network activity.
    #[error("invalid argument: \"{name}\" {message}")]
    Argument {
        name: &'static str,
        message: &'static str,
    },

    /// The HTTP request could not be executed (DNS, connect, TLS, redirect...).
    #[error("cannot execute request: {0}")]
    Execute(#[source] reqwest::Error),

    /// The connection failed while the response body was being read.
    /// Carries whatever part of the body arrived before the failure.
    #[error("cannot read response: {source}")]
    Read {
        #[source]
        source: reqwest::Error,
        response: Box<RawResponse>,
    },

    /// The raw retrieval path got a status outside 200-299.
    #[error(
        "API failed with status code: {}{}",
        .status.as_u16(),
        message_suffix(.message)
    )]
    Status {
        status: StatusCode,
        message: Option<String>,
        response: Box<RawResponse>,
    },

    /// The body was not a decodable Email Verification API payload.
    #[error("cannot parse response: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        response: Box<RawResponse>,
    },

    /// The API answered with an `ErrorMessage` envelope.
    #[error("API error: {}", .0.message)]
    Api(ErrorMessage),

    /// Error occurring during configuration loading or validation.
    #[error("Configuration Error: {0}")]
    Config(String),

    /// Error initializing the underlying HTTP client.
    #[error("Initialization Error: {0}")]
    Initialization(String),
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(message) if !message.is_empty() => format!(" ({message})"),
        _ => String::new(),
    }
}

impl EvapiError {
    pub(crate) fn empty_argument(name: &'static str) -> Self {
        EvapiError::Argument {
            name,
            message: "cannot be empty",
        }
    }

    /// The raw response received before the error occurred, if any.
    ///
    /// `Api` errors never carry one, even though a response was received.
    pub fn raw_response(&self) -> Option<&RawResponse> {
        match self {
            EvapiError::Read { response, .. }
            | EvapiError::Status { response, .. }
            | EvapiError::Parse { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Consumes the error, returning the raw response it carried.
    pub fn into_raw_response(self) -> Option<RawResponse> {
        match self {
            EvapiError::Read { response, .. }
            | EvapiError::Status { response, .. }
            | EvapiError::Parse { response, .. } => Some(*response),
            _ => None,
        }
    }

    /// Status code of the failed call, when one was received.
    pub fn status(&self) -> Option<StatusCode> {
        self.raw_response().map(RawResponse::status)
    }
}

pub type Result<T> = std::result::Result<T, EvapiError>;
