//! HTTP execution for Email Verification API requests.

use crate::core::error::{EvapiError, Result};
use crate::core::models::RawResponse;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use url::Url;

const MEDIA_TYPE: &str = "application/json";

/// Wraps the injected `reqwest::Client` and the headers sent with every call.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    user_agent: String,
}

impl Transport {
    pub(crate) fn new(http: reqwest::Client, user_agent: String) -> Self {
        Self { http, user_agent }
    }

    pub(crate) fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Sends a GET to `url` and buffers the whole body.
    ///
    /// A failure while reading the body still returns what arrived so far,
    /// inside [`EvapiError::Read`]. Dropping the response releases the
    /// connection on every path.
    pub(crate) async fn get(&self, url: Url) -> Result<RawResponse> {
        let mut response = self
            .http
            .get(url)
            .header(CONTENT_TYPE, MEDIA_TYPE)
            .header(ACCEPT, MEDIA_TYPE)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await
            .map_err(EvapiError::Execute)?;

        let status = response.status();
        let headers = response.headers().clone();
        let mut body = Vec::new();

        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => body.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(source) => {
                    return Err(EvapiError::Read {
                        source,
                        response: Box::new(RawResponse::new(status, headers, body)),
                    });
                }
            }
        }

        tracing::debug!(
            target: "evapi",
            "Received {} with {} body bytes",
            status,
            body.len()
        );

        Ok(RawResponse::new(status, headers, body))
    }
}
