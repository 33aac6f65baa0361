//! The Email Verification API client.

use crate::api::options::{QueryOptions, RequestOption};
use crate::api::transport::Transport;
use crate::core::config::{default_base_url, default_user_agent, Config};
use crate::core::error::{EvapiError, Result};
use crate::core::models::{self, RawResponse, VerificationResult};
use url::Url;

/// Client for the Email Verification API.
///
/// Cheap to clone; clones share the underlying `reqwest::Client` and its
/// connection pool. Every call is a single GET with no retries. To cancel a
/// call, drop its future (e.g. via `tokio::time::timeout` or `tokio::select!`).
#[derive(Clone)]
pub struct Client {
    transport: Transport,
    api_key: String,
    base_url: Url,
}

/// Builds a [`Client`] from an API key plus optional overrides.
pub struct ClientBuilder {
    api_key: String,
    http_client: Option<reqwest::Client>,
    base_url: Option<Url>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// HTTP client to send requests with. Defaults to `reqwest::Client::new()`.
    pub fn http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Endpoint to query. Defaults to [`DEFAULT_BASE_URL`](crate::DEFAULT_BASE_URL).
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Client {
        let http = self.http_client.unwrap_or_default();
        let user_agent = self.user_agent.unwrap_or_else(default_user_agent);
        Client {
            transport: Transport::new(http, user_agent),
            api_key: self.api_key,
            base_url: self.base_url.unwrap_or_else(default_base_url),
        }
    }
}

impl Client {
    /// Creates a client with the default endpoint and HTTP client.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            api_key: api_key.into(),
            http_client: None,
            base_url: None,
            user_agent: None,
        }
    }

    /// Creates a client from [`Config`], building a `reqwest::Client` with
    /// the configured timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut http = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            http = http.timeout(timeout);
        }
        let http = http
            .build()
            .map_err(|e| EvapiError::Initialization(format!("cannot build HTTP client: {e}")))?;

        Ok(Self::builder(config.api_key.clone())
            .http_client(http)
            .base_url(config.base_url.clone())
            .user_agent(config.user_agent.clone())
            .build())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        self.transport.user_agent()
    }

    /// Returns the parsed verification result together with the raw response.
    ///
    /// The request always asks for `outputFormat=JSON`: an `output_format`
    /// option passed here is accepted but overridden, since only JSON is
    /// parsed. The HTTP status is not checked; the payload decides.
    ///
    /// # Errors
    ///
    /// * [`EvapiError::Argument`] when `email_address` is empty (no request is sent).
    /// * [`EvapiError::Execute`] / [`EvapiError::Read`] on transport failure.
    /// * [`EvapiError::Parse`] when the body is not a valid payload.
    /// * [`EvapiError::Api`] when the payload carries an `ErrorMessage`. Unlike
    ///   the other post-response errors, this one does not carry the raw response.
    pub async fn get(
        &self,
        email_address: &str,
        options: &[RequestOption],
    ) -> Result<(VerificationResult, RawResponse)> {
        let json = RequestOption::output_format("JSON");
        let options: Vec<&RequestOption> = options.iter().chain(Some(&json)).collect();

        let raw = self.request(email_address, options).await?;

        let decoded = models::decode(raw.body());
        let payload = match decoded {
            Ok(payload) => payload,
            Err(source) => {
                return Err(EvapiError::Parse {
                    source,
                    response: Box::new(raw),
                })
            }
        };

        let result = payload.into_result()?;
        Ok((result, raw))
    }

    /// Returns the raw response without decoding it.
    ///
    /// Options are sent as given, including `output_format`.
    ///
    /// # Errors
    ///
    /// * [`EvapiError::Argument`] when `email_address` is empty (no request is sent).
    /// * [`EvapiError::Execute`] / [`EvapiError::Read`] on transport failure.
    /// * [`EvapiError::Status`] when the status is outside 200-299; carries the
    ///   API's error message when the body has one.
    pub async fn get_raw(
        &self,
        email_address: &str,
        options: &[RequestOption],
    ) -> Result<RawResponse> {
        let raw = self.request(email_address, options.iter()).await?;
        check_status(raw)
    }

    async fn request<'a, I>(&self, email_address: &str, options: I) -> Result<RawResponse>
    where
        I: IntoIterator<Item = &'a RequestOption>,
    {
        if email_address.is_empty() {
            return Err(EvapiError::empty_argument("emailAddress"));
        }

        let url = self.request_url(email_address, options);

        tracing::debug!(
            target: "evapi",
            "Requesting verification of {} from {}",
            email_address,
            self.base_url
        );

        self.transport.get(url).await
    }

    fn request_url<'a, I>(&self, email_address: &str, options: I) -> Url
    where
        I: IntoIterator<Item = &'a RequestOption>,
    {
        let mut query = QueryOptions::new();
        query.set("apiKey", self.api_key.as_str());
        query.set("emailAddress", email_address);
        for option in options {
            option.apply(&mut query);
        }

        let mut url = self.base_url.clone();
        url.set_query(Some(&query.encode()));
        url
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("user_agent", &self.transport.user_agent())
            .finish_non_exhaustive()
    }
}

fn check_status(raw: RawResponse) -> Result<RawResponse> {
    if raw.is_success() {
        return Ok(raw);
    }

    Err(EvapiError::Status {
        status: raw.status(),
        message: models::envelope_message(raw.body()),
        response: Box::new(raw),
    })
}
