//! Query parameters accepted by the Email Verification API.

use std::collections::BTreeMap;
use url::form_urlencoded;

/// Query parameters of a request, kept sorted by name. Setting a name twice
/// keeps the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions(BTreeMap<String, String>);

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encodes the parameters as `application/x-www-form-urlencoded`, in key order.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

/// A single verification toggle applied to the request query.
///
/// Integer toggles are sent verbatim; the API treats `0` as off and `1` as on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOption {
    /// Response format, `JSON` or `XML`. The parsed path always sends `JSON`.
    OutputFormat(String),
    /// Ask for fresh data instead of cached results. Default: 0.
    HardRefresh(i64),
    /// Check the address against DNS. Default: 1.
    ValidateDns(i64),
    /// Check the address over SMTP. Default: 1.
    ValidateSmtp(i64),
    /// Check whether the provider has a catch-all address. Default: 1.
    CheckCatchAll(i64),
    /// Check whether the provider is a free one. Default: 1.
    CheckFree(i64),
    /// Check whether the address is disposable. Default: 1.
    CheckDisposable(i64),
}

impl RequestOption {
    pub fn output_format(format: &str) -> Self {
        RequestOption::OutputFormat(format.to_uppercase())
    }

    pub fn hard_refresh(value: i64) -> Self {
        RequestOption::HardRefresh(value)
    }

    pub fn validate_dns(value: i64) -> Self {
        RequestOption::ValidateDns(value)
    }

    pub fn validate_smtp(value: i64) -> Self {
        RequestOption::ValidateSmtp(value)
    }

    pub fn check_catch_all(value: i64) -> Self {
        RequestOption::CheckCatchAll(value)
    }

    pub fn check_free(value: i64) -> Self {
        RequestOption::CheckFree(value)
    }

    pub fn check_disposable(value: i64) -> Self {
        RequestOption::CheckDisposable(value)
    }

    /// The query parameter this option controls.
    pub fn key(&self) -> &'static str {
        match self {
            RequestOption::OutputFormat(_) => "outputFormat",
            RequestOption::HardRefresh(_) => "_hardRefresh",
            RequestOption::ValidateDns(_) => "validateDNS",
            RequestOption::ValidateSmtp(_) => "validateSMTP",
            RequestOption::CheckCatchAll(_) => "checkCatchAll",
            RequestOption::CheckFree(_) => "checkFree",
            RequestOption::CheckDisposable(_) => "checkDisposable",
        }
    }

    pub fn value(&self) -> String {
        match self {
            // Upper-cased here too, in case the variant was built directly.
            RequestOption::OutputFormat(format) => format.to_uppercase(),
            RequestOption::HardRefresh(v)
            | RequestOption::ValidateDns(v)
            | RequestOption::ValidateSmtp(v)
            | RequestOption::CheckCatchAll(v)
            | RequestOption::CheckFree(v)
            | RequestOption::CheckDisposable(v) => v.to_string(),
        }
    }

    pub fn apply(&self, query: &mut QueryOptions) {
        query.set(self.key(), self.value());
    }
}
