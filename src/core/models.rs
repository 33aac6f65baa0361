//! Data structures for Email Verification API payloads and raw responses.

use crate::core::error::{EvapiError, Result};
use crate::utils::values::{ApiTime, StringBool};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};

/// Dates the data was collected and last refreshed on the API side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    #[serde(default, deserialize_with = "null_as_default")]
    pub audit_created_date: ApiTime,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audit_updated_date: ApiTime,
}

/// Outcome of verifying a single email address.
///
/// The `*_check` fields are `None` when the API did not report the check,
/// which is not the same as `Some(StringBool(false))`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email_address: String,

    /// Whether the address is syntactically valid.
    #[serde(default)]
    pub format_check: Option<StringBool>,
    /// Whether the mailbox accepted the address during SMTP emulation.
    #[serde(default)]
    pub smtp_check: Option<StringBool>,
    /// Whether the domain resolves.
    #[serde(default)]
    pub dns_check: Option<StringBool>,
    /// Whether the address belongs to a free provider.
    #[serde(default)]
    pub free_check: Option<StringBool>,
    /// Whether the address is disposable.
    #[serde(default)]
    pub disposable_check: Option<StringBool>,
    /// Whether the mail server accepts any recipient.
    #[serde(default)]
    pub catch_all_check: Option<StringBool>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub mx_records: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub audit: Audit,
}

/// The envelope the API embeds in a payload when it could not serve a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "Error", default)]
    pub message: String,
}

/// A decoded payload: the result fields plus an optional error envelope.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(flatten)]
    pub(crate) result: VerificationResult,
    #[serde(rename = "ErrorMessage", default)]
    pub(crate) error_message: Option<ErrorMessage>,
}

impl ApiResponse {
    /// Splits the payload into the result or the API-level error.
    pub(crate) fn into_result(self) -> Result<VerificationResult> {
        match self.error_message {
            Some(envelope) => Err(EvapiError::Api(envelope)),
            None => Ok(self.result),
        }
    }
}

#[derive(Deserialize)]
struct EnvelopeOnly {
    #[serde(rename = "ErrorMessage")]
    error_message: ErrorMessage,
}

/// Decodes the first JSON value in `raw`; trailing bytes are ignored.
pub(crate) fn decode(raw: &[u8]) -> std::result::Result<ApiResponse, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_slice(raw);
    ApiResponse::deserialize(&mut deserializer)
}

/// Best-effort extraction of the envelope message from an error body.
pub(crate) fn envelope_message(raw: &[u8]) -> Option<String> {
    let mut deserializer = serde_json::Deserializer::from_slice(raw);
    EnvelopeOnly::deserialize(&mut deserializer)
        .ok()
        .map(|e| e.error_message.message)
        .filter(|m| !m.is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The unparsed HTTP response with its body fully buffered.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// The body as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_BODY: &str = r#"{"username":"support","domain":"whoisxmlapi.com","emailAddress":"support@whoisxmlapi.com",
"formatCheck":"true","smtpCheck":"true","dnsCheck":"true","freeCheck":"false","disposableCheck":"false",
"catchAllCheck":"true","mxRecords":["alt1.aspmx.l.google.com.","aspmx2.googlemail.com.","aspmx.l.google.com.",
"aspmx3.googlemail.com.","alt2.aspmx.l.google.com."],"audit":{"auditCreatedDate":"2022-04-03 05:02:37 UTC",
"auditUpdatedDate":"2022-04-03 05:02:37 UTC"}}"#;

    #[test]
    fn decodes_full_payload() {
        let result = decode(OK_BODY.as_bytes()).unwrap().into_result().unwrap();
        assert_eq!(result.username, "support");
        assert_eq!(result.email_address, "support@whoisxmlapi.com");
        assert_eq!(result.free_check, Some(StringBool(false)));
        assert_eq!(result.catch_all_check, Some(StringBool(true)));
        assert_eq!(result.mx_records.len(), 5);
        assert_eq!(result.mx_records[0], "alt1.aspmx.l.google.com.");
        assert_eq!(result.audit.audit_updated_date.zone(), Some("UTC"));
    }

    #[test]
    fn absent_checks_stay_none() {
        let body = br#"{"emailAddress":"a@b.c","formatCheck":"false","smtpCheck":null}"#;
        let result = decode(body).unwrap().into_result().unwrap();
        assert_eq!(result.format_check, Some(StringBool(false)));
        assert_eq!(result.smtp_check, None);
        assert_eq!(result.catch_all_check, None);
        assert!(result.mx_records.is_empty());
        assert!(result.audit.audit_created_date.is_empty());
    }

    #[test]
    fn empty_audit_dates_decode_to_sentinel() {
        let body = br#"{"audit":{"auditCreatedDate":"","auditUpdatedDate":""},"mxRecords":null}"#;
        let result = decode(body).unwrap().into_result().unwrap();
        assert_eq!(result.audit, Audit::default());
    }

    #[test]
    fn envelope_withholds_result() {
        let body = br#"{"ErrorMessage":{"Error":"test error message"}}"#;
        let err = decode(body).unwrap().into_result().unwrap_err();
        assert_eq!(err.to_string(), "API error: test error message");
    }

    #[test]
    fn null_envelope_is_not_an_error() {
        let body = br#"{"emailAddress":"a@b.c","ErrorMessage":null}"#;
        assert!(decode(body).unwrap().into_result().is_ok());
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let body = br#"{"emailAddress":"a@b.c"} trailing"#;
        assert!(decode(body).is_ok());
    }

    #[test]
    fn truncated_payload_is_eof() {
        let body = &OK_BODY.as_bytes()[..OK_BODY.len() - 10];
        let err = decode(body).unwrap_err();
        assert!(err.is_eof());
    }

    #[test]
    fn markup_is_a_syntax_error() {
        let err = decode(br#"<?xml version="1.0" encoding="utf-8"?><>"#).unwrap_err();
        assert!(err.is_syntax());
    }

    #[test]
    fn bad_timestamp_fails_decoding() {
        let body = br#"{"audit":{"auditCreatedDate":"2006-01-02T15:04:05-07:00"}}"#;
        let err = decode(body).unwrap_err();
        assert!(err.to_string().contains("parsing time"));
    }

    #[test]
    fn serializes_with_api_encodings() {
        let body = br#"{"emailAddress":"a@b.c","freeCheck":"1","audit":{"auditCreatedDate":"2022-04-03 05:02:37 UTC"}}"#;
        let result = decode(body).unwrap().into_result().unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["freeCheck"], "true");
        assert_eq!(json["smtpCheck"], serde_json::Value::Null);
        assert_eq!(json["audit"]["auditCreatedDate"], "2022-04-03 05:02:37 UTC");
        assert_eq!(json["audit"]["auditUpdatedDate"], "");
    }

    #[test]
    fn envelope_message_extraction() {
        assert_eq!(
            envelope_message(br#"{"ErrorMessage":{"Error":"quota exceeded"}}"#),
            Some("quota exceeded".to_string())
        );
        assert_eq!(envelope_message(b"<html>"), None);
        assert_eq!(envelope_message(br#"{"ErrorMessage":{}}"#), None);
    }
}
