pub mod admin;
pub mod poll;

use anyhow::{bail, Result};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};

use crate::session::SessionContext;

/// Every TBF API response is wrapped in this envelope.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Envelope variant for endpoints that acknowledge without a payload.
#[derive(Debug, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// HTTP client for the TBF backend. The session context is injected
/// explicitly; public poll endpoints work without one.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Option<SessionContext>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Option<SessionContext>) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, url);
        if let Some(session) = &self.session {
            req = req.bearer_auth(&session.token);
        }
        req
    }
}

/// Unwraps the response envelope, preferring the server's `message`
/// field over a generic fallback on any failure.
pub(crate) async fn read_envelope<T: DeserializeOwned>(
    resp: Response,
    fallback: &str,
) -> Result<ApiEnvelope<T>> {
    let status = resp.status();
    let body = resp.bytes().await.unwrap_or_default();
    parse_envelope(status, &body, fallback)
}

fn parse_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
    fallback: &str,
) -> Result<ApiEnvelope<T>> {
    if let Ok(envelope) = serde_json::from_slice::<ApiEnvelope<T>>(body) {
        if envelope.success {
            return Ok(envelope);
        }
        if !envelope.message.trim().is_empty() {
            bail!("{}", envelope.message);
        }
    }
    // failure bodies often carry only { success, message }
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .filter(|m| !m.trim().is_empty());
    match message {
        Some(message) => bail!("{message}"),
        None => bail!("{fallback} ({status})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Payload {
        value: u32,
    }

    #[test]
    fn successful_envelope_unwraps() {
        let body = br#"{ "data": { "value": 7 }, "success": true, "message": "ok" }"#;
        let env: ApiEnvelope<Payload> =
            parse_envelope(StatusCode::OK, body, "request failed").unwrap();
        assert_eq!(env.data.value, 7);
    }

    #[test]
    fn server_message_is_surfaced_verbatim() {
        let body = br#"{ "success": false, "message": "You have already voted on this poll" }"#;
        let err = parse_envelope::<Payload>(StatusCode::BAD_REQUEST, body, "Vote failed")
            .unwrap_err();
        assert_eq!(err.to_string(), "You have already voted on this poll");
    }

    #[test]
    fn unparseable_body_falls_back_to_the_generic_message() {
        let err = parse_envelope::<Payload>(StatusCode::BAD_GATEWAY, b"<html>", "Vote failed")
            .unwrap_err();
        assert_eq!(err.to_string(), "Vote failed (502 Bad Gateway)");
    }

    #[test]
    fn success_false_with_empty_message_uses_the_fallback() {
        let body = br#"{ "data": { "value": 1 }, "success": false, "message": "" }"#;
        let err =
            parse_envelope::<Payload>(StatusCode::OK, body, "Failed to load poll").unwrap_err();
        assert!(err.to_string().starts_with("Failed to load poll"));
    }
}
