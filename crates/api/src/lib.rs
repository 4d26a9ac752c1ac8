//! Waiting step API client.
//!
//! This crate provides the fetch collaborator used by the details loader.
//! It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults
//! - Discovering credentials from `PEERWAIT_API_TOKEN` / `PEERWAIT_SESSION_COOKIE`
//! - Validating the waiting step URL for safety
//! - Reducing every failure to `FetchResponse { success: false, .. }`
//!
//! The UI only depends on the [`WaitingStepFetcher`] trait; [`WaitingStepClient`]
//! is the reqwest-backed implementation.
//!
//! # Example
//!
//! ```ignore
//! use peerwait_api::{WaitingStepClient, WaitingStepFetcher};
//!
//! # async fn demo() -> Result<(), peerwait_api::ApiError> {
//! let client = WaitingStepClient::from_env()?;
//! let response = client.fetch("https://lms.example.com/waiting_step_data").await;
//! println!("success: {}", response.success);
//! # Ok(())
//! # }
//! ```

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use peerwait_types::{FetchResponse, WaitingStepDetails};
use reqwest::{Client, StatusCode, Url, header};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Environment variable holding an optional bearer token.
pub const API_TOKEN_ENV: &str = "PEERWAIT_API_TOKEN";
/// Environment variable holding an optional raw `Cookie` header (LMS session).
pub const SESSION_COOKIE_ENV: &str = "PEERWAIT_SESSION_COOKIE";

/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while building the client or performing a request.
///
/// [`WaitingStepFetcher::fetch`] never returns these; they are logged and
/// folded into an unsuccessful [`FetchResponse`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid waiting step URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid header value for {name}")]
    InvalidHeader { name: &'static str },

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with status {0}")]
    Status(StatusCode),
}

/// The opaque fetch collaborator: one attempt, no retries, failures reported
/// through the `success` flag only.
#[async_trait]
pub trait WaitingStepFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResponse;
}

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for the waiting step endpoint.
pub struct WaitingStepClient {
    http: Client,
    user_agent: String,
}

impl WaitingStepClient {
    /// Build a client from `PEERWAIT_API_TOKEN` and `PEERWAIT_SESSION_COOKIE`.
    pub fn from_env() -> Result<Self, ApiError> {
        let api_token = env::var(API_TOKEN_ENV).ok().filter(|token| !token.trim().is_empty());
        let session_cookie = env::var(SESSION_COOKIE_ENV).ok().filter(|cookie| !cookie.trim().is_empty());
        Self::new(api_token.as_deref(), session_cookie.as_deref())
    }

    /// Build a client with explicit credentials.
    pub fn new(api_token: Option<&str>, session_cookie: Option<&str>) -> Result<Self, ApiError> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(api_token) = api_token {
            let authorization_header_value = format!("Bearer {}", api_token.trim());
            let value = header::HeaderValue::from_str(&authorization_header_value)
                .map_err(|_| ApiError::InvalidHeader { name: "Authorization" })?;
            default_headers.insert(header::AUTHORIZATION, value);
        }
        if let Some(cookie) = session_cookie {
            let value =
                header::HeaderValue::from_str(cookie.trim()).map_err(|_| ApiError::InvalidHeader { name: "Cookie" })?;
            default_headers.insert(header::COOKIE, value);
        }

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            user_agent: format!("peerwait/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Perform the request, surfacing failures as [`ApiError`].
    pub async fn try_fetch(&self, url: &str) -> Result<WaitingStepDetails, ApiError> {
        let url = validate_url(url)?;
        debug!(%url, "requesting waiting step details");

        let response = self
            .http
            .get(url)
            .header(header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        Ok(response.json::<WaitingStepDetails>().await?)
    }
}

#[async_trait]
impl WaitingStepFetcher for WaitingStepClient {
    async fn fetch(&self, url: &str) -> FetchResponse {
        match self.try_fetch(url).await {
            Ok(details) => {
                info!(learners = details.student_data.len(), "waiting step details loaded");
                FetchResponse::succeeded(details)
            }
            Err(error) => {
                warn!(%error, "failed to fetch waiting step details");
                FetchResponse::failed()
            }
        }
    }
}

/// Validate that a waiting step URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any http(s) scheme is allowed
/// - otherwise: scheme must be HTTPS
pub fn validate_url(raw: &str) -> Result<Url, ApiError> {
    let invalid = |reason: String| ApiError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let parsed_url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    let host_name = parsed_url
        .host_str()
        .ok_or_else(|| invalid("URL must include a host".into()))?;

    let is_local = LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed));

    match parsed_url.scheme() {
        "https" => Ok(parsed_url),
        "http" if is_local => Ok(parsed_url),
        "http" => Err(invalid("https is required for non-localhost hosts".into())),
        other => Err(invalid(format!("unsupported scheme '{other}://'"))),
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serve one canned HTTP response on a loopback port and return its URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = vec![0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            let _ = socket.shutdown().await;
        });
        format!("http://127.0.0.1:{}/waiting_step_data", address.port())
    }

    #[test]
    fn https_urls_are_accepted() {
        let url = validate_url("https://lms.example.com/courses/x/waiting_step_details").expect("valid");
        assert_eq!(url.host_str(), Some("lms.example.com"));
    }

    #[test]
    fn plain_http_only_for_localhost() {
        assert!(validate_url("http://localhost:18000/waiting").is_ok());
        assert!(validate_url("http://127.0.0.1/waiting").is_ok());
        let error = validate_url("http://lms.example.com/waiting").expect_err("http remote");
        assert!(error.to_string().contains("https is required"));
    }

    #[test]
    fn malformed_urls_are_rejected() {
        assert!(matches!(validate_url("not a url"), Err(ApiError::InvalidUrl { .. })));
        assert!(matches!(validate_url("ftp://localhost/file"), Err(ApiError::InvalidUrl { .. })));
    }

    #[test]
    fn header_values_are_validated() {
        let error = WaitingStepClient::new(Some("bad\ntoken"), None).expect_err("newline in header");
        assert!(matches!(error, ApiError::InvalidHeader { name: "Authorization" }));
    }

    #[tokio::test]
    async fn fetch_folds_invalid_url_into_failure() {
        let client = WaitingStepClient::new(None, None).expect("client");
        let response = client.fetch("http://lms.example.com/waiting").await;
        assert!(!response.success);
        assert!(response.waiting_step_data.student_data.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let url = serve_once("503 Service Unavailable", "{}").await;
        let client = WaitingStepClient::new(None, None).expect("client");
        let error = client.try_fetch(&url).await.expect_err("503");
        assert!(matches!(error, ApiError::Status(status) if status == StatusCode::SERVICE_UNAVAILABLE));
    }

    #[tokio::test]
    async fn undecodable_body_is_an_http_error() {
        let url = serve_once("200 OK", "<html>login</html>").await;
        let client = WaitingStepClient::new(None, None).expect("client");
        let error = client.try_fetch(&url).await.expect_err("not json");
        assert!(matches!(error, ApiError::Http(ref inner) if inner.is_decode()));

        let url = serve_once("200 OK", "<html>login</html>").await;
        assert!(!client.fetch(&url).await.success);
    }
}
