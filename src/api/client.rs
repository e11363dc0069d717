// Analytics API HTTP client.
// Handles base URL resolution, envelope unwrapping, bounded retry, and
// failure reporting. Errors never escape the accessor boundary; terminal
// failures turn into console notices and an absent result.

use std::time::Duration;

use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::de::DeserializeOwned;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::{PulseError, Result};

use super::cache::ApiCache;
use super::notify::Notice;
use super::retry::{FailureKind, MAX_RETRIES, RetryDecision, RetryState};
use super::types::{Envelope, EnvelopeStatus};

/// Fallback backend address when neither the CLI flag nor the environment
/// override is present.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
/// Environment override for the backend address.
pub const BASE_URL_ENV: &str = "PULSE_API_URL";

/// Overall per-request ceiling. A request that exceeds it counts as a
/// transient transport failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Analytics API client with response caching and bounded retry.
pub struct ApiClient {
    http: Client,
    base_url: String,
    pub(crate) cache: ApiCache,
    notices: UnboundedSender<Notice>,
}

impl ApiClient {
    /// Create a client for the given backend address.
    pub fn new(base_url: impl Into<String>, notices: UnboundedSender<Notice>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("pulse-tui"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(PulseError::Http)?;

        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(PulseError::BaseUrl("empty base URL".to_string()));
        }

        Ok(Self {
            http,
            base_url,
            cache: ApiCache::new(),
            notices,
        })
    }

    /// Resolve the backend address: CLI override, then `PULSE_API_URL`,
    /// then the local default.
    pub fn resolve_base_url(override_url: Option<String>) -> String {
        resolve_base_url_from(override_url, std::env::var(BASE_URL_ENV).ok())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Invalidate one cached response, or the whole cache when `key` is
    /// `None`. Callers use this to force a refresh.
    pub fn invalidate(&self, key: Option<&str>) {
        self.cache.clear(key);
    }

    /// Issue a GET with bounded retry, returning the unwrapped envelope
    /// payload. Only transient transport failures are retried; the request
    /// is idempotent so re-issuing it is safe.
    pub(crate) async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let mut retry = RetryState::new();
        loop {
            match self.try_get(path, params).await {
                Ok(data) => return Ok(data),
                Err(err) => {
                    let kind = FailureKind::from_error(&err);
                    match retry.on_failure(kind) {
                        RetryDecision::RetryAfter { delay, attempt } => {
                            self.notify(Notice::info(format!(
                                "{}: {}, retrying ({}/{})",
                                path,
                                err.user_message(),
                                attempt,
                                MAX_RETRIES
                            )));
                            tokio::time::sleep(delay).await;
                        }
                        RetryDecision::Fail => return Err(err),
                    }
                }
            }
        }
    }

    /// One attempt: send the request, check the transport status, unwrap
    /// the envelope.
    async fn try_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.get(&url);
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await.map_err(PulseError::Http)?;
        let status = response.status();
        if !status.is_success() {
            return Err(PulseError::Status {
                status: status.as_u16(),
            });
        }

        let envelope: Envelope<T> = response.json().await.map_err(PulseError::Http)?;
        match envelope.status {
            EnvelopeStatus::Success => envelope.data.ok_or(PulseError::MissingData),
            EnvelopeStatus::Error | EnvelopeStatus::Unknown => Err(PulseError::Envelope {
                code: envelope.code,
                message: envelope.message,
            }),
        }
    }

    pub(crate) fn notify(&self, notice: Notice) {
        // The receiver only disappears during shutdown.
        let _ = self.notices.send(notice);
    }

    pub(crate) fn report_failure(&self, path: &str, err: &PulseError) {
        self.notify(Notice::error(format!("{}: {}", path, err.user_message())));
    }
}

fn resolve_base_url_from(override_url: Option<String>, env_url: Option<String>) -> String {
    if let Some(url) = override_url.filter(|u| !u.is_empty()) {
        return url;
    }
    if let Some(url) = env_url.filter(|u| !u.is_empty()) {
        return url;
    }
    DEFAULT_BASE_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_base_url_priority() {
        assert_eq!(
            resolve_base_url_from(Some("http://a".into()), Some("http://b".into())),
            "http://a"
        );
        assert_eq!(
            resolve_base_url_from(None, Some("http://b".into())),
            "http://b"
        );
        assert_eq!(resolve_base_url_from(None, None), DEFAULT_BASE_URL);
        // Empty strings do not shadow lower-priority sources.
        assert_eq!(
            resolve_base_url_from(Some(String::new()), None),
            DEFAULT_BASE_URL
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let client = ApiClient::new("http://127.0.0.1:8080/", tx).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(ApiClient::new("", tx).is_err());
    }
}
