//! Authenticated requests against the GitHub API and decoding of their responses.

use crate::config::Credential;
use crate::constants::{RAW_MEDIA_TYPE, USER_AGENT as USER_AGENT_VALUE};
use crate::errors::{ConfigError, Error, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs an authenticated GET.
///
/// Implementations attach the credential and the raw-content media type. A
/// response with any status is `Ok`; only network-level failures are
/// [`Error::Transport`].
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// [`Transport`] backed by a blocking `reqwest` client.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a client that sends `credential` as a bearer token on every request
    /// and gives up on a request after `timeout`.
    pub fn new(credential: &Credential, timeout: Duration) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", credential.secret()))
            .map_err(|_| ConfigError::InvalidValue {
                option: "--git-token".to_string(),
                reason: "contains characters that are not allowed in an HTTP header".to_string(),
            })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(RAW_MEDIA_TYPE));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport {
                url: String::new(),
                source: Box::new(e),
            })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        let transport_error = |e: reqwest::Error| Error::Transport {
            url: url.to_string(),
            source: Box::new(e),
        };

        let response = self.client.get(url).send().map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(transport_error)?;
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// Kind of an item in a directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// One item of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Represents a file or directory item from the GitHub Contents API.
#[derive(Deserialize, Debug)]
struct ContentItem {
    name: String,
    #[serde(rename = "type")]
    item_type: String,
}

/// The body GitHub sends along with error statuses.
#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    message: String,
}

/// Issues API requests through a [`Transport`] and decodes the results.
#[derive(Clone)]
pub struct ContentFetcher {
    transport: Arc<dyn Transport>,
    retries: u32,
}

impl ContentFetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            retries: 0,
        }
    }

    /// Retries network-level failures up to `retries` extra times. HTTP error
    /// statuses are never retried.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Fetches the raw bytes at `url`.
    ///
    /// # Errors
    /// [`Error::Transport`] on network failure, [`Error::UpstreamApi`] on a non-2xx status.
    pub fn fetch_raw(&self, url: &str) -> Result<Vec<u8>> {
        let mut attempt = 0;
        let response = loop {
            match self.transport.get(url) {
                Ok(response) => break response,
                Err(Error::Transport { source, .. }) if attempt < self.retries => {
                    attempt += 1;
                    log::warn!(
                        "Request to {} failed ({}), retrying ({}/{})",
                        url,
                        source,
                        attempt,
                        self.retries
                    );
                }
                Err(e) => return Err(e),
            }
        };

        if !response.is_success() {
            return Err(upstream_error(url, &response));
        }
        Ok(response.body)
    }

    /// Fetches and decodes a directory listing.
    ///
    /// The whole listing is rejected with [`Error::MalformedListing`] if it is not
    /// a JSON array or if any element lacks a string `name` or `type`. Names that
    /// could escape the local directory are rejected the same way.
    pub fn fetch_json_listing(&self, url: &str) -> Result<Vec<DirEntry>> {
        let body = self.fetch_raw(url)?;
        let items: Vec<ContentItem> =
            serde_json::from_slice(&body).map_err(|e| Error::MalformedListing {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        items
            .into_iter()
            .map(|item| {
                if !is_plain_name(&item.name) {
                    return Err(Error::MalformedListing {
                        url: url.to_string(),
                        reason: format!("invalid entry name '{}'", item.name),
                    });
                }
                let kind = if item.item_type == "dir" {
                    EntryKind::Dir
                } else {
                    if item.item_type != "file" {
                        log::debug!(
                            "Treating '{}' of type '{}' as a file",
                            item.name,
                            item.item_type
                        );
                    }
                    EntryKind::File
                };
                Ok(DirEntry {
                    name: item.name,
                    kind,
                })
            })
            .collect()
    }

    /// Fetches `url` and parses the body as arbitrary JSON.
    pub fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        let body = self.fetch_raw(url)?;
        serde_json::from_slice(&body).map_err(|source| Error::MalformedResponse {
            url: url.to_string(),
            source,
        })
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

fn upstream_error(url: &str, response: &HttpResponse) -> Error {
    let message = serde_json::from_slice::<ApiErrorBody>(&response.body)
        .map(|b| b.message)
        .ok()
        .or_else(|| {
            let text = String::from_utf8_lossy(&response.body).trim().to_string();
            (!text.is_empty()).then_some(text)
        })
        .or_else(|| {
            reqwest::StatusCode::from_u16(response.status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "Unknown error".to_string());

    log::error!("GET {} returned {}: {}", url, response.status, message);
    Error::UpstreamApi {
        url: url.to_string(),
        status: response.status,
        message,
    }
}
