//! HTTP utilities
//!
//! One client shared by the probe and download phases, with the
//! "retry once as a browser" policy both phases use.

use reqwest::header::{CONTENT_LENGTH, USER_AGENT};
use reqwest::{Client, Method, Response, StatusCode};
use std::error::Error as StdError;
use tracing::debug;

use crate::downloader::config::InstallConfig;
use crate::downloader::core::Result;

/// Messages resolvers use for a name that does not resolve
const HOST_NOT_FOUND_MARKERS: [&str; 6] = [
    "dns error",
    "failed to lookup address",
    "Name or service not known",
    "No such host is known",
    "nodename nor servname",
    "getaddrinfo failed",
];

/// Why a request did not produce a usable response
#[derive(Debug)]
pub enum FetchError {
    /// The server answered with an error status on both attempts
    Status { status: StatusCode },
    /// The request never got a response
    Transport(reqwest::Error),
}

impl FetchError {
    /// True for DNS failures, the one connection error treated as a warning
    pub fn is_host_not_found(&self) -> bool {
        match self {
            FetchError::Transport(error) => is_host_not_found(error),
            FetchError::Status { .. } => false,
        }
    }

    /// True when the URL could not even be turned into a request
    pub fn is_invalid_url(&self) -> bool {
        matches!(self, FetchError::Transport(error) if error.is_builder())
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Status { status } => write!(f, "HTTP Error {}", status),
            FetchError::Transport(error) => write!(f, "{}", root_cause(error)),
        }
    }
}

/// Check whether a reqwest error comes from a failed name resolution
pub fn is_host_not_found(error: &reqwest::Error) -> bool {
    if !error.is_connect() && !error.is_request() {
        return false;
    }

    let mut current: Option<&(dyn StdError + 'static)> = Some(error as &(dyn StdError + 'static));
    while let Some(err) = current {
        let message = err.to_string();
        if HOST_NOT_FOUND_MARKERS.iter().any(|marker| message.contains(marker)) {
            return true;
        }
        current = err.source();
    }
    false
}

/// Innermost message of an error chain
fn root_cause(error: &reqwest::Error) -> String {
    let mut current: &(dyn StdError + 'static) = error;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

/// Read the `content-length` header, defaulting to 0
///
/// The header is read directly because the body size hint of a HEAD
/// response is always zero.
pub fn header_content_length(response: &Response) -> u64 {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}

/// HTTP client with the browser user agent fallback
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    browser_user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client from install configuration
    pub fn from_config(config: &InstallConfig) -> Result<Self> {
        Ok(Self {
            client: config.build_client()?,
            browser_user_agent: config.browser_user_agent.clone(),
        })
    }

    /// Metadata-only request used to size an item
    pub async fn head(&self, url: &str) -> std::result::Result<Response, FetchError> {
        self.send_with_fallback(Method::HEAD, url).await
    }

    /// Content request used to download an item
    pub async fn get(&self, url: &str) -> std::result::Result<Response, FetchError> {
        self.send_with_fallback(Method::GET, url).await
    }

    /// Send a request; on an error status send it once more as a browser
    ///
    /// Transport errors are returned from whichever attempt hits them,
    /// without a retry.
    async fn send_with_fallback(
        &self,
        method: Method,
        url: &str,
    ) -> std::result::Result<Response, FetchError> {
        let response = self
            .client
            .request(method.clone(), url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        if response.status().is_success() {
            return Ok(response);
        }

        debug!(
            "{} {} returned {}, retrying with browser user agent",
            method,
            url,
            response.status()
        );

        let response = self
            .client
            .request(method, url)
            .header(USER_AGENT, &self.browser_user_agent)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(FetchError::Status {
                status: response.status(),
            })
        }
    }
}
