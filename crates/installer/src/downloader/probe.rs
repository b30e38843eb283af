//! Size probing
//!
//! One metadata-only request per item. A failed probe is a warning, never a
//! reason to drop the item: it stays scheduled with a size of 0.

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::downloader::core::http::header_content_length;
use crate::downloader::core::{
    FetchError, HttpClient, InstallError, ProgressCallback, ProgressEvent, Result,
};
use crate::media::MediaDescriptor;

/// Why an item could not be sized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Both the plain and the browser request got an error status
    HttpStatus(StatusCode),
    /// The host name did not resolve
    HostNotFound(String),
    /// The resolved URL is not a valid request URL
    InvalidUrl(String),
}

/// Result of probing one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered; 0 when it sent no `content-length`
    Sized(u64),
    /// The item could not be probed and was warned about
    Unavailable(SkipReason),
}

impl ProbeOutcome {
    /// Bytes this item contributes to the prepared total
    pub fn size(&self) -> u64 {
        match self {
            ProbeOutcome::Sized(size) => *size,
            ProbeOutcome::Unavailable(_) => 0,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ProbeOutcome::Sized(_))
    }
}

/// Probe the size of `media` at `url`
///
/// Connection errors other than a failed name resolution are returned as
/// [`InstallError::Connection`] and end the install.
pub async fn probe_size(
    client: &HttpClient,
    media: &MediaDescriptor,
    url: &str,
    progress_callback: Option<&ProgressCallback>,
) -> Result<ProbeOutcome> {
    debug!("Probing size of {} at {}", media.name, url);

    let error = match client.head(url).await {
        Ok(response) => {
            let size = header_content_length(&response);
            debug!("{} is {} bytes", media.name, size);
            return Ok(ProbeOutcome::Sized(size));
        }
        Err(error) => error,
    };

    let (reason, message) = match error {
        FetchError::Status { status } => (
            SkipReason::HttpStatus(status),
            format!("Could not download {}: \n{}", media.name, error),
        ),
        ref transport if transport.is_host_not_found() => (
            SkipReason::HostNotFound(transport.to_string()),
            format!("The mod {} was not found: {}", media.name, transport),
        ),
        ref transport if transport.is_invalid_url() => (
            SkipReason::InvalidUrl(url.to_string()),
            format!("Could not download {}: invalid URL '{}'", media.name, url),
        ),
        FetchError::Transport(source) => {
            return Err(InstallError::Connection {
                url: url.to_string(),
                source,
            });
        }
    };

    warn!("{}", message);
    if let Some(callback) = progress_callback {
        callback(ProgressEvent::Warning {
            name: media.name.clone(),
            message,
        });
    }

    Ok(ProbeOutcome::Unavailable(reason))
}
