//! Configuration types for the installer

use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

use crate::downloader::core::{InstallError, Result};
use crate::media::Side;

/// User agent sent on the retry after a server rejects the default one
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Where and for which side an install happens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallContext {
    /// Base directory; media land in `<install_path>/<kind dir>/`
    pub install_path: PathBuf,
    pub side: Side,
}

/// Configuration for install operations
#[derive(Debug, Clone)]
pub struct InstallConfig {
    pub context: InstallContext,
    /// Size of each write while streaming a download
    pub chunk_size: usize,
    /// User agent of the first attempt
    pub user_agent: String,
    /// User agent of the single retry on an HTTP error status
    pub browser_user_agent: String,
    /// Request timeout. `None` waits forever, so one hung host stalls the batch.
    pub timeout: Option<Duration>,
}

impl InstallConfig {
    pub fn new<P: Into<PathBuf>>(install_path: P, side: Side) -> Self {
        Self {
            context: InstallContext {
                install_path: install_path.into(),
                side,
            },
            ..Self::default()
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_browser_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.browser_user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn install_path(&self) -> &std::path::Path {
        &self.context.install_path
    }

    pub fn side(&self) -> Side {
        self.context.side
    }

    /// Check the configuration for values that can never work
    pub fn check(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(InstallError::Configuration {
                message: "chunk_size must be at least 1".to_string(),
                suggestion: Some("Use the default of 1024 bytes".to_string()),
            });
        }

        if self.timeout == Some(Duration::ZERO) {
            return Err(InstallError::Configuration {
                message: "timeout must be greater than zero".to_string(),
                suggestion: Some("Leave the timeout unset to wait indefinitely".to_string()),
            });
        }

        Ok(())
    }

    /// Build the HTTP client shared by the probe and download phases
    pub fn build_client(&self) -> Result<Client> {
        // Files are stored byte for byte as served, never transparently decoded
        let mut builder = Client::builder()
            .user_agent(&self.user_agent)
            .no_gzip()
            .no_brotli()
            .no_deflate();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().map_err(|e| InstallError::Configuration {
            message: format!("Failed to create HTTP client: {}", e),
            suggestion: None,
        })
    }
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            context: InstallContext {
                install_path: PathBuf::from("."),
                side: Side::Client,
            },
            chunk_size: 1024,
            user_agent: concat!("modpack-installer/", env!("CARGO_PKG_VERSION")).to_string(),
            browser_user_agent: BROWSER_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InstallConfig::default();
        assert_eq!(config.chunk_size, 1024);
        assert_eq!(config.timeout, None);
        assert_eq!(config.side(), Side::Client);
        assert!(config.user_agent.starts_with("modpack-installer/"));
        assert!(config.browser_user_agent.starts_with("Mozilla/5.0"));
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = InstallConfig::new("/srv/minecraft", Side::Server)
            .with_chunk_size(4096)
            .with_timeout(Duration::from_secs(10));

        assert_eq!(config.install_path(), std::path::Path::new("/srv/minecraft"));
        assert_eq!(config.side(), Side::Server);
        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert!(config.build_client().is_ok());
    }

    #[test]
    fn test_check_rejects_zero_values() {
        let config = InstallConfig::default().with_chunk_size(0);
        assert_eq!(config.check().unwrap_err().category(), "configuration");

        let config = InstallConfig::default().with_timeout(Duration::ZERO);
        assert!(config.check().is_err());
    }
}
