//! Error types for manifest validation and the install pipeline

use std::error::Error;
use std::path::PathBuf;
use thiserror::Error;

/// Problems found while validating a manifest
///
/// Validation runs before any network activity, so every variant here
/// aborts the install before a single request is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent (or, for the modloader, malformed)
    #[error("Missing field '{field}' in {location}: {hint}")]
    MissingField {
        field: String,
        location: String,
        hint: String,
    },

    /// A field holds a value outside its closed set of allowed values
    #[error("Invalid value '{value}' for '{field}' in {location} (expected one of: {allowed})")]
    InvalidEnum {
        field: String,
        value: String,
        location: String,
        allowed: String,
    },

    /// A field has the wrong JSON type
    #[error("Field '{field}' in {location} must be {expected}")]
    InvalidType {
        field: String,
        location: String,
        expected: String,
    },
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField { field, .. }
            | ValidationError::InvalidEnum { field, .. }
            | ValidationError::InvalidType { field, .. } => field,
        }
    }

    pub fn is_missing_field(&self) -> bool {
        matches!(self, ValidationError::MissingField { .. })
    }

    pub fn is_invalid_enum(&self) -> bool {
        matches!(self, ValidationError::InvalidEnum { .. })
    }
}

/// Errors raised by the installer
#[derive(Error, Debug)]
pub enum InstallError {
    /// The manifest failed validation
    #[error("Invalid manifest")]
    Validation(#[from] ValidationError),

    /// The manifest is not valid JSON
    #[error("Failed to parse manifest '{path}'")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A connection failure that is not a known "host not found" condition
    #[error("Connection to '{url}' failed")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// File system I/O errors with file context
    #[error("File operation failed on '{path}' while {operation}")]
    FileSystem {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        message: String,
        suggestion: Option<String>,
    },
}

/// Types of file operations for error context
#[derive(Debug, Clone, PartialEq)]
pub enum FileOperation {
    Read,
    Write,
    Create,
    CreateDir,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Create => write!(f, "creating"),
            FileOperation::CreateDir => write!(f, "creating directory"),
        }
    }
}

pub type Result<T> = std::result::Result<T, InstallError>;

impl InstallError {
    /// Check if the error could go away on a second attempt
    pub fn is_recoverable(&self) -> bool {
        match self {
            InstallError::Connection { source, .. } => source.is_timeout() || source.is_connect(),
            InstallError::FileSystem { source, .. } => matches!(
                source.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::WouldBlock
            ),
            InstallError::Validation(_) => false,
            InstallError::ManifestParse { .. } => false,
            InstallError::Configuration { .. } => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            InstallError::Validation(_) => "validation",
            InstallError::ManifestParse { .. } => "manifest_parse",
            InstallError::Connection { .. } => "connection",
            InstallError::FileSystem { .. } => "file_system",
            InstallError::Configuration { .. } => "configuration",
        }
    }

    /// Get user-friendly suggestion for resolving the error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            InstallError::Validation(_) => Some("Fix the manifest and run the install again"),
            InstallError::ManifestParse { .. } => Some("Check that the manifest is valid JSON"),
            InstallError::Connection { .. } => {
                Some("Check your internet connection or pass --timeout to bound slow hosts")
            }
            InstallError::Configuration { suggestion, .. } => suggestion.as_deref(),
            InstallError::FileSystem { .. } => None,
        }
    }

    /// Create a detailed error report for the CLI
    pub fn detailed_report(&self) -> String {
        let mut report = format!("Error: {}\n", self);
        report.push_str(&format!("Category: {}\n", self.category()));

        if let Some(suggestion) = self.suggestion() {
            report.push_str(&format!("Suggestion: {}\n", suggestion));
        }

        if let Some(source) = self.source() {
            report.push_str(&format!("Root cause: {}\n", source));
        }

        report
    }
}
