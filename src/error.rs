//! # Error Handling
//!
//! This module defines the centralized error type for `west-curate`. It uses
//! `thiserror` to describe every anticipated failure mode with a clear,
//! user-facing message.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failures the library can report.
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! The variants follow four broad kinds:
//!
//! - **Transport**: the network or a subprocess could not be reached.
//! - **Auth**: a credential required for an authenticated fetch is missing.
//! - **Parse**: a document or tag listing could not be decoded.
//! - **Config**: a settings file or manifest document lacks required keys.
//!
//! A failed document fetch is reported as `Error::Fetch`, which keeps the
//! underlying cause available through `std::error::Error::source`.

use thiserror::Error;

/// Main error type for west-curate operations
#[derive(Error, Debug)]
pub enum Error {
    /// The remote end could not be reached or answered with a failure status.
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// A credential needed for an authenticated request is missing or unusable.
    #[error("Authentication error: {message}{}", hint_suffix(hint))]
    Auth {
        message: String,
        /// Optional hint for how to provide the credential
        hint: Option<String>,
    },

    /// A structured document or listing could not be decoded.
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// A settings file or manifest document is missing required keys or has
    /// invalid values.
    #[error("Configuration error: {message}{}", hint_suffix(hint))]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// Fetching a manifest document failed. `source` carries the cause.
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        source: Box<Error>,
    },

    /// An error occurred while executing a Git command.
    #[error("Git command failed for {url}: {command} - {stderr}")]
    GitCommand {
        command: String,
        url: String,
        stderr: String,
    },

    /// The companion update tool could not be located or started.
    #[error("Tool error: {tool} - {message}")]
    Tool { tool: String, message: String },

    /// Writing the manifest to disk failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An operation was requested in a session mode that does not allow it.
    #[error("Invalid session state: {message}")]
    State { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Wrap `self` as the cause of a failed fetch of `url`.
    pub fn into_fetch(self, url: &str) -> Error {
        Error::Fetch {
            url: url.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through `Fetch` wrappers.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Fetch { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

fn hint_suffix(hint: &Option<String>) -> String {
    hint.as_ref()
        .map(|h| format!("\n  hint: {}", h))
        .unwrap_or_default()
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display_transport() {
        let error = Error::Transport {
            url: "https://example.com/west.yml".to_string(),
            message: "HTTP 404".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Transport error"));
        assert!(display.contains("https://example.com/west.yml"));
        assert!(display.contains("HTTP 404"));
    }

    #[test]
    fn test_error_display_auth_with_hint() {
        let error = Error::Auth {
            message: "GITHUB_ACCESS_TOKEN is not set".to_string(),
            hint: Some("export GITHUB_ACCESS_TOKEN=<token>".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Authentication error"));
        assert!(display.contains("hint:"));
        assert!(display.contains("export GITHUB_ACCESS_TOKEN"));
    }

    #[test]
    fn test_error_display_config_without_hint() {
        let error = Error::Config {
            message: "missing 'manifest' key".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration error"));
        assert!(!display.contains("hint:"));
    }

    #[test]
    fn test_fetch_error_keeps_cause() {
        let error = Error::Parse {
            message: "not UTF-8".to_string(),
        }
        .into_fetch("https://example.com/west.yml");

        let display = format!("{}", error);
        assert!(display.contains("Failed to fetch https://example.com/west.yml"));
        assert!(display.contains("not UTF-8"));

        let source = error.source().expect("fetch error should expose its cause");
        assert!(source.to_string().contains("Parse error"));
        assert!(matches!(error.root_cause(), Error::Parse { .. }));
    }

    #[test]
    fn test_error_display_git_command() {
        let error = Error::GitCommand {
            command: "ls-remote --tags".to_string(),
            url: "https://github.com/test/repo.git".to_string(),
            stderr: "Repository not found".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Git command failed"));
        assert!(display.contains("ls-remote"));
        assert!(display.contains("Repository not found"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_error =
            serde_yaml::from_str::<serde_yaml::Value>("invalid: [unclosed").unwrap_err();
        let error: Error = yaml_error.into();
        assert!(format!("{}", error).contains("YAML parsing error"));
    }
}
