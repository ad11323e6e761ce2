//! # Document Fetching
//!
//! Retrieves a manifest document from a URL and validates it.
//!
//! ## Transports
//!
//! - `http://` and `https://` go through `ureq`; redirects are followed.
//! - `file://` reads from the local filesystem, which is handy for offline
//!   use and for tests.
//!
//! ## Authentication
//!
//! An authenticated fetch reads a bearer token from an environment variable
//! (`GITHUB_ACCESS_TOKEN` by default) when the request is made. A missing or
//! empty token fails the fetch immediately with [`Error::Auth`]; nothing is
//! sent.
//!
//! ## Failure
//!
//! Every call is a single attempt. Any transport failure, non-2xx status,
//! non-UTF-8 body or invalid document is returned as [`Error::Fetch`] with
//! the cause attached. There is no cache and no retry.

use std::io::Read;
use std::time::Duration;
use url::Url;

use crate::defaults;
use crate::error::{Error, Result};
use crate::manifest::ManifestDocument;

/// Accept header that makes GitHub's contents API return the raw file.
pub const GITHUB_RAW_ACCEPT: &str = "application/vnd.github.raw+json";

/// Upper bound on a document body.
const MAX_BODY_BYTES: u64 = 16 * 1024 * 1024;

/// Trait for document retrieval - allows mocking in tests
pub trait DocumentFetcher {
    /// Fetch and validate the document at `url`.
    fn fetch(&self, url: &str, authenticated: bool) -> Result<ManifestDocument>;
}

/// Fetches documents over HTTP(S) or from `file://` URLs.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
    token_env: String,
}

impl HttpFetcher {
    /// Create a fetcher that reads its bearer token from `token_env`.
    pub fn new(token_env: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(15))
            .timeout_read(Duration::from_secs(60))
            .redirects(5)
            .user_agent(concat!("west-curate/", env!("CARGO_PKG_VERSION")))
            .build();

        Self {
            agent,
            token_env: token_env.into(),
        }
    }

    /// Read the bearer token from the environment.
    pub fn bearer_token(&self) -> Result<String> {
        match std::env::var(&self.token_env) {
            Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(Error::Auth {
                message: format!("{} environment variable is not set", self.token_env),
                hint: Some(format!(
                    "export {}=<personal access token with read access>",
                    self.token_env
                )),
            }),
        }
    }

    fn fetch_text(&self, url: &str, authenticated: bool) -> Result<String> {
        let token = if authenticated {
            Some(self.bearer_token()?)
        } else {
            None
        };

        let parsed = Url::parse(url)?;
        let body = match parsed.scheme() {
            "file" => read_file_url(&parsed)?,
            "http" | "https" => self.get(url, token.as_deref())?,
            other => {
                return Err(Error::Transport {
                    url: url.to_string(),
                    message: format!("unsupported URL scheme '{}'", other),
                })
            }
        };

        String::from_utf8(body).map_err(|e| Error::Parse {
            message: format!("response body is not valid UTF-8: {}", e),
        })
    }

    fn get(&self, url: &str, token: Option<&str>) -> Result<Vec<u8>> {
        let mut request = self.agent.get(url);
        if let Some(token) = token {
            request = request
                .set("Authorization", &format!("Bearer {}", token))
                .set("Accept", GITHUB_RAW_ACCEPT);
        }

        let response = request.call().map_err(|err| match err {
            ureq::Error::Status(code, response) => Error::Transport {
                url: url.to_string(),
                message: format!("HTTP {} {}", code, response.status_text()),
            },
            ureq::Error::Transport(transport) => Error::Transport {
                url: url.to_string(),
                message: transport.to_string(),
            },
        })?;

        if !(200..300).contains(&response.status()) {
            return Err(Error::Transport {
                url: url.to_string(),
                message: format!("HTTP {} {}", response.status(), response.status_text()),
            });
        }

        read_capped(response.into_reader(), url)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(defaults::TOKEN_ENV)
    }
}

impl DocumentFetcher for HttpFetcher {
    fn fetch(&self, url: &str, authenticated: bool) -> Result<ManifestDocument> {
        log::info!(
            "Fetching {}{}",
            url,
            if authenticated { " (authenticated)" } else { "" }
        );
        self.fetch_text(url, authenticated)
            .and_then(|text| ManifestDocument::parse(&text))
            .map_err(|err| err.into_fetch(url))
    }
}

/// Read a whole body, failing instead of truncating past `MAX_BODY_BYTES`.
fn read_capped(reader: impl Read, url: &str) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    reader
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut body)
        .map_err(|e| Error::Transport {
            url: url.to_string(),
            message: format!("failed to read response body: {}", e),
        })?;

    if body.len() as u64 > MAX_BODY_BYTES {
        return Err(Error::Transport {
            url: url.to_string(),
            message: format!("response body exceeds {} MiB", MAX_BODY_BYTES / (1024 * 1024)),
        });
    }
    Ok(body)
}

fn read_file_url(url: &Url) -> Result<Vec<u8>> {
    let path = url.to_file_path().map_err(|_| Error::Transport {
        url: url.to_string(),
        message: "not a local file path".to_string(),
    })?;
    std::fs::read(&path).map_err(|e| Error::Transport {
        url: url.to_string(),
        message: e.to_string(),
    })
}
