//! # Settings
//!
//! Settings tell west-curate where its two upstream documents live, where the
//! curated manifest goes and what the synthetic self project looks like.
//!
//! ## Sources
//!
//! Settings are read from the first of these that exists:
//!
//! 1. The path given with `--config` (or `WEST_CURATE_CONFIG`).
//! 2. `west-curate.yaml` in the working directory.
//! 3. `config.yaml` under the per-user config directory.
//!
//! When none exists, the built-in defaults from [`crate::defaults`] are used.
//! Any key may be omitted from a file; omitted keys keep their default.
//!
//! ## Example
//!
//! ```yaml
//! primary-url: https://raw.githubusercontent.com/zephyrproject-rtos/zephyr/{}/west.yml
//! overlay-url: https://example.com/west.yml
//! overlay-authenticated: false
//! namespace: zephyr
//! self-project:
//!   name: zephyr
//!   path: zephyr/zephyr
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::defaults;
use crate::error::{Error, Result};
use crate::version::Tag;

/// Placeholder substituted with the active tag in `primary-url`.
pub const TAG_PLACEHOLDER: &str = "{}";

/// The fixed project describing the manifest's own tooling checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SelfProject {
    pub name: String,
    pub path: String,
    pub west_commands: Option<String>,
    pub clone_depth: Option<u32>,
}

impl Default for SelfProject {
    fn default() -> Self {
        Self {
            name: "zephyr".to_string(),
            path: "zephyr/zephyr".to_string(),
            west_commands: Some("scripts/west-commands.yml".to_string()),
            clone_depth: Some(1),
        }
    }
}

/// All user-tunable settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    /// Repository queried for selectable tags.
    pub tag_repository: String,
    /// Primary document URL template containing one `{}` placeholder.
    pub primary_url: String,
    /// Overlay document URL, fetched once per session.
    pub overlay_url: String,
    /// Whether the overlay fetch sends a bearer token.
    pub overlay_authenticated: bool,
    /// Environment variable holding the bearer token.
    pub token_env: String,
    /// Output file for the curated manifest.
    pub output: PathBuf,
    /// Path segment prefixed onto selected projects' paths.
    pub namespace: String,
    pub self_project: SelfProject,
    /// Tool offered after a save that changed the manifest.
    pub update_tool: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tag_repository: defaults::TAG_REPOSITORY.to_string(),
            primary_url: defaults::PRIMARY_URL.to_string(),
            overlay_url: defaults::OVERLAY_URL.to_string(),
            overlay_authenticated: true,
            token_env: defaults::TOKEN_ENV.to_string(),
            output: PathBuf::from(defaults::OUTPUT_PATH),
            namespace: defaults::NAMESPACE.to_string(),
            self_project: SelfProject::default(),
            update_tool: defaults::UPDATE_TOOL.to_string(),
        }
    }
}

impl Settings {
    /// Primary document URL for `tag`.
    pub fn primary_url_for(&self, tag: &Tag) -> String {
        self.primary_url.replacen(TAG_PLACEHOLDER, tag.as_str(), 1)
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let placeholders = self.primary_url.matches(TAG_PLACEHOLDER).count();
        if placeholders != 1 {
            return Err(Error::Config {
                message: format!(
                    "primary-url must contain exactly one '{}' placeholder, found {}",
                    TAG_PLACEHOLDER, placeholders
                ),
                hint: Some(
                    "Use e.g. https://raw.githubusercontent.com/org/repo/{}/west.yml".to_string(),
                ),
            });
        }

        if self.namespace.trim().is_empty() || self.namespace.contains('/') {
            return Err(Error::Config {
                message: format!("namespace '{}' must be a single path segment", self.namespace),
                hint: None,
            });
        }

        if self.token_env.trim().is_empty() {
            return Err(Error::Config {
                message: "token-env must name an environment variable".to_string(),
                hint: None,
            });
        }

        Ok(())
    }
}

/// Parse settings from YAML. Omitted keys keep their defaults.
pub fn parse(yaml_content: &str) -> Result<Settings> {
    // An empty or comment-only file deserializes to null.
    if serde_yaml::from_str::<serde_yaml::Value>(yaml_content)?.is_null() {
        return Ok(Settings::default());
    }

    let settings: Settings = serde_yaml::from_str(yaml_content).map_err(|e| Error::Config {
        message: e.to_string(),
        hint: Some("Keys are kebab-case, e.g. 'primary-url', 'overlay-url'".to_string()),
    })?;
    settings.validate()?;
    Ok(settings)
}

/// Read and parse a settings file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// Resolve settings from an explicit path or the default lookup chain.
///
/// An explicit path that does not exist is an error; missing default
/// locations are skipped.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config {
                message: format!("Settings file not found: {}", path.display()),
                hint: None,
            });
        }
        log::debug!("Loading settings from {}", path.display());
        return from_file(path);
    }

    let candidates = std::iter::once(PathBuf::from(defaults::SETTINGS_FILE))
        .chain(defaults::user_settings_path());

    for candidate in candidates {
        if candidate.is_file() {
            log::debug!("Loading settings from {}", candidate.display());
            return from_file(&candidate);
        }
    }

    log::debug!("No settings file found, using defaults");
    Ok(Settings::default())
}
