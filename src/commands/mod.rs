//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `west-curate` command-line tool. Each subcommand is defined in its own
//! file.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic, calling into the `west_curate` library.
//!
//! Commands that talk to the upstream sources share [`SourceArgs`], which
//! loads the settings file and applies per-invocation overrides.

pub mod completions;
pub mod menu;
pub mod render;
pub mod screen;
pub mod tags;

use anyhow::Result;
use clap::Args;
use std::io::IsTerminal;
use std::path::PathBuf;

use west_curate::config::{self, Settings};

/// Where to read documents from and where to write the result.
#[derive(Args, Debug, Default, Clone)]
pub struct SourceArgs {
    /// Settings file to load instead of the default locations.
    #[arg(long, value_name = "FILE", env = "WEST_CURATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Repository whose tags can be selected.
    #[arg(long, value_name = "URL")]
    pub repository: Option<String>,

    /// Primary manifest URL template; `{}` is replaced by the tag.
    #[arg(long, value_name = "URL")]
    pub primary_url: Option<String>,

    /// Overlay manifest URL.
    #[arg(long, value_name = "URL")]
    pub overlay_url: Option<String>,

    /// Fetch the overlay without a bearer token.
    #[arg(long)]
    pub public_overlay: bool,

    /// Where to write the curated manifest.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl SourceArgs {
    /// Load settings, apply command-line overrides and validate the result.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = config::load(self.config.as_deref())?;

        if let Some(repository) = &self.repository {
            settings.tag_repository = repository.clone();
        }
        if let Some(url) = &self.primary_url {
            settings.primary_url = url.clone();
        }
        if let Some(url) = &self.overlay_url {
            settings.overlay_url = url.clone();
        }
        if self.public_overlay {
            settings.overlay_authenticated = false;
        }
        if let Some(output) = &self.output {
            settings.output = output.clone();
        }

        settings.validate()?;
        log::debug!("Effective settings: {:?}", settings);
        Ok(settings)
    }
}

/// Whether spinners should be drawn.
pub fn spinners_visible() -> bool {
    std::io::stderr().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_overrides_apply_on_top_of_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("settings.yaml");
        let content = "namespace: vendor\noverlay-url: https://example.com/a.yml\n";
        std::fs::write(&file, content).unwrap();

        let args = SourceArgs {
            config: Some(file),
            overlay_url: Some("https://example.com/b.yml".to_string()),
            public_overlay: true,
            output: Some(PathBuf::from("out/west.yml")),
            ..SourceArgs::default()
        };
        let settings = args.settings().unwrap();

        assert_eq!(settings.namespace, "vendor");
        assert_eq!(settings.overlay_url, "https://example.com/b.yml");
        assert!(!settings.overlay_authenticated);
        assert_eq!(settings.output, PathBuf::from("out/west.yml"));
    }

    #[test]
    #[serial]
    fn test_invalid_override_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("settings.yaml");
        std::fs::write(&file, "").unwrap();

        let args = SourceArgs {
            config: Some(file),
            primary_url: Some("https://example.com/west.yml".to_string()),
            ..SourceArgs::default()
        };
        let err = args.settings().unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }
}
