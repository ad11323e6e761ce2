//! Shared test utilities for integration and E2E tests.
//!
//! This module provides manifest fixtures and a temporary workspace that
//! serves them through `file://` URLs, so the whole fetch/merge/write path
//! runs without network access.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_upstreams();
//!     fixture.command().args(["render", "--all", "--stdout"]).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::env;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    #[allow(unused_imports)]
    pub use super::should_skip_network_tests;
    pub use super::TestFixture;
}

/// Upstream manifest documents used across tests.
#[allow(dead_code)]
pub mod manifests {
    /// Primary document at `main`.
    pub const PRIMARY_MAIN: &str = r#"
manifest:
  defaults:
    remote: upstream
  remotes:
    - name: upstream
      url-base: https://github.com/zephyrproject-rtos
  group-filter: [-babblesim]
  projects:
    - name: cmsis
      revision: 4b96cbb174678dcd3ca86e11e1f24bc5f8726da0
      path: modules/hal/cmsis
      groups:
        - hal
    - name: mcuboot
      revision: 7c4c4d4d5f6b8d9a
      path: bootloader/mcuboot
    - name: hal_nordic
      revision: ab5cb2e2faeb1edfad7a25286dcb513929ae55da
      path: modules/hal/nordic
      groups:
        - hal
  self:
    path: zephyr
    west-commands: scripts/west-commands.yml
"#;

    /// Primary document at `v3.1.0`.
    pub const PRIMARY_V3_1_0: &str = r#"
manifest:
  defaults:
    remote: upstream
  remotes:
    - name: upstream
      url-base: https://github.com/zephyrproject-rtos
  projects:
    - name: cmsis
      revision: 093de61c2a7d12dc9253daf8692f61f793a9254a
      path: modules/hal/cmsis
    - name: mbedtls
      revision: 7fed49c9b9f983ad6416986661ef637459723bcb
      path: modules/crypto/mbedtls
"#;

    /// Vendor overlay.
    pub const OVERLAY: &str = r#"
manifest:
  remotes:
    - name: vendor
      url-base: https://github.com/FlukeCorp-emu
  projects:
    - name: fluke-hal
      remote: vendor
      revision: main
      path: modules/hal/fluke
"#;

    /// Primary document with projects A and B.
    pub const PRIMARY_AB: &str = r#"
manifest:
  defaults:
    remote: upstream
  remotes:
    - name: upstream
      url-base: https://example.com/upstream
  projects:
    - name: A
      path: a
    - name: B
      path: b
"#;

    /// Overlay with project C.
    pub const OVERLAY_C: &str = r#"
manifest:
  projects:
    - name: C
      path: c
"#;
}

/// Check if network tests should be skipped.
///
/// Returns `true` if the `SKIP_NETWORK_TESTS` environment variable is set.
#[allow(dead_code)]
pub fn should_skip_network_tests() -> bool {
    env::var("SKIP_NETWORK_TESTS").is_ok()
}

/// `file://` URL for `path`.
#[allow(dead_code)]
pub fn file_url(path: &Path) -> String {
    url::Url::from_file_path(path)
        .expect("absolute path")
        .to_string()
}

/// A temporary workspace holding upstream documents and a settings file.
///
/// Layout after [`TestFixture::with_upstreams`]:
///
/// ```text
/// primary/main/west.yml
/// primary/v3.1.0/west.yml
/// overlay/west.yml
/// west-curate.yaml        (points at the files above)
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write the primary documents, the overlay and a matching settings file.
    pub fn with_upstreams(self) -> Self {
        self.with_primary("main", manifests::PRIMARY_MAIN)
            .with_primary("v3.1.0", manifests::PRIMARY_V3_1_0)
            .with_file("overlay/west.yml", manifests::OVERLAY)
            .with_settings()
    }

    /// Write a primary document for `tag`.
    pub fn with_primary(self, tag: &str, content: &str) -> Self {
        self.with_file(&format!("primary/{}/west.yml", tag), content)
    }

    /// Write `west-curate.yaml` pointing at this fixture's documents.
    pub fn with_settings(self) -> Self {
        let settings = format!(
            "tag-repository: {}\nprimary-url: {}\noverlay-url: {}\noverlay-authenticated: false\noutput: {}\n",
            self.path().join("no-such-repository").display(),
            self.primary_url(),
            self.overlay_url(),
            self.output_path().display(),
        );
        self.with_file("west-curate.yaml", &settings)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Primary URL template with its `{}` placeholder.
    pub fn primary_url(&self) -> String {
        let marker = self.path().join("primary").join("TAG").join("west.yml");
        file_url(&marker).replace("/TAG/", "/{}/")
    }

    pub fn overlay_url(&self) -> String {
        file_url(&self.path().join("overlay").join("west.yml"))
    }

    /// Where the curated manifest is written.
    pub fn output_path(&self) -> PathBuf {
        self.path().join("manifest").join("west.yml")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.path().join("west-curate.yaml")
    }

    /// Read the curated manifest.
    pub fn read_output(&self) -> String {
        std::fs::read_to_string(self.output_path()).expect("Failed to read output")
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("west-curate");
        cmd.current_dir(self.path())
            .env_remove("WEST_CURATE_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_writes_upstreams() {
        let fixture = TestFixture::new().with_upstreams();
        assert!(fixture.path().join("primary/main/west.yml").exists());
        assert!(fixture.path().join("primary/v3.1.0/west.yml").exists());
        assert!(fixture.path().join("overlay/west.yml").exists());
        assert!(fixture.settings_path().exists());
    }

    #[test]
    fn test_primary_url_has_one_placeholder() {
        let fixture = TestFixture::new();
        let url = fixture.primary_url();
        assert_eq!(url.matches("{}").count(), 1);
        assert!(url.starts_with("file://"));
    }

    #[test]
    fn test_manifests_are_valid_yaml() {
        for text in [
            manifests::PRIMARY_MAIN,
            manifests::PRIMARY_V3_1_0,
            manifests::OVERLAY,
            manifests::PRIMARY_AB,
            manifests::OVERLAY_C,
        ] {
            let parsed: Result<serde_yaml::Value, _> = serde_yaml::from_str(text);
            assert!(parsed.is_ok(), "fixture should be valid YAML");
        }
    }
}
