//! Default values for west-curate settings.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication. Every value here can be
//! overridden by a settings file or a CLI flag.

use std::path::PathBuf;

/// Repository whose tags gate which primary manifest revision is fetched.
pub const TAG_REPOSITORY: &str = "https://github.com/zephyrproject-rtos/zephyr.git";

/// Primary manifest location. `{}` is replaced by the active tag.
pub const PRIMARY_URL: &str =
    "https://raw.githubusercontent.com/zephyrproject-rtos/zephyr/{}/west.yml";

/// Overlay manifest location. Fetched once per session.
pub const OVERLAY_URL: &str =
    "https://raw.githubusercontent.com/FlukeCorp-emu/zephyr-module-manifest/refs/heads/main/west.yml";

/// Environment variable holding the bearer token for authenticated fetches.
pub const TOKEN_ENV: &str = "GITHUB_ACCESS_TOKEN";

/// Where the curated manifest is written, relative to the working directory.
pub const OUTPUT_PATH: &str = "../../manifest/west.yml";

/// Path segment prefixed onto every selected project's `path`.
pub const NAMESPACE: &str = "zephyr";

/// Companion tool offered after a save that changed the manifest.
pub const UPDATE_TOOL: &str = "west";

/// The tag that is always offered, first, regardless of the remote.
pub const MAIN_TAG: &str = "main";

/// File name looked up in the working directory when no `--config` is given.
pub const SETTINGS_FILE: &str = "west-curate.yaml";

/// Returns the per-user settings file location.
///
/// Uses the platform-appropriate config directory:
/// - Linux: `~/.config/west-curate/config.yaml`
/// - macOS: `~/Library/Application Support/west-curate/config.yaml`
/// - Windows: `{FOLDERID_RoamingAppData}\west-curate\config.yaml`
///
/// Returns `None` if the platform config directory cannot be determined.
pub fn user_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("west-curate").join("config.yaml"))
}
