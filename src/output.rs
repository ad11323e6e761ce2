//! # Output Configuration
//!
//! Colour and symbol choices for everything west-curate prints outside the
//! full-screen project view.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` on the command line
//! - `NO_COLOR` disables colours when set (per https://no-color.org/)
//! - `CLICOLOR=0` disables colours
//! - `CLICOLOR_FORCE=1` forces colours even when stdout is not a TTY
//! - `TERM=dumb` disables colours
//!
//! The decision is also pushed into `console`, so `dialoguer` prompts and
//! `console::style` follow the same setting.

use console::{style, StyledObject};
use std::env;

/// Output configuration for controlling colours and symbols.
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Resolve the `--color` flag against the environment.
    ///
    /// `always` and `never` win outright; anything else falls back to
    /// detection.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence alone disables colours, even when empty
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Make `console` (and through it `dialoguer`) follow this setting.
    pub fn apply(&self) {
        console::set_colors_enabled(self.use_color);
        console::set_colors_enabled_stderr(self.use_color);
    }

    /// Prefix for a successful step.
    pub fn ok(&self) -> &'static str {
        emoji(self, "✅", "[OK]")
    }

    /// Prefix for a warning.
    pub fn warn(&self) -> &'static str {
        emoji(self, "⚠️ ", "[WARN]")
    }

    /// Prefix for a hint the user should act on.
    pub fn hint(&self) -> &'static str {
        emoji(self, "💡", "[HINT]")
    }

    /// Style a tag name for display.
    pub fn tag<'a>(&self, tag: &'a str) -> StyledObject<&'a str> {
        style(tag).cyan().bold().force_styling(self.use_color)
    }

    /// Style a path for display.
    pub fn path<'a>(&self, path: &'a str) -> StyledObject<&'a str> {
        style(path).green().force_styling(self.use_color)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Pick the emoji when colours are on, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_color_flags_override_environment() {
        assert!(OutputConfig::from_env_and_flag("always").use_color);
        assert!(OutputConfig::from_env_and_flag("ALWAYS").use_color);
        assert!(!OutputConfig::from_env_and_flag("never").use_color);
    }

    #[test]
    #[serial]
    fn test_no_color_disables_auto() {
        env::set_var("NO_COLOR", "");
        let config = OutputConfig::from_env_and_flag("auto");
        env::remove_var("NO_COLOR");
        assert!(!config.use_color);
    }

    #[test]
    #[serial]
    fn test_clicolor_zero_disables_auto() {
        env::remove_var("NO_COLOR");
        env::set_var("CLICOLOR", "0");
        let config = OutputConfig::from_env_and_flag("auto");
        env::remove_var("CLICOLOR");
        assert!(!config.use_color);
    }

    #[test]
    fn test_prefixes_follow_color_setting() {
        let plain = OutputConfig { use_color: false };
        assert_eq!(plain.ok(), "[OK]");
        assert_eq!(plain.warn(), "[WARN]");
        assert_eq!(plain.hint(), "[HINT]");

        let fancy = OutputConfig { use_color: true };
        assert_eq!(fancy.ok(), "✅");
    }

    #[test]
    fn test_styling_is_plain_without_color() {
        let plain = OutputConfig { use_color: false };
        assert_eq!(plain.tag("v3.6.0").to_string(), "v3.6.0");
        assert_eq!(plain.path("west.yml").to_string(), "west.yml");
    }

    #[test]
    fn test_styling_adds_escapes_with_color() {
        let fancy = OutputConfig { use_color: true };
        assert!(fancy.tag("v3.6.0").to_string().contains("\u{1b}["));
    }
}
