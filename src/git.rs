//! Remote ref listing.
//!
//! Only one git operation is needed: listing the tags of a remote repository.
//! It goes through the [`RefLister`] trait so tag discovery can be tested
//! without network access.

use std::process::Command;

use crate::error::{Error, Result};

/// Trait for remote ref listing - allows mocking in tests
pub trait RefLister {
    /// Returns the full ref names (e.g. `refs/tags/v3.1.0`) of all tags on
    /// the remote at `url`.
    fn list_tag_refs(&self, url: &str) -> Result<Vec<String>>;
}

/// Lists refs with the system `git` command.
///
/// This automatically picks up whatever authentication the user configured
/// for git itself (SSH keys, credential helpers, `~/.gitconfig`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemGit;

impl RefLister for SystemGit {
    fn list_tag_refs(&self, url: &str) -> Result<Vec<String>> {
        list_tag_refs(url)
    }
}

/// List all tag refs from a remote repository
pub fn list_tag_refs(url: &str) -> Result<Vec<String>> {
    log::debug!("git ls-remote --tags {}", url);
    let output = Command::new("git")
        .args(["ls-remote", "--tags", url])
        .output()
        .map_err(|e| Error::GitCommand {
            command: "ls-remote --tags".to_string(),
            url: url.to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::GitCommand {
            command: "ls-remote --tags".to_string(),
            url: url.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    let stdout = String::from_utf8(output.stdout).map_err(|_| Error::Parse {
        message: format!("git ls-remote output for {} is not valid UTF-8", url),
    })?;

    Ok(parse_ls_remote(&stdout))
}

/// Extract ref names from `git ls-remote` output.
///
/// Each line has the form `<hash>\t<ref>`. Lines that do not match are
/// skipped.
pub fn parse_ls_remote(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let (hash, ref_name) = line.split_once('\t')?;
            if hash.is_empty() || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            Some(ref_name.trim().to_string())
        })
        .collect()
}
