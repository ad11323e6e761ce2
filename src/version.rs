//! # Tag Discovery
//!
//! This module decides which version tags the operator may pick from.
//!
//! ## Process
//!
//! 1.  **Ref Listing**: The remote repository is asked for its tag refs
//!     through a [`RefLister`].
//!
//! 2.  **Filtering**: Only refs of the exact form `refs/tags/vMAJOR.MINOR.PATCH`
//!     with a major version of 2 or 3 are kept. Peeled refs (`^{}`) and
//!     pre-release suffixes never match.
//!
//! 3.  **Ordering**: Matches are sorted newest first by numeric semantic
//!     version, so `v2.10.0` sorts above `v2.9.0`.
//!
//! 4.  **`main`**: A synthetic `main` tag is always placed first.
//!
//! Discovery never fails. When the listing cannot be obtained the result
//! degrades to `["main"]` and carries the error as a warning for the caller
//! to display.

use regex::Regex;
use semver::Version;
use std::fmt;

use crate::defaults::MAIN_TAG;
use crate::error::{Error, Result};
use crate::git::RefLister;

/// Pattern a tag ref must match to be offered.
pub const COMPLIANT_TAG_PATTERN: &str = r"^refs/tags/(v[23]\.\d+\.\d+)$";

/// A selectable version label: `main` or `vMAJOR.MINOR.PATCH`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String);

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The always-available `main` tag.
    pub fn main() -> Self {
        Self(MAIN_TAG.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_main(&self) -> bool {
        self.0 == MAIN_TAG
    }

    /// Numeric `MAJOR.MINOR.PATCH` of the tag, if it has one.
    ///
    /// Components are compared as numbers, so `v3.01.0` reads as `3.1.0`
    /// even though it is not a valid semver string.
    pub fn version(&self) -> Option<Version> {
        let mut parts = self.0.strip_prefix('v')?.split('.');
        let mut next = || -> Option<u64> {
            let part = parts.next()?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            part.parse().ok()
        };
        let (major, minor, patch) = (next()?, next()?, next()?);
        if parts.next().is_some() {
            return None;
        }
        Some(Version::new(major, minor, patch))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Tag::new(name)
    }
}

/// The outcome of tag discovery.
#[derive(Debug)]
pub struct TagDiscovery {
    /// Selectable tags; `main` is always first.
    pub tags: Vec<Tag>,
    /// Set when the listing failed and `tags` degraded to `["main"]`.
    pub warning: Option<Error>,
}

impl TagDiscovery {
    pub fn is_degraded(&self) -> bool {
        self.warning.is_some()
    }
}

/// Filter tag refs down to compliant tags, newest first.
///
/// Tags naming the same version (`v3.01.0`, `v3.1.0`) are all kept, ordered
/// by name.
pub fn compliant_tags(refs: &[String]) -> Result<Vec<Tag>> {
    let pattern = Regex::new(COMPLIANT_TAG_PATTERN)?;

    let mut versioned: Vec<(Version, Tag)> = refs
        .iter()
        .filter_map(|ref_name| {
            let name = pattern.captures(ref_name.trim())?.get(1)?.as_str();
            let tag = Tag::new(name);
            tag.version().map(|version| (version, tag))
        })
        .collect();

    versioned.sort_by(|(va, ta), (vb, tb)| vb.cmp(va).then_with(|| ta.cmp(tb)));
    versioned.dedup_by(|(_, a), (_, b)| a == b);

    Ok(versioned.into_iter().map(|(_, tag)| tag).collect())
}

/// Prepend `main` to a list of compliant tags.
pub fn with_main(tags: Vec<Tag>) -> Vec<Tag> {
    std::iter::once(Tag::main())
        .chain(tags.into_iter().filter(|tag| !tag.is_main()))
        .collect()
}

/// List, filter and order the tags of `repo_url`.
///
/// Never fails: on any listing or parsing error the result is `["main"]`
/// with the error attached as a warning.
pub fn discover_tags(lister: &dyn RefLister, repo_url: &str) -> TagDiscovery {
    let listed = lister
        .list_tag_refs(repo_url)
        .and_then(|refs| compliant_tags(&refs));

    match listed {
        Ok(tags) => {
            log::info!("Found {} compliant tags at {}", tags.len(), repo_url);
            TagDiscovery {
                tags: with_main(tags),
                warning: None,
            }
        }
        Err(err) => {
            log::warn!("Tag discovery for {} failed, offering only main: {}", repo_url, err);
            TagDiscovery {
                tags: vec![Tag::main()],
                warning: Some(err),
            }
        }
    }
}
