//! # west-curate
//!
//! Curates a [west](https://docs.zephyrproject.org/latest/develop/west/)
//! manifest from two upstream documents: the Zephyr manifest at a chosen
//! release tag (the *primary*) and a vendor manifest (the *overlay*). The
//! user picks which of the combined projects to keep and the result is
//! written as a single `west.yml`.
//!
//! ## Quick Example
//!
//! ```
//! use west_curate::config::SelfProject;
//! use west_curate::manifest::ManifestDocument;
//! use west_curate::merge::merge_manifests;
//! use west_curate::version::Tag;
//! use west_curate::writer::ManifestWriter;
//!
//! let primary = ManifestDocument::parse(
//!     "manifest:\n  projects:\n    - name: cmsis\n      path: modules/hal/cmsis\n",
//! ).unwrap();
//! let overlay = ManifestDocument::parse(
//!     "manifest:\n  projects:\n    - name: vendor-hal\n      path: modules/hal/vendor\n",
//! ).unwrap();
//!
//! let mut merged = merge_manifests(&primary, &overlay);
//! assert_eq!(merged.projects[0].name(), "vendor-hal");
//!
//! merged.projects[1].toggle();
//! let writer = ManifestWriter::new("west.yml", "zephyr", SelfProject::default());
//! let text = writer.render(&merged, &Tag::new("v3.6.0")).unwrap();
//! assert!(text.contains("path: zephyr/modules/hal/cmsis"));
//! assert!(text.contains("revision: v3.6.0"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Tag Discovery (`version`, `git`)**: lists the remote's release tags,
//!   keeps `v2.x.y`/`v3.x.y`, orders them newest first and puts `main` in
//!   front. Never fails; a listing error leaves only `main`.
//! - **Document Fetcher (`fetch`)**: retrieves and validates one manifest
//!   document, optionally with a bearer token.
//! - **Manifest Merger (`merge`)**: deep-merges the overlay onto the primary.
//! - **Selection Store (`selection`)**: selection flags, cursor and paging.
//! - **Manifest Writer (`writer`)**: canonical rendering and atomic writes.
//! - **Session (`session`)**: the mode machine the interactive screen drives.
//!
//! ## Execution Flow
//!
//! 1. Discover tags and make the first one (`main`) active.
//! 2. Fetch the primary document for the active tag and the overlay.
//! 3. Merge them into a fresh selection store.
//! 4. Toggle projects; changing the tag re-fetches the primary only and
//!    starts over with nothing selected.
//! 5. Save the selection to the output file.

pub mod config;
pub mod defaults;
pub mod error;
pub mod fetch;
pub mod git;
pub mod manifest;
pub mod merge;
pub mod output;
pub mod progress;
pub mod selection;
pub mod session;
pub mod signal;
pub mod tool;
pub mod version;
pub mod writer;

#[cfg(test)]
mod merge_proptest;
