//! Manifest merging
//!
//! Combines the primary document (fetched per tag) with the overlay document
//! (fetched once) into a single [`MergedManifest`].
//!
//! The merge starts at each document's `manifest` mapping and follows the
//! rules in [`yaml`]. In particular the overlay's projects come first, then
//! the primary's, and a project present in both appears twice.

pub mod yaml;

use crate::manifest::{ManifestDocument, MergedManifest};

/// Merge `overlay` onto `primary`.
///
/// Pure: neither document is modified, and the result depends only on the
/// two inputs.
pub fn merge_manifests(primary: &ManifestDocument, overlay: &ManifestDocument) -> MergedManifest {
    let merged = yaml::deep_merge_mappings(primary.manifest(), overlay.manifest());
    let result = MergedManifest::from_manifest(merged);
    log::debug!(
        "Merged {} primary + {} overlay projects into {}",
        primary.project_count(),
        overlay.project_count(),
        result.projects.len()
    );
    result
}
