//! YAML deep merge
//!
//! This module merges two YAML values into a new one without touching either
//! input. It is the building block for [`super::merge_manifests`].
//!
//! ## Rules
//!
//! For each key of the two mappings:
//!
//! - Mapping in both: merged recursively with the same rules.
//! - Sequence in both: concatenated, overlay items first, then base items.
//!   Nothing is de-duplicated.
//! - Any other combination, including mismatched types: overlay wins.
//! - Present in only one input: copied through.
//!
//! Keys keep the base's order, followed by keys that only the overlay has,
//! in the overlay's order.
//!
//! ## Example
//!
//! ```
//! use west_curate::merge::yaml::deep_merge;
//! use serde_yaml::Value;
//!
//! let base: Value = serde_yaml::from_str("a: 1\nlist: [x]").unwrap();
//! let overlay: Value = serde_yaml::from_str("a: 2\nlist: [y]\nb: 3").unwrap();
//! let merged = deep_merge(&base, &overlay);
//!
//! let expected: Value = serde_yaml::from_str("a: 2\nlist: [y, x]\nb: 3").unwrap();
//! assert_eq!(merged, expected);
//! ```

use log::debug;
use serde_yaml::{Mapping, Value as YamlValue};

/// Merge `overlay` onto `base`, producing a new value.
pub fn deep_merge(base: &YamlValue, overlay: &YamlValue) -> YamlValue {
    merge_at(base, overlay, "")
}

/// Merge two mappings key by key, producing a new mapping.
pub fn deep_merge_mappings(base: &Mapping, overlay: &Mapping) -> Mapping {
    merge_mappings_at(base, overlay, "")
}

fn merge_at(base: &YamlValue, overlay: &YamlValue, path: &str) -> YamlValue {
    match (base, overlay) {
        (YamlValue::Mapping(base_map), YamlValue::Mapping(overlay_map)) => {
            YamlValue::Mapping(merge_mappings_at(base_map, overlay_map, path))
        }
        (YamlValue::Sequence(base_seq), YamlValue::Sequence(overlay_seq)) => {
            debug!(
                "Concatenating sequences at path '{}' ({} overlay + {} base items)",
                display_path(path),
                overlay_seq.len(),
                base_seq.len()
            );
            YamlValue::Sequence(overlay_seq.iter().chain(base_seq).cloned().collect())
        }
        _ => {
            if base != overlay {
                debug!(
                    "Overlay wins at path '{}': {} -> {}",
                    display_path(path),
                    get_yaml_type_name(base),
                    get_yaml_type_name(overlay)
                );
            }
            overlay.clone()
        }
    }
}

fn merge_mappings_at(base: &Mapping, overlay: &Mapping, path: &str) -> Mapping {
    let mut result = Mapping::new();

    for (key, base_value) in base {
        let value = match overlay.get(key) {
            Some(overlay_value) => merge_at(base_value, overlay_value, &child_path(path, key)),
            None => base_value.clone(),
        };
        result.insert(key.clone(), value);
    }

    for (key, overlay_value) in overlay {
        if !base.contains_key(key) {
            result.insert(key.clone(), overlay_value.clone());
        }
    }

    result
}

fn child_path(path: &str, key: &YamlValue) -> String {
    let key_str = match key {
        YamlValue::String(s) => s.clone(),
        _ => format!("{:?}", key),
    };
    if path.is_empty() {
        key_str
    } else {
        format!("{}.{}", path, key_str)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

/// Get a human-readable type name for a YAML value
///
/// Used for logging to describe the type of a value.
pub fn get_yaml_type_name(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "Null",
        YamlValue::Bool(_) => "Bool",
        YamlValue::Number(_) => "Number",
        YamlValue::String(_) => "String",
        YamlValue::Sequence(_) => "Sequence",
        YamlValue::Mapping(_) => "Mapping",
        YamlValue::Tagged(_) => "Tagged",
    }
}
