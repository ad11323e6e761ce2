//! Property-based tests for merging, tag ordering and cursor movement.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::manifest::{ManifestDocument, MergedManifest};
    use crate::merge::merge_manifests;
    use crate::merge::yaml::{deep_merge, deep_merge_mappings};
    use crate::selection::{Page, SelectionStore};
    use crate::version::{compliant_tags, with_main, Tag};
    use proptest::prelude::*;
    use serde_yaml::{Mapping, Value};

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| Value::Number(n.into())),
            "[a-z0-9 ]{0,8}".prop_map(Value::String),
        ]
    }

    /// Arbitrary nested YAML with a small key space so keys collide.
    fn yaml_value() -> impl Strategy<Value = Value> {
        scalar().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
                prop::collection::vec(("[a-e]", inner), 0..4).prop_map(|entries| {
                    Value::Mapping(
                        entries
                            .into_iter()
                            .map(|(k, v)| (Value::String(k), v))
                            .collect(),
                    )
                }),
            ]
        })
    }

    fn yaml_mapping() -> impl Strategy<Value = Mapping> {
        prop::collection::vec(("[a-e]", yaml_value()), 0..5).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(k, v)| (Value::String(k), v))
                .collect()
        })
    }

    fn project(name: String) -> Value {
        let mut fields = Mapping::new();
        fields.insert("name".into(), Value::String(name.clone()));
        fields.insert("path".into(), Value::String(format!("modules/{}", name)));
        Value::Mapping(fields)
    }

    /// Manifest documents sharing one shape: sequences stay sequences and
    /// `defaults` stays a mapping of strings.
    fn manifest_document() -> impl Strategy<Value = ManifestDocument> {
        (
            prop::collection::vec("[a-z]{1,6}", 0..5),
            prop::collection::vec("[a-z]{1,6}", 0..3),
            prop::collection::vec(("(remote|revision|path-prefix)", "[a-z0-9.]{1,6}"), 0..3),
        )
            .prop_map(|(projects, remotes, defaults)| {
                let mut manifest = Mapping::new();
                let defaults: Mapping = defaults
                    .into_iter()
                    .map(|(k, v)| (Value::String(k), Value::String(v)))
                    .collect();
                manifest.insert("defaults".into(), Value::Mapping(defaults));
                manifest.insert(
                    "remotes".into(),
                    Value::Sequence(
                        remotes
                            .into_iter()
                            .map(|name| {
                                let mut remote = Mapping::new();
                                remote.insert("name".into(), Value::String(name));
                                Value::Mapping(remote)
                            })
                            .collect(),
                    ),
                );
                manifest.insert(
                    "projects".into(),
                    Value::Sequence(projects.into_iter().map(project).collect()),
                );

                let mut root = Mapping::new();
                root.insert("manifest".into(), Value::Mapping(manifest));
                ManifestDocument::from_value(Value::Mapping(root))
                    .expect("generated documents are valid")
            })
    }

    fn as_document(manifest: &MergedManifest) -> ManifestDocument {
        let mut body = manifest.manifest().clone();
        body.insert(
            "projects".into(),
            Value::Sequence(
                manifest
                    .projects
                    .iter()
                    .map(|p| Value::Mapping(p.fields().clone()))
                    .collect(),
            ),
        );
        let mut root = Mapping::new();
        root.insert("manifest".into(), Value::Mapping(body));
        ManifestDocument::from_value(Value::Mapping(root)).expect("merged documents are valid")
    }

    fn names(manifest: &MergedManifest) -> Vec<String> {
        manifest.projects.iter().map(|p| p.name().to_string()).collect()
    }

    // ============================================================================
    // deep_merge property tests
    // ============================================================================

    proptest! {
        /// Property: merging an empty overlay returns the base unchanged
        #[test]
        fn empty_overlay_is_identity(base in yaml_mapping()) {
            let merged = deep_merge_mappings(&base, &Mapping::new());
            prop_assert_eq!(merged, base);
        }

        /// Property: merging onto an empty base returns the overlay unchanged
        #[test]
        fn empty_base_is_identity(overlay in yaml_mapping()) {
            let merged = deep_merge_mappings(&Mapping::new(), &overlay);
            prop_assert_eq!(merged, overlay);
        }

        /// Property: neither input is modified
        #[test]
        fn merge_is_pure(base in yaml_value(), overlay in yaml_value()) {
            let (base_before, overlay_before) = (base.clone(), overlay.clone());
            let first = deep_merge(&base, &overlay);
            let second = deep_merge(&base, &overlay);
            prop_assert_eq!(&base, &base_before);
            prop_assert_eq!(&overlay, &overlay_before);
            prop_assert_eq!(first, second);
        }

        /// Property: merged keys are the base's keys, then the overlay's new keys
        #[test]
        fn merge_key_order(base in yaml_mapping(), overlay in yaml_mapping()) {
            let merged = deep_merge_mappings(&base, &overlay);
            let expected: Vec<&Value> = base
                .keys()
                .chain(overlay.keys().filter(|k| !base.contains_key(*k)))
                .collect();
            let actual: Vec<&Value> = merged.keys().collect();
            prop_assert_eq!(actual, expected);
        }
    }

    // ============================================================================
    // merge_manifests property tests
    // ============================================================================

    proptest! {
        /// Property: projects are the overlay's followed by the primary's
        #[test]
        fn projects_concatenate_overlay_first(
            primary in manifest_document(),
            overlay in manifest_document(),
        ) {
            let merged = merge_manifests(&primary, &overlay);
            let expected: Vec<String> = MergedManifest::from_manifest(overlay.manifest().clone())
                .projects
                .iter()
                .chain(MergedManifest::from_manifest(primary.manifest().clone()).projects.iter())
                .map(|p| p.name().to_string())
                .collect();
            prop_assert_eq!(names(&merged), expected);
            prop_assert_eq!(merged.selected_count(), 0);
        }

        /// Property: merging is associative for documents of the same shape
        #[test]
        fn merge_is_associative(
            a in manifest_document(),
            b in manifest_document(),
            c in manifest_document(),
        ) {
            let left = merge_manifests(&as_document(&merge_manifests(&a, &b)), &c);
            let right = merge_manifests(&a, &as_document(&merge_manifests(&b, &c)));
            prop_assert_eq!(names(&left), names(&right));
            prop_assert_eq!(left.remotes(), right.remotes());
            prop_assert_eq!(left.defaults(), right.defaults());
        }
    }

    // ============================================================================
    // Tag ordering property tests
    // ============================================================================

    proptest! {
        /// Property: main is first, and the rest is strictly descending
        #[test]
        fn tags_start_with_main_and_descend(
            versions in prop::collection::vec((2u64..4, 0u64..40, 0u64..40), 0..12),
        ) {
            let refs: Vec<String> = versions
                .iter()
                .map(|(major, minor, patch)| format!("refs/tags/v{}.{}.{}", major, minor, patch))
                .collect();
            let tags = with_main(compliant_tags(&refs).unwrap());

            prop_assert_eq!(&tags[0], &Tag::main());
            let parsed: Vec<_> = tags[1..].iter().map(|t| t.version().unwrap()).collect();
            for pair in parsed.windows(2) {
                prop_assert!(pair[0] > pair[1]);
            }
        }
    }

    // ============================================================================
    // Selection property tests
    // ============================================================================

    proptest! {
        /// Property: the cursor stays in range for any sequence of moves
        #[test]
        fn cursor_stays_in_bounds(
            count in 0usize..20,
            moves in prop::collection::vec(-30isize..30, 0..40),
        ) {
            let projects = (0..count).map(|i| project(format!("p{}", i))).collect();
            let mut manifest = Mapping::new();
            manifest.insert("projects".into(), Value::Sequence(projects));
            let mut store =
                SelectionStore::new(Tag::main(), MergedManifest::from_manifest(manifest));

            for delta in moves {
                let cursor = store.move_cursor(delta);
                if count == 0 {
                    prop_assert_eq!(cursor, 0);
                } else {
                    prop_assert!(cursor < count);
                }
            }
        }

        /// Property: the page holding the cursor contains it and fits the viewport
        #[test]
        fn page_contains_cursor(cursor in 0usize..200, height in 1usize..50, total in 1usize..200) {
            let page = Page::locate(cursor, height, total);
            let clamped = cursor.min(total - 1);
            prop_assert!(page.rows.contains(&clamped));
            prop_assert!(page.rows.len() <= height);
            prop_assert!(page.index < page.count);
        }
    }
}
