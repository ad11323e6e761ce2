//! # Selection Store
//!
//! Holds the merged manifest for the active tag together with a cursor, and
//! exposes the operations the interaction loop needs: toggling, moving and
//! paging. A store is built fresh for every tag; it never survives a tag
//! change, so selections made at one tag are not carried to another.
//!
//! Pagination is not stored. [`SelectionStore::page`] derives the visible
//! window from the cursor and the viewport height on every call.

use std::ops::Range;

use crate::manifest::{MergedManifest, Project};
use crate::version::Tag;

/// Selection state for one tag.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    active_tag: Tag,
    manifest: MergedManifest,
    cursor: usize,
}

impl SelectionStore {
    /// A fresh store with the cursor at 0.
    pub fn new(active_tag: Tag, manifest: MergedManifest) -> Self {
        Self {
            active_tag,
            manifest,
            cursor: 0,
        }
    }

    pub fn active_tag(&self) -> &Tag {
        &self.active_tag
    }

    pub fn manifest(&self) -> &MergedManifest {
        &self.manifest
    }

    pub fn projects(&self) -> &[Project] {
        &self.manifest.projects
    }

    pub fn len(&self) -> usize {
        self.manifest.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifest.projects.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&Project> {
        self.manifest.projects.get(self.cursor)
    }

    pub fn selected_count(&self) -> usize {
        self.manifest.selected_count()
    }

    /// Flip the selection flag of the project at `index`.
    ///
    /// Returns `false`, changing nothing, when `index` is out of range.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.manifest.projects.get_mut(index) {
            Some(project) => {
                project.toggle();
                true
            }
            None => false,
        }
    }

    /// Flip the selection flag of the project under the cursor.
    pub fn toggle_current(&mut self) -> bool {
        self.toggle(self.cursor)
    }

    /// Move the cursor by `delta`, clamped to the project range.
    ///
    /// With no projects the cursor stays at 0.
    pub fn move_cursor(&mut self, delta: isize) -> usize {
        let last = self.len().saturating_sub(1);
        let target = self.cursor.saturating_add_signed(delta);
        self.cursor = target.min(last);
        self.cursor
    }

    /// Move the cursor to `index`, clamped to the project range.
    pub fn set_cursor(&mut self, index: usize) -> usize {
        self.cursor = index.min(self.len().saturating_sub(1));
        self.cursor
    }

    /// The visible window for a viewport of `height` rows.
    pub fn page(&self, height: usize) -> Page {
        Page::locate(self.cursor, height, self.len())
    }
}

/// A window of rows derived from the cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 0-based page index.
    pub index: usize,
    /// Total number of pages; at least 1.
    pub count: usize,
    /// Rows visible on this page.
    pub rows: Range<usize>,
}

impl Page {
    /// Project `cursor` onto pages of `height` rows over `total` rows.
    ///
    /// A zero `height` is treated as 1.
    pub fn locate(cursor: usize, height: usize, total: usize) -> Self {
        let height = height.max(1);
        let cursor = cursor.min(total.saturating_sub(1));
        let index = cursor / height;
        let start = index * height;
        let end = ((index + 1) * height).min(total);

        Self {
            index,
            count: total.div_ceil(height).max(1),
            rows: start..end.max(start),
        }
    }
}

/// Cursor over the tag list shown while choosing a tag.
#[derive(Debug, Clone)]
pub struct TagPicker {
    tags: Vec<Tag>,
    index: usize,
}

impl TagPicker {
    /// Open the picker with `current` highlighted, or the first tag when
    /// `current` is not offered.
    pub fn new(tags: Vec<Tag>, current: &Tag) -> Self {
        let index = tags.iter().position(|tag| tag == current).unwrap_or(0);
        Self { tags, index }
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn highlighted(&self) -> Option<&Tag> {
        self.tags.get(self.index)
    }

    pub fn move_by(&mut self, delta: isize) {
        let last = self.tags.len().saturating_sub(1);
        self.index = self.index.saturating_add_signed(delta).min(last);
    }

    /// Visible rows for a box `height` rows tall, keeping the highlight
    /// near the middle.
    pub fn window(&self, height: usize) -> Range<usize> {
        let start = self.index.saturating_sub(height / 2);
        let end = (start + height).min(self.tags.len());
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestDocument;

    fn store_with(count: usize) -> SelectionStore {
        let mut yaml = String::from("manifest:\n  projects:\n");
        for i in 0..count {
            yaml.push_str(&format!("    - name: p{}\n      path: p{}\n", i, i));
        }
        if count == 0 {
            yaml = "manifest:\n  projects: []\n".to_string();
        }
        let doc = ManifestDocument::parse(&yaml).unwrap();
        SelectionStore::new(Tag::main(), MergedManifest::from_manifest(doc.manifest().clone()))
    }

    #[test]
    fn test_toggle_twice_returns_to_unselected() {
        let mut store = store_with(3);
        assert!(store.toggle(1));
        assert!(store.projects()[1].selected);
        assert!(store.toggle(1));
        assert!(!store.projects()[1].selected);
        assert_eq!(store.selected_count(), 0);
    }

    #[test]
    fn test_toggle_out_of_range_is_noop() {
        let mut store = store_with(2);
        assert!(!store.toggle(2));
        assert_eq!(store.selected_count(), 0);
    }

    #[test]
    fn test_toggle_current_follows_cursor() {
        let mut store = store_with(3);
        store.move_cursor(2);
        store.toggle_current();
        assert_eq!(store.current().unwrap().name(), "p2");
        assert!(store.projects()[2].selected);
    }

    #[test]
    fn test_move_cursor_clamps() {
        let mut store = store_with(3);
        assert_eq!(store.move_cursor(-1), 0);
        assert_eq!(store.move_cursor(10), 2);
        assert_eq!(store.move_cursor(-1), 1);
        assert_eq!(store.move_cursor(isize::MIN), 0);
        assert_eq!(store.move_cursor(isize::MAX), 2);
    }

    #[test]
    fn test_move_cursor_with_no_projects() {
        let mut store = store_with(0);
        assert_eq!(store.move_cursor(1), 0);
        assert_eq!(store.move_cursor(-1), 0);
        assert!(!store.toggle_current());
        assert!(store.current().is_none());
    }

    #[test]
    fn test_set_cursor_clamps() {
        let mut store = store_with(4);
        assert_eq!(store.set_cursor(99), 3);
    }

    #[test]
    fn test_page_locate() {
        let page = Page::locate(0, 10, 25);
        assert_eq!(page, Page { index: 0, count: 3, rows: 0..10 });

        let page = Page::locate(23, 10, 25);
        assert_eq!(page, Page { index: 2, count: 3, rows: 20..25 });

        let page = Page::locate(10, 10, 25);
        assert_eq!(page.rows, 10..20);
    }

    #[test]
    fn test_page_locate_edge_cases() {
        assert_eq!(Page::locate(0, 10, 0), Page { index: 0, count: 1, rows: 0..0 });
        // Zero height behaves like one row per page
        assert_eq!(Page::locate(3, 0, 5).rows, 3..4);
        // A stale cursor past the end is clamped
        assert_eq!(Page::locate(50, 10, 25).index, 2);
    }

    #[test]
    fn test_store_page_shrinks_with_viewport() {
        let mut store = store_with(30);
        store.set_cursor(25);
        assert_eq!(store.page(20).rows, 20..30);
        assert_eq!(store.page(5).rows, 25..30);
        assert_eq!(store.page(5).index, 5);
    }

    #[test]
    fn test_tag_picker_opens_on_current() {
        let tags = vec![Tag::main(), Tag::new("v3.1.0"), Tag::new("v2.7.0")];
        let picker = TagPicker::new(tags.clone(), &Tag::new("v3.1.0"));
        assert_eq!(picker.index(), 1);

        let picker = TagPicker::new(tags, &Tag::new("v9.9.9"));
        assert_eq!(picker.highlighted(), Some(&Tag::main()));
    }

    #[test]
    fn test_tag_picker_moves_and_windows() {
        let tags: Vec<Tag> = (0..20).map(|i| Tag::new(format!("v3.{}.0", i))).collect();
        let mut picker = TagPicker::new(tags, &Tag::main());
        picker.move_by(-1);
        assert_eq!(picker.index(), 0);
        assert_eq!(picker.window(6), 0..6);

        picker.move_by(10);
        assert_eq!(picker.window(6), 7..13);

        picker.move_by(100);
        assert_eq!(picker.index(), 19);
        assert_eq!(picker.window(6), 16..20);
    }
}
