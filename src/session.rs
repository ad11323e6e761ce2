//! # Curation Session
//!
//! A [`Session`] ties the engine together for one interactive run:
//!
//! 1. Discover tags (degrading to `main` on failure).
//! 2. Fetch the primary document at the first tag and the overlay document.
//! 3. Merge them and seed a fresh [`SelectionStore`].
//!
//! After that the session moves between a small set of modes:
//!
//! ```text
//!            begin_tag_pick            request_tag_change ok
//! Viewing ───────────────► TagPicking ───────────────────────► Viewing
//!    ▲  │                      │ cancel_tag_pick                  ▲
//!    │  │ save                 └──────────────────────────────────┤
//!    │  ▼                                                         │
//!    │ Saving ── ok ──► Viewing        fetch or save failure      │
//!    │                                        ▼                   │
//!    └──────────────── resume ─────────── Error ──────────────────┘
//! ```
//!
//! The overlay is fetched once, when the session starts. A tag change
//! re-fetches only the primary document and merges it with the overlay held
//! in memory. A failed tag change leaves the previous tag, manifest,
//! selections and cursor untouched.

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::fetch::DocumentFetcher;
use crate::git::RefLister;
use crate::manifest::ManifestDocument;
use crate::merge::merge_manifests;
use crate::selection::{SelectionStore, TagPicker};
use crate::version::{discover_tags, Tag};
use crate::writer::{ManifestWriter, SaveOutcome};

/// Interaction mode of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Viewing,
    TagPicking,
    Saving,
    /// A fetch or save failed. The message is kept until [`Session::resume`].
    Error,
}

/// Result of [`Session::request_tag_change`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagChange {
    /// The requested tag was already active; nothing changed.
    Unchanged,
    /// The manifest was rebuilt for the new tag.
    Switched,
}

/// One curation run over a primary/overlay pair.
pub struct Session<F: DocumentFetcher> {
    settings: Settings,
    fetcher: F,
    overlay: ManifestDocument,
    tags: Vec<Tag>,
    store: SelectionStore,
    mode: Mode,
    last_error: Option<String>,
    tag_warning: Option<Error>,
}

impl<F: DocumentFetcher> std::fmt::Debug for Session<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("active_tag", self.store.active_tag())
            .field("tags", &self.tags)
            .field("mode", &self.mode)
            .field("projects", &self.store.len())
            .finish()
    }
}

impl<F: DocumentFetcher> Session<F> {
    /// Discover tags, fetch both documents and build the initial store.
    ///
    /// Tag discovery never fails the bootstrap; a fetch failure does.
    pub fn bootstrap(settings: Settings, fetcher: F, lister: &dyn RefLister) -> Result<Self> {
        settings.validate()?;

        let discovery = discover_tags(lister, &settings.tag_repository);
        let active = discovery.tags.first().cloned().unwrap_or_else(Tag::main);

        let primary = fetcher.fetch(&settings.primary_url_for(&active), false)?;
        let overlay = fetcher.fetch(&settings.overlay_url, settings.overlay_authenticated)?;
        let store = SelectionStore::new(active, merge_manifests(&primary, &overlay));

        log::info!(
            "Session ready at {} with {} projects",
            store.active_tag(),
            store.len()
        );

        Ok(Self {
            settings,
            fetcher,
            overlay,
            tags: discovery.tags,
            store,
            mode: Mode::Viewing,
            last_error: None,
            tag_warning: discovery.warning,
        })
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Why tag discovery fell back to `main`, if it did.
    pub fn tag_warning(&self) -> Option<&Error> {
        self.tag_warning.as_ref()
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    pub fn active_tag(&self) -> &Tag {
        self.store.active_tag()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Message of the failure that put the session in [`Mode::Error`].
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn toggle_current(&mut self) -> Result<bool> {
        self.expect_mode(Mode::Viewing, "toggle a project")?;
        Ok(self.store.toggle_current())
    }

    pub fn toggle(&mut self, index: usize) -> Result<bool> {
        self.expect_mode(Mode::Viewing, "toggle a project")?;
        Ok(self.store.toggle(index))
    }

    pub fn move_cursor(&mut self, delta: isize) -> Result<usize> {
        self.expect_mode(Mode::Viewing, "move the cursor")?;
        Ok(self.store.move_cursor(delta))
    }

    /// Enter tag picking, returning a picker opened on the active tag.
    pub fn begin_tag_pick(&mut self) -> Result<TagPicker> {
        self.expect_mode(Mode::Viewing, "pick a tag")?;
        self.mode = Mode::TagPicking;
        Ok(TagPicker::new(self.tags.clone(), self.store.active_tag()))
    }

    pub fn cancel_tag_pick(&mut self) {
        if self.mode == Mode::TagPicking {
            self.mode = Mode::Viewing;
        }
    }

    /// Switch to `tag`.
    ///
    /// Selecting the active tag changes nothing. Otherwise the primary
    /// document is fetched at `tag` and merged with the held overlay; the
    /// new store starts with the cursor at 0 and nothing selected. On
    /// failure the session enters [`Mode::Error`] with its previous state
    /// intact, and the error is returned.
    pub fn request_tag_change(&mut self, tag: &Tag) -> Result<TagChange> {
        if !matches!(self.mode, Mode::Viewing | Mode::TagPicking) {
            return Err(self.wrong_mode("change tags"));
        }

        if tag == self.store.active_tag() {
            self.mode = Mode::Viewing;
            return Ok(TagChange::Unchanged);
        }

        let url = self.settings.primary_url_for(tag);
        match self.fetcher.fetch(&url, false) {
            Ok(primary) => {
                let merged = merge_manifests(&primary, &self.overlay);
                log::info!(
                    "Switched from {} to {}, {} selections discarded",
                    self.store.active_tag(),
                    tag,
                    self.store.selected_count()
                );
                self.store = SelectionStore::new(tag.clone(), merged);
                self.mode = Mode::Viewing;
                Ok(TagChange::Switched)
            }
            Err(err) => {
                log::info!("Could not switch to {}: {}", tag, err);
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Write the current selection. Selections are kept.
    pub fn save(&mut self, writer: &ManifestWriter) -> Result<SaveOutcome> {
        self.expect_mode(Mode::Viewing, "save")?;
        self.mode = Mode::Saving;

        match writer.write(self.store.manifest(), self.store.active_tag()) {
            Ok(outcome) => {
                self.mode = Mode::Viewing;
                Ok(outcome)
            }
            Err(err) => {
                log::info!("Save failed: {}", err);
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Leave [`Mode::Error`] and return to viewing.
    pub fn resume(&mut self) {
        if self.mode == Mode::Error {
            self.mode = Mode::Viewing;
            self.last_error = None;
        }
    }

    fn fail(&mut self, err: &Error) {
        self.mode = Mode::Error;
        self.last_error = Some(err.to_string());
    }

    fn expect_mode(&self, mode: Mode, action: &str) -> Result<()> {
        if self.mode == mode {
            Ok(())
        } else {
            Err(self.wrong_mode(action))
        }
    }

    fn wrong_mode(&self, action: &str) -> Error {
        Error::State {
            message: format!("cannot {} while in {:?} mode", action, self.mode),
        }
    }
}
