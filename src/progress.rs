//! Spinner shown while a blocking network call runs.
//!
//! The call itself runs on the caller's thread and is joined before control
//! returns; the spinner ticks from indicatif's own background thread. Nothing
//! is shared between the two apart from the bar handle.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::error::Result;
use crate::fetch::DocumentFetcher;
use crate::git::RefLister;
use crate::manifest::ManifestDocument;

const TICK: Duration = Duration::from_millis(100);
const TICK_CHARS: &str = "|/-\\ ";

/// Run `work` with a spinner labelled `message`.
///
/// The spinner is cleared when `work` returns, whatever the outcome. With
/// `visible` unset, or when stderr is not a terminal, nothing is drawn.
pub fn with_spinner<T>(message: &str, visible: bool, work: impl FnOnce() -> T) -> T {
    let bar = if visible {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(TICK_CHARS),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(TICK);

    let result = work();

    bar.finish_and_clear();
    result
}

/// Wraps a fetcher or ref lister so every call shows a spinner.
#[derive(Debug, Clone)]
pub struct WithSpinner<T> {
    inner: T,
    visible: bool,
}

impl<T> WithSpinner<T> {
    pub fn new(inner: T, visible: bool) -> Self {
        Self { inner, visible }
    }
}

impl<T: DocumentFetcher> DocumentFetcher for WithSpinner<T> {
    fn fetch(&self, url: &str, authenticated: bool) -> Result<ManifestDocument> {
        with_spinner("Fetching manifest...", self.visible, || {
            self.inner.fetch(url, authenticated)
        })
    }
}

impl<T: RefLister> RefLister for WithSpinner<T> {
    fn list_tag_refs(&self, url: &str) -> Result<Vec<String>> {
        with_spinner("Fetching tags...", self.visible, || self.inner.list_tag_refs(url))
    }
}
