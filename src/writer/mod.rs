//! # Manifest Writer
//!
//! Turns the current selection into the document west reads.
//!
//! The output has a fixed shape:
//!
//! ```yaml
//! manifest:
//!   defaults:
//!     remote: upstream
//!   remotes:
//!     - name: upstream
//!       url-base: https://github.com/zephyrproject-rtos
//!   projects:
//!     - name: cmsis
//!       path: zephyr/modules/hal/cmsis
//!     - name: zephyr
//!       revision: v3.6.0
//!       path: zephyr/zephyr
//!       west-commands: scripts/west-commands.yml
//!       clone-depth: 1
//! ```
//!
//! Only selected projects are written, each with its path moved under the
//! namespace segment. The self project always comes last and carries the
//! active tag as its revision. `defaults`, `remotes` and `projects` appear
//! in that order regardless of the merged document's key order.
//!
//! Writes go to a temporary file next to the target which is then renamed
//! over it, so a failed save never leaves a half-written manifest behind.

pub mod emit;

use serde_yaml::{Mapping, Value};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{SelfProject, Settings};
use crate::error::{Error, Result};
use crate::manifest::{
    MergedManifest, Project, DEFAULTS_KEY, MANIFEST_KEY, PROJECTS_KEY, REMOTES_KEY,
};
use crate::version::Tag;
use emit::Node;

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Absolute path of the written file.
    pub path: PathBuf,
    /// Whether the bytes on disk differ from what was there before.
    pub changed: bool,
}

/// Renders and persists curated manifests.
#[derive(Debug, Clone)]
pub struct ManifestWriter {
    output_path: PathBuf,
    namespace: String,
    self_project: SelfProject,
}

impl ManifestWriter {
    pub fn new(
        output_path: impl Into<PathBuf>,
        namespace: impl Into<String>,
        self_project: SelfProject,
    ) -> Self {
        Self {
            output_path: output_path.into(),
            namespace: namespace.into(),
            self_project,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.output.clone(),
            settings.namespace.clone(),
            settings.self_project.clone(),
        )
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Render the canonical document for `manifest` at `tag`.
    pub fn render(&self, manifest: &MergedManifest, tag: &Tag) -> Result<String> {
        let mut projects: Vec<Node> = manifest
            .selected()
            .map(|project| self.project_node(project))
            .collect();
        projects.push(self.self_project_node(tag));

        let body = Node::Map(vec![
            (key(DEFAULTS_KEY), section(manifest.defaults(), || Node::Map(Vec::new()))),
            (key(REMOTES_KEY), section(manifest.remotes(), || Node::Seq(Vec::new()))),
            (key(PROJECTS_KEY), Node::Seq(projects)),
        ]);

        emit::to_string(&Node::Map(vec![(key(MANIFEST_KEY), body)]))
    }

    /// Render and write the document, replacing the output file atomically.
    pub fn write(&self, manifest: &MergedManifest, tag: &Tag) -> Result<SaveOutcome> {
        let content = self.render(manifest, tag)?;
        let changed = match std::fs::read(&self.output_path) {
            Ok(previous) => previous != content.as_bytes(),
            Err(_) => true,
        };

        let parent = match self.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(|e| Error::Filesystem {
            message: format!("Failed to create directory {}: {}", parent.display(), e),
        })?;

        let mut temp = tempfile::NamedTempFile::new_in(&parent).map_err(|e| Error::Filesystem {
            message: format!("Failed to create temporary file in {}: {}", parent.display(), e),
        })?;
        temp.write_all(content.as_bytes())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| Error::Filesystem {
                message: format!("Failed to write temporary manifest: {}", e),
            })?;
        temp.persist(&self.output_path).map_err(|e| Error::Filesystem {
            message: format!("Failed to replace {}: {}", self.output_path.display(), e.error),
        })?;

        let path = std::fs::canonicalize(&self.output_path)
            .unwrap_or_else(|_| self.output_path.clone());
        log::info!(
            "Wrote {} selected projects to {}{}",
            manifest.selected_count(),
            path.display(),
            if changed { "" } else { " (unchanged)" }
        );
        Ok(SaveOutcome { path, changed })
    }

    /// A selected project with its path moved under the namespace.
    fn project_node(&self, project: &Project) -> Node {
        let mut entries = Vec::with_capacity(project.fields().len() + 1);
        let has_path = project.path().is_some();

        for (field, value) in project.fields() {
            match field.as_str() {
                Some("path") if has_path => {
                    let path = project.path().unwrap_or_default();
                    let prefixed = format!("{}/{}", self.namespace, path);
                    entries.push((field.clone(), Node::string(prefixed)));
                }
                Some("name") if !has_path => {
                    entries.push((field.clone(), Node::from_value(value)));
                    let prefixed = format!("{}/{}", self.namespace, project.name());
                    entries.push((key("path"), Node::string(prefixed)));
                }
                // Replaced by the synthetic path above.
                Some("path") => {}
                _ => entries.push((field.clone(), Node::from_value(value))),
            }
        }
        Node::Map(entries)
    }

    fn self_project_node(&self, tag: &Tag) -> Node {
        let own = &self.self_project;
        let mut entries = vec![
            (key("name"), Node::string(own.name.as_str())),
            (key("revision"), Node::string(tag.as_str())),
            (key("path"), Node::string(own.path.as_str())),
        ];
        if let Some(commands) = &own.west_commands {
            entries.push((key("west-commands"), Node::string(commands.as_str())));
        }
        if let Some(depth) = own.clone_depth {
            entries.push((key("clone-depth"), Node::Scalar(Value::Number(depth.into()))));
        }
        Node::Map(entries)
    }
}

fn key(name: &str) -> Value {
    Value::String(name.to_string())
}

fn section(value: Option<&Value>, empty: impl FnOnce() -> Node) -> Node {
    match value {
        Some(Value::Null) | None => empty(),
        Some(value) => Node::from_value(value),
    }
}

/// Parse rendered output back into the `projects` sequence. Test helper
/// shared by unit and integration tests.
#[doc(hidden)]
pub fn rendered_projects(text: &str) -> Result<Vec<Mapping>> {
    let root: Value = serde_yaml::from_str(text)?;
    let projects = root
        .get(MANIFEST_KEY)
        .and_then(|m| m.get(PROJECTS_KEY))
        .and_then(Value::as_sequence)
        .ok_or_else(|| Error::Parse {
            message: "rendered document has no manifest.projects".to_string(),
        })?;
    Ok(projects
        .iter()
        .filter_map(|p| p.as_mapping().cloned())
        .collect())
}
