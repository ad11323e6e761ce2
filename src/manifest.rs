//! # Manifest Data Model
//!
//! - **`ManifestDocument`**: one upstream document, validated at construction.
//!   It is held as a raw YAML mapping so unknown fields pass through
//!   untouched and key order is kept.
//! - **`Project`**: one entry of `manifest.projects` plus the runtime-only
//!   selection flag. The flag is a struct field, never a YAML key, so it
//!   cannot leak into the persisted document.
//! - **`MergedManifest`**: the result of merging two documents, with its
//!   projects lifted out into an ordered `Vec<Project>`.

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

pub const MANIFEST_KEY: &str = "manifest";
pub const PROJECTS_KEY: &str = "projects";
pub const REMOTES_KEY: &str = "remotes";
pub const DEFAULTS_KEY: &str = "defaults";

/// Look up a string key in a mapping.
pub(crate) fn get<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.get(Value::String(key.to_string()))
}

/// A validated upstream manifest document.
///
/// Only the `manifest` mapping is kept; other top-level keys play no part in
/// merging or output.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument {
    manifest: Mapping,
}

impl ManifestDocument {
    /// Parse and validate a document from YAML text.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text).map_err(|e| Error::Parse {
            message: format!("invalid YAML: {}", e),
        })?;
        Self::from_value(value)
    }

    /// Validate an already-parsed document.
    ///
    /// Requires a top-level `manifest` mapping. When `projects` is present it
    /// must be a sequence of mappings that each carry a string `name` (and a
    /// string `path`, if any);
    /// `remotes` must be a sequence and `defaults` a mapping when present.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Mapping(root) = value else {
            return Err(config_error("document root is not a mapping"));
        };

        let manifest = match get(&root, MANIFEST_KEY) {
            Some(Value::Mapping(manifest)) => manifest.clone(),
            Some(_) => return Err(config_error("'manifest' is not a mapping")),
            None => return Err(config_error("missing top-level 'manifest' key")),
        };

        if let Some(projects) = get(&manifest, PROJECTS_KEY) {
            let Value::Sequence(projects) = projects else {
                return Err(config_error("'manifest.projects' is not a sequence"));
            };
            for (idx, project) in projects.iter().enumerate() {
                let Value::Mapping(project) = project else {
                    return Err(config_error(&format!("project #{} is not a mapping", idx)));
                };
                if !matches!(get(project, "name"), Some(Value::String(_))) {
                    return Err(config_error(&format!("project #{} has no string 'name'", idx)));
                }
                if !matches!(get(project, "path"), None | Some(Value::String(_))) {
                    return Err(config_error(&format!("project #{} has a non-string 'path'", idx)));
                }
            }
        }

        if let Some(remotes) = get(&manifest, REMOTES_KEY) {
            if !remotes.is_sequence() {
                return Err(config_error("'manifest.remotes' is not a sequence"));
            }
        }

        if let Some(defaults) = get(&manifest, DEFAULTS_KEY) {
            if !defaults.is_mapping() {
                return Err(config_error("'manifest.defaults' is not a mapping"));
            }
        }

        Ok(Self { manifest })
    }

    /// The `manifest` mapping.
    pub fn manifest(&self) -> &Mapping {
        &self.manifest
    }

    /// Number of entries in `manifest.projects`.
    pub fn project_count(&self) -> usize {
        get(self.manifest(), PROJECTS_KEY)
            .and_then(Value::as_sequence)
            .map_or(0, Vec::len)
    }
}

fn config_error(message: &str) -> Error {
    Error::Config {
        message: format!("malformed manifest: {}", message),
        hint: None,
    }
}

/// A project entry with its selection flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    fields: Mapping,
    pub selected: bool,
}

impl Project {
    /// Wrap a project mapping. The selection flag starts cleared.
    pub fn new(fields: Mapping) -> Self {
        Self {
            fields,
            selected: false,
        }
    }

    pub fn fields(&self) -> &Mapping {
        &self.fields
    }

    pub fn name(&self) -> &str {
        get(&self.fields, "name").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn path(&self) -> Option<&str> {
        get(&self.fields, "path").and_then(Value::as_str)
    }

    pub fn toggle(&mut self) {
        self.selected = !self.selected;
    }
}

/// The merged view of the primary and overlay documents.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedManifest {
    /// `manifest` mapping without `projects`.
    manifest: Mapping,
    pub projects: Vec<Project>,
}

impl MergedManifest {
    /// Split a merged `manifest` mapping into settings and projects.
    ///
    /// Non-mapping project entries are dropped; validated inputs never
    /// contain any.
    pub fn from_manifest(manifest: Mapping) -> Self {
        let mut projects = Value::Null;
        let manifest: Mapping = manifest
            .into_iter()
            .filter_map(|(key, value)| {
                if key.as_str() == Some(PROJECTS_KEY) {
                    projects = value;
                    None
                } else {
                    Some((key, value))
                }
            })
            .collect();

        let projects = match projects {
            Value::Sequence(projects) => projects
                .into_iter()
                .filter_map(|project| match project {
                    Value::Mapping(fields) => Some(Project::new(fields)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        Self { manifest, projects }
    }

    pub fn manifest(&self) -> &Mapping {
        &self.manifest
    }

    pub fn defaults(&self) -> Option<&Value> {
        get(&self.manifest, DEFAULTS_KEY)
    }

    pub fn remotes(&self) -> Option<&Value> {
        get(&self.manifest, REMOTES_KEY)
    }

    pub fn selected(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|project| project.selected)
    }

    pub fn selected_count(&self) -> usize {
        self.selected().count()
    }

    /// Mark exactly the projects whose name is in `names` as selected.
    ///
    /// Returns the names that matched no project.
    pub fn select_by_name<'a>(&mut self, names: &'a [String]) -> Vec<&'a str> {
        for project in &mut self.projects {
            project.selected = names.iter().any(|name| name == project.name());
        }
        names
            .iter()
            .filter(|name| !self.projects.iter().any(|p| p.name() == name.as_str()))
            .map(String::as_str)
            .collect()
    }
}
