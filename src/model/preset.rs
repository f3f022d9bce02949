use anyhow::{Context, Result};
use globset::{Glob, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::importer::{Importer, ImporterDescriptor, ImporterFamily};

/// One target property value carried by a preset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyModification {
    pub path: String,
    pub value: Value,
}

/// A named, reusable bundle of importer settings (a `*.preset` file).
///
/// `match` globs optionally narrow the preset to matching file names within
/// its importer family; an empty list covers the whole family.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub version: u32,
    pub name: String,
    pub family: ImporterFamily,

    #[serde(default, rename = "match")]
    pub match_patterns: Vec<String>,

    #[serde(default)]
    pub properties: Vec<PropertyModification>,
}

impl Preset {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let preset: Preset = serde_json::from_slice(bytes).context("parse preset")?;
        if preset.version != 1 {
            anyhow::bail!("unsupported preset version {}", preset.version);
        }
        Ok(preset)
    }

    /// Whether this preset can target the described importer: same family,
    /// and the file name matches the `match` globs when any are set.
    pub fn is_compatible_with(&self, descriptor: &ImporterDescriptor) -> bool {
        if self.family != descriptor.family {
            return false;
        }
        if self.match_patterns.is_empty() {
            return true;
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in &self.match_patterns {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(err) => {
                    tracing::debug!(preset = %self.name, %pattern, %err, "bad match pattern");
                    return false;
                }
            }
        }
        match builder.build() {
            Ok(set) => set.is_match(&descriptor.file_name),
            Err(_) => false,
        }
    }

    /// The property paths this preset writes after subtracting a binding's
    /// exclusions.
    pub fn effective_properties(&self, excluded: &[String]) -> Vec<String> {
        self.properties
            .iter()
            .filter(|m| !excluded.iter().any(|e| e == &m.path))
            .map(|m| m.path.clone())
            .collect()
    }

    /// Write the filtered properties into the importer.
    ///
    /// All-or-nothing: if the importer's family rejects any filtered path,
    /// nothing is written and `false` is returned.
    pub fn apply(&self, importer: &mut Importer, filter: &[String]) -> bool {
        if self.family != importer.family {
            return false;
        }
        if let Some(known) = importer.family.known_properties()
            && filter.iter().any(|path| !known.contains(&path.as_str()))
        {
            return false;
        }

        for modification in &self.properties {
            if filter.iter().any(|path| path == &modification.path) {
                importer.set_property(&modification.path, modification.value.clone());
            }
        }
        true
    }
}
