use std::path::PathBuf;

use anyhow::Result;
use tracing::warn;

use crate::model::{ImporterDescriptor, Preset};
use crate::project::Project;

#[derive(Clone, Debug)]
pub struct CatalogEntry {
    pub path: PathBuf,
    pub preset: Preset,
}

/// Cached enumeration of every `*.preset` file in the project.
///
/// The cache is nulled by `invalidate` (signaled whenever a preset asset is
/// created, deleted, or moved) and rebuilt synchronously on the next read;
/// queries in between never rescan. Single-threaded by construction, so no
/// locking.
#[derive(Debug, Default)]
pub struct PresetCatalog {
    cache: Option<Vec<CatalogEntry>>,
}

impl PresetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Every preset in the project, in deterministic path order.
    /// Unparseable preset files are skipped.
    pub fn all(&mut self, project: &Project) -> Result<&[CatalogEntry]> {
        if self.cache.is_none() {
            let mut entries = Vec::new();
            for path in project.preset_files()? {
                match project.load_preset(&path) {
                    Ok(preset) => entries.push(CatalogEntry { path, preset }),
                    Err(err) => {
                        warn!(preset = %path.display(), %err, "skipping unreadable preset");
                    }
                }
            }
            self.cache = Some(entries);
        }
        Ok(self.cache.as_deref().unwrap_or_default())
    }

    /// Presets compatible with the described importer, catalog order
    /// preserved.
    pub fn available_for(
        &mut self,
        project: &Project,
        descriptor: &ImporterDescriptor,
    ) -> Result<Vec<CatalogEntry>> {
        Ok(self
            .all(project)?
            .iter()
            .filter(|entry| entry.preset.is_compatible_with(descriptor))
            .cloned()
            .collect())
    }

    /// Short-circuiting existence check with the same compatibility
    /// predicate as `available_for`.
    pub fn exists_compatible(
        &mut self,
        project: &Project,
        descriptor: &ImporterDescriptor,
    ) -> Result<bool> {
        Ok(self
            .all(project)?
            .iter()
            .any(|entry| entry.preset.is_compatible_with(descriptor)))
    }
}
