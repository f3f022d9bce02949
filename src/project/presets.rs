use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::{AssetId, Preset};

use super::Project;

impl Project {
    pub fn load_preset(&self, rel: &Path) -> Result<Preset> {
        let abs = self.root.join(rel);
        let bytes =
            fs::read(&abs).with_context(|| format!("read preset {}", abs.display()))?;
        Preset::parse(&bytes).with_context(|| format!("parse preset {}", abs.display()))
    }

    /// Resolve and load a preset by identifier. Any failure (dangling id,
    /// deleted file, parse error) degrades to None.
    pub fn load_preset_by_id(&self, id: &AssetId) -> Option<Preset> {
        let rel = self.path_of(id)?;
        match self.load_preset(&rel) {
            Ok(preset) => Some(preset),
            Err(err) => {
                tracing::debug!(id = id.as_str(), %err, "preset failed to load");
                None
            }
        }
    }

    /// Whether an identifier still names a live preset file.
    pub fn preset_resolves(&self, id: &AssetId) -> bool {
        self.path_of(id)
            .map(|rel| self.root.join(rel).is_file())
            .unwrap_or(false)
    }

    /// Whether an identifier still names a live folder.
    pub fn folder_resolves(&self, id: &AssetId) -> bool {
        self.path_of(id)
            .map(|rel| self.root.join(rel).is_dir())
            .unwrap_or(false)
    }
}
