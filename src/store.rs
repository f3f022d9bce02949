use std::fs;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{AssetId, FolderPresetBinding, Preset};
use crate::project::{Project, write_atomic};

#[derive(Debug, Serialize, Deserialize)]
struct BindingsFile {
    version: u32,

    #[serde(default)]
    bindings: Vec<FolderPresetBinding>,
}

/// A resolved binding: the loaded preset plus the effective (non-excluded)
/// property paths it will write.
#[derive(Clone, Debug)]
pub struct PresetWithFilter {
    pub preset_id: AssetId,
    pub preset: Preset,
    pub filter: Vec<String>,
}

/// The folder-preset map: an ordered list of bindings hydrated from
/// `.cascade/bindings.json`.
///
/// Mutations only mark the store dirty; callers flush once with `save` (bulk
/// edits stay cheap). The store is constructed by the caller and passed by
/// reference into the engines — nothing here is process-global.
#[derive(Debug, Default)]
pub struct BindingStore {
    bindings: Vec<FolderPresetBinding>,
    dirty: bool,
}

impl BindingStore {
    pub fn load(project: &Project) -> Result<Self> {
        let path = project.bindings_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(&path).context("read bindings.json")?;
        let file: BindingsFile = serde_json::from_slice(&bytes).context("parse bindings.json")?;
        if file.version != 1 {
            anyhow::bail!("unsupported bindings version {}", file.version);
        }
        Ok(Self {
            bindings: file.bindings,
            dirty: false,
        })
    }

    /// Flush to disk if anything changed since the last save.
    pub fn save(&mut self, project: &Project) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let file = BindingsFile {
            version: 1,
            bindings: self.bindings.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&file).context("serialize bindings")?;
        write_atomic(&project.bindings_path(), &bytes).context("write bindings.json")?;
        self.dirty = false;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn bindings(&self) -> &[FolderPresetBinding] {
        &self.bindings
    }

    /// True iff at least one binding for the folder resolves to a loadable
    /// preset.
    pub fn has_preset(&self, project: &Project, folder: &AssetId) -> bool {
        !self.bindings_for(project, folder).is_empty()
    }

    /// Every binding for the folder, resolved to its loaded preset and
    /// effective property filter. Bindings whose preset fails to load are
    /// skipped; never errors.
    pub fn bindings_for(&self, project: &Project, folder: &AssetId) -> Vec<PresetWithFilter> {
        let mut out = Vec::new();
        for binding in self.bindings.iter().filter(|b| &b.folder == folder) {
            let Some(preset) = project.load_preset_by_id(&binding.preset) else {
                continue;
            };
            let filter = preset.effective_properties(&binding.excluded_properties);
            out.push(PresetWithFilter {
                preset_id: binding.preset.clone(),
                preset,
                filter,
            });
        }
        out
    }

    /// Bind a preset to a folder. An existing binding for the folder has its
    /// preset overwritten (exclusions kept); otherwise a new binding is
    /// appended.
    pub fn set_binding(&mut self, folder: AssetId, preset: AssetId) {
        if let Some(binding) = self.bindings.iter_mut().find(|b| b.folder == folder) {
            if binding.preset != preset {
                binding.preset = preset;
                self.dirty = true;
            }
            return;
        }
        self.bindings.push(FolderPresetBinding::new(folder, preset));
        self.dirty = true;
    }

    /// Remove the first binding for a folder.
    pub fn clear_binding(&mut self, folder: &AssetId) {
        if let Some(index) = self.bindings.iter().position(|b| &b.folder == folder) {
            self.bindings.remove(index);
            self.dirty = true;
        }
    }

    /// Remove every binding for a folder (defensive against duplicates).
    pub fn clear_all_bindings(&mut self, folder: &AssetId) {
        let before = self.bindings.len();
        self.bindings.retain(|b| &b.folder != folder);
        if self.bindings.len() != before {
            self.dirty = true;
        }
    }

    /// Toggle a property exclusion on the folder's first binding.
    pub fn set_property_excluded(&mut self, folder: &AssetId, path: &str, excluded: bool) {
        if let Some(binding) = self.bindings.iter_mut().find(|b| &b.folder == folder)
            && binding.set_property_enabled(path, !excluded)
        {
            self.dirty = true;
        }
    }

    /// Prune every binding whose folder or preset identifier no longer
    /// resolves to a live object. Returns what was removed.
    pub fn validate(&mut self, project: &Project) -> Vec<FolderPresetBinding> {
        let mut pruned = Vec::new();
        self.bindings.retain(|binding| {
            let valid = project.folder_resolves(&binding.folder)
                && project.preset_resolves(&binding.preset);
            if !valid {
                pruned.push(binding.clone());
            }
            valid
        });
        if !pruned.is_empty() {
            self.dirty = true;
        }
        pruned
    }
}
