use serde::{Deserialize, Serialize};

use super::ids::AssetId;

/// One folder-to-preset association, with optional per-property exclusions.
///
/// `excluded_properties` holds preset property paths that this folder opts
/// out of; everything else in the preset is written on apply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderPresetBinding {
    pub folder: AssetId,
    pub preset: AssetId,

    #[serde(default)]
    pub excluded_properties: Vec<String>,
}

impl FolderPresetBinding {
    pub fn new(folder: AssetId, preset: AssetId) -> Self {
        Self {
            folder,
            preset,
            excluded_properties: Vec::new(),
        }
    }

    pub fn is_property_enabled(&self, path: &str) -> bool {
        !self.excluded_properties.iter().any(|p| p == path)
    }

    /// Toggle a property exclusion. Idempotent: excluding an already excluded
    /// path (or re-enabling an enabled one) changes nothing.
    ///
    /// Returns true when the exclusion set actually changed.
    pub fn set_property_enabled(&mut self, path: &str, enabled: bool) -> bool {
        if enabled {
            let before = self.excluded_properties.len();
            self.excluded_properties.retain(|p| p != path);
            self.excluded_properties.len() != before
        } else {
            if !self.is_property_enabled(path) {
                return false;
            }
            self.excluded_properties.push(path.to_string());
            true
        }
    }
}
