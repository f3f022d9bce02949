use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Importer family, inferred from an asset's file extension.
///
/// Every family except `Default` has a fixed schema of settable property
/// paths; `Default` accepts arbitrary properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImporterFamily {
    Texture,
    Audio,
    Model,
    Font,
    Text,
    Default,
}

impl ImporterFamily {
    pub fn for_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "tga" | "psd" | "bmp" | "gif" | "tif" | "tiff" | "exr" => {
                Self::Texture
            }
            "wav" | "mp3" | "ogg" | "flac" | "aif" | "aiff" => Self::Audio,
            "fbx" | "obj" | "gltf" | "glb" | "dae" => Self::Model,
            "ttf" | "otf" | "woff" | "woff2" => Self::Font,
            "txt" | "json" | "xml" | "csv" | "md" => Self::Text,
            _ => Self::Default,
        }
    }

    /// Settable property paths for this family, or None for an open schema.
    pub fn known_properties(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Texture => Some(&[
                "srgb",
                "generate_mipmaps",
                "filter_mode",
                "wrap_mode",
                "max_size",
                "compression",
            ]),
            Self::Audio => Some(&[
                "force_mono",
                "normalize",
                "load_type",
                "compression_format",
                "quality",
            ]),
            Self::Model => Some(&[
                "scale_factor",
                "import_normals",
                "import_tangents",
                "optimize_mesh",
                "import_animation",
            ]),
            Self::Font => Some(&["rendering_mode", "character_set", "padding"]),
            Self::Text => Some(&["encoding", "strip_bom"]),
            Self::Default => None,
        }
    }
}

/// What a preset needs to know about an importer to decide compatibility.
#[derive(Clone, Debug)]
pub struct ImporterDescriptor {
    pub family: ImporterFamily,
    pub file_name: String,
}

/// Persisted import settings for one asset (the `<asset>.import` sidecar).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportSettings {
    pub version: u32,
    pub family: ImporterFamily,

    #[serde(default)]
    pub properties: BTreeMap<String, Value>,

    /// Bumped on every reimport.
    #[serde(default)]
    pub revision: u64,

    #[serde(default)]
    pub imported_at: Option<String>,
}

impl ImportSettings {
    pub fn new(family: ImporterFamily) -> Self {
        Self {
            version: 1,
            family,
            properties: BTreeMap::new(),
            revision: 0,
            imported_at: None,
        }
    }
}

/// An asset's importer: the object presets are resolved against and applied
/// to. `asset_path` is relative to the project root.
#[derive(Clone, Debug)]
pub struct Importer {
    pub asset_path: PathBuf,
    pub family: ImporterFamily,
    pub settings: ImportSettings,

    /// True when the asset had no settings sidecar on disk yet.
    pub settings_missing: bool,
}

impl Importer {
    pub fn descriptor(&self) -> ImporterDescriptor {
        let file_name = self
            .asset_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        ImporterDescriptor {
            family: self.family,
            file_name,
        }
    }

    pub fn set_property(&mut self, path: &str, value: Value) {
        self.settings.properties.insert(path.to_string(), value);
    }

    /// Record a reimport. The caller persists the sidecar afterwards.
    pub fn trigger_reimport(&mut self, imported_at: String) {
        self.settings.revision += 1;
        self.settings.imported_at = Some(imported_at);
        self.settings_missing = false;
    }
}
