mod binding;
mod config;
mod ids;
mod importer;
mod preset;

pub use self::binding::FolderPresetBinding;
pub use self::config::ProjectConfig;
pub use self::ids::AssetId;
pub use self::importer::{Importer, ImporterDescriptor, ImporterFamily, ImportSettings};
pub use self::preset::{Preset, PropertyModification};
