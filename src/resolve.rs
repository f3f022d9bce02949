use std::path::{Path, PathBuf};

use crate::model::Importer;
use crate::project::Project;
use crate::store::{BindingStore, PresetWithFilter};

/// Outcome of an inheritance-aware resolution: the winning preset (with its
/// effective filter) and the folder whose binding supplied it.
#[derive(Clone, Debug)]
pub struct ResolvedPreset {
    pub preset: PresetWithFilter,
    pub owning_folder: PathBuf,
}

/// First binding on `folder` whose preset is compatible with the importer.
/// Ties break by binding insertion order.
pub fn resolve_for_importer(
    project: &Project,
    store: &BindingStore,
    folder: &Path,
    importer: &Importer,
) -> Option<PresetWithFilter> {
    let folder_id = project.existing_identifier_of(folder)?;
    let descriptor = importer.descriptor();
    store
        .bindings_for(project, &folder_id)
        .into_iter()
        .find(|candidate| candidate.preset.is_compatible_with(&descriptor))
}

/// Nearest-enclosing-declaration resolution: a direct binding on `folder`
/// wins; otherwise ancestors are consulted parent-first, stopping short of
/// the project root. No merging across levels — the first match is the whole
/// answer.
pub fn resolve_with_inheritance(
    project: &Project,
    store: &BindingStore,
    folder: &Path,
    importer: &Importer,
) -> Option<ResolvedPreset> {
    if let Some(preset) = resolve_for_importer(project, store, folder, importer) {
        return Some(ResolvedPreset {
            preset,
            owning_folder: folder.to_path_buf(),
        });
    }

    let mut depth = 0u32;
    let mut current = folder.parent();
    while let Some(dir) = current {
        // The project root itself never participates in inheritance.
        if dir.as_os_str().is_empty() {
            break;
        }
        if let Some(cap) = project.config.max_search_depth
            && depth >= cap
        {
            break;
        }
        if let Some(preset) = resolve_for_importer(project, store, dir, importer) {
            return Some(ResolvedPreset {
                preset,
                owning_folder: dir.to_path_buf(),
            });
        }
        depth += 1;
        current = dir.parent();
    }
    None
}
