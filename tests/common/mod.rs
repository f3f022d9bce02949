use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Value, json};

use cascade::model::AssetId;
use cascade::project::Project;
use cascade::store::BindingStore;

/// Write a `*.preset` file under the project root.
pub fn write_preset(
    root: &Path,
    rel: &str,
    name: &str,
    family: &str,
    properties: &[(&str, Value)],
) -> Result<()> {
    let properties: Vec<Value> = properties
        .iter()
        .map(|(path, value)| json!({ "path": path, "value": value }))
        .collect();
    let preset = json!({
        "version": 1,
        "name": name,
        "family": family,
        "properties": properties,
    });
    write_file(root, rel, serde_json::to_vec_pretty(&preset)?.as_slice())
}

/// Write an asset file (creating parent folders) under the project root.
pub fn write_file(root: &Path, rel: &str, bytes: &[u8]) -> Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Bind a preset to a folder and return the folder's identifier.
pub fn bind(
    project: &mut Project,
    store: &mut BindingStore,
    folder: &str,
    preset: &str,
) -> Result<AssetId> {
    let folder_id = project.identifier_of(Path::new(folder))?;
    let preset_id = project.identifier_of(Path::new(preset))?;
    store.set_binding(folder_id.clone(), preset_id);
    Ok(folder_id)
}
