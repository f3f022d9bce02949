use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use cascade::model::AssetId;
use cascade::project::Project;
use cascade::store::BindingStore;

mod common;
use common::{bind, write_file, write_preset};

#[test]
fn set_binding_overwrites_instead_of_appending() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let mut project = Project::init(tmp.path(), false)?;
    fs::create_dir_all(tmp.path().join("Textures"))?;
    write_preset(tmp.path(), "presets/a.preset", "A", "texture", &[])?;
    write_preset(tmp.path(), "presets/b.preset", "B", "texture", &[])?;

    let mut store = BindingStore::load(&project)?;
    let folder_id = bind(&mut project, &mut store, "Textures", "presets/a.preset")?;
    assert_eq!(store.bindings().len(), 1);

    let resolved = store.bindings_for(&project, &folder_id);
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].preset.name, "A");

    bind(&mut project, &mut store, "Textures", "presets/b.preset")?;
    assert_eq!(store.bindings().len(), 1);
    let resolved = store.bindings_for(&project, &folder_id);
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].preset.name, "B");
    Ok(())
}

#[test]
fn clear_binding_removes_one_clear_all_removes_all() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let mut project = Project::init(tmp.path(), false)?;
    fs::create_dir_all(tmp.path().join("Textures"))?;
    write_preset(tmp.path(), "a.preset", "A", "texture", &[])?;
    write_preset(tmp.path(), "b.preset", "B", "audio", &[])?;

    let folder_id = project.identifier_of(Path::new("Textures"))?;
    let a_id = project.identifier_of(Path::new("a.preset"))?;
    let b_id = project.identifier_of(Path::new("b.preset"))?;

    // Duplicate entries for one folder can only come from the storage file
    // (hand edits, older revisions); the setter itself never appends twice.
    let file = json!({
        "version": 1,
        "bindings": [
            { "folder": folder_id.as_str(), "preset": a_id.as_str() },
            { "folder": folder_id.as_str(), "preset": b_id.as_str() },
        ],
    });
    write_file(
        tmp.path(),
        ".cascade/bindings.json",
        serde_json::to_vec_pretty(&file)?.as_slice(),
    )?;

    let mut store = BindingStore::load(&project)?;
    assert_eq!(store.bindings().len(), 2);

    store.clear_binding(&folder_id);
    assert_eq!(store.bindings().len(), 1);
    assert_eq!(store.bindings()[0].preset, b_id);

    store.clear_all_bindings(&folder_id);
    assert!(store.bindings().is_empty());
    Ok(())
}

#[test]
fn property_exclusion_is_idempotent_and_reversible() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let mut project = Project::init(tmp.path(), false)?;
    fs::create_dir_all(tmp.path().join("Textures"))?;
    write_preset(
        tmp.path(),
        "x.preset",
        "X",
        "texture",
        &[
            ("srgb", json!(true)),
            ("filter_mode", json!("bilinear")),
        ],
    )?;

    let mut store = BindingStore::load(&project)?;
    let folder_id = bind(&mut project, &mut store, "Textures", "x.preset")?;

    store.set_property_excluded(&folder_id, "srgb", true);
    store.set_property_excluded(&folder_id, "srgb", true);
    assert_eq!(store.bindings()[0].excluded_properties, vec!["srgb"]);

    let resolved = store.bindings_for(&project, &folder_id);
    assert_eq!(resolved[0].filter, vec!["filter_mode"]);

    store.set_property_excluded(&folder_id, "srgb", false);
    let resolved = store.bindings_for(&project, &folder_id);
    assert_eq!(resolved[0].filter, vec!["srgb", "filter_mode"]);
    Ok(())
}

#[test]
fn save_load_roundtrip_preserves_bindings_and_exclusions() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let mut project = Project::init(tmp.path(), false)?;
    fs::create_dir_all(tmp.path().join("Textures"))?;
    fs::create_dir_all(tmp.path().join("Audio"))?;
    write_preset(tmp.path(), "x.preset", "X", "texture", &[("srgb", json!(true))])?;
    write_preset(tmp.path(), "y.preset", "Y", "audio", &[("quality", json!(0.7))])?;

    let mut store = BindingStore::load(&project)?;
    let textures = bind(&mut project, &mut store, "Textures", "x.preset")?;
    let audio = bind(&mut project, &mut store, "Audio", "y.preset")?;
    store.set_property_excluded(&audio, "quality", true);

    assert!(store.is_dirty());
    store.save(&project)?;
    assert!(!store.is_dirty());

    let reloaded = BindingStore::load(&project)?;
    assert_eq!(reloaded.bindings(), store.bindings());

    let resolved = reloaded.bindings_for(&project, &textures);
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].preset.name, "X");
    assert_eq!(resolved[0].filter, vec!["srgb"]);

    let resolved = reloaded.bindings_for(&project, &audio);
    assert_eq!(resolved.len(), 1);
    assert!(resolved[0].filter.is_empty());
    Ok(())
}

#[test]
fn validate_prunes_only_dangling_bindings() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let mut project = Project::init(tmp.path(), false)?;
    fs::create_dir_all(tmp.path().join("Keep"))?;
    fs::create_dir_all(tmp.path().join("Gone"))?;
    write_preset(tmp.path(), "x.preset", "X", "texture", &[])?;

    let mut store = BindingStore::load(&project)?;
    let keep = bind(&mut project, &mut store, "Keep", "x.preset")?;
    bind(&mut project, &mut store, "Gone", "x.preset")?;

    fs::remove_dir_all(tmp.path().join("Gone"))?;

    let pruned = store.validate(&project);
    assert_eq!(pruned.len(), 1);
    assert_eq!(store.bindings().len(), 1);
    assert_eq!(store.bindings()[0].folder, keep);

    // A binding whose preset file is deleted is pruned the same way.
    fs::remove_file(tmp.path().join("x.preset"))?;
    let pruned = store.validate(&project);
    assert_eq!(pruned.len(), 1);
    assert!(store.bindings().is_empty());
    Ok(())
}

#[test]
fn bindings_for_skips_presets_that_fail_to_load() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let mut project = Project::init(tmp.path(), false)?;
    fs::create_dir_all(tmp.path().join("Textures"))?;
    write_preset(tmp.path(), "x.preset", "X", "texture", &[])?;

    let mut store = BindingStore::load(&project)?;
    let folder_id = bind(&mut project, &mut store, "Textures", "x.preset")?;

    write_file(tmp.path(), "x.preset", b"not json")?;
    assert!(store.bindings_for(&project, &folder_id).is_empty());
    assert!(!store.has_preset(&project, &folder_id));

    // Unknown folders simply resolve to nothing.
    assert!(
        store
            .bindings_for(&project, &AssetId("missing".to_string()))
            .is_empty()
    );
    Ok(())
}

#[test]
fn save_is_a_noop_when_clean() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let mut project = Project::init(tmp.path(), false)?;
    fs::create_dir_all(tmp.path().join("Textures"))?;
    write_preset(tmp.path(), "x.preset", "X", "texture", &[])?;

    let mut store = BindingStore::load(&project)?;
    assert!(!store.is_dirty());
    store.save(&project)?;
    assert!(!project.bindings_path().exists());

    bind(&mut project, &mut store, "Textures", "x.preset")?;
    store.save(&project)?;
    assert!(project.bindings_path().exists());
    Ok(())
}
