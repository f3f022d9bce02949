use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use cascade::apply::{NoopObserver, import_assets};
use cascade::catalog::PresetCatalog;
use cascade::model::ImporterFamily;
use cascade::project::Project;
use cascade::resolve::resolve_with_inheritance;
use cascade::store::BindingStore;

mod common;
use common::{bind, write_file, write_preset};

#[test]
fn import_applies_only_to_assets_with_missing_settings() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let mut project = Project::init(tmp.path(), false)?;
    write_file(tmp.path(), "A/a.png", b"png")?;
    write_preset(tmp.path(), "x.preset", "X", "texture", &[("srgb", json!(true))])?;

    let mut store = BindingStore::load(&project)?;
    bind(&mut project, &mut store, "A", "x.preset")?;

    let mut catalog = PresetCatalog::new();
    let report = import_assets(
        &project,
        &store,
        &mut catalog,
        Path::new(""),
        false,
        &mut NoopObserver,
    );
    assert_eq!(report.applied, 1);

    // A second pass finds nothing left to do...
    write_file(tmp.path(), "A/b.png", b"png")?;
    let report = import_assets(
        &project,
        &store,
        &mut catalog,
        Path::new(""),
        false,
        &mut NoopObserver,
    );
    assert_eq!(report.applied, 1); // only the new asset

    // ...unless a full reapply is requested.
    let report = import_assets(
        &project,
        &store,
        &mut catalog,
        Path::new(""),
        true,
        &mut NoopObserver,
    );
    assert_eq!(report.applied, 2);
    Ok(())
}

#[test]
fn sidecars_and_presets_are_never_treated_as_assets() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let mut project = Project::init(tmp.path(), false)?;
    write_file(tmp.path(), "A/a.png", b"png")?;
    write_preset(tmp.path(), "A/local.preset", "Local", "texture", &[])?;
    write_preset(tmp.path(), "x.preset", "X", "texture", &[("srgb", json!(true))])?;

    let mut store = BindingStore::load(&project)?;
    bind(&mut project, &mut store, "A", "x.preset")?;

    let mut catalog = PresetCatalog::new();
    import_assets(
        &project,
        &store,
        &mut catalog,
        Path::new(""),
        false,
        &mut NoopObserver,
    );

    assert!(tmp.path().join("A/a.png.import").exists());
    assert!(!tmp.path().join("A/local.preset.import").exists());

    let files = project.asset_files(Path::new("A"))?;
    assert_eq!(files, vec![Path::new("A/a.png").to_path_buf()]);
    Ok(())
}

#[test]
fn moving_a_bound_folder_keeps_its_binding_resolvable() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let mut project = Project::init(tmp.path(), false)?;
    write_file(tmp.path(), "Textures/img.png", b"png")?;
    write_preset(tmp.path(), "x.preset", "X", "texture", &[])?;

    let mut store = BindingStore::load(&project)?;
    let folder_id = bind(&mut project, &mut store, "Textures", "x.preset")?;

    project.move_path(Path::new("Textures"), Path::new("Art/Textures"))?;

    // Same identifier, new path.
    assert_eq!(
        project.existing_identifier_of(Path::new("Art/Textures")),
        Some(folder_id.clone())
    );
    assert_eq!(
        project.path_of(&folder_id),
        Some(Path::new("Art/Textures").to_path_buf())
    );

    let importer = project
        .importer_for(Path::new("Art/Textures/img.png"))?
        .context("importer after move")?;
    let resolved =
        resolve_with_inheritance(&project, &store, Path::new("Art/Textures"), &importer)
            .context("expected a resolution after move")?;
    assert_eq!(resolved.preset.preset.name, "X");

    // Moving the preset file keeps the binding alive too.
    project.move_path(Path::new("x.preset"), Path::new("presets/x.preset"))?;
    assert!(!store.bindings_for(&project, &folder_id).is_empty());
    assert!(store.validate(&project).is_empty());
    Ok(())
}

#[test]
fn moving_an_asset_carries_its_sidecar() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let mut project = Project::init(tmp.path(), false)?;
    write_file(tmp.path(), "A/a.png", b"png")?;
    write_preset(tmp.path(), "x.preset", "X", "texture", &[("srgb", json!(true))])?;

    let mut store = BindingStore::load(&project)?;
    bind(&mut project, &mut store, "A", "x.preset")?;

    let mut catalog = PresetCatalog::new();
    import_assets(
        &project,
        &store,
        &mut catalog,
        Path::new(""),
        false,
        &mut NoopObserver,
    );
    assert!(tmp.path().join("A/a.png.import").exists());

    project.move_path(Path::new("A/a.png"), Path::new("A/renamed.png"))?;
    assert!(!tmp.path().join("A/a.png.import").exists());

    let importer = project
        .importer_for(Path::new("A/renamed.png"))?
        .context("importer after move")?;
    assert!(!importer.settings_missing);
    assert_eq!(importer.settings.properties.get("srgb"), Some(&json!(true)));
    Ok(())
}

#[test]
fn catalog_caches_until_invalidated() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let project = Project::init(tmp.path(), false)?;
    write_preset(tmp.path(), "presets/a.preset", "A", "texture", &[])?;
    write_preset(tmp.path(), "presets/b.preset", "B", "audio", &[])?;

    let mut catalog = PresetCatalog::new();
    assert_eq!(catalog.all(&project)?.len(), 2);

    // New preset assets are invisible until the change is signaled.
    write_preset(tmp.path(), "presets/c.preset", "C", "texture", &[])?;
    assert_eq!(catalog.all(&project)?.len(), 2);

    catalog.invalidate();
    let names: Vec<&str> = catalog
        .all(&project)?
        .iter()
        .map(|entry| entry.preset.name.as_str())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    Ok(())
}

#[test]
fn catalog_filters_by_importer_compatibility() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let project = Project::init(tmp.path(), false)?;
    write_file(tmp.path(), "A/img.png", b"png")?;
    write_file(tmp.path(), "A/clip.wav", b"wav")?;
    write_preset(tmp.path(), "presets/tex.preset", "Tex", "texture", &[])?;
    write_preset(tmp.path(), "presets/snd.preset", "Snd", "audio", &[])?;
    write_file(tmp.path(), "presets/broken.preset", b"not json")?;

    let mut catalog = PresetCatalog::new();

    let png = project
        .importer_for(Path::new("A/img.png"))?
        .context("png importer")?;
    assert_eq!(png.family, ImporterFamily::Texture);
    let available = catalog.available_for(&project, &png.descriptor())?;
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].preset.name, "Tex");
    assert!(catalog.exists_compatible(&project, &png.descriptor())?);

    let wav = project
        .importer_for(Path::new("A/clip.wav"))?
        .context("wav importer")?;
    let available = catalog.available_for(&project, &wav.descriptor())?;
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].preset.name, "Snd");

    // The broken preset file is skipped, not fatal.
    assert_eq!(catalog.all(&project)?.len(), 2);
    Ok(())
}

#[test]
fn identifiers_are_minted_once_and_lazily() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let mut project = Project::init(tmp.path(), false)?;
    write_file(tmp.path(), "A/img.PNG", b"png")?;

    assert!(project.existing_identifier_of(Path::new("A")).is_none());
    let id = project.identifier_of(Path::new("A"))?;
    assert_eq!(project.identifier_of(Path::new("A"))?, id);
    assert_eq!(project.existing_identifier_of(Path::new("A")), Some(id.clone()));

    // The index survives a reopen.
    let reopened = Project::open(tmp.path())?;
    assert_eq!(reopened.existing_identifier_of(Path::new("A")), Some(id));

    // Extension matching is case-insensitive.
    let importer = reopened
        .importer_for(Path::new("A/img.PNG"))?
        .context("importer for img.PNG")?;
    assert_eq!(importer.family, ImporterFamily::Texture);
    Ok(())
}
