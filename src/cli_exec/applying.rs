use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use cascade::apply::{self, ApplyObserver, SkipReason};
use cascade::catalog::PresetCatalog;
use cascade::resolve;

use super::open_project_and_store;

/// Narrates apply progress on stdout; skips stay on the tracing channel.
struct PrintObserver;

impl ApplyObserver for PrintObserver {
    fn on_applied(&mut self, asset: &Path, preset_name: &str, owning_folder: &Path) {
        let owner = if owning_folder.as_os_str().is_empty() {
            ".".to_string()
        } else {
            owning_folder.display().to_string()
        };
        println!("applied {} -> {} (from {})", preset_name, asset.display(), owner);
    }

    fn on_skipped(&mut self, asset: &Path, reason: SkipReason) {
        if reason == SkipReason::ApplyRejected {
            println!("rejected {}", asset.display());
        }
    }
}

#[derive(Serialize)]
struct PresetView {
    name: String,
    family: String,
    path: String,
}

pub(crate) fn handle_presets_command(
    asset: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let (project, _store) = open_project_and_store()?;
    let mut catalog = PresetCatalog::new();

    let entries = match asset {
        Some(asset) => {
            let importer = project
                .importer_for(&asset)?
                .with_context(|| format!("not an importable asset: {}", asset.display()))?;
            catalog.available_for(&project, &importer.descriptor())?
        }
        None => catalog.all(&project)?.to_vec(),
    };

    let views: Vec<PresetView> = entries
        .iter()
        .map(|entry| PresetView {
            name: entry.preset.name.clone(),
            family: format!("{:?}", entry.preset.family).to_lowercase(),
            path: entry.path.display().to_string(),
        })
        .collect();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&views).context("serialize presets json")?
        );
    } else if views.is_empty() {
        println!("No presets");
    } else {
        for view in views {
            println!("{} [{}] {}", view.name, view.family, view.path);
        }
    }
    Ok(())
}

pub(crate) fn handle_resolve_command(asset: PathBuf, json: bool) -> Result<()> {
    let (project, store) = open_project_and_store()?;
    let importer = project
        .importer_for(&asset)?
        .with_context(|| format!("not an importable asset: {}", asset.display()))?;
    let folder = asset.parent().unwrap_or(Path::new("")).to_path_buf();

    let resolved = resolve::resolve_with_inheritance(&project, &store, &folder, &importer);

    if json {
        #[derive(Serialize)]
        struct ResolveView {
            preset: Option<String>,
            owning_folder: Option<String>,
            properties: Vec<String>,
        }
        let view = match &resolved {
            Some(resolved) => ResolveView {
                preset: Some(resolved.preset.preset.name.clone()),
                owning_folder: Some(resolved.owning_folder.display().to_string()),
                properties: resolved.preset.filter.clone(),
            },
            None => ResolveView {
                preset: None,
                owning_folder: None,
                properties: Vec::new(),
            },
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&view).context("serialize resolve json")?
        );
    } else {
        match resolved {
            Some(resolved) => {
                println!("preset: {}", resolved.preset.preset.name);
                println!("from: {}", resolved.owning_folder.display());
                println!("properties: {}", resolved.preset.filter.join(", "));
            }
            None => println!("No preset resolves for {}", asset.display()),
        }
    }
    Ok(())
}

pub(crate) fn handle_apply_command(folder: PathBuf) -> Result<()> {
    let (project, store) = open_project_and_store()?;
    if !project.root.join(&folder).is_dir() {
        anyhow::bail!("not a folder in this project: {}", folder.display());
    }

    let report = apply::apply_to_subtree(&project, &store, &folder, &mut PrintObserver);
    println!(
        "applied {} skipped {} rejected {} branch errors {}",
        report.applied, report.skipped, report.rejected, report.branch_errors
    );
    Ok(())
}

pub(crate) fn handle_import_command(path: Option<PathBuf>, all: bool) -> Result<()> {
    let (project, store) = open_project_and_store()?;
    let folder = path.unwrap_or_default();
    if !project.root.join(&folder).is_dir() {
        anyhow::bail!("not a folder in this project: {}", folder.display());
    }

    let mut catalog = PresetCatalog::new();
    let report = apply::import_assets(&project, &store, &mut catalog, &folder, all, &mut PrintObserver);
    println!(
        "applied {} skipped {} rejected {} branch errors {}",
        report.applied, report.skipped, report.rejected, report.branch_errors
    );
    Ok(())
}
