use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use super::open_project_and_store;

pub(crate) fn handle_bind_command(folder: PathBuf, preset: PathBuf) -> Result<()> {
    let (mut project, mut store) = open_project_and_store()?;

    if !project.root.join(&folder).is_dir() {
        anyhow::bail!("not a folder in this project: {}", folder.display());
    }
    project
        .load_preset(&preset)
        .with_context(|| format!("not a usable preset: {}", preset.display()))?;

    let folder_id = project.identifier_of(&folder)?;
    let preset_id = project.identifier_of(&preset)?;
    store.set_binding(folder_id, preset_id);
    store.save(&project)?;
    println!("Bound {} -> {}", preset.display(), folder.display());
    Ok(())
}

pub(crate) fn handle_unbind_command(folder: PathBuf) -> Result<()> {
    let (project, mut store) = open_project_and_store()?;
    let Some(folder_id) = project.existing_identifier_of(&folder) else {
        println!("No binding for {}", folder.display());
        return Ok(());
    };
    store.clear_binding(&folder_id);
    store.save(&project)?;
    println!("Unbound {}", folder.display());
    Ok(())
}

pub(crate) fn handle_unbind_all_command(folder: PathBuf) -> Result<()> {
    let (project, mut store) = open_project_and_store()?;
    let Some(folder_id) = project.existing_identifier_of(&folder) else {
        println!("No binding for {}", folder.display());
        return Ok(());
    };
    store.clear_all_bindings(&folder_id);
    store.save(&project)?;
    println!("Unbound all presets for {}", folder.display());
    Ok(())
}

#[derive(Serialize)]
struct BindingView {
    folder: Option<String>,
    preset: Option<String>,
    excluded_properties: Vec<String>,
}

pub(crate) fn handle_bindings_command(json: bool) -> Result<()> {
    let (project, store) = open_project_and_store()?;

    let views: Vec<BindingView> = store
        .bindings()
        .iter()
        .map(|binding| BindingView {
            folder: project
                .path_of(&binding.folder)
                .map(|p| p.display().to_string()),
            preset: project
                .path_of(&binding.preset)
                .map(|p| p.display().to_string()),
            excluded_properties: binding.excluded_properties.clone(),
        })
        .collect();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&views).context("serialize bindings json")?
        );
    } else if views.is_empty() {
        println!("No bindings");
    } else {
        for view in views {
            let folder = view.folder.unwrap_or_else(|| "<dangling>".to_string());
            let preset = view.preset.unwrap_or_else(|| "<dangling>".to_string());
            if view.excluded_properties.is_empty() {
                println!("{} -> {}", preset, folder);
            } else {
                println!(
                    "{} -> {} (excluding {})",
                    preset,
                    folder,
                    view.excluded_properties.join(", ")
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn handle_exclude_command(
    folder: PathBuf,
    property: String,
    excluded: bool,
) -> Result<()> {
    let (project, mut store) = open_project_and_store()?;
    let Some(folder_id) = project.existing_identifier_of(&folder) else {
        anyhow::bail!("no binding for {}", folder.display());
    };
    if !store.bindings().iter().any(|b| b.folder == folder_id) {
        anyhow::bail!("no binding for {}", folder.display());
    }
    store.set_property_excluded(&folder_id, &property, excluded);
    store.save(&project)?;
    if excluded {
        println!("Excluded {} for {}", property, folder.display());
    } else {
        println!("Included {} for {}", property, folder.display());
    }
    Ok(())
}

pub(crate) fn handle_validate_command() -> Result<()> {
    let (project, mut store) = open_project_and_store()?;
    let pruned = store.validate(&project);
    store.save(&project)?;
    if pruned.is_empty() {
        println!("All bindings valid");
    } else {
        for binding in &pruned {
            let folder = project
                .path_of(&binding.folder)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| binding.folder.as_str().to_string());
            println!("Pruned binding for {}", folder);
        }
        println!("Removed {} invalid binding(s)", pruned.len());
    }
    Ok(())
}
