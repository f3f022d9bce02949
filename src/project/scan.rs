use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::Project;

/// Asset files are everything except control/sidecar artifacts: hidden
/// files, `*.import` sidecars, and `*.preset` files (presets configure
/// imports, they do not take them).
pub(crate) fn is_asset_name(name: &str) -> bool {
    !name.starts_with('.') && !name.ends_with(".import") && !name.ends_with(".preset")
}

impl Project {
    /// Direct asset files of a folder, as sorted project-relative paths.
    pub fn asset_files(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        let dir = self.root.join(folder);
        let mut out = Vec::new();
        for entry in
            fs::read_dir(&dir).with_context(|| format!("read dir {}", dir.display()))?
        {
            let entry = entry.with_context(|| format!("read dir entry in {}", dir.display()))?;
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if !is_asset_name(&name) {
                continue;
            }
            out.push(folder.join(name));
        }
        out.sort();
        Ok(out)
    }

    /// Immediate subfolders of a folder, as sorted project-relative paths.
    /// Hidden directories (including the control dir) are not part of the
    /// asset tree.
    pub fn subfolders(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        let dir = self.root.join(folder);
        let mut out = Vec::new();
        for entry in
            fs::read_dir(&dir).with_context(|| format!("read dir {}", dir.display()))?
        {
            let entry = entry.with_context(|| format!("read dir entry in {}", dir.display()))?;
            if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            out.push(folder.join(name));
        }
        out.sort();
        Ok(out)
    }

    /// Every `*.preset` file under the project root, sorted for
    /// deterministic catalog order.
    pub fn preset_files(&self) -> Result<Vec<PathBuf>> {
        let mut out = Vec::new();
        collect_presets(self, Path::new(""), &mut out)?;
        out.sort();
        Ok(out)
    }
}

fn collect_presets(project: &Project, folder: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let dir = project.root.join(folder);
    for entry in fs::read_dir(&dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read dir entry in {}", dir.display()))?;
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_presets(project, &folder.join(name), out)?;
        } else if file_type.is_file() && name.ends_with(".preset") {
            out.push(folder.join(name));
        }
    }
    Ok(())
}
