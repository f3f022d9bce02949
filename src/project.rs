use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::ProjectConfig;

mod identity;
mod importers;
mod path_ops;
mod presets;
mod root_lifecycle;
mod scan;

use self::identity::IdentityIndex;

const CONTROL_DIR: &str = ".cascade";

/// An asset project: a directory tree initialized with a `.cascade/` control
/// directory. Owns the identity index and the project configuration; all
/// engine-facing paths are relative to `root`.
pub struct Project {
    pub root: PathBuf,
    pub config: ProjectConfig,
    identity: IdentityIndex,
}

impl Project {
    pub fn control_dir(root: &Path) -> PathBuf {
        root.join(CONTROL_DIR)
    }

    pub(crate) fn control_path(&self, name: &str) -> PathBuf {
        Self::control_dir(&self.root).join(name)
    }

    pub fn bindings_path(&self) -> PathBuf {
        self.control_path("bindings.json")
    }

    fn identity_path(&self) -> PathBuf {
        self.control_path("identity.json")
    }

    fn config_path(&self) -> PathBuf {
        self.control_path("config.json")
    }
}

/// Normalize a project-relative path to its canonical forward-slash string
/// form. The project root itself is the empty string.
pub(crate) fn rel_to_string(path: &Path) -> Result<String> {
    if path.is_absolute() {
        anyhow::bail!("path must be relative to the project root");
    }
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            std::path::Component::Normal(part) => {
                let part = part
                    .to_str()
                    .ok_or_else(|| anyhow::anyhow!("non-utf8 path component"))?;
                parts.push(part);
            }
            std::path::Component::CurDir => {}
            _ => anyhow::bail!("path may not contain '..' or be rooted"),
        }
    }
    Ok(parts.join("/"))
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
