use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::{Project, rel_to_string};

impl Project {
    /// Move/rename a path within the project, keeping stable identifiers
    /// valid: the identity index is re-pointed for the moved path and
    /// everything beneath it, and a file's settings sidecar travels with it.
    pub fn move_path(&mut self, from: &Path, to: &Path) -> Result<()> {
        let from_rel = rel_to_string(from)?;
        let to_rel = rel_to_string(to)?;

        if from_rel.is_empty() || to_rel.is_empty() {
            anyhow::bail!("cannot move the project root");
        }
        if from_rel == to_rel {
            return Ok(());
        }

        // Disallow messing with internal dirs.
        if from_rel.starts_with(".cascade") || to_rel.starts_with(".cascade") {
            anyhow::bail!("refusing to move .cascade");
        }
        if from_rel.starts_with(".git") || to_rel.starts_with(".git") {
            anyhow::bail!("refusing to move .git");
        }

        let from_abs = self.root.join(&from_rel);
        let to_abs = self.root.join(&to_rel);

        if !from_abs.exists() {
            anyhow::bail!("source does not exist: {}", from_rel);
        }
        if to_abs.exists() {
            anyhow::bail!("destination already exists: {}", to_rel);
        }

        if let Some(parent) = to_abs.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dirs {}", parent.display()))?;
        }

        fs::rename(&from_abs, &to_abs)
            .with_context(|| format!("move {} -> {}", from_rel, to_rel))?;

        if to_abs.is_file() {
            let from_sidecar = self.root.join(self.sidecar_path(Path::new(&from_rel)));
            if from_sidecar.is_file() {
                let to_sidecar = self.root.join(self.sidecar_path(Path::new(&to_rel)));
                fs::rename(&from_sidecar, &to_sidecar).with_context(|| {
                    format!("move sidecar {}", from_sidecar.display())
                })?;
            }
        }

        self.identity.repoint(&from_rel, &to_rel);
        self.identity
            .save(&self.identity_path())
            .context("persist identity index")?;
        Ok(())
    }
}
