use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::model::ProjectConfig;

use super::{IdentityIndex, Project, write_atomic};

impl Project {
    pub fn init(root: &Path, force: bool) -> Result<Self> {
        let control = Self::control_dir(root);
        if control.exists() && !force {
            return Err(anyhow!(
                "{} already exists at {} (use --force to re-init)",
                super::CONTROL_DIR,
                control.display()
            ));
        }
        fs::create_dir_all(&control).context("create control dir")?;

        let config = ProjectConfig::default();
        let config_bytes = serde_json::to_vec_pretty(&config).context("serialize config")?;
        write_atomic(&control.join("config.json"), &config_bytes).context("write config.json")?;

        let identity = IdentityIndex::default();
        identity
            .save(&control.join("identity.json"))
            .context("write identity.json")?;

        Ok(Self {
            root: root.to_path_buf(),
            config,
            identity,
        })
    }

    pub fn open(root: &Path) -> Result<Self> {
        let control = Self::control_dir(root);
        if !control.is_dir() {
            return Err(anyhow!(
                "No {} directory found at {} (run `cascade init`)",
                super::CONTROL_DIR,
                control.display()
            ));
        }

        let config = read_config(&control.join("config.json"))?;
        let identity = IdentityIndex::load(&control.join("identity.json"))?;

        Ok(Self {
            root: root.to_path_buf(),
            config,
            identity,
        })
    }

    /// Walk ancestors of `start` until a `.cascade/` directory is found.
    pub fn discover(start: &Path) -> Result<Self> {
        let start = start
            .canonicalize()
            .with_context(|| format!("canonicalize {}", start.display()))?;
        for dir in start.ancestors() {
            if Self::control_dir(dir).is_dir() {
                return Self::open(dir);
            }
        }
        Err(anyhow!(
            "No {} directory found (run `cascade init`)",
            super::CONTROL_DIR
        ))
    }

    pub fn write_config(&self) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.config).context("serialize config")?;
        write_atomic(&self.config_path(), &bytes).context("write config.json")?;
        Ok(())
    }
}

fn read_config(path: &Path) -> Result<ProjectConfig> {
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }
    let bytes = fs::read(path).context("read config.json")?;
    let config: ProjectConfig = serde_json::from_slice(&bytes).context("parse config.json")?;
    if config.version != 1 {
        anyhow::bail!("unsupported project config version {}", config.version);
    }
    Ok(config)
}
