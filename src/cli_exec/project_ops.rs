use std::path::PathBuf;

use anyhow::{Context, Result};

use cascade::project::Project;

use super::open_project;

pub(crate) fn handle_init_command(force: bool, path: Option<PathBuf>) -> Result<()> {
    let root = match path {
        Some(path) => path,
        None => std::env::current_dir().context("get current dir")?,
    };
    Project::init(&root, force)?;
    println!("Initialized cascade project at {}", root.display());
    Ok(())
}

pub(crate) fn handle_mv_command(from: PathBuf, to: PathBuf) -> Result<()> {
    let mut project = open_project()?;
    project.move_path(&from, &to)?;
    println!("Moved {} -> {}", from.display(), to.display());
    Ok(())
}
