use anyhow::{Context, Result};

use cascade::project::Project;
use cascade::store::BindingStore;

mod applying;
mod bindings;
mod project_ops;

pub(crate) use self::applying::{
    handle_apply_command, handle_import_command, handle_presets_command, handle_resolve_command,
};
pub(crate) use self::bindings::{
    handle_bind_command, handle_bindings_command, handle_exclude_command, handle_unbind_all_command,
    handle_unbind_command, handle_validate_command,
};
pub(crate) use self::project_ops::{handle_init_command, handle_mv_command};

fn open_project() -> Result<Project> {
    Project::discover(&std::env::current_dir().context("get current dir")?)
}

fn open_project_and_store() -> Result<(Project, BindingStore)> {
    let project = open_project()?;
    let store = BindingStore::load(&project)?;
    Ok((project, store))
}
