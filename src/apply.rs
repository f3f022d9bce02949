use std::path::Path;

use tracing::{debug, warn};

use crate::catalog::PresetCatalog;
use crate::model::Importer;
use crate::project::Project;
use crate::resolve::resolve_with_inheritance;
use crate::store::BindingStore;

/// Why an asset was left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// No binding resolved for the asset's folder or any ancestor.
    NoPresetResolved,
    /// A preset resolved but the importer rejected the apply.
    ApplyRejected,
    /// The apply succeeded but the settings sidecar could not be written.
    PersistFailed,
}

/// Observability hook for the otherwise silent best-effort apply paths.
/// Applies never raise; integrators who need to diagnose skipped assets
/// implement this (all methods default to no-ops).
pub trait ApplyObserver {
    fn on_applied(&mut self, _asset: &Path, _preset_name: &str, _owning_folder: &Path) {}
    fn on_skipped(&mut self, _asset: &Path, _reason: SkipReason) {}
    fn on_branch_error(&mut self, _folder: &Path, _error: &anyhow::Error) {}
}

/// The default observer: events go to `tracing` only.
pub struct NoopObserver;

impl ApplyObserver for NoopObserver {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: u64,
    pub skipped: u64,
    pub rejected: u64,
    pub branch_errors: u64,
}

/// Resolve a preset for `folder` (with inheritance) and apply it to the
/// importer; on success trigger the reimport and persist the sidecar.
///
/// Best-effort by design: nothing resolving, a rejected apply, or a failed
/// sidecar write all degrade to `false` — an import is never blocked by
/// stale preset data.
pub fn apply_to_importer(
    project: &Project,
    store: &BindingStore,
    folder: &Path,
    importer: &mut Importer,
    observer: &mut dyn ApplyObserver,
) -> bool {
    let Some(resolved) = resolve_with_inheritance(project, store, folder, importer) else {
        debug!(asset = %importer.asset_path.display(), "no preset resolved");
        observer.on_skipped(&importer.asset_path, SkipReason::NoPresetResolved);
        return false;
    };

    if !resolved
        .preset
        .preset
        .apply(importer, &resolved.preset.filter)
    {
        debug!(
            asset = %importer.asset_path.display(),
            preset = %resolved.preset.preset.name,
            "apply rejected by importer"
        );
        observer.on_skipped(&importer.asset_path, SkipReason::ApplyRejected);
        return false;
    }

    if let Err(err) = project.commit_reimport(importer) {
        warn!(asset = %importer.asset_path.display(), %err, "reimport not persisted");
        observer.on_skipped(&importer.asset_path, SkipReason::PersistFailed);
        return false;
    }

    observer.on_applied(
        &importer.asset_path,
        &resolved.preset.preset.name,
        &resolved.owning_folder,
    );
    true
}

/// Apply resolved presets to every asset in `folder` and, recursively, in
/// every subfolder — including subfolders that declare their own bindings
/// (theirs win through resolution). A folder that fails to enumerate aborts
/// only its own branch; siblings already enumerated still run.
pub fn apply_to_subtree(
    project: &Project,
    store: &BindingStore,
    folder: &Path,
    observer: &mut dyn ApplyObserver,
) -> ApplyReport {
    let mut report = ApplyReport::default();
    apply_dir(project, store, folder, observer, &mut report);
    report
}

fn apply_dir(
    project: &Project,
    store: &BindingStore,
    folder: &Path,
    observer: &mut dyn ApplyObserver,
    report: &mut ApplyReport,
) {
    let files = match project.asset_files(folder) {
        Ok(files) => files,
        Err(err) => {
            warn!(folder = %folder.display(), %err, "subtree branch aborted");
            observer.on_branch_error(folder, &err);
            report.branch_errors += 1;
            return;
        }
    };

    for file in files {
        match project.importer_for(&file) {
            Ok(Some(mut importer)) => {
                apply_to_importer(
                    project,
                    store,
                    folder,
                    &mut importer,
                    &mut ApplyCounter(observer, report),
                );
            }
            Ok(None) => {}
            Err(err) => {
                warn!(asset = %file.display(), %err, "importer failed to load");
                observer.on_branch_error(folder, &err);
                report.branch_errors += 1;
            }
        }
    }

    let subfolders = match project.subfolders(folder) {
        Ok(subfolders) => subfolders,
        Err(err) => {
            warn!(folder = %folder.display(), %err, "subtree branch aborted");
            observer.on_branch_error(folder, &err);
            report.branch_errors += 1;
            return;
        }
    };

    for subfolder in subfolders {
        apply_dir(project, store, &subfolder, observer, report);
    }
}

/// Forwards events while folding skip reasons into the report counters.
struct ApplyCounter<'a>(&'a mut dyn ApplyObserver, &'a mut ApplyReport);

impl ApplyObserver for ApplyCounter<'_> {
    fn on_applied(&mut self, asset: &Path, preset_name: &str, owning_folder: &Path) {
        self.1.applied += 1;
        self.0.on_applied(asset, preset_name, owning_folder);
    }

    fn on_skipped(&mut self, asset: &Path, reason: SkipReason) {
        match reason {
            SkipReason::NoPresetResolved => self.1.skipped += 1,
            SkipReason::ApplyRejected | SkipReason::PersistFailed => self.1.rejected += 1,
        }
        self.0.on_skipped(asset, reason);
    }

    fn on_branch_error(&mut self, folder: &Path, error: &anyhow::Error) {
        self.0.on_branch_error(folder, error);
    }
}

/// The import-pipeline hook: walk `folder` and apply settings to every asset
/// whose import settings are missing (`reapply_all` forces reapplication).
/// Preset files seen during the walk invalidate the catalog cache, mirroring
/// the "preset asset changed" signal from the host pipeline.
pub fn import_assets(
    project: &Project,
    store: &BindingStore,
    catalog: &mut PresetCatalog,
    folder: &Path,
    reapply_all: bool,
    observer: &mut dyn ApplyObserver,
) -> ApplyReport {
    let mut report = ApplyReport::default();
    import_dir(project, store, catalog, folder, reapply_all, observer, &mut report);
    report
}

fn import_dir(
    project: &Project,
    store: &BindingStore,
    catalog: &mut PresetCatalog,
    folder: &Path,
    reapply_all: bool,
    observer: &mut dyn ApplyObserver,
    report: &mut ApplyReport,
) {
    let dir = project.root.join(folder);
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(err) => {
            let err = anyhow::Error::new(err).context(format!("read dir {}", dir.display()));
            warn!(folder = %folder.display(), %err, "import branch aborted");
            observer.on_branch_error(folder, &err);
            report.branch_errors += 1;
            return;
        }
    };
    for entry in entries.flatten() {
        if let Some(name) = entry.file_name().to_str()
            && name.ends_with(".preset")
        {
            catalog.invalidate();
        }
    }

    let files = match project.asset_files(folder) {
        Ok(files) => files,
        Err(_) => return,
    };
    for file in files {
        match project.importer_for(&file) {
            Ok(Some(mut importer)) => {
                if !importer.settings_missing && !reapply_all {
                    continue;
                }
                apply_to_importer(
                    project,
                    store,
                    folder,
                    &mut importer,
                    &mut ApplyCounter(observer, report),
                );
            }
            Ok(None) => {}
            Err(err) => {
                warn!(asset = %file.display(), %err, "importer failed to load");
                observer.on_branch_error(folder, &err);
                report.branch_errors += 1;
            }
        }
    }

    let subfolders = match project.subfolders(folder) {
        Ok(subfolders) => subfolders,
        Err(_) => return,
    };
    for subfolder in subfolders {
        import_dir(project, store, catalog, &subfolder, reapply_all, observer, report);
    }
}
