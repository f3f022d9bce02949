use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::model::{Importer, ImporterFamily, ImportSettings};

use super::{Project, scan, write_atomic};

impl Project {
    /// Path of the settings sidecar for an asset (`<asset>.import`),
    /// project-relative.
    pub fn sidecar_path(&self, asset_rel: &Path) -> PathBuf {
        let mut os = asset_rel.as_os_str().to_os_string();
        os.push(".import");
        PathBuf::from(os)
    }

    /// Load the importer for an asset path. Returns None when the path is
    /// not an importable asset file. A corrupt or mismatched sidecar is
    /// treated as missing settings rather than an error.
    pub fn importer_for(&self, asset_rel: &Path) -> Result<Option<Importer>> {
        let abs = self.root.join(asset_rel);
        if !abs.is_file() {
            return Ok(None);
        }
        let Some(name) = asset_rel.file_name().and_then(|n| n.to_str()) else {
            return Ok(None);
        };
        if !scan::is_asset_name(name) {
            return Ok(None);
        }

        let family = asset_rel
            .extension()
            .and_then(|e| e.to_str())
            .map(ImporterFamily::for_extension)
            .unwrap_or(ImporterFamily::Default);

        let sidecar = self.root.join(self.sidecar_path(asset_rel));
        let (settings, settings_missing) = if sidecar.is_file() {
            let bytes = fs::read(&sidecar)
                .with_context(|| format!("read sidecar {}", sidecar.display()))?;
            match serde_json::from_slice::<ImportSettings>(&bytes) {
                Ok(settings) if settings.version == 1 && settings.family == family => {
                    (settings, false)
                }
                Ok(_) => {
                    tracing::warn!(asset = %asset_rel.display(), "stale sidecar, treating settings as missing");
                    (ImportSettings::new(family), true)
                }
                Err(err) => {
                    tracing::warn!(asset = %asset_rel.display(), %err, "unreadable sidecar, treating settings as missing");
                    (ImportSettings::new(family), true)
                }
            }
        } else {
            (ImportSettings::new(family), true)
        };

        Ok(Some(Importer {
            asset_path: asset_rel.to_path_buf(),
            family,
            settings,
            settings_missing,
        }))
    }

    pub fn save_import_settings(&self, importer: &Importer) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&importer.settings)
            .context("serialize import settings")?;
        let sidecar = self.root.join(self.sidecar_path(&importer.asset_path));
        write_atomic(&sidecar, &bytes)
            .with_context(|| format!("write sidecar {}", sidecar.display()))?;
        Ok(())
    }

    /// Trigger the importer's reimport and persist the sidecar.
    pub fn commit_reimport(&self, importer: &mut Importer) -> Result<()> {
        importer.trigger_reimport(now_rfc3339()?);
        self.save_import_settings(importer)
    }
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format timestamp")
}
