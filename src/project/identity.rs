use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::AssetId;

use super::{Project, rel_to_string, write_atomic};

#[derive(Debug, Serialize, Deserialize)]
struct IdentityFile {
    version: u32,

    #[serde(default)]
    next_seq: u64,

    /// Identifier -> current project-relative path.
    #[serde(default)]
    ids: BTreeMap<String, String>,
}

/// The stable-identifier index: id -> current path, plus the derived reverse
/// map. Identifiers are minted once and survive renames; moves only re-point
/// the path side.
#[derive(Debug, Default)]
pub struct IdentityIndex {
    next_seq: u64,
    paths_by_id: BTreeMap<String, String>,
    ids_by_path: HashMap<String, String>,
}

impl IdentityIndex {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(path).context("read identity.json")?;
        let file: IdentityFile = serde_json::from_slice(&bytes).context("parse identity.json")?;
        if file.version != 1 {
            anyhow::bail!("unsupported identity index version {}", file.version);
        }

        let ids_by_path = file
            .ids
            .iter()
            .map(|(id, path)| (path.clone(), id.clone()))
            .collect();
        Ok(Self {
            next_seq: file.next_seq,
            paths_by_id: file.ids,
            ids_by_path,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = IdentityFile {
            version: 1,
            next_seq: self.next_seq,
            ids: self.paths_by_id.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&file).context("serialize identity index")?;
        write_atomic(path, &bytes).context("write identity.json")?;
        Ok(())
    }

    pub fn id_for_path(&self, rel: &str) -> Option<AssetId> {
        self.ids_by_path.get(rel).map(|id| AssetId(id.clone()))
    }

    pub fn path_for_id(&self, id: &AssetId) -> Option<&str> {
        self.paths_by_id.get(id.as_str()).map(String::as_str)
    }

    pub fn allocate(&mut self, rel: &str) -> AssetId {
        // The path only seeds the hash; after allocation the id is pinned to
        // whatever path the index currently maps it to.
        let seed = format!("{}:{}", self.next_seq, rel);
        let id = blake3::hash(seed.as_bytes()).to_hex().to_string();
        self.next_seq += 1;
        self.paths_by_id.insert(id.clone(), rel.to_string());
        self.ids_by_path.insert(rel.to_string(), id.clone());
        AssetId(id)
    }

    /// Re-point `from` (and everything beneath it) to `to` after a move.
    pub fn repoint(&mut self, from: &str, to: &str) {
        let prefix = format!("{}/", from);
        let mut moved = Vec::new();
        for (id, path) in &self.paths_by_id {
            if path == from {
                moved.push((id.clone(), to.to_string()));
            } else if let Some(rest) = path.strip_prefix(&prefix) {
                moved.push((id.clone(), format!("{}/{}", to, rest)));
            }
        }
        for (id, new_path) in moved {
            if let Some(old) = self.paths_by_id.insert(id.clone(), new_path.clone()) {
                self.ids_by_path.remove(&old);
            }
            self.ids_by_path.insert(new_path, id);
        }
    }
}

impl Project {
    /// Stable identifier for a path, minting one on first sight. The new
    /// allocation is persisted immediately.
    pub fn identifier_of(&mut self, rel: &Path) -> Result<AssetId> {
        let rel = rel_to_string(rel)?;
        if let Some(id) = self.identity.id_for_path(&rel) {
            return Ok(id);
        }
        let id = self.identity.allocate(&rel);
        self.identity
            .save(&self.identity_path())
            .context("persist identity index")?;
        Ok(id)
    }

    /// Lookup-only variant: a path that was never bound has no identifier.
    pub fn existing_identifier_of(&self, rel: &Path) -> Option<AssetId> {
        let rel = rel_to_string(rel).ok()?;
        self.identity.id_for_path(&rel)
    }

    /// Current path for an identifier, or None when it no longer resolves.
    pub fn path_of(&self, id: &AssetId) -> Option<PathBuf> {
        self.identity.path_for_id(id).map(PathBuf::from)
    }
}
