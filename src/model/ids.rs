use serde::{Deserialize, Serialize};

/// Stable identifier for a project asset (folder or preset file).
///
/// Identifiers are allocated once by the identity index and keep naming the
/// same object across renames and moves; only the index knows the current
/// path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
