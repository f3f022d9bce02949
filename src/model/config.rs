use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub version: u32,

    /// Maximum number of ancestor folders consulted during inheritance
    /// resolution. None walks all the way up to the project root.
    #[serde(default)]
    pub max_search_depth: Option<u32>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            version: 1,
            max_search_depth: None,
        }
    }
}
