//! Store Configuration
//!
//! Names of the convention fields a store maintains, and whether it logs
//! its operations.

use serde::{Deserialize, Serialize};

use super::errors::StoreResult;

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Field set to the insertion time on first save, when declared
    /// (default: "created_at")
    #[serde(default = "default_created_field")]
    pub created_field: String,

    /// Field set to the save time on every save, when declared
    /// (default: "last_modified_at")
    #[serde(default = "default_modified_field")]
    pub modified_field: String,

    /// Log every insert, update, find and delete (default: true)
    #[serde(default = "default_log_operations")]
    pub log_operations: bool,
}

fn default_created_field() -> String {
    "created_at".to_string()
}

fn default_modified_field() -> String {
    "last_modified_at".to_string()
}

fn default_log_operations() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            created_field: default_created_field(),
            modified_field: default_modified_field(),
            log_operations: default_log_operations(),
        }
    }
}

impl StoreConfig {
    /// Parses a JSON configuration; missing keys take their defaults.
    pub fn from_json(json: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Config without operation logging
    pub fn quiet() -> Self {
        Self {
            log_operations: false,
            ..Default::default()
        }
    }
}
