//! Flat-file data store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Location of the JSON documents backing users, entities and permissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding all data files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// User profile list, relative to `data_dir`.
    #[serde(default = "default_users_file")]
    pub users_file: String,
    /// Entity catalog, relative to `data_dir`.
    #[serde(default = "default_entities_file")]
    pub entities_file: String,
    /// Global and entity-scoped permission document, relative to `data_dir`.
    #[serde(default = "default_permissions_file")]
    pub permissions_file: String,
}

impl StoreConfig {
    /// Build a config rooted at the given directory with default file names.
    pub fn in_dir(data_dir: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Absolute-or-relative path of the users file.
    pub fn users_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.users_file)
    }

    /// Absolute-or-relative path of the entities file.
    pub fn entities_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.entities_file)
    }

    /// Absolute-or-relative path of the permissions file.
    pub fn permissions_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.permissions_file)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            users_file: default_users_file(),
            entities_file: default_entities_file(),
            permissions_file: default_permissions_file(),
        }
    }
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_users_file() -> String {
    "users.json".to_string()
}

fn default_entities_file() -> String {
    "entities.json".to_string()
}

fn default_permissions_file() -> String {
    "permissions.json".to_string()
}
