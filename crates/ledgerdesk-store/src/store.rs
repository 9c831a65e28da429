//! The data directory with its transactional update discipline.

use std::path::PathBuf;

use tokio::sync::Mutex;
use tracing::{debug, info};

use ledgerdesk_core::config::StoreConfig;
use ledgerdesk_core::error::{AppError, ErrorKind};
use ledgerdesk_core::result::AppResult;
use ledgerdesk_entity::entity::EntityCatalog;
use ledgerdesk_entity::permission::PermissionDocument;
use ledgerdesk_entity::user::UserProfile;

use crate::document::JsonDocument;
use crate::state::DataState;

/// Handle to the flat-file data directory.
///
/// All reads and writes go through one async mutex, so a request's
/// read-modify-write can never interleave with another one in this process.
#[derive(Debug)]
pub struct DataStore {
    root: PathBuf,
    users: JsonDocument<Vec<UserProfile>>,
    entities: JsonDocument<EntityCatalog>,
    permissions: JsonDocument<PermissionDocument>,
    lock: Mutex<()>,
}

impl DataStore {
    /// Open the data directory described by `config`, creating it if needed.
    pub async fn open(config: &StoreConfig) -> AppResult<Self> {
        let root = PathBuf::from(&config.data_dir);
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create data directory: {}", root.display()),
                e,
            )
        })?;

        info!(data_dir = %root.display(), "Opened data store");

        Ok(Self {
            root,
            users: JsonDocument::new(config.users_path()),
            entities: JsonDocument::new(config.entities_path()),
            permissions: JsonDocument::new(config.permissions_path()),
            lock: Mutex::new(()),
        })
    }

    /// The data directory.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Read a consistent snapshot of all documents.
    pub async fn snapshot(&self) -> AppResult<DataState> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Run one read-modify-write transaction.
    ///
    /// `apply` receives the freshly loaded state. If it returns an error
    /// nothing is written. Otherwise every changed document is staged first
    /// and the targets are only replaced once all staged writes succeeded.
    pub async fn update<F, R>(&self, apply: F) -> AppResult<R>
    where
        F: FnOnce(&mut DataState) -> AppResult<R>,
    {
        let _guard = self.lock.lock().await;
        let original = self.load().await?;
        let mut state = original.clone();

        let result = apply(&mut state)?;

        let mut staged = Vec::new();
        let outcome = async {
            if state.permissions != original.permissions {
                staged.push(self.permissions.stage(&state.permissions).await?);
            }
            if state.entities != original.entities {
                staged.push(self.entities.stage(&state.entities).await?);
            }
            if state.users != original.users {
                staged.push(self.users.stage(&state.users).await?);
            }
            Ok::<(), AppError>(())
        }
        .await;

        if let Err(e) = outcome {
            for file in &staged {
                file.discard().await;
            }
            return Err(e);
        }

        for file in staged {
            file.commit().await?;
        }

        Ok(result)
    }

    /// Check that the data directory is usable.
    pub async fn health_check(&self) -> AppResult<bool> {
        Ok(tokio::fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn load(&self) -> AppResult<DataState> {
        let state = DataState {
            users: self.users.read().await?,
            entities: self.entities.read().await?,
            permissions: self.permissions.read().await?,
        };
        debug!(
            users = state.users.len(),
            entities = state.entities.len(),
            "Loaded data files"
        );
        Ok(state)
    }
}
