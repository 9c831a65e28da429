//! User listing and the first-owner bootstrap.

use std::sync::Arc;

use tracing::info;
use validator::ValidateEmail;

use ledgerdesk_auth::AuthorizationEngine;
use ledgerdesk_auth::display::visible_users;
use ledgerdesk_core::error::AppError;
use ledgerdesk_core::result::AppResult;
use ledgerdesk_entity::permission::PermissionSet;
use ledgerdesk_entity::user::{User, UserProfile, normalize_email};
use ledgerdesk_store::DataStore;

use crate::context::RequestContext;

/// Read access to users and the owner bootstrap.
#[derive(Debug, Clone)]
pub struct UserService {
    /// Data store.
    store: Arc<DataStore>,
    /// Authorization engine.
    engine: Arc<AuthorizationEngine>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(store: Arc<DataStore>, engine: Arc<AuthorizationEngine>) -> Self {
        Self { store, engine }
    }

    /// Registers the first user as geschaeftsfuehrer.
    ///
    /// Fails with `Conflict` once any user exists.
    pub async fn bootstrap_owner(&self, email: &str, name: &str) -> AppResult<User> {
        let email = normalize_email(email);
        if !email.validate_email() {
            return Err(AppError::validation(format!("Invalid email '{email}'")));
        }

        let user = self
            .store
            .update(|state| {
                if !state.users.is_empty() {
                    return Err(AppError::conflict("The owner has already been registered"));
                }
                let profile = UserProfile::new(&email, name.trim());
                state.upsert_profile(profile.clone());
                state.set_permission_set(&profile.email, PermissionSet::unrestricted());
                Ok(User::from_parts(&profile, Some(&PermissionSet::unrestricted())))
            })
            .await?;

        info!(actor = %user.email, role = %user.role, "Owner registered");
        Ok(user)
    }

    /// Users the acting user may see.
    pub async fn list_visible(&self, ctx: &RequestContext) -> AppResult<Vec<User>> {
        let state = self.store.snapshot().await?;
        let actor = ctx.actor(&state)?;
        let users = state.all_users();
        Ok(visible_users(&self.engine, &actor, &users, &state.entities)
            .into_iter()
            .cloned()
            .collect())
    }

    /// A single user, if visible to the acting user.
    pub async fn get(&self, ctx: &RequestContext, email: &str) -> AppResult<User> {
        let email = normalize_email(email);
        self.list_visible(ctx)
            .await?
            .into_iter()
            .find(|u| u.email == email)
            .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerdesk_core::config::StoreConfig;
    use ledgerdesk_core::config::modules::default_modules;
    use ledgerdesk_core::error::ErrorKind;
    use ledgerdesk_entity::permission::ModuleCatalog;
    use ledgerdesk_entity::user::Role;

    async fn service(dir: &tempfile::TempDir) -> UserService {
        let store = DataStore::open(&StoreConfig::in_dir(dir.path().to_str().unwrap()))
            .await
            .unwrap();
        let engine = AuthorizationEngine::new(ModuleCatalog::from_config(&default_modules()));
        UserService::new(Arc::new(store), Arc::new(engine))
    }

    #[tokio::test]
    async fn test_bootstrap_owner_once() {
        let dir = tempfile::tempdir().unwrap();
        let users = service(&dir).await;

        let owner = users.bootstrap_owner("Chef@Firma.de", "Chef").await.unwrap();
        assert_eq!(owner.email, "chef@firma.de");
        assert_eq!(owner.role, Role::Geschaeftsfuehrer);

        let err = users
            .bootstrap_owner("zweiter@firma.de", "Zweiter")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_list_visible_requires_known_actor() {
        let dir = tempfile::tempdir().unwrap();
        let users = service(&dir).await;
        users.bootstrap_owner("chef@firma.de", "Chef").await.unwrap();

        let list = users
            .list_visible(&RequestContext::new("chef@firma.de"))
            .await
            .unwrap();
        assert_eq!(list.len(), 1);

        let err = users
            .list_visible(&RequestContext::new("fremd@firma.de"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
}
