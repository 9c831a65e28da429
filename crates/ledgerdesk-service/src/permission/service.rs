//! Permission checks, invitations, edits and entity overrides.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::ValidateEmail;

use ledgerdesk_auth::display::{
    EntityAccess, ModuleAccess, RoleBadge, entity_access_display, module_permissions_display,
    role_badge,
};
use ledgerdesk_auth::{EffectivePermission, GrantDecision, GrantRequest, PermissionWorkflow};
use ledgerdesk_auth::acl::PermissionSource;
use ledgerdesk_core::error::AppError;
use ledgerdesk_core::result::AppResult;
use ledgerdesk_entity::EntityId;
use ledgerdesk_entity::permission::{Action, ModulePermissions, PermissionSet};
use ledgerdesk_entity::user::{Role, User, UserProfile, normalize_email};
use ledgerdesk_store::DataStore;

use crate::context::RequestContext;

/// Request to invite a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    /// Email of the invited user.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Role to assign.
    pub role: Role,
    /// Entities the user may access.
    #[serde(default)]
    pub accessible_entity_ids: BTreeSet<EntityId>,
    /// Entities the user manages.
    #[serde(default)]
    pub managed_entity_ids: BTreeSet<EntityId>,
    /// Global module flags.
    #[serde(default)]
    pub module_permissions: ModulePermissions,
}

/// The acting user's own effective permissions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyPermissions {
    /// Email of the acting user.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role badge.
    pub badge: RoleBadge,
    /// Whether the user may invite others.
    pub can_invite_users: bool,
    /// Roles the user may hand out.
    pub assignable_roles: Vec<Role>,
    /// Effective module rights.
    pub modules: Vec<ModuleAccess>,
    /// Accessible entities.
    pub entities: Vec<EntityAccess>,
}

/// Orchestrates permission decisions and their persistence.
#[derive(Debug, Clone)]
pub struct PermissionService {
    /// Data store.
    store: Arc<DataStore>,
    /// Validated mutations.
    workflow: Arc<PermissionWorkflow>,
}

impl PermissionService {
    /// Creates a new permission service.
    pub fn new(store: Arc<DataStore>, workflow: Arc<PermissionWorkflow>) -> Self {
        Self { store, workflow }
    }

    /// Resolves whether the acting user may perform `action` on `module`.
    ///
    /// Unknown actions resolve to a denial.
    pub async fn check(
        &self,
        ctx: &RequestContext,
        module: &str,
        action: &str,
        entity_id: Option<&str>,
    ) -> AppResult<EffectivePermission> {
        let state = self.store.snapshot().await?;
        let actor = ctx.actor(&state)?;

        let Some(action) = Action::parse(action) else {
            return Ok(EffectivePermission {
                granted: false,
                source: PermissionSource::Denied,
            });
        };

        Ok(self
            .workflow
            .engine()
            .resolve(&actor, state.overrides(), module, action, entity_id))
    }

    /// Dry-runs a grant without persisting anything.
    pub async fn grant_check(
        &self,
        ctx: &RequestContext,
        role: Role,
        accessible_entity_ids: &BTreeSet<EntityId>,
        managed_entity_ids: &BTreeSet<EntityId>,
    ) -> AppResult<GrantDecision> {
        let state = self.store.snapshot().await?;
        let actor = ctx.actor(&state)?;
        Ok(self.workflow.engine().can_grant_permissions(
            &actor,
            role,
            accessible_entity_ids,
            managed_entity_ids,
        ))
    }

    /// Invites a new user with the requested permissions.
    pub async fn invite(&self, ctx: &RequestContext, req: InviteRequest) -> AppResult<User> {
        let email = normalize_email(&req.email);
        if !email.validate_email() {
            return Err(AppError::validation(format!("Invalid email '{email}'")));
        }

        let role = req.role;
        let user = self
            .store
            .update(|state| {
                let actor = ctx.actor(state)?;
                if state.contains_user(&email) {
                    return Err(AppError::conflict(format!("User '{email}' already exists")));
                }

                let set = self.workflow.invite(
                    &actor,
                    &state.entities,
                    GrantRequest {
                        target_email: email.clone(),
                        role: req.role,
                        accessible_entity_ids: req.accessible_entity_ids,
                        managed_entity_ids: req.managed_entity_ids,
                        module_permissions: req.module_permissions,
                    },
                )?;

                PermissionWorkflow::sync_entity_managers(
                    &mut state.entities,
                    &email,
                    &PermissionSet::empty(Role::Employee),
                    &set,
                )?;

                let profile = UserProfile::new(&email, req.name.trim());
                state.upsert_profile(profile.clone());
                state.set_permission_set(&email, set.clone());
                Ok(User::from_parts(&profile, Some(&set)))
            })
            .await
            .inspect_err(|e| ctx.log_rejection("invite", e))?;

        info!(actor = %ctx.actor_email, target = %user.email, role = %role, "User invited");
        Ok(user)
    }

    /// Replaces the permissions of an existing user.
    pub async fn edit_permissions(
        &self,
        ctx: &RequestContext,
        mut req: GrantRequest,
    ) -> AppResult<User> {
        req.target_email = normalize_email(&req.target_email);
        let target_email = req.target_email.clone();
        let role = req.role;

        let user = self
            .store
            .update(|state| {
                let actor = ctx.actor(state)?;
                let target = state.user(&target_email).ok_or_else(|| {
                    AppError::not_found(format!("User '{target_email}' not found"))
                })?;

                let set = self
                    .workflow
                    .edit_permissions(&actor, &target, &state.entities, req)?;

                PermissionWorkflow::sync_entity_managers(
                    &mut state.entities,
                    &target_email,
                    &target.permission_set(),
                    &set,
                )?;

                state.set_permission_set(&target_email, set.clone());
                Ok(User::from_parts(&target.profile(), Some(&set)))
            })
            .await
            .inspect_err(|e| ctx.log_rejection("edit_permissions", e))?;

        info!(actor = %ctx.actor_email, target = %user.email, role = %role, "Permissions updated");
        Ok(user)
    }

    /// Sets an entity-scoped override for an existing user.
    pub async fn set_entity_override(
        &self,
        ctx: &RequestContext,
        entity_id: &str,
        target_email: &str,
        modules: ModulePermissions,
    ) -> AppResult<()> {
        let target_email = normalize_email(target_email);
        self.store
            .update(|state| {
                let actor = ctx.actor(state)?;
                if !state.contains_user(&target_email) {
                    return Err(AppError::not_found(format!(
                        "User '{target_email}' not found"
                    )));
                }
                let entities = state.entities.clone();
                self.workflow.set_entity_override(
                    &actor,
                    &entities,
                    state.overrides_mut(),
                    entity_id,
                    &target_email,
                    modules,
                )
            })
            .await
            .inspect_err(|e| ctx.log_rejection("set_entity_override", e))?;

        info!(actor = %ctx.actor_email, target = %target_email, entity_id, "Entity override set");
        Ok(())
    }

    /// Removes an entity-scoped override.
    pub async fn remove_entity_override(
        &self,
        ctx: &RequestContext,
        entity_id: &str,
        target_email: &str,
    ) -> AppResult<()> {
        let target_email = normalize_email(target_email);
        self.store
            .update(|state| {
                let actor = ctx.actor(state)?;
                let entities = state.entities.clone();
                self.workflow.remove_entity_override(
                    &actor,
                    &entities,
                    state.overrides_mut(),
                    entity_id,
                    &target_email,
                )
            })
            .await
            .inspect_err(|e| ctx.log_rejection("remove_entity_override", e))?;

        info!(actor = %ctx.actor_email, target = %target_email, entity_id, "Entity override removed");
        Ok(())
    }

    /// The acting user's badge, module flags and accessible entities.
    pub async fn my_permissions(
        &self,
        ctx: &RequestContext,
        entity_id: Option<&str>,
    ) -> AppResult<MyPermissions> {
        let state = self.store.snapshot().await?;
        let actor = ctx.actor(&state)?;
        let engine = self.workflow.engine();

        Ok(MyPermissions {
            email: actor.email.clone(),
            name: actor.name.clone(),
            badge: role_badge(actor.role),
            can_invite_users: engine.can_invite_users(&actor),
            assignable_roles: engine.assignable_roles(&actor),
            modules: module_permissions_display(engine, &actor, state.overrides(), entity_id),
            entities: entity_access_display(&actor, &state.entities),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerdesk_auth::AuthorizationEngine;
    use ledgerdesk_core::config::StoreConfig;
    use ledgerdesk_core::config::modules::default_modules;
    use ledgerdesk_core::error::ErrorKind;
    use ledgerdesk_entity::entity::Entity;
    use ledgerdesk_entity::permission::ModuleCatalog;

    async fn service(dir: &tempfile::TempDir) -> (PermissionService, Arc<DataStore>) {
        let store = Arc::new(
            DataStore::open(&StoreConfig::in_dir(dir.path().to_str().unwrap()))
                .await
                .unwrap(),
        );
        let engine = AuthorizationEngine::new(ModuleCatalog::from_config(&default_modules()));
        let workflow = PermissionWorkflow::new(Arc::new(engine));
        store
            .update(|state| {
                state.upsert_profile(UserProfile::new("chef@x.de", "Chef"));
                state.set_permission_set("chef@x.de", PermissionSet::unrestricted());
                state.entities.upsert(Entity::new("E1", "Alpha GmbH", vec!["chef@x.de".into()]));
                state.entities.upsert(Entity::new("E2", "Beta GmbH", vec!["chef@x.de".into()]));
                Ok(())
            })
            .await
            .unwrap();
        (PermissionService::new(store.clone(), Arc::new(workflow)), store)
    }

    fn invite(email: &str, role: Role, accessible: &[&str], managed: &[&str]) -> InviteRequest {
        InviteRequest {
            email: email.to_string(),
            name: email.to_string(),
            role,
            accessible_entity_ids: accessible.iter().map(|s| s.to_string()).collect(),
            managed_entity_ids: managed.iter().map(|s| s.to_string()).collect(),
            module_permissions: ModulePermissions::new().with("kosten", true, false),
        }
    }

    #[tokio::test]
    async fn test_invite_manager_registers_on_entity() {
        let dir = tempfile::tempdir().unwrap();
        let (svc, store) = service(&dir).await;
        let chef = RequestContext::new("chef@x.de");

        let user = svc
            .invite(&chef, invite("m@x.de", Role::Manager, &[], &["E1"]))
            .await
            .unwrap();
        assert!(user.manages("E1"));
        assert!(user.can_access("E1"));

        let state = store.snapshot().await.unwrap();
        assert!(state.entities.find("E1").unwrap().is_managed_by("m@x.de"));
    }

    #[tokio::test]
    async fn test_invite_duplicate_and_scope() {
        let dir = tempfile::tempdir().unwrap();
        let (svc, store) = service(&dir).await;
        let chef = RequestContext::new("chef@x.de");
        svc.invite(&chef, invite("m@x.de", Role::Manager, &[], &["E1"]))
            .await
            .unwrap();

        let err = svc
            .invite(&chef, invite("m@x.de", Role::Employee, &["E1"], &[]))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let manager = RequestContext::new("m@x.de");
        let err = svc
            .invite(&manager, invite("e@x.de", Role::Employee, &["E2"], &[]))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ScopeViolation);
        assert!(!store.snapshot().await.unwrap().contains_user("e@x.de"));

        let user = svc
            .invite(&manager, invite("e@x.de", Role::Employee, &["E1"], &[]))
            .await
            .unwrap();
        assert_eq!(user.role, Role::Employee);
    }

    #[tokio::test]
    async fn test_check_with_override() {
        let dir = tempfile::tempdir().unwrap();
        let (svc, _store) = service(&dir).await;
        let chef = RequestContext::new("chef@x.de");
        svc.invite(&chef, invite("e@x.de", Role::Employee, &["E1"], &[]))
            .await
            .unwrap();

        let emp = RequestContext::new("e@x.de");
        let denied = svc.check(&emp, "zahlungen", "view", Some("E1")).await.unwrap();
        assert!(!denied.granted);

        svc.set_entity_override(
            &chef,
            "E1",
            "e@x.de",
            ModulePermissions::new().with("zahlungen", true, false),
        )
        .await
        .unwrap();

        let granted = svc.check(&emp, "zahlungen", "view", Some("E1")).await.unwrap();
        assert!(granted.granted);
        assert_eq!(granted.source, PermissionSource::EntityOverride);

        let unknown = svc.check(&emp, "kosten", "delete", None).await.unwrap();
        assert!(!unknown.granted);

        svc.remove_entity_override(&chef, "E1", "e@x.de").await.unwrap();
        assert!(!svc.check(&emp, "zahlungen", "view", Some("E1")).await.unwrap().granted);
    }

    #[tokio::test]
    async fn test_edit_permissions_and_my_permissions() {
        let dir = tempfile::tempdir().unwrap();
        let (svc, _store) = service(&dir).await;
        let chef = RequestContext::new("chef@x.de");
        svc.invite(&chef, invite("e@x.de", Role::Employee, &["E1"], &[]))
            .await
            .unwrap();

        let user = svc
            .edit_permissions(
                &chef,
                GrantRequest {
                    target_email: "E@x.de".to_string(),
                    role: Role::Employee,
                    accessible_entity_ids: ["E1".to_string(), "E2".to_string()].into(),
                    managed_entity_ids: BTreeSet::new(),
                    module_permissions: ModulePermissions::new().with("kosten", true, true),
                },
            )
            .await
            .unwrap();
        assert!(user.can_access("E2"));

        let mine = svc
            .my_permissions(&RequestContext::new("e@x.de"), None)
            .await
            .unwrap();
        assert_eq!(mine.badge.label, "Mitarbeiter");
        assert!(!mine.can_invite_users);
        assert_eq!(mine.entities.len(), 2);
        let kosten = mine.modules.iter().find(|m| m.module == "kosten").unwrap();
        assert!(kosten.edit);
    }
}
