//! Entity-scoped permission overrides.

use tracing::debug;

use ledgerdesk_core::error::AppError;
use ledgerdesk_core::result::AppResult;
use ledgerdesk_entity::entity::EntityCatalog;
use ledgerdesk_entity::permission::{EntityPermissions, ModulePermissions};
use ledgerdesk_entity::user::{User, normalize_email};

use super::PermissionWorkflow;
use crate::acl::AuthorizationEngine;

impl PermissionWorkflow {
    /// Sets the override of `target_email` within `entity_id`.
    pub fn set_entity_override(
        &self,
        actor: &User,
        entities: &EntityCatalog,
        overrides: &mut EntityPermissions,
        entity_id: &str,
        target_email: &str,
        mut modules: ModulePermissions,
    ) -> AppResult<()> {
        let target = normalize_email(target_email);
        self.authorize_override(actor, entities, entity_id, &target)?;

        let dropped = modules.retain_known(self.engine().modules());
        if !dropped.is_empty() {
            debug!(target = %target, modules = ?dropped, "Dropped unknown modules from override");
        }

        overrides.set(entity_id, target, modules);
        Ok(())
    }

    /// Removes the override of `target_email` within `entity_id`.
    pub fn remove_entity_override(
        &self,
        actor: &User,
        entities: &EntityCatalog,
        overrides: &mut EntityPermissions,
        entity_id: &str,
        target_email: &str,
    ) -> AppResult<()> {
        let target = normalize_email(target_email);
        self.authorize_override(actor, entities, entity_id, &target)?;

        if !overrides.remove(entity_id, &target) {
            return Err(AppError::not_found(format!(
                "No override for '{target}' in entity '{entity_id}'"
            )));
        }
        Ok(())
    }

    fn authorize_override(
        &self,
        actor: &User,
        entities: &EntityCatalog,
        entity_id: &str,
        target: &str,
    ) -> AppResult<()> {
        let entity = entities
            .find(entity_id)
            .ok_or_else(|| AppError::not_found(format!("Entity '{entity_id}' not found")))?;

        if actor.email == target {
            return Err(AppError::permission_denied(
                "You may not change your own overrides",
            ));
        }

        if !actor.is_geschaeftsfuehrer() && !AuthorizationEngine::is_manager_of(entity, &actor.email)
        {
            return Err(AppError::permission_denied(format!(
                "You do not manage entity '{entity_id}'"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::fixtures::{catalog, user, workflow};
    use ledgerdesk_core::error::ErrorKind;
    use ledgerdesk_entity::permission::Action;
    use ledgerdesk_entity::user::Role;

    #[test]
    fn test_manager_sets_override_in_own_entity() {
        let wf = workflow();
        let entities = catalog();
        let manager = user("m@x.de", Role::Manager, &["E1"], &[]);
        let mut overrides = EntityPermissions::new();

        wf.set_entity_override(
            &manager,
            &entities,
            &mut overrides,
            "E1",
            "e@x.de",
            ModulePermissions::new().with("zahlungen", true, false),
        )
        .unwrap();

        let emp = user("e@x.de", Role::Employee, &[], &["E1"]);
        assert!(wf.engine().can(&emp, &overrides, "zahlungen", Action::View, Some("E1")));
    }

    #[test]
    fn test_override_authorization() {
        let wf = workflow();
        let entities = catalog();
        let manager = user("m@x.de", Role::Manager, &["E1"], &[]);
        let mut overrides = EntityPermissions::new();

        let err = wf
            .set_entity_override(&manager, &entities, &mut overrides, "E2", "e@x.de", ModulePermissions::new())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PermissionDenied);

        let err = wf
            .set_entity_override(&manager, &entities, &mut overrides, "E1", "M@x.de", ModulePermissions::new())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PermissionDenied);

        let err = wf
            .set_entity_override(&manager, &entities, &mut overrides, "E9", "e@x.de", ModulePermissions::new())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_remove_override() {
        let wf = workflow();
        let entities = catalog();
        let chef = user("chef@x.de", Role::Geschaeftsfuehrer, &[], &[]);
        let mut overrides = EntityPermissions::new();
        overrides.set("E2", "e@x.de", ModulePermissions::new().with("kosten", true, true));

        wf.remove_entity_override(&chef, &entities, &mut overrides, "E2", "e@x.de")
            .unwrap();
        assert!(overrides.get("E2", "e@x.de").is_none());

        let err = wf
            .remove_entity_override(&chef, &entities, &mut overrides, "E2", "e@x.de")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
