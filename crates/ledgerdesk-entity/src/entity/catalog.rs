//! Entity catalog (`entities.json`).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::Entity;
use crate::EntityId;

/// The list of all legal entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityCatalog {
    entities: Vec<Entity>,
}

impl EntityCatalog {
    /// Build a catalog from a list of entities.
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    /// Find an entity by id.
    pub fn find(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Find an entity by id for mutation.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Whether an entity with `id` exists.
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Entities whose manager list contains `email`.
    pub fn managed_by<'a>(&'a self, email: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.iter().filter(move |e| e.is_managed_by(email))
    }

    /// Ids of the entities whose manager list contains `email`.
    pub fn managed_ids(&self, email: &str) -> BTreeSet<EntityId> {
        self.managed_by(email).map(|e| e.id.clone()).collect()
    }

    /// Insert a new entity or replace the one with the same id.
    pub fn upsert(&mut self, entity: Entity) {
        match self.find_mut(&entity.id) {
            Some(existing) => *existing = entity,
            None => self.entities.push(entity),
        }
    }

    /// Iterate all entities.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl From<Vec<Entity>> for EntityCatalog {
    fn from(entities: Vec<Entity>) -> Self {
        Self::new(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_managed_ids_supports_co_managers() {
        let catalog = EntityCatalog::new(vec![
            Entity::new("E1", "Alpha GmbH", vec!["a@x.de".into(), "b@x.de".into()]),
            Entity::new("E2", "Beta GmbH", vec!["b@x.de".into()]),
        ]);
        assert_eq!(catalog.managed_ids("a@x.de").len(), 1);
        assert_eq!(catalog.managed_ids("b@x.de").len(), 2);
        assert!(catalog.managed_ids("c@x.de").is_empty());
    }

    #[test]
    fn test_upsert_replaces_existing() {
        let mut catalog = EntityCatalog::default();
        catalog.upsert(Entity::new("E1", "Alpha", vec![]));
        catalog.upsert(Entity::new("E1", "Alpha GmbH", vec!["a@x.de".into()]));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find("E1").unwrap().name, "Alpha GmbH");
    }
}
