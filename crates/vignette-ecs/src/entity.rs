use std::collections::BTreeSet;
use std::fmt;

/// An entity handle. Ids are handed out in strictly increasing order and never
/// recycled, so a stale handle can never alias a newer entity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(pub(crate) u64);

impl Entity {
    /// Create an entity from a raw id (mainly for testing).
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// The raw id of this entity.
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owns entity identity: id generation and the active set.
#[derive(Debug, Default)]
pub struct EntityStore {
    next_id: u64,
    active: BTreeSet<Entity>,
}

impl EntityStore {
    /// Allocate the next id and mark it active.
    pub fn create(&mut self) -> Entity {
        let entity = Entity(self.next_id);
        self.next_id += 1;
        self.active.insert(entity);
        entity
    }

    /// Remove an entity from the active set. Returns `true` if it was active.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        self.active.remove(&entity)
    }

    /// Check if an entity is currently active.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.active.contains(&entity)
    }

    /// All active entities in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.active.iter().copied()
    }

    /// Number of currently active entities.
    pub fn len(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_sequential() {
        let mut store = EntityStore::default();
        let e0 = store.create();
        let e1 = store.create();
        assert_eq!(e0.id(), 0);
        assert_eq!(e1.id(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut store = EntityStore::default();
        let mut last = store.create();
        for round in 0..50 {
            if round % 3 == 0 {
                store.destroy(last);
            }
            let next = store.create();
            assert!(next > last);
            last = next;
        }
    }

    #[test]
    fn double_destroy_is_noop() {
        let mut store = EntityStore::default();
        let e = store.create();
        assert!(store.destroy(e));
        assert!(!store.destroy(e));
        assert!(!store.destroy(Entity::from_raw(999)));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn destroyed_entity_not_alive() {
        let mut store = EntityStore::default();
        let e0 = store.create();
        store.destroy(e0);
        assert!(!store.is_alive(e0));
        let e1 = store.create();
        assert!(store.is_alive(e1));
        assert_ne!(e0, e1);
    }
}
