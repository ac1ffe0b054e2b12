use std::any::Any;
use std::collections::HashMap;

use crate::entity::Entity;

/// Marker trait for types that can be stored as ECS components.
pub trait Component: 'static + Send + Sync {}

/// Blanket implementation: any `'static + Send + Sync` type is a valid component.
impl<T: 'static + Send + Sync> Component for T {}

/// Type-erased component storage interface.
pub(crate) trait ComponentStorage: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn remove(&mut self, entity: Entity) -> bool;
    fn has(&self, entity: Entity) -> bool;
}

/// Map storage for a single component type, keyed by entity.
pub(crate) struct ComponentMap<T> {
    items: HashMap<Entity, T>,
}

impl<T: Component> ComponentMap<T> {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// Insert or replace a component, returning the previous value.
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        self.items.insert(entity, value)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.items.get(&entity)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.items.get_mut(&entity)
    }

    pub fn take(&mut self, entity: Entity) -> Option<T> {
        self.items.remove(&entity)
    }
}

impl<T: Component> ComponentStorage for ComponentMap<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn remove(&mut self, entity: Entity) -> bool {
        self.items.remove(&entity).is_some()
    }

    fn has(&self, entity: Entity) -> bool {
        self.items.contains_key(&entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut map = ComponentMap::new();
        map.insert(Entity::from_raw(5), 42i32);
        assert_eq!(map.get(Entity::from_raw(5)), Some(&42));
        assert_eq!(map.get(Entity::from_raw(0)), None);
    }

    #[test]
    fn overwrite_returns_previous() {
        let mut map = ComponentMap::new();
        let e = Entity::from_raw(0);
        assert_eq!(map.insert(e, 1i32), None);
        assert_eq!(map.insert(e, 2), Some(1));
        assert_eq!(map.get(e), Some(&2));
    }

    #[test]
    fn erased_remove() {
        let mut map = ComponentMap::new();
        map.insert(Entity::from_raw(0), 'a');
        map.insert(Entity::from_raw(1), 'b');
        let storage: &mut dyn ComponentStorage = &mut map;
        assert!(storage.remove(Entity::from_raw(0)));
        assert!(!storage.remove(Entity::from_raw(0)));
        assert!(!storage.has(Entity::from_raw(0)));
        assert!(storage.has(Entity::from_raw(1)));
    }
}
