use std::any::TypeId;
use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use crate::component::{Component, ComponentMap, ComponentStorage};
use crate::entity::{Entity, EntityStore};
use crate::query::ComponentSet;
use crate::resource::Resources;

/// The central ECS container. Owns all entities, components, and resources.
///
/// Missing entities and components are reported through `Option`/`bool`
/// returns; none of these operations panic on a "not found" condition.
#[derive(Default)]
pub struct World {
    entities: EntityStore,
    components: HashMap<TypeId, Box<dyn ComponentStorage>>,
    resources: Resources,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Entity management ----

    /// Spawn a new entity with no components.
    pub fn spawn(&mut self) -> Entity {
        self.entities.create()
    }

    /// Despawn an entity, removing every component it carries.
    /// Returns `false` (and does nothing) if the entity was not active.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.entities.destroy(entity) {
            return false;
        }
        for storage in self.components.values_mut() {
            storage.remove(entity);
        }
        true
    }

    /// Check whether an entity is alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of alive entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // ---- Component management ----

    fn storage<T: Component>(&self) -> Option<&ComponentMap<T>> {
        self.components
            .get(&TypeId::of::<T>())
            .and_then(|s| s.as_any().downcast_ref::<ComponentMap<T>>())
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut ComponentMap<T>> {
        self.components
            .get_mut(&TypeId::of::<T>())
            .and_then(|s| s.as_any_mut().downcast_mut::<ComponentMap<T>>())
    }

    /// Insert a component on an entity, replacing any existing component of the
    /// same type. Inserting on a dead entity is ignored.
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) {
        if !self.entities.is_alive(entity) {
            warn!(
                "Ignoring {} insert on dead entity {}",
                std::any::type_name::<T>(),
                entity
            );
            return;
        }
        let storage = self
            .components
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentMap::<T>::new()));
        if let Some(map) = storage.as_any_mut().downcast_mut::<ComponentMap<T>>() {
            map.insert(entity, component);
        }
    }

    /// Get an immutable reference to a component on an entity.
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(entity)
    }

    /// Get a mutable reference to a component on an entity.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_mut::<T>()?.get_mut(entity)
    }

    /// Remove a component from an entity. Returns `true` if it was present.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> bool {
        self.take::<T>(entity).is_some()
    }

    /// Remove a component from an entity and return it.
    pub fn take<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.storage_mut::<T>()?.take(entity)
    }

    /// Check whether an entity has a component of the given type.
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.has_type(entity, TypeId::of::<T>())
    }

    fn has_type(&self, entity: Entity, type_id: TypeId) -> bool {
        self.components
            .get(&type_id)
            .is_some_and(|storage| storage.has(entity))
    }

    // ---- Queries ----

    /// Active entities carrying every component in `Q`.
    ///
    /// `world.entities_with::<()>()` returns every active entity.
    ///
    /// # Example
    /// ```ignore
    /// for entity in world.entities_with::<(Position, Velocity)>() {
    ///     // ...
    /// }
    /// ```
    pub fn entities_with<Q: ComponentSet>(&self) -> BTreeSet<Entity> {
        self.entities_with_ids(&Q::type_ids())
    }

    /// Active entities carrying every component type in `type_ids`.
    ///
    /// A linear scan over the active set; with no type ids every active entity
    /// matches.
    pub fn entities_with_ids(&self, type_ids: &[TypeId]) -> BTreeSet<Entity> {
        self.entities
            .iter()
            .filter(|&entity| type_ids.iter().all(|&tid| self.has_type(entity, tid)))
            .collect()
    }

    // ---- Resources ----

    /// Insert a singleton resource, returning the value it replaced.
    pub fn insert_resource<T: 'static + Send + Sync>(&mut self, value: T) -> Option<T> {
        self.resources.insert(value)
    }

    /// Get an immutable reference to a resource.
    pub fn resource<T: 'static + Send + Sync>(&self) -> Option<&T> {
        self.resources.get::<T>()
    }

    /// Get a mutable reference to a resource.
    pub fn resource_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
        self.resources.get_mut::<T>()
    }

    pub fn has_resource<T: 'static + Send + Sync>(&self) -> bool {
        self.resources.contains::<T>()
    }

    /// Remove a resource.
    pub fn remove_resource<T: 'static + Send + Sync>(&mut self) -> Option<T> {
        self.resources.remove::<T>()
    }
}
