use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use crate::component::Component;
use crate::entity::Entity;
use crate::error::EcsError;
use crate::query::ComponentSet;
use crate::registry::{SystemKey, SystemRegistry};
use crate::system::{System, SystemId, SystemSchedule};
use crate::world::World;

/// The seam through which application states switch systems on and off.
///
/// Implemented by [`WorldService`]; states never construct systems themselves.
pub trait SystemHost {
    /// Construct and schedule the system registered under `key`.
    fn enable_system(&mut self, key: SystemKey) -> Result<(), EcsError>;

    /// Unschedule every instance previously enabled under `key`.
    fn disable_system(&mut self, key: SystemKey);

    /// The world that state lifecycle hooks operate on.
    fn world_mut(&mut self) -> &mut World;
}

/// Facade combining a [`World`] with its [`SystemSchedule`].
///
/// Besides plain instance management it tracks which system instances were
/// enabled under which [`SystemKey`], so they can be disabled by key.
pub struct WorldService {
    world: World,
    schedule: SystemSchedule,
    registry: SystemRegistry,
    enabled: HashMap<SystemKey, Vec<SystemId>>,
}

impl WorldService {
    pub fn new(registry: SystemRegistry) -> Self {
        Self {
            world: World::new(),
            schedule: SystemSchedule::new(),
            registry,
            enabled: HashMap::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    // ---- World passthrough ----

    pub fn spawn(&mut self) -> Entity {
        self.world.spawn()
    }

    pub fn despawn(&mut self, entity: Entity) -> bool {
        self.world.despawn(entity)
    }

    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) {
        self.world.insert(entity, component);
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.world.get(entity)
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.world.get_mut(entity)
    }

    pub fn remove<T: Component>(&mut self, entity: Entity) -> bool {
        self.world.remove::<T>(entity)
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.world.has::<T>(entity)
    }

    pub fn entities_with<Q: ComponentSet>(&self) -> BTreeSet<Entity> {
        self.world.entities_with::<Q>()
    }

    // ---- Systems ----

    /// Schedule a system instance directly, outside of key tracking.
    pub fn add_system<S: System + 'static>(&mut self, system: S) -> SystemId {
        self.schedule.add_system(system)
    }

    /// Remove a system instance added with [`WorldService::add_system`].
    pub fn remove_system(&mut self, id: SystemId) -> bool {
        for ids in self.enabled.values_mut() {
            ids.retain(|&enabled| enabled != id);
        }
        self.schedule.remove_system(id)
    }

    /// Construct the system registered under `key` and schedule it.
    pub fn enable_system(&mut self, key: SystemKey) -> Result<SystemId, EcsError> {
        let system = self.registry.create(key)?;
        let id = self.schedule.add_boxed(system);
        self.enabled.entry(key).or_default().push(id);
        debug!("Enabled system '{}'", key);
        Ok(id)
    }

    /// Remove every instance enabled under `key`. Returns how many were removed.
    pub fn disable_system(&mut self, key: SystemKey) -> usize {
        let Some(ids) = self.enabled.remove(&key) else {
            return 0;
        };
        let removed = ids
            .into_iter()
            .filter(|&id| self.schedule.remove_system(id))
            .count();
        debug!("Disabled system '{}' ({} instance(s))", key, removed);
        removed
    }

    pub fn is_enabled(&self, key: SystemKey) -> bool {
        self.enabled.get(&key).is_some_and(|ids| !ids.is_empty())
    }

    /// Remove every system, keyed or not.
    pub fn clear_systems(&mut self) {
        info!("Clearing {} system(s)", self.schedule.len());
        self.schedule.clear();
        self.enabled.clear();
    }

    pub fn system_count(&self) -> usize {
        self.schedule.len()
    }

    // ---- Frame ----

    /// Run every system's untimed update.
    pub fn update(&mut self) {
        self.schedule.run_all(&mut self.world);
    }

    /// Run every system's timed update.
    pub fn update_timed(&mut self, dt: f32) {
        self.schedule.run_all_timed(&mut self.world, dt);
    }
}

impl Default for WorldService {
    fn default() -> Self {
        Self::new(SystemRegistry::new())
    }
}

impl SystemHost for WorldService {
    fn enable_system(&mut self, key: SystemKey) -> Result<(), EcsError> {
        WorldService::enable_system(self, key).map(|_| ())
    }

    fn disable_system(&mut self, key: SystemKey) {
        WorldService::disable_system(self, key);
    }

    fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: SystemKey = SystemKey::new("tick");
    const DOUBLE: SystemKey = SystemKey::new("double");

    #[derive(Debug, PartialEq)]
    struct Ticks(u32);

    struct TickSystem;

    impl System for TickSystem {
        fn run_timed(&mut self, world: &mut World, _dt: f32) {
            for entity in world.entities_with::<(Ticks,)>() {
                if let Some(ticks) = world.get_mut::<Ticks>(entity) {
                    ticks.0 += 1;
                }
            }
        }
    }

    struct DoubleSystem;

    impl System for DoubleSystem {
        fn priority(&self) -> i32 {
            10
        }

        fn run_timed(&mut self, world: &mut World, _dt: f32) {
            for entity in world.entities_with::<(Ticks,)>() {
                if let Some(ticks) = world.get_mut::<Ticks>(entity) {
                    ticks.0 *= 2;
                }
            }
        }
    }

    fn service() -> WorldService {
        let mut registry = SystemRegistry::new();
        registry.register(TICK, || TickSystem);
        registry.register(DOUBLE, || DoubleSystem);
        WorldService::new(registry)
    }

    #[test]
    fn enable_and_disable_by_key() {
        let mut service = service();
        let e = service.spawn();
        service.insert(e, Ticks(0));

        service.enable_system(TICK).expect("registered");
        assert!(service.is_enabled(TICK));
        service.update_timed(0.016);
        assert_eq!(service.get::<Ticks>(e), Some(&Ticks(1)));

        assert_eq!(service.disable_system(TICK), 1);
        assert!(!service.is_enabled(TICK));
        service.update_timed(0.016);
        assert_eq!(service.get::<Ticks>(e), Some(&Ticks(1)));
        assert_eq!(service.disable_system(TICK), 0);
    }

    #[test]
    fn priority_order_applies_across_keys() {
        let mut service = service();
        let e = service.spawn();
        service.insert(e, Ticks(1));

        // Enabled in reverse order; tick (priority 0) still runs before double (10).
        service.enable_system(DOUBLE).expect("registered");
        service.enable_system(TICK).expect("registered");
        service.update_timed(0.016);
        assert_eq!(service.get::<Ticks>(e), Some(&Ticks(4)));
    }

    #[test]
    fn disable_removes_every_instance_of_a_key() {
        let mut service = service();
        service.enable_system(TICK).expect("registered");
        service.enable_system(TICK).expect("registered");
        service.enable_system(DOUBLE).expect("registered");
        assert_eq!(service.system_count(), 3);

        assert_eq!(service.disable_system(TICK), 2);
        assert_eq!(service.system_count(), 1);
        assert!(service.is_enabled(DOUBLE));
    }

    #[test]
    fn unknown_key_does_not_schedule() {
        let mut service = service();
        let missing = SystemKey::new("missing");
        assert_eq!(
            service.enable_system(missing),
            Err(EcsError::UnknownSystem(missing))
        );
        assert_eq!(service.system_count(), 0);
    }

    #[test]
    fn clear_systems_removes_keyed_and_unkeyed() {
        let mut service = service();
        service.enable_system(TICK).expect("registered");
        let manual = service.add_system(|_: &mut World, _dt: f32| {});
        assert_eq!(service.system_count(), 2);

        service.clear_systems();
        assert_eq!(service.system_count(), 0);
        assert!(!service.is_enabled(TICK));
        assert!(!service.remove_system(manual));
    }

    #[test]
    fn host_trait_forwards_to_service() {
        let mut service = service();
        let host: &mut dyn SystemHost = &mut service;
        host.enable_system(TICK).expect("registered");
        let e = host.world_mut().spawn();
        host.world_mut().insert(e, Ticks(0));
        host.disable_system(TICK);
        assert_eq!(service.system_count(), 0);
        assert_eq!(service.get::<Ticks>(e), Some(&Ticks(0)));
    }
}
