use tracing::debug;

use crate::world::World;

/// A behavior unit that operates on the world each tick.
///
/// Both update hooks default to no-ops so a system only implements the one it
/// needs. Lower priorities run earlier.
pub trait System: Send + Sync {
    /// Human-readable name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn priority(&self) -> i32 {
        0
    }

    /// Untimed update, dispatched by [`SystemSchedule::run_all`].
    fn run(&mut self, _world: &mut World) {}

    /// Timed update, dispatched by [`SystemSchedule::run_all_timed`].
    fn run_timed(&mut self, _world: &mut World, _dt: f32) {}
}

/// Blanket implementation so closures can be used as timed systems.
impl<F: FnMut(&mut World, f32) + Send + Sync> System for F {
    fn run_timed(&mut self, world: &mut World, dt: f32) {
        (self)(world, dt);
    }
}

/// Wraps a system with an explicit priority.
pub struct Prioritized<S> {
    priority: i32,
    inner: S,
}

/// Give `system` the priority `priority`, overriding its own.
pub fn with_priority<S: System>(priority: i32, system: S) -> Prioritized<S> {
    Prioritized {
        priority,
        inner: system,
    }
}

impl<S: System> System for Prioritized<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn run(&mut self, world: &mut World) {
        self.inner.run(world);
    }

    fn run_timed(&mut self, world: &mut World, dt: f32) {
        self.inner.run_timed(world, dt);
    }
}

/// Handle to a system instance inside a [`SystemSchedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemId(u64);

struct ScheduledSystem {
    id: SystemId,
    system: Box<dyn System>,
}

/// A priority-ordered list of systems to run each frame.
///
/// Adding a system marks the list unsorted; the next run stable-sorts it by
/// ascending priority, so systems of equal priority keep insertion order.
pub struct SystemSchedule {
    systems: Vec<ScheduledSystem>,
    next_id: u64,
    sorted: bool,
}

impl SystemSchedule {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            next_id: 0,
            sorted: true,
        }
    }

    /// Add a system to the schedule.
    pub fn add_system<S: System + 'static>(&mut self, system: S) -> SystemId {
        self.add_boxed(Box::new(system))
    }

    /// Add an already boxed system to the schedule.
    pub fn add_boxed(&mut self, system: Box<dyn System>) -> SystemId {
        let id = SystemId(self.next_id);
        self.next_id += 1;
        debug!("Scheduling system {} (priority {})", system.name(), system.priority());
        self.systems.push(ScheduledSystem { id, system });
        self.sorted = false;
        id
    }

    /// Remove a system instance. Returns `true` if it was scheduled.
    pub fn remove_system(&mut self, id: SystemId) -> bool {
        let before = self.systems.len();
        self.systems.retain(|entry| entry.id != id);
        self.systems.len() != before
    }

    /// Remove every system.
    pub fn clear(&mut self) {
        self.systems.clear();
        self.sorted = true;
    }

    fn ensure_sorted(&mut self) {
        if !self.sorted {
            self.systems.sort_by_key(|entry| entry.system.priority());
            self.sorted = true;
        }
    }

    /// Run every system's untimed update in priority order.
    pub fn run_all(&mut self, world: &mut World) {
        self.ensure_sorted();
        for entry in &mut self.systems {
            entry.system.run(world);
        }
    }

    /// Run every system's timed update in priority order.
    pub fn run_all_timed(&mut self, world: &mut World, dt: f32) {
        self.ensure_sorted();
        for entry in &mut self.systems {
            entry.system.run_timed(world, dt);
        }
    }

    pub fn contains(&self, id: SystemId) -> bool {
        self.systems.iter().any(|entry| entry.id == id)
    }

    /// Number of systems in the schedule.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl Default for SystemSchedule {
    fn default() -> Self {
        Self::new()
    }
}
