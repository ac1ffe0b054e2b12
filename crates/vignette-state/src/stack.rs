use tracing::{info, warn};

use vignette_ecs::{SystemHost, SystemKey};

use crate::state::{ApplicationState, StateTransition};

/// A resident state plus the system keys it attached when it was entered.
///
/// Suspend, resume and pop work from `systems` alone, never by asking the
/// state again.
struct StateFrame {
    state: Box<dyn ApplicationState>,
    systems: Vec<SystemKey>,
}

impl StateFrame {
    fn enable_systems(&self, host: &mut dyn SystemHost) {
        for key in &self.systems {
            if let Err(e) = host.enable_system(*key) {
                warn!("State '{}' could not re-enable a system: {}", self.state.name(), e);
            }
        }
    }

    fn disable_systems(&self, host: &mut dyn SystemHost) {
        for key in &self.systems {
            host.disable_system(*key);
        }
    }
}

/// Stack-based state machine over [`ApplicationState`]s.
///
/// Only the top frame receives `on_update` and has its systems enabled;
/// covered frames stay resident with their systems disabled.
#[derive(Default)]
pub struct StateStack {
    frames: Vec<StateFrame>,
    initial: Option<Box<dyn ApplicationState>>,
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stack that pushes `initial` on [`StateStack::start`].
    pub fn with_initial(initial: Box<dyn ApplicationState>) -> Self {
        Self {
            frames: Vec::new(),
            initial: Some(initial),
        }
    }

    /// Push the designated initial state. Does nothing if it was already started.
    pub fn start(&mut self, host: &mut dyn SystemHost) {
        match self.initial.take() {
            Some(initial) => self.push_state(host, initial),
            None => warn!("State stack has no initial state to start"),
        }
    }

    /// Cover the current top state (if any) with `state`.
    pub fn push_state(&mut self, host: &mut dyn SystemHost, state: Box<dyn ApplicationState>) {
        if let Some(top) = self.frames.last_mut() {
            top.disable_systems(host);
            top.state.on_suspend(host.world_mut());
            info!("Suspended state '{}'", top.state.name());
        }
        self.enter(host, state);
    }

    /// Remove the top state and resume the one underneath.
    /// Returns `false` if the stack was already empty.
    pub fn pop_state(&mut self, host: &mut dyn SystemHost) -> bool {
        let Some(mut frame) = self.frames.pop() else {
            warn!("Attempted to pop an empty state stack");
            return false;
        };
        frame.disable_systems(host);
        frame.state.on_exit(host.world_mut());
        info!("Exited state '{}'", frame.state.name());

        if let Some(top) = self.frames.last_mut() {
            top.state.on_resume(host.world_mut());
            info!("Resumed state '{}'", top.state.name());
            top.enable_systems(host);
        }
        true
    }

    /// Replace the top state with `state` without suspending or resuming anything.
    pub fn change_state(&mut self, host: &mut dyn SystemHost, state: Box<dyn ApplicationState>) {
        if let Some(mut frame) = self.frames.pop() {
            frame.disable_systems(host);
            frame.state.on_exit(host.world_mut());
            info!("Exited state '{}'", frame.state.name());
        }
        self.enter(host, state);
    }

    fn enter(&mut self, host: &mut dyn SystemHost, mut state: Box<dyn ApplicationState>) {
        state.on_enter(host.world_mut());
        info!("Entered state '{}'", state.name());

        let mut systems = Vec::new();
        for key in state.systems() {
            match host.enable_system(key) {
                Ok(()) => systems.push(key),
                Err(e) => warn!("State '{}' skipped a system: {}", state.name(), e),
            }
        }
        self.frames.push(StateFrame { state, systems });
    }

    /// Forward the frame to the top state and apply the transition it requests.
    pub fn update(&mut self, host: &mut dyn SystemHost, dt: f32) {
        let Some(top) = self.frames.last_mut() else {
            return;
        };
        let transition = top.state.on_update(host.world_mut(), dt);
        self.apply(host, transition);
    }

    /// Apply a transition as if the top state had requested it.
    pub fn apply(&mut self, host: &mut dyn SystemHost, transition: StateTransition) {
        match transition {
            StateTransition::None => {}
            StateTransition::Push(state) => self.push_state(host, state),
            StateTransition::Pop => {
                self.pop_state(host);
            }
            StateTransition::Replace(state) => self.change_state(host, state),
            StateTransition::Quit => self.stop(host),
        }
    }

    /// Pop every state, each pop following the normal pop ordering.
    pub fn stop(&mut self, host: &mut dyn SystemHost) {
        while !self.frames.is_empty() {
            self.pop_state(host);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Name of the state currently receiving updates.
    pub fn current(&self) -> Option<&str> {
        self.frames.last().map(|frame| frame.state.name())
    }
}
