use std::fmt;

use vignette_ecs::{SystemKey, World};

/// One mode of operation living on the [`crate::StateStack`].
///
/// `on_enter` runs before the state's systems are enabled, so a state must not
/// rely on its systems having run during `on_enter`.
pub trait ApplicationState {
    /// Name used in logs.
    fn name(&self) -> &str;

    fn on_enter(&mut self, world: &mut World);

    /// Called once per frame while this state is on top of the stack.
    fn on_update(&mut self, world: &mut World, dt: f32) -> StateTransition;

    fn on_exit(&mut self, world: &mut World);

    /// Called when another state is pushed on top of this one.
    fn on_suspend(&mut self, _world: &mut World) {}

    /// Called when the state above this one is popped.
    fn on_resume(&mut self, _world: &mut World) {}

    /// Systems that must run while this state is on top of the stack.
    fn systems(&self) -> Vec<SystemKey> {
        Vec::new()
    }
}

/// State transition commands
#[derive(Default)]
pub enum StateTransition {
    /// No transition
    #[default]
    None,
    /// Push a new state onto the stack (for states that return)
    Push(Box<dyn ApplicationState>),
    /// Pop the current state
    Pop,
    /// Replace the current state entirely
    Replace(Box<dyn ApplicationState>),
    /// Pop every state, ending the run
    Quit,
}

impl fmt::Debug for StateTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Push(state) => write!(f, "Push({})", state.name()),
            Self::Pop => f.write_str("Pop"),
            Self::Replace(state) => write!(f, "Replace({})", state.name()),
            Self::Quit => f.write_str("Quit"),
        }
    }
}
