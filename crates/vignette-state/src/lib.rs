//! Vignette State - Application state machine
//!
//! Manages the application's modes (menus, gameplay, cutscenes) as a stack.
//! Each state declares the systems it needs; the stack enables and disables
//! them through a [`vignette_ecs::SystemHost`] as states are pushed, covered,
//! uncovered and popped.

mod stack;
mod state;

pub use stack::StateStack;
pub use state::{ApplicationState, StateTransition};
