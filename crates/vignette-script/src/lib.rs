//! Scripted content for the Vignette runtime.
//!
//! Zones supply [`Sequence`]s and [`Trigger`]s through an [`Environment`].
//! The [`TriggerEvaluator`] starts sequences when trigger conditions hold and
//! the [`SequenceInterpreter`] steps each running sequence, handing blocking
//! work to the [`MovementSystem`] and [`FadeSystem`].

pub mod command;
pub mod components;
mod error;
pub mod fade;
pub mod interpreter;
pub mod movement;
mod properties;
pub mod sequence;
pub mod trigger;
pub mod zone;

pub use command::{Command, FadeDirection, ScriptCommand};
pub use components::{
    find_tagged, release_block, spawn_sequence_runner, ActiveSequenceBookmark, MoveRequest,
    ScreenFade, SoundQueue, SoundRequest, Tag,
};
pub use error::{ScriptError, ZoneError};
pub use fade::FadeSystem;
pub use interpreter::SequenceInterpreter;
pub use movement::MovementSystem;
pub use properties::Properties;
pub use sequence::{Condition, Sequence, Trigger, TriggerCondition};
pub use trigger::TriggerEvaluator;
pub use zone::{ActorSpawn, Environment, Shared, Zone, ZoneService};

use vignette_ecs::{SystemKey, SystemRegistry};

/// Execution order of the scripting systems within a frame.
///
/// Triggers spawn runners before anything steps, and resolvers release
/// blocks before the interpreter polls them.
pub mod priority {
    pub const TRIGGERS: i32 = 10;
    pub const MOVEMENT: i32 = 20;
    pub const FADE: i32 = 30;
    pub const INTERPRETER: i32 = 40;
}

pub const TRIGGER_EVALUATOR: SystemKey = SystemKey::new("TriggerEvaluator");
pub const SEQUENCE_INTERPRETER: SystemKey = SystemKey::new("SequenceInterpreter");
pub const MOVEMENT: SystemKey = SystemKey::new("Movement");
pub const SCREEN_FADE: SystemKey = SystemKey::new("ScreenFade");

/// Register constructors for every scripting system under its key.
pub fn register_systems<E>(registry: &mut SystemRegistry, environment: Shared<E>)
where
    E: Environment + Send + Sync + 'static,
{
    let triggers = environment.clone();
    registry.register(TRIGGER_EVALUATOR, move || TriggerEvaluator::new(triggers.clone()));
    registry.register(SEQUENCE_INTERPRETER, move || {
        SequenceInterpreter::new(environment.clone())
    });
    registry.register(MOVEMENT, MovementSystem::default);
    registry.register(SCREEN_FADE, FadeSystem::default);
}
