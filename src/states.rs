//! Application states driven by the frame loop.

use tracing::{info, warn};
use vignette_core::Transform;
use vignette_ecs::{Entity, SystemKey, World};
use vignette_script::{
    ActiveSequenceBookmark, Shared, SoundQueue, Tag, TriggerCondition, Zone, ZoneService,
    MOVEMENT, SCREEN_FADE, SEQUENCE_INTERPRETER, TRIGGER_EVALUATOR,
};
use vignette_state::{ApplicationState, StateTransition};

/// First state on the stack. Hands the startup zone to [`PlayingState`].
pub struct BootState {
    environment: Shared<ZoneService>,
    zone: Option<Zone>,
}

impl BootState {
    pub fn new(environment: Shared<ZoneService>, zone: Zone) -> Self {
        Self {
            environment,
            zone: Some(zone),
        }
    }
}

impl ApplicationState for BootState {
    fn name(&self) -> &str {
        "Boot"
    }

    fn on_enter(&mut self, _world: &mut World) {
        info!("Booting");
    }

    fn on_update(&mut self, _world: &mut World, _dt: f32) -> StateTransition {
        match self.zone.take() {
            Some(zone) => StateTransition::Replace(Box::new(PlayingState::new(
                self.environment.clone(),
                zone,
            ))),
            None => StateTransition::Quit,
        }
    }

    fn on_exit(&mut self, _world: &mut World) {}
}

/// Runs a zone's scripts. Pops itself once scripts have run and none remain,
/// or right away when no trigger of the zone can ever start one.
pub struct PlayingState {
    environment: Shared<ZoneService>,
    zone: Option<Zone>,
    actors: Vec<Entity>,
    scripts_started: bool,
    can_start_scripts: bool,
}

/// Whether any trigger of `zone` fires without player input.
fn has_load_trigger(zone: &Zone) -> bool {
    zone.triggers.iter().any(|trigger| {
        matches!(
            TriggerCondition::parse(&trigger.condition),
            Ok(TriggerCondition::OnLoad { .. })
        )
    })
}

impl PlayingState {
    pub fn new(environment: Shared<ZoneService>, zone: Zone) -> Self {
        Self {
            environment,
            zone: Some(zone),
            actors: Vec::new(),
            scripts_started: false,
            can_start_scripts: false,
        }
    }
}

impl ApplicationState for PlayingState {
    fn name(&self) -> &str {
        "Playing"
    }

    fn on_enter(&mut self, world: &mut World) {
        let Some(zone) = self.zone.take() else {
            return;
        };
        for actor in &zone.actors {
            let entity = world.spawn();
            world.insert(entity, Tag(actor.tag.clone()));
            world.insert(entity, Transform::from_position(actor.position));
            self.actors.push(entity);
        }
        info!("Entering zone '{}' with {} actors", zone.id, self.actors.len());
        self.can_start_scripts = has_load_trigger(&zone);
        if !self.can_start_scripts {
            warn!("Zone '{}' has no ON_LOAD trigger, nothing will run", zone.id);
        }
        self.environment.write().load(zone);
    }

    fn on_update(&mut self, world: &mut World, _dt: f32) -> StateTransition {
        if let Some(queue) = world.resource_mut::<SoundQueue>() {
            for sound in queue.drain() {
                info!("Playing sound '{}' (from {})", sound.sound_id, sound.source);
            }
        }

        let running = world.entities_with::<(ActiveSequenceBookmark,)>().len();
        if running > 0 {
            self.scripts_started = true;
        } else if self.scripts_started {
            info!("All scripts finished");
            return StateTransition::Pop;
        } else if !self.can_start_scripts {
            return StateTransition::Pop;
        }
        StateTransition::None
    }

    fn on_exit(&mut self, world: &mut World) {
        for entity in self.actors.drain(..) {
            world.despawn(entity);
        }
        self.environment.write().unload();
    }

    fn systems(&self) -> Vec<SystemKey> {
        vec![TRIGGER_EVALUATOR, SEQUENCE_INTERPRETER, MOVEMENT, SCREEN_FADE]
    }
}
