//! Executes scripted sequences, one bookmark entity per running instance.

use tracing::{debug, info, warn};
use vignette_core::Transform;
use vignette_ecs::{Entity, System, World};

use crate::command::ScriptCommand;
use crate::components::{
    find_tagged, release_block, spawn_sequence_runner, ActiveSequenceBookmark, MoveRequest,
    ScreenFade, SoundQueue, SoundRequest,
};
use crate::priority;
use crate::zone::{Environment, Shared, ZoneService};

/// What a bookmark does after its command has been issued.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    /// Move to the next command this tick
    Advance,
    /// Hold for the remaining seconds
    Wait(f32),
    /// Hold until released; carries the target of a pending move
    Block(Option<Entity>),
}

/// Steps every entity carrying an [`ActiveSequenceBookmark`].
///
/// Each tick a bookmark either counts down a `WAIT`, stays put while blocked,
/// consumes a release, or issues its next command. Instant commands advance
/// in the tick they run; a bookmark that runs off the end of its sequence (or
/// names a sequence the environment does not have) is despawned.
pub struct SequenceInterpreter<E = ZoneService> {
    environment: Shared<E>,
}

impl<E> SequenceInterpreter<E> {
    pub fn new(environment: Shared<E>) -> Self {
        Self { environment }
    }
}

impl<E: Environment + Send + Sync + 'static> SequenceInterpreter<E> {
    fn tick(&self, world: &mut World, entity: Entity, dt: f32) -> bool {
        release_if_orphaned(world, entity);

        let Some(bookmark) = world.get_mut::<ActiveSequenceBookmark>(entity) else {
            return false;
        };

        if bookmark.wait_timer > 0.0 {
            bookmark.wait_timer -= dt;
            if bookmark.wait_timer <= 0.0 {
                bookmark.wait_timer = 0.0;
                bookmark.current_index += 1;
            }
            return false;
        }
        if bookmark.blocked {
            return false;
        }
        if bookmark.awaiting_release {
            bookmark.awaiting_release = false;
            bookmark.pending_move = None;
            bookmark.current_index += 1;
            return false;
        }

        let sequence_id = bookmark.sequence_id.clone();
        let index = bookmark.current_index;

        let parsed = {
            let environment = self.environment.read();
            let Some(sequence) = environment.sequence(&sequence_id) else {
                debug!("Sequence '{}' not available, stopping {}", sequence_id, entity);
                return true;
            };
            let Some(command) = sequence.events.get(index) else {
                debug!("Sequence '{}' finished on {}", sequence_id, entity);
                return true;
            };
            ScriptCommand::parse(command)
        };

        let step = match parsed {
            Ok(command) => execute(world, entity, command, dt),
            Err(e) => {
                warn!("Skipping command {} of '{}': {}", index, sequence_id, e);
                Step::Advance
            }
        };

        let Some(bookmark) = world.get_mut::<ActiveSequenceBookmark>(entity) else {
            return false;
        };
        match step {
            Step::Advance => bookmark.current_index += 1,
            Step::Wait(remaining) if remaining <= 0.0 => bookmark.current_index += 1,
            Step::Wait(remaining) => bookmark.wait_timer = remaining,
            Step::Block(pending_move) => {
                bookmark.blocked = true;
                bookmark.awaiting_release = true;
                bookmark.pending_move = pending_move;
            }
        }
        false
    }
}

impl<E: Environment + Send + Sync + 'static> System for SequenceInterpreter<E> {
    fn name(&self) -> &str {
        "SequenceInterpreter"
    }

    fn priority(&self) -> i32 {
        priority::INTERPRETER
    }

    fn run_timed(&mut self, world: &mut World, dt: f32) {
        let runners = world.entities_with::<(ActiveSequenceBookmark,)>();
        let finished: Vec<Entity> = runners
            .into_iter()
            .filter(|&entity| self.tick(world, entity, dt))
            .collect();

        for entity in finished {
            world.remove::<ActiveSequenceBookmark>(entity);
            world.despawn(entity);
        }
    }
}

/// Fail open when the request a blocked bookmark waits on has vanished: the
/// move target was despawned, or the fade resource was replaced.
fn release_if_orphaned(world: &mut World, runner: Entity) {
    let Some(bookmark) = world.get::<ActiveSequenceBookmark>(runner) else {
        return;
    };
    if !bookmark.blocked {
        return;
    }
    let pending = match bookmark.pending_move {
        Some(target) => world
            .get::<MoveRequest>(target)
            .is_some_and(|request| request.requester == runner),
        None => world
            .resource::<ScreenFade>()
            .and_then(|fade| fade.active.as_ref())
            .is_some_and(|fade| fade.requester == runner),
    };
    if !pending {
        warn!("Blocking request of {} vanished, continuing", runner);
        release_block(world, runner);
    }
}

/// Resolve a command's target: `None` is the running entity itself.
fn resolve_target(world: &World, runner: Entity, target: Option<&str>) -> Option<Entity> {
    match target {
        None => Some(runner),
        Some(name) => {
            let found = find_tagged(world, name);
            if found.is_none() {
                warn!("No entity tagged '{}' for sequence on {}", name, runner);
            }
            found
        }
    }
}

fn execute(world: &mut World, runner: Entity, command: ScriptCommand, dt: f32) -> Step {
    match command {
        ScriptCommand::Wait { duration } => Step::Wait(duration - dt),
        ScriptCommand::PlaySound { sound_id } => {
            let request = SoundRequest {
                sound_id,
                source: runner,
            };
            match world.resource_mut::<SoundQueue>() {
                Some(queue) => queue.push(request),
                None => {
                    let mut queue = SoundQueue::default();
                    queue.push(request);
                    world.insert_resource(queue);
                }
            }
            Step::Advance
        }
        ScriptCommand::TeleportEntity { target, position } => {
            if let Some(entity) = resolve_target(world, runner, target.as_deref()) {
                match world.get_mut::<Transform>(entity) {
                    Some(transform) => transform.position = position,
                    None => world.insert(entity, Transform::from_position(position)),
                }
            }
            Step::Advance
        }
        ScriptCommand::MoveEntity {
            target,
            destination,
            speed,
            tolerance,
        } => {
            let Some(entity) = resolve_target(world, runner, target.as_deref()) else {
                return Step::Advance;
            };
            if let Some(previous) = world.take::<MoveRequest>(entity) {
                debug!("Move of {} overrides the one issued by {}", entity, previous.requester);
                release_block(world, previous.requester);
            }
            world.insert(
                entity,
                MoveRequest {
                    destination,
                    speed,
                    tolerance,
                    requester: runner,
                },
            );
            Step::Block(Some(entity))
        }
        ScriptCommand::FadeScreen {
            direction,
            duration,
            color,
        } => {
            let interrupted = match world.resource_mut::<ScreenFade>() {
                Some(fade) => fade.start(direction, duration, color, runner),
                None => {
                    let mut fade = ScreenFade::default();
                    fade.start(direction, duration, color, runner);
                    world.insert_resource(fade);
                    None
                }
            };
            if let Some(previous) = interrupted {
                release_block(world, previous);
            }
            Step::Block(None)
        }
        ScriptCommand::StartSequence { sequence_id } => {
            spawn_sequence_runner(world, sequence_id);
            Step::Advance
        }
        ScriptCommand::Log { message } => {
            info!("[script {}] {}", runner, message);
            Step::Advance
        }
    }
}
