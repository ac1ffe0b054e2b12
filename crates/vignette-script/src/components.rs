//! Components and resources shared between the interpreter and the systems
//! that resolve its blocking commands.
//!
//! # Blocking handshake
//!
//! A blocking command never calls back into the interpreter. Instead:
//! 1. the interpreter posts a request (a [`MoveRequest`] component on the
//!    target, or a fade on the [`ScreenFade`] resource) naming the script
//!    entity as `requester`, and sets `blocked` on that entity's bookmark;
//! 2. the resolver works the request every tick and, once it is done, removes
//!    the request and calls [`release_block`] on the requester;
//! 3. the interpreter polls `blocked` each tick and moves past the command on
//!    the first pass that finds it cleared.
//!
//! A request that disappears without being resolved (its target despawned, or
//! a newer request replaced it) releases the requester as well, so a script
//! never stays blocked on work nobody will finish.

use glam::Vec3;
use tracing::debug;
use vignette_core::Color;
use vignette_ecs::{Entity, World};

use crate::command::FadeDirection;

/// Marks an entity as a running script instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSequenceBookmark {
    pub sequence_id: String,
    /// Index of the next command to execute
    pub current_index: usize,
    /// Seconds left on a `WAIT`; zero when not waiting
    pub wait_timer: f32,
    /// Set while a blocking command is unresolved
    pub blocked: bool,
    /// A blocking command was issued and its release not yet consumed
    pub awaiting_release: bool,
    /// Entity carrying the [`MoveRequest`] this bookmark is blocked on
    pub pending_move: Option<Entity>,
}

impl ActiveSequenceBookmark {
    pub fn new(sequence_id: impl Into<String>) -> Self {
        Self {
            sequence_id: sequence_id.into(),
            current_index: 0,
            wait_timer: 0.0,
            blocked: false,
            awaiting_release: false,
            pending_move: None,
        }
    }
}

/// Spawn a dedicated entity that runs `sequence_id` from the start.
pub fn spawn_sequence_runner(world: &mut World, sequence_id: impl Into<String>) -> Entity {
    let entity = world.spawn();
    let bookmark = ActiveSequenceBookmark::new(sequence_id);
    debug!("Starting sequence '{}' on entity {}", bookmark.sequence_id, entity);
    world.insert(entity, bookmark);
    entity
}

/// Clear the block on `requester`'s bookmark, if it still exists.
pub fn release_block(world: &mut World, requester: Entity) {
    if let Some(bookmark) = world.get_mut::<ActiveSequenceBookmark>(requester) {
        bookmark.blocked = false;
    }
}

/// Names an entity so scripts can address it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(pub String);

/// Find the first active entity tagged `name`.
pub fn find_tagged(world: &World, name: &str) -> Option<Entity> {
    world
        .entities_with::<(Tag,)>()
        .into_iter()
        .find(|&entity| world.get::<Tag>(entity).is_some_and(|tag| tag.0 == name))
}

/// Request to walk an entity to `destination`, posted by `MOVE_ENTITY`.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveRequest {
    pub destination: Vec3,
    /// Units per second
    pub speed: f32,
    /// Arrival distance
    pub tolerance: f32,
    /// Script entity to release on arrival
    pub requester: Entity,
}

/// A fade in progress on the [`ScreenFade`] resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveFade {
    pub from: f32,
    pub to: f32,
    pub duration: f32,
    pub elapsed: f32,
    pub requester: Entity,
}

/// Full-screen overlay state, read by the renderer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreenFade {
    /// 0.0 = clear, 1.0 = fully covered
    pub alpha: f32,
    pub color: Color,
    pub active: Option<ActiveFade>,
}

impl ScreenFade {
    /// Begin fading toward `direction`'s target alpha. Returns the requester
    /// of a fade this one interrupted, which must be released.
    pub fn start(
        &mut self,
        direction: FadeDirection,
        duration: f32,
        color: Option<Color>,
        requester: Entity,
    ) -> Option<Entity> {
        if let Some(color) = color {
            self.color = color;
        }
        let interrupted = self.active.take().map(|fade| fade.requester);
        self.active = Some(ActiveFade {
            from: self.alpha,
            to: direction.target_alpha(),
            duration: duration.max(0.0),
            elapsed: 0.0,
            requester,
        });
        interrupted
    }

    /// Advance the active fade. Returns the requester once the fade completes.
    pub fn advance(&mut self, dt: f32) -> Option<Entity> {
        let fade = self.active.as_mut()?;
        fade.elapsed += dt;
        let t = if fade.duration > 0.0 {
            (fade.elapsed / fade.duration).min(1.0)
        } else {
            1.0
        };
        self.alpha = fade.from + (fade.to - fade.from) * t;
        if t < 1.0 {
            return None;
        }
        self.active.take().map(|fade| fade.requester)
    }

    pub fn is_fading(&self) -> bool {
        self.active.is_some()
    }
}

/// A sound queued by `PLAY_SOUND`.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundRequest {
    pub sound_id: String,
    pub source: Entity,
}

/// Sounds waiting for the audio device, drained once per frame by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoundQueue {
    pending: Vec<SoundRequest>,
}

impl SoundQueue {
    pub fn push(&mut self, request: SoundRequest) {
        self.pending.push(request);
    }

    pub fn drain(&mut self) -> Vec<SoundRequest> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
