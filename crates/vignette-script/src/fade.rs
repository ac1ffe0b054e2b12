//! Resolves `FADE_SCREEN` requests.

use vignette_ecs::{System, World};

use crate::components::{release_block, ScreenFade};
use crate::priority;

/// Advances the [`ScreenFade`] resource and releases the requesting script
/// once the overlay reaches its target.
#[derive(Debug, Default, Clone, Copy)]
pub struct FadeSystem;

impl System for FadeSystem {
    fn name(&self) -> &str {
        "FadeSystem"
    }

    fn priority(&self) -> i32 {
        priority::FADE
    }

    fn run_timed(&mut self, world: &mut World, dt: f32) {
        let finished = world
            .resource_mut::<ScreenFade>()
            .and_then(|fade| fade.advance(dt));
        if let Some(requester) = finished {
            release_block(world, requester);
        }
    }
}
