//! Resolves `MOVE_ENTITY` requests.

use tracing::debug;
use vignette_core::Transform;
use vignette_ecs::{Entity, System, World};

use crate::components::{release_block, MoveRequest};
use crate::priority;

/// Walks entities carrying a [`MoveRequest`] toward its destination and
/// releases the requesting script on arrival.
#[derive(Debug, Default, Clone, Copy)]
pub struct MovementSystem;

impl System for MovementSystem {
    fn name(&self) -> &str {
        "MovementSystem"
    }

    fn priority(&self) -> i32 {
        priority::MOVEMENT
    }

    fn run_timed(&mut self, world: &mut World, dt: f32) {
        let movers = world.entities_with::<(MoveRequest,)>();
        let mut arrived: Vec<(Entity, Entity)> = Vec::new();

        for entity in movers {
            let Some(request) = world.get::<MoveRequest>(entity).cloned() else {
                continue;
            };
            if !world.has::<Transform>(entity) {
                world.insert(entity, Transform::default());
            }
            let Some(transform) = world.get_mut::<Transform>(entity) else {
                continue;
            };

            let offset = request.destination - transform.position;
            let distance = offset.length();
            let step = request.speed * dt;

            if distance <= request.tolerance || request.speed <= 0.0 || step >= distance {
                transform.position = request.destination;
                arrived.push((entity, request.requester));
                continue;
            }

            transform.position += offset / distance * step;
            if distance - step <= request.tolerance {
                transform.position = request.destination;
                arrived.push((entity, request.requester));
            }
        }

        for (entity, requester) in arrived {
            debug!("{} reached its destination", entity);
            world.remove::<MoveRequest>(entity);
            release_block(world, requester);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::spawn_sequence_runner;
    use crate::components::ActiveSequenceBookmark;
    use glam::Vec3;

    fn request(destination: Vec3, speed: f32, requester: Entity) -> MoveRequest {
        MoveRequest {
            destination,
            speed,
            tolerance: 0.05,
            requester,
        }
    }

    #[test]
    fn walks_at_speed_then_snaps() {
        let mut world = World::new();
        let runner = spawn_sequence_runner(&mut world, "s");
        if let Some(bookmark) = world.get_mut::<ActiveSequenceBookmark>(runner) {
            bookmark.blocked = true;
        }
        let walker = world.spawn();
        world.insert(walker, request(Vec3::new(0.0, 0.0, 3.0), 2.0, runner));

        let mut system = MovementSystem;
        system.run_timed(&mut world, 0.5);
        let position = world.get::<Transform>(walker).map(|t| t.position);
        assert_eq!(position, Some(Vec3::new(0.0, 0.0, 1.0)));
        assert!(world.has::<MoveRequest>(walker));

        system.run_timed(&mut world, 0.5);
        system.run_timed(&mut world, 0.5);
        let position = world.get::<Transform>(walker).map(|t| t.position);
        assert_eq!(position, Some(Vec3::new(0.0, 0.0, 3.0)));
        assert!(!world.has::<MoveRequest>(walker));
        assert_eq!(
            world.get::<ActiveSequenceBookmark>(runner).map(|b| b.blocked),
            Some(false)
        );
    }

    #[test]
    fn stationary_speed_arrives_immediately() {
        let mut world = World::new();
        let runner = world.spawn();
        let walker = world.spawn();
        world.insert(walker, Transform::default());
        world.insert(walker, request(Vec3::new(5.0, 0.0, 0.0), 0.0, runner));

        MovementSystem.run_timed(&mut world, 0.016);
        assert_eq!(
            world.get::<Transform>(walker).map(|t| t.position),
            Some(Vec3::new(5.0, 0.0, 0.0))
        );
        assert!(!world.has::<MoveRequest>(walker));
    }
}
