//! Fires zone triggers whose conditions are satisfied.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};
use vignette_ecs::{System, World};

use crate::command::{ScriptCommand, START_SEQUENCE};
use crate::components::spawn_sequence_runner;
use crate::priority;
use crate::sequence::TriggerCondition;
use crate::zone::{Environment, Shared, ZoneService};

/// Watches the environment's triggers and starts sequences when they fire.
///
/// Timing is measured from the moment the evaluator first observes the
/// current environment generation; a reload starts the clock over and rearms
/// every trigger.
pub struct TriggerEvaluator<E = ZoneService> {
    environment: Shared<E>,
    fired: HashSet<String>,
    /// Triggers already reported as unsupported or malformed
    reported: HashSet<String>,
    elapsed: f32,
    seen_generation: Option<u64>,
}

impl<E> TriggerEvaluator<E> {
    pub fn new(environment: Shared<E>) -> Self {
        Self {
            environment,
            fired: HashSet::new(),
            reported: HashSet::new(),
            elapsed: 0.0,
            seen_generation: None,
        }
    }

    /// Forget fired triggers and restart the load clock.
    pub fn reset(&mut self) {
        self.fired.clear();
        self.reported.clear();
        self.elapsed = 0.0;
    }

    pub fn has_fired(&self, trigger_id: &str) -> bool {
        self.fired.contains(trigger_id)
    }
}

impl<E: Environment + Send + Sync + 'static> System for TriggerEvaluator<E> {
    fn name(&self) -> &str {
        "TriggerEvaluator"
    }

    fn priority(&self) -> i32 {
        priority::TRIGGERS
    }

    fn run_timed(&mut self, world: &mut World, dt: f32) {
        let shared = Arc::clone(&self.environment);
        let environment = shared.read();

        let generation = environment.generation();
        if self.seen_generation != Some(generation) {
            if self.seen_generation.is_some() {
                debug!("Environment changed, rearming triggers");
            }
            self.reset();
            self.seen_generation = Some(generation);
        }
        self.elapsed += dt;

        for trigger in environment.triggers() {
            if self.fired.contains(&trigger.id) && !trigger.repeatable {
                continue;
            }

            let satisfied = match TriggerCondition::parse(&trigger.condition) {
                Ok(TriggerCondition::OnLoad { delay }) => self.elapsed >= delay,
                Ok(condition) => {
                    if self.reported.insert(trigger.id.clone()) {
                        debug!("Trigger '{}': {:?} is not evaluated", trigger.id, condition);
                    }
                    false
                }
                Err(e) => {
                    if self.reported.insert(trigger.id.clone()) {
                        warn!("Trigger '{}' ignored: {}", trigger.id, e);
                    }
                    false
                }
            };
            if !satisfied {
                continue;
            }

            info!("Trigger '{}' fired", trigger.id);
            for command in &trigger.commands {
                match ScriptCommand::parse(command) {
                    Ok(ScriptCommand::StartSequence { sequence_id }) => {
                        spawn_sequence_runner(world, sequence_id);
                    }
                    Ok(_) => warn!(
                        "Trigger '{}' can only run {}, skipping {}",
                        trigger.id, START_SEQUENCE, command.command_type
                    ),
                    Err(e) => warn!("Trigger '{}' skipped a command: {}", trigger.id, e),
                }
            }
            self.fired.insert(trigger.id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::components::ActiveSequenceBookmark;
    use crate::sequence::{Condition, Sequence, Trigger, ON_INTERACT};
    use crate::properties::Properties;
    use crate::zone::Zone;

    fn runner_count(world: &World) -> usize {
        world.entities_with::<(ActiveSequenceBookmark,)>().len()
    }

    fn zone_with(trigger: Trigger) -> Zone {
        Zone::new("test")
            .with_sequence(Sequence::new("intro", vec![Command::wait(1.0)]))
            .with_trigger(trigger)
    }

    #[test]
    fn on_load_fires_once_after_delay() {
        let environment = ZoneService::shared();
        environment.write().load(zone_with(Trigger::new(
            "start",
            Condition::on_load(0.05),
            vec![Command::start_sequence("intro")],
        )));
        let mut world = World::new();
        let mut evaluator = TriggerEvaluator::new(environment);

        evaluator.run_timed(&mut world, 0.01);
        assert_eq!(runner_count(&world), 0);
        assert!(!evaluator.has_fired("start"));

        evaluator.run_timed(&mut world, 0.05);
        assert_eq!(runner_count(&world), 1);
        assert!(evaluator.has_fired("start"));

        for _ in 0..10 {
            evaluator.run_timed(&mut world, 0.1);
        }
        assert_eq!(runner_count(&world), 1);
    }

    #[test]
    fn repeatable_trigger_fires_every_tick() {
        let environment = ZoneService::shared();
        environment.write().load(zone_with(
            Trigger::new(
                "loop",
                Condition::on_load(0.0),
                vec![Command::start_sequence("intro")],
            )
            .repeatable(),
        ));
        let mut world = World::new();
        let mut evaluator = TriggerEvaluator::new(environment);

        evaluator.run_timed(&mut world, 0.1);
        evaluator.run_timed(&mut world, 0.1);
        assert_eq!(runner_count(&world), 2);
    }

    #[test]
    fn reload_rearms_triggers() {
        let environment = ZoneService::shared();
        let trigger = Trigger::new(
            "start",
            Condition::on_load(0.0),
            vec![Command::start_sequence("intro")],
        );
        environment.write().load(zone_with(trigger.clone()));
        let mut world = World::new();
        let mut evaluator = TriggerEvaluator::new(environment.clone());

        evaluator.run_timed(&mut world, 0.1);
        evaluator.run_timed(&mut world, 0.1);
        assert_eq!(runner_count(&world), 1);

        environment.write().load(zone_with(trigger));
        evaluator.run_timed(&mut world, 0.1);
        assert_eq!(runner_count(&world), 2);
    }

    #[test]
    fn unsupported_conditions_and_commands_never_spawn() {
        let environment = ZoneService::shared();
        let interact = Trigger::new(
            "talk",
            Condition {
                condition_type: ON_INTERACT.to_string(),
                properties: Properties::new(),
            },
            vec![Command::start_sequence("intro")],
        );
        let chime = Trigger::new(
            "chime",
            Condition::on_load(0.0),
            vec![Command::play_sound("bell")],
        );
        environment
            .write()
            .load(zone_with(interact).with_trigger(chime));
        let mut world = World::new();
        let mut evaluator = TriggerEvaluator::new(environment);

        for _ in 0..3 {
            evaluator.run_timed(&mut world, 1.0);
        }
        assert_eq!(runner_count(&world), 0);
        assert!(!evaluator.has_fired("talk"));
        assert!(evaluator.has_fired("chime"));
    }

    #[test]
    fn empty_environment_is_quiet() {
        let mut world = World::new();
        let mut evaluator = TriggerEvaluator::new(ZoneService::shared());
        evaluator.run_timed(&mut world, 0.1);
        assert_eq!(world.entity_count(), 0);
    }
}
