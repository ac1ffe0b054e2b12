//! The environment that supplies sequences and triggers.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use glam::Vec3;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ZoneError;
use crate::sequence::{Sequence, Trigger};

/// Source of scripted content for the interpreter and trigger evaluator.
pub trait Environment {
    /// Look up a sequence of the active environment by id.
    fn sequence(&self, id: &str) -> Option<&Sequence>;

    /// Triggers declared by the active environment.
    fn triggers(&self) -> &[Trigger];

    /// Incremented every time the active environment changes. Consumers
    /// compare it against the value they last saw to detect a reload.
    fn generation(&self) -> u64;
}

/// Environment handle shared between systems.
pub type Shared<E> = Arc<RwLock<E>>;

/// An actor the zone places in the world when it becomes active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSpawn {
    pub tag: String,
    #[serde(default)]
    pub position: Vec3,
}

/// A loadable environment: actors, sequences and triggers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    #[serde(default)]
    pub actors: Vec<ActorSpawn>,
    #[serde(default)]
    pub sequences: Vec<Sequence>,
    #[serde(default)]
    pub triggers: Vec<Trigger>,
}

impl Zone {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_sequence(mut self, sequence: Sequence) -> Self {
        self.sequences.push(sequence);
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    pub fn with_actor(mut self, tag: impl Into<String>, position: Vec3) -> Self {
        self.actors.push(ActorSpawn {
            tag: tag.into(),
            position,
        });
        self
    }

    pub fn from_json(text: &str) -> Result<Self, ZoneError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a JSON zone file.
    pub fn load(path: &Path) -> Result<Self, ZoneError> {
        let text = fs::read_to_string(path).map_err(|e| ZoneError::Io(path.to_path_buf(), e))?;
        Self::from_json(&text)
    }
}

/// Holds the active zone and indexes its sequences by id.
#[derive(Debug, Default)]
pub struct ZoneService {
    zone: Option<Zone>,
    sequence_index: HashMap<String, usize>,
    generation: u64,
}

impl ZoneService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a fresh service for sharing between systems.
    pub fn shared() -> Shared<Self> {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Make `zone` the active environment.
    pub fn load(&mut self, zone: Zone) {
        self.sequence_index = zone
            .sequences
            .iter()
            .enumerate()
            .map(|(i, sequence)| (sequence.id.clone(), i))
            .collect();
        info!(
            "Loaded zone '{}' ({} sequences, {} triggers)",
            zone.id,
            zone.sequences.len(),
            zone.triggers.len()
        );
        self.zone = Some(zone);
        self.generation += 1;
    }

    /// Clear the active environment.
    pub fn unload(&mut self) -> Option<Zone> {
        self.sequence_index.clear();
        let zone = self.zone.take();
        if let Some(zone) = &zone {
            info!("Unloaded zone '{}'", zone.id);
            self.generation += 1;
        }
        zone
    }

    pub fn current(&self) -> Option<&Zone> {
        self.zone.as_ref()
    }
}

impl Environment for ZoneService {
    fn sequence(&self, id: &str) -> Option<&Sequence> {
        let index = *self.sequence_index.get(id)?;
        self.zone.as_ref()?.sequences.get(index)
    }

    fn triggers(&self) -> &[Trigger] {
        match &self.zone {
            Some(zone) => &zone.triggers,
            None => &[],
        }
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}
