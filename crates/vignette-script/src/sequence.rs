//! Sequences and triggers as authored in zone files.

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::error::ScriptError;
use crate::properties::Properties;

pub const ON_LOAD: &str = "ON_LOAD";
pub const ON_ENTER_AREA: &str = "ON_ENTER_AREA";
pub const ON_INTERACT: &str = "ON_INTERACT";

/// An ordered, immutable script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub id: String,
    #[serde(default)]
    pub events: Vec<Command>,
}

impl Sequence {
    pub fn new(id: impl Into<String>, events: Vec<Command>) -> Self {
        Self {
            id: id.into(),
            events,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Raw trigger condition: `{ "type": "ON_LOAD", "delay": 0.5 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    #[serde(flatten)]
    pub properties: Properties,
}

impl Condition {
    pub fn on_load(delay: f32) -> Self {
        Self {
            condition_type: ON_LOAD.to_string(),
            properties: Properties::new().with("delay", delay),
        }
    }
}

/// Decoded trigger condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerCondition {
    /// Satisfied once `delay` seconds have passed since the zone loaded
    OnLoad { delay: f32 },
    /// Not evaluated yet; never satisfied
    OnEnterArea,
    /// Not evaluated yet; never satisfied
    OnInteract,
}

impl TriggerCondition {
    pub fn parse(condition: &Condition) -> Result<Self, ScriptError> {
        let owner = condition.condition_type.as_str();
        match owner {
            ON_LOAD => Ok(Self::OnLoad {
                delay: condition.properties.number_or(owner, "delay", 0.0)?,
            }),
            ON_ENTER_AREA => Ok(Self::OnEnterArea),
            ON_INTERACT => Ok(Self::OnInteract),
            other => Err(ScriptError::UnknownCondition(other.to_string())),
        }
    }
}

/// A condition bound to the commands it runs when satisfied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub id: String,
    pub condition: Condition,
    #[serde(default)]
    pub commands: Vec<Command>,
    #[serde(default)]
    pub repeatable: bool,
}

impl Trigger {
    pub fn new(id: impl Into<String>, condition: Condition, commands: Vec<Command>) -> Self {
        Self {
            id: id.into(),
            condition,
            commands,
            repeatable: false,
        }
    }

    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }
}
