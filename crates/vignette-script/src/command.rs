//! Scripted commands: the raw tagged form loaded from zones and the decoded
//! form the interpreter executes.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use vignette_core::Color;

use crate::error::ScriptError;
use crate::properties::Properties;

pub const WAIT: &str = "WAIT";
pub const PLAY_SOUND: &str = "PLAY_SOUND";
pub const TELEPORT_ENTITY: &str = "TELEPORT_ENTITY";
pub const MOVE_ENTITY: &str = "MOVE_ENTITY";
pub const FADE_SCREEN: &str = "FADE_SCREEN";
pub const START_SEQUENCE: &str = "START_SEQUENCE";
pub const LOG: &str = "LOG";

/// Default walking speed for `MOVE_ENTITY`, in units per second
pub const DEFAULT_MOVE_SPEED: f32 = 5.0;
/// Default arrival distance for `MOVE_ENTITY`
pub const DEFAULT_MOVE_TOLERANCE: f32 = 0.05;
/// Default `FADE_SCREEN` duration in seconds
pub const DEFAULT_FADE_DURATION: f32 = 1.0;

/// A command as authored: a type tag plus a property bag.
///
/// In zone files the tag sits beside the properties:
/// `{ "command": "WAIT", "duration": 1.5 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    #[serde(rename = "command")]
    pub command_type: String,
    #[serde(flatten)]
    pub properties: Properties,
}

impl Command {
    pub fn new(command_type: impl Into<String>) -> Self {
        Self {
            command_type: command_type.into(),
            properties: Properties::new(),
        }
    }

    /// Builder-style property insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn wait(duration: f32) -> Self {
        Self::new(WAIT).with("duration", duration)
    }

    pub fn play_sound(sound_id: impl Into<String>) -> Self {
        Self::new(PLAY_SOUND).with("soundId", sound_id.into())
    }

    pub fn start_sequence(sequence_id: impl Into<String>) -> Self {
        Self::new(START_SEQUENCE).with("sequenceId", sequence_id.into())
    }
}

/// Direction of a screen fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    /// From covered to clear
    In,
    /// From clear to covered
    Out,
}

impl FadeDirection {
    /// Overlay alpha once the fade has finished.
    pub fn target_alpha(self) -> f32 {
        match self {
            Self::In => 0.0,
            Self::Out => 1.0,
        }
    }
}

/// A decoded, strongly-typed command.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Wait {
        duration: f32,
    },
    PlaySound {
        sound_id: String,
    },
    /// `target: None` addresses the entity running the script.
    TeleportEntity {
        target: Option<String>,
        position: Vec3,
    },
    MoveEntity {
        target: Option<String>,
        destination: Vec3,
        speed: f32,
        tolerance: f32,
    },
    FadeScreen {
        direction: FadeDirection,
        duration: f32,
        color: Option<Color>,
    },
    StartSequence {
        sequence_id: String,
    },
    Log {
        message: String,
    },
}

impl ScriptCommand {
    /// Decode a raw command, validating its properties.
    pub fn parse(command: &Command) -> Result<Self, ScriptError> {
        let props = &command.properties;
        let owner = command.command_type.as_str();

        let parsed = match owner {
            WAIT => Self::Wait {
                duration: props.require_number(owner, "duration")?,
            },
            PLAY_SOUND => Self::PlaySound {
                sound_id: props.require_string(owner, "soundId")?.to_string(),
            },
            TELEPORT_ENTITY => Self::TeleportEntity {
                target: props.string("target").map(str::to_string),
                position: read_vec3(props, owner)?,
            },
            MOVE_ENTITY => Self::MoveEntity {
                target: props.string("target").map(str::to_string),
                destination: read_vec3(props, owner)?,
                speed: props.number_or(owner, "speed", DEFAULT_MOVE_SPEED)?,
                tolerance: props
                    .number_or(owner, "tolerance", DEFAULT_MOVE_TOLERANCE)?
                    .max(0.0),
            },
            FADE_SCREEN => Self::FadeScreen {
                direction: read_fade_direction(props, owner)?,
                duration: props.number_or(owner, "duration", DEFAULT_FADE_DURATION)?,
                color: read_color(props, owner)?,
            },
            START_SEQUENCE => Self::StartSequence {
                sequence_id: props.require_string(owner, "sequenceId")?.to_string(),
            },
            LOG => Self::Log {
                message: props.string("message").unwrap_or_default().to_string(),
            },
            other => return Err(ScriptError::UnknownCommand(other.to_string())),
        };
        Ok(parsed)
    }
}

/// Coordinates default to zero when omitted.
fn read_vec3(props: &Properties, owner: &str) -> Result<Vec3, ScriptError> {
    Ok(Vec3::new(
        props.number_or(owner, "x", 0.0)?,
        props.number_or(owner, "y", 0.0)?,
        props.number_or(owner, "z", 0.0)?,
    ))
}

fn read_fade_direction(props: &Properties, owner: &str) -> Result<FadeDirection, ScriptError> {
    let kind = props.require_string(owner, "type")?;
    match kind.to_ascii_lowercase().as_str() {
        "in" | "fade_in" => Ok(FadeDirection::In),
        "out" | "fade_out" => Ok(FadeDirection::Out),
        _ => Err(ScriptError::InvalidProperty {
            owner: owner.to_string(),
            property: "type".to_string(),
            value: kind.to_string(),
        }),
    }
}

fn read_color(props: &Properties, owner: &str) -> Result<Option<Color>, ScriptError> {
    let Some(text) = props.string("color") else {
        return Ok(None);
    };
    Color::parse_hex(text)
        .map(Some)
        .ok_or_else(|| ScriptError::InvalidProperty {
            owner: owner.to_string(),
            property: "color".to_string(),
            value: text.to_string(),
        })
}
