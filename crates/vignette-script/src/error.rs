use std::path::PathBuf;

/// Errors raised while decoding scripted content.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    #[error("unknown command type '{0}'")]
    UnknownCommand(String),

    #[error("unknown trigger condition '{0}'")]
    UnknownCondition(String),

    #[error("{owner} is missing property '{property}'")]
    MissingProperty { owner: String, property: String },

    #[error("{owner} has an invalid '{property}' value: {value}")]
    InvalidProperty {
        owner: String,
        property: String,
        value: String,
    },
}

/// Errors that can occur while loading a zone file.
#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    #[error("failed to read zone file '{0}': {1}")]
    Io(PathBuf, std::io::Error),

    #[error("failed to parse zone: {0}")]
    Parse(#[from] serde_json::Error),
}
