//! Loosely-typed property bags carried by commands and trigger conditions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ScriptError;

/// String-keyed bag of heterogeneous values.
///
/// Numbers may arrive as integers, floats or numeric strings depending on who
/// authored the content, so numeric reads coerce at the point of use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(HashMap<String, Value>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Read a number, coercing integers, floats and numeric strings.
    pub fn number(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(coerce_number)
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Read a required number on behalf of `owner` (used in error messages).
    pub fn require_number(&self, owner: &str, key: &str) -> Result<f32, ScriptError> {
        let value = self.get(key).ok_or_else(|| missing(owner, key))?;
        coerce_number(value).ok_or_else(|| invalid(owner, key, value))
    }

    /// Read an optional number; present-but-invalid values are still an error.
    pub fn number_or(&self, owner: &str, key: &str, default: f32) -> Result<f32, ScriptError> {
        if self.contains(key) {
            self.require_number(owner, key)
        } else {
            Ok(default)
        }
    }

    /// Read a required string on behalf of `owner`.
    pub fn require_string(&self, owner: &str, key: &str) -> Result<&str, ScriptError> {
        let value = self.get(key).ok_or_else(|| missing(owner, key))?;
        value.as_str().ok_or_else(|| invalid(owner, key, value))
    }
}

fn coerce_number(value: &Value) -> Option<f32> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number as f32)
}

fn missing(owner: &str, key: &str) -> ScriptError {
    ScriptError::MissingProperty {
        owner: owner.to_string(),
        property: key.to_string(),
    }
}

fn invalid(owner: &str, key: &str, value: &Value) -> ScriptError {
    ScriptError::InvalidProperty {
        owner: owner.to_string(),
        property: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_are_coerced() {
        let props = Properties::new()
            .with("int", 2)
            .with("float", 0.5)
            .with("text", "1.25")
            .with("word", "fast")
            .with("flag", true);

        assert_eq!(props.number("int"), Some(2.0));
        assert_eq!(props.number("float"), Some(0.5));
        assert_eq!(props.number("text"), Some(1.25));
        assert_eq!(props.number("word"), None);
        assert_eq!(props.number("flag"), None);
        assert_eq!(props.number("missing"), None);
    }

    #[test]
    fn required_reads_report_owner() {
        let props = Properties::new().with("speed", json!([1, 2]));

        assert_eq!(
            props.require_number("MOVE_ENTITY", "x"),
            Err(ScriptError::MissingProperty {
                owner: "MOVE_ENTITY".to_string(),
                property: "x".to_string(),
            })
        );
        assert!(matches!(
            props.require_number("MOVE_ENTITY", "speed"),
            Err(ScriptError::InvalidProperty { .. })
        ));
        assert!(props.number_or("MOVE_ENTITY", "speed", 1.0).is_err());
        assert_eq!(props.number_or("MOVE_ENTITY", "tolerance", 0.1), Ok(0.1));
    }

    #[test]
    fn strings() {
        let props: Properties =
            serde_json::from_value(json!({ "soundId": "click", "n": 3 }))
                .expect("valid json");
        assert_eq!(props.string("soundId"), Some("click"));
        assert_eq!(props.require_string("PLAY_SOUND", "soundId"), Ok("click"));
        assert!(props.require_string("PLAY_SOUND", "n").is_err());
        assert_eq!(props.string("n"), None);
    }
}
