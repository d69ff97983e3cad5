use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::models::Car;

/// Field names accepted on inbound car payloads, in lower case.
const KNOWN_FIELDS: &[&str] = &["id", "manufacture", "year", "model", "color", "isclassic"];

/// Errors that can occur while reading a car payload from request bytes
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),
    #[error("Expected JSON object")]
    NotAnObject,
    #[error("Unknown field '{0}'")]
    UnknownField(String),
    #[error("Field '{0}' appears more than once")]
    DuplicateField(String),
    #[error("Field '{field}' must be {expected}")]
    WrongType { field: String, expected: &'static str },
    #[error("Invalid UUID format for field '{field}': {value}")]
    InvalidUuid { field: String, value: String },
}

/// A car as submitted by a client on create or update.
///
/// Field names are matched case-insensitively (`Manufacture`, `manufacture`
/// and `MANUFACTURE` are the same field). Missing and `null` string fields are
/// kept as `None` so the validator can report them; anything structurally
/// wrong (non-object body, wrong JSON type, unknown key) is rejected here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarInput {
    /// Client-supplied id. Parsed for well-formedness, never trusted.
    pub id: Option<Uuid>,
    pub manufacture: Option<String>,
    pub year: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub is_classic: bool,
}

impl CarInput {
    /// Parse a request body. A literal `null` body yields `Ok(None)`.
    pub fn from_slice(bytes: &[u8]) -> Result<Option<Self>, RecordError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| RecordError::InvalidJson(e.to_string()))?;
        Self::from_json(value)
    }

    pub fn from_json(value: Value) -> Result<Option<Self>, RecordError> {
        match value {
            Value::Null => Ok(None),
            Value::Object(map) => Self::from_map(map).map(Some),
            _ => Err(RecordError::NotAnObject),
        }
    }

    fn from_map(map: Map<String, Value>) -> Result<Self, RecordError> {
        let mut input = Self::default();
        let mut seen: Vec<String> = Vec::with_capacity(map.len());

        for (key, value) in map {
            let field = key.to_ascii_lowercase();
            if !KNOWN_FIELDS.contains(&field.as_str()) {
                return Err(RecordError::UnknownField(key));
            }
            if seen.contains(&field) {
                return Err(RecordError::DuplicateField(key));
            }
            seen.push(field.clone());

            match field.as_str() {
                "id" => input.id = optional_uuid(&key, value)?,
                "manufacture" => input.manufacture = optional_string(&key, value)?,
                "year" => input.year = optional_string(&key, value)?,
                "model" => input.model = optional_string(&key, value)?,
                "color" => input.color = optional_string(&key, value)?,
                "isclassic" => input.is_classic = optional_bool(&key, value)?.unwrap_or(false),
                _ => unreachable!("field list checked above"),
            }
        }

        Ok(input)
    }

    /// Build the stored representation under the given id. Callers validate
    /// first; absent fields become empty strings.
    pub fn into_car(self, id: Uuid) -> Car {
        Car {
            id,
            manufacture: self.manufacture.unwrap_or_default(),
            year: self.year.unwrap_or_default(),
            model: self.model.unwrap_or_default(),
            color: self.color.unwrap_or_default(),
            is_classic: self.is_classic,
        }
    }
}

fn optional_string(field: &str, value: Value) -> Result<Option<String>, RecordError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        _ => Err(RecordError::WrongType {
            field: field.to_string(),
            expected: "a string",
        }),
    }
}

fn optional_bool(field: &str, value: Value) -> Result<Option<bool>, RecordError> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(b)),
        _ => Err(RecordError::WrongType {
            field: field.to_string(),
            expected: "a boolean",
        }),
    }
}

fn optional_uuid(field: &str, value: Value) -> Result<Option<Uuid>, RecordError> {
    match optional_string(field, value)? {
        None => Ok(None),
        Some(raw) => Uuid::parse_str(&raw)
            .map(Some)
            .map_err(|_| RecordError::InvalidUuid {
                field: field.to_string(),
                value: raw,
            }),
    }
}
