//! Core value types and operations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value represents a JSON/YAML value that can be any of the supported types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Map),
}

/// Map represents a key-value map where keys are strings.
///
/// Entries keep the order they were inserted in, so a document loaded from
/// disk is written back with its keys where they were.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Map {
    pub fields: IndexMap<String, Value>,
}

/// CodecError is returned when text cannot be turned into a Value or back.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns a short name for the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl Map {
    pub fn new() -> Self {
        Map {
            fields: IndexMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields.get_mut(key)
    }

    /// Sets `key` to `value`. An existing key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Removes `key`, shifting later entries up so the order of the rest is kept.
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Map {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Parse a value from JSON.
pub fn from_json(json: &str) -> Result<Value, CodecError> {
    Ok(serde_json::from_str(json)?)
}

/// Serialize a value to pretty-printed JSON with a trailing newline.
pub fn to_json(value: &Value) -> Result<String, CodecError> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

/// Parse a value from YAML. JSON input is accepted too.
///
/// Mapping keys must be strings. An unquoted non-string key such as `80: http`
/// is rejected; quote it (`"80": http`) to load it.
pub fn from_yaml(yaml: &str) -> Result<Value, CodecError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Serialize a value to YAML.
pub fn to_yaml(value: &Value) -> Result<String, CodecError> {
    Ok(serde_yaml::to_string(value)?)
}
