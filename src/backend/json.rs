//! JSON backend

use serde_json::Value as JsonValue;

use super::{BackendError, Format};
use crate::value::{Value, VariableMap};

/// Variables from JSON documents
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn parse_document(&self, text: &str) -> Result<VariableMap, BackendError> {
        let parsed: JsonValue =
            serde_json::from_str(text).map_err(|e| BackendError::Document {
                format: self.name(),
                message: e.to_string(),
            })?;
        match convert(parsed) {
            Value::Map(map) => Ok(map.into()),
            other => Err(BackendError::NotAMapping {
                format: self.name(),
                found: other.type_name(),
            }),
        }
    }

    fn parse_literal(&self, raw: &str) -> Option<Value> {
        serde_json::from_str::<JsonValue>(raw).ok().map(convert)
    }
}

fn convert(value: JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => Value::String(s),
        JsonValue::Array(items) => Value::List(items.into_iter().map(convert).collect()),
        JsonValue::Object(obj) => {
            Value::Map(obj.into_iter().map(|(k, v)| (k, convert(v))).collect())
        }
    }
}
