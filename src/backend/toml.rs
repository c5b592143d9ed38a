//! TOML backend

use ::toml::{Table, Value as TomlValue};

use super::{BackendError, Format};
use crate::value::{Value, VariableMap};

/// Variables from TOML documents
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlFormat;

impl Format for TomlFormat {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn parse_document(&self, text: &str) -> Result<VariableMap, BackendError> {
        let table: Table = text.parse().map_err(|e: ::toml::de::Error| BackendError::Document {
            format: self.name(),
            message: e.message().to_string(),
        })?;
        Ok(table.into_iter().map(|(k, v)| (k, convert(v))).collect())
    }

    fn parse_literal(&self, raw: &str) -> Option<Value> {
        // A newline would let the literal smuggle in extra keys
        if raw.contains('\n') {
            return None;
        }
        let mut table: Table = format!("value = {}", raw).parse().ok()?;
        table.remove("value").map(convert)
    }
}

fn convert(value: TomlValue) -> Value {
    match value {
        TomlValue::String(s) => Value::String(s),
        TomlValue::Integer(n) => Value::Integer(n),
        TomlValue::Float(n) => Value::Float(n),
        TomlValue::Boolean(b) => Value::Bool(b),
        TomlValue::Datetime(dt) => Value::String(dt.to_string()),
        TomlValue::Array(items) => Value::List(items.into_iter().map(convert).collect()),
        TomlValue::Table(table) => {
            Value::Map(table.into_iter().map(|(k, v)| (k, convert(v))).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_document() {
        let vars = TomlFormat
            .parse_document(
                r#"
                name = "Ann"
                port = 8080
                ratio = 0.5
                born = 1979-05-27

                [server]
                hosts = ["a", "b"]
            "#,
            )
            .unwrap();

        assert_eq!(vars.get("name"), Some(&Value::from("Ann")));
        assert_eq!(vars.get("port"), Some(&Value::Integer(8080)));
        assert_eq!(vars.get("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(vars.get("born"), Some(&Value::from("1979-05-27")));
        assert_eq!(
            vars.get("server").map(|v| v.to_string()),
            Some(r#"{"hosts":["a","b"]}"#.to_string())
        );
    }

    #[test]
    fn test_parse_document_error() {
        let err = TomlFormat.parse_document("name = ").unwrap_err();
        assert!(matches!(err, BackendError::Document { format: "toml", .. }));
    }

    #[test]
    fn test_literals() {
        assert_eq!(TomlFormat.parse_literal("42"), Some(Value::Integer(42)));
        assert_eq!(TomlFormat.parse_literal(r#""quoted""#), Some(Value::from("quoted")));
        assert_eq!(
            TomlFormat.parse_literal(r#"["x", 1]"#),
            Some(Value::List(vec![Value::from("x"), Value::Integer(1)]))
        );
        assert_eq!(TomlFormat.parse_literal("bare words"), None);
        assert_eq!(TomlFormat.parse_literal("1\nother = 2"), None);
    }
}
