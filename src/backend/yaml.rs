//! YAML backend

use std::collections::BTreeMap;

use serde_yaml::value::TaggedValue;
use serde_yaml::Value as YamlValue;

use super::{BackendError, Format};
use crate::value::{Value, VariableMap};

/// Variables from YAML documents
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormat;

impl Format for YamlFormat {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn parse_document(&self, text: &str) -> Result<VariableMap, BackendError> {
        let parsed: YamlValue =
            serde_yaml::from_str(text).map_err(|e| BackendError::Document {
                format: self.name(),
                message: e.to_string(),
            })?;
        // A document holding only comments parses as null
        if parsed.is_null() {
            return Ok(VariableMap::new());
        }
        match convert(parsed).map_err(|message| BackendError::Document {
            format: self.name(),
            message,
        })? {
            Value::Map(map) => Ok(map.into()),
            other => Err(BackendError::NotAMapping {
                format: self.name(),
                found: other.type_name(),
            }),
        }
    }

    fn parse_literal(&self, raw: &str) -> Option<Value> {
        let trimmed = raw.trim();
        // A comment marker would silently drop the rest of the value
        if trimmed.starts_with('#') || raw.contains(" #") || raw.contains("\t#") {
            return None;
        }

        let parsed: YamlValue = serde_yaml::from_str(raw).ok()?;
        match &parsed {
            YamlValue::Null if !NULL_LITERALS.contains(&trimmed) => return None,
            // Only flow collections count; `a: b` or `- a` in an argument is meant as text
            YamlValue::Mapping(_) if !trimmed.starts_with('{') => return None,
            YamlValue::Sequence(_) if !trimmed.starts_with('[') => return None,
            _ => {}
        }
        convert(parsed).ok()
    }
}

const NULL_LITERALS: [&str; 4] = ["~", "null", "Null", "NULL"];

fn convert(value: YamlValue) -> Result<Value, String> {
    Ok(match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => Value::List(
            items
                .into_iter()
                .map(convert)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        YamlValue::Mapping(mapping) => {
            let mut map = BTreeMap::new();
            for (key, value) in mapping {
                map.insert(mapping_key(key)?, convert(value)?);
            }
            Value::Map(map)
        }
        YamlValue::Tagged(tagged) => {
            let TaggedValue { value, .. } = *tagged;
            convert(value)?
        }
    })
}

fn mapping_key(key: YamlValue) -> Result<String, String> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Tagged(tagged) => {
            let TaggedValue { value, .. } = *tagged;
            mapping_key(value)
        }
        YamlValue::Null => Err("null mapping keys are not supported".to_string()),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => {
            Err("mapping keys must be scalars".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document() {
        let vars = YamlFormat
            .parse_document(
                "name: Ann\nports:\n  - 80\n  - 443\n1: one\nnested:\n  deep: !custom yes\n",
            )
            .unwrap();
        assert_eq!(vars.get("name"), Some(&Value::from("Ann")));
        assert_eq!(
            vars.get("ports"),
            Some(&Value::List(vec![Value::Integer(80), Value::Integer(443)]))
        );
        assert_eq!(vars.get("1"), Some(&Value::from("one")));
        assert_eq!(
            vars.get("nested").map(|v| v.to_string()),
            Some(r#"{"deep":"yes"}"#.to_string())
        );
    }

    #[test]
    fn test_comment_only_document() {
        let vars = YamlFormat.parse_document("# nothing here\n").unwrap();
        assert!(vars.is_empty());
    }

    #[test]
    fn test_top_level_scalar_rejected() {
        let err = YamlFormat.parse_document("just text").unwrap_err();
        assert!(matches!(
            err,
            BackendError::NotAMapping {
                format: "yaml",
                found: "string"
            }
        ));
    }

    #[test]
    fn test_literals() {
        assert_eq!(YamlFormat.parse_literal("hello: world"), None);
        assert_eq!(
            YamlFormat.parse_literal("[a, b]"),
            Some(Value::List(vec![Value::from("a"), Value::from("b")]))
        );
        assert!(matches!(YamlFormat.parse_literal("{a: 1}"), Some(Value::Map(_))));
        assert_eq!(YamlFormat.parse_literal("~"), Some(Value::Null));
        assert_eq!(YamlFormat.parse_literal("null"), Some(Value::Null));
    }

    #[test]
    fn test_literals_that_are_not_values_stay_text() {
        for raw in ["#fff", "hello #tag", "- a", "-", "---", "  "] {
            assert_eq!(YamlFormat.parse_literal(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn test_args_keep_comment_like_text() {
        let tokens: Vec<String> = ["color=#fff", "note=hello #tag", "items=- a", "n=5"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let vars = YamlFormat.parse_args(&tokens).unwrap();
        assert_eq!(vars.get("color"), Some(&Value::from("#fff")));
        assert_eq!(vars.get("note"), Some(&Value::from("hello #tag")));
        assert_eq!(vars.get("items"), Some(&Value::from("- a")));
        assert_eq!(vars.get("n"), Some(&Value::Integer(5)));
    }
}
