//! Variable values and the key/value map they live in
//!
//! Every backend converts its own document model into [`Value`], so the renderer only
//! ever has to deal with this closed set of variants.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A single variable value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Short name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Follow one path step into a list or map
    pub fn child(&self, segment: &PathSegment) -> Result<&Value, PathError> {
        match (self, segment) {
            (Value::Map(map), PathSegment::Key(key)) => {
                map.get(key).ok_or_else(|| PathError::MissingKey(key.clone()))
            }
            (Value::Map(map), PathSegment::Index(index)) => map
                .get(&index.to_string())
                .ok_or_else(|| PathError::MissingKey(index.to_string())),
            (Value::List(items), PathSegment::Index(index)) => {
                items.get(*index).ok_or(PathError::IndexOutOfRange {
                    index: *index,
                    len: items.len(),
                })
            }
            (other, segment) => Err(PathError::NotAContainer {
                segment: segment.to_string(),
                found: other.type_name(),
            }),
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

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Text substituted into a template for this value.
///
/// Scalars print bare, `Null` prints nothing, lists and maps print as compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::List(_) | Value::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

/// One step of a dotted placeholder path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Why a path could not be followed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    MissingKey(String),
    IndexOutOfRange { index: usize, len: usize },
    NotAContainer { segment: String, found: &'static str },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::MissingKey(key) => write!(f, "no key '{}'", key),
            PathError::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for list of length {}", index, len)
            }
            PathError::NotAContainer { segment, found } => {
                write!(f, "cannot look up '{}' in a {}", segment, found)
            }
        }
    }
}

/// Resolved variables, keyed by case-sensitive name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableMap {
    entries: BTreeMap<String, Value>,
}

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge `other` into this map; values from `other` win on key collision
    pub fn overlay(&mut self, other: VariableMap) {
        self.entries.extend(other.entries);
    }

    /// Look up `name` and then follow `rest` into nested lists and maps.
    ///
    /// On failure the error carries how many segments of `rest` were consumed.
    pub fn lookup(&self, name: &str, rest: &[PathSegment]) -> Option<Result<&Value, (usize, PathError)>> {
        let root = self.entries.get(name)?;
        let mut current = root;
        for (depth, segment) in rest.iter().enumerate() {
            match current.child(segment) {
                Ok(next) => current = next,
                Err(e) => return Some(Err((depth, e))),
            }
        }
        Some(Ok(current))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for VariableMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for VariableMap {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<BTreeMap<String, Value>> for VariableMap {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_later_wins() {
        let mut base: VariableMap = [("name", "Ann"), ("city", "Oslo")].into_iter().collect();
        let top: VariableMap = [("name", "Bob")].into_iter().collect();
        base.overlay(top);

        assert_eq!(base.len(), 2);
        assert_eq!(base.get("name"), Some(&Value::from("Bob")));
        assert_eq!(base.get("city"), Some(&Value::from("Oslo")));
    }

    #[test]
    fn test_overlay_empty_is_noop() {
        let mut base: VariableMap = [("a", 1i64)].into_iter().collect();
        let before = base.clone();
        base.overlay(VariableMap::new());
        assert_eq!(base, before);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let map: VariableMap = [("Name", "upper"), ("name", "lower")].into_iter().collect();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("Name"), Some(&Value::from("upper")));
    }

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::from("hi").to_string(), "hi");
        assert_eq!(Value::from(42i64).to_string(), "42");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from(3.0).to_string(), "3");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_display_containers_as_json() {
        let list = Value::List(vec![Value::from("a"), Value::from(1i64)]);
        assert_eq!(list.to_string(), r#"["a",1]"#);

        let mut inner = BTreeMap::new();
        inner.insert("k".to_string(), Value::Bool(false));
        inner.insert("n".to_string(), Value::Null);
        assert_eq!(Value::Map(inner).to_string(), r#"{"k":false,"n":null}"#);
    }

    #[test]
    fn test_lookup_nested_path() {
        let mut server = BTreeMap::new();
        server.insert(
            "ports".to_string(),
            Value::List(vec![Value::from(80i64), Value::from(443i64)]),
        );
        let mut map = VariableMap::new();
        map.insert("server", Value::Map(server));

        let path = [PathSegment::Key("ports".into()), PathSegment::Index(1)];
        let found = map.lookup("server", &path).unwrap().unwrap();
        assert_eq!(found, &Value::from(443i64));
    }

    #[test]
    fn test_lookup_missing_root() {
        let map = VariableMap::new();
        assert!(map.lookup("nope", &[]).is_none());
    }

    #[test]
    fn test_lookup_errors_report_depth() {
        let mut map = VariableMap::new();
        map.insert("list", Value::List(vec![Value::from("x")]));
        map.insert("name", "plain");

        let err = map
            .lookup("list", &[PathSegment::Index(5)])
            .unwrap()
            .unwrap_err();
        assert_eq!(err, (0, PathError::IndexOutOfRange { index: 5, len: 1 }));

        let err = map
            .lookup("name", &[PathSegment::Key("first".into())])
            .unwrap()
            .unwrap_err();
        assert!(matches!(err.1, PathError::NotAContainer { found: "string", .. }));
    }
}
