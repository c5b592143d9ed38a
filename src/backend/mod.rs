//! Backends turn raw variable sources into a [`VariableMap`]
//!
//! A backend is selected by format name and offers two entry points: one for a whole
//! serialized document (variable file or pipe) and one for `key=value` tokens given
//! as positional command-line arguments.

mod json;
mod toml;
mod yaml;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::value::{Value, VariableMap};

pub use self::json::JsonFormat;
pub use self::toml::TomlFormat;
pub use self::yaml::YamlFormat;

/// Errors that can occur while parsing backend input
#[derive(Debug, Error)]
pub enum BackendError {
    /// Format name is not a known backend
    #[error("unknown backend '{name}' (expected one of: toml, json, yaml)")]
    Unknown { name: String },

    /// Document could not be parsed
    #[error("invalid {format} document: {message}")]
    Document {
        format: &'static str,
        message: String,
    },

    /// Document parsed, but its top level is not a key/value mapping
    #[error("{format} document must be a mapping at the top level, found {found}")]
    NotAMapping {
        format: &'static str,
        found: &'static str,
    },

    /// Document defines a variable with an empty name
    #[error("{format} document defines a variable with an empty name")]
    EmptyKey { format: &'static str },

    /// Positional backend argument is not a `key=value` pair
    #[error("invalid backend argument '{token}': {reason}")]
    MalformedArgument { token: String, reason: &'static str },
}

/// A document format that can produce variables
pub trait Format {
    /// Format name as given on the command line
    fn name(&self) -> &'static str;

    /// Parse a complete document whose top level is a mapping
    fn parse_document(&self, text: &str) -> Result<VariableMap, BackendError>;

    /// Parse a single literal value, `None` if it is not valid in this format
    fn parse_literal(&self, raw: &str) -> Option<Value>;

    /// Parse `key=value` tokens; values that are not literals of this format stay strings
    fn parse_args(&self, tokens: &[String]) -> Result<VariableMap, BackendError> {
        let mut vars = VariableMap::new();
        for token in tokens {
            let (key, raw) =
                token
                    .split_once('=')
                    .ok_or_else(|| BackendError::MalformedArgument {
                        token: token.clone(),
                        reason: "expected key=value",
                    })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(BackendError::MalformedArgument {
                    token: token.clone(),
                    reason: "key must not be empty",
                });
            }
            let value = if raw.is_empty() {
                Value::String(String::new())
            } else {
                self.parse_literal(raw)
                    .unwrap_or_else(|| Value::String(raw.to_string()))
            };
            vars.insert(key, value);
        }
        Ok(vars)
    }
}

/// Supported backend formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Toml,
    Json,
    Yaml,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Toml, Backend::Json, Backend::Yaml];

    pub fn name(self) -> &'static str {
        self.format().name()
    }

    fn format(self) -> &'static dyn Format {
        match self {
            Backend::Toml => &TomlFormat,
            Backend::Json => &JsonFormat,
            Backend::Yaml => &YamlFormat,
        }
    }

    /// Parse a variable document. Blank input yields an empty map.
    pub fn parse_document(self, text: &str) -> Result<VariableMap, BackendError> {
        if text.trim().is_empty() {
            debug!(backend = self.name(), "empty document");
            return Ok(VariableMap::new());
        }
        let vars = self.format().parse_document(text)?;
        if vars.contains("") {
            return Err(BackendError::EmptyKey {
                format: self.name(),
            });
        }
        Ok(vars)
    }

    /// Parse positional `key=value` backend arguments
    pub fn parse_args(self, tokens: &[String]) -> Result<VariableMap, BackendError> {
        self.format().parse_args(tokens)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "toml" => Ok(Backend::Toml),
            "json" => Ok(Backend::Json),
            "yaml" | "yml" => Ok(Backend::Yaml),
            _ => Err(BackendError::Unknown {
                name: s.to_string(),
            }),
        }
    }
}
