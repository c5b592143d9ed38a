//! Configuration for a single invocation

use crate::backend::Backend;
use crate::input::STDIN_SENTINEL;
use crate::template::Delimiters;
use crate::value::VariableMap;

/// Environment variable selecting the backend format
pub const ENV_BACKEND: &str = "SY_BACKEND";
/// Environment variable enabling debug logging
pub const ENV_DEBUG: &str = "SY_DEBUG";
/// Environment variable overriding the left delimiter
pub const ENV_DELIM_LEFT: &str = "SY_DELIML";
/// Environment variable overriding the right delimiter
pub const ENV_DELIM_RIGHT: &str = "SY_DELIMR";

/// Everything one run needs: inputs, variable sources and rendering options
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Template path, or `-` for standard input
    pub template: String,

    /// Variable file path, or `-` for standard input
    pub variable_file: String,

    /// `key:value` pairs from flags, in command-line order
    pub variables: Vec<(String, String)>,

    /// Format used for the variable file and backend arguments
    pub backend: Backend,

    /// Positional `key=value` tokens following the template
    pub backend_args: Vec<String>,

    pub delimiters: Delimiters,

    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template: STDIN_SENTINEL.to_string(),
            variable_file: STDIN_SENTINEL.to_string(),
            variables: Vec::new(),
            backend: Backend::default(),
            backend_args: Vec::new(),
            delimiters: Delimiters::default(),
            debug: false,
        }
    }
}

impl Config {
    /// Create a configuration for `template` with defaults for everything else
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            ..Self::default()
        }
    }

    /// Set the variable file token
    pub fn with_variable_file(mut self, token: impl Into<String>) -> Self {
        self.variable_file = token.into();
        self
    }

    /// Add an explicit variable
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.push((key.into(), value.into()));
        self
    }

    /// Set the backend format
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the positional backend arguments
    pub fn with_backend_args<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.backend_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the placeholder delimiters
    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    /// Enable or disable debug logging
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Explicit variables as a map; a repeated key keeps its last value
    pub fn explicit_variables(&self) -> VariableMap {
        self.variables
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}
