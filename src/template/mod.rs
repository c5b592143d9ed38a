//! Template rendering with configurable delimiters
//!
//! A template is plain text with placeholders such as `{{ name }}` or
//! `{{ server.ports.0 }}`. Parsing happens up front so that malformed syntax is
//! reported before any substitution, and rendering builds the whole output in
//! memory so nothing is emitted on failure.
//!
//! # Example
//!
//! ```rust
//! use syringe::template::{render, Delimiters};
//! use syringe::VariableMap;
//!
//! let vars: VariableMap = [("name", "world")].into_iter().collect();
//! let out = render("Hello, {{name}}!", &Delimiters::default(), &vars).unwrap();
//! assert_eq!(out, "Hello, world!");
//! ```

mod error;
pub mod lexer;
mod scanner;

pub use error::TemplateError;
pub use scanner::{Placeholder, Segment, ESCAPE};

use tracing::debug;

use crate::value::VariableMap;

pub const DEFAULT_LEFT_DELIMITER: &str = "{{";
pub const DEFAULT_RIGHT_DELIMITER: &str = "}}";

/// Left/right delimiter pair bounding placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    left: String,
    right: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            left: DEFAULT_LEFT_DELIMITER.to_string(),
            right: DEFAULT_RIGHT_DELIMITER.to_string(),
        }
    }
}

impl Delimiters {
    /// Create a delimiter pair; neither side may be empty
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Result<Self, TemplateError> {
        let (left, right) = (left.into(), right.into());
        if left.is_empty() {
            return Err(TemplateError::EmptyDelimiter { side: "left" });
        }
        if right.is_empty() {
            return Err(TemplateError::EmptyDelimiter { side: "right" });
        }
        Ok(Self { left, right })
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn right(&self) -> &str {
        &self.right
    }
}

/// A parsed template, ready to render against any variable map
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `source` using `delims`
    pub fn parse(source: impl Into<String>, delims: &Delimiters) -> Result<Self, TemplateError> {
        let source = source.into();
        let segments = scanner::scan(&source, delims)?;
        debug!(
            segments = segments.len(),
            placeholders = segments
                .iter()
                .filter(|s| matches!(s, Segment::Placeholder(_)))
                .count(),
            "parsed template"
        );
        Ok(Self { source, segments })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholders in source order
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(p) => Some(p),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute every placeholder from `vars`.
    ///
    /// Fails on the first placeholder whose variable or path cannot be resolved.
    pub fn render(&self, vars: &VariableMap) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(range) => out.push_str(&self.source[range.clone()]),
                Segment::Placeholder(p) => {
                    let value = match vars.lookup(&p.name, &p.path) {
                        None => {
                            return Err(TemplateError::UndefinedVariable {
                                name: p.name.clone(),
                                span: p.span.clone(),
                            })
                        }
                        Some(Err((_, reason))) => {
                            return Err(TemplateError::InvalidPath {
                                path: p.dotted(),
                                reason: reason.to_string(),
                                span: p.span.clone(),
                            })
                        }
                        Some(Ok(value)) => value,
                    };
                    out.push_str(&value.to_string());
                }
            }
        }
        Ok(out)
    }
}

/// Parse and render `source` in one step
pub fn render(source: &str, delims: &Delimiters, vars: &VariableMap) -> Result<String, TemplateError> {
    Template::parse(source, delims)?.render(vars)
}

/// Render with delimiters given as plain strings
pub fn merge(source: &str, left: &str, right: &str, vars: &VariableMap) -> Result<String, TemplateError> {
    render(source, &Delimiters::new(left, right)?, vars)
}
