//! Error types for template parsing and rendering

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use super::lexer::Span;

/// Errors that can occur while parsing or rendering a template
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    /// A delimiter was configured as the empty string
    #[error("{side} delimiter must not be empty")]
    EmptyDelimiter { side: &'static str },

    /// Left delimiter without a matching right delimiter
    #[error("unclosed placeholder, expected '{right}'")]
    Unclosed { right: String, span: Span },

    /// Nothing between the delimiters
    #[error("empty placeholder")]
    EmptyPlaceholder { span: Span },

    /// Placeholder content is not a variable path
    #[error("invalid placeholder '{text}': {reason}")]
    InvalidExpression {
        text: String,
        reason: String,
        span: Span,
    },

    /// Placeholder names a variable that was never defined
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String, span: Span },

    /// Variable exists but the rest of the path does not
    #[error("cannot resolve '{path}': {reason}")]
    InvalidPath {
        path: String,
        reason: String,
        span: Span,
    },
}

impl TemplateError {
    /// Get the source span if available
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::EmptyDelimiter { .. } => None,
            Self::Unclosed { span, .. }
            | Self::EmptyPlaceholder { span }
            | Self::InvalidExpression { span, .. }
            | Self::UndefinedVariable { span, .. }
            | Self::InvalidPath { span, .. } => Some(span),
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str, color: bool) -> String {
        let Some(span) = self.span() else {
            return self.to_string();
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_config(Config::default().with_color(color))
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span.clone()))
                    .with_message(self.label())
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Unclosed { right, .. } => format!("this placeholder is never closed with '{}'", right),
            Self::EmptyPlaceholder { .. } => "expected a variable name".to_string(),
            Self::InvalidExpression { reason, .. } => reason.clone(),
            Self::UndefinedVariable { name, .. } => format!("'{}' is not defined", name),
            Self::InvalidPath { reason, .. } => reason.clone(),
            Self::EmptyDelimiter { .. } => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_accessor() {
        let err = TemplateError::UndefinedVariable {
            name: "x".to_string(),
            span: 3..8,
        };
        assert_eq!(err.span(), Some(&(3..8)));
        assert_eq!(TemplateError::EmptyDelimiter { side: "left" }.span(), None);
    }

    #[test]
    fn test_format_includes_context() {
        let source = "Hello, {{ who }}!";
        let err = TemplateError::UndefinedVariable {
            name: "who".to_string(),
            span: 7..16,
        };
        let report = err.format(source, "greeting.txt", false);
        assert!(report.contains("undefined variable 'who'"));
        assert!(report.contains("greeting.txt"));
        assert!(report.contains("Hello, {{ who }}!"));
    }

    #[test]
    fn test_format_without_span_is_plain() {
        let err = TemplateError::EmptyDelimiter { side: "right" };
        assert_eq!(err.format("", "t", false), "right delimiter must not be empty");
    }
}
