//! Crate-wide error taxonomy
//!
//! Every stage returns its own error type; they all fold into [`SyringeError`],
//! which the command shell reports once before exiting.

use thiserror::Error;

use crate::backend::BackendError;
use crate::input::InputError;
use crate::template::TemplateError;

/// Broad category of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing flags and arguments
    Argument,
    /// File or stream read failure
    Io,
    /// Malformed variable document or backend argument
    BackendParse,
    /// Delimiter or undefined-variable failure while rendering
    Template,
}

#[derive(Debug, Error)]
pub enum SyringeError {
    #[error("{0}")]
    Argument(String),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("{origin}: {source}")]
    Template {
        /// Display name of the template input
        origin: String,
        /// Template text, kept for source-context reports
        text: String,
        source: TemplateError,
    },
}

impl SyringeError {
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }

    pub fn template(origin: impl Into<String>, text: impl Into<String>, source: TemplateError) -> Self {
        Self::Template {
            origin: origin.into(),
            text: text.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Argument(_) => ErrorKind::Argument,
            Self::Input(InputError::StdinAlreadyClaimed { .. }) => ErrorKind::Argument,
            Self::Input(_) => ErrorKind::Io,
            Self::Backend(BackendError::Unknown { .. }) => ErrorKind::Argument,
            Self::Backend(_) => ErrorKind::BackendParse,
            Self::Template {
                source: TemplateError::EmptyDelimiter { .. },
                ..
            } => ErrorKind::Argument,
            Self::Template { .. } => ErrorKind::Template,
        }
    }

    /// User-facing report; template errors include the offending source lines
    pub fn report(&self, color: bool) -> String {
        match self {
            Self::Template {
                origin,
                text,
                source,
            } if source.span().is_some() => source.format(text, origin, color),
            other => format!("Error: {}", other),
        }
    }
}
