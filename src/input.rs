//! Input location: named files versus piped standard input
//!
//! A token of `-` means "read standard input", but only when standard input is
//! redirected. An interactive terminal is never read; the input is treated as empty
//! instead. Standard input can be consumed once per run.

use std::fmt;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

/// Token that selects standard input instead of a file
pub const STDIN_SENTINEL: &str = "-";

/// Which logical input is being requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRole {
    Template,
    VariableFile,
}

impl fmt::Display for InputRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputRole::Template => f.write_str("template"),
            InputRole::VariableFile => f.write_str("variable file"),
        }
    }
}

/// Errors that can occur while obtaining input bytes
#[derive(Debug, Error)]
pub enum InputError {
    /// File or stream could not be read
    #[error("failed to read {role} '{origin}': {source}")]
    Read {
        role: InputRole,
        origin: String,
        #[source]
        source: io::Error,
    },

    /// Input is not valid UTF-8 text
    #[error("{role} '{origin}' is not valid UTF-8")]
    NotUtf8 { role: InputRole, origin: String },

    /// Standard input was already consumed earlier in this run
    #[error("standard input is already used for the {first}; cannot also read the {second} from '-'")]
    StdinAlreadyClaimed { first: InputRole, second: InputRole },
}

/// Where the bytes for a token come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    Stdin,
    /// `-` against an interactive terminal
    Absent,
}

impl Location {
    /// Name used for this location in messages and reports
    pub fn display_name(&self) -> String {
        match self {
            Location::File(path) => path.display().to_string(),
            Location::Stdin | Location::Absent => "<stdin>".to_string(),
        }
    }
}

/// Standard input as seen by the locator
pub trait StdinSource {
    /// Whether the stream is an interactive terminal
    fn is_terminal(&self) -> bool;

    /// Read the stream to its end
    fn read_all(&mut self) -> io::Result<Vec<u8>>;
}

impl StdinSource for io::Stdin {
    fn is_terminal(&self) -> bool {
        IsTerminal::is_terminal(self)
    }

    fn read_all(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.lock().read_to_end(&mut buf)?;
        Ok(buf)
    }
}

/// In-memory standard input, either piped content or an interactive terminal
#[derive(Debug, Clone, Default)]
pub struct MemoryStdin {
    content: Vec<u8>,
    terminal: bool,
}

impl MemoryStdin {
    /// Redirected input carrying `content`
    pub fn piped(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            terminal: false,
        }
    }

    /// An interactive terminal; never read
    pub fn terminal() -> Self {
        Self {
            content: Vec::new(),
            terminal: true,
        }
    }
}

impl StdinSource for MemoryStdin {
    fn is_terminal(&self) -> bool {
        self.terminal
    }

    fn read_all(&mut self) -> io::Result<Vec<u8>> {
        Ok(std::mem::take(&mut self.content))
    }
}

/// Resolves input tokens to bytes and tracks who consumed standard input
#[derive(Debug)]
pub struct InputLocator<S> {
    stdin: S,
    claimed_by: Option<InputRole>,
}

impl<S: StdinSource> InputLocator<S> {
    pub fn new(stdin: S) -> Self {
        Self {
            stdin,
            claimed_by: None,
        }
    }

    /// Decide where `token` reads from without reading anything
    pub fn locate(&self, token: &str) -> Location {
        if token != STDIN_SENTINEL {
            Location::File(PathBuf::from(token))
        } else if self.stdin.is_terminal() {
            Location::Absent
        } else {
            Location::Stdin
        }
    }

    /// The role that consumed standard input, if any
    pub fn claimed_by(&self) -> Option<InputRole> {
        self.claimed_by
    }

    /// Read all bytes for `token` on behalf of `role`
    pub fn read(&mut self, token: &str, role: InputRole) -> Result<Vec<u8>, InputError> {
        let location = self.locate(token);
        match &location {
            Location::File(path) => {
                debug!(%role, path = %path.display(), "reading from file");
                std::fs::read(path).map_err(|source| InputError::Read {
                    role,
                    origin: location.display_name(),
                    source,
                })
            }
            Location::Stdin => {
                if let Some(first) = self.claimed_by {
                    return Err(InputError::StdinAlreadyClaimed { first, second: role });
                }
                self.claimed_by = Some(role);
                debug!(%role, "reading from pipe");
                self.stdin.read_all().map_err(|source| InputError::Read {
                    role,
                    origin: location.display_name(),
                    source,
                })
            }
            Location::Absent => {
                debug!(%role, "standard input is a terminal, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Read `token` and decode it as UTF-8 text
    pub fn read_to_string(&mut self, token: &str, role: InputRole) -> Result<String, InputError> {
        let bytes = self.read(token, role)?;
        String::from_utf8(bytes).map_err(|_| InputError::NotUtf8 {
            role,
            origin: self.locate(token).display_name(),
        })
    }
}
