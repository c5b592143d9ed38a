//! Variable resolution across sources
//!
//! Variables come from three sources which are overlaid in a fixed order, each
//! later source replacing keys set by an earlier one:
//!
//! 1. the variable file, or the document piped on standard input
//! 2. positional backend arguments
//! 3. explicit `--variable key:value` flags
//!
//! Any failure aborts resolution; no partial map is ever returned.

use std::fmt;

use tracing::debug;

use crate::config::Config;
use crate::error::SyringeError;
use crate::input::{InputLocator, InputRole, StdinSource, STDIN_SENTINEL};
use crate::value::VariableMap;

/// A source of variables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    FileOrPipe,
    BackendArgs,
    ExplicitFlags,
}

/// Overlay order, lowest precedence first
pub const PRECEDENCE: [SourceKind; 3] = [
    SourceKind::FileOrPipe,
    SourceKind::BackendArgs,
    SourceKind::ExplicitFlags,
];

impl SourceKind {
    /// Position in [`PRECEDENCE`]; higher wins
    pub fn rank(self) -> usize {
        match self {
            SourceKind::FileOrPipe => 0,
            SourceKind::BackendArgs => 1,
            SourceKind::ExplicitFlags => 2,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::FileOrPipe => f.write_str("variable file"),
            SourceKind::BackendArgs => f.write_str("backend arguments"),
            SourceKind::ExplicitFlags => f.write_str("variable flags"),
        }
    }
}

/// Overlay per-source maps by precedence, whatever order they are given in.
///
/// Layers of the same kind keep their relative order.
pub fn overlay_sources(layers: impl IntoIterator<Item = (SourceKind, VariableMap)>) -> VariableMap {
    let mut layers: Vec<_> = layers.into_iter().collect();
    layers.sort_by_key(|(kind, _)| kind.rank());

    let mut vars = VariableMap::new();
    for (kind, layer) in layers {
        debug!(source = %kind, count = layer.len(), "overlaying variables");
        vars.overlay(layer);
        debug!(variables = ?vars, "current variables");
    }
    vars
}

/// Resolve the complete variable map for `config`
pub fn resolve<S: StdinSource>(
    config: &Config,
    locator: &mut InputLocator<S>,
) -> Result<VariableMap, SyringeError> {
    let mut layers = Vec::with_capacity(PRECEDENCE.len());
    for kind in PRECEDENCE {
        layers.push((kind, load(kind, config, locator)?));
    }
    Ok(overlay_sources(layers))
}

/// Load the variables contributed by a single source
pub fn load<S: StdinSource>(
    kind: SourceKind,
    config: &Config,
    locator: &mut InputLocator<S>,
) -> Result<VariableMap, SyringeError> {
    match kind {
        SourceKind::FileOrPipe => load_variable_file(config, locator),
        SourceKind::BackendArgs => {
            debug!(backend = %config.backend, args = ?config.backend_args, "parsing backend arguments");
            Ok(config.backend.parse_args(&config.backend_args)?)
        }
        SourceKind::ExplicitFlags => Ok(config.explicit_variables()),
    }
}

fn load_variable_file<S: StdinSource>(
    config: &Config,
    locator: &mut InputLocator<S>,
) -> Result<VariableMap, SyringeError> {
    // The template has first claim on standard input
    if config.variable_file == STDIN_SENTINEL && config.template == STDIN_SENTINEL {
        debug!("template is read from standard input, no piped variables");
        return Ok(VariableMap::new());
    }

    let text = locator.read_to_string(&config.variable_file, InputRole::VariableFile)?;
    Ok(config.backend.parse_document(&text)?)
}
