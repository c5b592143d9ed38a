//! Command shell: argument parsing, help and version, error reporting, exit codes
//!
//! Usage:
//!   syringe [OPTIONS] <TEMPLATE> [BACKEND_ARGS]...
//!
//! Options:
//!   -b, --backend <FORMAT>        Backend type (toml, json, yaml) [env: SY_BACKEND]
//!   -t, --template <FILE>         Template file
//!   -V, --variable-file <FILE>    Variable file, `-` for standard input
//!   -v, --variable <KEY:VALUE>    Set key/values
//!       --delim-left <DELIM>      Template start delimiter [env: SY_DELIML]
//!       --delim-right <DELIM>     Template end delimiter [env: SY_DELIMR]
//!       --debug                   Enable debug logging [env: SY_DEBUG]
//!   -h, --help                    Show this help
//!       --version                 Show version information

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use clap::builder::BoolishValueParser;
use clap::{ArgAction, CommandFactory, Parser};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::backend::Backend;
use crate::config::{Config, ENV_BACKEND, ENV_DEBUG, ENV_DELIM_LEFT, ENV_DELIM_RIGHT};
use crate::error::{ErrorKind, SyringeError};
use crate::input::{InputLocator, StdinSource, STDIN_SENTINEL};
use crate::template::{Delimiters, DEFAULT_LEFT_DELIMITER, DEFAULT_RIGHT_DELIMITER};

#[derive(Debug, Parser)]
#[command(name = "syringe")]
#[command(about = "Inject key/values from files, pipes and flags into text templates")]
#[command(override_usage = "syringe [OPTIONS] <TEMPLATE> [BACKEND_ARGS]...")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Template file (`-` for standard input) followed by backend key=value arguments
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Backend type
    #[arg(short, long, env = ENV_BACKEND, default_value = "toml", value_name = "FORMAT")]
    pub backend: Backend,

    /// Template file; all positional arguments become backend arguments
    #[arg(short, long, value_name = "FILE")]
    pub template: Option<String>,

    /// Variable file
    #[arg(short = 'V', long, default_value = STDIN_SENTINEL, value_name = "FILE")]
    pub variable_file: String,

    /// Set key/values (format key:value)
    #[arg(short = 'v', long = "variable", value_name = "KEY:VALUE", value_parser = parse_key_value)]
    pub variables: Vec<(String, String)>,

    /// Enable debug logging
    #[arg(long, env = ENV_DEBUG, action = ArgAction::SetTrue, value_parser = BoolishValueParser::new())]
    pub debug: bool,

    /// Template start delimiter
    #[arg(long, env = ENV_DELIM_LEFT, default_value = DEFAULT_LEFT_DELIMITER, value_name = "DELIM")]
    pub delim_left: String,

    /// Template end delimiter
    #[arg(long, env = ENV_DELIM_RIGHT, default_value = DEFAULT_RIGHT_DELIMITER, value_name = "DELIM")]
    pub delim_right: String,

    /// Show this help
    #[arg(short, long)]
    pub help: bool,

    /// Show version information
    #[arg(long)]
    pub version: bool,
}

impl Cli {
    /// Turn parsed arguments into a run configuration
    pub fn into_config(self) -> Result<Config, SyringeError> {
        let (template, backend_args) = match self.template {
            Some(template) => (template, self.args),
            None => {
                let mut args = self.args.into_iter();
                let template = args.next().ok_or_else(|| {
                    SyringeError::argument(
                        "syringe requires a minimum of 1 argument. Please see 'syringe --help'.",
                    )
                })?;
                (template, args.collect())
            }
        };

        let delimiters = Delimiters::new(self.delim_left, self.delim_right)
            .map_err(|e| SyringeError::argument(e.to_string()))?;

        Ok(Config {
            template,
            variable_file: self.variable_file,
            variables: self.variables,
            backend: self.backend,
            backend_args,
            delimiters,
            debug: self.debug,
        })
    }
}

/// Parse a `key:value` flag, splitting on the first colon
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected key:value, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Message of a clap parse error, without clap's own `error:` prefix
fn clap_message(e: &clap::Error) -> String {
    let rendered = e.render().to_string();
    rendered
        .strip_prefix("error: ")
        .unwrap_or(&rendered)
        .trim_end()
        .to_string()
}

/// Error stream buffer shared between the log subscriber and error reports
#[derive(Debug, Clone, Default)]
struct Diagnostics(Arc<Mutex<Vec<u8>>>);

impl Diagnostics {
    fn take(&self) -> Vec<u8> {
        self.0
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default()
    }
}

impl Write for Diagnostics {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "diagnostics buffer poisoned"))?;
        inner.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Help text as printed by `--help`
pub fn help() -> String {
    Cli::command().render_help().to_string()
}

/// Version line as printed by `--version`
pub fn version() -> String {
    format!("syringe version {}", env!("CARGO_PKG_VERSION"))
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Help,
    Version,
    ArgumentError,
    Success,
    RuntimeError,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::Help | Outcome::Version | Outcome::ArgumentError | Outcome::RuntimeError => 1,
        }
    }
}

/// The command shell, owning the process streams for one run
pub struct App<S, W, E> {
    stdin: S,
    out: W,
    err: E,
    color: bool,
}

impl<S: StdinSource, W: Write, E: Write> App<S, W, E> {
    pub fn new(stdin: S, out: W, err: E) -> Self {
        Self {
            stdin,
            out,
            err,
            color: false,
        }
    }

    /// Colorize error reports and log lines
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Parse `args` (program name first) and run to completion
    pub fn run<I, T>(self, args: I) -> Outcome
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let App {
            stdin,
            mut out,
            mut err,
            color,
        } = self;

        let cli = match Cli::try_parse_from(args) {
            Ok(cli) => cli,
            Err(e) => {
                let e = SyringeError::argument(clap_message(&e));
                return Self::report(&mut err, color, e);
            }
        };

        let level = if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };
        let diagnostics = Diagnostics::default();
        let sink = diagnostics.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(color)
            .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
            .with_target(false)
            .finish();

        // Logs and error reports share one buffer so they reach `err` in order
        let outcome = tracing::subscriber::with_default(subscriber, || {
            App {
                stdin,
                out: &mut out,
                err: diagnostics.clone(),
                color,
            }
            .dispatch(cli)
        });

        let _ = err.write_all(&diagnostics.take());
        let _ = err.flush();
        outcome
    }

    fn dispatch(mut self, cli: Cli) -> Outcome {
        debug!(?cli, "parsed arguments");

        if cli.help {
            let _ = writeln!(self.out, "{}", help());
            return Outcome::Help;
        }
        if cli.version {
            let _ = writeln!(self.out, "{}", version());
            return Outcome::Version;
        }

        let config = match cli.into_config() {
            Ok(config) => config,
            Err(e) => return self.fail(e),
        };

        let mut locator = InputLocator::new(self.stdin);
        let merged = match crate::merge_with_config(&config, &mut locator) {
            Ok(merged) => merged,
            Err(e) => {
                return Self::report(&mut self.err, self.color, e);
            }
        };

        debug!(bytes = merged.len(), "writing merged text");
        if let Err(e) = self.out.write_all(merged.as_bytes()).and_then(|_| self.out.flush()) {
            error!("failed to write output: {}", e);
            let _ = writeln!(self.err, "Error: failed to write output: {}", e);
            return Outcome::RuntimeError;
        }
        Outcome::Success
    }

    fn fail(mut self, e: SyringeError) -> Outcome {
        Self::report(&mut self.err, self.color, e)
    }

    fn report(err: &mut E, color: bool, e: SyringeError) -> Outcome {
        debug!(kind = ?e.kind(), "run failed");
        let _ = writeln!(err, "{}", e.report(color));
        match e.kind() {
            ErrorKind::Argument => Outcome::ArgumentError,
            ErrorKind::Io | ErrorKind::BackendParse | ErrorKind::Template => Outcome::RuntimeError,
        }
    }
}
