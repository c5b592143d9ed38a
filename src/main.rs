//! Syringe CLI
//!
//! Usage:
//!   syringe [OPTIONS] <TEMPLATE> [BACKEND_ARGS]...
//!   cat vars.toml | syringe page.tmpl
//!
//! See `syringe --help` for all options.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use syringe::cli::App;

fn main() -> ExitCode {
    let color = io::stderr().is_terminal();
    let outcome = App::new(io::stdin(), io::stdout().lock(), io::stderr())
        .with_color(color)
        .run(std::env::args_os());
    ExitCode::from(outcome.exit_code())
}
