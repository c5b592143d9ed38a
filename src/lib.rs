//! Syringe - inject key/values into text templates
//!
//! Variables are resolved from a variable file (or a piped document), positional
//! backend arguments, and explicit flags, then substituted into a template with
//! configurable delimiters.
//!
//! # Example
//!
//! ```rust
//! use syringe::{merge_with_config, Config, InputLocator, MemoryStdin};
//!
//! let dir = std::env::temp_dir().join("syringe-doc-example");
//! std::fs::create_dir_all(&dir).unwrap();
//! let template = dir.join("greeting.txt");
//! std::fs::write(&template, "Hello, {{name}}!").unwrap();
//!
//! let config = Config::new(template.to_string_lossy()).with_backend_args(["name=Ann"]);
//! let mut locator = InputLocator::new(MemoryStdin::piped("name = \"world\""));
//!
//! let merged = merge_with_config(&config, &mut locator).unwrap();
//! assert_eq!(merged, "Hello, Ann!");
//! ```

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod resolver;
pub mod template;
pub mod value;

pub use backend::{Backend, BackendError};
pub use config::Config;
pub use error::{ErrorKind, SyringeError};
pub use input::{InputLocator, InputRole, MemoryStdin, StdinSource};
pub use resolver::{resolve, SourceKind, PRECEDENCE};
pub use template::{Delimiters, Template, TemplateError};
pub use value::{Value, VariableMap};

use tracing::debug;

/// Render `source` against `vars` with the default `{{`/`}}` delimiters
///
/// # Example
///
/// ```rust
/// use syringe::{merge, VariableMap};
///
/// let vars: VariableMap = [("name", "world")].into_iter().collect();
/// assert_eq!(merge("Hello, {{name}}!", &vars).unwrap(), "Hello, world!");
/// ```
pub fn merge(source: &str, vars: &VariableMap) -> Result<String, TemplateError> {
    template::render(source, &Delimiters::default(), vars)
}

/// Run the whole pipeline: resolve variables, load the template, render
pub fn merge_with_config<S: StdinSource>(
    config: &Config,
    locator: &mut InputLocator<S>,
) -> Result<String, SyringeError> {
    // Resolved in full before the template is touched
    let vars = resolve(config, locator)?;

    let text = locator.read_to_string(&config.template, InputRole::Template)?;
    let origin = locator.locate(&config.template).display_name();

    debug!(template = %origin, "merging variables into template");
    match template::render(&text, &config.delimiters, &vars) {
        Ok(merged) => Ok(merged),
        Err(e) => Err(SyringeError::template(origin, text, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_merge_default_delimiters() {
        let vars: VariableMap = [("name", "world")].into_iter().collect();
        assert_eq!(merge("Hello, {{name}}!", &vars).unwrap(), "Hello, world!");
    }

    #[test]
    fn test_template_from_pipe() {
        let config = Config::new("-").with_variable("name", "Bob");
        let mut locator = InputLocator::new(MemoryStdin::piped("Hi {{ name }}"));
        assert_eq!(merge_with_config(&config, &mut locator).unwrap(), "Hi Bob");
    }

    #[test]
    fn test_template_on_terminal_is_empty() {
        let config = Config::new("-");
        let mut locator = InputLocator::new(MemoryStdin::terminal());
        assert_eq!(merge_with_config(&config, &mut locator).unwrap(), "");
    }

    #[test]
    fn test_second_stdin_read_is_argument_error() {
        let mut locator = InputLocator::new(MemoryStdin::piped("a = 1"));
        locator.read("-", InputRole::VariableFile).unwrap();
        let err = SyringeError::from(locator.read("-", InputRole::Template).unwrap_err());
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_template_error_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let tpl = dir.path().join("t.txt");
        fs::write(&tpl, "Hi {{ who }}").unwrap();

        let config = Config::new(tpl.to_string_lossy());
        let mut locator = InputLocator::new(MemoryStdin::terminal());
        let err = merge_with_config(&config, &mut locator).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Template);
        assert!(err.report(false).contains("Hi {{ who }}"));
    }
}
