//! Declarative command-line parsing and dispatch.
//!
//! This crate consumes the descriptor types from `command-parse-core` and
//! provides everything around them:
//!
//! - [`Command`] — one node of the command tree, with its options,
//!   arguments, children, and action.
//! - the token parser state machine — consumes tokens one at a time,
//!   resolving long options, short-option clusters, positional arguments,
//!   and subcommand names against the current node.
//! - [`Runner`] — the execution driver: parses, runs the required-field
//!   pass, renders the implicit help/version surface, invokes the selected
//!   action, and maps failures to exit statuses.
//! - [`CancelToken`] — cooperative cancellation handed to actions only.
//!
//! Every command implicitly exposes `--help`/`-h`/`-?` (and bare `help`
//! when it has subcommands); the root additionally exposes `--version` and
//! bare `version`. These names cannot be redeclared by user schemas.
//!
//! # Example
//!
//! ```
//! use command_parse_core::{ArgSpec, OptionSpec, ValueKind};
//! use command_parse_engine::{Command, Runner};
//!
//! let root = Command::new()
//!     .with_help("Greeting demo")
//!     .with_command(
//!         "hello",
//!         Command::new()
//!             .with_argument(ArgSpec::scalar(0, "name", ValueKind::String))
//!             .with_option(OptionSpec::flag("short").with_short('s'))
//!             .with_action(|values, _cancel| {
//!                 let name = values.get_str("name").unwrap_or("Anonymous");
//!                 if values.get_bool("short").unwrap_or(false) {
//!                     println!("Hi {name}!");
//!                 } else {
//!                     println!("Hello {name}!");
//!                 }
//!                 0
//!             }),
//!     );
//!
//! let runner = Runner::new(root).with_bin_name("greet").with_version("1.0.0");
//! let invocation = runner.parse(["hello", "World", "-s"]).unwrap();
//! assert_eq!(invocation.path(), ["hello"]);
//! assert_eq!(invocation.values().unwrap().get_str("name"), Some("World"));
//! ```

mod error;
mod help;
mod machine;
mod runner;
mod tree;

pub use error::{ParseError, RunError};
pub use runner::{
    CancelToken, EXIT_PARSE_ERROR, EXIT_VALIDATION_ERROR, Invocation, Runner, validate_required,
};
pub use tree::{Action, Command};
