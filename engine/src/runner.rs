//! Execution driver.
//!
//! The [`Runner`] owns a command tree and drives one invocation end to end:
//! it feeds tokens through the state machine in input order, resolves
//! trailing state, runs the required-field pass, and invokes the selected
//! command's action (or the implicit help/version surface). Parse failures
//! are reported as a single-line message and mapped to a distinct non-zero
//! exit status; schema errors are programmer mistakes and abort the run.
//!
//! The parser itself has no cancellation awareness — a [`CancelToken`] is
//! handed to the action only, and observing it is the action's job.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use command_parse_core::{BoundValues, SchemaSet};

use crate::error::{ParseError, RunError};
use crate::help::render_help;
use crate::machine::{ParseSession, State};
use crate::tree::Command;

/// Exit status for token-parse failures.
pub const EXIT_PARSE_ERROR: i32 = 1;
/// Exit status for required-field validation failures.
pub const EXIT_VALIDATION_ERROR: i32 = 2;

/// Cooperative cancellation flag handed to command actions.
///
/// Wraps an `Arc<AtomicBool>` so an application can wire it to a signal
/// handler; [`CancelToken::flag`] exposes the shared flag for registration.
///
/// # Examples
///
/// ```
/// use command_parse_engine::CancelToken;
///
/// let token = CancelToken::new();
/// assert!(!token.is_cancelled());
/// token.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// The shared flag, for signal-handler registration.
    pub fn flag(&self) -> Arc<AtomicBool> {
        self.flag.clone()
    }
}

/// Result of a successful parse: what the tokens selected.
#[derive(Debug)]
pub enum Invocation<'a> {
    /// A command was selected; `values` is its populated bound instance.
    Command {
        command: &'a Command,
        path: Vec<String>,
        values: BoundValues,
    },
    /// The help surface was selected for a command.
    Help {
        command: &'a Command,
        path: Vec<String>,
        schema: Arc<SchemaSet>,
        root: bool,
    },
    /// The version surface was selected at the root.
    Version,
}

impl Invocation<'_> {
    /// The resolved command path (empty for the root).
    pub fn path(&self) -> &[String] {
        match self {
            Self::Command { path, .. } | Self::Help { path, .. } => path,
            Self::Version => &[],
        }
    }

    /// The populated values, when a command was selected.
    pub fn values(&self) -> Option<&BoundValues> {
        match self {
            Self::Command { values, .. } => Some(values),
            _ => None,
        }
    }
}

/// Required-field resolution pass.
///
/// Runs once, after parsing and before the action: the first required
/// option whose slot was never set fails, then the first required argument.
pub fn validate_required(values: &BoundValues) -> Result<(), ParseError> {
    let schema = values.schema();

    for (index, option) in schema.options().iter().enumerate() {
        if option.is_required() && !values.slot(schema.option_slot(index)).is_set() {
            return Err(ParseError::RequiredOptionMissing(
                option.canonical_name().to_string(),
            ));
        }
    }
    for (index, argument) in schema.arguments().iter().enumerate() {
        if argument.is_required() && !values.slot(schema.argument_slot(index)).is_set() {
            return Err(ParseError::RequiredArgumentMissing(
                argument.name().to_string(),
            ));
        }
    }
    Ok(())
}

/// Drives parsing and execution for one command tree.
///
/// # Examples
///
/// ```
/// use command_parse_core::{OptionSpec, ValueKind};
/// use command_parse_engine::{Command, Runner};
///
/// let root = Command::new()
///     .with_help("Demo tool")
///     .with_option(OptionSpec::scalar("count", ValueKind::I32));
///
/// let runner = Runner::new(root).with_bin_name("demo").with_version("1.0.0");
/// let invocation = runner.parse(["--count", "3"]).unwrap();
/// assert_eq!(invocation.values().unwrap().get_i64("count"), Some(3));
/// ```
pub struct Runner {
    root: Command,
    bin_name: String,
    version: String,
    version_action: Option<Box<dyn Fn() + Send + Sync>>,
}

impl Runner {
    /// Creates a driver for the given root command.
    ///
    /// The binary name defaults to the current executable's file stem and
    /// the version to `0.0.0`; override both with the builder methods.
    pub fn new(root: Command) -> Self {
        let bin_name = std::env::current_exe()
            .ok()
            .and_then(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "app".to_string());
        Self {
            root,
            bin_name,
            version: "0.0.0".to_string(),
            version_action: None,
        }
    }

    /// Sets the binary name shown in usage lines.
    pub fn with_bin_name(mut self, bin_name: &str) -> Self {
        self.bin_name = bin_name.to_string();
        self
    }

    /// Sets the version string printed by `--version`/`version`.
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Replaces the default version output with a custom action.
    pub fn with_version_action<F>(mut self, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.version_action = Some(Box::new(action));
        self
    }

    /// Feeds every token through the state machine and resolves trailing
    /// state, without validating required fields or running any action.
    pub fn parse<I, S>(&self, args: I) -> Result<Invocation<'_>, RunError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut session = ParseSession::new(&self.root)?;
        let mut state = State::Command;
        for token in args {
            state = session.step(state, token.as_ref())?;
        }
        let state = session.finish(state).map_err(RunError::Parse)?;

        let root = session.at_root();
        match state {
            State::Version => Ok(Invocation::Version),
            State::Help => {
                let frame = session.into_selected();
                Ok(Invocation::Help {
                    command: frame.command,
                    path: frame.path,
                    schema: frame.schema,
                    root,
                })
            }
            _ => {
                let frame = session.into_selected();
                debug!(path = ?frame.path, "selected command");
                Ok(Invocation::Command {
                    command: frame.command,
                    path: frame.path,
                    values: frame.values,
                })
            }
        }
    }

    /// Validates and executes a parsed invocation, returning the action's
    /// exit status. Help and version render here and succeed with 0.
    pub fn execute(
        &self,
        invocation: Invocation<'_>,
        cancel: &CancelToken,
    ) -> Result<i32, ParseError> {
        match invocation {
            Invocation::Help {
                command,
                path,
                schema,
                root,
            } => {
                print!(
                    "{}",
                    render_help(&self.bin_name, command, &path, &schema, root)
                );
                Ok(0)
            }
            Invocation::Version => {
                match &self.version_action {
                    Some(action) => action(),
                    None => println!("{}", self.version),
                }
                Ok(0)
            }
            Invocation::Command {
                command, values, ..
            } => {
                validate_required(&values)?;
                Ok(command.invoke(&values, cancel))
            }
        }
    }

    /// Parses and executes with a fresh, never-cancelled token.
    pub fn run<I, S>(&self, args: I) -> i32
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.run_with_cancel(args, &CancelToken::new())
    }

    /// Parses and executes, reporting failures as single-line messages.
    ///
    /// Parse errors map to [`EXIT_PARSE_ERROR`], required-field failures to
    /// [`EXIT_VALIDATION_ERROR`]. Schema errors are programmer mistakes and
    /// panic; panics from actions propagate to the caller unchanged.
    pub fn run_with_cancel<I, S>(&self, args: I, cancel: &CancelToken) -> i32
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.parse(args) {
            Err(RunError::Schema(err)) => panic!("invalid command schema: {err}"),
            Err(RunError::Parse(err)) => {
                eprintln!("{err}");
                EXIT_PARSE_ERROR
            }
            Ok(invocation) => match self.execute(invocation, cancel) {
                Ok(status) => status,
                Err(err) => {
                    eprintln!("{err}");
                    if err.is_validation() {
                        EXIT_VALIDATION_ERROR
                    } else {
                        EXIT_PARSE_ERROR
                    }
                }
            },
        }
    }
}
