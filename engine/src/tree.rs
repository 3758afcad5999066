//! Command tree.
//!
//! A [`Command`] node owns its option and argument declarations, an ordered
//! map of child commands, and the action invoked when the node is selected.
//! The tree is assembled once with builder methods and is immutable during
//! parsing; each run lazily builds the node's validated
//! [`SchemaSet`](command_parse_core::SchemaSet) and bound value storage on
//! first visit.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use command_parse_core::{ArgSpec, BoundValues, OptionSpec, SchemaError, SchemaSet};

use crate::runner::CancelToken;

/// Action invoked with the populated values when a command is selected.
pub type Action = Box<dyn Fn(&BoundValues, &CancelToken) -> i32 + Send + Sync>;

/// One node of the command tree.
///
/// # Examples
///
/// ```
/// use command_parse_core::{ArgSpec, OptionSpec, ValueKind};
/// use command_parse_engine::Command;
///
/// let root = Command::new()
///     .with_help("Greet people from the command line")
///     .with_command(
///         "hello",
///         Command::new()
///             .with_help("Say hello")
///             .with_argument(ArgSpec::scalar(0, "name", ValueKind::String))
///             .with_option(OptionSpec::flag("short").with_short('s'))
///             .with_action(|values, _cancel| {
///                 let name = values.get_str("name").unwrap_or("Anonymous");
///                 println!("Hello {name}!");
///                 0
///             }),
///     );
///
/// assert!(root.child("hello").is_some());
/// ```
#[derive(Default)]
pub struct Command {
    pub(crate) name: Option<String>,
    pub(crate) help: Vec<String>,
    pub(crate) options: Vec<OptionSpec>,
    pub(crate) arguments: Vec<ArgSpec>,
    pub(crate) children: BTreeMap<String, Command>,
    pub(crate) action: Option<Action>,
}

impl Command {
    /// Creates an empty command with a no-op action.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one help-text line.
    pub fn with_help(mut self, line: &str) -> Self {
        self.help.push(line.to_string());
        self
    }

    /// Declares an option on this command.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Declares a positional argument on this command.
    pub fn with_argument(mut self, argument: ArgSpec) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Attaches a child command under the given name.
    pub fn with_command(mut self, name: &str, mut command: Command) -> Self {
        command.name = Some(name.to_string());
        self.children.insert(name.to_string(), command);
        self
    }

    /// Sets the action invoked when this command is selected.
    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&BoundValues, &CancelToken) -> i32 + Send + Sync + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// The name this command was attached under, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Help-text lines.
    pub fn help(&self) -> &[String] {
        &self.help
    }

    /// Looks up a child command by name.
    pub fn child(&self, name: &str) -> Option<&Command> {
        self.children.get(name)
    }

    /// Whether this command declares any children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Child commands in name order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Command)> {
        self.children
            .iter()
            .map(|(name, command)| (name.as_str(), command))
    }

    /// Builds this node's validated descriptor set for one run.
    pub(crate) fn build_schema(&self, root: bool) -> Result<Arc<SchemaSet>, SchemaError> {
        SchemaSet::build(self.options.clone(), self.arguments.clone(), root).map(Arc::new)
    }

    /// Runs the action with the populated values; commands without an
    /// action succeed with status 0.
    pub(crate) fn invoke(&self, values: &BoundValues, cancel: &CancelToken) -> i32 {
        match &self.action {
            Some(action) => action(values, cancel),
            None => 0,
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("options", &self.options.len())
            .field("arguments", &self.arguments.len())
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .field("has_action", &self.action.is_some())
            .finish()
    }
}
