//! Token parser state machine.
//!
//! Parsing is a walk over an ambiguous token grammar: each raw token either
//! starts a long option, a short-option cluster, a positional argument, or
//! names a subcommand, and the correct reading depends on the current state.
//! The state is one of:
//!
//! - a command node (the default; resolves names against the current
//!   command's descriptor set),
//! - an option or argument node awaiting (or accumulating) values,
//! - a synthetic help or version node.
//!
//! [`ParseSession::step`] is the transition function; tokens are consumed
//! strictly in input order, and every slot write happens through the slot
//! identity resolved at descriptor-set construction — no name lookups occur
//! once an option is resolved.

use std::sync::Arc;

use tracing::{debug, trace};

use command_parse_core::{
    BoundValues, FieldKind, FieldRef, SchemaError, SchemaSet, SlotId, Value, ValueKind, coerce,
};

use crate::error::{ParseError, RunError};
use crate::tree::Command;

/// One state of the token parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    /// Resolving tokens against the current command.
    Command,
    /// An option node awaiting or accumulating values.
    Option(SlotId),
    /// An argument node accumulating values (arrays stay here).
    Argument(SlotId),
    /// Synthetic node reached by `--help`/`-h`/`-?`/`help`.
    Help,
    /// Synthetic node reached by `--version`/`version` at the root.
    Version,
}

/// Per-command parse state: descriptor set, value storage, and the
/// monotonically advancing argument cursor.
pub(crate) struct Frame<'a> {
    pub command: &'a Command,
    pub path: Vec<String>,
    pub schema: Arc<SchemaSet>,
    pub values: BoundValues,
    pub next_argument: usize,
}

impl<'a> Frame<'a> {
    fn new(command: &'a Command, path: Vec<String>, root: bool) -> Result<Self, SchemaError> {
        let schema = command.build_schema(root)?;
        let values = BoundValues::new(schema.clone());
        Ok(Self {
            command,
            path,
            schema,
            values,
            next_argument: 0,
        })
    }
}

/// State for one parse run over a command tree.
///
/// Holds one [`Frame`] per visited command; the top frame is the current
/// node. Descriptor sets and value storage are created on first visit and
/// discarded with the session.
pub(crate) struct ParseSession<'a> {
    frames: Vec<Frame<'a>>,
}

impl<'a> ParseSession<'a> {
    pub fn new(root: &'a Command) -> Result<Self, SchemaError> {
        Ok(Self {
            frames: vec![Frame::new(root, Vec::new(), true)?],
        })
    }

    pub fn at_root(&self) -> bool {
        self.frames.len() == 1
    }

    fn top(&self) -> &Frame<'a> {
        self.frames.last().expect("session always has a root frame")
    }

    fn top_mut(&mut self) -> &mut Frame<'a> {
        self.frames.last_mut().expect("session always has a root frame")
    }

    /// Consumes the session, yielding the selected command's frame.
    pub fn into_selected(mut self) -> Frame<'a> {
        self.frames.pop().expect("session always has a root frame")
    }

    /// Transition function: consumes one token in the given state and
    /// returns the next state.
    pub fn step(&mut self, state: State, token: &str) -> Result<State, RunError> {
        trace!(?state, token, "consume token");
        match state {
            State::Command => self.command_token(token),
            State::Option(slot) | State::Argument(slot) => self.feed(slot, token),
            State::Help | State::Version => Err(self.after_terminal(token).into()),
        }
    }

    /// Resolves trailing state once input is exhausted.
    ///
    /// A pending flag defaults to `true`; array and enum-flags nodes resolve
    /// with whatever accumulated; a pending scalar has no value to resolve
    /// with and fails.
    pub fn finish(&mut self, state: State) -> Result<State, ParseError> {
        let (State::Option(slot) | State::Argument(slot)) = state else {
            return Ok(state);
        };

        let schema = self.top().schema.clone();
        match schema.field(slot).kind() {
            FieldKind::Flag => {
                self.top_mut().values.slot_mut(slot).set_flag(true);
                Ok(State::Command)
            }
            FieldKind::Array(_) | FieldKind::EnumFlags(_) => Ok(State::Command),
            FieldKind::Scalar(_) => {
                let name = match schema.field(slot) {
                    FieldRef::Option(spec) => spec.canonical_name().to_string(),
                    FieldRef::Argument(spec) => spec.name().to_string(),
                };
                Err(ParseError::MissingValue(name))
            }
        }
    }

    /// The help and version nodes accept no further input; anything after
    /// them resolves against an empty descriptor set.
    fn after_terminal(&self, token: &str) -> ParseError {
        if let Some(stripped) = token.strip_prefix('-') {
            let rest = stripped.trim_start_matches('-');
            let (name, _) = split_inline_value(rest);
            ParseError::UnknownOption(name.to_string())
        } else {
            ParseError::ExtraArgument(token.to_string())
        }
    }

    fn command_token(&mut self, token: &str) -> Result<State, RunError> {
        if token.starts_with("--") {
            self.long_option(token)
        } else if token.starts_with('-') {
            self.short_cluster(token)
        } else {
            self.bare_token(token)
        }
    }

    fn long_option(&mut self, token: &str) -> Result<State, RunError> {
        if token == "--help" {
            return Ok(State::Help);
        }
        if token == "--version" && self.at_root() {
            return Ok(State::Version);
        }

        let stripped = token.trim_start_matches('-');
        let (name, inline) = split_inline_value(stripped);
        let Some(slot) = self.top().schema.option_by_name(name) else {
            return Err(ParseError::UnknownOption(name.to_string()).into());
        };
        debug!(option = name, "resolved long option");

        match inline {
            Some(value) => self.feed(slot, value),
            None => Ok(State::Option(slot)),
        }
    }

    /// Short-option handling: `-h`/`-?` are help; otherwise each character
    /// of the cluster resolves as a short name. Flags apply `true`
    /// immediately; the last non-flag character stays pending to consume a
    /// following or inline value.
    fn short_cluster(&mut self, token: &str) -> Result<State, RunError> {
        if token == "-h" || token == "-?" {
            return Ok(State::Help);
        }

        let stripped = token.trim_start_matches('-');
        let (cluster, inline) = split_inline_value(stripped);
        let schema = self.top().schema.clone();

        let mut pending: Option<SlotId> = None;
        for ch in cluster.chars() {
            let Some(slot) = schema.option_by_short(ch) else {
                return Err(ParseError::UnknownOption(ch.to_string()).into());
            };
            if schema.field(slot).kind().is_flag() {
                self.top_mut().values.slot_mut(slot).set_flag(true);
            } else {
                pending = Some(slot);
            }
        }

        match (inline, pending) {
            (Some(value), Some(slot)) => self.feed(slot, value),
            (Some(value), None) => Err(ParseError::UnexpectedClusterValue {
                cluster: cluster.to_string(),
                value: value.to_string(),
            }
            .into()),
            (None, Some(slot)) => Ok(State::Option(slot)),
            (None, None) => Ok(State::Command),
        }
    }

    fn bare_token(&mut self, token: &str) -> Result<State, RunError> {
        let command = self.top().command;
        if command.has_children() {
            if token == "help" {
                return Ok(State::Help);
            }
            if token == "version" && self.at_root() {
                return Ok(State::Version);
            }
            if let Some(child) = command.child(token) {
                let mut path = self.top().path.clone();
                path.push(token.to_string());
                debug!(command = token, "descend into subcommand");
                self.frames.push(Frame::new(child, path, false)?);
                return Ok(State::Command);
            }
        }

        let index = self.top().next_argument;
        if index >= self.top().schema.argument_count() {
            return Err(ParseError::ExtraArgument(token.to_string()).into());
        }

        let slot = self.top().schema.argument_slot(index);
        // Scalar arguments consume one cursor position; the trailing array
        // argument never advances past itself.
        if !self.top().schema.arguments()[index].kind().is_array() {
            self.top_mut().next_argument += 1;
        }
        self.feed(slot, token)
    }

    /// Feeds one value token to an option or argument node. The
    /// classification governs consumption; see the module docs for the
    /// release rules that hand tokens back to the owning command.
    fn feed(&mut self, slot: SlotId, token: &str) -> Result<State, RunError> {
        let schema = self.top().schema.clone();
        let field = schema.field(slot);

        match field.kind() {
            FieldKind::Flag => match coerce(token, &ValueKind::Bool, None) {
                Ok(Value::Bool(value)) => {
                    self.top_mut().values.slot_mut(slot).set_flag(value);
                    Ok(State::Command)
                }
                _ => {
                    // Not a boolean literal: the flag defaults to true and
                    // the token is re-offered to the owning command.
                    self.top_mut().values.slot_mut(slot).set_flag(true);
                    self.step(State::Command, token)
                }
            },
            FieldKind::Scalar(kind) => match coerce(token, kind, field.converter()) {
                Ok(value) => {
                    self.top_mut().values.slot_mut(slot).set_scalar(value);
                    Ok(State::Command)
                }
                Err(source) => Err(wrap_convert(&field, token, source).into()),
            },
            FieldKind::Array(element) => {
                // A string array cannot tell option-looking tokens apart
                // from values, so it releases them back to option parsing.
                if *element == ValueKind::String && token.starts_with('-') {
                    return self.step(State::Command, token);
                }
                match coerce(token, element, field.converter()) {
                    Ok(value) => {
                        self.top_mut().values.slot_mut(slot).push(value);
                        Ok(self.node_state(slot))
                    }
                    Err(source) => {
                        if schema.is_option_slot(slot) {
                            // An array option treats a non-coercible token
                            // as the start of something else.
                            self.step(State::Command, token)
                        } else {
                            Err(wrap_convert(&field, token, source).into())
                        }
                    }
                }
            }
            FieldKind::EnumFlags(spec) => {
                if token.starts_with('-') {
                    return self.step(State::Command, token);
                }
                let kind = ValueKind::Enum(*spec);
                for piece in token.split('+') {
                    let value = coerce(piece, &kind, None)
                        .map_err(|source| wrap_convert(&field, token, source))?;
                    if let Value::Enum(member) = value {
                        self.top_mut().values.slot_mut(slot).or_bits(member.bits);
                    }
                }
                Ok(self.node_state(slot))
            }
        }
    }

    fn node_state(&self, slot: SlotId) -> State {
        if self.top().schema.is_option_slot(slot) {
            State::Option(slot)
        } else {
            State::Argument(slot)
        }
    }
}

/// Splits `name=value` / `name:value` tokens. `=` wins over `:`; everything
/// after the first separator, later separators included, is the value.
fn split_inline_value(token: &str) -> (&str, Option<&str>) {
    if let Some((name, value)) = token.split_once('=') {
        (name, Some(value))
    } else if let Some((name, value)) = token.split_once(':') {
        (name, Some(value))
    } else {
        (token, None)
    }
}

fn wrap_convert(
    field: &FieldRef<'_>,
    token: &str,
    source: command_parse_core::ConvertError,
) -> ParseError {
    match field {
        FieldRef::Option(spec) => ParseError::InvalidOptionValue {
            option: spec.canonical_name().to_string(),
            value: token.to_string(),
            source,
        },
        FieldRef::Argument(spec) => ParseError::InvalidArgumentValue {
            argument: spec.name().to_string(),
            value: token.to_string(),
            source,
        },
    }
}
