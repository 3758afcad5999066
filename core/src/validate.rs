//! Descriptor-set construction and structural validation.
//!
//! A [`SchemaSet`] is the validated collection of option and argument
//! descriptors for one command. Construction checks every structural
//! invariant once, before any token is processed; violations are
//! [`SchemaError`]s — programmer mistakes, distinct from the parse errors an
//! end user can trigger.
//!
//! # Examples
//!
//! ```
//! use command_parse_core::{ArgSpec, OptionSpec, SchemaSet, ValueKind};
//!
//! let schema = SchemaSet::build(
//!     vec![OptionSpec::flag("verbose").with_short('v')],
//!     vec![ArgSpec::scalar(0, "input", ValueKind::FilePath).required()],
//!     true,
//! )
//! .unwrap();
//!
//! assert!(schema.option_by_name("verbose").is_some());
//! assert!(schema.option_by_short('v').is_some());
//!
//! // Reserved names are rejected at build time.
//! let err = SchemaSet::build(vec![OptionSpec::flag("help")], vec![], true);
//! assert!(err.is_err());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::schema::{ArgSpec, FieldKind, OptionSpec};

/// Structural schema errors raised at descriptor-set construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// An option declares an empty long name.
    #[error("option long names cannot be empty")]
    EmptyOptionName,

    /// Two options (or aliases) share a long name.
    #[error("the option '--{0}' is already defined")]
    DuplicateOption(String),

    /// Two options share a short name.
    #[error("the short option '-{0}' is already defined")]
    DuplicateShortOption(char),

    /// An option uses a long name from the reserved surface.
    #[error("the option name '{0}' is reserved")]
    ReservedOption(String),

    /// An option uses a short name from the reserved surface.
    #[error("the short option '{0}' is reserved")]
    ReservedShortOption(char),

    /// Two arguments declare the same position.
    #[error("duplicate argument position {0}")]
    DuplicateArgumentPosition(usize),

    /// An optional argument precedes a required one.
    #[error("argument <{0}> must be required because a later argument is required")]
    RequiredArgumentGap(String),

    /// More than one array argument, or an array argument that is not last.
    #[error("only the last argument may be an array")]
    ArrayArgumentNotLast,

    /// A converter's declared output kind differs from the field's kind.
    #[error("converter for {field} produces {actual} but the field expects {expected}")]
    ConverterMismatch {
        field: String,
        expected: String,
        actual: String,
    },
}

/// Identity of one value slot within a [`SchemaSet`].
///
/// Slots are assigned densely at construction: options first (in declaration
/// order), then arguments (in position order). The state machine addresses
/// slots by this identity only; no name lookup happens at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    /// Raw slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A descriptor referenced by slot identity.
#[derive(Debug, Clone, Copy)]
pub enum FieldRef<'a> {
    /// A named option.
    Option(&'a OptionSpec),
    /// A positional argument.
    Argument(&'a ArgSpec),
}

impl FieldRef<'_> {
    /// The field classification.
    pub fn kind(&self) -> &FieldKind {
        match self {
            Self::Option(spec) => spec.kind(),
            Self::Argument(spec) => spec.kind(),
        }
    }

    /// The attached converter, if any.
    pub fn converter(&self) -> Option<&crate::Converter> {
        match self {
            Self::Option(spec) => spec.converter(),
            Self::Argument(spec) => spec.converter(),
        }
    }

    /// Display form for messages: `--name` for options, `<name>` for
    /// arguments.
    pub fn display_name(&self) -> String {
        match self {
            Self::Option(spec) => format!("--{}", spec.canonical_name()),
            Self::Argument(spec) => format!("<{}>", spec.name()),
        }
    }
}

/// Validated descriptor set for one command.
///
/// Built once per command activation and shared (via `Arc`) with the bound
/// value storage. Arguments are held sorted by position.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSet {
    options: Vec<OptionSpec>,
    arguments: Vec<ArgSpec>,
}

/// Long names every command reserves for itself.
const RESERVED_NAMES: &[&str] = &["help"];
/// Long names additionally reserved at the root command.
const RESERVED_ROOT_NAMES: &[&str] = &["version"];
/// Short names reserved for the help surface.
const RESERVED_SHORTS: &[char] = &['h', '?'];

impl SchemaSet {
    /// Builds and validates a descriptor set.
    ///
    /// `root` selects the root-level reserved-name rules (`version` is only
    /// reserved at the root). Arguments are sorted by position; every
    /// structural invariant is checked here, once.
    pub fn build(
        options: Vec<OptionSpec>,
        mut arguments: Vec<ArgSpec>,
        root: bool,
    ) -> Result<Self, SchemaError> {
        validate_options(&options, root)?;

        arguments.sort_by_key(|arg| arg.position());
        validate_arguments(&arguments)?;

        for option in &options {
            validate_converter(option.converter(), option.kind(), || {
                format!("--{}", option.canonical_name())
            })?;
        }
        for argument in &arguments {
            validate_converter(argument.converter(), argument.kind(), || {
                format!("<{}>", argument.name())
            })?;
        }

        Ok(Self { options, arguments })
    }

    /// An empty descriptor set, for commands without options or arguments.
    pub fn empty() -> Self {
        Self {
            options: Vec::new(),
            arguments: Vec::new(),
        }
    }

    /// All option descriptors, in declaration order.
    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// All argument descriptors, sorted by position.
    pub fn arguments(&self) -> &[ArgSpec] {
        &self.arguments
    }

    /// Number of value slots (options plus arguments).
    pub fn slot_count(&self) -> usize {
        self.options.len() + self.arguments.len()
    }

    /// Number of positional arguments.
    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }

    /// Resolves a long name (canonical or alias) to its slot.
    pub fn option_by_name(&self, name: &str) -> Option<SlotId> {
        self.options
            .iter()
            .position(|option| option.matches(name))
            .map(SlotId)
    }

    /// Resolves a short name to its slot.
    pub fn option_by_short(&self, short: char) -> Option<SlotId> {
        self.options
            .iter()
            .position(|option| option.matches_short(short))
            .map(SlotId)
    }

    /// The slot of the option at the given index into the declaration-order
    /// option list.
    pub fn option_slot(&self, index: usize) -> SlotId {
        SlotId(index)
    }

    /// The slot of the argument at the given index into the position-sorted
    /// argument list.
    pub fn argument_slot(&self, index: usize) -> SlotId {
        SlotId(self.options.len() + index)
    }

    /// Resolves an argument display name to its slot.
    pub fn argument_by_name(&self, name: &str) -> Option<SlotId> {
        self.arguments
            .iter()
            .position(|argument| argument.name() == name)
            .map(|index| self.argument_slot(index))
    }

    /// The descriptor owning a slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot does not belong to this set.
    pub fn field(&self, slot: SlotId) -> FieldRef<'_> {
        if slot.0 < self.options.len() {
            FieldRef::Option(&self.options[slot.0])
        } else {
            FieldRef::Argument(&self.arguments[slot.0 - self.options.len()])
        }
    }

    /// Whether a slot belongs to an option (as opposed to an argument).
    pub fn is_option_slot(&self, slot: SlotId) -> bool {
        slot.0 < self.options.len()
    }
}

fn validate_options(options: &[OptionSpec], root: bool) -> Result<(), SchemaError> {
    let mut seen_names: HashSet<&str> = HashSet::new();
    let mut seen_shorts: HashSet<char> = HashSet::new();

    for option in options {
        for name in option.names() {
            if name.is_empty() {
                return Err(SchemaError::EmptyOptionName);
            }
            if RESERVED_NAMES.contains(&name.as_str())
                || (root && RESERVED_ROOT_NAMES.contains(&name.as_str()))
            {
                return Err(SchemaError::ReservedOption(name.clone()));
            }
            if !seen_names.insert(name) {
                return Err(SchemaError::DuplicateOption(name.clone()));
            }
        }

        if let Some(short) = option.short() {
            if RESERVED_SHORTS.contains(&short) {
                return Err(SchemaError::ReservedShortOption(short));
            }
            if !seen_shorts.insert(short) {
                return Err(SchemaError::DuplicateShortOption(short));
            }
        }
    }

    Ok(())
}

fn validate_arguments(arguments: &[ArgSpec]) -> Result<(), SchemaError> {
    let mut seen_positions: HashSet<usize> = HashSet::new();
    for argument in arguments {
        if !seen_positions.insert(argument.position()) {
            return Err(SchemaError::DuplicateArgumentPosition(argument.position()));
        }
    }

    // Scan from the highest position down: once a required argument is seen,
    // every earlier argument must be required; an array is only legal in the
    // last position.
    let mut required_seen = false;
    for (index, argument) in arguments.iter().enumerate().rev() {
        if required_seen && !argument.is_required() {
            return Err(SchemaError::RequiredArgumentGap(argument.name().to_string()));
        }
        required_seen |= argument.is_required();

        if argument.kind().is_array() && index != arguments.len() - 1 {
            return Err(SchemaError::ArrayArgumentNotLast);
        }
    }

    Ok(())
}

fn validate_converter(
    converter: Option<&crate::Converter>,
    kind: &FieldKind,
    field: impl Fn() -> String,
) -> Result<(), SchemaError> {
    let Some(converter) = converter else {
        return Ok(());
    };

    let expected = kind.value_kind();
    if *converter.output() != expected {
        return Err(SchemaError::ConverterMismatch {
            field: field(),
            expected: expected.to_string(),
            actual: converter.output().to_string(),
        });
    }

    Ok(())
}
