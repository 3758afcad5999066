//! Option and argument descriptors.
//!
//! Descriptors are the static half of a command schema: they declare names,
//! requiredness, and classification for each field, and are validated once
//! into a [`SchemaSet`](crate::SchemaSet) before any token is parsed.

use serde::Serialize;

use crate::convert::Converter;
use crate::value::{EnumSpec, ValueKind};

/// Classification of a field's storage and token-consumption behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    /// Boolean switch; consumes an optional `true`/`false` token.
    Flag,
    /// Single value of the given kind; consumes exactly one token.
    Scalar(ValueKind),
    /// Accumulating list with the given element kind; consumes tokens until
    /// released.
    Array(ValueKind),
    /// Enumeration members combined by bitwise OR, joined with `+` or
    /// repeated tokens.
    EnumFlags(EnumSpec),
}

impl FieldKind {
    /// Returns `true` for [`FieldKind::Flag`].
    pub fn is_flag(&self) -> bool {
        matches!(self, Self::Flag)
    }

    /// Returns `true` for [`FieldKind::Array`].
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns `true` for [`FieldKind::EnumFlags`].
    pub fn is_enum_flags(&self) -> bool {
        matches!(self, Self::EnumFlags(_))
    }

    /// The value kind a single token coerces into for this field.
    pub fn value_kind(&self) -> ValueKind {
        match self {
            Self::Flag => ValueKind::Bool,
            Self::Scalar(kind) | Self::Array(kind) => *kind,
            Self::EnumFlags(spec) => ValueKind::Enum(*spec),
        }
    }
}

/// Descriptor for one named option.
///
/// An option has one or more long names (the first is canonical, the rest
/// are aliases feeding the same slot), an optional single-character short
/// name, a classification, and optional help metadata.
///
/// # Examples
///
/// ```
/// use command_parse_core::{OptionSpec, ValueKind};
///
/// let verbose = OptionSpec::flag("verbose")
///     .with_short('v')
///     .with_help("Enable verbose output");
/// assert_eq!(verbose.canonical_name(), "verbose");
/// assert!(verbose.matches("verbose"));
/// assert!(verbose.matches_short('v'));
///
/// let port = OptionSpec::scalar("port", ValueKind::U16).required();
/// assert!(port.is_required());
/// ```
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OptionSpec {
    pub(crate) names: Vec<String>,
    pub(crate) short: Option<char>,
    pub(crate) kind: FieldKind,
    pub(crate) required: bool,
    pub(crate) help: Vec<String>,
    pub(crate) default_text: Option<String>,
    #[serde(skip)]
    pub(crate) converter: Option<Converter>,
}

impl OptionSpec {
    fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            names: vec![name.to_string()],
            short: None,
            kind,
            required: false,
            help: Vec::new(),
            default_text: None,
            converter: None,
        }
    }

    /// Creates a boolean flag option.
    pub fn flag(name: &str) -> Self {
        Self::new(name, FieldKind::Flag)
    }

    /// Creates a scalar option of the given value kind.
    pub fn scalar(name: &str, kind: ValueKind) -> Self {
        Self::new(name, FieldKind::Scalar(kind))
    }

    /// Creates an accumulating array option with the given element kind.
    pub fn array(name: &str, element: ValueKind) -> Self {
        Self::new(name, FieldKind::Array(element))
    }

    /// Creates an enum-flags option for the given enumeration.
    pub fn enum_flags(name: &str, spec: EnumSpec) -> Self {
        Self::new(name, FieldKind::EnumFlags(spec))
    }

    /// Adds an alias long name feeding the same slot.
    pub fn with_alias(mut self, name: &str) -> Self {
        self.names.push(name.to_string());
        self
    }

    /// Sets the single-character short name.
    pub fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Appends one help line.
    pub fn with_help(mut self, line: &str) -> Self {
        self.help.push(line.to_string());
        self
    }

    /// Sets the default-value text shown in help output.
    pub fn with_default_text(mut self, text: &str) -> Self {
        self.default_text = Some(text.to_string());
        self
    }

    /// Attaches a user-supplied converter for this field.
    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The canonical (first declared) long name.
    pub fn canonical_name(&self) -> &str {
        &self.names[0]
    }

    /// All declared long names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The short name, if declared.
    pub fn short(&self) -> Option<char> {
        self.short
    }

    /// The field classification.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether the option must be provided.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Help lines.
    pub fn help(&self) -> &[String] {
        &self.help
    }

    /// Default-value text for help output.
    pub fn default_text(&self) -> Option<&str> {
        self.default_text.as_deref()
    }

    /// The attached converter, if any.
    pub fn converter(&self) -> Option<&Converter> {
        self.converter.as_ref()
    }

    /// Checks whether `name` is one of this option's long names.
    pub fn matches(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Checks whether `short` is this option's short name.
    pub fn matches_short(&self, short: char) -> bool {
        self.short == Some(short)
    }
}

/// Descriptor for one positional argument.
///
/// Arguments are ordered by their zero-based position. Only scalar and
/// array classifications exist for arguments, and the constructors enforce
/// that.
///
/// # Examples
///
/// ```
/// use command_parse_core::{ArgSpec, ValueKind};
///
/// let source = ArgSpec::scalar(0, "source", ValueKind::FilePath).required();
/// assert_eq!(source.position(), 0);
/// assert!(source.is_required());
///
/// let rest = ArgSpec::array(1, "rest", ValueKind::String);
/// assert!(rest.kind().is_array());
/// ```
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArgSpec {
    pub(crate) position: usize,
    pub(crate) name: String,
    pub(crate) kind: FieldKind,
    pub(crate) required: bool,
    pub(crate) help: Vec<String>,
    pub(crate) default_text: Option<String>,
    #[serde(skip)]
    pub(crate) converter: Option<Converter>,
}

impl ArgSpec {
    fn new(position: usize, name: &str, kind: FieldKind) -> Self {
        Self {
            position,
            name: name.to_string(),
            kind,
            required: false,
            help: Vec::new(),
            default_text: None,
            converter: None,
        }
    }

    /// Creates a scalar argument at the given position.
    pub fn scalar(position: usize, name: &str, kind: ValueKind) -> Self {
        Self::new(position, name, FieldKind::Scalar(kind))
    }

    /// Creates an accumulating array argument at the given position.
    pub fn array(position: usize, name: &str, element: ValueKind) -> Self {
        Self::new(position, name, FieldKind::Array(element))
    }

    /// Appends one help line.
    pub fn with_help(mut self, line: &str) -> Self {
        self.help.push(line.to_string());
        self
    }

    /// Sets the default-value text shown in help output.
    pub fn with_default_text(mut self, text: &str) -> Self {
        self.default_text = Some(text.to_string());
        self
    }

    /// Attaches a user-supplied converter for this field.
    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Marks the argument as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Zero-based position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Display name (shown as `<name>` in messages and help).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field classification.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether the argument must be provided.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Help lines.
    pub fn help(&self) -> &[String] {
        &self.help
    }

    /// Default-value text for help output.
    pub fn default_text(&self) -> Option<&str> {
        self.default_text.as_deref()
    }

    /// The attached converter, if any.
    pub fn converter(&self) -> Option<&Converter> {
        self.converter.as_ref()
    }
}
