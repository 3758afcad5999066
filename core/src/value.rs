//! Typed value model for coerced command-line tokens.
//!
//! Every option and argument declares a [`ValueKind`] describing what a raw
//! token should be converted into. Coercion (see [`crate::coerce`]) produces
//! a [`Value`], the dynamically typed result stored in a value slot.

use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use url::Url;
use uuid::Uuid;

/// One member of a declared enumeration.
///
/// `bits` carries the member's numeric value for enum-flags combination;
/// plain enumerations may use any distinct values. A member with `bits == 0`
/// is treated as the "none" member and contributes nothing when flags are
/// combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnumMember {
    /// Declared member name (e.g. `"NotSure"`).
    pub name: &'static str,
    /// Numeric value used for flags combination.
    pub bits: u64,
}

/// Static description of an enumeration type.
///
/// Tokens are matched case-insensitively against each member's declared name
/// and its dash-cased form, so member `NotSure` matches `not-sure`, `notsure`
/// and `NotSure`.
///
/// # Examples
///
/// ```
/// use command_parse_core::{EnumMember, EnumSpec};
///
/// const ANSWER: EnumSpec = EnumSpec::new(
///     "Answer",
///     &[
///         EnumMember { name: "None", bits: 0 },
///         EnumMember { name: "NotSure", bits: 1 },
///     ],
/// );
///
/// assert_eq!(ANSWER.find("not-sure").map(|m| m.bits), Some(1));
/// assert_eq!(ANSWER.find("NOTSURE").map(|m| m.bits), Some(1));
/// assert!(ANSWER.find("maybe").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnumSpec {
    /// Type name, used in error messages.
    pub name: &'static str,
    /// Member table.
    pub members: &'static [EnumMember],
}

impl EnumSpec {
    /// Creates an enumeration description from a static member table.
    pub const fn new(name: &'static str, members: &'static [EnumMember]) -> Self {
        Self { name, members }
    }

    /// Finds a member by token, matching the declared name or its dash-cased
    /// form, case-insensitively.
    pub fn find(&self, token: &str) -> Option<&EnumMember> {
        self.members.iter().find(|member| {
            member.name.eq_ignore_ascii_case(token)
                || to_dash_case(member.name).eq_ignore_ascii_case(token)
        })
    }

    /// Returns the member whose bits are zero, if one is declared.
    pub fn zero_member(&self) -> Option<&EnumMember> {
        self.members.iter().find(|member| member.bits == 0)
    }

    /// Renders a combined bit set as dash-cased member names joined by `+`.
    ///
    /// Zero bits render as the zero member's dash-cased name when one is
    /// declared, otherwise as an empty string.
    pub fn render_bits(&self, bits: u64) -> String {
        if bits == 0 {
            return self
                .zero_member()
                .map(|member| to_dash_case(member.name))
                .unwrap_or_default();
        }

        let names: Vec<String> = self
            .members
            .iter()
            .filter(|member| member.bits != 0 && bits & member.bits == member.bits)
            .map(|member| to_dash_case(member.name))
            .collect();
        names.join("+")
    }
}

/// Target type tag carried by option and argument descriptors.
///
/// The coercion engine resolves a raw token against this tag; see
/// [`coerce`](crate::coerce) for the resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueKind {
    /// Boolean literal `true`/`false` (case-insensitive).
    Bool,
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 16-bit integer.
    U16,
    /// Unsigned 32-bit integer.
    U32,
    /// Unsigned 64-bit integer.
    U64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// Token taken verbatim.
    String,
    /// URL parsed by its canonical grammar.
    Url,
    /// File path.
    FilePath,
    /// Directory path.
    DirPath,
    /// UUID (hyphenated, simple, or brace-wrapped form).
    Uuid,
    /// Member of a declared enumeration.
    Enum(EnumSpec),
    /// User type handled by a per-field converter; carries the type name.
    Custom(&'static str),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::I8 => write!(f, "i8"),
            Self::I16 => write!(f, "i16"),
            Self::I32 => write!(f, "i32"),
            Self::I64 => write!(f, "i64"),
            Self::U8 => write!(f, "u8"),
            Self::U16 => write!(f, "u16"),
            Self::U32 => write!(f, "u32"),
            Self::U64 => write!(f, "u64"),
            Self::F32 => write!(f, "f32"),
            Self::F64 => write!(f, "f64"),
            Self::String => write!(f, "string"),
            Self::Url => write!(f, "url"),
            Self::FilePath => write!(f, "file path"),
            Self::DirPath => write!(f, "directory path"),
            Self::Uuid => write!(f, "uuid"),
            Self::Enum(spec) => write!(f, "enum {}", spec.name),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// A parsed enumeration member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Declared member name.
    pub member: String,
    /// Member bits, for flags combination.
    pub bits: u64,
}

/// Type-erased value produced by a user-supplied converter.
///
/// Carries the declared type name (matched against the field's
/// [`ValueKind::Custom`] tag at schema build time), a display string used
/// when rendering the value back to a token, and the converted value itself.
#[derive(Clone)]
pub struct CustomValue {
    type_name: &'static str,
    display: String,
    data: Arc<dyn Any + Send + Sync>,
}

impl CustomValue {
    /// Wraps a converted value.
    pub fn new<T>(type_name: &'static str, display: impl Into<String>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            type_name,
            display: display.into(),
            data: Arc::new(value),
        }
    }

    /// Declared type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Display string, usually the original token.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Borrows the inner value as `T`, if the types match.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref()
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValue")
            .field("type_name", &self.type_name)
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.display == other.display
    }
}

/// Dynamically typed result of coercing one token.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Url(Url),
    FilePath(PathBuf),
    DirPath(PathBuf),
    Uuid(Uuid),
    Enum(EnumValue),
    Custom(CustomValue),
}

impl Value {
    /// The value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The value widened to `i64`. Unsigned values up to `u32` widen too;
    /// `u64` does not.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I8(value) => Some(i64::from(*value)),
            Self::I16(value) => Some(i64::from(*value)),
            Self::I32(value) => Some(i64::from(*value)),
            Self::I64(value) => Some(*value),
            Self::U8(value) => Some(i64::from(*value)),
            Self::U16(value) => Some(i64::from(*value)),
            Self::U32(value) => Some(i64::from(*value)),
            _ => None,
        }
    }

    /// The value widened to `u64`, for unsigned values.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U8(value) => Some(u64::from(*value)),
            Self::U16(value) => Some(u64::from(*value)),
            Self::U32(value) => Some(u64::from(*value)),
            Self::U64(value) => Some(*value),
            _ => None,
        }
    }

    /// The value widened to `f64`, for float values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F32(value) => Some(f64::from(*value)),
            Self::F64(value) => Some(*value),
            _ => None,
        }
    }

    /// The value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Renders the value back to its token form.
    ///
    /// Enumeration members render dash-cased; custom values render their
    /// display string (the original token, for converters built with
    /// [`Converter::from_str`](crate::Converter::from_str)).
    pub fn render(&self) -> String {
        match self {
            Self::Bool(value) => value.to_string(),
            Self::I8(value) => value.to_string(),
            Self::I16(value) => value.to_string(),
            Self::I32(value) => value.to_string(),
            Self::I64(value) => value.to_string(),
            Self::U8(value) => value.to_string(),
            Self::U16(value) => value.to_string(),
            Self::U32(value) => value.to_string(),
            Self::U64(value) => value.to_string(),
            Self::F32(value) => value.to_string(),
            Self::F64(value) => value.to_string(),
            Self::String(value) => value.clone(),
            Self::Url(value) => value.as_str().to_string(),
            Self::FilePath(value) | Self::DirPath(value) => value.display().to_string(),
            Self::Uuid(value) => value.to_string(),
            Self::Enum(value) => to_dash_case(&value.member),
            Self::Custom(value) => value.display().to_string(),
        }
    }
}

/// Converts an identifier to dash-case.
///
/// A dash is inserted before every uppercase character whose predecessor is
/// not uppercase, then the whole string is lowercased: `NotSure` becomes
/// `not-sure`, `HTTPServer` becomes `httpserver`.
pub fn to_dash_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    let mut prev_upper = true;
    for ch in name.chars() {
        let upper = ch.is_uppercase();
        if upper && !prev_upper && !out.is_empty() {
            out.push('-');
        }
        for lower in ch.to_lowercase() {
            out.push(lower);
        }
        prev_upper = upper;
    }
    out
}
