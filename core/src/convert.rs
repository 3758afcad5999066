//! Token coercion engine.
//!
//! Converts a single raw token into a typed [`Value`] for a target
//! [`ValueKind`]. Built-in conversions are an ordered rule chain; the first
//! rule that recognizes the target kind wins:
//!
//! 1. boolean literals (`true`/`false`, case-insensitive)
//! 2. fixed-width integers
//! 3. floats
//! 4. strings (identity)
//! 5. well-known structured types (URL, file path, directory path, UUID)
//! 6. enumeration members
//!
//! Kinds no rule recognizes fall through to the field's user-supplied
//! [`Converter`], and failing that, coercion fails with
//! [`ConvertError::Unsupported`]. Numeric parsing uses Rust's invariant
//! `FromStr` grammar; there is no locale-dependent handling.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::value::{CustomValue, EnumValue, Value, ValueKind};

/// Failure to convert one token into a typed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// Token is not a boolean literal.
    #[error("invalid boolean '{0}', expected true or false")]
    InvalidBool(String),

    /// Token is not a number of the target width, or is out of range.
    #[error("invalid {kind} value '{token}'")]
    InvalidNumber { kind: ValueKind, token: String },

    /// Token is not a well-formed URL.
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    /// Token is not a well-formed UUID.
    #[error("invalid UUID '{0}'")]
    InvalidUuid(String),

    /// Token names no member of the target enumeration.
    #[error("invalid value '{token}' for enum {name}")]
    UnknownEnumMember { name: &'static str, token: String },

    /// A user-supplied converter rejected the token.
    #[error("{0}")]
    Converter(String),

    /// The target kind has no built-in rule and no converter is declared.
    #[error("unsupported value type {0}")]
    Unsupported(String),
}

/// User-supplied conversion for one field.
///
/// A converter declares the [`ValueKind`] it produces; schema construction
/// rejects a converter whose output kind differs from the field's declared
/// kind. For types that already implement [`FromStr`], use
/// [`Converter::from_str`] instead of writing the closure by hand.
///
/// # Examples
///
/// ```
/// use command_parse_core::{coerce, Converter, CustomValue, Value, ValueKind};
///
/// let ticks = Converter::new(ValueKind::Custom("Ticks"), |token| {
///     let raw: u64 = token
///         .parse()
///         .map_err(|_| format!("invalid tick count '{token}'"))?;
///     Ok(CustomValue::new("Ticks", token, raw))
/// });
///
/// let value = coerce("42", &ValueKind::Custom("Ticks"), Some(&ticks)).unwrap();
/// match value {
///     Value::Custom(custom) => assert_eq!(custom.downcast_ref::<u64>(), Some(&42)),
///     other => panic!("unexpected value {other:?}"),
/// }
/// ```
#[derive(Clone)]
pub struct Converter {
    output: ValueKind,
    func: Arc<dyn Fn(&str) -> Result<CustomValue, String> + Send + Sync>,
}

impl Converter {
    /// Wraps a conversion closure producing values of `output` kind.
    pub fn new<F>(output: ValueKind, func: F) -> Self
    where
        F: Fn(&str) -> Result<CustomValue, String> + Send + Sync + 'static,
    {
        Self {
            output,
            func: Arc::new(func),
        }
    }

    /// Builds a converter from a type's [`FromStr`] implementation.
    ///
    /// The converted value keeps the original token as its display string,
    /// so rendered tokens round-trip through re-parsing.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::net::IpAddr;
    /// use command_parse_core::Converter;
    ///
    /// let converter = Converter::from_str::<IpAddr>("IpAddr");
    /// let value = converter.convert("127.0.0.1").unwrap();
    /// assert_eq!(value.render(), "127.0.0.1");
    /// ```
    pub fn from_str<T>(type_name: &'static str) -> Self
    where
        T: FromStr + Send + Sync + 'static,
        T::Err: fmt::Display,
    {
        Self::new(ValueKind::Custom(type_name), move |token| {
            let value: T = token.parse().map_err(|err| format!("{err}"))?;
            Ok(CustomValue::new(type_name, token, value))
        })
    }

    /// The kind of value this converter produces.
    pub fn output(&self) -> &ValueKind {
        &self.output
    }

    /// Runs the converter on one token.
    pub fn convert(&self, token: &str) -> Result<Value, ConvertError> {
        (self.func)(token)
            .map(Value::Custom)
            .map_err(ConvertError::Converter)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Converter {
    /// Converters compare by their declared output kind; the conversion
    /// closure is not comparable and is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.output == other.output
    }
}

type Rule = fn(&str, &ValueKind) -> Option<Result<Value, ConvertError>>;

/// Built-in conversion rules, consulted in order.
const RULES: &[Rule] = &[boolean, integer, float, text, well_known, enumeration];

/// Coerces one token into a typed value for the target kind.
///
/// `converter` is the field's user-supplied converter, consulted only for
/// kinds the built-in chain does not recognize.
///
/// # Examples
///
/// ```
/// use command_parse_core::{coerce, Value, ValueKind};
///
/// assert_eq!(coerce("123", &ValueKind::I32, None), Ok(Value::I32(123)));
/// assert_eq!(
///     coerce("TRUE", &ValueKind::Bool, None),
///     Ok(Value::Bool(true))
/// );
/// assert!(coerce("1e99", &ValueKind::I32, None).is_err());
/// ```
pub fn coerce(
    token: &str,
    kind: &ValueKind,
    converter: Option<&Converter>,
) -> Result<Value, ConvertError> {
    for rule in RULES {
        if let Some(result) = rule(token, kind) {
            return result;
        }
    }

    if let Some(converter) = converter {
        return converter.convert(token);
    }

    Err(ConvertError::Unsupported(kind.to_string()))
}

fn boolean(token: &str, kind: &ValueKind) -> Option<Result<Value, ConvertError>> {
    if *kind != ValueKind::Bool {
        return None;
    }

    let value = if token.eq_ignore_ascii_case("true") {
        Ok(Value::Bool(true))
    } else if token.eq_ignore_ascii_case("false") {
        Ok(Value::Bool(false))
    } else {
        Err(ConvertError::InvalidBool(token.to_string()))
    };
    Some(value)
}

fn integer(token: &str, kind: &ValueKind) -> Option<Result<Value, ConvertError>> {
    let value = match kind {
        ValueKind::I8 => token.parse().map(Value::I8).ok(),
        ValueKind::I16 => token.parse().map(Value::I16).ok(),
        ValueKind::I32 => token.parse().map(Value::I32).ok(),
        ValueKind::I64 => token.parse().map(Value::I64).ok(),
        ValueKind::U8 => token.parse().map(Value::U8).ok(),
        ValueKind::U16 => token.parse().map(Value::U16).ok(),
        ValueKind::U32 => token.parse().map(Value::U32).ok(),
        ValueKind::U64 => token.parse().map(Value::U64).ok(),
        _ => return None,
    };

    Some(value.ok_or_else(|| ConvertError::InvalidNumber {
        kind: *kind,
        token: token.to_string(),
    }))
}

fn float(token: &str, kind: &ValueKind) -> Option<Result<Value, ConvertError>> {
    let value = match kind {
        ValueKind::F32 => token.parse().map(Value::F32).ok(),
        ValueKind::F64 => token.parse().map(Value::F64).ok(),
        _ => return None,
    };

    Some(value.ok_or_else(|| ConvertError::InvalidNumber {
        kind: *kind,
        token: token.to_string(),
    }))
}

fn text(token: &str, kind: &ValueKind) -> Option<Result<Value, ConvertError>> {
    if *kind == ValueKind::String {
        Some(Ok(Value::String(token.to_string())))
    } else {
        None
    }
}

fn well_known(token: &str, kind: &ValueKind) -> Option<Result<Value, ConvertError>> {
    let value = match kind {
        ValueKind::Url => Url::parse(token)
            .map(Value::Url)
            .map_err(|_| ConvertError::InvalidUrl(token.to_string())),
        ValueKind::FilePath => Ok(Value::FilePath(PathBuf::from(token))),
        ValueKind::DirPath => Ok(Value::DirPath(PathBuf::from(token))),
        ValueKind::Uuid => {
            // Accept the brace-wrapped registry form alongside the plain ones.
            let trimmed = token.trim_start_matches('{').trim_end_matches('}');
            Uuid::parse_str(trimmed)
                .map(Value::Uuid)
                .map_err(|_| ConvertError::InvalidUuid(token.to_string()))
        }
        _ => return None,
    };
    Some(value)
}

fn enumeration(token: &str, kind: &ValueKind) -> Option<Result<Value, ConvertError>> {
    let ValueKind::Enum(spec) = kind else {
        return None;
    };

    let value = spec
        .find(token)
        .map(|member| {
            Value::Enum(EnumValue {
                member: member.name.to_string(),
                bits: member.bits,
            })
        })
        .ok_or_else(|| ConvertError::UnknownEnumMember {
            name: spec.name,
            token: token.to_string(),
        });
    Some(value)
}
