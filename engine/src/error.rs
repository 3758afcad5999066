//! Error types for token parsing and driver runs.
//!
//! Two families exist, kept deliberately separate: [`ParseError`] covers
//! everything an end user can trigger with bad input, while schema errors
//! (re-exposed through [`RunError::Schema`]) are programmer mistakes caught
//! before any token is consumed.

use thiserror::Error;

use command_parse_core::{ConvertError, SchemaError};

/// Errors raised during token consumption or final validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A long or short option name resolved to no descriptor.
    #[error("unknown option '{0}'")]
    UnknownOption(String),

    /// A bare token arrived with no unfilled argument to receive it.
    #[error("unsupported argument '{0}'")]
    ExtraArgument(String),

    /// An option value failed coercion.
    #[error("invalid value '{value}' for --{option} option")]
    InvalidOptionValue {
        option: String,
        value: String,
        #[source]
        source: ConvertError,
    },

    /// An argument value failed coercion.
    #[error("invalid value '{value}' for <{argument}> argument")]
    InvalidArgumentValue {
        argument: String,
        value: String,
        #[source]
        source: ConvertError,
    },

    /// An inline value was attached to a short cluster consisting only of
    /// flags, so no option remained to receive it.
    #[error("no option in cluster '-{cluster}' accepts the value '{value}'")]
    UnexpectedClusterValue { cluster: String, value: String },

    /// Input ended while a scalar option was still awaiting its value.
    #[error("missing value for option '--{0}'")]
    MissingValue(String),

    /// A required option was never provided.
    #[error("required option '--{0}' is not provided")]
    RequiredOptionMissing(String),

    /// A required argument was never provided.
    #[error("required argument <{0}> is not provided")]
    RequiredArgumentMissing(String),
}

impl ParseError {
    /// Whether this error comes from the post-parse required-field pass
    /// (reported with a distinct exit status by the driver).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::RequiredOptionMissing(_) | Self::RequiredArgumentMissing(_)
        )
    }
}

/// Any failure surfaced by [`Runner::parse`](crate::Runner::parse).
///
/// Schema errors are fatal programmer mistakes; parse errors are ordinary
/// user-facing CLI errors. [`Runner::run`](crate::Runner::run) panics on the
/// former and prints-and-returns on the latter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// Invalid schema declaration, raised at descriptor-set construction.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Invalid user input, raised during token consumption.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
