//! Core types for declarative command-line schemas.
//!
//! This crate defines the static and dynamic halves of a command schema:
//!
//! - [`OptionSpec`] / [`ArgSpec`] — descriptors declaring names,
//!   requiredness, and classification ([`FieldKind`]) for each field.
//! - [`SchemaSet`] — the validated descriptor set for one command, built
//!   once before any token is parsed; violations are [`SchemaError`]s.
//! - [`ValueKind`] / [`Value`] — target type tags and the dynamically typed
//!   values tokens coerce into, via [`coerce`] and optional per-field
//!   [`Converter`]s.
//! - [`ValueSlot`] / [`BoundValues`] — the per-invocation storage the token
//!   state machine writes into, addressed by [`SlotId`].
//!
//! The token state machine itself, the command tree, and the execution
//! driver live in the `command-parse-engine` crate.
//!
//! # Example
//!
//! ```
//! use command_parse_core::*;
//!
//! let schema = SchemaSet::build(
//!     vec![
//!         OptionSpec::scalar("output", ValueKind::FilePath)
//!             .with_short('o')
//!             .with_help("Output file"),
//!         OptionSpec::flag("verbose").with_short('v'),
//!     ],
//!     vec![ArgSpec::scalar(0, "input", ValueKind::String).required()],
//!     true,
//! )
//! .unwrap();
//!
//! assert!(schema.option_by_name("output").is_some());
//! assert_eq!(schema.argument_count(), 1);
//! ```

mod convert;
mod schema;
mod slots;
mod validate;
mod value;

pub use convert::{Converter, ConvertError, coerce};
pub use schema::{ArgSpec, FieldKind, OptionSpec};
pub use slots::{BoundValues, FromValues, SlotData, ValueSlot};
pub use validate::{FieldRef, SchemaError, SchemaSet, SlotId};
pub use value::{CustomValue, EnumMember, EnumSpec, EnumValue, Value, ValueKind, to_dash_case};
