//! Value slots and bound value storage.
//!
//! A [`ValueSlot`] is the mutable cell one descriptor writes into during a
//! parse. [`BoundValues`] owns one slot per descriptor of a
//! [`SchemaSet`](crate::SchemaSet) and is the per-invocation instance handed
//! to the selected command's action. Each slot tracks an explicit set flag,
//! so "not provided" is distinguishable from an explicitly provided default.

use std::any::Any;
use std::path::Path;
use std::sync::Arc;

use url::Url;
use uuid::Uuid;

use crate::schema::FieldKind;
use crate::validate::{SchemaSet, SlotId};
use crate::value::Value;

/// Storage variant matching a field's classification.
#[derive(Debug, Clone)]
pub enum SlotData {
    /// Boolean switch.
    Flag(bool),
    /// Single value.
    Scalar(Option<Value>),
    /// Accumulated values, in append order.
    Array(Vec<Value>),
    /// OR-combined enumeration bits.
    Flags(u64),
}

/// The mutable storage cell bound to one descriptor.
#[derive(Debug, Clone)]
pub struct ValueSlot {
    data: SlotData,
    is_set: bool,
}

impl ValueSlot {
    fn for_kind(kind: &FieldKind) -> Self {
        let data = match kind {
            FieldKind::Flag => SlotData::Flag(false),
            FieldKind::Scalar(_) => SlotData::Scalar(None),
            FieldKind::Array(_) => SlotData::Array(Vec::new()),
            FieldKind::EnumFlags(_) => SlotData::Flags(0),
        };
        Self {
            data,
            is_set: false,
        }
    }

    /// Whether the slot was explicitly written during the parse.
    pub fn is_set(&self) -> bool {
        self.is_set
    }

    /// The slot's storage.
    pub fn data(&self) -> &SlotData {
        &self.data
    }

    /// Writes a flag value.
    pub fn set_flag(&mut self, value: bool) {
        self.data = SlotData::Flag(value);
        self.is_set = true;
    }

    /// Writes a scalar value.
    pub fn set_scalar(&mut self, value: Value) {
        self.data = SlotData::Scalar(Some(value));
        self.is_set = true;
    }

    /// Appends an array element.
    pub fn push(&mut self, value: Value) {
        if let SlotData::Array(values) = &mut self.data {
            values.push(value);
        } else {
            self.data = SlotData::Array(vec![value]);
        }
        self.is_set = true;
    }

    /// ORs enumeration bits into the slot. Zero bits still mark the slot as
    /// set without changing the combination.
    pub fn or_bits(&mut self, bits: u64) {
        let current = match self.data {
            SlotData::Flags(current) => current,
            _ => 0,
        };
        self.data = SlotData::Flags(current | bits);
        self.is_set = true;
    }
}

/// Per-invocation value storage for one command.
///
/// Created zero-initialized when a command is activated, populated by the
/// token state machine, and handed to the command's action once parsing and
/// validation succeed.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use command_parse_core::{BoundValues, OptionSpec, SchemaSet, Value, ValueKind};
///
/// let schema = Arc::new(
///     SchemaSet::build(
///         vec![OptionSpec::scalar("count", ValueKind::I32)],
///         vec![],
///         true,
///     )
///     .unwrap(),
/// );
///
/// let mut values = BoundValues::new(schema.clone());
/// assert!(!values.is_set("count"));
///
/// let slot = schema.option_by_name("count").unwrap();
/// values.slot_mut(slot).set_scalar(Value::I32(7));
/// assert_eq!(values.get_i64("count"), Some(7));
/// ```
#[derive(Debug, Clone)]
pub struct BoundValues {
    schema: Arc<SchemaSet>,
    slots: Vec<ValueSlot>,
}

impl BoundValues {
    /// Creates zero-initialized storage for every descriptor of `schema`.
    pub fn new(schema: Arc<SchemaSet>) -> Self {
        let slots = schema
            .options()
            .iter()
            .map(|option| ValueSlot::for_kind(option.kind()))
            .chain(
                schema
                    .arguments()
                    .iter()
                    .map(|argument| ValueSlot::for_kind(argument.kind())),
            )
            .collect();
        Self { schema, slots }
    }

    /// The descriptor set these values belong to.
    pub fn schema(&self) -> &SchemaSet {
        &self.schema
    }

    /// Borrows a slot by identity.
    pub fn slot(&self, slot: SlotId) -> &ValueSlot {
        &self.slots[slot.index()]
    }

    /// Mutably borrows a slot by identity.
    pub fn slot_mut(&mut self, slot: SlotId) -> &mut ValueSlot {
        &mut self.slots[slot.index()]
    }

    fn lookup(&self, name: &str) -> Option<SlotId> {
        self.schema
            .option_by_name(name)
            .or_else(|| self.schema.argument_by_name(name))
    }

    fn scalar(&self, name: &str) -> Option<&Value> {
        match self.lookup(name).map(|slot| self.slot(slot).data()) {
            Some(SlotData::Scalar(value)) => value.as_ref(),
            _ => None,
        }
    }

    /// Whether the named option or argument was explicitly provided.
    pub fn is_set(&self, name: &str) -> bool {
        self.lookup(name)
            .map(|slot| self.slot(slot).is_set())
            .unwrap_or(false)
    }

    /// Boolean value of a flag or scalar bool field.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.lookup(name).map(|slot| self.slot(slot)) {
            Some(slot) if slot.is_set() => match slot.data() {
                SlotData::Flag(value) => Some(*value),
                SlotData::Scalar(Some(value)) => value.as_bool(),
                _ => None,
            },
            _ => None,
        }
    }

    /// Signed integer value, widened to `i64`.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.scalar(name).and_then(Value::as_i64)
    }

    /// Unsigned integer value, widened to `u64`.
    pub fn get_u64(&self, name: &str) -> Option<u64> {
        self.scalar(name).and_then(Value::as_u64)
    }

    /// Float value, widened to `f64`.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.scalar(name).and_then(Value::as_f64)
    }

    /// String value.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.scalar(name).and_then(Value::as_str)
    }

    /// URL value.
    pub fn get_url(&self, name: &str) -> Option<&Url> {
        match self.scalar(name) {
            Some(Value::Url(value)) => Some(value),
            _ => None,
        }
    }

    /// File or directory path value.
    pub fn get_path(&self, name: &str) -> Option<&Path> {
        match self.scalar(name) {
            Some(Value::FilePath(value)) | Some(Value::DirPath(value)) => Some(value),
            _ => None,
        }
    }

    /// UUID value.
    pub fn get_uuid(&self, name: &str) -> Option<Uuid> {
        match self.scalar(name) {
            Some(Value::Uuid(value)) => Some(*value),
            _ => None,
        }
    }

    /// Declared member name of a scalar enumeration value.
    pub fn enum_member(&self, name: &str) -> Option<&str> {
        match self.scalar(name) {
            Some(Value::Enum(value)) => Some(&value.member),
            _ => None,
        }
    }

    /// OR-combined bits of an enum-flags field, if it was provided.
    pub fn flag_bits(&self, name: &str) -> Option<u64> {
        match self.lookup(name).map(|slot| self.slot(slot)) {
            Some(slot) if slot.is_set() => match slot.data() {
                SlotData::Flags(bits) => Some(*bits),
                _ => None,
            },
            _ => None,
        }
    }

    /// Accumulated elements of an array field, if it was provided.
    pub fn get_array(&self, name: &str) -> Option<&[Value]> {
        match self.lookup(name).map(|slot| self.slot(slot)) {
            Some(slot) if slot.is_set() => match slot.data() {
                SlotData::Array(values) => Some(values.as_slice()),
                _ => None,
            },
            _ => None,
        }
    }

    /// Borrows a converter-produced value as `T`.
    pub fn get_custom<T: Any>(&self, name: &str) -> Option<&T> {
        match self.scalar(name) {
            Some(Value::Custom(value)) => value.downcast_ref(),
            _ => None,
        }
    }

    /// Renders every set option slot back to `--name=value` token form.
    ///
    /// Array slots render one token per element; enum-flags render the
    /// combined members joined with `+`. Re-parsing the rendered tokens
    /// against the same schema reproduces the same slot contents. Positional
    /// argument slots are not rendered.
    pub fn to_tokens(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        for (index, option) in self.schema.options().iter().enumerate() {
            let slot = &self.slots[index];
            if !slot.is_set() {
                continue;
            }

            let name = option.canonical_name();
            match slot.data() {
                SlotData::Flag(value) => tokens.push(format!("--{name}={value}")),
                SlotData::Scalar(Some(value)) => {
                    tokens.push(format!("--{name}={}", value.render()));
                }
                SlotData::Scalar(None) => {}
                SlotData::Array(values) => {
                    for value in values {
                        tokens.push(format!("--{name}={}", value.render()));
                    }
                }
                SlotData::Flags(bits) => {
                    if let FieldKind::EnumFlags(spec) = option.kind() {
                        tokens.push(format!("--{name}={}", spec.render_bits(*bits)));
                    }
                }
            }
        }
        tokens
    }
}

/// Maps bound values into a user-defined options type.
///
/// This is the hand-written counterpart of attribute-driven binding: each
/// command's options struct implements it once, applying defaults for slots
/// that were not provided.
///
/// # Examples
///
/// ```
/// use command_parse_core::{BoundValues, FromValues};
///
/// struct Greeting {
///     name: String,
///     short: bool,
/// }
///
/// impl FromValues for Greeting {
///     fn from_values(values: &BoundValues) -> Self {
///         Self {
///             name: values
///                 .get_str("name")
///                 .unwrap_or("Anonymous")
///                 .to_string(),
///             short: values.get_bool("short").unwrap_or(false),
///         }
///     }
/// }
/// ```
pub trait FromValues: Sized {
    /// Builds the options value from populated slots.
    fn from_values(values: &BoundValues) -> Self;
}
