//! Field descriptors
//!
//! A field is declared once per record type and never holds per-instance
//! state. Every kind implements the same protocol:
//!
//! - `coerce`: best-effort conversion on assignment; never fails, returns
//!   the raw value when it cannot convert
//! - `validate`: appends zero or more messages to the record's errors;
//!   never fails
//!
//! Rules shared by every kind, applied before the kind-specific checks:
//!
//! - Required: an absent value adds "is required". Absent means `Null`,
//!   plus blank text for strings and an empty sequence for arrays and
//!   lists. Numeric zero is never absent. The check does not stop string
//!   and array length checks from running.
//! - Absence: a `Null` value on an optional field gets no further checks.
//!
//! The set of kinds is closed; dispatch is an exhaustive `match`.

mod array;
mod boolean;
mod datetime;
mod embedded;
mod numeric;
mod object_id;
mod string;

pub use array::{ArrayField, ArrayRules};
pub use boolean::BooleanField;
pub use datetime::DateTimeField;
pub use embedded::{EmbeddedField, ListField};
pub use numeric::{FloatField, IntegerField, Range};
pub use object_id::ObjectIdField;
pub use string::{StringField, StringRules};

pub(crate) use string::NOT_IN_CHOICES;

use std::fmt;
use std::rc::Rc;

use crate::document::{humanize, ValidationContext, Value};
use crate::schema::{Schema, SchemaError, SchemaResult};

pub(crate) const REQUIRED: &str = "is required";

/// Per-item validation hook for array fields, called as (field, record, item).
pub type ItemValidator = Rc<dyn Fn(&Field, &mut ValidationContext<'_>, &Value)>;

/// Declared default: a value shared by every instance, or a factory called
/// once per instance.
#[derive(Clone)]
pub enum FieldDefault {
    Value(Value),
    Factory(Rc<dyn Fn() -> Value>),
}

impl FieldDefault {
    fn produce(&self) -> Value {
        match self {
            FieldDefault::Value(value) => value.clone(),
            FieldDefault::Factory(factory) => factory(),
        }
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefault::Value(value) => f.debug_tuple("Value").field(value).finish(),
            FieldDefault::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// Kind-specific part of a field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Boolean,
    DateTime,
    Float(Range<f64>),
    Integer(Range<i64>),
    ObjectId,
    String(StringRules),
    Array(ArrayRules),
    /// Single embedded document of the given type
    Embedded(Rc<Schema>),
    /// List of embedded documents of the given type
    List(Rc<Schema>),
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Boolean => "boolean",
            FieldKind::DateTime => "datetime",
            FieldKind::Float(_) => "float",
            FieldKind::Integer(_) => "integer",
            FieldKind::ObjectId => "object_id",
            FieldKind::String(_) => "string",
            FieldKind::Array(_) => "array",
            FieldKind::Embedded(_) => "embedded",
            FieldKind::List(_) => "list",
        }
    }
}

/// Outcome of assigning a raw value to a field.
#[derive(Debug)]
pub(crate) enum Assignment {
    /// Store this (coerced) value
    Store(Value),
    /// Leave the stored value as it is
    Keep,
    /// Store `store` and report `message` until the next assignment
    Reject { store: Value, message: &'static str },
}

/// Options every kind accepts.
#[derive(Debug, Clone)]
pub(crate) struct FieldOptions {
    name: String,
    required: bool,
    default: Option<FieldDefault>,
}

impl FieldOptions {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            default: None,
        }
    }
}

/// Generates the options shared by every field builder.
macro_rules! field_builder {
    ($builder:ident) => {
        impl $builder {
            /// Marks the field as required.
            pub fn required(mut self) -> Self {
                self.options.required = true;
                self
            }

            /// Declares a default shared by every instance.
            pub fn default(mut self, value: impl Into<$crate::document::Value>) -> Self {
                self.options.default = Some($crate::fields::FieldDefault::Value(value.into()));
                self
            }

            /// Declares a default computed for each new instance.
            pub fn default_with(
                mut self,
                factory: impl Fn() -> $crate::document::Value + 'static,
            ) -> Self {
                self.options.default =
                    Some($crate::fields::FieldDefault::Factory(std::rc::Rc::new(factory)));
                self
            }
        }

        impl From<$builder> for $crate::fields::Field {
            fn from(builder: $builder) -> Self {
                builder.into_field()
            }
        }
    };
}
pub(crate) use field_builder;

/// A declared field.
#[derive(Clone)]
pub struct Field {
    options: FieldOptions,
    kind: FieldKind,
}

impl Field {
    pub(crate) fn from_parts(options: FieldOptions, kind: FieldKind) -> Self {
        Self { options, kind }
    }

    pub fn name(&self) -> &str {
        &self.options.name
    }

    /// Humanized name used in messages.
    pub fn label(&self) -> String {
        humanize(&self.options.name)
    }

    pub fn is_required(&self) -> bool {
        self.options.required
    }

    pub fn default(&self) -> Option<&FieldDefault> {
        self.options.default.as_ref()
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Value a new instance reads before any assignment.
    pub fn default_value(&self) -> Value {
        match &self.options.default {
            Some(default) => default.produce(),
            None => match &self.kind {
                FieldKind::Array(_) => Value::Array(Vec::new()),
                FieldKind::List(schema) => Value::List(crate::document::EmbeddedList::new(schema)),
                _ => Value::Null,
            },
        }
    }

    /// Best-effort conversion to this field's kind.
    pub fn coerce(&self, raw: Value) -> Value {
        match &self.kind {
            FieldKind::Float(_) => numeric::coerce_float(raw),
            FieldKind::ObjectId => object_id::coerce(raw),
            FieldKind::String(_) => string::coerce(raw),
            FieldKind::Boolean
            | FieldKind::DateTime
            | FieldKind::Integer(_)
            | FieldKind::Array(_)
            | FieldKind::Embedded(_)
            | FieldKind::List(_) => raw,
        }
    }

    /// True when `value` counts as missing for the required check.
    pub fn is_absent(&self, value: &Value) -> bool {
        match (&self.kind, value) {
            (_, Value::Null) => true,
            (FieldKind::String(_), Value::Text(text)) => text.trim().is_empty(),
            (FieldKind::Array(_), Value::Array(items)) => items.is_empty(),
            (FieldKind::List(_), Value::List(list)) => list.is_empty(),
            _ => false,
        }
    }

    /// Appends this field's violations for `value` to the context.
    pub fn validate(&self, ctx: &mut ValidationContext<'_>, value: &Value) {
        let absent = self.is_absent(value);
        if self.options.required && absent {
            ctx.add(self.name(), REQUIRED);
        }

        match &self.kind {
            FieldKind::String(rules) => string::validate(self, rules, ctx, value, absent),
            FieldKind::Array(rules) => array::validate(self, rules, ctx, value),
            _ if value.is_null() => {}
            FieldKind::Boolean => boolean::validate(self, ctx, value),
            FieldKind::DateTime => datetime::validate(self, ctx, value),
            FieldKind::Float(range) => numeric::validate_float(self, range, ctx, value),
            FieldKind::Integer(range) => numeric::validate_integer(self, range, ctx, value),
            FieldKind::ObjectId => object_id::validate(self, ctx, value),
            FieldKind::Embedded(_) | FieldKind::List(_) => {}
        }
    }

    /// Decides what assigning `raw` does to the stored `current` value.
    pub(crate) fn assign(&self, current: &Value, raw: Value) -> Assignment {
        match &self.kind {
            FieldKind::Array(_) => array::assign(raw),
            FieldKind::Embedded(schema) => embedded::assign_embedded(schema, raw),
            FieldKind::List(schema) => embedded::assign_list(schema, current, raw),
            _ => Assignment::Store(self.coerce(raw)),
        }
    }

    /// Value stored in a freshly constructed instance.
    ///
    /// Fails when the declared default, after coercion, is not of this
    /// field's kind; that is only detected here, at construction.
    pub(crate) fn initial_value(&self) -> SchemaResult<Value> {
        let default = self.default_value();
        match &self.kind {
            FieldKind::Embedded(schema) => embedded::check_default(self, schema, default),
            FieldKind::List(schema) => embedded::list_default(self, schema, default),
            _ => {
                let value = self.coerce(default);
                if value.is_null() || self.holds_kind(&value) {
                    Ok(value)
                } else {
                    Err(SchemaError::InvalidDefault {
                        field: self.name().to_string(),
                        expected: self.kind.name().to_string(),
                        found: value.type_name(),
                    })
                }
            }
        }
    }

    /// True when `value` has this scalar or array field's kind. Bounds,
    /// lengths and patterns are not consulted.
    fn holds_kind(&self, value: &Value) -> bool {
        match (&self.kind, value) {
            (FieldKind::Boolean, Value::Bool(_))
            | (FieldKind::DateTime, Value::DateTime(_))
            | (FieldKind::Float(_), Value::Float(_))
            | (FieldKind::Integer(_), Value::Int(_))
            | (FieldKind::ObjectId, Value::ObjectId(_))
            | (FieldKind::String(_), Value::Text(_))
            | (FieldKind::Array(_), Value::Array(_)) => true,
            _ => false,
        }
    }

    /// True when a construction-time value falls outside declared choices.
    pub(crate) fn violates_choices(&self, value: &Value) -> bool {
        match &self.kind {
            FieldKind::String(rules) => rules.violates_choices(value),
            _ => false,
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.options.name)
            .field("required", &self.options.required)
            .field("default", &self.options.default)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Length bounds shared by strings and arrays.
///
/// An exact `length` replaces the min/max checks entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LengthRules {
    pub length: Option<usize>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl LengthRules {
    fn check(&self, field: &Field, ctx: &mut ValidationContext<'_>, len: usize, unit: &str) {
        if let Some(length) = self.length {
            if len != length {
                ctx.add(
                    field.name(),
                    format!("is the wrong length (should be {} {})", length, unit),
                );
            }
            return;
        }

        if let Some(min) = self.min_length {
            if len < min {
                ctx.add(field.name(), format!("is too short (minimum is {} {})", min, unit));
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                ctx.add(field.name(), format!("is too long (maximum is {} {})", max, unit));
            }
        }
    }
}
