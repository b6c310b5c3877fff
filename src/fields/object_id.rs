//! Identifier fields
//!
//! Text that parses as an identifier is converted on assignment; anything
//! else is kept as assigned and reported by validation.

use super::{field_builder, Field, FieldKind, FieldOptions};
use crate::document::{ObjectId, ValidationContext, Value};

const NOT_OBJECT_ID: &str = "must be a valid Object Id";

/// Builder for an identifier field.
pub struct ObjectIdField {
    options: FieldOptions,
}

impl ObjectIdField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            options: FieldOptions::new(name),
        }
    }

    fn into_field(self) -> Field {
        Field::from_parts(self.options, FieldKind::ObjectId)
    }
}

field_builder!(ObjectIdField);

pub(super) fn coerce(raw: Value) -> Value {
    match raw {
        Value::Text(text) => match ObjectId::parse_str(&text) {
            Ok(id) => Value::ObjectId(id),
            Err(_) => Value::Text(text),
        },
        other => other,
    }
}

pub(super) fn validate(field: &Field, ctx: &mut ValidationContext<'_>, value: &Value) {
    if value.as_object_id().is_none() {
        ctx.add(field.name(), NOT_OBJECT_ID);
    }
}
