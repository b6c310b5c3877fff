//! Boolean fields
//!
//! No coercion: only `true` and `false` are valid. A declared default never
//! overrides an explicit assignment, `false` included.

use super::{field_builder, Field, FieldKind, FieldOptions};
use crate::document::{ValidationContext, Value};

const NOT_BOOLEAN: &str = "must be a valid boolean";

/// Builder for a boolean field.
pub struct BooleanField {
    options: FieldOptions,
}

impl BooleanField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            options: FieldOptions::new(name),
        }
    }

    fn into_field(self) -> Field {
        Field::from_parts(self.options, FieldKind::Boolean)
    }
}

field_builder!(BooleanField);

pub(super) fn validate(field: &Field, ctx: &mut ValidationContext<'_>, value: &Value) {
    if value.as_bool().is_none() {
        ctx.add(field.name(), NOT_BOOLEAN);
    }
}
