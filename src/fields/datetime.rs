//! Date-time fields

use super::{field_builder, Field, FieldKind, FieldOptions};
use crate::document::{ValidationContext, Value};

const NOT_DATETIME: &str = "must be a valid date and time";

/// Builder for a date-time field.
pub struct DateTimeField {
    options: FieldOptions,
}

impl DateTimeField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            options: FieldOptions::new(name),
        }
    }

    fn into_field(self) -> Field {
        Field::from_parts(self.options, FieldKind::DateTime)
    }
}

field_builder!(DateTimeField);

pub(super) fn validate(field: &Field, ctx: &mut ValidationContext<'_>, value: &Value) {
    if value.as_datetime().is_none() {
        ctx.add(field.name(), NOT_DATETIME);
    }
}
