//! Float and integer fields
//!
//! Bounds are `Option`s, so a bound of zero is a real bound and not
//! "unset". Floats accept integers by widening; integers reject floats.

use std::fmt::Display;

use super::{field_builder, Field, FieldKind, FieldOptions};
use crate::document::{ValidationContext, Value};

const NOT_FLOAT: &str = "must be a float";
const NOT_INTEGER: &str = "must be a integer";

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Range<T> {
    pub min_value: Option<T>,
    pub max_value: Option<T>,
}

impl<T: PartialOrd + Copy> Range<T> {
    fn check(
        &self,
        field: &Field,
        ctx: &mut ValidationContext<'_>,
        value: T,
        render: impl Fn(T) -> String,
    ) {
        if let Some(min) = self.min_value {
            if value < min {
                ctx.add(field.name(), format!("is too small (minimum is {})", render(min)));
            }
        }
        if let Some(max) = self.max_value {
            if value > max {
                ctx.add(field.name(), format!("is too big (maximum is {})", render(max)));
            }
        }
    }
}

/// Builder for a float field.
pub struct FloatField {
    options: FieldOptions,
    range: Range<f64>,
}

impl FloatField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            options: FieldOptions::new(name),
            range: Range::default(),
        }
    }

    pub fn min_value(mut self, min: f64) -> Self {
        self.range.min_value = Some(min);
        self
    }

    pub fn max_value(mut self, max: f64) -> Self {
        self.range.max_value = Some(max);
        self
    }

    fn into_field(self) -> Field {
        Field::from_parts(self.options, FieldKind::Float(self.range))
    }
}

field_builder!(FloatField);

/// Builder for an integer field.
pub struct IntegerField {
    options: FieldOptions,
    range: Range<i64>,
}

impl IntegerField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            options: FieldOptions::new(name),
            range: Range::default(),
        }
    }

    pub fn min_value(mut self, min: i64) -> Self {
        self.range.min_value = Some(min);
        self
    }

    pub fn max_value(mut self, max: i64) -> Self {
        self.range.max_value = Some(max);
        self
    }

    fn into_field(self) -> Field {
        Field::from_parts(self.options, FieldKind::Integer(self.range))
    }
}

field_builder!(IntegerField);

pub(super) fn coerce_float(raw: Value) -> Value {
    match raw {
        Value::Int(i) => Value::Float(i as f64),
        other => other,
    }
}

pub(super) fn validate_float(
    field: &Field,
    range: &Range<f64>,
    ctx: &mut ValidationContext<'_>,
    value: &Value,
) {
    match value.as_f64() {
        Some(number) => range.check(field, ctx, number, render_float),
        None => ctx.add(field.name(), NOT_FLOAT),
    }
}

pub(super) fn validate_integer(
    field: &Field,
    range: &Range<i64>,
    ctx: &mut ValidationContext<'_>,
    value: &Value,
) {
    match value.as_i64() {
        Some(number) => range.check(field, ctx, number, render_plain),
        None => ctx.add(field.name(), NOT_INTEGER),
    }
}

fn render_plain<T: Display>(bound: T) -> String {
    bound.to_string()
}

/// Positional notation that always keeps a decimal point: `5.0`, `1e20`
/// as `100000000000000000000.0`.
pub(super) fn render_float(number: f64) -> String {
    let text = number.to_string();
    if number.is_finite() && !text.contains('.') {
        text + ".0"
    } else {
        text
    }
}
