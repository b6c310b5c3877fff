//! Plain array fields
//!
//! Only sequences can be assigned. Anything else stores an empty array and
//! reports "is not a list." until the field is assigned again.

use std::fmt;
use std::rc::Rc;

use super::{field_builder, Assignment, Field, FieldKind, FieldOptions, ItemValidator, LengthRules};
use crate::document::{ValidationContext, Value};

pub(crate) const NOT_A_LIST: &str = "is not a list.";

/// Constraints of an array field.
#[derive(Clone, Default)]
pub struct ArrayRules {
    pub lengths: LengthRules,
    pub validate_item: Option<ItemValidator>,
}

impl fmt::Debug for ArrayRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayRules")
            .field("lengths", &self.lengths)
            .field("validate_item", &self.validate_item.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Builder for an array field.
pub struct ArrayField {
    options: FieldOptions,
    rules: ArrayRules,
}

impl ArrayField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            options: FieldOptions::new(name),
            rules: ArrayRules::default(),
        }
    }

    /// Exact number of items; replaces min/max checks.
    pub fn length(mut self, length: usize) -> Self {
        self.rules.lengths.length = Some(length);
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.rules.lengths.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.rules.lengths.max_length = Some(max);
        self
    }

    /// Hook called once per item during validation.
    pub fn validate_item(
        mut self,
        hook: impl Fn(&Field, &mut ValidationContext<'_>, &Value) + 'static,
    ) -> Self {
        self.rules.validate_item = Some(Rc::new(hook));
        self
    }

    fn into_field(self) -> Field {
        Field::from_parts(self.options, FieldKind::Array(self.rules))
    }
}

field_builder!(ArrayField);

pub(super) fn assign(raw: Value) -> Assignment {
    match raw {
        Value::Null | Value::Array(_) => Assignment::Store(raw),
        Value::List(list) => Assignment::Store(Value::Array(
            list.items().into_iter().map(Value::Embedded).collect(),
        )),
        _ => Assignment::Reject {
            store: Value::Array(Vec::new()),
            message: NOT_A_LIST,
        },
    }
}

pub(super) fn validate(
    field: &Field,
    rules: &ArrayRules,
    ctx: &mut ValidationContext<'_>,
    value: &Value,
) {
    let items = match value {
        Value::Null if !field.is_required() => return,
        Value::Null => &[][..],
        Value::Array(items) => items.as_slice(),
        _ => {
            ctx.add(field.name(), NOT_A_LIST);
            return;
        }
    };

    rules.lengths.check(field, ctx, items.len(), "items");

    if let Some(hook) = &rules.validate_item {
        for item in items {
            hook(field, ctx, item);
        }
    }
}
