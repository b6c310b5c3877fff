//! Embedded document and embedded list fields
//!
//! Both are type-checked rather than coerced:
//! - an embedded field silently keeps its value when assigned a document
//!   of an unrelated type, and always accepts `Null`
//! - a list field keeps its sequence (identity and contents) when assigned
//!   anything that is not a sequence of the declared type; a valid sequence
//!   replaces the contents of the instance's own list in place, or of a
//!   new list while the instance still holds the shared declared default
//!
//! Declaring either over a record type that is not embeddable fails
//! immediately. A default of the wrong type fails at record construction.

use std::rc::Rc;

use super::{field_builder, Assignment, Field, FieldKind, FieldOptions};
use crate::document::{Embedded, EmbeddedList, Value};
use crate::schema::{Schema, SchemaError, SchemaResult};

/// Builder for a single embedded document field.
pub struct EmbeddedField {
    options: FieldOptions,
    schema: Rc<Schema>,
}

impl EmbeddedField {
    pub fn new(name: impl Into<String>, schema: &Rc<Schema>) -> SchemaResult<Self> {
        require_embedded(schema)?;
        Ok(Self {
            options: FieldOptions::new(name),
            schema: Rc::clone(schema),
        })
    }

    fn into_field(self) -> Field {
        Field::from_parts(self.options, FieldKind::Embedded(self.schema))
    }
}

field_builder!(EmbeddedField);

/// Builder for a list-of-embedded-documents field.
pub struct ListField {
    options: FieldOptions,
    schema: Rc<Schema>,
}

impl ListField {
    pub fn new(name: impl Into<String>, schema: &Rc<Schema>) -> SchemaResult<Self> {
        require_embedded(schema)?;
        Ok(Self {
            options: FieldOptions::new(name),
            schema: Rc::clone(schema),
        })
    }

    fn into_field(self) -> Field {
        Field::from_parts(self.options, FieldKind::List(self.schema))
    }
}

field_builder!(ListField);

fn require_embedded(schema: &Schema) -> SchemaResult<()> {
    if schema.is_embedded() {
        Ok(())
    } else {
        Err(SchemaError::NotEmbedded {
            found: schema.name().to_string(),
        })
    }
}

pub(super) fn assign_embedded(schema: &Schema, raw: Value) -> Assignment {
    match raw {
        Value::Null => Assignment::Store(Value::Null),
        Value::Embedded(document) if document.is_a(schema) => {
            Assignment::Store(Value::Embedded(document))
        }
        _ => Assignment::Keep,
    }
}

pub(super) fn assign_list(schema: &Rc<Schema>, current: &Value, raw: Value) -> Assignment {
    let documents = match raw {
        Value::List(list) => {
            if matches!(current, Value::List(stored) if stored.ptr_eq(&list)) {
                return Assignment::Keep;
            }
            list.items()
        }
        Value::Array(items) => match embedded_items(items) {
            Some(documents) => documents,
            None => return Assignment::Keep,
        },
        _ => return Assignment::Keep,
    };

    match current {
        Value::List(stored) => match stored.replace_with(documents) {
            Ok(()) => Assignment::Keep,
            // a mismatched element leaves the stored list untouched
            Err(_) => Assignment::Keep,
        },
        _ => {
            let list = EmbeddedList::new(schema);
            match list.replace_with(documents) {
                Ok(()) => Assignment::Store(Value::List(list)),
                Err(_) => Assignment::Keep,
            }
        }
    }
}

fn embedded_items(items: Vec<Value>) -> Option<Vec<Embedded>> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Embedded(document) => Some(document),
            _ => None,
        })
        .collect()
}

pub(super) fn check_default(field: &Field, schema: &Schema, default: Value) -> SchemaResult<Value> {
    match &default {
        Value::Null => Ok(default),
        Value::Embedded(document) if document.is_a(schema) => Ok(default),
        other => Err(invalid_default(field, schema, other)),
    }
}

pub(super) fn list_default(field: &Field, schema: &Rc<Schema>, default: Value) -> SchemaResult<Value> {
    let documents = match default {
        Value::Null => Vec::new(),
        Value::List(list) if list.schema().is_a(schema) => {
            return Ok(Value::List(list));
        }
        Value::Array(items) => {
            let found = Value::Array(items.clone());
            embedded_items(items).ok_or_else(|| invalid_default(field, schema, &found))?
        }
        other => return Err(invalid_default(field, schema, &other)),
    };

    let list = EmbeddedList::new(schema);
    list.replace_with(documents).map_err(|e| match e {
        SchemaError::EmbeddedTypeMismatch { expected, found } => SchemaError::InvalidDefault {
            field: field.name().to_string(),
            expected,
            found,
        },
        other => other,
    })?;
    Ok(Value::List(list))
}

fn invalid_default(field: &Field, schema: &Schema, found: &Value) -> SchemaError {
    SchemaError::InvalidDefault {
        field: field.name().to_string(),
        expected: schema.name().to_string(),
        found: found.type_name(),
    }
}
