//! Record instances
//!
//! A `Document` pairs a record type (`Schema`) with one stored value per
//! declared field and an owned error collector. It offers persistence code
//! exactly two contracts:
//!
//! - `valid()`: rebuilds the errors from scratch and reports success
//! - `data()`: flat, ordered map of field name to value, embedded documents
//!   replaced by their own `data()`
//!
//! `fields()` lets callers look for convention fields such as `created_at`;
//! nothing here assigns them.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde_json::{Map, Value as Json};

use super::embedded::{Embedded, EmbeddedList};
use super::errors::Errors;
use super::value::Value;
use crate::fields::{Assignment, FieldKind, NOT_IN_CHOICES};
use crate::observability::Event;
use crate::schema::{Schema, SchemaError, SchemaResult};

/// Flattened document data, in field declaration order.
pub type Data = Map<String, Json>;

const NULL: &Value = &Value::Null;

/// Validation view handed to field validators and item hooks.
pub struct ValidationContext<'a> {
    document: &'a Document,
    errors: &'a mut Errors,
}

impl<'a> ValidationContext<'a> {
    /// The record being validated.
    pub fn document(&self) -> &Document {
        self.document
    }

    /// Errors recorded so far in this pass.
    pub fn errors(&self) -> &Errors {
        self.errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.add(field, message);
    }
}

/// A record instance.
#[derive(Debug)]
pub struct Document {
    schema: Rc<Schema>,
    values: HashMap<String, Value>,
    /// List fields still holding their declared default, which other
    /// instances share until they assign their own
    shared: HashSet<String>,
    /// Structural rejections from the last assignment, per field
    rejected: HashMap<String, &'static str>,
    errors: Errors,
}

/// Clones get their own list sequences, so assigning or pushing to one
/// never reaches the other. Declared defaults stay shared, and embedded
/// documents are shared handles in both.
impl Clone for Document {
    fn clone(&self) -> Self {
        let values = self
            .values
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::List(list) if !self.shared.contains(name) => Value::List(list.detached()),
                    other => other.clone(),
                };
                (name.clone(), value)
            })
            .collect();

        Self {
            schema: Rc::clone(&self.schema),
            values,
            shared: self.shared.clone(),
            rejected: self.rejected.clone(),
            errors: self.errors.clone(),
        }
    }
}

impl Document {
    /// Creates an instance holding every field's default.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidDefault` when a field declares a default
    /// of the wrong kind.
    pub fn new(schema: &Rc<Schema>) -> SchemaResult<Self> {
        let mut values = HashMap::with_capacity(schema.fields().len());
        let mut shared = HashSet::new();
        for field in schema.fields() {
            if matches!(field.kind(), FieldKind::List(_)) && field.default().is_some() {
                shared.insert(field.name().to_string());
            }
            values.insert(field.name().to_string(), field.initial_value()?);
        }

        Ok(Self {
            schema: Rc::clone(schema),
            values,
            shared,
            rejected: HashMap::new(),
            errors: Errors::new(),
        })
    }

    /// Creates an instance and assigns initial values.
    ///
    /// This is the only place `choices` is enforced: values outside a
    /// field's choices are reported in `errors()` right away.
    pub fn with_values<I, K, V>(schema: &Rc<Schema>, values: I) -> SchemaResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut document = Self::new(schema)?;
        let mut assigned = Vec::new();

        for (name, value) in values {
            let name = name.as_ref();
            document.set(name, value)?;
            assigned.push(name.to_string());
        }

        for name in assigned {
            if let Some(field) = document.schema.field(&name) {
                if field.violates_choices(document.get_or_null(&name)) {
                    document.errors.add(name, NOT_IN_CHOICES);
                }
            }
        }

        Ok(document)
    }

    /// Rebuilds an instance from stored flat data.
    ///
    /// Nested maps under embedded and list fields become embedded documents
    /// of the declared type. Keys without a matching field are ignored, as
    /// are list items that are not maps.
    pub fn from_data(schema: &Rc<Schema>, data: &Data) -> SchemaResult<Self> {
        let mut document = Self::new(schema)?;

        for field in schema.fields() {
            let Some(json) = data.get(field.name()) else {
                continue;
            };

            let value = match (field.kind(), json) {
                (FieldKind::Embedded(embedded), Json::Object(nested)) => {
                    Value::Embedded(Embedded::new(Self::from_data(embedded, nested)?))
                }
                (FieldKind::List(embedded), Json::Array(items)) => {
                    let list = EmbeddedList::new(embedded);
                    for item in items {
                        if let Json::Object(nested) = item {
                            list.push(Self::from_data(embedded, nested)?)?;
                        }
                    }
                    // a fresh list, so a shared default is never refilled
                    document.shared.remove(field.name());
                    document.values.insert(field.name().to_string(), Value::List(list));
                    continue;
                }
                _ => Value::from_json(json),
            };

            document.set(field.name(), value)?;
        }

        Ok(document)
    }

    pub fn schema(&self) -> &Rc<Schema> {
        &self.schema
    }

    /// Declared field names, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.schema.field_names()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.schema.has_field(name)
    }

    /// Current value of a field, or `None` if no such field is declared.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    fn get_or_null(&self, name: &str) -> &Value {
        self.values.get(name).unwrap_or(NULL)
    }

    /// Assigns a field, coercing the value first.
    ///
    /// The coerced value is stored even when coercion could not convert it,
    /// so `valid()` reports the mismatch. Embedded and list fields may
    /// silently keep their current value instead.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownField` if the field is not declared.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> SchemaResult<()> {
        let schema = Rc::clone(&self.schema);
        let field = schema
            .field(name)
            .ok_or_else(|| SchemaError::unknown_field(schema.name(), name))?;

        // a shared default is never rewritten in place
        let current = if self.shared.contains(name) {
            NULL
        } else {
            self.get_or_null(name)
        };

        match field.assign(current, value.into()) {
            Assignment::Store(value) => {
                self.shared.remove(name);
                self.rejected.remove(name);
                self.values.insert(name.to_string(), value);
            }
            Assignment::Keep => {}
            Assignment::Reject { store, message } => {
                self.shared.remove(name);
                self.rejected.insert(name.to_string(), message);
                self.values.insert(name.to_string(), store);
            }
        }
        Ok(())
    }

    /// Errors from the last validation pass (or construction).
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Validates every field and reports whether the document is valid.
    ///
    /// The error collector is cleared first, so errors from earlier passes
    /// never survive.
    pub fn valid(&mut self) -> bool {
        let schema = Rc::clone(&self.schema);
        let mut errors = Errors::new();

        for field in schema.fields() {
            if let Some(message) = self.rejected.get(field.name()) {
                errors.add(field.name(), *message);
            }
            let mut ctx = ValidationContext {
                document: &*self,
                errors: &mut errors,
            };
            field.validate(&mut ctx, self.get_or_null(field.name()));
        }

        self.errors = errors;
        let count = self.errors.count().to_string();
        if self.errors.is_empty() {
            Event::DocumentValidated.log(&[("schema", schema.name())]);
        } else {
            Event::DocumentInvalid.log(&[("schema", schema.name()), ("error_count", count.as_str())]);
        }

        self.errors.is_empty()
    }

    /// Flattened data in declaration order.
    pub fn data(&self) -> Data {
        self.schema
            .fields()
            .iter()
            .map(|field| (field.name().to_string(), self.get_or_null(field.name()).to_json()))
            .collect()
    }
}
