//! Dynamically typed field values
//!
//! Assignment accepts any `Value`; each field kind then coerces what it can
//! and validation reports what is left over. Values of the wrong kind are
//! therefore representable on purpose.
//!
//! JSON conversion uses relaxed extended JSON for the two types plain JSON
//! cannot carry:
//! - `{"$oid": "<24 hex digits>"}` for identifiers
//! - `{"$date": "<RFC 3339, millisecond precision>"}` for date-times

use std::collections::BTreeMap;

use bson::oid::ObjectId;
use bson::Bson;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value as Json};

use super::embedded::{Embedded, EmbeddedList};
use super::record::Document;

/// A single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(DateTime<Utc>),
    ObjectId(ObjectId),
    /// Plain ordered sequence of values
    Array(Vec<Value>),
    /// Untyped nested mapping
    Map(BTreeMap<String, Value>),
    /// Handle to an embedded document
    Embedded(Embedded),
    /// Handle to a typed list of embedded documents
    List(EmbeddedList),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the kind name used in configuration error messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".into(),
            Value::Bool(_) => "bool".into(),
            Value::Int(_) => "int".into(),
            Value::Float(_) => "float".into(),
            Value::Text(_) => "text".into(),
            Value::DateTime(_) => "datetime".into(),
            Value::ObjectId(_) => "object id".into(),
            Value::Array(_) => "array".into(),
            Value::Map(_) => "map".into(),
            Value::Embedded(doc) => doc.schema().name().to_string(),
            Value::List(list) => format!("list of {}", list.schema().name()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            Value::ObjectId(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_embedded(&self) -> Option<&Embedded> {
        match self {
            Value::Embedded(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&EmbeddedList> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Converts to JSON. Embedded documents flatten to their `data()`.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Text(s) => Json::String(s.clone()),
            Value::DateTime(dt) => {
                Bson::DateTime(bson::DateTime::from_chrono(*dt)).into_relaxed_extjson()
            }
            Value::ObjectId(id) => Bson::ObjectId(*id).into_relaxed_extjson(),
            Value::Array(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => Json::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Value::Embedded(doc) => Json::Object(doc.borrow().data()),
            Value::List(list) => Json::Array(list.data().into_iter().map(Json::Object).collect()),
        }
    }

    /// Converts from JSON, recognising `$oid` and `$date` wrappers.
    ///
    /// Objects never become embedded documents here; that needs a schema
    /// and happens in `Document::from_data`.
    pub fn from_json(json: &Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float))
                .unwrap_or(Value::Null),
            Json::String(s) => Value::Text(s.clone()),
            Json::Array(items) => Value::Array(items.iter().map(Value::from_json).collect()),
            Json::Object(map) => extended_scalar(map).unwrap_or_else(|| {
                Value::Map(
                    map.iter()
                        .map(|(key, value)| (key.clone(), Value::from_json(value)))
                        .collect(),
                )
            }),
        }
    }
}

/// Decodes a single-key `$oid` / `$date` wrapper.
fn extended_scalar(map: &Map<String, Json>) -> Option<Value> {
    if map.len() != 1 || !(map.contains_key("$oid") || map.contains_key("$date")) {
        return None;
    }
    match Bson::try_from(Json::Object(map.clone())) {
        Ok(Bson::ObjectId(id)) => Some(Value::ObjectId(id)),
        Ok(Bson::DateTime(dt)) => Some(Value::DateTime(dt.to_chrono())),
        _ => None,
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::ObjectId(id)
    }
}

impl From<Embedded> for Value {
    fn from(doc: Embedded) -> Self {
        Value::Embedded(doc)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Embedded(Embedded::new(doc))
    }
}

impl From<EmbeddedList> for Value {
    fn from(list: EmbeddedList) -> Self {
        Value::List(list)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
