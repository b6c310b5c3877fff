//! String fields
//!
//! Assignment forces the value to text and strips leading and trailing
//! whitespace; everything else, multi-byte characters included, is kept
//! as is. Lengths count characters, not bytes.
//!
//! `choices` is only consulted when a record is constructed with initial
//! values, never during `valid`.

use regex::Regex;

use super::{field_builder, numeric, Field, FieldKind, FieldOptions, LengthRules};
use crate::document::{ValidationContext, Value};
use crate::schema::{SchemaError, SchemaResult};

const WRONG_FORMAT: &str = "is in the wrong format";
pub(crate) const NOT_IN_CHOICES: &str = "value must be in list";

/// Constraints of a string field.
#[derive(Debug, Clone, Default)]
pub struct StringRules {
    pub lengths: LengthRules,
    pub pattern: Option<Regex>,
    pub choices: Option<Vec<String>>,
}

impl StringRules {
    pub(super) fn violates_choices(&self, value: &Value) -> bool {
        match (&self.choices, value) {
            (Some(choices), Value::Text(text)) => !choices.iter().any(|choice| choice == text),
            _ => false,
        }
    }
}

/// Builder for a string field.
pub struct StringField {
    options: FieldOptions,
    rules: StringRules,
}

impl StringField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            options: FieldOptions::new(name),
            rules: StringRules::default(),
        }
    }

    /// Exact length in characters; replaces min/max checks.
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

    /// Regular expression searched for in the stripped value.
    pub fn pattern(mut self, pattern: &str) -> SchemaResult<Self> {
        let regex = Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        self.rules.pattern = Some(regex);
        Ok(self)
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    fn into_field(self) -> Field {
        Field::from_parts(self.options, FieldKind::String(self.rules))
    }
}

field_builder!(StringField);

pub(super) fn coerce(raw: Value) -> Value {
    let text = match raw {
        Value::Null => return Value::Null,
        Value::Text(text) => text,
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => numeric::render_float(f),
        Value::DateTime(dt) => dt.to_rfc3339(),
        Value::ObjectId(id) => id.to_hex(),
        other => other.to_json().to_string(),
    };

    let trimmed = text.trim();
    if trimmed.len() == text.len() {
        Value::Text(text)
    } else {
        Value::Text(trimmed.to_string())
    }
}

pub(super) fn validate(
    field: &Field,
    rules: &StringRules,
    ctx: &mut ValidationContext<'_>,
    value: &Value,
    absent: bool,
) {
    // blank text on an optional field is fine whatever the other rules say
    if absent && !field.is_required() {
        return;
    }

    let text = value.as_str().unwrap_or("");
    rules.lengths.check(field, ctx, text.chars().count(), "characters");

    if absent {
        return;
    }
    if let Some(pattern) = &rules.pattern {
        if !pattern.is_match(text) {
            ctx.add(field.name(), WRONG_FORMAT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_strips_whitespace() {
        assert_eq!(
            coerce(Value::Text(" a value with leading and trailing whitespace    ".into())),
            Value::Text("a value with leading and trailing whitespace".into())
        );
    }

    #[test]
    fn test_coerce_forces_text() {
        assert_eq!(coerce(Value::Int(5)), Value::Text("5".into()));
        assert_eq!(coerce(Value::Float(2.5)), Value::Text("2.5".into()));
        assert_eq!(coerce(Value::Float(5.0)), Value::Text("5.0".into()));
        assert_eq!(coerce(Value::Bool(true)), Value::Text("true".into()));
        assert_eq!(coerce(Value::Null), Value::Null);
        assert_eq!(
            coerce(Value::Array(vec![Value::Int(1)])),
            Value::Text("[1]".into())
        );
    }

    #[test]
    fn test_coerce_keeps_multibyte_text() {
        let text = "I sat down for coffee at the café";
        assert_eq!(coerce(Value::Text(text.into())), Value::Text(text.into()));
    }

    #[test]
    fn test_builder_defaults() {
        let field: Field = StringField::new("my_field").into();
        match field.kind() {
            FieldKind::String(rules) => {
                assert_eq!(rules.lengths, LengthRules::default());
                assert!(rules.pattern.is_none());
                assert!(rules.choices.is_none());
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_invalid_pattern_is_a_configuration_error() {
        let err = StringField::new("my_field").pattern("(unclosed").err().unwrap();
        assert!(matches!(err, SchemaError::InvalidPattern { .. }));
    }

    #[test]
    fn test_choices() {
        let rules = StringRules {
            choices: Some(vec!["type_a".into(), "type_b".into()]),
            ..StringRules::default()
        };
        assert!(rules.violates_choices(&Value::Text("not a choice".into())));
        assert!(!rules.violates_choices(&Value::Text("type_a".into())));
        assert!(!rules.violates_choices(&Value::Null));
    }
}
