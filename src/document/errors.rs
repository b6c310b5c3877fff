//! Per-document validation error collector
//!
//! Data errors are never returned as `Err`. They accumulate here, one entry
//! per failed rule, and `Document::valid` reports aggregate success.
//!
//! - Entries keep insertion order
//! - Duplicates are permitted
//! - The collector is rebuilt from scratch on every validation pass

use std::fmt;

use convert_case::{Case, Casing};

/// Ordered collection of `(field, message)` validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors {
    entries: Vec<(String, String)>,
}

impl Errors {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one entry verbatim.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.entries.push((field.into(), message.into()));
    }

    /// Number of entries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates raw `(field, message)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    /// Messages recorded against one field.
    pub fn on<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> {
        self.entries
            .iter()
            .filter(move |(name, _)| name == field)
            .map(|(_, message)| message.as_str())
    }

    /// Formats every entry as `"<Humanized Field> <message>"`.
    ///
    /// The iterator is lazy and borrows the collector, so calling this
    /// repeatedly always yields the same sequence.
    pub fn full_messages(&self) -> impl Iterator<Item = String> + '_ {
        self.entries
            .iter()
            .map(|(field, message)| format!("{} {}", humanize(field), message))
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, message) in self.full_messages().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(&message)?;
        }
        Ok(())
    }
}

/// Turns a field name into a label: `my_field` becomes `My Field`.
pub fn humanize(name: &str) -> String {
    name.to_case(Case::Title)
}
