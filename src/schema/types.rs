//! Record type definitions
//!
//! A `Schema` is declared once per record type and shared by every instance
//! through an `Rc`. It holds the ordered field registry; declaration order is
//! the serialization order of `Document::data`.
//!
//! Record types form a single-inheritance hierarchy: a type extended from a
//! parent inherits the parent's fields and counts as the parent wherever an
//! embedded value of the parent type is expected.

use std::fmt;
use std::rc::Rc;

use crate::fields::Field;

/// Whether a record type is top-level or embeddable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// Top-level, persistable record
    Document,
    /// Record that only lives inside another record
    Embedded,
}

/// Declared record type.
pub struct Schema {
    name: String,
    kind: SchemaKind,
    parent: Option<Rc<Schema>>,
    fields: Vec<Field>,
}

impl Schema {
    /// Starts declaring a top-level record type.
    pub fn document(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name.into(), SchemaKind::Document, None)
    }

    /// Starts declaring an embeddable record type.
    pub fn embedded(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name.into(), SchemaKind::Embedded, None)
    }

    /// Starts declaring a subtype of `parent`, inheriting its kind and fields.
    pub fn extend(parent: &Rc<Schema>, name: impl Into<String>) -> SchemaBuilder {
        let mut builder = SchemaBuilder::new(name.into(), parent.kind, Some(Rc::clone(parent)));
        builder.fields = parent.fields.clone();
        builder
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    pub fn is_embedded(&self) -> bool {
        self.kind == SchemaKind::Embedded
    }

    pub fn parent(&self) -> Option<&Rc<Schema>> {
        self.parent.as_ref()
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name() == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(Field::name)
    }

    /// True when this type is `other` or descends from it.
    ///
    /// Identity is by declaration, not by name: two separately declared
    /// types with the same name are unrelated.
    pub fn is_a(&self, other: &Schema) -> bool {
        std::ptr::eq(self, other) || self.parent.as_ref().is_some_and(|parent| parent.is_a(other))
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("fields", &self.fields)
            .finish()
    }
}

/// Builder returned by the `Schema` constructors.
pub struct SchemaBuilder {
    name: String,
    kind: SchemaKind,
    parent: Option<Rc<Schema>>,
    fields: Vec<Field>,
}

impl SchemaBuilder {
    fn new(name: String, kind: SchemaKind, parent: Option<Rc<Schema>>) -> Self {
        Self {
            name,
            kind,
            parent,
            fields: Vec::new(),
        }
    }

    /// Declares a field. Redeclaring a name replaces the earlier field in
    /// its original position.
    pub fn field(mut self, field: impl Into<Field>) -> Self {
        let field = field.into();
        match self.fields.iter_mut().find(|f| f.name() == field.name()) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    pub fn build(self) -> Rc<Schema> {
        Rc::new(Schema {
            name: self.name,
            kind: self.kind,
            parent: self.parent,
            fields: self.fields,
        })
    }
}
