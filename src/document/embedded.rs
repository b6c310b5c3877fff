//! Embedded document handles
//!
//! An embedded document is owned by the record that holds it. The one
//! exception is a declared default: every record that has not assigned its
//! own value holds a handle to the same default instance, so mutating it
//! through one record is visible through all of them. Assign a fresh
//! instance before mutating if that is not wanted.
//!
//! Handles use `Rc<RefCell<_>>`, which keeps them on one thread.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use super::record::{Data, Document};
use crate::schema::{Schema, SchemaError, SchemaResult};

/// Shared handle to an embedded document.
#[derive(Clone)]
pub struct Embedded(Rc<RefCell<Document>>);

impl Embedded {
    pub fn new(document: Document) -> Self {
        Self(Rc::new(RefCell::new(document)))
    }

    pub fn borrow(&self) -> Ref<'_, Document> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Document> {
        self.0.borrow_mut()
    }

    /// Record type of the wrapped document.
    pub fn schema(&self) -> Rc<Schema> {
        Rc::clone(self.0.borrow().schema())
    }

    /// True when the wrapped document's type is `schema` or a subtype of it.
    pub fn is_a(&self, schema: &Schema) -> bool {
        self.0.borrow().schema().is_a(schema)
    }

    /// True when both handles point at the same document.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Document> for Embedded {
    fn from(document: Document) -> Self {
        Self::new(document)
    }
}

/// Identity comparison.
impl PartialEq for Embedded {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Embedded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(doc) => write!(f, "Embedded({} {:?})", doc.schema().name(), doc.data()),
            Err(_) => f.write_str("Embedded(<borrowed>)"),
        }
    }
}

/// Ordered, mutable list whose elements are all of one embedded type.
///
/// Clones share the same underlying sequence.
#[derive(Clone)]
pub struct EmbeddedList {
    schema: Rc<Schema>,
    items: Rc<RefCell<Vec<Embedded>>>,
}

impl EmbeddedList {
    pub fn new(schema: &Rc<Schema>) -> Self {
        Self {
            schema: Rc::clone(schema),
            items: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Declared element type.
    pub fn schema(&self) -> &Rc<Schema> {
        &self.schema
    }

    /// Appends a document, rejecting elements of another type.
    pub fn push(&self, document: impl Into<Embedded>) -> SchemaResult<()> {
        let document = document.into();
        self.check(&document)?;
        self.items.borrow_mut().push(document);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Embedded> {
        self.items.borrow().get(index).cloned()
    }

    pub fn remove(&self, index: usize) -> Option<Embedded> {
        let mut items = self.items.borrow_mut();
        (index < items.len()).then(|| items.remove(index))
    }

    pub fn clear(&self) {
        self.items.borrow_mut().clear();
    }

    /// Snapshot of the current elements.
    pub fn items(&self) -> Vec<Embedded> {
        self.items.borrow().clone()
    }

    /// Replaces the contents in place, keeping this list's identity.
    ///
    /// Nothing changes unless every element has the declared type.
    pub fn replace_with(&self, documents: Vec<Embedded>) -> SchemaResult<()> {
        for document in &documents {
            self.check(document)?;
        }
        *self.items.borrow_mut() = documents;
        Ok(())
    }

    /// A new list holding the same elements in a sequence of its own.
    pub fn detached(&self) -> Self {
        Self {
            schema: Rc::clone(&self.schema),
            items: Rc::new(RefCell::new(self.items())),
        }
    }

    /// True when both handles share the same sequence.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.items, &other.items)
    }

    /// Flattened `data()` of every element.
    pub fn data(&self) -> Vec<Data> {
        self.items
            .borrow()
            .iter()
            .map(|document| document.borrow().data())
            .collect()
    }

    fn check(&self, document: &Embedded) -> SchemaResult<()> {
        if document.is_a(&self.schema) {
            Ok(())
        } else {
            Err(SchemaError::EmbeddedTypeMismatch {
                expected: self.schema.name().to_string(),
                found: document.schema().name().to_string(),
            })
        }
    }
}

/// Identity comparison.
impl PartialEq for EmbeddedList {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for EmbeddedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.items.try_borrow() {
            Ok(items) => f
                .debug_struct("EmbeddedList")
                .field("schema", &self.schema.name())
                .field("items", &*items)
                .finish(),
            Err(_) => f.write_str("EmbeddedList(<borrowed>)"),
        }
    }
}
