//! # Document Store
//!
//! Binds a top-level record type to a named collection. Documents are
//! validated before every write and an invalid document is never written.

use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use chrono::Utc;

use super::collection::Collection;
use super::config::StoreConfig;
use super::errors::{StoreError, StoreResult};
use crate::document::{Data, Document, ObjectId, Value};
use crate::observability::{Event, Timer};
use crate::schema::{Schema, SchemaResult};

/// A document together with its collection id, once it has one.
#[derive(Debug, Clone)]
pub struct PersistedDocument {
    document: Document,
    id: Option<ObjectId>,
}

impl PersistedDocument {
    /// Wraps a document that has not been saved yet.
    pub fn new(document: Document) -> Self {
        Self { document, id: None }
    }

    pub fn id(&self) -> Option<ObjectId> {
        self.id
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}

impl From<Document> for PersistedDocument {
    fn from(document: Document) -> Self {
        Self::new(document)
    }
}

impl Deref for PersistedDocument {
    type Target = Document;

    fn deref(&self) -> &Document {
        &self.document
    }
}

impl DerefMut for PersistedDocument {
    fn deref_mut(&mut self) -> &mut Document {
        &mut self.document
    }
}

/// Persistence for one record type
#[derive(Debug)]
pub struct Store<C: Collection> {
    schema: Rc<Schema>,
    collection_name: String,
    collection: C,
    config: StoreConfig,
}

impl<C: Collection> Store<C> {
    /// Creates a store with the default config.
    ///
    /// Embedded record types cannot be stored on their own.
    pub fn new(
        schema: &Rc<Schema>,
        collection_name: impl Into<String>,
        collection: C,
    ) -> StoreResult<Self> {
        Self::with_config(schema, collection_name, collection, StoreConfig::default())
    }

    pub fn with_config(
        schema: &Rc<Schema>,
        collection_name: impl Into<String>,
        collection: C,
        config: StoreConfig,
    ) -> StoreResult<Self> {
        if schema.is_embedded() {
            return Err(StoreError::NotPersistable(schema.name().to_string()));
        }

        Ok(Self {
            schema: Rc::clone(schema),
            collection_name: collection_name.into(),
            collection,
            config,
        })
    }

    pub fn schema(&self) -> &Rc<Schema> {
        &self.schema
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// A fresh, unsaved document of this store's record type.
    pub fn create(&self) -> SchemaResult<PersistedDocument> {
        Ok(PersistedDocument::new(Document::new(&self.schema)?))
    }

    /// Validates and writes a document.
    ///
    /// Returns `Ok(false)` without writing when the document is invalid; its
    /// `errors()` say why. Otherwise the modified-time field is set (when
    /// declared), and the document is inserted (setting the created-time
    /// field when declared) or, if it already has an id, updated.
    pub fn save(&self, document: &mut PersistedDocument) -> StoreResult<bool> {
        self.check_schema(document)?;

        if !document.valid() {
            let count = document.errors().count().to_string();
            self.log(Event::DocumentRejected, &[("error_count", count.as_str())]);
            return Ok(false);
        }

        let now = Value::DateTime(Utc::now());
        if document.has_field(&self.config.modified_field) {
            document.set(&self.config.modified_field, now.clone())?;
        }

        let timer = Timer::new();
        let (event, id) = match document.id {
            Some(id) => {
                if !self.collection.update(&id, document.data())? {
                    return Err(StoreError::NotFound(id.to_hex()));
                }
                (Event::DocumentUpdate, id)
            }
            None => {
                if document.has_field(&self.config.created_field) {
                    document.set(&self.config.created_field, now)?;
                }
                let id = self.collection.insert(document.data())?;
                document.id = Some(id);
                (Event::DocumentInsert, id)
            }
        };

        let hex = id.to_hex();
        let duration = timer.elapsed_ms();
        self.log(event, &[("duration_ms", duration.as_str()), ("id", hex.as_str())]);
        Ok(true)
    }

    /// Documents matching every key of `filter`, in collection order.
    pub fn find(&self, filter: &Data) -> StoreResult<Vec<PersistedDocument>> {
        let timer = Timer::new();
        let found = self.collection.find(filter)?;

        let documents = found
            .into_iter()
            .map(|(id, data)| self.hydrate(id, &data))
            .collect::<StoreResult<Vec<_>>>()?;

        let count = documents.len().to_string();
        let duration = timer.elapsed_ms();
        self.log(
            Event::DocumentFind,
            &[("duration_ms", duration.as_str()), ("found", count.as_str())],
        );
        Ok(documents)
    }

    pub fn find_all(&self) -> StoreResult<Vec<PersistedDocument>> {
        self.find(&Data::new())
    }

    pub fn find_one(&self, id: &ObjectId) -> StoreResult<Option<PersistedDocument>> {
        let timer = Timer::new();
        let found = self.collection.find_one(id)?;

        let hex = id.to_hex();
        let count = if found.is_some() { "1" } else { "0" };
        let duration = timer.elapsed_ms();
        self.log(
            Event::DocumentFind,
            &[("duration_ms", duration.as_str()), ("found", count), ("id", hex.as_str())],
        );

        found.map(|data| self.hydrate(*id, &data)).transpose()
    }

    /// Like `find_one`, from the 24-hex-digit text form of the id.
    pub fn find_by_id(&self, id: &str) -> StoreResult<Option<PersistedDocument>> {
        let id = ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))?;
        self.find_one(&id)
    }

    /// Removes a saved document. Returns false if it was never saved or is
    /// already gone.
    pub fn delete(&self, document: &PersistedDocument) -> StoreResult<bool> {
        self.check_schema(document)?;
        let Some(id) = document.id else {
            return Ok(false);
        };

        let timer = Timer::new();
        let removed = self.collection.remove(&id)?;

        let hex = id.to_hex();
        let duration = timer.elapsed_ms();
        self.log(Event::DocumentDelete, &[("duration_ms", duration.as_str()), ("id", hex.as_str())]);
        Ok(removed)
    }

    fn hydrate(&self, id: ObjectId, data: &Data) -> StoreResult<PersistedDocument> {
        let document = Document::from_data(&self.schema, data)?;
        Ok(PersistedDocument {
            document,
            id: Some(id),
        })
    }

    fn check_schema(&self, document: &PersistedDocument) -> StoreResult<()> {
        if document.schema().is_a(&self.schema) {
            Ok(())
        } else {
            Err(StoreError::SchemaMismatch {
                expected: self.schema.name().to_string(),
                found: document.schema().name().to_string(),
            })
        }
    }

    fn log(&self, event: Event, fields: &[(&str, &str)]) {
        if !self.config.log_operations {
            return;
        }
        let mut all_fields = vec![
            ("collection", self.collection_name.as_str()),
            ("schema", self.schema.name()),
        ];
        all_fields.extend(fields.iter().copied());
        event.log(&all_fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{DateTimeField, IntegerField, StringField};
    use crate::persist::MemoryCollection;

    fn user_schema() -> Rc<Schema> {
        Schema::document("User")
            .field(StringField::new("name").required())
            .field(IntegerField::new("age"))
            .field(DateTimeField::new("created_at"))
            .field(DateTimeField::new("last_modified_at"))
            .build()
    }

    fn store() -> Store<MemoryCollection> {
        Store::with_config(&user_schema(), "users", MemoryCollection::new(), StoreConfig::quiet())
            .unwrap()
    }

    #[test]
    fn test_invalid_document_is_not_written() {
        let store = store();
        let mut user = store.create().unwrap();

        assert!(!store.save(&mut user).unwrap());
        assert!(user.is_new());
        assert!(store.collection().is_empty());
        assert_eq!(user.errors().count(), 1);
    }

    #[test]
    fn test_insert_sets_id_and_timestamps() {
        let store = store();
        let mut user = store.create().unwrap();
        user.set("name", "Alice").unwrap();

        assert!(store.save(&mut user).unwrap());
        assert!(!user.is_new());
        assert!(user.get("created_at").unwrap().as_datetime().is_some());
        assert!(user.get("last_modified_at").unwrap().as_datetime().is_some());
        assert_eq!(store.collection().len(), 1);
    }

    #[test]
    fn test_update_keeps_id_and_created_at() {
        let store = store();
        let mut user = store.create().unwrap();
        user.set("name", "Alice").unwrap();
        store.save(&mut user).unwrap();
        let id = user.id();
        let created = user.get("created_at").cloned();

        user.set("age", 31).unwrap();
        assert!(store.save(&mut user).unwrap());

        assert_eq!(user.id(), id);
        assert_eq!(user.get("created_at").cloned(), created);
        assert_eq!(store.collection().len(), 1);

        let found = store.find_one(&id.unwrap()).unwrap().unwrap();
        assert_eq!(found.get("age"), Some(&Value::Int(31)));
    }

    #[test]
    fn test_embedded_schema_cannot_be_stored() {
        let address = Schema::embedded("Address").build();
        let err = Store::new(&address, "addresses", MemoryCollection::new()).unwrap_err();
        assert!(matches!(err, StoreError::NotPersistable(_)));
    }

    #[test]
    fn test_find_by_id_rejects_bad_ids() {
        let store = store();
        assert!(matches!(
            store.find_by_id("not-an-id"),
            Err(StoreError::InvalidId(_))
        ));
        assert!(store
            .find_by_id("507f1f77bcf86cd799439011")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_delete_unsaved_document() {
        let store = store();
        let user = store.create().unwrap();
        assert!(!store.delete(&user).unwrap());
    }
}
