//! # Collections
//!
//! A collection stores flat document data under an `ObjectId`. Queries are
//! equality filters over top-level keys; there is no query language. The
//! reserved key `_id` in a filter matches the document id.

use std::sync::RwLock;

use serde_json::Value as Json;

use super::errors::{StoreError, StoreResult};
use crate::document::{Data, ObjectId, Value};

/// Key that matches the document id in a filter
pub const ID_KEY: &str = "_id";

/// Trait for document collections
pub trait Collection: Send + Sync + std::fmt::Debug {
    /// Insert new data and return its generated id
    fn insert(&self, data: Data) -> StoreResult<ObjectId>;

    /// Set every key in `data` on the stored document. Returns false if no
    /// document has this id.
    fn update(&self, id: &ObjectId, data: Data) -> StoreResult<bool>;

    /// All documents matching every key of `filter`, in insertion order
    fn find(&self, filter: &Data) -> StoreResult<Vec<(ObjectId, Data)>>;

    /// Data stored under `id`
    fn find_one(&self, id: &ObjectId) -> StoreResult<Option<Data>>;

    /// Remove a document. Returns false if no document has this id.
    fn remove(&self, id: &ObjectId) -> StoreResult<bool>;
}

/// True when `data` stored under `id` matches every key of `filter`.
pub fn matches(filter: &Data, id: &ObjectId, data: &Data) -> bool {
    filter.iter().all(|(key, expected)| {
        if key == ID_KEY {
            *expected == Value::ObjectId(*id).to_json()
        } else {
            data.get(key).unwrap_or(&Json::Null) == expected
        }
    })
}

/// In-memory collection, insertion ordered
#[derive(Debug, Default)]
pub struct MemoryCollection {
    documents: RwLock<Vec<(ObjectId, Data)>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.read().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned<T>(_: T) -> StoreError {
        StoreError::Internal("Lock poisoned".to_string())
    }
}

impl Collection for MemoryCollection {
    fn insert(&self, data: Data) -> StoreResult<ObjectId> {
        let id = ObjectId::new();
        let mut documents = self.documents.write().map_err(Self::poisoned)?;
        documents.push((id, data));
        Ok(id)
    }

    fn update(&self, id: &ObjectId, data: Data) -> StoreResult<bool> {
        let mut documents = self.documents.write().map_err(Self::poisoned)?;
        match documents.iter_mut().find(|(stored, _)| stored == id) {
            Some((_, stored)) => {
                for (key, value) in data {
                    stored.insert(key, value);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn find(&self, filter: &Data) -> StoreResult<Vec<(ObjectId, Data)>> {
        let documents = self.documents.read().map_err(Self::poisoned)?;
        Ok(documents
            .iter()
            .filter(|(id, data)| matches(filter, id, data))
            .cloned()
            .collect())
    }

    fn find_one(&self, id: &ObjectId) -> StoreResult<Option<Data>> {
        let documents = self.documents.read().map_err(Self::poisoned)?;
        Ok(documents
            .iter()
            .find(|(stored, _)| stored == id)
            .map(|(_, data)| data.clone()))
    }

    fn remove(&self, id: &ObjectId) -> StoreResult<bool> {
        let mut documents = self.documents.write().map_err(Self::poisoned)?;
        let before = documents.len();
        documents.retain(|(stored, _)| stored != id);
        Ok(documents.len() < before)
    }
}
