//! DocumentRepository - Typed accessor for one collection of a store.

use std::marker::PhantomData;

use serde::Serialize;

use super::{Document, DocumentStore, StoreError};

/// Typed repository wrapper for accessing documents of a specific type.
pub struct DocumentRepository<'a, S, D> {
    store: &'a S,
    _marker: PhantomData<D>,
}

impl<'a, S: DocumentStore, D: Document> DocumentRepository<'a, S, D> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// List every document of the collection.
    pub async fn list_all(&self) -> Result<Vec<D>, StoreError> {
        self.store.list_all::<D>().await
    }

    /// Get a document by ID.
    pub async fn get(&self, id: &str) -> Result<Option<D>, StoreError> {
        self.store.get_one::<D>(id).await
    }

    /// Create a document from its fields.
    pub async fn create<F: Serialize + Sync>(&self, fields: &F) -> Result<D, StoreError> {
        self.store.create_one::<D, F>(fields).await
    }

    /// Delete a document by ID. Returns true if it existed.
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.store.delete_one::<D>(id).await
    }
}

/// Extension trait for typed document access on any DocumentStore.
pub trait DocumentsExt: DocumentStore + Sized {
    /// Get a typed document repository.
    fn documents<D: Document>(&self) -> DocumentRepository<'_, Self, D> {
        DocumentRepository::new(self)
    }
}

impl<S: DocumentStore> DocumentsExt for S {}
