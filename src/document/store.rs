//! DocumentStore - Abstract access to the remote document database.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use super::{Document, StoreError};

/// Abstract storage for documents, keyed by collection name.
///
/// Every call is a remote round trip. Implementations report transport and
/// backend failures as `StoreError::Unavailable`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List every document of the collection, in insertion order.
    async fn list_all<D: Document>(&self) -> Result<Vec<D>, StoreError>;

    /// Get a document by ID. Returns None if the collection has no such record.
    async fn get_one<D: Document>(&self, id: &str) -> Result<Option<D>, StoreError>;

    /// Create a document from its fields. The store assigns `id` and
    /// `createdAt` and returns the stored document.
    async fn create_one<D, F>(&self, fields: &F) -> Result<D, StoreError>
    where
        D: Document,
        F: Serialize + Sync;

    /// Delete a document by ID. Returns true if it existed.
    async fn delete_one<D: Document>(&self, id: &str) -> Result<bool, StoreError>;
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for Arc<S> {
    async fn list_all<D: Document>(&self) -> Result<Vec<D>, StoreError> {
        self.as_ref().list_all::<D>().await
    }

    async fn get_one<D: Document>(&self, id: &str) -> Result<Option<D>, StoreError> {
        self.as_ref().get_one::<D>(id).await
    }

    async fn create_one<D, F>(&self, fields: &F) -> Result<D, StoreError>
    where
        D: Document,
        F: Serialize + Sync,
    {
        self.as_ref().create_one::<D, F>(fields).await
    }

    async fn delete_one<D: Document>(&self, id: &str) -> Result<bool, StoreError> {
        self.as_ref().delete_one::<D>(id).await
    }
}
