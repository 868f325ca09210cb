//! Documents - Typed records held by the remote document store.
//!
//! A document belongs to a named collection (`products`, `orders`,
//! `comments`). The store assigns every document its `id` and `createdAt`
//! on creation; callers submit only the remaining fields.
//!
//! ## Example
//!
//! ```ignore
//! use campus_market::{Document, DocumentsExt, InMemoryDocumentStore};
//!
//! #[derive(Serialize, Deserialize, Clone, Document)]
//! #[document(collection = "products")]
//! struct Product {
//!     pub id: String,
//!     pub name: String,
//!     pub created_at: DateTime<Utc>,
//! }
//!
//! let store = InMemoryDocumentStore::new();
//! let created: Product = store.documents::<Product>().create(&draft).await?;
//! let all = store.documents::<Product>().list_all().await?;
//! ```

mod in_memory;
mod repository;
mod store;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Field under which the store exposes the assigned identifier.
pub const ID_FIELD: &str = "id";

/// Field under which the store exposes the assigned creation timestamp.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Trait for types that live in a document store collection.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection name for this document type (e.g., "products", "orders").
    const COLLECTION: &'static str;

    /// Returns the store-assigned identifier of this document.
    fn id(&self) -> &str;
}

/// Error type for document store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The remote call failed or was rejected.
    #[error("document store unavailable: {0}")]
    Unavailable(String),
    /// A record could not be encoded or decoded.
    #[error("document serialization error: {0}")]
    Serde(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

pub use in_memory::InMemoryDocumentStore;
pub use repository::{DocumentRepository, DocumentsExt};
pub use store::DocumentStore;
