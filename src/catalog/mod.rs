//! Catalog - cached product collection, filtered view and favorites.
//!
//! `Catalog` mirrors the remote `products` collection in memory and keeps a
//! derived view of the products that pass the active `FilterSpec`. Filtering
//! is entirely local; the store is only used to refresh the whole
//! collection, fetch one record, publish and delete.
//!
//! ## Example
//!
//! ```ignore
//! use campus_market::{Catalog, FilterUpdate, InMemoryDocumentStore, PriceRange};
//!
//! let catalog = Catalog::open(InMemoryDocumentStore::new(), MarketConfig::default()).await;
//! catalog.update_filter(
//!     FilterUpdate::new()
//!         .tags(["libros"])
//!         .price_range(PriceRange::new(0.0, 30000.0)),
//! );
//!
//! let mut updates = catalog.subscribe();
//! updates.changed().await?;
//! render(&updates.borrow().products);
//! ```

pub mod events;
mod favorites;
mod filter;
mod product;
mod service;

use thiserror::Error;

use crate::document::StoreError;

pub use favorites::FavoriteSet;
pub use filter::{FilterSpec, FilterUpdate, PriceRange};
pub use product::{Price, Product, ProductDraft};
pub use service::{Catalog, CatalogSnapshot};

#[cfg(feature = "emitter")]
pub use events::CatalogEvents;

/// Error type for catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The store call failed; the cached state is unchanged.
    #[error("catalog store unavailable: {0}")]
    StoreUnavailable(String),
    /// A stored product could not be decoded; the cached state is unchanged.
    #[error("undecodable product record: {0}")]
    Decode(String),
    /// No product with this id exists.
    #[error("product not found: {0}")]
    NotFound(String),
    /// The draft price does not coerce to a non-negative number.
    #[error("invalid price: {0}")]
    InvalidPrice(String),
    /// Only the seller may delete a product.
    #[error("product {id} does not belong to the current user")]
    NotOwner { id: String },
    /// The operation needs a signed-in user.
    #[error("sign in required")]
    SignInRequired,
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(message) => CatalogError::StoreUnavailable(message),
            StoreError::Serde(message) => CatalogError::Decode(message),
        }
    }
}
