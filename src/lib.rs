// Lets `#[derive(Document)]` expand to `campus_market::Document` inside this crate too.
extern crate self as campus_market;

pub mod catalog;
mod comments;
mod config;
pub mod document;
pub mod identity;
mod orders;

pub use catalog::{
    Catalog, CatalogError, CatalogSnapshot, FavoriteSet, FilterSpec, FilterUpdate, Price,
    PriceRange, Product, ProductDraft,
};
pub use comments::{Comment, CommentBoard, CommentError};
pub use config::MarketConfig;
pub use document::{
    Document, DocumentRepository, DocumentStore, DocumentsExt, InMemoryDocumentStore, StoreError,
};
pub use identity::{
    AuthListener, AuthProvider, IdentityError, IdentityProvider, InMemoryIdentity, Subscription,
    User,
};
pub use orders::{Order, OrderBook, OrderDraft};

// Derive macro for `Document`
pub use campus_market_macros::Document;

#[cfg(feature = "emitter")]
pub use catalog::CatalogEvents;
// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
