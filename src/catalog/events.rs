//! Named catalog change events.
//!
//! With the `emitter` feature, the catalog announces every change it makes
//! through an `EventEmitter`. Payloads are JSON strings; listeners run on
//! the emitter's own threads, after the change is visible in the snapshot.

#[cfg(feature = "emitter")]
use std::sync::{Mutex, PoisonError};

#[cfg(feature = "emitter")]
use event_emitter_rs::EventEmitter;
#[cfg(feature = "emitter")]
use serde::Serialize;
#[cfg(feature = "emitter")]
use tracing::warn;

/// Payload `{ "count": n }`: the cache was replaced by a refresh.
pub const CATALOG_REFRESHED: &str = "catalog.refreshed";
/// Payload: the product as stored.
pub const PRODUCT_ADDED: &str = "product.added";
/// Payload `{ "id": id }`.
pub const PRODUCT_DELETED: &str = "product.deleted";
/// Payload `{ "id": id, "favorite": bool }`.
pub const FAVORITE_TOGGLED: &str = "favorite.toggled";
/// Payload: the filter now in effect.
pub const FILTER_UPDATED: &str = "filter.updated";

/// Emitter wrapper shared by every handle to a catalog.
#[cfg(feature = "emitter")]
pub struct CatalogEvents {
    emitter: Mutex<EventEmitter>,
}

#[cfg(feature = "emitter")]
impl Default for CatalogEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "emitter")]
impl CatalogEvents {
    pub fn new() -> Self {
        Self {
            emitter: Mutex::new(EventEmitter::new()),
        }
    }

    /// Register a listener for an event name.
    pub fn on<F>(&self, event: &str, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.emitter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on(event, listener);
    }

    /// Serialize `payload` to JSON and emit it.
    pub fn emit<T: Serialize>(&self, event: &str, payload: &T) {
        let data = match serde_json::to_string(payload) {
            Ok(data) => data,
            Err(err) => {
                warn!(event, error = %err, "dropping catalog event with unencodable payload");
                return;
            }
        };
        self.emitter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .emit(event, data);
    }
}
