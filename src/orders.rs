//! Orders - contact-form submissions sent to a seller.
//!
//! ## Example
//!
//! ```ignore
//! let orders = OrderBook::new(store.clone());
//! let order = orders
//!     .place(
//!         &OrderDraft::new("p1", "Ana", "Library, 2nd floor", "555-0101")
//!             .with_message("Still available?"),
//!     )
//!     .await?;
//!
//! for order in orders.list().await? {
//!     println!("{}: {}", orders.product_name(&order, &catalog), order.name);
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::config::MarketConfig;
use crate::document::{DocumentStore, DocumentsExt, StoreError};
use crate::Document;

/// A stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Document)]
#[document(collection = "orders")]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub product_id: String,
    /// Buyer's name.
    pub name: String,
    /// Where the buyer wants to meet.
    pub location: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Order fields as submitted by the buyer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub product_id: String,
    pub name: String,
    pub location: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OrderDraft {
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            location: location.into(),
            phone: phone.into(),
            message: None,
        }
    }

    /// Attach a message. Blank messages are dropped.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.message = (!message.trim().is_empty()).then_some(message);
        self
    }
}

/// Reads and writes the `orders` collection.
pub struct OrderBook<S> {
    store: S,
    config: MarketConfig,
}

impl<S: DocumentStore> OrderBook<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, MarketConfig::default())
    }

    pub fn with_config(store: S, config: MarketConfig) -> Self {
        Self { store, config }
    }

    /// Store a new order.
    pub async fn place(&self, draft: &OrderDraft) -> Result<Order, StoreError> {
        match self.store.documents::<Order>().create(draft).await {
            Ok(order) => {
                info!(id = %order.id, product_id = %order.product_id, "order placed");
                Ok(order)
            }
            Err(err) => {
                warn!(product_id = %draft.product_id, error = %err, "failed to place order");
                Err(err)
            }
        }
    }

    /// Every order, in store order.
    pub async fn list(&self) -> Result<Vec<Order>, StoreError> {
        self.store.documents::<Order>().list_all().await.map_err(|err| {
            warn!(error = %err, "failed to list orders");
            err
        })
    }

    /// Name of the ordered product as the catalog currently caches it.
    pub fn product_name<C>(&self, order: &Order, catalog: &Catalog<C>) -> String {
        catalog
            .cached(&order.product_id)
            .map(|product| product.name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.config.unknown_product.clone())
    }
}
