//! Catalog - the session's product cache, filter and favorites.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use serde_json::json;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::events;
#[cfg(feature = "emitter")]
use super::events::CatalogEvents;
use super::{CatalogError, FavoriteSet, FilterSpec, FilterUpdate, Product, ProductDraft};
use crate::config::MarketConfig;
use crate::document::{DocumentStore, DocumentsExt};
use crate::identity::User;

/// What the presentation layer renders from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    /// Products passing the active filter, in collection order.
    pub products: Vec<Product>,
    pub favorite_ids: Vec<String>,
    /// A store call is in flight.
    pub loading: bool,
    /// Message of the last failed store call, cleared by the next success.
    pub error: Option<String>,
}

#[derive(Default)]
struct CatalogState {
    products: Vec<Product>,
    view: Vec<Product>,
    filter: FilterSpec,
    favorites: FavoriteSet,
    selected: Option<Product>,
    error: Option<String>,
    /// Ticket of the refresh whose result the cache currently holds.
    applied_refresh: u64,
    /// Bumped by every single-record insert.
    revision: u64,
    /// Records inserted at each revision, kept until a refresh issued after
    /// them has been applied.
    inserted: Vec<(u64, Product)>,
}

impl CatalogState {
    fn recompute(&mut self) {
        self.view = self.filter.apply(&self.products);
        debug!(
            total = self.products.len(),
            visible = self.view.len(),
            "catalog view recomputed"
        );
    }

    /// The single path by which individual records enter the cache.
    fn insert(&mut self, product: Product) {
        self.revision += 1;
        self.inserted.push((self.revision, product.clone()));
        self.upsert(product);
        self.recompute();
    }

    fn upsert(&mut self, product: Product) {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => self.products.push(product),
        }
    }

    /// Replace the cache with a listing taken when the cache was at
    /// revision `since`. Records inserted after that are laid back on top.
    fn replace_all(&mut self, listing: Vec<Product>, since: u64) {
        self.products = listing;
        self.inserted.retain(|(revision, _)| *revision > since);

        let newer: Vec<Product> = self.inserted.iter().map(|(_, p)| p.clone()).collect();
        if !newer.is_empty() {
            debug!(count = newer.len(), "re-applying products inserted during refresh");
        }
        for product in newer {
            self.upsert(product);
        }
        self.recompute();
    }

    fn cached(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

/// Session catalog service.
///
/// Construct one per session and share it by `Arc`; every handle observes
/// the same cache, filter and favorites. Dropping the last handle ends the
/// session and closes all `subscribe` receivers.
pub struct Catalog<S> {
    store: S,
    config: MarketConfig,
    state: RwLock<CatalogState>,
    refresh_tickets: AtomicU64,
    in_flight: AtomicUsize,
    updates: watch::Sender<CatalogSnapshot>,
    #[cfg(feature = "emitter")]
    events: CatalogEvents,
}

/// Marks a store call in flight for as long as it lives.
struct RemoteCall<'a, S> {
    catalog: &'a Catalog<S>,
}

impl<'a, S> RemoteCall<'a, S> {
    fn begin(catalog: &'a Catalog<S>) -> Self {
        catalog.in_flight.fetch_add(1, Ordering::SeqCst);
        catalog.publish();
        Self { catalog }
    }
}

impl<S> Drop for RemoteCall<'_, S> {
    fn drop(&mut self) {
        self.catalog.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.catalog.publish();
    }
}

impl<S> Catalog<S> {
    /// Create an empty catalog over `store` with default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, MarketConfig::default())
    }

    pub fn with_config(store: S, config: MarketConfig) -> Self {
        let (updates, _) = watch::channel(CatalogSnapshot::default());
        Self {
            store,
            config,
            state: RwLock::new(CatalogState::default()),
            refresh_tickets: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            updates,
            #[cfg(feature = "emitter")]
            events: CatalogEvents::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Receiver that always holds the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.updates.subscribe()
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        let state = self.read_state();
        CatalogSnapshot {
            products: state.view.clone(),
            favorite_ids: state.favorites.ids().to_vec(),
            loading: self.is_loading(),
            error: state.error.clone(),
        }
    }

    /// Products passing the active filter.
    pub fn products(&self) -> Vec<Product> {
        self.read_state().view.clone()
    }

    /// Every cached product, unfiltered.
    pub fn all_products(&self) -> Vec<Product> {
        self.read_state().products.clone()
    }

    /// Cached product by id, without touching the store.
    pub fn cached(&self, id: &str) -> Option<Product> {
        self.read_state().cached(id).cloned()
    }

    /// The product last returned by `get_by_id`.
    pub fn selected(&self) -> Option<Product> {
        self.read_state().selected.clone()
    }

    pub fn filter(&self) -> FilterSpec {
        self.read_state().filter.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn error(&self) -> Option<String> {
        self.read_state().error.clone()
    }

    /// Merge `update` into the filter and recompute the view.
    pub fn update_filter(&self, update: FilterUpdate) {
        let filter = {
            let mut state = self.write_state();
            state.filter.merge(update);
            state.recompute();
            state.filter.clone()
        };
        self.publish();
        self.announce(events::FILTER_UPDATED, &filter);
    }

    /// Reset the filter to its all-permissive default.
    pub fn clear_filters(&self) {
        {
            let mut state = self.write_state();
            state.filter = FilterSpec::default();
            state.recompute();
        }
        self.publish();
        self.announce(events::FILTER_UPDATED, &FilterSpec::default());
    }

    /// Flip favorite status of `id`. Returns whether it is now a favorite.
    pub fn toggle_favorite(&self, id: &str) -> bool {
        let favorite = self.write_state().favorites.toggle(id);
        self.publish();
        self.announce(events::FAVORITE_TOGGLED, &json!({ "id": id, "favorite": favorite }));
        favorite
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.read_state().favorites.contains(id)
    }

    pub fn favorite_ids(&self) -> Vec<String> {
        self.read_state().favorites.ids().to_vec()
    }

    /// Cached favorites in collection order, regardless of the filter.
    pub fn favorite_products(&self) -> Vec<Product> {
        let state = self.read_state();
        state
            .products
            .iter()
            .filter(|p| state.favorites.contains(&p.id))
            .cloned()
            .collect()
    }

    /// Image to show for `product`: its own primary image, else the placeholder.
    pub fn image_for<'a>(&'a self, product: &'a Product) -> &'a str {
        product
            .primary_image()
            .unwrap_or(&self.config.placeholder_image)
    }

    /// Register a listener for one of the names in [`events`].
    #[cfg(feature = "emitter")]
    pub fn on<F>(&self, event: &str, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.events.on(event, listener);
    }

    fn announce<T: Serialize>(&self, event: &str, payload: &T) {
        #[cfg(feature = "emitter")]
        self.events.emit(event, payload);
        #[cfg(not(feature = "emitter"))]
        let _ = (event, payload);
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }

    fn fail(&self, err: &CatalogError) {
        self.write_state().error = Some(err.to_string());
    }

    // Writes replace whole fields, so a poisoned guard still holds consistent state.
    fn read_state(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: DocumentStore> Catalog<S> {
    /// Start a session: build the catalog and load the collection once.
    ///
    /// A failed initial load leaves an empty catalog with the error flag set.
    pub async fn open(store: S, config: MarketConfig) -> Arc<Self> {
        let catalog = Arc::new(Self::with_config(store, config));
        if let Err(err) = catalog.refresh().await {
            warn!(error = %err, "initial catalog load failed");
        }
        catalog
    }

    /// Replace the cache with the store's whole collection.
    ///
    /// On failure the previous cache is kept and the error flag set. When
    /// refreshes overlap, a result older than the one already applied is
    /// discarded. Products inserted after the refresh was issued survive it.
    pub async fn refresh(&self) -> Result<(), CatalogError> {
        let ticket = self.refresh_tickets.fetch_add(1, Ordering::SeqCst) + 1;
        let since = self.read_state().revision;
        let _call = RemoteCall::begin(self);

        let result = self.store.documents::<Product>().list_all().await;

        let mut state = self.write_state();
        if ticket < state.applied_refresh {
            debug!(ticket, applied = state.applied_refresh, "discarding stale refresh");
            return result.map(|_| ()).map_err(CatalogError::from);
        }

        match result {
            Ok(products) => {
                state.applied_refresh = ticket;
                state.error = None;
                state.replace_all(products, since);
                let count = state.products.len();
                drop(state);

                info!(count, "catalog refreshed");
                self.announce(events::CATALOG_REFRESHED, &json!({ "count": count }));
                Ok(())
            }
            Err(err) => {
                drop(state);
                let err = CatalogError::from(err);
                warn!(error = %err, "catalog refresh failed, keeping cached products");
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Product by id: from the cache, else fetched from the store.
    ///
    /// A fetched product is added to the cache. The result becomes the
    /// selected product.
    pub async fn get_by_id(&self, id: &str) -> Result<Product, CatalogError> {
        let product = self.lookup(id).await?;
        self.write_state().selected = Some(product.clone());
        Ok(product)
    }

    /// Publish a product. The stored record joins the cache.
    pub async fn add(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        let draft = draft.normalized().map_err(|err| {
            warn!(error = %err, "rejected product draft");
            err
        })?;

        let _call = RemoteCall::begin(self);
        match self.store.documents::<Product>().create(&draft).await {
            Ok(product) => {
                {
                    let mut state = self.write_state();
                    state.error = None;
                    state.insert(product.clone());
                }
                info!(id = %product.id, name = %product.name, "product added");
                self.announce(events::PRODUCT_ADDED, &product);
                Ok(product)
            }
            Err(err) => {
                let err = CatalogError::from(err);
                warn!(error = %err, "failed to add product");
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Delete a product the signed-in user is selling, then refresh.
    pub async fn delete(&self, id: &str, user: Option<&User>) -> Result<(), CatalogError> {
        let user = user.ok_or(CatalogError::SignInRequired)?;
        let product = self.lookup(id).await?;
        if !product.is_owned_by(user) {
            warn!(id, user_id = %user.id, "refusing to delete another seller's product");
            return Err(CatalogError::NotOwner { id: id.to_string() });
        }

        let existed = {
            let _call = RemoteCall::begin(self);
            match self.store.documents::<Product>().delete(id).await {
                Ok(existed) => existed,
                Err(err) => {
                    let err = CatalogError::from(err);
                    warn!(id, error = %err, "failed to delete product");
                    self.fail(&err);
                    return Err(err);
                }
            }
        };
        if existed {
            info!(id, "product deleted");
            self.announce(events::PRODUCT_DELETED, &json!({ "id": id }));
        } else {
            debug!(id, "product already gone from the store");
        }

        self.refresh().await
    }

    async fn lookup(&self, id: &str) -> Result<Product, CatalogError> {
        if let Some(product) = self.cached(id) {
            return Ok(product);
        }

        let _call = RemoteCall::begin(self);
        let fetched = self.store.documents::<Product>().get(id).await;
        match fetched {
            Ok(Some(product)) => {
                {
                    let mut state = self.write_state();
                    state.error = None;
                    state.insert(product.clone());
                }
                debug!(id, "cached product fetched by id");
                Ok(product)
            }
            Ok(None) => {
                let err = CatalogError::NotFound(id.to_string());
                warn!(id, "product not found");
                self.fail(&err);
                Err(err)
            }
            Err(err) => {
                let err = CatalogError::from(err);
                warn!(id, error = %err, "failed to fetch product");
                self.fail(&err);
                Err(err)
            }
        }
    }
}
