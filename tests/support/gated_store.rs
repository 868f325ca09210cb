//! Document store whose listings resolve only when the test says so.
//!
//! `list_all` reads the wrapped store immediately, then parks until the next
//! gate handed out by `hold()` is released. Calls beyond the held gates
//! resolve straight away. Each call reports on the `entered` channel once
//! it has read the store.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use campus_market::{Document, DocumentStore, InMemoryDocumentStore, StoreError};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

pub struct GatedStore {
    inner: InMemoryDocumentStore,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    entered: mpsc::UnboundedSender<()>,
}

impl GatedStore {
    pub fn new(inner: InMemoryDocumentStore) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (entered, rx) = mpsc::unbounded_channel();
        let store = Self {
            inner,
            gates: Mutex::new(VecDeque::new()),
            entered,
        };
        (store, rx)
    }

    pub fn inner(&self) -> &InMemoryDocumentStore {
        &self.inner
    }

    /// Park the next unheld `list_all` call until the returned sender fires.
    pub fn hold(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }
}

#[async_trait]
impl DocumentStore for GatedStore {
    async fn list_all<D: Document>(&self) -> Result<Vec<D>, StoreError> {
        let result = self.inner.list_all::<D>().await;
        let gate = self.gates.lock().unwrap().pop_front();
        let _ = self.entered.send(());
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }

    async fn get_one<D: Document>(&self, id: &str) -> Result<Option<D>, StoreError> {
        self.inner.get_one::<D>(id).await
    }

    async fn create_one<D, F>(&self, fields: &F) -> Result<D, StoreError>
    where
        D: Document,
        F: Serialize + Sync,
    {
        self.inner.create_one::<D, F>(fields).await
    }

    async fn delete_one<D: Document>(&self, id: &str) -> Result<bool, StoreError> {
        self.inner.delete_one::<D>(id).await
    }
}
