//! InMemoryDocumentStore - HashMap-backed document store for testing and development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::{Document, DocumentStore, StoreError, CREATED_AT_FIELD, ID_FIELD};

/// Internal stored representation of a document.
struct StoredDocument {
    id: String,
    created_at: DateTime<Utc>,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct Collections {
    by_name: HashMap<String, Vec<StoredDocument>>,
    last_created: Option<DateTime<Utc>>,
}

impl Collections {
    /// Creation timestamps strictly increase, even if the wall clock does not.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_created {
            Some(last) if last >= now => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created = Some(stamp);
        stamp
    }

    /// Lowest positive integer id not yet used in the collection.
    fn next_id(&self, collection: &str) -> String {
        let docs = self.by_name.get(collection);
        let taken = |candidate: &str| docs.is_some_and(|d| d.iter().any(|s| s.id == candidate));
        let mut n = docs.map_or(0, Vec::len) + 1;
        loop {
            let candidate = n.to_string();
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// In-memory document store. Collections keep insertion order.
///
/// Clone-friendly via Arc; clones share the same storage. The store can be
/// switched offline to exercise failure paths.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    storage: Arc<RwLock<Collections>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryDocumentStore {
    /// Create a new empty document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreError::Unavailable` (or succeed again).
    pub fn set_available(&self, available: bool) {
        self.offline.store(!available, Ordering::SeqCst);
    }

    /// Insert a raw record under an explicit id, bypassing id assignment.
    ///
    /// Used to load fixtures and legacy records whose fields may not match
    /// the current document types.
    pub fn seed(
        &self,
        collection: &str,
        id: impl Into<String>,
        fields: Value,
    ) -> Result<(), StoreError> {
        let fields = into_fields(fields)?;
        let bytes = serde_json::to_vec(&fields)?;
        let mut storage = self.write()?;
        let created_at = storage.next_timestamp();
        storage
            .by_name
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument {
                id: id.into(),
                created_at,
                bytes,
            });
        Ok(())
    }

    /// Number of records held in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.storage
            .read()
            .map(|s| s.by_name.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store offline".into()));
        }
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Collections>, StoreError> {
        self.storage
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Collections>, StoreError> {
        self.storage
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }
}

fn into_fields(value: Value) -> Result<Map<String, Value>, StoreError> {
    match value {
        Value::Object(mut fields) => {
            fields.remove(ID_FIELD);
            fields.remove(CREATED_AT_FIELD);
            Ok(fields)
        }
        other => Err(StoreError::Serde(format!(
            "document fields must be a JSON object, got {}",
            other
        ))),
    }
}

fn hydrate<D: Document>(stored: &StoredDocument) -> Result<D, StoreError> {
    let mut fields: Map<String, Value> = serde_json::from_slice(&stored.bytes)?;
    fields.insert(ID_FIELD.to_string(), Value::String(stored.id.clone()));
    fields.insert(
        CREATED_AT_FIELD.to_string(),
        serde_json::to_value(stored.created_at)?,
    );
    Ok(serde_json::from_value(Value::Object(fields))?)
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list_all<D: Document>(&self) -> Result<Vec<D>, StoreError> {
        self.check_available()?;
        let storage = self.read()?;

        storage
            .by_name
            .get(D::COLLECTION)
            .map(|docs| docs.iter().map(hydrate::<D>).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn get_one<D: Document>(&self, id: &str) -> Result<Option<D>, StoreError> {
        self.check_available()?;
        let storage = self.read()?;

        storage
            .by_name
            .get(D::COLLECTION)
            .and_then(|docs| docs.iter().find(|s| s.id == id))
            .map(hydrate::<D>)
            .transpose()
    }

    async fn create_one<D, F>(&self, fields: &F) -> Result<D, StoreError>
    where
        D: Document,
        F: Serialize + Sync,
    {
        self.check_available()?;
        let fields = into_fields(serde_json::to_value(fields)?)?;
        let bytes = serde_json::to_vec(&fields)?;

        let mut storage = self.write()?;
        let id = storage.next_id(D::COLLECTION);
        let created_at = storage.next_timestamp();
        let stored = StoredDocument {
            id,
            created_at,
            bytes,
        };
        // Decode before committing so a shape mismatch leaves the store untouched.
        let document = hydrate::<D>(&stored)?;

        storage
            .by_name
            .entry(D::COLLECTION.to_string())
            .or_default()
            .push(stored);

        Ok(document)
    }

    async fn delete_one<D: Document>(&self, id: &str) -> Result<bool, StoreError> {
        self.check_available()?;
        let mut storage = self.write()?;

        let Some(docs) = storage.by_name.get_mut(D::COLLECTION) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|s| s.id != id);
        Ok(docs.len() != before)
    }
}
