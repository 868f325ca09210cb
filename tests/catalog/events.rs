//! Named catalog events delivered through the emitter.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use campus_market::catalog::events;
use campus_market::{
    Catalog, DocumentsExt, FilterUpdate, InMemoryDocumentStore, Product, ProductDraft,
};
use serde_json::{json, Value};

use crate::support::{ana, scenario_store};

type Inbox = Arc<Mutex<Vec<(&'static str, Value)>>>;

fn listen(catalog: &Catalog<InMemoryDocumentStore>, inbox: &Inbox, event: &'static str) {
    let inbox = Arc::clone(inbox);
    catalog.on(event, move |payload: String| {
        let value = serde_json::from_str(&payload).unwrap();
        inbox.lock().unwrap().push((event, value));
    });
}

fn received(inbox: &Inbox, event: &str) -> Vec<Value> {
    inbox
        .lock()
        .unwrap()
        .iter()
        .filter(|(name, _)| *name == event)
        .map(|(_, value)| value.clone())
        .collect()
}

#[tokio::test]
async fn catalog_changes_are_announced() {
    let catalog = Catalog::new(scenario_store());
    let inbox: Inbox = Arc::new(Mutex::new(Vec::new()));
    for event in [
        events::CATALOG_REFRESHED,
        events::PRODUCT_ADDED,
        events::FAVORITE_TOGGLED,
        events::FILTER_UPDATED,
    ] {
        listen(&catalog, &inbox, event);
    }

    catalog.refresh().await.unwrap();
    catalog
        .add(ProductDraft::new("Notebook", "15000", "ana@campus.edu"))
        .await
        .unwrap();
    catalog.toggle_favorite("2");
    catalog.update_filter(FilterUpdate::new().search("lamp"));

    // Listeners run on the emitter's threads.
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(received(&inbox, events::CATALOG_REFRESHED), [json!({ "count": 2 })]);

    let added = received(&inbox, events::PRODUCT_ADDED);
    assert_eq!(added.len(), 1);
    assert_eq!(added[0]["id"], "3");
    assert_eq!(added[0]["price"], json!(15000.0));

    assert_eq!(
        received(&inbox, events::FAVORITE_TOGGLED),
        [json!({ "id": "2", "favorite": true })]
    );

    let filters = received(&inbox, events::FILTER_UPDATED);
    assert_eq!(filters.len(), 1);
    assert_eq!(filters[0]["searchTerm"], "lamp");
}

#[tokio::test]
async fn deletion_is_announced() {
    let catalog = Catalog::new(scenario_store());
    catalog.refresh().await.unwrap();

    let inbox: Inbox = Arc::new(Mutex::new(Vec::new()));
    listen(&catalog, &inbox, events::PRODUCT_DELETED);
    listen(&catalog, &inbox, events::CATALOG_REFRESHED);

    catalog.delete("1", Some(&ana())).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(received(&inbox, events::PRODUCT_DELETED), [json!({ "id": "1" })]);
    assert_eq!(received(&inbox, events::CATALOG_REFRESHED), [json!({ "count": 1 })]);
}

#[tokio::test]
async fn vanished_product_is_not_announced() {
    let store = scenario_store();
    let catalog = Catalog::new(store.clone());
    catalog.refresh().await.unwrap();

    let inbox: Inbox = Arc::new(Mutex::new(Vec::new()));
    listen(&catalog, &inbox, events::PRODUCT_DELETED);
    listen(&catalog, &inbox, events::CATALOG_REFRESHED);

    store.documents::<Product>().delete("1").await.unwrap();
    catalog.delete("1", Some(&ana())).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(received(&inbox, events::PRODUCT_DELETED).is_empty());
    assert_eq!(received(&inbox, events::CATALOG_REFRESHED), [json!({ "count": 1 })]);
}
