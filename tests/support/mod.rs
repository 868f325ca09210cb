//! Shared fixtures for the integration suites.

#![allow(dead_code)]

pub mod gated_store;

use campus_market::{InMemoryDocumentStore, Product, User};
use serde_json::json;

/// Store holding the two-product collection used by the filter scenarios.
pub fn scenario_store() -> InMemoryDocumentStore {
    let store = InMemoryDocumentStore::new();
    store
        .seed(
            "products",
            "1",
            json!({
                "name": "Calculus Textbook",
                "description": "",
                "price": 20000,
                "tags": ["libros"],
                "seller": "ana@campus.edu",
            }),
        )
        .unwrap();
    store
        .seed(
            "products",
            "2",
            json!({
                "name": "Desk Lamp",
                "description": "",
                "price": 45000,
                "tags": ["electronica"],
                "seller": "bo@campus.edu",
            }),
        )
        .unwrap();
    store
}

/// The seller of product "1".
pub fn ana() -> User {
    User::new("uid-ana")
        .with_email("ana@campus.edu")
        .with_display_name("Ana")
}

/// The seller of product "2".
pub fn bo() -> User {
    User::new("uid-bo").with_email("bo@campus.edu")
}

pub fn ids(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.id.as_str()).collect()
}

/// Install a test subscriber once; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
