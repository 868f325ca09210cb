//! Integration tests for the services around the catalog: orders, comments
//! and the signed-in session.

#[path = "../support/mod.rs"]
mod support;

use std::sync::{Arc, Mutex};

use campus_market::{
    Catalog, CommentBoard, CommentError, IdentityProvider, InMemoryIdentity, MarketConfig,
    OrderBook, OrderDraft, User,
};
use support::{ana, bo, init_tracing, scenario_store};

#[tokio::test]
async fn orders_resolve_product_names_from_catalog() {
    init_tracing();
    let store = scenario_store();
    let catalog = Catalog::open(store.clone(), MarketConfig::default()).await;
    let orders = OrderBook::new(store.clone());

    orders
        .place(
            &OrderDraft::new("2", "Carla", "Library, 2nd floor", "555-0101")
                .with_message("Is it still available?"),
        )
        .await
        .unwrap();
    orders
        .place(&OrderDraft::new("404", "Dani", "Cafeteria", "555-0102"))
        .await
        .unwrap();

    let listed = orders.list().await.unwrap();
    let names: Vec<String> = listed
        .iter()
        .map(|order| orders.product_name(order, &*catalog))
        .collect();

    assert_eq!(names, ["Desk Lamp", "Unknown product"]);
    assert_eq!(listed[0].message.as_deref(), Some("Is it still available?"));
    assert_eq!(listed[1].message, None);
    assert_eq!(store.len("orders"), 2);
}

#[tokio::test]
async fn unknown_product_label_is_configurable() {
    let config = MarketConfig::from_lookup(|key| {
        (key == "MARKET_UNKNOWN_PRODUCT").then(|| "Producto desconocido".to_string())
    });
    let store = scenario_store();
    let catalog = Catalog::new(store.clone());
    let orders = OrderBook::with_config(store, config);

    let order = orders
        .place(&OrderDraft::new("1", "Carla", "Library", "555-0101"))
        .await
        .unwrap();

    // Nothing cached until the catalog refreshes.
    assert_eq!(orders.product_name(&order, &catalog), "Producto desconocido");
    catalog.refresh().await.unwrap();
    assert_eq!(orders.product_name(&order, &catalog), "Calculus Textbook");
}

#[tokio::test]
async fn comments_follow_the_session() {
    let store = scenario_store();
    let identity = InMemoryIdentity::new();
    let board = CommentBoard::new(store.clone());

    let err = board
        .post("1", "Is the cover damaged?", identity.current_user().as_ref())
        .await
        .unwrap_err();
    assert_eq!(err, CommentError::SignInRequired);

    identity.sign_in(bo());
    board
        .post("1", "Is the cover damaged?", identity.current_user().as_ref())
        .await
        .unwrap();

    identity.sign_in(ana());
    board
        .post("1", "  No, like new.  ", identity.current_user().as_ref())
        .await
        .unwrap();
    board
        .post("2", "Unrelated", identity.current_user().as_ref())
        .await
        .unwrap();

    let thread = board.load("1").await.unwrap();
    let lines: Vec<(&str, &str)> = thread
        .iter()
        .map(|c| (c.user_name.as_str(), c.content.as_str()))
        .collect();
    assert_eq!(
        lines,
        [
            ("Ana", "No, like new."),
            ("bo@campus.edu", "Is the cover damaged?"),
        ]
    );
    assert_eq!(thread[0].user_id, "uid-ana");
}

#[tokio::test]
async fn anonymous_label_is_configurable() {
    let config = MarketConfig::from_lookup(|key| {
        (key == "MARKET_ANONYMOUS_NAME").then(|| "Usuario Anónimo".to_string())
    });
    let board = CommentBoard::with_config(scenario_store(), config);

    let comment = board
        .post("1", "Hello", Some(&User::new("uid-phone")))
        .await
        .unwrap();
    assert_eq!(comment.user_name, "Usuario Anónimo");
}

#[tokio::test]
async fn session_transitions_reach_listeners() {
    let identity = InMemoryIdentity::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let subscription = identity.subscribe(Box::new({
        let seen = Arc::clone(&seen);
        move |user: Option<&User>| {
            let label = user.and_then(|u| u.label().map(String::from));
            seen.lock().unwrap().push(label);
        }
    }));

    identity.sign_in(ana());
    identity.sign_out().await.unwrap();
    subscription.unsubscribe();
    identity.sign_in(bo());

    assert_eq!(
        *seen.lock().unwrap(),
        vec![None, Some("Ana".to_string()), None]
    );
    assert_eq!(identity.current_user().map(|u| u.id), Some("uid-bo".to_string()));
}

#[tokio::test]
async fn catalog_delete_uses_current_session() {
    let store = scenario_store();
    let catalog = Catalog::open(store.clone(), MarketConfig::default()).await;
    let identity = InMemoryIdentity::new();

    identity.sign_in(bo());
    catalog
        .delete("2", identity.current_user().as_ref())
        .await
        .unwrap();
    identity.sign_out().await.unwrap();

    assert!(catalog.cached("2").is_none());
    assert!(catalog
        .delete("1", identity.current_user().as_ref())
        .await
        .is_err());
    assert_eq!(store.len("products"), 1);
}
