//! Filter scenarios and view properties over the two-product collection.

use campus_market::{
    Catalog, DocumentsExt, FilterSpec, FilterUpdate, InMemoryDocumentStore, Price, PriceRange,
    Product, ProductDraft,
};
use serde_json::json;

use crate::support::{ids, scenario_store};

async fn loaded() -> Catalog<InMemoryDocumentStore> {
    let catalog = Catalog::new(scenario_store());
    catalog.refresh().await.unwrap();
    catalog
}

#[tokio::test]
async fn tag_filter_keeps_textbook() {
    let catalog = loaded().await;
    catalog.update_filter(FilterUpdate::new().tags(["libros"]));
    assert_eq!(ids(&catalog.products()), ["1"]);
}

#[tokio::test]
async fn price_ceiling_keeps_textbook() {
    let catalog = loaded().await;
    catalog.update_filter(FilterUpdate::new().price_range(PriceRange::new(0.0, 30000.0)));
    assert_eq!(ids(&catalog.products()), ["1"]);
}

#[tokio::test]
async fn search_finds_lamp() {
    let catalog = loaded().await;
    catalog.update_filter(FilterUpdate::new().search("lamp"));
    assert_eq!(ids(&catalog.products()), ["2"]);
}

#[tokio::test]
async fn inverted_range_gives_empty_view() {
    let catalog = loaded().await;
    catalog.update_filter(FilterUpdate::new().price_range(PriceRange::new(100000.0, 50000.0)));
    assert!(catalog.products().is_empty());
    assert_eq!(catalog.error(), None);
}

#[tokio::test]
async fn added_product_is_cached_with_numeric_price() {
    let catalog = loaded().await;

    let added = catalog
        .add(
            ProductDraft::new("Notebook", "15000", "ana@campus.edu")
                .with_description("A5, dotted")
                .with_tags(["libros"]),
        )
        .await
        .unwrap();

    assert_eq!(added.id, "3");
    assert_eq!(added.price, Some(Price::Amount(15000.0)));
    assert_eq!(catalog.all_products().len(), 3);
    assert_eq!(ids(&catalog.products()), ["1", "2", "3"]);

    let raw: serde_json::Value = catalog
        .store()
        .documents::<Product>()
        .get("3")
        .await
        .unwrap()
        .map(|p| serde_json::to_value(p).unwrap())
        .unwrap();
    assert_eq!(raw["price"], json!(15000.0));
}

#[tokio::test]
async fn added_product_respects_active_filter() {
    let catalog = loaded().await;
    catalog.update_filter(FilterUpdate::new().tags(["electronica"]));

    catalog
        .add(ProductDraft::new("Notebook", 15000u32, "ana@campus.edu").with_tags(["libros"]))
        .await
        .unwrap();

    assert_eq!(catalog.all_products().len(), 3);
    assert_eq!(ids(&catalog.products()), ["2"]);
}

#[tokio::test]
async fn permissive_filter_shows_whole_cache() {
    let catalog = loaded().await;
    catalog.update_filter(FilterUpdate::new().search("lamp").tags(["electronica"]));
    catalog.update_filter(
        FilterUpdate::new()
            .search("")
            .tags(Vec::<String>::new())
            .price_range(PriceRange::default()),
    );

    assert_eq!(catalog.filter(), FilterSpec::default());
    assert_eq!(catalog.products(), catalog.all_products());
}

#[tokio::test]
async fn view_is_exactly_the_matching_products() {
    let catalog = loaded().await;
    let specs = [
        FilterUpdate::new().search("TEXT"),
        FilterUpdate::new().tags(["libros", "electronica"]),
        FilterUpdate::new().price_range(PriceRange::at_least(45000.0)),
        FilterUpdate::new().search("e").price_range(PriceRange::new(0.0, 44999.0)),
    ];

    for update in specs {
        catalog.clear_filters();
        catalog.update_filter(update);

        let spec = catalog.filter();
        let view = catalog.products();
        for product in catalog.all_products() {
            assert_eq!(
                view.contains(&product),
                spec.matches(&product),
                "product {} under {:?}",
                product.id,
                spec
            );
        }
    }
}

#[tokio::test]
async fn toggle_parity_decides_membership() {
    let catalog = loaded().await;

    for n in 1..=4 {
        catalog.toggle_favorite("1");
        assert_eq!(catalog.is_favorite("1"), n % 2 == 1);
    }
    assert!(catalog.favorite_ids().is_empty());

    catalog.toggle_favorite("2");
    catalog.toggle_favorite("ghost");
    assert_eq!(catalog.favorite_ids(), ["2", "ghost"]);
    assert_eq!(ids(&catalog.favorite_products()), ["2"]);
}

#[tokio::test]
async fn repeated_refresh_keeps_view() {
    let catalog = loaded().await;
    catalog.update_filter(FilterUpdate::new().search("lamp"));
    let before = catalog.products();

    catalog.refresh().await.unwrap();
    catalog.refresh().await.unwrap();

    assert_eq!(catalog.products(), before);
}
