//! Filter specification and the derived-view computation.
//!
//! The view is a pure function of (collection, filter): every product is
//! tested against three conjunctive stages in collection order and the
//! survivors keep their relative order.
//!
//! 1. search term (if non-empty): case-insensitive substring of the name or
//!    the description;
//! 2. tags (if non-empty): the product carries every required tag;
//! 3. price: the product has a numeric price inside the inclusive range.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::product::Product;

/// Inclusive price bounds. `max: None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    #[serde(default)]
    pub max: Option<f64>,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self { min: 0.0, max: None }
    }
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub fn at_least(min: f64) -> Self {
        Self { min, max: None }
    }

    /// `min <= price <= max`. An inverted range contains nothing.
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && self.max.map_or(true, |max| price <= max)
    }
}

/// The active filter. All-permissive by default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub search_term: String,
    pub tags: BTreeSet<String>,
    pub price_range: PriceRange,
}

impl FilterSpec {
    /// Replace the fields present in `update`, keep the rest.
    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(term) = update.search_term {
            self.search_term = term;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        if let Some(range) = update.price_range {
            self.price_range = range;
        }
    }

    /// Whether any stage is narrower than the default.
    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }

    pub fn matches(&self, product: &Product) -> bool {
        Matcher::new(self).matches(product)
    }

    /// The products satisfying this filter, in their original order.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let matcher = Matcher::new(self);
        products
            .iter()
            .filter(|product| matcher.matches(product))
            .cloned()
            .collect()
    }
}

/// Filter prepared once per recomputation.
struct Matcher<'a> {
    term: Option<String>,
    tags: &'a BTreeSet<String>,
    range: PriceRange,
}

impl<'a> Matcher<'a> {
    fn new(spec: &'a FilterSpec) -> Self {
        Self {
            term: (!spec.search_term.is_empty()).then(|| spec.search_term.to_lowercase()),
            tags: &spec.tags,
            range: spec.price_range,
        }
    }

    fn matches(&self, product: &Product) -> bool {
        self.matches_term(product) && self.matches_tags(product) && self.matches_price(product)
    }

    fn matches_term(&self, product: &Product) -> bool {
        let Some(term) = &self.term else {
            return true;
        };
        product.name.to_lowercase().contains(term)
            || product
                .description
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains(term)
    }

    fn matches_tags(&self, product: &Product) -> bool {
        self.tags.iter().all(|tag| product.tags.contains(tag))
    }

    fn matches_price(&self, product: &Product) -> bool {
        product
            .price_value()
            .is_some_and(|price| self.range.contains(price))
    }
}

/// Partial filter update: `Some` fields replace, `None` fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterUpdate {
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default)]
    pub tags: Option<BTreeSet<String>>,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
}

impl FilterUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }
}
