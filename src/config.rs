//! Storefront configuration: defaults with environment overrides.

use std::env;

use tracing::{info, warn};

pub const PLACEHOLDER_IMAGE_VAR: &str = "MARKET_PLACEHOLDER_IMAGE";
pub const ANONYMOUS_NAME_VAR: &str = "MARKET_ANONYMOUS_NAME";
pub const UNKNOWN_PRODUCT_VAR: &str = "MARKET_UNKNOWN_PRODUCT";

const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x300?text=Product";
const DEFAULT_ANONYMOUS_NAME: &str = "Anonymous user";
const DEFAULT_UNKNOWN_PRODUCT: &str = "Unknown product";

/// Display fallbacks shared by the catalog, order book and comment board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketConfig {
    /// Image shown for products that carry none.
    pub placeholder_image: String,
    /// Comment author label when the user has neither display name nor email.
    pub anonymous_name: String,
    /// Label for orders whose product is not in the catalog cache.
    pub unknown_product: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            anonymous_name: DEFAULT_ANONYMOUS_NAME.to_string(),
            unknown_product: DEFAULT_UNKNOWN_PRODUCT.to_string(),
        }
    }
}

impl MarketConfig {
    /// Load from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let load = |key: &str, default: &str| match lookup(key) {
            Some(value) if !value.trim().is_empty() => value.trim().to_string(),
            Some(_) => {
                warn!("{key} is blank, using default: {default}");
                default.to_string()
            }
            None => {
                info!("{key} not set, using default: {default}");
                default.to_string()
            }
        };

        Self {
            placeholder_image: load(PLACEHOLDER_IMAGE_VAR, DEFAULT_PLACEHOLDER_IMAGE),
            anonymous_name: load(ANONYMOUS_NAME_VAR, DEFAULT_ANONYMOUS_NAME),
            unknown_product: load(UNKNOWN_PRODUCT_VAR, DEFAULT_UNKNOWN_PRODUCT),
        }
    }
}
