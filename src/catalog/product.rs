//! Products as stored in the `products` collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CatalogError;
use crate::identity::User;
use crate::Document;

/// A stored price. Current records hold a number; older ones may hold text.
///
/// Anything else a record carries (booleans, objects, arrays) is kept as
/// `Other` so the record still loads; it has no numeric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Price {
    /// Numeric value for filtering, if the price has one.
    ///
    /// Text is read leniently from its leading number: `"15.5kg"` is 15.5,
    /// `"free"` has no value. Text that reads as infinite (`"Infinity"`,
    /// `"1e400"`) has no value either, so such records never pass the price
    /// stage, not even under the unbounded default range.
    pub fn value(&self) -> Option<f64> {
        match self {
            Price::Amount(amount) if !amount.is_nan() => Some(*amount),
            Price::Amount(_) | Price::Other(_) => None,
            Price::Text(text) => leading_number(text),
        }
    }

    /// Strict conversion used when publishing: the whole text must be a
    /// finite, non-negative number.
    pub fn coerce(&self) -> Option<f64> {
        let amount = match self {
            Price::Amount(amount) => *amount,
            Price::Text(text) => text.trim().parse::<f64>().ok()?,
            Price::Other(_) => return None,
        };
        (amount.is_finite() && amount >= 0.0).then_some(amount)
    }
}

impl From<f64> for Price {
    fn from(amount: f64) -> Self {
        Price::Amount(amount)
    }
}

impl From<u32> for Price {
    fn from(amount: u32) -> Self {
        Price::Amount(f64::from(amount))
    }
}

impl From<&str> for Price {
    fn from(text: &str) -> Self {
        Price::Text(text.to_string())
    }
}

impl From<String> for Price {
    fn from(text: String) -> Self {
        Price::Text(text)
    }
}

fn is_numeric_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E')
}

/// Longest numeric prefix of `text` (after leading whitespace).
fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    if !text.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '.' | '+' | '-')) {
        return None;
    }
    let numeric_len = text.find(|c: char| !is_numeric_char(c)).unwrap_or(text.len());

    (1..=numeric_len)
        .rev()
        .find_map(|end| text[..end].parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// A catalog record. Identifier and creation timestamp are store-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "products")]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    /// Seller email, or user id for accounts without one.
    #[serde(default)]
    pub seller: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Image URLs; the first is the primary image.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, alias = "image_url", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Numeric price, if the stored price has one.
    pub fn price_value(&self) -> Option<f64> {
        self.price.as_ref().and_then(Price::value)
    }

    /// First gallery image, else the legacy single image.
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .iter()
            .map(String::as_str)
            .find(|url| !url.is_empty())
            .or(self.image_url.as_deref().filter(|url| !url.is_empty()))
    }

    /// Whether `user` published this product.
    pub fn is_owned_by(&self, user: &User) -> bool {
        !self.seller.is_empty()
            && (user.email.as_deref() == Some(self.seller.as_str()) || user.id == self.seller)
    }
}

/// The fields a seller submits when publishing a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Option<Price>,
    pub seller: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ProductDraft {
    pub fn new(
        name: impl Into<String>,
        price: impl Into<Price>,
        seller: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price: Some(price.into()),
            seller: seller.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_images<I, T>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// The draft as it is submitted to the store: price coerced to a number.
    pub(crate) fn normalized(mut self) -> Result<Self, CatalogError> {
        let amount = self
            .price
            .as_ref()
            .and_then(Price::coerce)
            .ok_or_else(|| {
                let shown = match &self.price {
                    Some(Price::Amount(amount)) => amount.to_string(),
                    Some(Price::Text(text)) => format!("{:?}", text),
                    Some(Price::Other(value)) => value.to_string(),
                    None => "missing".to_string(),
                };
                CatalogError::InvalidPrice(shown)
            })?;
        self.price = Some(Price::Amount(amount));
        Ok(self)
    }
}
