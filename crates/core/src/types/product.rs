//! Catalog product.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as shown on listing and detail pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    /// URL segment under `/products/`.
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Average review score, 0.0 to 5.0.
    pub rating: Decimal,
}

impl Product {
    /// Case-insensitive match against name, category and description.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [&self.name, &self.category, &self.description]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}
