//! Sample product catalog.
//!
//! The storefront renders a fixed set of products; catalog management is
//! out of scope. Product IDs line up with the seeded orders and reviews in
//! the admin repository.

use bazaar_core::{CurrencyCode, Price, Product, ProductId};
use rust_decimal::Decimal;

/// Number of products shown on the home page.
pub const FEATURED_COUNT: usize = 4;

/// Read-only product list.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

/// Listing filters from the `/products` query string.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub q: Option<String>,
}

impl Catalog {
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The built-in sample catalog.
    #[must_use]
    pub fn sample() -> Self {
        Self::new(vec![
            product(
                "prod_lamp",
                "brass-desk-lamp",
                "Brass Desk Lamp",
                "Lighting",
                "Adjustable arm, warm 2700K bulb included.",
                4900,
                true,
                45,
            ),
            product(
                "prod_pendant",
                "linen-pendant-shade",
                "Linen Pendant Shade",
                "Lighting",
                "Hand-stitched natural linen over a steel frame.",
                6500,
                true,
                42,
            ),
            product(
                "prod_mug",
                "stoneware-mug",
                "Stoneware Mug",
                "Kitchen",
                "Speckled glaze, holds 350ml.",
                1800,
                true,
                48,
            ),
            product(
                "prod_board",
                "walnut-cutting-board",
                "Walnut Cutting Board",
                "Kitchen",
                "End-grain walnut, oiled and ready to use.",
                5400,
                false,
                47,
            ),
            product(
                "prod_throw",
                "wool-throw-blanket",
                "Wool Throw Blanket",
                "Living",
                "Merino wool, 130 x 170 cm.",
                8900,
                true,
                46,
            ),
            product(
                "prod_planter",
                "terracotta-planter",
                "Terracotta Planter",
                "Living",
                "Unglazed with drainage hole and saucer.",
                2200,
                true,
                39,
            ),
        ])
    }

    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// In-stock products for the home page.
    #[must_use]
    pub fn featured(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.in_stock)
            .take(FEATURED_COUNT)
            .collect()
    }

    #[must_use]
    pub fn find_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.slug == slug)
    }

    #[must_use]
    pub fn find_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Distinct categories in catalog order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Products matching the category (exact, case-insensitive) and search text.
    #[must_use]
    pub fn search(&self, filter: &ProductFilter) -> Vec<&Product> {
        let category = filter
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let query = filter.q.as_deref().unwrap_or_default();

        self.products
            .iter()
            .filter(|p| category.is_none_or(|c| p.category.eq_ignore_ascii_case(c)))
            .filter(|p| p.matches(query))
            .collect()
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    slug: &str,
    name: &str,
    category: &str,
    description: &str,
    cents: i64,
    in_stock: bool,
    rating_tenths: i64,
) -> Product {
    Product {
        id: ProductId::new(id),
        slug: slug.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price: Price::from_cents(cents, CurrencyCode::USD),
        category: category.to_string(),
        in_stock,
        image_url: Some(format!("/static/img/{slug}.jpg")),
        rating: Decimal::new(rating_tenths, 1),
    }
}
