//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use bazaar_core::{Product, User};
use tracing::instrument;

use crate::catalog::ProductFilter;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalUser;
use crate::state::AppState;

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate<'a> {
    pub current_user: Option<User>,
    pub products: Vec<&'a Product>,
    pub categories: Vec<&'a str>,
    pub category: String,
    pub query: String,
}

impl ProductsIndexTemplate<'_> {
    fn is_current(&self, category: &str) -> bool {
        self.category == category
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate<'a> {
    pub current_user: Option<User>,
    pub product: &'a Product,
    pub related: Vec<&'a Product>,
}

/// Display product listing page.
#[instrument(skip_all, fields(category = ?filter.category, q = ?filter.q))]
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(auth): OptionalUser,
    Query(filter): Query<ProductFilter>,
) -> Response {
    let catalog = state.catalog();
    ProductsIndexTemplate {
        current_user: auth.map(|a| a.user),
        products: catalog.search(&filter),
        categories: catalog.categories(),
        category: filter.category.clone().unwrap_or_default(),
        query: filter.q.clone().unwrap_or_default(),
    }
    .into_response()
}

/// Display product detail page.
#[instrument(skip_all, fields(slug = %slug))]
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(auth): OptionalUser,
    Path(slug): Path<String>,
) -> Result<Response> {
    let catalog = state.catalog();
    let product = catalog
        .find_by_slug(&slug)
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    let related = catalog
        .all()
        .iter()
        .filter(|p| p.category == product.category && p.id != product.id)
        .collect();

    Ok(ProductShowTemplate {
        current_user: auth.map(|a| a.user),
        product,
        related,
    }
    .into_response())
}
