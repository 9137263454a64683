//! Catalog listing for admins.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use bazaar_core::{Product, User};
use tracing::instrument;

use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Products page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/products.html")]
pub struct ProductsTemplate<'a> {
    pub current_user: Option<User>,
    pub products: &'a [Product],
}

/// Display every catalog product, including out-of-stock ones.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
) -> impl IntoResponse {
    ProductsTemplate {
        current_user: Some(auth.user),
        products: state.catalog().all(),
    }
    .into_response()
}
