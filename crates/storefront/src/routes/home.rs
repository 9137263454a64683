//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use bazaar_core::{Product, User};
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalUser;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate<'a> {
    pub current_user: Option<User>,
    pub featured: Vec<&'a Product>,
    pub categories: Vec<&'a str>,
}

/// Display the home page with featured products.
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    OptionalUser(auth): OptionalUser,
) -> impl IntoResponse {
    let catalog = state.catalog();
    HomeTemplate {
        current_user: auth.map(|a| a.user),
        featured: catalog.featured(),
        categories: catalog.categories(),
    }
    .into_response()
}
