//! Customer account listing.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use bazaar_core::User;
use tracing::instrument;

use crate::admin::CustomerAccount;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Users page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/users.html")]
pub struct UsersTemplate {
    pub current_user: Option<User>,
    pub customers: Vec<CustomerAccount>,
}

/// Display all customer accounts.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
) -> impl IntoResponse {
    UsersTemplate {
        current_user: Some(auth.user),
        customers: state.admin().customers().await,
    }
}
