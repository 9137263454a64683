//! Admin dashboard route handlers.
//!
//! Every handler takes [`RequireAdmin`], so anonymous visitors are sent to
//! the login page and signed-in customers get a 403.

pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use bazaar_core::{Order, UnknownStatus, User};
use serde::Deserialize;
use tracing::instrument;

use crate::admin::DashboardStats;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Orders shown on the overview page.
const RECENT_ORDERS: usize = 5;

/// `?status=` filter shared by the order and review lists.
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub status: String,
}

impl StatusQuery {
    /// Parse the filter. A blank value means "all".
    fn parse<S>(&self) -> Result<Option<S>>
    where
        S: FromStr<Err = UnknownStatus>,
    {
        let raw = self.status.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse()
            .map(Some)
            .map_err(|e: UnknownStatus| AppError::BadRequest(e.to_string()))
    }
}

/// Status change form posted by the order and review screens.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

impl StatusForm {
    fn parse<S>(&self) -> Result<S>
    where
        S: FromStr<Err = UnknownStatus>,
    {
        self.status
            .trim()
            .parse()
            .map_err(|e: UnknownStatus| AppError::BadRequest(e.to_string()))
    }
}

/// Dashboard overview template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub current_user: Option<User>,
    pub stats: DashboardStats,
    pub recent_orders: Vec<Order>,
}

/// Display the dashboard overview.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
) -> impl IntoResponse {
    let admin = state.admin();
    let stats = admin.stats(state.catalog()).await;
    let mut recent_orders = admin.orders(None).await;
    recent_orders.truncate(RECENT_ORDERS);

    DashboardTemplate {
        current_user: Some(auth.user),
        stats,
        recent_orders,
    }
}
