//! Order management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::{Order, OrderId, OrderStatus, User};
use chrono::Utc;
use tracing::instrument;

use super::{StatusForm, StatusQuery};
use crate::admin::AdminError;
use crate::error::{AppError, Result, admin_breadcrumb};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Order list template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/orders/index.html")]
pub struct OrdersIndexTemplate {
    pub current_user: Option<User>,
    pub orders: Vec<Order>,
    pub statuses: [OrderStatus; 5],
    pub selected: Option<OrderStatus>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/orders/show.html")]
pub struct OrderShowTemplate {
    pub current_user: Option<User>,
    pub order: Order,
    pub next_statuses: Vec<OrderStatus>,
    pub error: Option<String>,
}

impl OrderShowTemplate {
    fn new(current_user: User, order: Order, error: Option<String>) -> Self {
        Self {
            current_user: Some(current_user),
            next_statuses: order.status.next_statuses(),
            order,
            error,
        }
    }
}

fn order_not_found(id: &OrderId) -> AppError {
    AppError::NotFound(format!("order {id}"))
}

impl OrdersIndexTemplate {
    fn is_selected(&self, status: &OrderStatus) -> bool {
        self.selected.as_ref() == Some(status)
    }
}

/// Display the order list, optionally filtered by `?status=`.
#[instrument(skip_all, fields(status = %query.status))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Query(query): Query<StatusQuery>,
) -> Result<Response> {
    let selected = query.parse::<OrderStatus>()?;
    let orders = state.admin().orders(selected).await;

    Ok(OrdersIndexTemplate {
        current_user: Some(auth.user),
        orders,
        statuses: OrderStatus::ALL,
        selected,
    }
    .into_response())
}

/// Display a single order with its allowed next statuses.
#[instrument(skip_all, fields(order_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<Response> {
    let order = state
        .admin()
        .order(&id)
        .await
        .ok_or_else(|| order_not_found(&id))?;

    Ok(OrderShowTemplate::new(auth.user, order, None).into_response())
}

/// Move an order to a new status.
///
/// A rejected move re-renders the detail page with the reason and a 409.
#[instrument(skip_all, fields(order_id = %id, status = %form.status))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<OrderId>,
    Form(form): Form<StatusForm>,
) -> Result<Response> {
    let next = form.parse::<OrderStatus>()?;
    let admin = state.admin();

    match admin.update_order_status(&id, next, Utc::now()).await {
        Ok(order) => {
            admin_breadcrumb(
                "Order status changed",
                &[
                    ("order_id", order.id.as_ref()),
                    ("status", order.status.as_str()),
                ],
            );
            Ok(Redirect::to(&format!("/dashboard/orders/{}", order.id)).into_response())
        }
        Err(AdminError::Transition(e)) => {
            let order = admin.order(&id).await.ok_or_else(|| order_not_found(&id))?;
            Ok((
                StatusCode::CONFLICT,
                OrderShowTemplate::new(auth.user, order, Some(e.to_string())),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}
