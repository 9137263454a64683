//! In-process data behind the admin dashboard.
//!
//! [`AdminRepository`] holds customers, orders and reviews seeded with
//! sample data. Status changes are validated by the transition rules in
//! `bazaar_core` and logged; a rejected change leaves the record as it was.

mod seed;

use bazaar_core::{
    CurrencyCode, Order, OrderId, OrderStatus, PaymentStatus, Price, Review, ReviewId,
    ReviewStatus, TransitionError, User,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::catalog::Catalog;
use crate::error::AppError;

pub use seed::SeedError;

/// Errors from admin status changes.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::NotFound { .. } => Self::NotFound(err.to_string()),
            AdminError::Transition(e) => Self::Transition(e),
        }
    }
}

/// A registered customer as listed on the users screen.
#[derive(Debug, Clone)]
pub struct CustomerAccount {
    pub user: User,
    pub joined_at: DateTime<Utc>,
}

/// Headline numbers for the dashboard overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub customers: usize,
    pub products: usize,
    pub orders: usize,
    /// Orders still pending or processing.
    pub open_orders: usize,
    pub pending_reviews: usize,
    /// Sum of paid order totals.
    pub revenue: Price,
}

#[derive(Debug, Default)]
struct AdminData {
    customers: Vec<CustomerAccount>,
    orders: Vec<Order>,
    reviews: Vec<Review>,
}

/// Shared store for dashboard records.
#[derive(Debug)]
pub struct AdminRepository {
    data: RwLock<AdminData>,
}

impl AdminRepository {
    /// Repository seeded with sample customers, orders and reviews that
    /// reference products in `catalog`.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if the sample data is inconsistent.
    pub fn with_sample_data(catalog: &Catalog, now: DateTime<Utc>) -> Result<Self, SeedError> {
        let data = seed::sample(catalog, now)?;
        tracing::debug!(
            customers = data.customers.len(),
            orders = data.orders.len(),
            reviews = data.reviews.len(),
            "Admin repository seeded"
        );
        Ok(Self {
            data: RwLock::new(data),
        })
    }

    pub async fn customers(&self) -> Vec<CustomerAccount> {
        let mut customers = self.data.read().await.customers.clone();
        customers.sort_by(|a, b| b.joined_at.cmp(&a.joined_at));
        customers
    }

    /// Orders, newest first, optionally restricted to one status.
    pub async fn orders(&self, status: Option<OrderStatus>) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .data
            .read()
            .await
            .orders
            .iter()
            .filter(|o| status.is_none_or(|s| o.status == s))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    pub async fn order(&self, id: &OrderId) -> Option<Order> {
        self.data
            .read()
            .await
            .orders
            .iter()
            .find(|o| &o.id == id)
            .cloned()
    }

    /// Reviews, newest first, optionally restricted to one status.
    pub async fn reviews(&self, status: Option<ReviewStatus>) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .data
            .read()
            .await
            .reviews
            .iter()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reviews
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotFound` for an unknown id and
    /// `AdminError::Transition` if the move is not allowed.
    #[instrument(skip(self, id), fields(order_id = %id))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        next: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<Order, AdminError> {
        let mut data = self.data.write().await;
        let order = data
            .orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| AdminError::NotFound {
                entity: "order",
                id: id.to_string(),
            })?;

        let from = order.status;
        if let Err(e) = order.apply_status(next, now) {
            tracing::warn!(%from, to = %next, "Rejected order status change");
            return Err(e.into());
        }

        tracing::info!(
            %from,
            to = %next,
            payment_status = %order.payment_status,
            "Order status changed"
        );
        Ok(order.clone())
    }

    /// Approve or reject a review.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotFound` for an unknown id and
    /// `AdminError::Transition` if the move is not allowed.
    #[instrument(skip(self, id), fields(review_id = %id))]
    pub async fn moderate_review(
        &self,
        id: &ReviewId,
        next: ReviewStatus,
    ) -> Result<Review, AdminError> {
        let mut data = self.data.write().await;
        let review = data
            .reviews
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| AdminError::NotFound {
                entity: "review",
                id: id.to_string(),
            })?;

        let from = review.status;
        if let Err(e) = review.moderate(next) {
            tracing::warn!(%from, to = %next, "Rejected review moderation");
            return Err(e.into());
        }

        tracing::info!(%from, to = %next, "Review moderated");
        Ok(review.clone())
    }

    /// Overview counts; `products` comes from the catalog.
    pub async fn stats(&self, catalog: &Catalog) -> DashboardStats {
        let data = self.data.read().await;
        let revenue = data
            .orders
            .iter()
            .filter(|o| o.payment_status == PaymentStatus::Paid)
            .map(|o| o.total().amount)
            .sum::<Decimal>();

        DashboardStats {
            customers: data.customers.len(),
            products: catalog.len(),
            orders: data.orders.len(),
            open_orders: data
                .orders
                .iter()
                .filter(|o| matches!(o.status, OrderStatus::Pending | OrderStatus::Processing))
                .count(),
            pending_reviews: data
                .reviews
                .iter()
                .filter(|r| r.status == ReviewStatus::Pending)
                .count(),
            revenue: Price::new(revenue, CurrencyCode::USD),
        }
    }
}
