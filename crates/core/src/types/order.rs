//! Orders as seen from the admin dashboard.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    CurrencyCode, Email, OrderId, OrderStatus, PaymentStatus, Price, ProductId, TransitionError,
};

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Price,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Price {
        Price::new(
            self.unit_price.amount * Decimal::from(self.quantity),
            self.unit_price.currency_code,
        )
    }
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_email: Email,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Sum of all line totals, in the first item's currency.
    #[must_use]
    pub fn total(&self) -> Price {
        let currency = self
            .items
            .first()
            .map_or(CurrencyCode::default(), |item| item.unit_price.currency_code);
        let amount = self
            .items
            .iter()
            .map(|item| item.line_total().amount)
            .sum();
        Price::new(amount, currency)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Move the order to `next`, stamping `updated_at`.
    ///
    /// Cancelling a paid order marks the payment refunded. On error the
    /// order is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` if `next` is not reachable from the current status.
    pub fn apply_status(
        &mut self,
        next: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        self.status = self.status.transition(next)?;
        if next == OrderStatus::Cancelled {
            self.payment_status = self.payment_status.on_cancel();
        }
        self.updated_at = now;
        Ok(())
    }
}
