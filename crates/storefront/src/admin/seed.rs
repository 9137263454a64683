//! Sample records for the admin repository.

use bazaar_core::{
    Address, Email, EmailError, Order, OrderId, OrderItem, OrderStatus, PaymentStatus, ProductId,
    Review, ReviewId, ReviewStatus, Role, User, UserId,
};
use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

use super::{AdminData, CustomerAccount};
use crate::catalog::Catalog;

/// Sample data that does not line up with the catalog or fails validation.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("invalid seed email: {0}")]
    Email(#[from] EmailError),

    #[error("seed references unknown product {0}")]
    UnknownProduct(String),

    #[error("seed references unknown customer {0}")]
    UnknownCustomer(String),
}

struct CustomerSeed {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    role: Role,
    city: Option<&'static str>,
    joined_days_ago: i64,
}

const CUSTOMERS: &[CustomerSeed] = &[
    CustomerSeed {
        id: "usr_admin",
        name: "Store Admin",
        email: "admin@bazaar.test",
        role: Role::Admin,
        city: None,
        joined_days_ago: 400,
    },
    CustomerSeed {
        id: "usr_ada",
        name: "Ada Lovelace",
        email: "ada@example.com",
        role: Role::User,
        city: Some("London"),
        joined_days_ago: 120,
    },
    CustomerSeed {
        id: "usr_grace",
        name: "Grace Hopper",
        email: "grace@example.com",
        role: Role::User,
        city: Some("Arlington"),
        joined_days_ago: 64,
    },
    CustomerSeed {
        id: "usr_alan",
        name: "Alan Turing",
        email: "alan@example.com",
        role: Role::User,
        city: Some("Manchester"),
        joined_days_ago: 21,
    },
    CustomerSeed {
        id: "usr_katherine",
        name: "Katherine Johnson",
        email: "katherine@example.com",
        role: Role::User,
        city: None,
        joined_days_ago: 3,
    },
];

struct OrderSeed {
    id: &'static str,
    customer: &'static str,
    items: &'static [(&'static str, u32)],
    status: OrderStatus,
    payment_status: PaymentStatus,
    placed_hours_ago: i64,
}

const ORDERS: &[OrderSeed] = &[
    OrderSeed {
        id: "ord_1001",
        customer: "usr_ada",
        items: &[("prod_lamp", 1), ("prod_mug", 2)],
        status: OrderStatus::Delivered,
        payment_status: PaymentStatus::Paid,
        placed_hours_ago: 24 * 30,
    },
    OrderSeed {
        id: "ord_1002",
        customer: "usr_grace",
        items: &[("prod_throw", 1)],
        status: OrderStatus::Shipped,
        payment_status: PaymentStatus::Paid,
        placed_hours_ago: 24 * 6,
    },
    OrderSeed {
        id: "ord_1003",
        customer: "usr_alan",
        items: &[("prod_board", 1), ("prod_planter", 3)],
        status: OrderStatus::Processing,
        payment_status: PaymentStatus::Paid,
        placed_hours_ago: 40,
    },
    OrderSeed {
        id: "ord_1004",
        customer: "usr_katherine",
        items: &[("prod_pendant", 2)],
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        placed_hours_ago: 5,
    },
    OrderSeed {
        id: "ord_1005",
        customer: "usr_ada",
        items: &[("prod_mug", 4)],
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Paid,
        placed_hours_ago: 2,
    },
    OrderSeed {
        id: "ord_1006",
        customer: "usr_grace",
        items: &[("prod_planter", 1)],
        status: OrderStatus::Cancelled,
        payment_status: PaymentStatus::Failed,
        placed_hours_ago: 24 * 12,
    },
];

struct ReviewSeed {
    id: &'static str,
    product: &'static str,
    author: &'static str,
    rating: u8,
    comment: &'static str,
    status: ReviewStatus,
    posted_hours_ago: i64,
}

const REVIEWS: &[ReviewSeed] = &[
    ReviewSeed {
        id: "rev_501",
        product: "prod_lamp",
        author: "Ada Lovelace",
        rating: 5,
        comment: "Lovely warm light and solid build.",
        status: ReviewStatus::Approved,
        posted_hours_ago: 24 * 20,
    },
    ReviewSeed {
        id: "rev_502",
        product: "prod_throw",
        author: "Grace Hopper",
        rating: 4,
        comment: "Soft, a little smaller than expected.",
        status: ReviewStatus::Pending,
        posted_hours_ago: 30,
    },
    ReviewSeed {
        id: "rev_503",
        product: "prod_mug",
        author: "Alan Turing",
        rating: 2,
        comment: "Chipped on arrival.",
        status: ReviewStatus::Pending,
        posted_hours_ago: 8,
    },
    ReviewSeed {
        id: "rev_504",
        product: "prod_mug",
        author: "anonymous",
        rating: 1,
        comment: "Visit my shop for cheaper mugs!!!",
        status: ReviewStatus::Rejected,
        posted_hours_ago: 24 * 9,
    },
];

pub(super) fn sample(catalog: &Catalog, now: DateTime<Utc>) -> Result<AdminData, SeedError> {
    let customers = CUSTOMERS
        .iter()
        .map(|seed| customer(seed, now))
        .collect::<Result<Vec<_>, _>>()?;

    let orders = ORDERS
        .iter()
        .map(|seed| order(seed, &customers, catalog, now))
        .collect::<Result<Vec<_>, _>>()?;

    let reviews = REVIEWS
        .iter()
        .map(|seed| review(seed, catalog, now))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AdminData {
        customers,
        orders,
        reviews,
    })
}

fn customer(seed: &CustomerSeed, now: DateTime<Utc>) -> Result<CustomerAccount, SeedError> {
    let address = seed.city.map(|city| Address {
        city: Some(city.to_string()),
        ..Address::default()
    });
    Ok(CustomerAccount {
        user: User {
            id: UserId::new(seed.id),
            name: seed.name.to_string(),
            email: Email::parse(seed.email)?,
            role: seed.role,
            photo: None,
            address,
        },
        joined_at: now - TimeDelta::days(seed.joined_days_ago),
    })
}

fn order(
    seed: &OrderSeed,
    customers: &[CustomerAccount],
    catalog: &Catalog,
    now: DateTime<Utc>,
) -> Result<Order, SeedError> {
    let customer = customers
        .iter()
        .find(|c| c.user.id.as_str() == seed.customer)
        .map(|c| &c.user)
        .ok_or_else(|| SeedError::UnknownCustomer(seed.customer.to_string()))?;

    let items = seed
        .items
        .iter()
        .map(|(product_id, quantity)| {
            let product = catalog
                .find_by_id(&ProductId::new(*product_id))
                .ok_or_else(|| SeedError::UnknownProduct((*product_id).to_string()))?;
            Ok(OrderItem {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                quantity: *quantity,
                unit_price: product.price,
            })
        })
        .collect::<Result<Vec<_>, SeedError>>()?;

    let placed = now - TimeDelta::hours(seed.placed_hours_ago);
    Ok(Order {
        id: OrderId::new(seed.id),
        customer_name: customer.name.clone(),
        customer_email: customer.email.clone(),
        items,
        status: seed.status,
        payment_status: seed.payment_status,
        created_at: placed,
        updated_at: placed,
    })
}

fn review(seed: &ReviewSeed, catalog: &Catalog, now: DateTime<Utc>) -> Result<Review, SeedError> {
    let product = catalog
        .find_by_id(&ProductId::new(seed.product))
        .ok_or_else(|| SeedError::UnknownProduct(seed.product.to_string()))?;

    Ok(Review {
        id: ReviewId::new(seed.id),
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        author: seed.author.to_string(),
        rating: seed.rating,
        comment: seed.comment.to_string(),
        status: seed.status,
        created_at: now - TimeDelta::hours(seed.posted_hours_ago),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_matches_sample_catalog() {
        let data = sample(&Catalog::sample(), Utc::now());
        assert!(data.is_ok());
    }

    #[test]
    fn test_seed_rejects_foreign_catalog() {
        let data = sample(&Catalog::new(Vec::new()), Utc::now());
        assert!(matches!(data, Err(SeedError::UnknownProduct(_))));
    }
}
