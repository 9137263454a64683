//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod review;
pub mod role;
pub mod status;
pub mod user;

pub use email::{Email, EmailError};
pub use id::*;
pub use order::{Order, OrderItem};
pub use price::{CurrencyCode, Price};
pub use product::Product;
pub use review::Review;
pub use role::Role;
pub use status::*;
pub use user::{AccessToken, Address, AuthData, User};
