//! Bazaar Core - Shared types library.
//!
//! This crate provides common types used across all Bazaar components:
//! - `storefront` - Public-facing storefront and admin dashboard
//! - `cli` - Command-line client for the auth API
//!
//! # Architecture
//!
//! The core crate contains only types and rules - no I/O, no HTTP clients.
//! The remote API is the source of truth for users and orders; these types
//! describe what it sends and which state changes are legal.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, roles, statuses, profiles and catalog records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
