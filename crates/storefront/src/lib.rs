//! Bazaar storefront library.
//!
//! Server-rendered shop front plus the admin dashboard. Authentication is
//! delegated to a remote REST API through the actions in [`api`]; the
//! resulting token lives in the [`session`] store and the `accessToken`
//! cookie that the route guard reads.
//!
//! The router is built by [`routes::app`], which the binary serves and the
//! integration tests drive directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;
