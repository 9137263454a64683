//! Application state shared across handlers.

use std::sync::Arc;

use chrono::Utc;

use crate::admin::{AdminRepository, SeedError};
use crate::api::{ApiClient, ApiError};
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to build API client: {0}")]
    Api(#[from] ApiError),
    #[error("failed to seed admin data: {0}")]
    Seed(#[from] SeedError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    catalog: Catalog,
    admin: AdminRepository,
}

impl AppState {
    /// Create application state with the sample catalog and admin data.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the sample
    /// data is inconsistent.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let api = ApiClient::new(&config.api)?;
        let catalog = Catalog::sample();
        let admin = AdminRepository::with_sample_data(&catalog, Utc::now())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                catalog,
                admin,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Client for the remote REST API.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Dashboard records.
    #[must_use]
    pub fn admin(&self) -> &AdminRepository {
        &self.inner.admin
    }
}
