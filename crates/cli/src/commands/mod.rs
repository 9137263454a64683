//! CLI subcommands.

pub mod auth;
pub mod profile;

use bazaar_storefront::api::{ApiClient, ApiError, ErrorKind};
use bazaar_storefront::config::{ApiConfig, ConfigError};
use bazaar_storefront::session::SessionError;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// No per-user config directory on this platform.
    #[error("could not determine the user config directory; pass --session-file")]
    NoConfigDir,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// A local file named on the command line could not be read.
    #[error("could not read {path}: {source}")]
    File {
        path: String,
        source: std::io::Error,
    },

    /// Command needs a stored session.
    #[error("not logged in; run `bazaar login` first")]
    NotLoggedIn,

    /// The remote action reported failure.
    #[error("{0}")]
    Action(String),
}

impl CliError {
    fn action(kind: Option<ErrorKind>, error: Option<String>) -> Self {
        let message = error.unwrap_or_else(|| "request failed".to_string());
        match kind {
            Some(ErrorKind::Network) => Self::Action(format!("{message} (is the API reachable?)")),
            _ => Self::Action(message),
        }
    }
}

/// Build an API client from `API_BASE_URL` / `API_TIMEOUT_SECS`.
///
/// # Errors
///
/// Returns `CliError` if the configuration is invalid or the client cannot
/// be built.
pub fn api_client() -> Result<ApiClient, CliError> {
    let config = ApiConfig::from_env()?;
    Ok(ApiClient::new(&config)?)
}
