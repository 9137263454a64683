//! Login, logout and whoami.

use bazaar_core::Email;
use bazaar_storefront::api::{ApiClient, LoginForm};
use bazaar_storefront::session::SessionStore;
use secrecy::{ExposeSecret, SecretString};

use super::CliError;

/// Log in and persist the returned session.
///
/// # Errors
///
/// Returns `CliError::Action` when the API rejects the credentials, with the
/// first field error logged for context.
pub async fn login(
    api: &ApiClient,
    store: &impl SessionStore,
    email: Email,
    password: &SecretString,
) -> Result<(), CliError> {
    let form = LoginForm {
        email: email.into(),
        password: password.expose_secret().to_string(),
    };
    let result = api.login_user(&form).await;

    for (field, messages) in &result.field_errors {
        for message in messages {
            tracing::warn!(field = %field, "{message}");
        }
    }

    match result.data {
        Some(auth) if result.success => {
            tracing::info!(
                "Logged in as {} <{}> ({})",
                auth.user.name,
                auth.user.email,
                auth.user.role
            );
            store
                .store_auth_data(auth.access_token, auth.user)
                .await?;
            Ok(())
        }
        _ => Err(CliError::action(result.kind, result.error)),
    }
}

/// Log out remotely and always remove the local session.
///
/// # Errors
///
/// Returns `CliError::Session` if the session file cannot be read or removed.
/// A failed remote logout is only logged.
pub async fn logout(api: &ApiClient, store: &impl SessionStore) -> Result<(), CliError> {
    let token = store.load().await?.map(|auth| auth.access_token);
    if token.is_none() {
        tracing::info!("No stored session");
        return Ok(());
    }

    let result = api.logout_user(token.as_ref()).await;
    if !result.success {
        tracing::warn!(
            kind = ?result.kind,
            "Remote logout failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
    }

    store.clear_auth_data().await?;
    tracing::info!("Logged out");
    Ok(())
}

/// Report the stored session.
///
/// # Errors
///
/// Returns `CliError::NotLoggedIn` when no token is stored.
pub async fn whoami(store: &impl SessionStore) -> Result<(), CliError> {
    let auth = store
        .load()
        .await?
        .filter(bazaar_core::AuthData::has_token)
        .ok_or(CliError::NotLoggedIn)?;

    tracing::info!(
        "{} <{}> ({}) id={}",
        auth.user.name,
        auth.user.email,
        auth.user.role,
        auth.user.id
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::{AccessToken, Email, Role, User, UserId};
    use bazaar_storefront::session::MemorySessionStore;

    use super::*;

    fn user() -> User {
        User {
            id: UserId::new("usr_1"),
            name: "Ada".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            role: Role::User,
            photo: None,
            address: None,
        }
    }

    #[tokio::test]
    async fn test_whoami_requires_session() {
        let store = MemorySessionStore::new();
        assert!(matches!(whoami(&store).await, Err(CliError::NotLoggedIn)));
    }

    #[tokio::test]
    async fn test_whoami_ignores_blank_token() {
        let store = MemorySessionStore::new();
        store
            .store_auth_data(AccessToken::new("  "), user())
            .await
            .unwrap();
        assert!(matches!(whoami(&store).await, Err(CliError::NotLoggedIn)));
    }

    #[tokio::test]
    async fn test_whoami_with_session() {
        let store = MemorySessionStore::new();
        store
            .store_auth_data(AccessToken::new("tok"), user())
            .await
            .unwrap();
        assert!(whoami(&store).await.is_ok());
    }
}
