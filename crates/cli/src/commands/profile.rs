//! Profile updates from the command line.

use std::path::PathBuf;

use bazaar_core::{Address, Email};
use bazaar_storefront::api::{ApiClient, PhotoUpload, ProfileForm};
use bazaar_storefront::session::SessionStore;
use clap::Args;

use super::CliError;

/// Fields accepted by `bazaar profile`. Omitted fields are left unchanged.
#[derive(Debug, Default, Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, value_parser = Email::parse_trimmed)]
    pub email: Option<Email>,
    /// Image file to upload as the profile photo
    #[arg(long)]
    pub photo: Option<PathBuf>,
    #[arg(long)]
    pub street: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub postal_code: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
}

impl ProfileArgs {
    /// Build the form, reading the photo from disk if one was given.
    async fn into_form(self) -> Result<ProfileForm, CliError> {
        let photo = match self.photo {
            Some(path) => Some(read_photo(path).await?),
            None => None,
        };

        Ok(ProfileForm {
            name: self.name,
            email: self.email.map(String::from),
            photo,
            address: Address {
                street: self.street,
                city: self.city,
                state: self.state,
                postal_code: self.postal_code,
                country: self.country,
            },
        })
    }
}

async fn read_photo(path: PathBuf) -> Result<PhotoUpload, CliError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| CliError::File {
            path: path.display().to_string(),
            source,
        })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "photo".to_string(), |n| n.to_string_lossy().into_owned());
    let content_type = match path.extension().and_then(|e| e.to_str()) {
        Some("png") => Some("image/png"),
        Some("jpg" | "jpeg") => Some("image/jpeg"),
        Some("webp") => Some("image/webp"),
        Some("gif") => Some("image/gif"),
        _ => None,
    };

    Ok(PhotoUpload {
        file_name,
        content_type: content_type.map(str::to_string),
        bytes,
    })
}

/// Send a partial profile update and refresh the stored user.
///
/// # Errors
///
/// Returns `CliError::NotLoggedIn` without a session and `CliError::Action`
/// when the API rejects the update.
pub async fn update(
    api: &ApiClient,
    store: &impl SessionStore,
    args: ProfileArgs,
) -> Result<(), CliError> {
    let auth = store
        .load()
        .await?
        .filter(bazaar_core::AuthData::has_token)
        .ok_or(CliError::NotLoggedIn)?;

    let form = args.into_form().await?;
    let result = api
        .update_user_profile(&form, Some(&auth.access_token))
        .await;

    for (field, messages) in &result.field_errors {
        for message in messages {
            tracing::warn!(field = %field, "{message}");
        }
    }

    match result.data {
        Some(user) if result.success => {
            tracing::info!(
                "{}",
                result.message.as_deref().unwrap_or("Profile updated")
            );
            store.store_auth_data(auth.access_token, user).await?;
            Ok(())
        }
        _ => Err(CliError::action(result.kind, result.error)),
    }
}
