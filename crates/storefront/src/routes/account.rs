//! Account route handlers.
//!
//! These routes require authentication.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, State, multipart::MultipartError},
    response::{IntoResponse, Response},
};
use bazaar_core::User;
use tracing::instrument;

use super::{FormFeedback, failure_status};
use crate::api::{PhotoUpload, ProfileForm};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireUser;
use crate::session::{AuthSession, SessionStore};
use crate::state::AppState;

/// Largest accepted profile photo.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Request body limit for the profile form (photo plus text fields).
pub const MAX_PROFILE_BODY_BYTES: usize = MAX_PHOTO_BYTES + 64 * 1024;

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub current_user: Option<User>,
    pub user: User,
    pub feedback: FormFeedback,
}

impl ProfileTemplate {
    fn new(user: User, feedback: FormFeedback) -> Self {
        Self {
            current_user: Some(user.clone()),
            user,
            feedback,
        }
    }

    /// Address component for the form's `value` attribute.
    fn address_field(&self, field: &str) -> &str {
        let Some(address) = self.user.address.as_ref() else {
            return "";
        };
        let value = match field {
            "street" => &address.street,
            "city" => &address.city,
            "state" => &address.state,
            "postal_code" => &address.postal_code,
            "country" => &address.country,
            _ => &None,
        };
        value.as_deref().unwrap_or_default()
    }
}

/// Display the profile page.
pub async fn profile_page(RequireUser(auth): RequireUser) -> impl IntoResponse {
    ProfileTemplate::new(auth.user, FormFeedback::default())
}

/// Handle the profile form (multipart, photo optional).
///
/// Only populated fields are sent to the API. On success the session's copy
/// of the user is replaced with the API's response.
#[instrument(skip_all, fields(user_id = %auth.user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    session: AuthSession,
    RequireUser(auth): RequireUser,
    multipart: Multipart,
) -> Result<Response> {
    let form = read_profile_form(multipart).await?;

    let result = state
        .api()
        .update_user_profile(&form, Some(&auth.access_token))
        .await;

    let status = failure_status(result.kind);
    let mut feedback = FormFeedback::from_result(&result);

    match result.data {
        Some(user) if result.success => {
            session
                .store_auth_data(auth.access_token, user.clone())
                .await?;
            if feedback.message.is_none() {
                feedback.message = Some("Profile updated.".to_string());
            }
            Ok(ProfileTemplate::new(user, feedback).into_response())
        }
        _ => Ok((status, ProfileTemplate::new(auth.user, feedback)).into_response()),
    }
}

/// Collect the multipart body into a [`ProfileForm`].
///
/// Unknown fields are ignored; an empty file input yields no photo.
async fn read_profile_form(mut multipart: Multipart) -> Result<ProfileForm> {
    let mut form = ProfileForm::default();
    let bad_request = |e: MultipartError| AppError::BadRequest(e.body_text());

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "photo" {
            let file_name = field.file_name().unwrap_or("photo").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(bad_request)?;
            if bytes.len() > MAX_PHOTO_BYTES {
                return Err(AppError::BadRequest(
                    "Profile photo must be 5 MB or smaller".to_string(),
                ));
            }
            if !bytes.is_empty() {
                form.photo = Some(PhotoUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field.text().await.map_err(bad_request)?;
        let slot = match name.as_str() {
            "name" => &mut form.name,
            "email" => &mut form.email,
            "street" => &mut form.address.street,
            "city" => &mut form.address.city,
            "state" => &mut form.address.state,
            "postal_code" => &mut form.address.postal_code,
            "country" => &mut form.address.country,
            _ => continue,
        };
        *slot = Some(value);
    }

    Ok(form)
}
