//! Partial profile updates against `PUT /users/profile`.

use bazaar_core::{AccessToken, Address, User};
use reqwest::multipart;
use tracing::instrument;

use super::{ActionResult, ApiClient, ApiError, ErrorKind};

/// An uploaded profile photo.
#[derive(Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for PhotoUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Profile edit form. Every field is optional; only populated ones are sent.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub photo: Option<PhotoUpload>,
    pub address: Address,
}

/// One multipart field of the outgoing update.
#[derive(Debug, Clone)]
pub enum ProfileField {
    Text {
        name: &'static str,
        value: String,
    },
    Photo(PhotoUpload),
}

impl ProfileField {
    /// Multipart field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Text { name, .. } => *name,
            Self::Photo(_) => "photo",
        }
    }
}

/// Trim a value, treating blank input as absent.
fn populated(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl ProfileForm {
    /// Address with blank components removed.
    #[must_use]
    pub fn normalized_address(&self) -> Address {
        Address {
            street: populated(self.address.street.as_deref()),
            city: populated(self.address.city.as_deref()),
            state: populated(self.address.state.as_deref()),
            postal_code: populated(self.address.postal_code.as_deref()),
            country: populated(self.address.country.as_deref()),
        }
    }

    /// The fields that will be sent, in wire order.
    ///
    /// Empty or absent values are omitted entirely; the address travels as a
    /// single JSON-encoded text field containing only its populated parts.
    #[must_use]
    pub fn fields(&self) -> Vec<ProfileField> {
        let mut fields = Vec::new();

        if let Some(value) = populated(self.name.as_deref()) {
            fields.push(ProfileField::Text {
                name: "name",
                value,
            });
        }
        if let Some(value) = populated(self.email.as_deref()) {
            fields.push(ProfileField::Text {
                name: "email",
                value,
            });
        }
        if let Some(photo) = self.photo.as_ref().filter(|p| !p.bytes.is_empty()) {
            fields.push(ProfileField::Photo(photo.clone()));
        }

        let address = self.normalized_address();
        if !address.is_empty()
            && let Ok(value) = serde_json::to_string(&address)
        {
            fields.push(ProfileField::Text {
                name: "address",
                value,
            });
        }

        fields
    }

    /// True when nothing would be sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    fn to_multipart(&self) -> Result<multipart::Form, ApiError> {
        let mut form = multipart::Form::new();
        for field in self.fields() {
            form = match field {
                ProfileField::Text { name, value } => form.text(name, value),
                ProfileField::Photo(photo) => {
                    let mut part =
                        multipart::Part::bytes(photo.bytes).file_name(photo.file_name);
                    if let Some(content_type) = photo.content_type.as_deref() {
                        part = part.mime_str(content_type)?;
                    }
                    form.part("photo", part)
                }
            };
        }
        Ok(form)
    }
}

impl ApiClient {
    /// Send a partial profile update.
    ///
    /// Requires a bearer token; without one the action fails closed and no
    /// request is made. An update with no populated fields is rejected
    /// locally as well.
    #[instrument(skip_all)]
    pub async fn update_user_profile(
        &self,
        form: &ProfileForm,
        token: Option<&AccessToken>,
    ) -> ActionResult<User> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return ActionResult::unauthenticated();
        };

        if form.is_empty() {
            return ActionResult::fail(ErrorKind::Client, "There is nothing to update.");
        }

        let body = match form.to_multipart() {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid profile upload");
                return ActionResult::fail(ErrorKind::Client, "The uploaded photo is invalid.");
            }
        };

        let request = match self.put("/users/profile") {
            Ok(request) => request.bearer_auth(token.expose()).multipart(body),
            Err(e) => return ActionResult::network(&e),
        };

        match self.send(request).await {
            Ok(envelope) => {
                let result = envelope.into_result::<User>();
                if result.success {
                    tracing::info!("Profile updated");
                }
                result
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile update request failed");
                ActionResult::network(&e)
            }
        }
    }
}
