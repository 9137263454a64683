//! Review moderation route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::{Review, ReviewId, ReviewStatus, User};
use tracing::instrument;

use super::{StatusForm, StatusQuery};
use crate::error::{Result, admin_breadcrumb};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Review list template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/reviews.html")]
pub struct ReviewsTemplate {
    pub current_user: Option<User>,
    pub reviews: Vec<Review>,
    pub statuses: [ReviewStatus; 3],
    pub selected: Option<ReviewStatus>,
}

impl ReviewsTemplate {
    fn is_selected(&self, status: &ReviewStatus) -> bool {
        self.selected.as_ref() == Some(status)
    }
}

/// Display reviews, optionally filtered by `?status=`.
#[instrument(skip_all, fields(status = %query.status))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Query(query): Query<StatusQuery>,
) -> Result<Response> {
    let selected = query.parse::<ReviewStatus>()?;

    Ok(ReviewsTemplate {
        current_user: Some(auth.user),
        reviews: state.admin().reviews(selected).await,
        statuses: ReviewStatus::ALL,
        selected,
    }
    .into_response())
}

/// Approve or reject a review.
#[instrument(skip_all, fields(review_id = %id, status = %form.status))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(_auth): RequireAdmin,
    Path(id): Path<ReviewId>,
    Form(form): Form<StatusForm>,
) -> Result<Response> {
    let next = form.parse::<ReviewStatus>()?;
    let review = state.admin().moderate_review(&id, next).await?;

    admin_breadcrumb(
        "Review moderated",
        &[
            ("review_id", review.id.as_ref()),
            ("status", review.status.as_str()),
        ],
    );
    Ok(Redirect::to("/dashboard/reviews").into_response())
}
