//! Product reviews awaiting or past moderation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProductId, ReviewId, ReviewStatus, TransitionError};

/// A customer review of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub product_name: String,
    pub author: String,
    /// Stars, 1 to 5.
    pub rating: u8,
    pub comment: String,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Apply a moderation decision. On error the review is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` if `next` is not reachable from the current status.
    pub fn moderate(&mut self, next: ReviewStatus) -> Result<(), TransitionError> {
        self.status = self.status.transition(next)?;
        Ok(())
    }

    /// Filled and empty stars for display, e.g. `★★★★☆`.
    #[must_use]
    pub fn stars(&self) -> String {
        let filled = usize::from(self.rating.min(5));
        format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn review(status: ReviewStatus) -> Review {
        Review {
            id: ReviewId::new("rev_1"),
            product_id: ProductId::new("p1"),
            product_name: "Lamp".to_string(),
            author: "Bo".to_string(),
            rating: 4,
            comment: "Bright enough.".to_string(),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_moderate_and_remoderate() {
        let mut review = review(ReviewStatus::Pending);
        review.moderate(ReviewStatus::Approved).unwrap();
        review.moderate(ReviewStatus::Rejected).unwrap();
        assert_eq!(review.status, ReviewStatus::Rejected);
    }

    #[test]
    fn test_cannot_return_to_pending() {
        let mut review = review(ReviewStatus::Approved);
        let err = review.moderate(ReviewStatus::Pending).unwrap_err();
        assert_eq!(err.to_string(), "cannot move review from approved to pending");
        assert_eq!(review.status, ReviewStatus::Approved);
    }

    #[test]
    fn test_stars() {
        assert_eq!(review(ReviewStatus::Pending).stars(), "★★★★☆");
    }
}
