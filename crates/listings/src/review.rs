use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use carlot_core::{DomainError, DomainResult, ReviewId};

/// A buyer review embedded in a listing.
///
/// Authorship is recorded by username; only the author may update the review,
/// and only an admin may delete one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    /// Author username (exact, case-sensitive).
    pub user: String,
    pub review_text: String,
    pub rating: u8,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(user: impl Into<String>, review_text: impl Into<String>, rating: u8) -> DomainResult<Self> {
        let review_text = review_text.into();
        validate_review(&review_text, rating)?;
        Ok(Self {
            id: ReviewId::new(),
            user: user.into(),
            review_text,
            rating,
            created_at: Utc::now(),
        })
    }

    pub fn is_authored_by(&self, username: &str) -> bool {
        self.user == username
    }
}

/// Shared validation for create and update: non-empty text, rating 1..=5.
pub fn validate_review(review_text: &str, rating: u8) -> DomainResult<()> {
    if review_text.trim().is_empty() {
        return Err(DomainError::validation("review_text must not be empty"));
    }
    if !(1..=5).contains(&rating) {
        return Err(DomainError::validation("rating must be an integer from 1 to 5"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_review_is_created() {
        let review = Review::new("alice", "runs great", 5).unwrap();
        assert!(review.is_authored_by("alice"));
        assert!(!review.is_authored_by("Alice"));
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        assert!(Review::new("alice", "meh", 0).is_err());
        assert!(Review::new("alice", "meh", 6).is_err());
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(Review::new("alice", "   ", 3).is_err());
    }
}
