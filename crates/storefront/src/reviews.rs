//! Per-product customer reviews.
//!
//! Reviews live only for the lifetime of the process; they are not part of
//! the persisted state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use shopfront_core::{ProductId, ReviewId, UserId};

use crate::auth::User;

/// Lowest star count a review may give.
pub const MIN_STARS: u8 = 1;
/// Highest star count a review may give.
pub const MAX_STARS: u8 = 5;

/// Reasons a review is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("sign in to write a review")]
    NotAuthenticated,

    #[error("rating must be between 1 and 5 stars (got {0})")]
    InvalidRating(u8),

    #[error("review comment cannot be empty")]
    EmptyComment,
}

/// A customer review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub username: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Reviews grouped by product, newest first.
#[derive(Debug, Default)]
pub struct ReviewBoard {
    by_product: HashMap<ProductId, Vec<Review>>,
}

impl ReviewBoard {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a review as `user`.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError` if nobody is signed in, the rating is outside
    /// 1..=5, or the trimmed comment is empty.
    pub fn add_review(
        &mut self,
        product_id: &ProductId,
        user: Option<&User>,
        rating: u8,
        comment: &str,
    ) -> Result<Review, ReviewError> {
        let user = user.ok_or(ReviewError::NotAuthenticated)?;
        if !(MIN_STARS..=MAX_STARS).contains(&rating) {
            return Err(ReviewError::InvalidRating(rating));
        }
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(ReviewError::EmptyComment);
        }

        let review = Review {
            id: ReviewId::new(Uuid::new_v4().to_string()),
            product_id: product_id.clone(),
            user_id: user.id.clone(),
            username: user.username.clone(),
            rating,
            comment: comment.to_owned(),
            created_at: Utc::now(),
        };
        info!(review_id = %review.id, %product_id, rating, "Review posted");

        self.by_product
            .entry(product_id.clone())
            .or_default()
            .insert(0, review.clone());
        Ok(review)
    }

    /// Reviews for `product_id`, newest first.
    #[must_use]
    pub fn reviews(&self, product_id: &ProductId) -> &[Review] {
        self.by_product
            .get(product_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of reviews for `product_id`.
    #[must_use]
    pub fn count(&self, product_id: &ProductId) -> usize {
        self.reviews(product_id).len()
    }

    /// Mean star rating for `product_id`, or 0.0 with no reviews.
    #[must_use]
    pub fn average_rating(&self, product_id: &ProductId) -> f64 {
        let reviews = self.reviews(product_id);
        if reviews.is_empty() {
            return 0.0;
        }
        let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
        #[allow(clippy::cast_precision_loss)] // review counts stay far below f64 precision
        let count = reviews.len() as f64;
        f64::from(sum) / count
    }
}
