//! Catalog star rating.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Rating`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RatingError {
    /// The value lies outside `0.0..=5.0` or is not a number.
    #[error("rating must be between {min} and {max} (got {value})")]
    OutOfRange {
        /// Rejected value.
        value: f64,
        /// Lowest allowed rating.
        min: f64,
        /// Highest allowed rating.
        max: f64,
    },
}

/// Average star rating of a product, between 0.0 and 5.0 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    /// Lowest allowed rating.
    pub const MIN: f64 = 0.0;
    /// Highest allowed rating.
    pub const MAX: f64 = 5.0;

    /// Create a rating.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::OutOfRange` for values outside `0.0..=5.0` and NaN.
    pub fn new(value: f64) -> Result<Self, RatingError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(RatingError::OutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    /// Get the rating value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Number of fully lit stars (floor of the rating).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // bounded to 0..=5
    pub fn full_stars(&self) -> u8 {
        self.0.floor() as u8
    }
}

impl TryFrom<f64> for Rating {
    type Error = RatingError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_bounds() {
        assert!(Rating::new(0.0).is_ok());
        assert!(Rating::new(5.0).is_ok());
        assert!(Rating::new(4.5).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(Rating::new(-0.1).is_err());
        assert!(Rating::new(5.1).is_err());
        assert!(Rating::new(f64::NAN).is_err());
    }

    #[test]
    fn test_full_stars_and_display() {
        let rating = Rating::new(4.7).unwrap();
        assert_eq!(rating.full_stars(), 4);
        assert_eq!(rating.to_string(), "4.7");
    }

    #[test]
    fn test_serde_rejects_invalid() {
        assert!(serde_json::from_str::<Rating>("4.2").is_ok());
        assert!(serde_json::from_str::<Rating>("7").is_err());
    }
}
