//! Budget and tuning parameters for the size search.

use serde::{Deserialize, Serialize};

use super::CompressError;
use crate::decode::FilterType;

/// Default fixed quality for the resolution search.
pub const DEFAULT_INITIAL_QUALITY: u8 = 75;

/// Default narrowest width the resolution search may reach.
pub const DEFAULT_MIN_WIDTH: u32 = 600;

/// Highest quality the refinement stage will try.
pub const MAX_REFINE_QUALITY: u8 = 95;

/// Smallest width decrement in the resolution search, in pixels.
pub const MIN_SHRINK_STEP: u32 = 50;

/// Target output size.
///
/// Built once from kilobytes; the byte ceiling never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetBudget {
    kilobytes: u32,
}

impl TargetBudget {
    /// Create a budget of `kilobytes` KiB.
    ///
    /// # Errors
    ///
    /// Returns `CompressError::InvalidParameters` when `kilobytes` is zero.
    pub fn from_kilobytes(kilobytes: u32) -> Result<Self, CompressError> {
        if kilobytes == 0 {
            return Err(CompressError::InvalidParameters(
                "target size must be greater than 0 KB".to_string(),
            ));
        }
        Ok(Self { kilobytes })
    }

    pub fn kilobytes(&self) -> u32 {
        self.kilobytes
    }

    /// Maximum number of bytes an accepted encoding may have.
    pub fn byte_ceiling(&self) -> u64 {
        self.kilobytes as u64 * 1024
    }

    /// Whether an encoded buffer of `len` bytes fits.
    pub fn fits(&self, len: usize) -> bool {
        len as u64 <= self.byte_ceiling()
    }
}

/// Caller-tunable knobs of the two-stage search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParameters {
    /// Quality used while searching for a width (1-100).
    pub initial_quality: u8,
    /// Narrowest width the resolution search may try.
    pub min_width: u32,
    /// Upper end of the quality refinement range.
    pub max_quality: u8,
    /// Resampling filter for candidates.
    pub filter: FilterType,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            initial_quality: DEFAULT_INITIAL_QUALITY,
            min_width: DEFAULT_MIN_WIDTH,
            max_quality: MAX_REFINE_QUALITY,
            filter: FilterType::Lanczos3,
        }
    }
}

impl SearchParameters {
    pub fn with_initial_quality(mut self, quality: u8) -> Self {
        self.initial_quality = quality;
        self
    }

    pub fn with_min_width(mut self, min_width: u32) -> Self {
        self.min_width = min_width;
        self
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Check ranges. `min_width` larger than the image is not an error here;
    /// the search reports it as an unreachable target.
    pub fn validate(&self) -> Result<(), CompressError> {
        if !(1..=100).contains(&self.initial_quality) {
            return Err(CompressError::InvalidParameters(format!(
                "initial quality must be between 1 and 100, got {}",
                self.initial_quality
            )));
        }
        if self.min_width == 0 {
            return Err(CompressError::InvalidParameters(
                "minimum width must be greater than 0".to_string(),
            ));
        }
        if !(1..=100).contains(&self.max_quality) {
            return Err(CompressError::InvalidParameters(format!(
                "maximum quality must be between 1 and 100, got {}",
                self.max_quality
            )));
        }
        Ok(())
    }

    /// Qualities the refinement stage may try, in ascending order.
    ///
    /// Empty when `initial_quality >= max_quality`.
    pub fn refine_qualities(&self) -> std::ops::RangeInclusive<u8> {
        self.initial_quality.saturating_add(1)..=self.max_quality
    }
}

/// Width decrement after a trial at `width` overshoots the budget.
pub fn shrink_step(width: u32) -> u32 {
    MIN_SHRINK_STEP.max(width / 20)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_ceiling() {
        let budget = TargetBudget::from_kilobytes(200).unwrap();
        assert_eq!(budget.byte_ceiling(), 204_800);
        assert!(budget.fits(204_800));
        assert!(!budget.fits(204_801));
    }

    #[test]
    fn test_budget_rejects_zero() {
        assert!(matches!(
            TargetBudget::from_kilobytes(0),
            Err(CompressError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_default_parameters() {
        let params = SearchParameters::default();
        assert_eq!(params.initial_quality, 75);
        assert_eq!(params.min_width, 600);
        assert_eq!(params.max_quality, 95);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_quality() {
        let params = SearchParameters::default().with_initial_quality(0);
        assert!(params.validate().is_err());

        let params = SearchParameters::default().with_initial_quality(101);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_min_width() {
        let params = SearchParameters::default().with_min_width(0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_refine_qualities() {
        let params = SearchParameters::default();
        assert_eq!(params.refine_qualities().count(), 20);
        assert_eq!(params.refine_qualities().next(), Some(76));
        assert_eq!(params.refine_qualities().last(), Some(95));
    }

    #[test]
    fn test_refine_qualities_empty_at_top() {
        let params = SearchParameters::default().with_initial_quality(96);
        assert_eq!(params.refine_qualities().count(), 0);

        let params = SearchParameters::default().with_initial_quality(95);
        assert_eq!(params.refine_qualities().count(), 0);

        let params = SearchParameters::default().with_initial_quality(100);
        assert_eq!(params.refine_qualities().count(), 0);
    }

    #[test]
    fn test_shrink_step() {
        assert_eq!(shrink_step(600), 50);
        assert_eq!(shrink_step(1000), 50);
        assert_eq!(shrink_step(1019), 50);
        assert_eq!(shrink_step(1020), 51);
        assert_eq!(shrink_step(3000), 150);
        assert_eq!(shrink_step(4000), 200);
    }

    #[test]
    fn test_parameters_from_partial_json() {
        let params: SearchParameters =
            serde_json::from_str(r#"{ "min_width": 800, "filter": "bilinear" }"#).unwrap();
        assert_eq!(params.min_width, 800);
        assert_eq!(params.initial_quality, 75);
        assert_eq!(params.filter, FilterType::Bilinear);
    }
}
