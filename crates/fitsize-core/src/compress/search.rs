//! The two-stage search that fits an encoding under a byte ceiling.
//!
//! Stage 1 walks the width down from the original at a fixed quality until an
//! encoding fits. Stage 2 keeps that width and raises the quality one step at
//! a time, stopping at the first step that no longer fits.
//!
//! Stage 2 assumes encoded size never shrinks as quality rises. Standard JPEG
//! encoders at fixed settings behave that way, but it is not guaranteed, so
//! the returned quality is the highest one reached before the first overshoot
//! rather than a proven optimum over the whole range.

use super::config::shrink_step;
use super::progress::ProgressEvent;
use super::{CancelFlag, CompressError, ProgressSink, SearchParameters, TargetBudget};
use crate::decode::{height_for_width, DecodeError, DecodedImage, ImageResampler, Resampler};
use crate::encode::{JpegQualityEncoder, LossyEncoder};

/// The encoding chosen by a successful search.
#[derive(Debug, Clone)]
pub struct CompressedImage {
    /// Encoded file bytes, no larger than the budget's ceiling.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Quality the bytes were encoded at.
    pub quality: u8,
    /// Encodings performed by the resolution search.
    pub width_trials: u32,
    /// Encodings performed by the quality refinement.
    pub quality_trials: u32,
}

impl CompressedImage {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Stage 1 winner: the candidate and its encoding at the initial quality.
struct Footprint {
    candidate: DecodedImage,
    encoded: Vec<u8>,
    trials: u32,
}

/// Drives a [`LossyEncoder`] and a [`Resampler`] to hit a [`TargetBudget`].
///
/// Holds no state between calls; one instance can serve any number of
/// sequential or concurrent compressions.
#[derive(Debug, Clone, Default)]
pub struct SizeConstrainedEncoder<E = JpegQualityEncoder, R = ImageResampler> {
    encoder: E,
    resampler: R,
    cancel: Option<CancelFlag>,
}

impl SizeConstrainedEncoder {
    /// JPEG output through the `image` crate.
    pub fn jpeg() -> Self {
        Self::default()
    }
}

impl<E: LossyEncoder, R: Resampler> SizeConstrainedEncoder<E, R> {
    pub fn new(encoder: E, resampler: R) -> Self {
        Self {
            encoder,
            resampler,
            cancel: None,
        }
    }

    /// Check `flag` before every trial encoding.
    pub fn with_cancel(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Find the highest-quality encoding of `source` that fits `budget`.
    ///
    /// # Errors
    ///
    /// - `CompressError::UnreachableTarget` when no width down to
    ///   `params.min_width` fits at `params.initial_quality`, including when
    ///   `min_width` is wider than the source.
    /// - `CompressError::Resample` / `CompressError::Encode` as soon as the
    ///   resampler or encoder fails; nothing is retried.
    /// - `CompressError::Cancelled` if the cancel flag was raised.
    pub fn compress(
        &self,
        source: &DecodedImage,
        budget: &TargetBudget,
        params: &SearchParameters,
        progress: &mut dyn ProgressSink,
    ) -> Result<CompressedImage, CompressError> {
        params.validate()?;
        if source.width == 0 || source.height == 0 {
            return Err(DecodeError::InvalidDimensions {
                width: source.width,
                height: source.height,
            }
            .into());
        }

        let footprint = self.find_width(source, budget, params, progress)?;
        let result = self.refine_quality(footprint, budget, params, progress)?;

        log::info!(
            "selected {}x{} at quality {}: {} bytes (ceiling {}, {} encodes)",
            result.width,
            result.height,
            result.quality,
            result.len(),
            budget.byte_ceiling(),
            result.width_trials + result.quality_trials
        );
        progress.report(ProgressEvent::Finished {
            width: result.width,
            quality: result.quality,
            bytes: result.len(),
        });

        Ok(result)
    }

    /// Stage 1: shrink the width at fixed quality until an encoding fits.
    fn find_width(
        &self,
        source: &DecodedImage,
        budget: &TargetBudget,
        params: &SearchParameters,
        progress: &mut dyn ProgressSink,
    ) -> Result<Footprint, CompressError> {
        let quality = params.initial_quality;
        log::info!(
            "resolution search from {}px (min {}px) at quality {}",
            source.width,
            params.min_width,
            quality
        );
        progress.report(ProgressEvent::ResolutionSearch { quality });

        let mut width = source.width;
        let mut trials = 0;
        let mut last_size = None;

        while width >= params.min_width {
            self.check_cancelled()?;

            let height = height_for_width(source.width, source.height, width);
            let candidate = self
                .resampler
                .resample(source, width, height, params.filter)
                .map_err(|source| CompressError::Resample {
                    width,
                    height,
                    source,
                })?;
            let encoded = self.encoder.encode(&candidate, quality)?;
            trials += 1;

            log::debug!("width {}x{} -> {} bytes", width, height, encoded.len());
            progress.report(ProgressEvent::WidthTrial {
                width,
                height,
                bytes: encoded.len(),
            });

            if budget.fits(encoded.len()) {
                return Ok(Footprint {
                    candidate,
                    encoded,
                    trials,
                });
            }

            last_size = Some(encoded.len());
            width = width.saturating_sub(shrink_step(width));
        }

        log::warn!(
            "no width >= {}px fits {} bytes at quality {}",
            params.min_width,
            budget.byte_ceiling(),
            quality
        );
        Err(CompressError::UnreachableTarget {
            target_bytes: budget.byte_ceiling(),
            min_width: params.min_width,
            quality,
            smallest_bytes: last_size,
        })
    }

    /// Stage 2: raise quality at the chosen width while the encoding fits.
    fn refine_quality(
        &self,
        footprint: Footprint,
        budget: &TargetBudget,
        params: &SearchParameters,
        progress: &mut dyn ProgressSink,
    ) -> Result<CompressedImage, CompressError> {
        let Footprint {
            candidate,
            encoded,
            trials: width_trials,
        } = footprint;

        log::info!("quality refinement at {}px", candidate.width);
        progress.report(ProgressEvent::QualityRefinement {
            width: candidate.width,
        });

        let mut best_quality = params.initial_quality;
        let mut best = encoded;
        let mut quality_trials = 0;

        for quality in params.refine_qualities() {
            self.check_cancelled()?;

            let encoded = self.encoder.encode(&candidate, quality)?;
            quality_trials += 1;
            let fits = budget.fits(encoded.len());

            log::debug!("quality {} -> {} bytes", quality, encoded.len());
            progress.report(ProgressEvent::QualityTrial {
                quality,
                bytes: encoded.len(),
                fits,
            });

            if !fits {
                break;
            }
            best_quality = quality;
            best = encoded;
        }

        Ok(CompressedImage {
            data: best,
            width: candidate.width,
            height: candidate.height,
            quality: best_quality,
            width_trials,
            quality_trials,
        })
    }

    fn check_cancelled(&self) -> Result<(), CompressError> {
        match &self.cancel {
            Some(flag) if flag.is_cancelled() => Err(CompressError::Cancelled),
            _ => Ok(()),
        }
    }
}



// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::fakes::*;
    use super::*;
    use crate::compress::NoProgress;
    use proptest::prelude::*;

    proptest! {
        /// Property: a successful result never exceeds the ceiling and is the
        /// highest quality in range that fits at the chosen width.
        #[test]
        fn prop_ceiling_respected_and_quality_maximal(
            width in 600u32..=5000,
            height in 100u32..=5000,
            kb in 10u32..=1000,
            initial_quality in 1u8..=100,
        ) {
            let model = ModelEncoder::new(600, linear_bpp);
            let search = SizeConstrainedEncoder::new(
                ModelEncoder::new(600, linear_bpp),
                DimsResampler::default(),
            );
            let budget = TargetBudget::from_kilobytes(kb).unwrap();
            let params = SearchParameters::default().with_initial_quality(initial_quality);

            match search.compress(&source(width, height), &budget, &params, &mut NoProgress) {
                Ok(result) => {
                    prop_assert!(result.len() as u64 <= budget.byte_ceiling());
                    prop_assert!(result.width >= params.min_width);
                    prop_assert!(result.quality >= initial_quality);
                    for q in (result.quality + 1)..=params.max_quality {
                        prop_assert!(!budget.fits(model.size(result.width, result.height, q)));
                    }
                }
                Err(CompressError::UnreachableTarget { .. }) => {
                    // Every width the shrink policy visits must have overshot.
                    let mut w = width;
                    while w >= params.min_width {
                        let h = height_for_width(width, height, w);
                        prop_assert!(!budget.fits(model.size(w, h, initial_quality)));
                        w = w.saturating_sub(shrink_step(w));
                    }
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }

        /// Property: the resolution search is bounded for any width.
        #[test]
        fn prop_resolution_search_bounded(width in 1u32..=20_000, min_width in 1u32..=2000) {
            let resampler = DimsResampler::default();
            // Header alone is over the 1 KB budget, so nothing ever fits.
            let search = SizeConstrainedEncoder::new(ModelEncoder::new(2000, linear_bpp), resampler);
            let budget = TargetBudget::from_kilobytes(1).unwrap();
            let params = SearchParameters::default().with_min_width(min_width);

            let result = search.compress(&source(width, width / 2 + 1), &budget, &params, &mut NoProgress);

            prop_assert!(result.is_err());
            prop_assert!(search.resampler.calls.borrow().len() <= 120);
        }
    }
}
