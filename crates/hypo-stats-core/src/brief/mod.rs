//! Statistical briefs
//!
//! A brief summarises one numeric sample. Summary, shape and quality are
//! always computed; the categorical, temporal and validation sections are
//! populated according to the [`ComputationRequest`] flags.
//!
//! NaN and infinite values count as missing: they feed the missing ratio and
//! are excluded from every other statistic.

mod categorical;
mod labels;
mod quality;
mod shape;
mod summary;
mod temporal;
mod validation;

pub use categorical::compute_categorical;
pub use quality::compute_quality;
pub use shape::compute_distribution;
pub use summary::compute_summary;
pub use temporal::compute_temporal;
pub use validation::compute_validation;

pub(crate) use categorical::{distinct_count, format_significant};
pub(crate) use summary::{mean, median_of, sample_variance};

use crate::errors::{StatsError, StatsResult};
use crate::types::{ComputationRequest, StatisticalBrief};
use tracing::debug;

/// Computes [`StatisticalBrief`]s; stateless and safe to share across threads
#[derive(Debug, Clone, Copy, Default)]
pub struct BriefComputer;

impl BriefComputer {
    pub fn new() -> Self {
        Self
    }

    /// Compute a brief for `data`
    ///
    /// # Errors
    /// `StatsError::EmptyInput` when `data` is empty (after `sample_limit`).
    pub fn compute_brief(
        &self,
        data: &[f64],
        field_key: &str,
        source: &str,
        request: &ComputationRequest,
    ) -> StatsResult<StatisticalBrief> {
        let data = match request.sample_limit {
            Some(limit) if limit > 0 && limit < data.len() => &data[..limit],
            _ => data,
        };
        if data.is_empty() {
            return Err(StatsError::EmptyInput { field: "data" });
        }

        let finite: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        let mut brief = StatisticalBrief::new(field_key, source, data.len(), request);

        brief.summary = compute_summary(&finite);
        brief.distribution = compute_distribution(&finite);
        brief.quality = compute_quality(data, &finite, &brief.summary);

        if request.wants_extended() {
            if categorical::should_profile(&finite) {
                brief.categorical = Some(compute_categorical(&finite));
            }
            if request.for_validation || request.for_hypothesis {
                brief.temporal = Some(compute_temporal(&finite));
            }
        }

        if request.for_validation {
            brief.validation = Some(compute_validation(
                &brief.distribution,
                &brief.quality,
                brief.categorical.as_ref(),
                brief.temporal.as_ref(),
            ));
        }

        debug!(
            field_key,
            sample_size = brief.sample_size,
            missing = data.len() - finite.len(),
            categorical = brief.categorical.is_some(),
            temporal = brief.temporal.is_some(),
            "brief computed"
        );

        Ok(brief)
    }
}
