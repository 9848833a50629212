//! Statistical senses
//!
//! A sense is an independent relationship detector. The [`SenseEngine`] runs a
//! fixed, ordered registry of them over one variable pair and returns one
//! [`SenseResult`] per registered sense, in registration order. Senses never
//! fail: a sense whose preconditions are unmet reports a weak result whose
//! description says why.

mod chi_square;
mod cross_correlation;
mod mutual_information;
mod spearman;
mod temporal;
mod welch;

pub use chi_square::ChiSquareSense;
pub use cross_correlation::CrossCorrelationSense;
pub use mutual_information::MutualInformationSense;
pub use spearman::SpearmanSense;
pub use temporal::TemporalSense;
pub use welch::WelchTTestSense;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::types::{SenseResult, Signal, VariableKey};

/// Auxiliary per-sample data some senses can use
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SenseContext {
    /// One timestamp per sample
    pub timestamps: Vec<DateTime<Utc>>,
    pub metadata: Map<String, Value>,
}

impl SenseContext {
    pub fn with_timestamps(timestamps: Vec<DateTime<Utc>>) -> Self {
        Self {
            timestamps,
            metadata: Map::new(),
        }
    }
}

/// Common contract of every sense
pub trait StatisticalSense: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> String;

    fn analyze(&self, x: &[f64], y: &[f64], var_x: &VariableKey, var_y: &VariableKey)
        -> SenseResult;

    /// Whether the sense compares groups rather than paired series
    fn requires_groups(&self) -> bool {
        false
    }

    /// Context-aware analysis; senses that ignore context keep this default
    fn analyze_with_context(
        &self,
        x: &[f64],
        y: &[f64],
        var_x: &VariableKey,
        var_y: &VariableKey,
        _context: Option<&SenseContext>,
    ) -> SenseResult {
        self.analyze(x, y, var_x, var_y)
    }
}

/// The built-in senses, in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SenseKind {
    MutualInformation,
    WelchTTest,
    ChiSquare,
    Spearman,
    CrossCorrelation,
    Temporal,
}

impl SenseKind {
    pub const REGISTRY: [SenseKind; 6] = [
        SenseKind::MutualInformation,
        SenseKind::WelchTTest,
        SenseKind::ChiSquare,
        SenseKind::Spearman,
        SenseKind::CrossCorrelation,
        SenseKind::Temporal,
    ];

    /// Registered name; the temporal sense is suffixed with its time unit
    pub fn sense_name(&self, config: &EngineConfig) -> String {
        match self {
            SenseKind::MutualInformation => mutual_information::NAME.to_string(),
            SenseKind::WelchTTest => welch::NAME.to_string(),
            SenseKind::ChiSquare => chi_square::NAME.to_string(),
            SenseKind::Spearman => spearman::NAME.to_string(),
            SenseKind::CrossCorrelation => cross_correlation::NAME.to_string(),
            SenseKind::Temporal => TemporalSense::name_for(&config.temporal_time_unit),
        }
    }

    pub fn build(&self, config: &EngineConfig) -> Box<dyn StatisticalSense> {
        let alpha = config.significance_level;
        match self {
            SenseKind::MutualInformation => {
                Box::new(MutualInformationSense::new(config.mutual_information_k, alpha))
            }
            SenseKind::WelchTTest => Box::new(WelchTTestSense::new(alpha)),
            SenseKind::ChiSquare => Box::new(ChiSquareSense::new(alpha)),
            SenseKind::Spearman => Box::new(SpearmanSense::new(config.spearman_ties, alpha)),
            SenseKind::CrossCorrelation => Box::new(CrossCorrelationSense::new(
                config.cross_correlation_max_lag,
                alpha,
            )),
            SenseKind::Temporal => {
                Box::new(TemporalSense::new(config.temporal_time_unit.clone(), alpha))
            }
        }
    }
}

/// Runs the sense registry over variable pairs
pub struct SenseEngine {
    senses: Vec<Box<dyn StatisticalSense>>,
    parallel: bool,
}

impl std::fmt::Debug for SenseEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SenseEngine")
            .field("senses", &self.available_senses())
            .field("parallel", &self.parallel)
            .finish()
    }
}

impl Default for SenseEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl SenseEngine {
    /// Engine over the built-in registry
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            senses: SenseKind::REGISTRY.iter().map(|kind| kind.build(config)).collect(),
            parallel: config.parallel_senses,
        }
    }

    /// Engine over a caller-supplied registry, kept in the given order
    pub fn with_senses(senses: Vec<Box<dyn StatisticalSense>>, parallel: bool) -> Self {
        Self { senses, parallel }
    }

    pub fn len(&self) -> usize {
        self.senses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senses.is_empty()
    }

    /// Registered names in registration order
    pub fn available_senses(&self) -> Vec<String> {
        self.senses.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn analyze_all(
        &self,
        x: &[f64],
        y: &[f64],
        var_x: &VariableKey,
        var_y: &VariableKey,
    ) -> Vec<SenseResult> {
        self.analyze_all_with_context(x, y, var_x, var_y, None)
    }

    /// Run every sense; result `i` always belongs to registered sense `i`
    pub fn analyze_all_with_context(
        &self,
        x: &[f64],
        y: &[f64],
        var_x: &VariableKey,
        var_y: &VariableKey,
        context: Option<&SenseContext>,
    ) -> Vec<SenseResult> {
        debug!(
            var_x = %var_x,
            var_y = %var_y,
            sense_count = self.senses.len(),
            parallel = self.parallel,
            "dispatching senses"
        );

        let mut results = vec![SenseResult::default(); self.senses.len()];
        let run = |(slot, sense): (&mut SenseResult, &Box<dyn StatisticalSense>)| {
            *slot = sense.analyze_with_context(x, y, var_x, var_y, context);
            trace!(sense = sense.name(), p_value = slot.p_value, "sense finished");
        };

        if self.parallel {
            results.par_iter_mut().zip(self.senses.par_iter()).for_each(run);
        } else {
            results.iter_mut().zip(self.senses.iter()).for_each(run);
        }
        results
    }

    /// Run one sense by name; `None` if no sense has that name
    pub fn analyze_single(
        &self,
        name: &str,
        x: &[f64],
        y: &[f64],
        var_x: &VariableKey,
        var_y: &VariableKey,
    ) -> Option<SenseResult> {
        self.analyze_single_with_context(name, x, y, var_x, var_y, None)
    }

    pub fn analyze_single_with_context(
        &self,
        name: &str,
        x: &[f64],
        y: &[f64],
        var_x: &VariableKey,
        var_y: &VariableKey,
        context: Option<&SenseContext>,
    ) -> Option<SenseResult> {
        self.senses
            .iter()
            .find(|sense| sense.name() == name)
            .map(|sense| sense.analyze_with_context(x, y, var_x, var_y, context))
    }
}

/// Pairs where both values are finite; `None` when the lengths differ
pub(crate) fn finite_pairs(x: &[f64], y: &[f64]) -> Option<(Vec<f64>, Vec<f64>)> {
    if x.len() != y.len() {
        return None;
    }
    Some(
        x.iter()
            .zip(y)
            .filter(|(a, b)| a.is_finite() && b.is_finite())
            .map(|(a, b)| (*a, *b))
            .unzip(),
    )
}

/// Signal for a magnitude against `[very_strong, strong, moderate]` cut-offs
///
/// Anything not significant at `alpha` is weak.
pub(crate) fn classify_signal(magnitude: f64, p_value: f64, alpha: f64, bands: [f64; 3]) -> Signal {
    if p_value > alpha {
        return Signal::Weak;
    }
    if magnitude > bands[0] {
        Signal::VeryStrong
    } else if magnitude > bands[1] {
        Signal::Strong
    } else if magnitude > bands[2] {
        Signal::Moderate
    } else {
        Signal::Weak
    }
}
