//! hypo-stats-core: statistical briefs and relationship analysis
//!
//! This crate turns numeric samples into statistical briefs, runs primary
//! hypothesis tests between variable pairs, and fans a fixed registry of
//! relationship-detection senses out over rayon.

pub mod brief;
pub mod config;
pub mod distributions;
pub mod errors;
pub mod relationship;
pub mod senses;
pub mod types;

pub use brief::BriefComputer;
pub use config::{EngineConfig, TieMethod};
pub use errors::{StatsError, StatsResult};
pub use relationship::RelationshipEngine;
pub use senses::{SenseContext, SenseEngine, SenseKind, StatisticalSense};
pub use types::*;
