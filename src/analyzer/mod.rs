//! Analyzer module - feature analyzers, aggregate scoring and the session engine

pub mod engine;
pub mod features;
pub mod scoring;
pub mod severity;

pub use engine::{AggregateStats, AnalysisEngine};
pub use features::{Captures, FeatureAnalyzer};
pub use scoring::{ScoringModel, ScoringWeights, SkinAgeScorer};
