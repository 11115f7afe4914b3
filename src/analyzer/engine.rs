//! Analysis engine - runs every feature analyzer over a session and scores it

use crate::config::Config;
use crate::session::{LandmarkProvider, Session};
use crate::{AnalysisResult, FeatureResults, Pose, Profile, Score, SkinAgeReport};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::features::{
    BoneStructureAnalyzer, Captures, CheekAnalyzer, ChinSagAnalyzer, FeatureAnalyzer,
    MarionetteAnalyzer, NasolabialAnalyzer, WrinkleAnalyzer,
};
use super::scoring::{ScoringModel, SkinAgeScorer};

/// Main analysis engine that orchestrates all analyzers
pub struct AnalysisEngine {
    model: ScoringModel,
    /// Used when neither the session nor the config carries a profile
    profile: Option<Profile>,
    nasolabial: NasolabialAnalyzer,
    cheek: CheekAnalyzer,
    wrinkle: WrinkleAnalyzer,
    bone: BoneStructureAnalyzer,
    marionette: MarionetteAnalyzer,
    chin: ChinSagAnalyzer,
}

impl AnalysisEngine {
    pub fn new() -> Self {
        Self {
            model: ScoringModel::default(),
            profile: None,
            nasolabial: NasolabialAnalyzer::new(),
            cheek: CheekAnalyzer::new(),
            wrinkle: WrinkleAnalyzer::new(),
            bone: BoneStructureAnalyzer::new(),
            marionette: MarionetteAnalyzer::new(),
            chin: ChinSagAnalyzer::new(),
        }
    }

    pub fn with_model(mut self, model: ScoringModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Run all analyzers over the captured poses
    pub fn feature_results(&self, captures: &Captures<'_>) -> FeatureResults {
        FeatureResults {
            nasolabial: self.nasolabial.analyze(captures),
            cheek: self.cheek.analyze(captures),
            wrinkle: self.wrinkle.analyze(captures),
            bone: self.bone.analyze(captures),
            marionette: Some(self.marionette.analyze(captures)),
            chin: Some(self.chin.analyze(captures)),
        }
    }

    /// Score one set of captures with the engine's model
    pub fn run(&self, provider: &dyn LandmarkProvider, profile: Option<&Profile>) -> SkinAgeReport {
        self.run_with_model(provider, profile, self.model)
    }

    fn run_with_model(
        &self,
        provider: &dyn LandmarkProvider,
        profile: Option<&Profile>,
        model: ScoringModel,
    ) -> SkinAgeReport {
        let captures = Captures::from_provider(provider);
        if captures.usable(Pose::Neutral).is_none() {
            warn!("neutral capture missing or too short; using default results");
        }
        for pose in [Pose::Smile, Pose::Down] {
            if captures.usable(pose).is_none() {
                debug!(%pose, "pose unavailable; dependent metrics use fallbacks");
            }
        }

        let results = self.feature_results(&captures);
        let profile = profile.or(self.profile.as_ref());
        SkinAgeScorer::new(model).calculate(&results, profile)
    }

    /// Load and score a session file
    pub fn analyze(&self, path: &Path, config: Option<&Config>) -> Result<AnalysisResult> {
        let session = Session::load(path)
            .with_context(|| format!("Failed to load session: {}", path.display()))?;

        let model = match config {
            Some(cfg) if cfg.model.is_some() || !cfg.overrides.is_empty() => {
                cfg.effective_for_file(path).model
            }
            _ => self.model,
        };
        // Session profile first, then the engine's, then the config default
        let profile = session
            .profile
            .as_ref()
            .or(self.profile.as_ref())
            .or(config.and_then(|c| c.profile.as_ref()));

        let report = self.run_with_model(&session, profile, model);
        debug!(
            path = %path.display(),
            score = report.score.value,
            %model,
            "session scored"
        );

        Ok(AnalysisResult {
            file_path: path.to_path_buf(),
            usable_poses: Captures::from_provider(&session).usable_poses(),
            report,
        })
    }

    /// Analyze multiple session files sequentially
    pub fn analyze_many(&self, paths: &[PathBuf], config: Option<&Config>) -> Vec<Result<AnalysisResult>> {
        paths.iter().map(|p| self.analyze(p, config)).collect()
    }

    /// Analyze multiple session files in parallel using rayon
    pub fn analyze_parallel(
        &self,
        paths: &[PathBuf],
        config: Option<&Config>,
    ) -> Vec<Result<AnalysisResult>> {
        use rayon::prelude::*;

        paths.par_iter().map(|p| self.analyze(p, config)).collect()
    }

    /// Get aggregate stats from multiple results
    pub fn aggregate_stats(results: &[AnalysisResult]) -> AggregateStats {
        if results.is_empty() {
            return AggregateStats::default();
        }

        let total: u32 = results.iter().map(|r| r.report.score.value as u32).sum();
        let count = results.len() as u32;
        // Rounded half up like every other reported score
        let average = ((total * 2 + count) / (count * 2)) as u8;
        let below_care_threshold = results
            .iter()
            .filter(|r| !r.report.care_plan.is_empty())
            .count();

        AggregateStats {
            sessions_analyzed: results.len(),
            average_score: Score::new(average),
            sessions_with_care_plan: below_care_threshold,
        }
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate statistics from multiple session analyses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateStats {
    pub sessions_analyzed: usize,
    pub average_score: Score,
    /// Sessions with at least one feature weak enough for care suggestions
    pub sessions_with_care_plan: usize,
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self {
            sessions_analyzed: 0,
            average_score: Score::new(0),
            sessions_with_care_plan: 0,
        }
    }
}
