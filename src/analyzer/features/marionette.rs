//! Marionette line analyzer
//!
//! Lines running from the mouth corners toward the chin show up as jowl
//! tissue sitting low relative to the mouth and as depth irregularity in
//! the jowl region.

use super::{Captures, FeatureAnalyzer};
use crate::analyzer::severity;
use crate::geometry::{clamp, face_scale, mean_y, round_score, variance, z_values};
use crate::landmarks::{LEFT_JOWL, LEFT_MOUTH, RIGHT_JOWL, RIGHT_MOUTH};
use crate::{Contribution, LandmarkSet, Pose, Severity};
use serde::{Deserialize, Serialize};

/// Jowl drop below the mouth corners that still counts as no line
const DROP_ONSET: f64 = 0.07;
/// Normalized jowl z-variance that scores 0
const DEEP_GROOVE_VARIANCE: f64 = 0.0007;
const GRAVITY_FALLBACK: f64 = 75.0;
const CONTRIBUTION: Contribution = Contribution::skin(80);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarionetteResult {
    pub score: u8,
    pub sag_score: u8,
    pub depth_score: u8,
    pub gravity_score: u8,
    pub severity: Severity,
    #[serde(flatten)]
    pub contribution: Contribution,
}

/// Analyzer for marionette lines
pub struct MarionetteAnalyzer;

impl MarionetteAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Average jowl drop below the mouth corners, in face heights
    fn jowl_drop(set: &LandmarkSet, face_h: f64) -> f64 {
        let left = mean_y(&set.select(&LEFT_JOWL)) - set.get(LEFT_MOUTH).y;
        let right = mean_y(&set.select(&RIGHT_JOWL)) - set.get(RIGHT_MOUTH).y;
        (left + right) / 2.0 / face_h
    }
}

impl Default for MarionetteAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureAnalyzer for MarionetteAnalyzer {
    type Output = MarionetteResult;

    fn name(&self) -> &'static str {
        "marionette"
    }

    fn analyze(&self, captures: &Captures<'_>) -> MarionetteResult {
        let Some((neutral, face_h)) = captures.primary(face_scale) else {
            return self.default_result();
        };

        let drop = Self::jowl_drop(neutral, face_h);
        let sag_score = clamp(100.0 - (drop - DROP_ONSET).max(0.0) / 0.12 * 100.0, 0.0, 100.0);

        let left_var = variance(&z_values(&neutral.select(&LEFT_JOWL)));
        let right_var = variance(&z_values(&neutral.select(&RIGHT_JOWL)));
        let norm_var = (left_var + right_var) / 2.0 / (face_h * face_h);
        let depth_score = clamp(100.0 - norm_var / DEEP_GROOVE_VARIANCE * 100.0, 0.0, 100.0);

        // Face height stays the neutral one so both poses share a scale
        let gravity_score = match captures.usable(Pose::Down) {
            Some(down) => {
                let down_drop = Self::jowl_drop(down, face_h);
                clamp(100.0 - (down_drop - DROP_ONSET).max(0.0) / 0.15 * 100.0, 0.0, 100.0)
            }
            None => GRAVITY_FALLBACK,
        };

        let score = round_score(sag_score * 0.45 + depth_score * 0.35 + gravity_score * 0.20);

        MarionetteResult {
            score,
            sag_score: round_score(sag_score),
            depth_score: round_score(depth_score),
            gravity_score: round_score(gravity_score),
            severity: severity::MARIONETTE.classify(f64::from(score)),
            contribution: CONTRIBUTION,
        }
    }

    fn default_result(&self) -> MarionetteResult {
        MarionetteResult {
            score: 68,
            sag_score: 68,
            depth_score: 68,
            gravity_score: 68,
            severity: severity::MARIONETTE.classify(68.0),
            contribution: CONTRIBUTION,
        }
    }
}
