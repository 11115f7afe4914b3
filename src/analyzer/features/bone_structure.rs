//! Bone structure analyzer
//!
//! Scores skeletal proportions and derives how much of the overall
//! appearance is attributed to bone rather than soft tissue.

use super::{ratio, Captures, FeatureAnalyzer};
use crate::analyzer::severity;
use crate::geometry::{clamp, distance_2d, face_scale, relative_variance, round2, round_score};
use crate::landmarks::*;
use crate::{LandmarkSet, Pose, Severity};
use serde::{Deserialize, Serialize};

/// Height-to-width ratio of an ideally proportioned face
const IDEAL_FACE_RATIO: f64 = 1.6;
/// Jaw width as a share of face width
const IDEAL_JAW_RATIO: f64 = 0.70;
const STABILITY_FALLBACK: f64 = 75.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoneStructureResult {
    pub score: u8,
    pub ratio_score: u8,
    pub jaw_score: u8,
    pub cheek_score: u8,
    pub stability_score: u8,
    /// Share of appearance attributed to skeleton (15-40)
    pub bone_factor: u8,
    pub skin_factor: u8,
    pub face_ratio: f64,
    pub jaw_ratio: f64,
    pub severity: Severity,
}

/// Analyzer for facial proportions and cross-pose skeletal stability
pub struct BoneStructureAnalyzer;

impl BoneStructureAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Bony distances (inner eye corners, jaw angles) barely move between
    /// poses; their relative spread measures how stable the detection is.
    fn stability_score(captures: &Captures<'_>) -> f64 {
        let sets: Vec<&LandmarkSet> = Pose::ALL
            .into_iter()
            .filter_map(|pose| captures.usable(pose))
            .collect();
        if sets.len() < 2 {
            return STABILITY_FALLBACK;
        }

        let ipd: Vec<f64> = sets
            .iter()
            .map(|s| distance_2d(s.get(LEFT_EYE_INNER), s.get(RIGHT_EYE_INNER)))
            .collect();
        let jaw: Vec<f64> = sets
            .iter()
            .map(|s| distance_2d(s.get(LEFT_JAW_ANGLE), s.get(RIGHT_JAW_ANGLE)))
            .collect();
        let avg_var = (relative_variance(&ipd) + relative_variance(&jaw)) / 2.0;
        clamp(100.0 - avg_var * 1000.0, 40.0, 100.0)
    }
}

impl Default for BoneStructureAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureAnalyzer for BoneStructureAnalyzer {
    type Output = BoneStructureResult;

    fn name(&self) -> &'static str {
        "bone-structure"
    }

    fn analyze(&self, captures: &Captures<'_>) -> BoneStructureResult {
        let Some((neutral, face_h)) = captures.primary(face_scale) else {
            return self.default_result();
        };

        let face_w = distance_2d(neutral.get(LEFT_EAR), neutral.get(RIGHT_EAR));
        let face_ratio = ratio(face_h, face_w);
        let ratio_score = clamp(100.0 - (face_ratio - IDEAL_FACE_RATIO).abs() * 80.0, 40.0, 100.0);

        let jaw_w = distance_2d(neutral.get(LEFT_JAW_ANGLE), neutral.get(RIGHT_JAW_ANGLE));
        let jaw_ratio = ratio(jaw_w, face_w);
        let jaw_score = clamp(100.0 - (jaw_ratio - IDEAL_JAW_RATIO).abs() * 200.0, 30.0, 100.0);

        // High cheekbones sit wider than the jaw (ratio above ~1.1)
        let cheek_w = distance_2d(neutral.get(LEFT_CHEEKBONE), neutral.get(RIGHT_CHEEKBONE));
        let cheek_jaw = ratio(cheek_w, jaw_w);
        let cheek_score = clamp((cheek_jaw - 0.85) / 0.35 * 100.0, 30.0, 100.0);

        let stability_score = Self::stability_score(captures);

        let structure =
            ratio_score * 0.3 + jaw_score * 0.3 + cheek_score * 0.2 + stability_score * 0.2;

        let bone_factor = round_score(clamp(15.0 + (100.0 - structure) * 0.20, 15.0, 40.0));
        let score = round_score(structure);

        BoneStructureResult {
            score,
            ratio_score: round_score(ratio_score),
            jaw_score: round_score(jaw_score),
            cheek_score: round_score(cheek_score),
            stability_score: round_score(stability_score),
            bone_factor,
            skin_factor: 100 - bone_factor,
            face_ratio: round2(face_ratio),
            jaw_ratio: round2(jaw_ratio),
            severity: severity::BONE_STRUCTURE.classify(structure),
        }
    }

    fn default_result(&self) -> BoneStructureResult {
        BoneStructureResult {
            score: 72,
            ratio_score: 72,
            jaw_score: 68,
            cheek_score: 75,
            stability_score: 75,
            bone_factor: 25,
            skin_factor: 75,
            face_ratio: 1.58,
            jaw_ratio: 0.68,
            severity: severity::BONE_STRUCTURE.classify(72.0),
        }
    }
}
