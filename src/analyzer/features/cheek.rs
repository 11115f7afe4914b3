//! Cheek sagging and elasticity analyzer
//!
//! Compares the lower-cheek position across the neutral, smile and
//! downward poses.

use super::{Captures, FeatureAnalyzer};
use crate::analyzer::severity;
use crate::geometry::{clamp, face_scale, mean_y, round_score};
use crate::landmarks::{FOREHEAD, LEFT_CHEEK_LOWER, RIGHT_CHEEK_LOWER};
use crate::{Contribution, LandmarkSet, Pose, Severity};
use serde::{Deserialize, Serialize};

const SUB_METRIC_FALLBACK: f64 = 75.0;
/// Lift of the lower cheek on smiling that scores 100 (share of face height)
const FULL_SMILE_LIFT: f64 = 0.07;
const CONTRIBUTION: Contribution = Contribution::skin(70);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheekResult {
    pub score: u8,
    pub sag_score: u8,
    pub elasticity_score: u8,
    pub gravity_sag_score: u8,
    /// Lower-cheek height as a share of face height (0 = forehead, 1 = chin)
    pub cheek_position: f64,
    pub severity: Severity,
    #[serde(flatten)]
    pub contribution: Contribution,
}

/// Analyzer for cheek sagging
pub struct CheekAnalyzer;

impl CheekAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Mean lower-cheek y for the left and right side
    fn lower_cheek_y(set: &LandmarkSet) -> (f64, f64) {
        (
            mean_y(&set.select(&LEFT_CHEEK_LOWER)),
            mean_y(&set.select(&RIGHT_CHEEK_LOWER)),
        )
    }
}

impl Default for CheekAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureAnalyzer for CheekAnalyzer {
    type Output = CheekResult;

    fn name(&self) -> &'static str {
        "cheek"
    }

    fn analyze(&self, captures: &Captures<'_>) -> CheekResult {
        let Some((neutral, face_h)) = captures.primary(face_scale) else {
            return self.default_result();
        };

        let (left_y, right_y) = Self::lower_cheek_y(neutral);
        let cheek_position = ((left_y + right_y) / 2.0 - neutral.get(FOREHEAD).y) / face_h;
        // Youthful cheeks sit around 0.55-0.60, sagging ones at 0.62-0.70
        let sag_score = clamp(100.0 - (cheek_position - 0.50) / 0.22 * 100.0, 0.0, 100.0);

        let elasticity_score = match captures.usable(Pose::Smile) {
            Some(smile) => {
                let (smile_left, smile_right) = Self::lower_cheek_y(smile);
                let lift = ((left_y - smile_left) / face_h + (right_y - smile_right) / face_h) / 2.0;
                clamp(lift / FULL_SMILE_LIFT * 100.0, 0.0, 100.0)
            }
            None => SUB_METRIC_FALLBACK,
        };

        let gravity_sag_score = match captures.usable(Pose::Down) {
            Some(down) => {
                let (down_left, down_right) = Self::lower_cheek_y(down);
                let drop = ((down_left - left_y) / face_h + (down_right - right_y) / face_h) / 2.0;
                clamp(100.0 - drop / 0.10 * 100.0, 0.0, 100.0)
            }
            None => SUB_METRIC_FALLBACK,
        };

        let total = sag_score * 0.4 + elasticity_score * 0.35 + gravity_sag_score * 0.25;
        let score = round_score(total);

        CheekResult {
            score,
            sag_score: round_score(sag_score),
            elasticity_score: round_score(elasticity_score),
            gravity_sag_score: round_score(gravity_sag_score),
            cheek_position,
            severity: severity::CHEEK.classify(total),
            contribution: CONTRIBUTION,
        }
    }

    fn default_result(&self) -> CheekResult {
        CheekResult {
            score: 70,
            sag_score: 70,
            elasticity_score: 70,
            gravity_sag_score: 70,
            cheek_position: 0.57,
            severity: severity::CHEEK.classify(70.0),
            contribution: CONTRIBUTION,
        }
    }
}
