//! Eye-area wrinkle analyzer
//!
//! Surface irregularity (z-variance) around the eyes and between the brows
//! stands in for wrinkle depth. The smile capture exposes expression lines
//! at the outer eye corners, and eyelid openness tracks upper-lid droop.

use super::{Captures, FeatureAnalyzer};
use crate::analyzer::severity;
use crate::geometry::{clamp, distance_2d, face_scale, mean_y, round_score, variance, z_values};
use crate::landmarks::*;
use crate::{Contribution, LandmarkSet, Pose, Severity};
use serde::{Deserialize, Serialize};

/// Normalized z-variance at which each metric reaches 0
const CROW_FEET_SCALE: f64 = 0.0008;
const UNDER_EYE_SCALE: f64 = 0.0010;
const SMILE_SCALE: f64 = 0.0012;
const GLABELLA_SCALE: f64 = 0.0006;
/// Brow height difference (share of face height) that scores 0
const BROW_ASYMMETRY_SCALE: f64 = 0.03;
/// Lid opening over eye width: droopy at 0.15, fully open at 0.32
const EYELID_MIN_OPENNESS: f64 = 0.15;
const EYELID_OPENNESS_RANGE: f64 = 0.17;

const SMILE_FALLBACK: f64 = 75.0;
const EYELID_FALLBACK: f64 = 72.0;
const CONTRIBUTION: Contribution = Contribution::skin(85);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrinkleResult {
    pub score: u8,
    pub crow_feet_score: u8,
    pub under_eye_score: u8,
    pub smile_wrinkle_score: u8,
    pub glabellar_score: u8,
    pub eyelid_score: u8,
    /// Crow's feet on the image-left eye
    pub left_score: u8,
    pub right_score: u8,
    pub severity: Severity,
    #[serde(flatten)]
    pub contribution: Contribution,
}

/// Analyzer for crow's feet, under-eye texture, frown lines and eyelid droop
pub struct WrinkleAnalyzer;

impl WrinkleAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn patch_variance(set: &LandmarkSet, indices: &[usize], face_h: f64) -> f64 {
        variance(&z_values(&set.select(indices))) / (face_h * face_h)
    }

    fn smoothness(norm_var: f64, scale: f64) -> f64 {
        clamp(100.0 - norm_var / scale * 100.0, 0.0, 100.0)
    }

    fn glabellar_score(set: &LandmarkSet, face_h: f64) -> f64 {
        let depth = Self::smoothness(Self::patch_variance(set, &GLABELLA, face_h), GLABELLA_SCALE);
        let brow_diff =
            (mean_y(&set.select(&LEFT_BROW)) - mean_y(&set.select(&RIGHT_BROW))).abs() / face_h;
        let symmetry = clamp(100.0 - brow_diff / BROW_ASYMMETRY_SCALE * 100.0, 0.0, 100.0);
        depth * 0.7 + symmetry * 0.3
    }

    /// Lid opening relative to eye width, or None for a zero-width eye
    fn openness(set: &LandmarkSet, outer: usize, inner: usize, upper: usize, lower: usize) -> Option<f64> {
        let width = distance_2d(set.get(outer), set.get(inner));
        if width == 0.0 {
            return None;
        }
        Some((set.get(lower).y - set.get(upper).y).abs() / width)
    }

    fn eyelid_score(set: &LandmarkSet) -> f64 {
        let left = Self::openness(set, LEFT_EYE_OUTER, LEFT_EYE_INNER, LEFT_UPPER_LID, LEFT_LOWER_LID);
        let right =
            Self::openness(set, RIGHT_EYE_OUTER, RIGHT_EYE_INNER, RIGHT_UPPER_LID, RIGHT_LOWER_LID);
        match (left, right) {
            (Some(l), Some(r)) => clamp(
                ((l + r) / 2.0 - EYELID_MIN_OPENNESS) / EYELID_OPENNESS_RANGE * 100.0,
                0.0,
                100.0,
            ),
            _ => EYELID_FALLBACK,
        }
    }
}

impl Default for WrinkleAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureAnalyzer for WrinkleAnalyzer {
    type Output = WrinkleResult;

    fn name(&self) -> &'static str {
        "wrinkle"
    }

    fn analyze(&self, captures: &Captures<'_>) -> WrinkleResult {
        let Some((neutral, face_h)) = captures.primary(face_scale) else {
            return self.default_result();
        };

        let left_var = Self::patch_variance(neutral, &LEFT_CROW_FEET, face_h);
        let right_var = Self::patch_variance(neutral, &RIGHT_CROW_FEET, face_h);
        let crow_feet = Self::smoothness((left_var + right_var) / 2.0, CROW_FEET_SCALE);

        let under_var = (Self::patch_variance(neutral, &LEFT_UNDER_EYE, face_h)
            + Self::patch_variance(neutral, &RIGHT_UNDER_EYE, face_h))
            / 2.0;
        let under_eye = Self::smoothness(under_var, UNDER_EYE_SCALE);

        // Neutral face height keeps both captures on one scale
        let smile_wrinkle = match captures.usable(Pose::Smile) {
            Some(smile) => {
                let smile_var = (Self::patch_variance(smile, &LEFT_CROW_FEET, face_h)
                    + Self::patch_variance(smile, &RIGHT_CROW_FEET, face_h))
                    / 2.0;
                Self::smoothness(smile_var, SMILE_SCALE)
            }
            None => SMILE_FALLBACK,
        };

        let glabellar = Self::glabellar_score(neutral, face_h);
        let eyelid = Self::eyelid_score(neutral);

        let total = crow_feet * 0.35
            + under_eye * 0.20
            + smile_wrinkle * 0.15
            + glabellar * 0.20
            + eyelid * 0.10;
        let score = round_score(total);

        WrinkleResult {
            score,
            crow_feet_score: round_score(crow_feet),
            under_eye_score: round_score(under_eye),
            smile_wrinkle_score: round_score(smile_wrinkle),
            glabellar_score: round_score(glabellar),
            eyelid_score: round_score(eyelid),
            left_score: round_score(Self::smoothness(left_var, CROW_FEET_SCALE)),
            right_score: round_score(Self::smoothness(right_var, CROW_FEET_SCALE)),
            severity: severity::WRINKLE.classify(total),
            contribution: CONTRIBUTION,
        }
    }

    fn default_result(&self) -> WrinkleResult {
        WrinkleResult {
            score: 72,
            crow_feet_score: 72,
            under_eye_score: 72,
            smile_wrinkle_score: 72,
            glabellar_score: 72,
            eyelid_score: 72,
            left_score: 72,
            right_score: 72,
            severity: severity::WRINKLE.classify(72.0),
            contribution: CONTRIBUTION,
        }
    }
}
