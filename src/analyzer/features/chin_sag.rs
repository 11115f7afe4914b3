//! Chin and jaw sagging analyzer
//!
//! Uses the neutral pose for jaw width and jawline contour, and the
//! downward (bottom-up) pose to expose gravity-driven sag.

use super::{ratio, Captures, FeatureAnalyzer};
use crate::analyzer::severity;
use crate::geometry::{
    clamp, distance_2d, face_scale_3d, round2, round_score, variance, z_values,
};
use crate::landmarks::{LEFT_JAWLINE, LEFT_JAW_MID, RIGHT_JAWLINE, RIGHT_JAW_MID};
use crate::{Contribution, LandmarkSet, Pose, Severity};
use serde::{Deserialize, Serialize};

const FALLBACK_SCORE: f64 = 65.0;
/// Jawline z-variance of a sharply contoured jaw
const SHARP_CONTOUR_VARIANCE: f64 = 0.0015;
const CONTRIBUTION: Contribution = Contribution::skin(65);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChinSagResult {
    pub score: u8,
    pub jaw_sharp_score: u8,
    pub contour_score: u8,
    pub gravity_score: u8,
    /// Jaw width over face height; absent when the capture was unusable
    pub jaw_ratio: Option<f64>,
    pub severity: Severity,
    /// Short outlook sentence for the score band
    pub outlook: String,
    #[serde(flatten)]
    pub contribution: Contribution,
}

/// Analyzer for chin / jawline sagging
pub struct ChinSagAnalyzer;

impl ChinSagAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn outlook(score: u8) -> &'static str {
        match severity::CHIN.level(f64::from(score)) {
            0 => "Low risk of sagging",
            1 => "Worth watching over the next few years",
            2 => "Sagging is progressing",
            _ => "Early care recommended",
        }
    }

    fn jaw_ratio(set: &LandmarkSet, face_h: f64) -> f64 {
        let jaw_w = distance_2d(set.get(LEFT_JAW_MID), set.get(RIGHT_JAW_MID));
        ratio(jaw_w, face_h)
    }

    fn build(score: u8, jaw_sharp: f64, contour: f64, gravity: f64, jaw_ratio: Option<f64>) -> ChinSagResult {
        ChinSagResult {
            score,
            jaw_sharp_score: round_score(jaw_sharp),
            contour_score: round_score(contour),
            gravity_score: round_score(gravity),
            jaw_ratio,
            severity: severity::CHIN.classify(f64::from(score)),
            outlook: Self::outlook(score).to_string(),
            contribution: CONTRIBUTION,
        }
    }
}

impl Default for ChinSagAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureAnalyzer for ChinSagAnalyzer {
    type Output = ChinSagResult;

    fn name(&self) -> &'static str {
        "chin-sag"
    }

    fn analyze(&self, captures: &Captures<'_>) -> ChinSagResult {
        let Some((neutral, face_h)) = captures.primary(face_scale_3d) else {
            return self.default_result();
        };

        // A sagging jaw widens relative to face height; 0.5-0.68 is typical
        let jaw_ratio = Self::jaw_ratio(neutral, face_h);
        let jaw_sharp = clamp(100.0 - (jaw_ratio - 0.50).max(0.0) / 0.30 * 80.0, 0.0, 100.0);

        // A defined jawline has more depth variation than a flattened one
        let mut jaw_points = neutral.select(&LEFT_JAWLINE);
        jaw_points.extend(neutral.select(&RIGHT_JAWLINE));
        let z_var = variance(&z_values(&jaw_points));
        let contour = clamp(z_var / SHARP_CONTOUR_VARIANCE * 100.0, 0.0, 100.0);

        let gravity = match captures.usable(Pose::Down) {
            Some(down) => {
                let down_h = match face_scale_3d(down) {
                    h if h > 0.0 => h,
                    _ => 1.0,
                };
                let sag_diff = Self::jaw_ratio(down, down_h) - jaw_ratio;
                clamp(100.0 - sag_diff.max(0.0) / 0.15 * 100.0, 0.0, 100.0)
            }
            None => FALLBACK_SCORE,
        };

        let score = round_score(jaw_sharp * 0.40 + contour * 0.30 + gravity * 0.30);
        Self::build(score, jaw_sharp, contour, gravity, Some(round2(jaw_ratio)))
    }

    fn default_result(&self) -> ChinSagResult {
        Self::build(65, FALLBACK_SCORE, FALLBACK_SCORE, FALLBACK_SCORE, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::features::test_support::{collapsed_face, face, short_set, SyntheticFace};
    use crate::landmarks::{LEFT_JAWLINE, RIGHT_JAWLINE};

    #[test]
    fn test_narrow_jaw_is_sharp() {
        let set = face();
        let r = ChinSagAnalyzer::new().analyze(&Captures::neutral(&set));
        // 120 / 320 = 0.375, below the 0.5 onset
        assert_eq!(r.jaw_sharp_score, 100);
        assert_eq!(r.jaw_ratio, Some(0.38));
        assert_eq!(r.gravity_score, 65);
    }

    #[test]
    fn test_flat_jawline_has_no_contour() {
        let set = face();
        let r = ChinSagAnalyzer::new().analyze(&Captures::neutral(&set));
        assert_eq!(r.contour_score, 0);
    }

    #[test]
    fn test_rippled_jawline_raises_contour() {
        let mut face = SyntheticFace::new();
        face.ripple_z(&LEFT_JAWLINE, 0.03).ripple_z(&RIGHT_JAWLINE, 0.03);
        let set = face.build();
        let r = ChinSagAnalyzer::new().analyze(&Captures::neutral(&set));
        // variance 0.0009 -> 60
        assert_eq!(r.contour_score, 60);
    }

    #[test]
    fn test_wide_jaw_lowers_sharpness() {
        let set = SyntheticFace::new()
            .set(LEFT_JAW_MID, 180.0, 370.0)
            .set(RIGHT_JAW_MID, 420.0, 370.0)
            .build();
        let r = ChinSagAnalyzer::new().analyze(&Captures::neutral(&set));
        // 240 / 320 = 0.75 -> 100 - 0.25 / 0.30 * 80 = 33.3
        assert_eq!(r.jaw_sharp_score, 33);
    }

    #[test]
    fn test_down_pose_widening_reduces_gravity_score() {
        let neutral = face();
        let down = SyntheticFace::new()
            .set(LEFT_JAW_MID, 228.0, 370.0)
            .set(RIGHT_JAW_MID, 372.0, 370.0)
            .build();
        let r = ChinSagAnalyzer::new().analyze(&Captures::neutral(&neutral).with_down(&down));
        // ratio 144/320 - 120/320 = 0.075 -> half of the 0.15 scale
        assert_eq!(r.gravity_score, 50);
    }

    #[test]
    fn test_narrowing_on_down_pose_is_not_penalized() {
        let neutral = face();
        let down = SyntheticFace::new()
            .set(LEFT_JAW_MID, 250.0, 370.0)
            .set(RIGHT_JAW_MID, 350.0, 370.0)
            .build();
        let r = ChinSagAnalyzer::new().analyze(&Captures::neutral(&neutral).with_down(&down));
        assert_eq!(r.gravity_score, 100);
    }

    #[test]
    fn test_default_result_has_no_jaw_ratio() {
        let set = collapsed_face();
        let analyzer = ChinSagAnalyzer::new();
        let r = analyzer.analyze(&Captures::neutral(&set));
        assert_eq!(r, analyzer.default_result());
        assert_eq!(r.score, 65);
        assert_eq!(r.jaw_ratio, None);
        assert_eq!(r.outlook, "Worth watching over the next few years");
    }

    #[test]
    fn test_outlook_follows_bands() {
        assert_eq!(ChinSagAnalyzer::outlook(90), "Low risk of sagging");
        assert_eq!(ChinSagAnalyzer::outlook(50), "Sagging is progressing");
        assert_eq!(ChinSagAnalyzer::outlook(10), "Early care recommended");
    }

    #[test]
    fn test_short_or_missing_neutral_returns_default() {
        let analyzer = ChinSagAnalyzer::new();
        let short = short_set();
        assert_eq!(analyzer.analyze(&Captures::neutral(&short)), analyzer.default_result());
        assert_eq!(analyzer.analyze(&Captures::default()), analyzer.default_result());

        // a usable down pose alone is not enough
        let set = face();
        let down_only = Captures::default().with_down(&set);
        assert_eq!(analyzer.analyze(&down_only), analyzer.default_result());
    }

    #[test]
    fn test_severity_tracks_rounded_score() {
        let r = ChinSagAnalyzer::new().default_result();
        assert_eq!(r.severity, severity::CHIN.classify(f64::from(r.score)));
    }
}
