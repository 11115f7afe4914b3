//! Nasolabial fold analyzer
//!
//! Longer folds (nostril to mouth corner) and folds sitting deeper than
//! the surrounding cheek surface score lower. Neutral pose only.

use super::{ratio, Captures, FeatureAnalyzer};
use crate::analyzer::severity;
use crate::geometry::{clamp, distance_2d, face_scale, mean, round_half_up, round_score, z_values};
use crate::landmarks::*;
use crate::{Contribution, LandmarkSet, Severity};
use serde::{Deserialize, Serialize};

/// Fold length (share of face height) at which the length metric starts dropping
const LENGTH_ONSET: f64 = 0.17;
const LENGTH_RANGE: f64 = 0.14;
/// Fold depth below the cheek (share of face height) that scores 0
const DEPTH_SCALE: f64 = 0.06;
const CONTRIBUTION: Contribution = Contribution::skin(75);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NasolabialResult {
    pub score: u8,
    pub left_score: u8,
    pub right_score: u8,
    /// Left/right length difference as a percentage of the mean length
    pub asymmetry: u8,
    pub normalized_length: f64,
    pub normalized_depth: f64,
    pub severity: Severity,
    #[serde(flatten)]
    pub contribution: Contribution,
}

struct Fold {
    nostril: usize,
    mouth: usize,
    mid: usize,
    cheek_ref: [usize; 3],
}

const LEFT_FOLD: Fold = Fold {
    nostril: LEFT_NOSTRIL,
    mouth: LEFT_MOUTH,
    mid: LEFT_FOLD_MID,
    cheek_ref: LEFT_CHEEK_UPPER,
};

const RIGHT_FOLD: Fold = Fold {
    nostril: RIGHT_NOSTRIL,
    mouth: RIGHT_MOUTH,
    mid: RIGHT_FOLD_MID,
    cheek_ref: RIGHT_CHEEK_UPPER,
};

impl Fold {
    fn length(&self, set: &LandmarkSet, face_h: f64) -> f64 {
        distance_2d(set.get(self.nostril), set.get(self.mouth)) / face_h
    }

    fn depth(&self, set: &LandmarkSet) -> f64 {
        let cheek_z = mean(&z_values(&set.select(&self.cheek_ref)));
        (set.get(self.mid).z - cheek_z).abs()
    }
}

/// Analyzer for nasolabial folds
pub struct NasolabialAnalyzer;

impl NasolabialAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn length_score(length: f64) -> f64 {
        clamp(100.0 - (length - LENGTH_ONSET) / LENGTH_RANGE * 100.0, 0.0, 100.0)
    }
}

impl Default for NasolabialAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureAnalyzer for NasolabialAnalyzer {
    type Output = NasolabialResult;

    fn name(&self) -> &'static str {
        "nasolabial"
    }

    fn analyze(&self, captures: &Captures<'_>) -> NasolabialResult {
        let Some((neutral, face_h)) = captures.primary(face_scale) else {
            return self.default_result();
        };

        let left_len = LEFT_FOLD.length(neutral, face_h);
        let right_len = RIGHT_FOLD.length(neutral, face_h);
        let avg_len = (left_len + right_len) / 2.0;
        let length_score = Self::length_score(avg_len);

        let avg_depth = (LEFT_FOLD.depth(neutral) + RIGHT_FOLD.depth(neutral)) / 2.0;
        let normalized_depth = avg_depth / face_h;
        let depth_score = clamp(100.0 - normalized_depth / DEPTH_SCALE * 100.0, 0.0, 100.0);

        let total = length_score * 0.5 + depth_score * 0.5;
        let score = round_score(total);
        let asymmetry = round_half_up(ratio((right_len - left_len).abs(), avg_len) * 100.0);

        NasolabialResult {
            score,
            left_score: round_score(Self::length_score(left_len)),
            right_score: round_score(Self::length_score(right_len)),
            asymmetry: clamp(asymmetry, 0.0, 255.0) as u8,
            normalized_length: avg_len,
            normalized_depth,
            severity: severity::NASOLABIAL.classify(total),
            contribution: CONTRIBUTION,
        }
    }

    fn default_result(&self) -> NasolabialResult {
        NasolabialResult {
            score: 65,
            left_score: 65,
            right_score: 65,
            asymmetry: 5,
            normalized_length: 0.23,
            normalized_depth: 0.02,
            severity: severity::NASOLABIAL.classify(65.0),
            contribution: CONTRIBUTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::features::test_support::{collapsed_face, face, short_set, SyntheticFace};

    #[test]
    fn test_short_shallow_folds_score_full() {
        let set = face();
        let r = NasolabialAnalyzer::new().analyze(&Captures::neutral(&set));
        // sqrt(15^2 + 50^2) / 320 = 0.163, under the onset
        assert_eq!(r.score, 100);
        assert_eq!(r.left_score, 100);
        assert_eq!(r.right_score, 100);
        assert_eq!(r.asymmetry, 0);
        assert_eq!(r.normalized_depth, 0.0);
        assert_eq!(r.severity.level, 0);
    }

    #[test]
    fn test_long_fold_on_one_side() {
        let set = SyntheticFace::new().set(LEFT_MOUTH, 270.0, 350.0).build();
        let r = NasolabialAnalyzer::new().analyze(&Captures::neutral(&set));
        // left 0.2237, right 0.1631
        assert_eq!(r.left_score, 62);
        assert_eq!(r.right_score, 100);
        assert_eq!(r.asymmetry, 31);
        assert_eq!(r.score, 92);
    }

    #[test]
    fn test_deep_folds_lower_score() {
        let mut face = SyntheticFace::new();
        face.set_z(LEFT_FOLD_MID, -9.6).set_z(RIGHT_FOLD_MID, -9.6);
        let set = face.build();
        let r = NasolabialAnalyzer::new().analyze(&Captures::neutral(&set));
        // depth 0.03 is half the scale
        assert!((r.normalized_depth - 0.03).abs() < 1e-9);
        assert_eq!(r.score, 75);
        assert_eq!(r.severity.level, 1);
    }

    #[test]
    fn test_depth_is_relative_to_cheek() {
        let mut face = SyntheticFace::new();
        // whole region shifted forward keeps the fold flush with the cheek
        for &i in LEFT_CHEEK_UPPER.iter().chain(&RIGHT_CHEEK_UPPER) {
            face.set_z(i, 5.0);
        }
        face.set_z(LEFT_FOLD_MID, 5.0).set_z(RIGHT_FOLD_MID, 5.0);
        let set = face.build();
        let r = NasolabialAnalyzer::new().analyze(&Captures::neutral(&set));
        assert_eq!(r.normalized_depth, 0.0);
    }

    #[test]
    fn test_unusable_input_returns_default() {
        let analyzer = NasolabialAnalyzer::new();
        let short = short_set();
        let collapsed = collapsed_face();
        for set in [&short, &collapsed] {
            let r = analyzer.analyze(&Captures::neutral(set));
            assert_eq!(r, analyzer.default_result());
        }
        let r = analyzer.default_result();
        assert_eq!(r.score, 65);
        assert_eq!(r.asymmetry, 5);
        assert_eq!(r.contribution.bone_contrib, 25);
    }

    #[test]
    fn test_severity_uses_unrounded_total() {
        let mut face = SyntheticFace::new();
        face.set_z(LEFT_FOLD_MID, -7.84).set_z(RIGHT_FOLD_MID, -7.84);
        let set = face.build();
        let r = NasolabialAnalyzer::new().analyze(&Captures::neutral(&set));
        // depth 0.0245 -> 59.17, total 79.58
        assert_eq!(r.score, 80);
        assert_eq!(r.severity.level, 1);
        assert_eq!(r.severity.label, "Faint");
    }
}
