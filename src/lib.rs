//! skinage: skin age self-assessment from face-mesh landmarks
//!
//! This library turns the keypoints produced by a face-landmark model into a
//! set of heuristic sub-scores (wrinkles, sagging, folds, bone structure) and
//! combines them into a single "skin age" report.

pub mod analyzer;
pub mod config;
pub mod geometry;
pub mod landmarks;
pub mod reporter;
pub mod session;
pub mod watcher;

pub use analyzer::features::{
    BoneStructureResult, CheekResult, ChinSagResult, MarionetteResult, NasolabialResult,
    WrinkleResult,
};
pub use analyzer::scoring::{CareTier, CareTierKind};
pub use session::{LandmarkProvider, Session, SessionError};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single keypoint from the landmark provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    /// Relative depth proxy, only comparable within one detection call
    #[serde(default)]
    pub z: f64,
}

impl Point {
    pub const ZERO: Point = Point {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Ordered landmark set in the provider's canonical numbering
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Point>,
}

/// `null` entries stand for points the provider did not return
impl<'de> Deserialize<'de> for LandmarkSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let points = Vec::<Option<Point>>::deserialize(deserializer)?;
        Ok(Self::new(
            points.into_iter().map(Option::unwrap_or_default).collect(),
        ))
    }
}

impl LandmarkSet {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A set is usable only when it has more than `MIN_LANDMARKS` entries
    pub fn is_usable(&self) -> bool {
        self.points.len() > landmarks::MIN_LANDMARKS
    }

    /// Point at `index`, or the zero point when the index is missing
    pub fn get(&self, index: usize) -> Point {
        self.points.get(index).copied().unwrap_or(Point::ZERO)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Points for a group of indices, with zero-point fallback
    pub fn select(&self, indices: &[usize]) -> Vec<Point> {
        indices.iter().map(|&i| self.get(i)).collect()
    }
}

impl From<Vec<Point>> for LandmarkSet {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

/// Capture pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pose {
    Neutral,
    Smile,
    /// Looking down / shot from below
    Down,
}

impl Pose {
    pub const ALL: [Pose; 3] = [Pose::Neutral, Pose::Smile, Pose::Down];
}

impl std::fmt::Display for Pose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pose::Neutral => write!(f, "neutral"),
            Pose::Smile => write!(f, "smile"),
            Pose::Down => write!(f, "down"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Other,
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "female" | "f" => Ok(Gender::Female),
            "male" | "m" => Ok(Gender::Male),
            "other" | "x" => Ok(Gender::Other),
            other => Err(format!("unknown gender '{}' (expected female, male or other)", other)),
        }
    }
}

/// Optional user profile used for weight adjustment and relative-age display
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Actual age in years
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    /// Display label for the age (e.g. "40s")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl Profile {
    pub fn is_male(&self) -> bool {
        self.gender == Some(Gender::Male)
    }
}

/// Qualitative severity band derived from a score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Severity {
    pub label: String,
    pub color: String,
    /// 0 (best) to 3 (worst)
    pub level: u8,
}

/// How much of a feature is attributed to soft tissue versus skeleton.
/// The two percentages always sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub skin_contrib: u8,
    pub bone_contrib: u8,
}

impl Contribution {
    pub const fn skin(skin_contrib: u8) -> Self {
        Self {
            skin_contrib,
            bone_contrib: 100 - skin_contrib,
        }
    }
}

/// Total score with grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    /// Numeric score (0-100)
    pub value: u8,
    /// Letter grade (A-E)
    pub grade: Grade,
}

impl Score {
    pub fn new(value: u8) -> Self {
        let value = value.min(100);
        let grade = Grade::from_score(value);
        Self { value, grade }
    }
}

/// Letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            82..=u8::MAX => Grade::A,
            68..=81 => Grade::B,
            54..=67 => Grade::C,
            40..=53 => Grade::D,
            _ => Grade::E,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Grade::A => "Very youthful skin",
            Grade::B => "Skin younger than its years",
            Grade::C => "Skin in line with its age",
            Grade::D => "Care would make a visible difference",
            Grade::E => "Active care recommended",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Grade::A => "#2ecc71",
            Grade::B => "#27ae60",
            Grade::C => "#f39c12",
            Grade::D => "#e67e22",
            Grade::E => "#e74c3c",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::D => write!(f, "D"),
            Grade::E => write!(f, "E"),
        }
    }
}

/// Presented skin age bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u8,
    pub max: u8,
}

impl AgeRange {
    pub fn from_score(score: u8) -> Self {
        let (min, max) = match score {
            90..=u8::MAX => (18, 23),
            82..=89 => (24, 28),
            74..=81 => (29, 34),
            65..=73 => (35, 42),
            54..=64 => (43, 50),
            42..=53 => (51, 58),
            _ => (59, 70),
        };
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min as f64 + self.max as f64) / 2.0
    }
}

impl std::fmt::Display for AgeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgeComparison {
    LooksYounger,
    AboutRight,
    LooksOlder,
}

impl AgeComparison {
    /// `diff` is actual age minus estimated midpoint
    pub fn from_diff(diff: i32) -> Self {
        if diff > 1 {
            AgeComparison::LooksYounger
        } else if diff < -1 {
            AgeComparison::LooksOlder
        } else {
            AgeComparison::AboutRight
        }
    }
}

impl std::fmt::Display for AgeComparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgeComparison::LooksYounger => write!(f, "looks younger"),
            AgeComparison::AboutRight => write!(f, "about right"),
            AgeComparison::LooksOlder => write!(f, "looks older"),
        }
    }
}

/// Comparison of the estimated skin age against the user's actual age
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeAge {
    /// Actual age minus the age-range midpoint (positive = looks younger)
    pub diff: i32,
    pub age_midpoint: u8,
    pub actual_age: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_label: Option<String>,
    pub comparison: AgeComparison,
}

/// Displayed facial features, in top-of-face to bottom-of-face order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureKey {
    Glabellar,
    Eyelid,
    CrowFeet,
    UnderEye,
    Nasolabial,
    CheekSag,
    Elasticity,
    SmileWrinkle,
    Marionette,
    Chin,
    JawLine,
}

impl FeatureKey {
    /// Fixed display order
    pub const ALL: [FeatureKey; 11] = [
        FeatureKey::Glabellar,
        FeatureKey::Eyelid,
        FeatureKey::CrowFeet,
        FeatureKey::UnderEye,
        FeatureKey::Nasolabial,
        FeatureKey::CheekSag,
        FeatureKey::Elasticity,
        FeatureKey::SmileWrinkle,
        FeatureKey::Marionette,
        FeatureKey::Chin,
        FeatureKey::JawLine,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FeatureKey::Glabellar => "Frown lines",
            FeatureKey::Eyelid => "Eyelid droop",
            FeatureKey::CrowFeet => "Crow's feet",
            FeatureKey::UnderEye => "Under-eye",
            FeatureKey::Nasolabial => "Nasolabial folds",
            FeatureKey::CheekSag => "Cheek sagging",
            FeatureKey::Elasticity => "Skin elasticity",
            FeatureKey::SmileWrinkle => "Smile lines",
            FeatureKey::Marionette => "Marionette lines",
            FeatureKey::Chin => "Chin sagging",
            FeatureKey::JawLine => "Jawline",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            FeatureKey::Glabellar => "🧐",
            FeatureKey::Eyelid => "👁️",
            FeatureKey::CrowFeet => "🌟",
            FeatureKey::UnderEye => "✨",
            FeatureKey::Nasolabial => "👄",
            FeatureKey::CheekSag => "💫",
            FeatureKey::Elasticity => "🌸",
            FeatureKey::SmileWrinkle => "😊",
            FeatureKey::Marionette => "🎤",
            FeatureKey::Chin => "🪴",
            FeatureKey::JawLine => "🔷",
        }
    }
}

impl std::fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self {
            FeatureKey::Glabellar => "glabellar",
            FeatureKey::Eyelid => "eyelid",
            FeatureKey::CrowFeet => "crow-feet",
            FeatureKey::UnderEye => "under-eye",
            FeatureKey::Nasolabial => "nasolabial",
            FeatureKey::CheekSag => "cheek-sag",
            FeatureKey::Elasticity => "elasticity",
            FeatureKey::SmileWrinkle => "smile-wrinkle",
            FeatureKey::Marionette => "marionette",
            FeatureKey::Chin => "chin",
            FeatureKey::JawLine => "jaw-line",
        };
        write!(f, "{}", key)
    }
}

/// One per-feature display entry of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureEntry {
    pub key: FeatureKey,
    pub name: String,
    pub icon: String,
    pub score: u8,
    pub severity: Severity,
    #[serde(flatten)]
    pub contribution: Contribution,
    /// Outlook sentence (chin only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlook: Option<String>,
}

/// Raw analyzer records that fed the aggregate score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureResults {
    pub nasolabial: NasolabialResult,
    pub cheek: CheekResult,
    pub wrinkle: WrinkleResult,
    pub bone: BoneStructureResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marionette: Option<MarionetteResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chin: Option<ChinSagResult>,
}

/// Aggregate result of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinAgeReport {
    /// Total score (0-100) with letter grade
    pub score: Score,
    pub grade_description: String,
    pub age_range: AgeRange,
    /// Share attributed to skeletal structure (percent)
    pub bone_factor: u8,
    /// Share attributed to skin and soft tissue (always 100 - bone_factor)
    pub skin_factor: u8,
    /// Per-feature entries in display order
    pub features: Vec<FeatureEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_age: Option<RelativeAge>,
    /// Suggested care tiers for the weaker features
    #[serde(default)]
    pub care_plan: Vec<CareTier>,
    pub raw: FeatureResults,
}

impl SkinAgeReport {
    pub fn feature(&self, key: FeatureKey) -> Option<&FeatureEntry> {
        self.features.iter().find(|f| f.key == key)
    }
}

/// Result of analyzing one session file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Path to the analyzed session file
    pub file_path: PathBuf,
    /// Poses that carried a usable landmark set
    pub usable_poses: Vec<Pose>,
    #[serde(flatten)]
    pub report: SkinAgeReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_from_score() {
        assert_eq!(Grade::from_score(100), Grade::A);
        assert_eq!(Grade::from_score(82), Grade::A);
        assert_eq!(Grade::from_score(81), Grade::B);
        assert_eq!(Grade::from_score(68), Grade::B);
        assert_eq!(Grade::from_score(67), Grade::C);
        assert_eq!(Grade::from_score(54), Grade::C);
        assert_eq!(Grade::from_score(53), Grade::D);
        assert_eq!(Grade::from_score(40), Grade::D);
        assert_eq!(Grade::from_score(39), Grade::E);
        assert_eq!(Grade::from_score(0), Grade::E);
    }

    #[test]
    fn test_age_range_thresholds() {
        assert_eq!(AgeRange::from_score(95), AgeRange { min: 18, max: 23 });
        assert_eq!(AgeRange::from_score(90), AgeRange { min: 18, max: 23 });
        assert_eq!(AgeRange::from_score(89), AgeRange { min: 24, max: 28 });
        assert_eq!(AgeRange::from_score(82), AgeRange { min: 24, max: 28 });
        assert_eq!(AgeRange::from_score(74), AgeRange { min: 29, max: 34 });
        assert_eq!(AgeRange::from_score(73), AgeRange { min: 35, max: 42 });
        assert_eq!(AgeRange::from_score(65), AgeRange { min: 35, max: 42 });
        assert_eq!(AgeRange::from_score(54), AgeRange { min: 43, max: 50 });
        assert_eq!(AgeRange::from_score(42), AgeRange { min: 51, max: 58 });
        assert_eq!(AgeRange::from_score(41), AgeRange { min: 59, max: 70 });
        assert_eq!(AgeRange::from_score(0), AgeRange { min: 59, max: 70 });
    }

    #[test]
    fn test_null_landmark_reads_as_zero_point() {
        let set: LandmarkSet =
            serde_json::from_str(r#"[{"x":1,"y":2,"z":3}, null, {"x":4,"y":5}]"#).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(1), Point::ZERO);
        assert_eq!(set.get(2), Point::new(4.0, 5.0, 0.0));
        assert_eq!(serde_json::to_string(&set).unwrap().matches("null").count(), 0);
    }

    #[test]
    fn test_score_82_is_grade_a_and_mid_twenties() {
        let score = Score::new(82);
        assert_eq!(score.grade, Grade::A);
        assert_eq!(AgeRange::from_score(score.value).to_string(), "24-28");
    }

    #[test]
    fn test_age_comparison_buckets() {
        assert_eq!(AgeComparison::from_diff(5), AgeComparison::LooksYounger);
        assert_eq!(AgeComparison::from_diff(2), AgeComparison::LooksYounger);
        assert_eq!(AgeComparison::from_diff(1), AgeComparison::AboutRight);
        assert_eq!(AgeComparison::from_diff(0), AgeComparison::AboutRight);
        assert_eq!(AgeComparison::from_diff(-1), AgeComparison::AboutRight);
        assert_eq!(AgeComparison::from_diff(-2), AgeComparison::LooksOlder);
    }

    #[test]
    fn test_landmark_set_missing_index_is_zero_point() {
        let set = LandmarkSet::new(vec![Point::new(1.0, 2.0, 3.0)]);
        assert_eq!(set.get(0), Point::new(1.0, 2.0, 3.0));
        assert_eq!(set.get(500), Point::ZERO);
        assert!(!set.is_usable());
    }

    #[test]
    fn test_landmark_set_usable_threshold() {
        assert!(!LandmarkSet::new(vec![Point::ZERO; 400]).is_usable());
        assert!(LandmarkSet::new(vec![Point::ZERO; 401]).is_usable());
        assert!(LandmarkSet::new(vec![Point::ZERO; 468]).is_usable());
    }

    #[test]
    fn test_point_z_defaults_to_zero() {
        let p: Point = serde_json::from_str(r#"{"x": 1.5, "y": 2.5, "name": "lips"}"#).unwrap();
        assert_eq!(p, Point::new(1.5, 2.5, 0.0));
    }

    #[test]
    fn test_contribution_sums_to_100() {
        let c = Contribution::skin(85);
        assert_eq!(c.skin_contrib, 85);
        assert_eq!(c.bone_contrib, 15);
    }

    #[test]
    fn test_gender_from_str() {
        assert_eq!("Male".parse::<Gender>(), Ok(Gender::Male));
        assert_eq!("f".parse::<Gender>(), Ok(Gender::Female));
        assert!("robot".parse::<Gender>().is_err());
    }
}
