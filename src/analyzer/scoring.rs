//! Aggregate skin-age scoring

use crate::analyzer::features::{ChinSagAnalyzer, FeatureAnalyzer, MarionetteAnalyzer};
use crate::analyzer::severity::{self, SeverityScale};
use crate::geometry::round_half_up;
use crate::{
    AgeComparison, AgeRange, Contribution, FeatureEntry, FeatureKey, FeatureResults, Profile,
    RelativeAge, Score, Severity, SkinAgeReport,
};
use serde::{Deserialize, Serialize};

/// Features scoring below this get care suggestions
pub const CARE_THRESHOLD: u8 = 75;

/// Weight table version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringModel {
    /// Eleven display factors
    #[default]
    Extended,
    /// Four analyzer totals
    Compact,
}

impl std::str::FromStr for ScoringModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "extended" => Ok(ScoringModel::Extended),
            "compact" => Ok(ScoringModel::Compact),
            other => Err(format!("unknown scoring model '{}' (expected extended or compact)", other)),
        }
    }
}

impl std::fmt::Display for ScoringModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringModel::Extended => write!(f, "extended"),
            ScoringModel::Compact => write!(f, "compact"),
        }
    }
}

/// Integer weight percentages; the active ones sum to 100.
/// The compact table only uses `nasolabial`, `cheek_total`, `wrinkle_total` and `bone`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringWeights {
    pub nasolabial: u8,
    pub marionette: u8,
    pub chin: u8,
    pub cheek_sag: u8,
    pub crow_feet: u8,
    pub glabellar: u8,
    pub eyelid: u8,
    pub bone: u8,
    pub elasticity: u8,
    pub under_eye: u8,
    pub smile_wrinkle: u8,
    pub cheek_total: u8,
    pub wrinkle_total: u8,
}

impl ScoringWeights {
    pub fn for_model(model: ScoringModel) -> Self {
        match model {
            ScoringModel::Extended => Self {
                nasolabial: 13,
                marionette: 11,
                chin: 10,
                cheek_sag: 14,
                crow_feet: 10,
                glabellar: 10,
                eyelid: 8,
                bone: 9,
                elasticity: 7,
                under_eye: 4,
                smile_wrinkle: 4,
                ..Self::default()
            },
            ScoringModel::Compact => Self {
                nasolabial: 28,
                cheek_total: 28,
                wrinkle_total: 22,
                bone: 22,
                ..Self::default()
            },
        }
    }

    /// Weights for a model, shifted toward bone structure for male profiles
    pub fn for_profile(model: ScoringModel, profile: Option<&Profile>) -> Self {
        let mut weights = Self::for_model(model);
        if model == ScoringModel::Extended && profile.is_some_and(Profile::is_male) {
            weights.bone += 2;
            weights.eyelid -= 2;
            weights.crow_feet += 1;
            weights.cheek_sag -= 1;
        }
        weights
    }

    pub fn sum(&self) -> u32 {
        [
            self.nasolabial,
            self.marionette,
            self.chin,
            self.cheek_sag,
            self.crow_feet,
            self.glabellar,
            self.eyelid,
            self.bone,
            self.elasticity,
            self.under_eye,
            self.smile_wrinkle,
            self.cheek_total,
            self.wrinkle_total,
        ]
        .iter()
        .map(|&w| w as u32)
        .sum()
    }

    /// Weighted total, rounded half up
    pub fn calculate_total(&self, r: &FeatureResults) -> u8 {
        let marionette = marionette_score(r);
        let chin = chin_score(r);
        let weighted_sum = [
            (r.nasolabial.score, self.nasolabial),
            (marionette, self.marionette),
            (chin, self.chin),
            (r.cheek.sag_score, self.cheek_sag),
            (r.wrinkle.crow_feet_score, self.crow_feet),
            (r.wrinkle.glabellar_score, self.glabellar),
            (r.wrinkle.eyelid_score, self.eyelid),
            (r.bone.score, self.bone),
            (r.cheek.elasticity_score, self.elasticity),
            (r.wrinkle.under_eye_score, self.under_eye),
            (r.wrinkle.smile_wrinkle_score, self.smile_wrinkle),
            (r.cheek.score, self.cheek_total),
            (r.wrinkle.score, self.wrinkle_total),
        ]
        .iter()
        .map(|&(score, weight)| score as u32 * weight as u32)
        .sum::<u32>();
        ((weighted_sum + 50) / 100).min(100) as u8
    }
}

fn marionette_score(r: &FeatureResults) -> u8 {
    r.marionette
        .as_ref()
        .map_or_else(|| MarionetteAnalyzer::new().default_result().score, |m| m.score)
}

fn chin_score(r: &FeatureResults) -> u8 {
    r.chin
        .as_ref()
        .map_or_else(|| ChinSagAnalyzer::new().default_result().score, |c| c.score)
}

/// Which care tier a suggestion belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CareTierKind {
    Home,
    Professional,
    Medical,
}

impl CareTierKind {
    pub fn label(self) -> &'static str {
        match self {
            CareTierKind::Home => "Home care",
            CareTierKind::Professional => "Professional care",
            CareTierKind::Medical => "Medical treatment",
        }
    }

    pub fn cost(self) -> &'static str {
        match self {
            CareTierKind::Home => "3,000-15,000 JPY per month",
            CareTierKind::Professional => "5,000-30,000 JPY per session",
            CareTierKind::Medical => "30,000-200,000 JPY per session",
        }
    }

    pub fn timeline(self) -> &'static str {
        match self {
            CareTierKind::Home => "Visible results in 3-6 months",
            CareTierKind::Professional => "Improvement within 1-3 months",
            CareTierKind::Medical => "Results within days to weeks",
        }
    }
}

/// One tier of care suggestions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareTier {
    pub kind: CareTierKind,
    pub label: String,
    pub cost: String,
    pub timeline: String,
    pub items: Vec<String>,
}

impl CareTier {
    fn new(kind: CareTierKind, items: Vec<&str>) -> Self {
        let mut deduped: Vec<String> = Vec::with_capacity(items.len());
        for item in items {
            if !deduped.iter().any(|i| i == item) {
                deduped.push(item.to_string());
            }
        }
        Self {
            kind,
            label: kind.label().to_string(),
            cost: kind.cost().to_string(),
            timeline: kind.timeline().to_string(),
            items: deduped,
        }
    }
}

/// Care tiers for the features scoring below `CARE_THRESHOLD`.
/// Empty when no feature is weak.
pub fn care_plan(features: &[FeatureEntry]) -> Vec<CareTier> {
    let weak: Vec<FeatureKey> = features
        .iter()
        .filter(|f| f.score < CARE_THRESHOLD)
        .map(|f| f.key)
        .collect();
    if weak.is_empty() {
        return Vec::new();
    }

    let folds = weak.contains(&FeatureKey::Nasolabial);
    let cheeks = weak
        .iter()
        .any(|k| matches!(k, FeatureKey::CheekSag | FeatureKey::Elasticity));
    let wrinkles = weak.iter().any(|k| {
        matches!(
            k,
            FeatureKey::CrowFeet | FeatureKey::SmileWrinkle | FeatureKey::UnderEye | FeatureKey::Glabellar
        )
    });

    let mut home = vec!["SPF50+ sunscreen (daily)", "Moisturizer (morning and night)"];
    let mut professional = Vec::new();
    let mut medical = Vec::new();

    if folds {
        home.extend(["Facial massage along the folds", "Retinol cream"]);
        professional.extend(["EMS facial", "Radiofrequency lift"]);
        medical.extend(["Hyaluronic acid filler", "Thread lift"]);
    }
    if cheeks {
        home.extend(["Collagen and elastin supplements", "Facial exercises"]);
        professional.extend(["HIFU", "Electroporation"]);
        medical.extend(["Thermage", "Surgical lift"]);
    }
    if wrinkles {
        home.extend(["Eye cream (retinol, peptides)", "Low-friction skincare"]);
        professional.extend(["Microneedling", "LED light therapy"]);
        medical.extend(["Botox (eye corners)", "Fractional laser"]);
    }

    [
        CareTier::new(CareTierKind::Home, home),
        CareTier::new(CareTierKind::Professional, professional),
        CareTier::new(CareTierKind::Medical, medical),
    ]
    .into_iter()
    .filter(|tier| !tier.items.is_empty())
    .collect()
}

/// Combines analyzer records into the aggregate report
pub struct SkinAgeScorer {
    model: ScoringModel,
}

impl SkinAgeScorer {
    pub fn new(model: ScoringModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> ScoringModel {
        self.model
    }

    pub fn calculate(&self, results: &FeatureResults, profile: Option<&Profile>) -> SkinAgeReport {
        let weights = ScoringWeights::for_profile(self.model, profile);
        let score = Score::new(weights.calculate_total(results));
        let age_range = AgeRange::from_score(score.value);
        let bone_factor = results.bone.bone_factor;
        let features = Self::feature_entries(results);
        let care_plan = care_plan(&features);

        SkinAgeReport {
            score,
            grade_description: score.grade.description().to_string(),
            age_range,
            bone_factor,
            skin_factor: 100 - bone_factor,
            features,
            relative_age: profile.and_then(|p| Self::relative_age(p, age_range)),
            care_plan,
            raw: results.clone(),
        }
    }

    /// Present only for a profile carrying a positive age
    fn relative_age(profile: &Profile, age_range: AgeRange) -> Option<RelativeAge> {
        let age = profile.age.filter(|&a| a > 0)?;
        let midpoint = age_range.midpoint();
        let diff = round_half_up(age as f64 - midpoint) as i32;
        Some(RelativeAge {
            diff,
            age_midpoint: round_half_up(midpoint) as u8,
            actual_age: age,
            age_label: profile.age_label.clone(),
            comparison: AgeComparison::from_diff(diff),
        })
    }

    /// The eleven display entries, top of face to bottom
    pub fn feature_entries(r: &FeatureResults) -> Vec<FeatureEntry> {
        let marionette = r
            .marionette
            .clone()
            .unwrap_or_else(|| MarionetteAnalyzer::new().default_result());
        let chin = r
            .chin
            .clone()
            .unwrap_or_else(|| ChinSagAnalyzer::new().default_result());

        FeatureKey::ALL
            .into_iter()
            .map(|key| {
                let (score, severity, contribution, outlook) = match key {
                    FeatureKey::Glabellar => {
                        scaled(r.wrinkle.glabellar_score, &severity::GLABELLAR, 92)
                    }
                    FeatureKey::Eyelid => scaled(r.wrinkle.eyelid_score, &severity::EYELID, 70),
                    FeatureKey::CrowFeet => {
                        scaled(r.wrinkle.crow_feet_score, &severity::GENERIC, 85)
                    }
                    FeatureKey::UnderEye => {
                        scaled(r.wrinkle.under_eye_score, &severity::UNDER_EYE, 80)
                    }
                    FeatureKey::Nasolabial => (
                        r.nasolabial.score,
                        r.nasolabial.severity.clone(),
                        Contribution::skin(75),
                        None,
                    ),
                    FeatureKey::CheekSag => scaled(r.cheek.sag_score, &severity::GENERIC, 70),
                    FeatureKey::Elasticity => {
                        scaled(r.cheek.elasticity_score, &severity::ELASTICITY, 90)
                    }
                    FeatureKey::SmileWrinkle => {
                        scaled(r.wrinkle.smile_wrinkle_score, &severity::GENERIC, 90)
                    }
                    FeatureKey::Marionette => (
                        marionette.score,
                        marionette.severity.clone(),
                        marionette.contribution,
                        None,
                    ),
                    FeatureKey::Chin => (
                        chin.score,
                        chin.severity.clone(),
                        Contribution::skin(65),
                        Some(chin.outlook.clone()),
                    ),
                    FeatureKey::JawLine => scaled(r.bone.jaw_score, &severity::JAW_LINE, 55),
                };
                FeatureEntry {
                    key,
                    name: key.name().to_string(),
                    icon: key.icon().to_string(),
                    score,
                    severity,
                    contribution,
                    outlook,
                }
            })
            .collect()
    }
}

impl Default for SkinAgeScorer {
    fn default() -> Self {
        Self::new(ScoringModel::default())
    }
}

fn scaled(
    score: u8,
    scale: &SeverityScale,
    skin: u8,
) -> (u8, Severity, Contribution, Option<String>) {
    (score, scale.classify(f64::from(score)), Contribution::skin(skin), None)
}
