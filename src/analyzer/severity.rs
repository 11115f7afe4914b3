//! Severity bands: four ordered qualitative labels over 0-100

use crate::Severity;

/// Three descending thresholds splitting [0,100] into four bands.
/// A score at or above `thresholds[0]` is level 0, and so on.
#[derive(Debug, Clone, Copy)]
pub struct SeverityScale {
    thresholds: [u8; 3],
    bands: [(&'static str, &'static str); 4],
}

const GREEN: &str = "#2ecc71";
const DARK_GREEN: &str = "#27ae60";
const BLUE: &str = "#3498db";
const AMBER: &str = "#f39c12";
const ORANGE: &str = "#e67e22";
const RED: &str = "#e74c3c";

impl SeverityScale {
    pub const fn new(thresholds: [u8; 3], bands: [(&'static str, &'static str); 4]) -> Self {
        Self { thresholds, bands }
    }

    pub fn level(&self, score: f64) -> u8 {
        self.thresholds
            .iter()
            .position(|&t| score >= f64::from(t))
            .unwrap_or(self.thresholds.len()) as u8
    }

    /// Band for a score; unrounded totals land below a threshold they round up to
    pub fn classify(&self, score: f64) -> Severity {
        let level = self.level(score);
        let (label, color) = self.bands[level as usize];
        Severity {
            label: label.to_string(),
            color: color.to_string(),
            level,
        }
    }
}

pub const BONE_STRUCTURE: SeverityScale = SeverityScale::new(
    [80, 65, 50],
    [
        ("Well-balanced structure", BLUE),
        ("Typical", GREEN),
        ("Some structural change", AMBER),
        ("Noticeable structural change", ORANGE),
    ],
);

pub const CHEEK: SeverityScale = SeverityScale::new(
    [80, 65, 45],
    [
        ("Firm", GREEN),
        ("Slightly loose", AMBER),
        ("Sagging", ORANGE),
        ("Pronounced sagging", RED),
    ],
);

pub const CHIN: SeverityScale = SeverityScale::new(
    [80, 65, 48],
    [
        ("Sharp", GREEN),
        ("Slightly rounded", DARK_GREEN),
        ("Sagging", AMBER),
        ("Needs care", RED),
    ],
);

pub const MARIONETTE: SeverityScale = SeverityScale::new(
    [80, 65, 48],
    [
        ("Barely visible", GREEN),
        ("Shallow", AMBER),
        ("Distinct", ORANGE),
        ("Deep", RED),
    ],
);

pub const NASOLABIAL: SeverityScale = SeverityScale::new(
    [80, 65, 45],
    [
        ("Barely noticeable", GREEN),
        ("Faint", AMBER),
        ("Moderate", ORANGE),
        ("Pronounced", RED),
    ],
);

pub const WRINKLE: SeverityScale = SeverityScale::new(
    [80, 65, 45],
    [
        ("Almost none", GREEN),
        ("Fine lines", AMBER),
        ("Distinct wrinkles", ORANGE),
        ("Deep wrinkles", RED),
    ],
);

pub const GENERIC: SeverityScale = SeverityScale::new(
    [80, 65, 48],
    [
        ("Excellent", GREEN),
        ("Good", DARK_GREEN),
        ("Caution", AMBER),
        ("Needs care", RED),
    ],
);

pub const GLABELLAR: SeverityScale = SeverityScale::new(
    [80, 65, 48],
    [
        ("Smooth", GREEN),
        ("Shallow", AMBER),
        ("Distinct", ORANGE),
        ("Deep", RED),
    ],
);

pub const EYELID: SeverityScale = SeverityScale::new(
    [80, 65, 48],
    [
        ("Firm", GREEN),
        ("Slight droop", DARK_GREEN),
        ("Drooping lids", AMBER),
        ("Hooded", RED),
    ],
);

pub const ELASTICITY: SeverityScale = SeverityScale::new(
    [80, 65, 48],
    [
        ("Taut", GREEN),
        ("Elastic", DARK_GREEN),
        ("Reduced elasticity", AMBER),
        ("Much reduced", RED),
    ],
);

pub const UNDER_EYE: SeverityScale = SeverityScale::new(
    [80, 65, 48],
    [
        ("Clear", GREEN),
        ("Slight shadow", DARK_GREEN),
        ("Dull", AMBER),
        ("Needs care", RED),
    ],
);

pub const JAW_LINE: SeverityScale = SeverityScale::new(
    [80, 65, 48],
    [
        ("Sharp", BLUE),
        ("Typical", GREEN),
        ("Slightly rounded", AMBER),
        ("Blurred contour", ORANGE),
    ],
);
