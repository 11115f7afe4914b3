//! Geometric primitives shared by the feature analyzers

use crate::landmarks::{CHIN, FOREHEAD};
use crate::{LandmarkSet, Point};

/// Below this forehead-to-chin distance the detection is treated as failed
pub const MIN_FACE_SCALE: f64 = 10.0;

pub fn distance_2d(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

pub fn distance_3d(a: Point, b: Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2) + (a.z - b.z).powi(2)).sqrt()
}

/// Arithmetic mean; 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance; 0 for an empty slice
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Coefficient of variation (stddev / mean).
/// 0 for fewer than two values or a zero mean.
pub fn relative_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    if m == 0.0 {
        return 0.0;
    }
    variance(values).sqrt() / m
}

pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.min(hi).max(lo)
}

/// Forehead-to-chin distance in the image plane
pub fn face_scale(set: &LandmarkSet) -> f64 {
    distance_2d(set.get(FOREHEAD), set.get(CHIN))
}

/// Forehead-to-chin distance including depth
pub fn face_scale_3d(set: &LandmarkSet) -> f64 {
    distance_3d(set.get(FOREHEAD), set.get(CHIN))
}

/// Round half up, so -2.5 becomes -2 and 2.5 becomes 3
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Round a 0-100 metric into a reported score
pub fn round_score(v: f64) -> u8 {
    clamp(round_half_up(v), 0.0, 100.0) as u8
}

/// Mean of one coordinate over a group of landmarks
pub fn mean_y(points: &[Point]) -> f64 {
    mean(&points.iter().map(|p| p.y).collect::<Vec<_>>())
}

/// z coordinates of a group of landmarks
pub fn z_values(points: &[Point]) -> Vec<f64> {
    points.iter().map(|p| p.z).collect()
}

/// Round to two decimals for display ratios
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
