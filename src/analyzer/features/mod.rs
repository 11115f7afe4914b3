//! Feature analyzers: stateless landmark-to-subscore functions

pub mod bone_structure;
pub mod cheek;
pub mod chin_sag;
pub mod marionette;
pub mod nasolabial;
pub mod wrinkle;

pub use bone_structure::{BoneStructureAnalyzer, BoneStructureResult};
pub use cheek::{CheekAnalyzer, CheekResult};
pub use chin_sag::{ChinSagAnalyzer, ChinSagResult};
pub use marionette::{MarionetteAnalyzer, MarionetteResult};
pub use nasolabial::{NasolabialAnalyzer, NasolabialResult};
pub use wrinkle::{WrinkleAnalyzer, WrinkleResult};

use crate::geometry::MIN_FACE_SCALE;
use crate::session::LandmarkProvider;
use crate::{LandmarkSet, Pose};

/// Trait for feature analyzers
pub trait FeatureAnalyzer {
    type Output;

    /// Name of the analyzer
    fn name(&self) -> &'static str;

    /// Score the captured poses. Never fails: unusable input yields `default_result`.
    fn analyze(&self, captures: &Captures<'_>) -> Self::Output;

    /// Fixed result used when the neutral capture cannot be analyzed
    fn default_result(&self) -> Self::Output;
}

/// Landmark sets of one session, borrowed per pose
#[derive(Debug, Clone, Copy, Default)]
pub struct Captures<'a> {
    pub neutral: Option<&'a LandmarkSet>,
    pub smile: Option<&'a LandmarkSet>,
    pub down: Option<&'a LandmarkSet>,
}

impl<'a> Captures<'a> {
    pub fn neutral(set: &'a LandmarkSet) -> Self {
        Self {
            neutral: Some(set),
            ..Self::default()
        }
    }

    pub fn with_smile(mut self, set: &'a LandmarkSet) -> Self {
        self.smile = Some(set);
        self
    }

    pub fn with_down(mut self, set: &'a LandmarkSet) -> Self {
        self.down = Some(set);
        self
    }

    pub fn from_provider(provider: &'a dyn LandmarkProvider) -> Self {
        Self {
            neutral: provider.landmarks(Pose::Neutral),
            smile: provider.landmarks(Pose::Smile),
            down: provider.landmarks(Pose::Down),
        }
    }

    pub fn pose(&self, pose: Pose) -> Option<&'a LandmarkSet> {
        match pose {
            Pose::Neutral => self.neutral,
            Pose::Smile => self.smile,
            Pose::Down => self.down,
        }
    }

    /// The set for `pose` if it is long enough to analyze
    pub fn usable(&self, pose: Pose) -> Option<&'a LandmarkSet> {
        self.pose(pose).filter(|set| set.is_usable())
    }

    /// Poses carrying a usable set
    pub fn usable_poses(&self) -> Vec<Pose> {
        Pose::ALL
            .into_iter()
            .filter(|&pose| self.usable(pose).is_some())
            .collect()
    }

    /// Neutral set plus its face scale, or None when the analyzer must fall back
    pub(crate) fn primary(
        &self,
        scale: impl Fn(&LandmarkSet) -> f64,
    ) -> Option<(&'a LandmarkSet, f64)> {
        let neutral = self.usable(Pose::Neutral)?;
        let face_h = scale(neutral);
        if face_h < MIN_FACE_SCALE {
            return None;
        }
        Some((neutral, face_h))
    }
}

/// `a / b`, or 0 when `b` is zero
pub(crate) fn ratio(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        0.0
    } else {
        a / b
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! A plausible front-facing synthetic face for analyzer tests.
    //!
    //! Forehead-to-chin is 320 units, face width 200, all depths 0.

    use crate::landmarks::*;
    use crate::{LandmarkSet, Point};

    pub struct SyntheticFace {
        points: Vec<Point>,
    }

    impl SyntheticFace {
        pub fn new() -> Self {
            let mut face = Self {
                points: vec![Point::new(300.0, 300.0, 0.0); FACE_MESH_SIZE],
            };
            face.set(FOREHEAD, 300.0, 100.0)
                .set(CHIN, 300.0, 420.0)
                .set(LEFT_EAR, 200.0, 260.0)
                .set(RIGHT_EAR, 400.0, 260.0)
                .set(LEFT_JAW_ANGLE, 230.0, 380.0)
                .set(RIGHT_JAW_ANGLE, 370.0, 380.0)
                .set(LEFT_CHEEKBONE, 220.0, 250.0)
                .set(RIGHT_CHEEKBONE, 380.0, 250.0)
                .set(LEFT_EYE_OUTER, 240.0, 220.0)
                .set(LEFT_EYE_INNER, 270.0, 220.0)
                .set(RIGHT_EYE_INNER, 330.0, 220.0)
                .set(RIGHT_EYE_OUTER, 360.0, 220.0)
                .set(LEFT_UPPER_LID, 255.0, 212.0)
                .set(LEFT_LOWER_LID, 255.0, 222.0)
                .set(RIGHT_UPPER_LID, 345.0, 212.0)
                .set(RIGHT_LOWER_LID, 345.0, 222.0)
                .set(LEFT_NOSTRIL, 285.0, 280.0)
                .set(RIGHT_NOSTRIL, 315.0, 280.0)
                .set(LEFT_MOUTH, 270.0, 330.0)
                .set(RIGHT_MOUTH, 330.0, 330.0)
                .set_y(&LEFT_CHEEK_LOWER, 270.0)
                .set_y(&RIGHT_CHEEK_LOWER, 270.0)
                .set_y(&LEFT_JOWL, 350.0)
                .set_y(&RIGHT_JOWL, 350.0)
                .set(LEFT_JAW_MID, 240.0, 370.0)
                .set(RIGHT_JAW_MID, 360.0, 370.0)
                .set_y(&LEFT_BROW, 190.0)
                .set_y(&RIGHT_BROW, 190.0);
            face
        }

        pub fn set(&mut self, index: usize, x: f64, y: f64) -> &mut Self {
            let z = self.points[index].z;
            self.points[index] = Point::new(x, y, z);
            self
        }

        pub fn set_y(&mut self, indices: &[usize], y: f64) -> &mut Self {
            for &i in indices {
                self.points[i].y = y;
            }
            self
        }

        pub fn shift_y(&mut self, indices: &[usize], dy: f64) -> &mut Self {
            for &i in indices {
                self.points[i].y += dy;
            }
            self
        }

        /// Alternate depths +dz / -dz across a group
        pub fn ripple_z(&mut self, indices: &[usize], dz: f64) -> &mut Self {
            for (n, &i) in indices.iter().enumerate() {
                self.points[i].z = if n % 2 == 0 { dz } else { -dz };
            }
            self
        }

        pub fn set_z(&mut self, index: usize, z: f64) -> &mut Self {
            self.points[index].z = z;
            self
        }

        pub fn build(&self) -> LandmarkSet {
            LandmarkSet::new(self.points.clone())
        }
    }

    pub fn face() -> LandmarkSet {
        SyntheticFace::new().build()
    }

    /// Too short to be usable
    pub fn short_set() -> LandmarkSet {
        LandmarkSet::new(vec![Point::new(1.0, 1.0, 0.0); 120])
    }

    /// Usable length but forehead and chin 5 units apart
    pub fn collapsed_face() -> LandmarkSet {
        SyntheticFace::new()
            .set(FOREHEAD, 300.0, 300.0)
            .set(CHIN, 303.0, 304.0)
            .build()
    }
}
