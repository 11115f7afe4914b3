//! Shared helpers: a front-facing synthetic face and session files on disk.

#![allow(dead_code)]

use skinage::landmarks::*;
use skinage::{LandmarkSet, Point, Pose, Profile, Session};
use std::path::{Path, PathBuf};

/// Forehead-to-chin 320 units, face width 200, flat depth
pub fn face() -> LandmarkSet {
    let mut points = vec![Point::new(300.0, 300.0, 0.0); FACE_MESH_SIZE];
    let mut set = |i: usize, x: f64, y: f64| points[i] = Point::new(x, y, 0.0);
    set(FOREHEAD, 300.0, 100.0);
    set(CHIN, 300.0, 420.0);
    set(LEFT_EAR, 200.0, 260.0);
    set(RIGHT_EAR, 400.0, 260.0);
    set(LEFT_JAW_ANGLE, 230.0, 380.0);
    set(RIGHT_JAW_ANGLE, 370.0, 380.0);
    set(LEFT_CHEEKBONE, 220.0, 250.0);
    set(RIGHT_CHEEKBONE, 380.0, 250.0);
    set(LEFT_EYE_OUTER, 240.0, 220.0);
    set(LEFT_EYE_INNER, 270.0, 220.0);
    set(RIGHT_EYE_INNER, 330.0, 220.0);
    set(RIGHT_EYE_OUTER, 360.0, 220.0);
    set(LEFT_UPPER_LID, 255.0, 212.0);
    set(LEFT_LOWER_LID, 255.0, 222.0);
    set(RIGHT_UPPER_LID, 345.0, 212.0);
    set(RIGHT_LOWER_LID, 345.0, 222.0);
    set(LEFT_NOSTRIL, 285.0, 280.0);
    set(RIGHT_NOSTRIL, 315.0, 280.0);
    set(LEFT_MOUTH, 270.0, 330.0);
    set(RIGHT_MOUTH, 330.0, 330.0);

    let groups: [(&[usize], f64); 6] = [
        (&LEFT_CHEEK_LOWER, 270.0),
        (&RIGHT_CHEEK_LOWER, 270.0),
        (&LEFT_JOWL, 350.0),
        (&RIGHT_JOWL, 350.0),
        (&LEFT_BROW, 190.0),
        (&RIGHT_BROW, 190.0),
    ];
    for (indices, y) in groups {
        for &i in indices {
            points[i].y = y;
        }
    }
    points[LEFT_JAW_MID] = Point::new(240.0, 370.0, 0.0);
    points[RIGHT_JAW_MID] = Point::new(360.0, 370.0, 0.0);
    LandmarkSet::new(points)
}

/// Too short to be analyzed
pub fn short_set() -> LandmarkSet {
    LandmarkSet::new(vec![Point::new(1.0, 1.0, 0.0); 120])
}

pub fn full_session() -> Session {
    Session::default()
        .with_pose(Pose::Neutral, face())
        .with_pose(Pose::Smile, face())
        .with_pose(Pose::Down, face())
}

pub fn with_profile(mut session: Session, profile: Profile) -> Session {
    session.profile = Some(profile);
    session
}

pub fn write_session(dir: &Path, name: &str, session: &Session) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(session).unwrap()).unwrap();
    path
}
