//! Session files: one landmark capture per pose plus an optional profile

use crate::{LandmarkSet, Pose, Profile};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Source of landmark sets, one per pose.
///
/// `None` (or a short set) means detection failed for that pose; the
/// analyzers fall back to their defaults rather than erroring.
pub trait LandmarkProvider {
    fn landmarks(&self, pose: Pose) -> Option<&LandmarkSet>;
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read session file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid session JSON in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Captured poses of one assessment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neutral: Option<LandmarkSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smile: Option<LandmarkSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<LandmarkSet>,
}

impl Session {
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let content = fs::read_to_string(path).map_err(|source| SessionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse session JSON; `path` is only used for error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, SessionError> {
        serde_json::from_str(content).map_err(|source| SessionError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_pose(mut self, pose: Pose, set: LandmarkSet) -> Self {
        match pose {
            Pose::Neutral => self.neutral = Some(set),
            Pose::Smile => self.smile = Some(set),
            Pose::Down => self.down = Some(set),
        }
        self
    }
}

impl LandmarkProvider for Session {
    fn landmarks(&self, pose: Pose) -> Option<&LandmarkSet> {
        match pose {
            Pose::Neutral => self.neutral.as_ref(),
            Pose::Smile => self.smile.as_ref(),
            Pose::Down => self.down.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Gender, Point};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_session() {
        let json = r#"{
            "profile": { "age": 41, "ageLabel": "40s", "gender": "female" },
            "neutral": [ { "x": 1.0, "y": 2.0, "z": -0.5 }, { "x": 3.0, "y": 4.0 } ],
            "smile": []
        }"#;
        let session = Session::parse(json, Path::new("a.session.json")).unwrap();
        let profile = session.profile.as_ref().unwrap();
        assert_eq!(profile.age, Some(41));
        assert_eq!(profile.gender, Some(Gender::Female));
        let neutral = session.landmarks(Pose::Neutral).unwrap();
        assert_eq!(neutral.len(), 2);
        assert_eq!(neutral.get(1), Point::new(3.0, 4.0, 0.0));
        assert!(session.landmarks(Pose::Smile).unwrap().is_empty());
        assert!(session.landmarks(Pose::Down).is_none());
    }

    #[test]
    fn test_empty_object_is_valid() {
        let session = Session::parse("{}", Path::new("empty.session.json")).unwrap();
        assert_eq!(session, Session::default());
    }

    #[test]
    fn test_parse_error_carries_path() {
        let err = Session::parse("{ not json", Path::new("broken.session.json")).unwrap_err();
        assert!(matches!(err, SessionError::Parse { .. }));
        assert!(err.to_string().contains("broken.session.json"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Session::load(Path::new("/definitely/missing.session.json")).unwrap_err();
        assert!(matches!(err, SessionError::Read { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = NamedTempFile::with_suffix(".session.json").unwrap();
        write!(file, r#"{{ "down": [{{ "x": 0, "y": 0 }}] }}"#).unwrap();
        file.flush().unwrap();
        let session = Session::load(file.path()).unwrap();
        assert_eq!(session.landmarks(Pose::Down).map(LandmarkSet::len), Some(1));
    }

    #[test]
    fn test_with_pose() {
        let set = LandmarkSet::new(vec![Point::ZERO; 3]);
        let session = Session::default().with_pose(Pose::Smile, set.clone());
        assert_eq!(session.landmarks(Pose::Smile), Some(&set));
    }

    proptest::proptest! {
        #![proptest_config(proptest::prelude::ProptestConfig::with_cases(200))]

        #[test]
        fn parse_never_panics_on_arbitrary_input(ref input in ".{0,300}") {
            let _ = Session::parse(input, Path::new("fuzz.session.json"));
        }
    }
}
