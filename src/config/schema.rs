//! Config schema and deserialization

use crate::analyzer::ScoringModel;
use crate::Profile;
use globset::Glob;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Session file suffix used when the config names none
pub const DEFAULT_SESSION_SUFFIX: &str = ".session.json";

/// Per-path override configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Glob patterns this override applies to
    pub files: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ScoringModel>,
}

/// Root config structure for .skinagerc.json
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Minimum score (exit 1 if below)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u8>,

    /// Weight table; extended when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ScoringModel>,

    /// Profile applied to sessions that carry none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,

    /// Glob patterns for files/directories to exclude from discovery
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    /// Session filename suffixes (default: .session.json)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub session_patterns: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<ConfigOverride>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(
        mut self,
        cli_threshold: Option<u8>,
        cli_model: Option<ScoringModel>,
        cli_profile: Option<Profile>,
    ) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        if cli_model.is_some() {
            self.model = cli_model;
        }
        if let Some(cli) = cli_profile {
            let base = self.profile.take().unwrap_or_default();
            self.profile = Some(Profile {
                age: cli.age.or(base.age),
                age_label: cli.age_label.or(base.age_label),
                gender: cli.gender.or(base.gender),
            });
        }
        self
    }

    /// Effective config for one session file, with matching overrides applied in order
    pub fn effective_for_file(&self, file_path: &Path) -> EffectiveConfig {
        let mut effective = EffectiveConfig {
            threshold: self.threshold,
            model: self.model.unwrap_or_default(),
        };

        for override_cfg in &self.overrides {
            if Self::matches_override(file_path, &override_cfg.files) {
                if let Some(threshold) = override_cfg.threshold {
                    effective.threshold = Some(threshold);
                }
                if let Some(model) = override_cfg.model {
                    effective.model = model;
                }
            }
        }

        effective
    }

    fn matches_override(file_path: &Path, patterns: &[String]) -> bool {
        patterns.iter().any(|pattern| match Glob::new(pattern) {
            Ok(glob) => glob.compile_matcher().is_match(file_path),
            Err(_) => false,
        })
    }

    /// Merge a base config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.model.is_none() {
            self.model = base.model;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        self.profile = match (self.profile.take(), base.profile) {
            (Some(own), Some(base)) => Some(Profile {
                age: own.age.or(base.age),
                age_label: own.age_label.or(base.age_label),
                gender: own.gender.or(base.gender),
            }),
            (own, base) => own.or(base),
        };

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        if self.session_patterns.is_empty() {
            self.session_patterns = base.session_patterns;
        }

        // Base overrides first so this config's overrides win
        let mut all_overrides = base.overrides;
        all_overrides.append(&mut self.overrides);
        self.overrides = all_overrides;
    }

    pub fn get_session_patterns(&self) -> Vec<&str> {
        if self.session_patterns.is_empty() {
            vec![DEFAULT_SESSION_SUFFIX]
        } else {
            self.session_patterns.iter().map(|s| s.as_str()).collect()
        }
    }

    /// Whether a file name ends with one of the session suffixes
    pub fn is_session_file(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        self.get_session_patterns()
            .iter()
            .any(|suffix| name.ends_with(suffix))
    }
}

/// Effective configuration for a specific file (after applying overrides)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub threshold: Option<u8>,
    pub model: ScoringModel,
}
