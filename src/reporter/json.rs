//! JSON reporter for machine-readable output

use crate::analyzer::engine::AggregateStats;
use crate::AnalysisResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    pretty: bool,
}

impl JsonReporter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render<T: Serialize>(&self, value: &T, fallback: &str) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|_| fallback.to_string())
    }

    /// Report a single analysis result as JSON
    pub fn report(&self, result: &AnalysisResult) -> String {
        self.render(result, "{}")
    }

    /// Report multiple results as JSON array
    pub fn report_many(&self, results: &[AnalysisResult]) -> String {
        self.render(&results, "[]")
    }

    /// Report with summary and generation timestamp
    pub fn report_with_summary(
        &self,
        results: &[AnalysisResult],
        stats: &AggregateStats,
    ) -> String {
        self.report_with_summary_at(results, stats, Utc::now())
    }

    fn report_with_summary_at(
        &self,
        results: &[AnalysisResult],
        stats: &AggregateStats,
        generated_at: DateTime<Utc>,
    ) -> String {
        let output = JsonOutput {
            generated_at: generated_at.to_rfc3339(),
            results,
            summary: JsonSummary {
                sessions_analyzed: stats.sessions_analyzed,
                average_score: stats.average_score.value,
                average_grade: stats.average_score.grade.to_string(),
                sessions_with_care_plan: stats.sessions_with_care_plan,
            },
        };
        self.render(&output, "{}")
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    generated_at: String,
    results: &'a [AnalysisResult],
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    sessions_analyzed: usize,
    average_score: u8,
    average_grade: String,
    sessions_with_care_plan: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalysisEngine;
    use crate::session::Session;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn make_result(path: &str) -> AnalysisResult {
        AnalysisResult {
            file_path: PathBuf::from(path),
            usable_poses: vec![],
            report: AnalysisEngine::new().run(&Session::default(), None),
        }
    }

    #[test]
    fn test_report_single_uses_camel_case() {
        let json = JsonReporter::new().report(&make_result("a.session.json"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["filePath"], "a.session.json");
        assert_eq!(value["score"]["value"], 70);
        assert_eq!(value["score"]["grade"], "B");
        assert_eq!(value["ageRange"]["min"], 35);
        assert_eq!(value["boneFactor"], 25);
        assert_eq!(value["skinFactor"], 75);
        assert_eq!(value["features"].as_array().unwrap().len(), 11);
        assert_eq!(value["features"][0]["key"], "glabellar");
        assert_eq!(value["features"][0]["skinContrib"], 92);
        assert!(value.get("relativeAge").is_none());
    }

    #[test]
    fn test_report_many_is_array() {
        let results = vec![make_result("a.session.json"), make_result("b.session.json")];
        let json = JsonReporter::new().pretty().report_many(&results);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_report_with_summary() {
        let results = vec![make_result("a.session.json")];
        let stats = AnalysisEngine::aggregate_stats(&results);
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let json = JsonReporter::new().report_with_summary_at(&results, &stats, at);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["generatedAt"], "2026-03-01T12:00:00+00:00");
        assert_eq!(value["summary"]["sessionsAnalyzed"], 1);
        assert_eq!(value["summary"]["averageScore"], 70);
        assert_eq!(value["summary"]["averageGrade"], "B");
        assert_eq!(value["summary"]["sessionsWithCarePlan"], 1);
    }
}
