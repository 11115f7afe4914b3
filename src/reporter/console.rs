//! Console reporter with colored output

use crate::analyzer::engine::AggregateStats;
use crate::{AgeComparison, AnalysisResult, CareTier, FeatureEntry, Grade};
use colored::Colorize;

/// Reporter for terminal output
pub struct ConsoleReporter {
    use_colors: bool,
    /// Show analyzer sub-scores
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single analysis result
    pub fn report(&self, result: &AnalysisResult) {
        self.print_header(result);
        self.print_score(result);
        self.print_features(&result.report.features);
        if self.verbose {
            self.print_sub_scores(result);
        }
        self.print_relative_age(result);
        self.print_care_plan(&result.report.care_plan);
        println!();
    }

    /// Report multiple results with summary
    pub fn report_many(&self, results: &[AnalysisResult], stats: &AggregateStats) {
        for result in results {
            self.report(result);
            println!("{}", "─".repeat(60));
        }

        self.print_summary(stats);
    }

    /// Report in quiet mode (just score)
    pub fn report_quiet(&self, result: &AnalysisResult) {
        println!("{}", self.quiet_line(result));
    }

    pub fn quiet_line(&self, result: &AnalysisResult) -> String {
        let report = &result.report;
        format!(
            "{}: {} ({}) age {}",
            result.file_path.display(),
            report.score.value,
            self.colorize_grade(report.score.grade),
            report.age_range
        )
    }

    fn print_header(&self, result: &AnalysisResult) {
        println!();
        println!(
            "{}",
            format!("🪞 Skin Age Analysis: {}", result.file_path.display()).bold()
        );
        let poses: Vec<String> = result.usable_poses.iter().map(|p| p.to_string()).collect();
        let poses = if poses.is_empty() {
            "none".to_string()
        } else {
            poses.join(", ")
        };
        println!("   Usable poses: {}", poses);
        println!();
    }

    fn print_score(&self, result: &AnalysisResult) {
        let report = &result.report;
        let grade_str = self.colorize_grade(report.score.grade);
        let score_bar = self.create_score_bar(report.score.value);

        println!("   Score: {} {}", score_bar, grade_str.bold());
        println!("   {}", report.grade_description.dimmed());
        println!(
            "   Estimated skin age: {}",
            report.age_range.to_string().bold()
        );
        println!(
            "   Skin {}% | Bone {}%",
            report.skin_factor, report.bone_factor
        );
        println!();
    }

    fn print_features(&self, features: &[FeatureEntry]) {
        println!("   {}", "Features:".bold());
        for feature in features {
            let bar = self.create_mini_bar(feature.score);
            let score_str = format!("{:>3}", feature.score);
            let colored_score = match feature.severity.level {
                0 => score_str.green(),
                1 => score_str.normal(),
                2 => score_str.yellow(),
                _ => score_str.red(),
            };
            println!(
                "   {} {} {} {:<18} {}",
                feature.icon,
                bar,
                colored_score,
                feature.name,
                feature.severity.label.dimmed()
            );
            if let Some(ref outlook) = feature.outlook {
                println!("       {} {}", "↳".dimmed(), outlook.italic());
            }
        }
        println!();
    }

    fn print_sub_scores(&self, result: &AnalysisResult) {
        let raw = &result.report.raw;
        println!("   {}", "Analyzer scores:".bold());
        println!(
            "   nasolabial {:>3}  (left {}, right {}, asymmetry {}%)",
            raw.nasolabial.score,
            raw.nasolabial.left_score,
            raw.nasolabial.right_score,
            raw.nasolabial.asymmetry
        );
        println!(
            "   cheek      {:>3}  (sag {}, elasticity {}, gravity {})",
            raw.cheek.score,
            raw.cheek.sag_score,
            raw.cheek.elasticity_score,
            raw.cheek.gravity_sag_score
        );
        println!(
            "   wrinkle    {:>3}  (crow's feet L{} R{}, under-eye {}, smile {})",
            raw.wrinkle.score,
            raw.wrinkle.left_score,
            raw.wrinkle.right_score,
            raw.wrinkle.under_eye_score,
            raw.wrinkle.smile_wrinkle_score
        );
        println!(
            "   bone       {:>3}  (face ratio {}, jaw ratio {}, stability {})",
            raw.bone.score, raw.bone.face_ratio, raw.bone.jaw_ratio, raw.bone.stability_score
        );
        if let Some(ref m) = raw.marionette {
            println!(
                "   marionette {:>3}  (sag {}, depth {}, gravity {})",
                m.score, m.sag_score, m.depth_score, m.gravity_score
            );
        }
        if let Some(ref c) = raw.chin {
            let jaw_ratio = c
                .jaw_ratio
                .map(|r| r.to_string())
                .unwrap_or_else(|| "n/a".to_string());
            println!(
                "   chin       {:>3}  (jaw ratio {}, contour {}, gravity {})",
                c.score, jaw_ratio, c.contour_score, c.gravity_score
            );
        }
        println!();
    }

    fn print_relative_age(&self, result: &AnalysisResult) {
        let Some(ref rel) = result.report.relative_age else {
            return;
        };
        let label = rel
            .age_label
            .clone()
            .unwrap_or_else(|| rel.actual_age.to_string());
        let verdict = match rel.comparison {
            AgeComparison::LooksYounger => {
                format!("about {} years younger than {}", rel.diff, label).green()
            }
            AgeComparison::AboutRight => format!("in line with {}", label).normal(),
            AgeComparison::LooksOlder => {
                format!("about {} years older than {}", -rel.diff, label).yellow()
            }
        };
        println!("   Relative age: {}", verdict);
        println!();
    }

    fn print_care_plan(&self, tiers: &[CareTier]) {
        if tiers.is_empty() {
            println!("   {} Great scores, keep up your current routine.", "✓".green());
            return;
        }
        println!("   {}", "Care suggestions:".bold());
        for tier in tiers {
            println!("   {} {}", tier.label.bold(), format!("({})", tier.cost).dimmed());
            for item in &tier.items {
                println!("   {} {}", "→".cyan(), item);
            }
            println!("     {}", tier.timeline.dimmed());
        }
    }

    fn print_summary(&self, stats: &AggregateStats) {
        println!();
        println!("{}", "═".repeat(60));
        println!("{}", "Summary".bold());
        println!("{}", "═".repeat(60));
        println!(
            "   Sessions analyzed: {}",
            stats.sessions_analyzed.to_string().bold()
        );
        println!(
            "   Average score:     {} ({})",
            stats.average_score.value.to_string().bold(),
            self.colorize_grade(stats.average_score.grade)
        );
        println!("   Needing care:      {}", stats.sessions_with_care_plan);
        println!();
    }

    fn colorize_grade(&self, grade: Grade) -> colored::ColoredString {
        let s = grade.to_string();
        if !self.use_colors {
            return s.normal();
        }
        match grade {
            Grade::A => s.green().bold(),
            Grade::B => s.green(),
            Grade::C => s.yellow(),
            Grade::D => s.red(),
            Grade::E => s.red().bold(),
        }
    }

    fn create_score_bar(&self, score: u8) -> String {
        let filled = (score as usize * 20) / 100;
        let empty = 20 - filled;

        let bar = format!(
            "[{}{}] {:>3}%",
            "█".repeat(filled),
            "░".repeat(empty),
            score
        );

        if self.use_colors {
            if score >= 82 {
                bar.green().to_string()
            } else if score >= 54 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            }
        } else {
            bar
        }
    }

    fn create_mini_bar(&self, score: u8) -> String {
        let filled = (score.min(100) as usize * 10) / 100;
        let empty = 10 - filled;
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(empty))
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
