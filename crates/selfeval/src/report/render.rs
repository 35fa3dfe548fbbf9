//! Plain-text rendering of an [`AggregateReport`].

use std::fmt::Write;

use super::AggregateReport;
use crate::survey::{SkillTable, SCALE_MAX, SCALE_MIN};

/// Width of the longest satisfaction bar.
const BAR_WIDTH: usize = 30;

/// Render the report as a Markdown-flavored text summary.
#[must_use]
pub fn render_text(report: &AggregateReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Self-Evaluation Report");
    if report.is_demo {
        let _ = writeln!(
            output,
            "(demo data: no evaluations have been submitted yet)"
        );
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "Evaluations:     {}", report.total_evaluations);
    let _ = writeln!(output, "Overall average: {:.1}", report.overall_average);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Skills");
    for (table, heading) in [
        (SkillTable::Technical, "Technical"),
        (SkillTable::Behavioral, "Behavioral"),
    ] {
        let _ = writeln!(output, "{heading}:");
        for skill in report.skill_averages.iter().filter(|s| s.skill.table() == table) {
            let _ = writeln!(
                output,
                "- {:<24} {:.1} ({} ratings)",
                skill.skill.label(),
                skill.average,
                skill.count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Sectors");
    for (rank, sector) in report.sector_averages.iter().enumerate() {
        let _ = writeln!(
            output,
            "{}. {:<22} {} ({} evaluations)",
            rank + 1,
            sector.sector.label(),
            sector.formatted_average(),
            sector.count
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Overall Satisfaction");
    let peak = report.satisfaction_distribution.0.iter().copied().max().unwrap_or(0);
    for bucket in SCALE_MIN..=SCALE_MAX {
        let count = report.satisfaction_distribution.count(bucket);
        let width = if peak == 0 { 0 } else { count * BAR_WIDTH / peak };
        let _ = writeln!(
            output,
            "{bucket} | {:<pad$} {count}",
            "#".repeat(width),
            pad = BAR_WIDTH
        );
    }

    let insights = &report.insights;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Insights");
    match &insights.best_sector {
        Some(best) => {
            let _ = writeln!(
                output,
                "Best sector: {} ({})",
                best.sector.label(),
                best.formatted_average()
            );
        }
        None => {
            let _ = writeln!(output, "Best sector: no sector has evaluations yet.");
        }
    }

    if insights.strengths.is_empty() {
        let _ = writeln!(output, "Strengths: none recorded.");
    } else {
        let _ = writeln!(output, "Strengths:");
        for skill in &insights.strengths {
            let _ = writeln!(output, "- {} ({:.1})", skill.skill.label(), skill.average);
        }
    }

    if insights.attention.is_empty() {
        let _ = writeln!(output, "Needs attention: none recorded.");
    } else {
        let _ = writeln!(output, "Needs attention:");
        for skill in &insights.attention {
            let _ = writeln!(output, "- {} ({:.1})", skill.skill.label(), skill.average);
        }
    }

    let _ = writeln!(output, "Recommendation: {}", insights.recommendation);

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{demo, Aggregator};
    use crate::seed;

    #[test]
    fn test_render_demo_report() {
        let text = render_text(&demo::fallback_report(3));

        assert!(text.contains("demo data"));
        assert!(text.contains("Evaluations:     47"));
        assert!(text.contains("Overall average: 4.2"));
        assert!(text.contains("1. Tributário"));
        assert!(text.contains("Recommendation:"));
    }

    #[test]
    fn test_render_real_report() {
        let submissions = seed::sample_submissions(6);
        let text = render_text(&Aggregator::new(&submissions).report(2));

        assert!(!text.contains("demo data"));
        assert!(text.contains("Evaluations:     6"));
        assert!(text.contains("## Skills"));
        assert!(text.contains("Behavioral:"));
        assert!(text.contains("Conhecimento Técnico"));
        assert!(text.contains("Strengths:"));
    }

    #[test]
    fn test_render_zeroed_report() {
        let text = render_text(&Aggregator::new(&[]).summarize(3));

        assert!(text.contains("Evaluations:     0"));
        assert!(text.contains("no sector has evaluations yet"));
        assert!(text.contains("Strengths: none recorded."));
    }
}
