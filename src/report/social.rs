use crate::models::{star_string, DimensionCategory, EthicsRiskLevel, SocialValueReport};
use crate::report::bar;

const WORTH_A_CLOSER_LOOK: f64 = 70.0;

pub fn render_social_markdown(report: &SocialValueReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Social Value Assessment: {}\n\n", report.repo_name));
    output.push_str(&format!("{}\n\n", report.core_value_summary));
    output.push_str(&format!(
        "**Total score**: {:.1}/100 {} ({})\n\n",
        report.total_score,
        star_string(report.level.stars()),
        report.level
    ));
    output.push_str(&format!(
        "| Part | Score |\n|------|-------|\n| Ethics baseline | {:.1} |\n| Bonus value | {:.1} |\n\n",
        report.basic_score, report.bonus_score
    ));
    if !report.value_types.is_empty() {
        output.push_str(&format!("**Value type**: {}\n\n", report.value_types.join(", ")));
    }

    output.push_str("## Part 1: Ethics and Compliance Baseline\n\n");
    let ethics_conclusion = match report.ethics.risk_level {
        EthicsRiskLevel::Safe => "No ethical red line is touched.",
        EthicsRiskLevel::NeedsAttention => "Some risk areas need attention before deployment.",
        EthicsRiskLevel::Dangerous => "The project touches a potentially dangerous area.",
    };
    output.push_str(&format!(
        "- **Ethics**: {} ({})\n",
        report.ethics.risk_level, ethics_conclusion
    ));
    if report.ethics.risk_level != EthicsRiskLevel::Safe {
        output.push_str(&format!(
            "- **Alert**: risk areas mentioned: {}\n",
            report.ethics.detected_risks.join(", ")
        ));
    }
    output.push_str(&format!("- **Privacy compliance**: {}\n", report.privacy_compliance));
    output.push_str(&format!("- **Fairness awareness**: {}\n\n", report.fairness_awareness));
    for dim in report.dimensions_in(DimensionCategory::Basic) {
        output.push_str(&format!("- {}: {:.0}/100, {}\n", dim.label, dim.score, dim.details));
    }

    output.push_str("\n## Part 2: Highlights\n\n");
    if report.highlights.is_empty() {
        output.push_str("- No standout social-value highlight detected\n");
    }
    for highlight in &report.highlights {
        output.push_str(&format!("- {}\n", highlight));
    }

    output.push_str("\n## Part 3: Other Dimensions\n\n");
    output.push_str("```\n");
    for dim in report.dimensions_in(DimensionCategory::Bonus) {
        output.push_str(&format!("{:<28} {} {:>5.1}\n", dim.label, bar(dim.score), dim.score));
    }
    output.push_str("```\n\n");
    for dim in report.dimensions_in(DimensionCategory::Bonus) {
        let verdict = if dim.score >= WORTH_A_CLOSER_LOOK {
            "worth a closer look"
        } else {
            "not a focus"
        };
        output.push_str(&format!(
            "- **{}** ({:.0}, weight {:.0}%): {}. {}\n",
            dim.label, dim.score, dim.weight, verdict, dim.details
        ));
    }

    output.push_str("\n## Part 4: Overall Assessment\n\n");
    output.push_str(&format!(
        "- **Implementation possibility**: {}\n",
        report.implementation_possibility()
    ));
    if !report.suggestions.is_empty() {
        output.push_str("- **Suggestions**:\n");
        for suggestion in &report.suggestions {
            output.push_str(&format!("  - {}\n", suggestion));
        }
    }
    if !report.judge_focus_points.is_empty() {
        output.push_str("- **Judge focus**:\n");
        for point in report.judge_focus_points.iter().take(2) {
            output.push_str(&format!("  - {}\n", point));
        }
    }

    output.push_str("\n## Part 5: Confidence\n\n");
    output.push_str(&format!("- **Assessment confidence**: {}\n", report.confidence));
    output.push_str(&format!(
        "- **Information sufficiency**: {}\n",
        report.information_sufficiency
    ));
    output.push_str(&format!(
        "- **Question for the team**: {}\n",
        report
            .judge_focus_points
            .first()
            .map(String::as_str)
            .unwrap_or("None")
    ));

    output.push_str(&format!(
        "\n---\n*Generated {} in {:.2}s*\n",
        report.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.analysis_secs
    ));

    output
}

pub fn render_social_text(report: &SocialValueReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n=== Social Value Assessment: {} ===\n\n", report.repo_name));
    output.push_str(&format!("{}\n\n", report.core_value_summary.replace("**", "")));
    output.push_str(&format!(
        "Total: {:.1}/100 {} ({})\n",
        report.total_score,
        star_string(report.level.stars()),
        report.level
    ));
    output.push_str(&format!(
        "Ethics: {}  Privacy: {}  Fairness: {}\n\n",
        report.ethics.risk_level, report.privacy_compliance, report.fairness_awareness
    ));

    output.push_str("Dimensions:\n");
    for dim in &report.dimensions {
        output.push_str(&format!("  {:<28} {} {:>5.1}\n", dim.label, bar(dim.score), dim.score));
    }

    if !report.suggestions.is_empty() {
        output.push_str("\nSuggestions:\n");
        for s in &report.suggestions {
            output.push_str(&format!("  - {}\n", s));
        }
    }

    output.push_str(&format!(
        "\nConfidence: {}\nAnalyzed on: {}\n",
        report.confidence,
        report.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RepoInfo;
    use crate::scoring::{DimensionWeights, SocialValueScorer};

    fn report_for(description: &str) -> SocialValueReport {
        let repo = RepoInfo {
            name: "carebridge".to_string(),
            full_name: "acme/carebridge".to_string(),
            description: description.to_string(),
            ..Default::default()
        };
        SocialValueScorer::new().score(&repo, &DimensionWeights::social_value())
    }

    #[test]
    fn test_five_parts() {
        let markdown = render_social_markdown(&report_for("Nonprofit health platform for the elderly"));
        for part in 1..=5 {
            assert!(markdown.contains(&format!("## Part {}:", part)));
        }
        assert!(markdown.contains("worth a closer look"));
        assert!(!markdown.contains("**Alert**"));
    }

    #[test]
    fn test_alert_for_risky_project() {
        let markdown = render_social_markdown(&report_for("Employee surveillance dashboard"));
        assert!(markdown.contains("**Alert**: risk areas mentioned: surveillance"));
        assert!(markdown.contains("How are the risks around surveillance mitigated?"));
    }

    #[test]
    fn test_text_summary() {
        let text = render_social_text(&report_for("Tutoring for children"));
        assert!(text.contains("=== Social Value Assessment: acme/carebridge ==="));
        assert!(text.contains("Ethics: Safe"));
    }
}
