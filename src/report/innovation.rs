use crate::models::{star_string, DimensionCategory, InnovationReport, Suggestion};
use crate::report::bar;

const REFERENCE_LINKS: &[(&str, &str)] = &[
    ("github_repo", "Repository"),
    ("github_search", "Similar projects on GitHub"),
    ("arxiv_search", "Related papers on arXiv"),
    ("huggingface_search", "Related models on Hugging Face"),
];

pub fn render_innovation_markdown(report: &InnovationReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Innovation Assessment: {}\n\n", report.repo_name));

    output.push_str("## 1. Project Overview\n\n");
    output.push_str(&format!(
        "- **Project**: [{}]({})\n",
        report.repo_name, report.repo_url
    ));
    output.push_str(&format!("- **Core vision**: {}\n", report.core_value_summary));
    output.push_str(&format!(
        "- **Language**: {}\n",
        report.language.as_deref().unwrap_or("Unknown")
    ));
    output.push_str(&format!("- **Stars**: {}\n", report.stars));
    if !report.description.is_empty() {
        output.push_str(&format!("\n> {}\n", report.description));
    }

    output.push_str("\n## 2. Innovation Verdict\n\n");
    output.push_str(&format!(
        "**Total score**: {:.1}/100 {}\n\n",
        report.total_score,
        star_string(report.level.stars())
    ));
    output.push_str(&format!("**Level**: {}\n\n", report.level));
    output.push_str(&format!("**Innovation type**: {}\n\n", report.innovation_type));
    output.push_str("| Part | Score | Max |\n|------|-------|-----|\n");
    output.push_str(&format!(
        "| Technology innovation | {:.1} | {:.0} |\n",
        report.tech_score,
        category_weight(report, DimensionCategory::Tech)
    ));
    output.push_str(&format!(
        "| Scenario innovation | {:.1} | {:.0} |\n",
        report.scenario_score,
        category_weight(report, DimensionCategory::Scenario)
    ));

    output.push_str("\n## 3. Capability Radar\n\n");
    for category in [DimensionCategory::Tech, DimensionCategory::Scenario] {
        output.push_str(&format!("**{}**\n\n", category));
        output.push_str("```\n");
        for dim in report.dimensions_in(category) {
            output.push_str(&format!("{:<30} {} {:>5.1}\n", dim.label, bar(dim.score), dim.score));
        }
        output.push_str("```\n\n");
    }
    output.push_str(&format!("**Radar analysis**: {}\n", report.radar_analysis));

    output.push_str("\n## 4. Dimension Analysis\n\n");
    for (i, dim) in report.dimensions.iter().enumerate() {
        output.push_str(&format!(
            "### 4.{} {} ({:.0}/100, weight {:.0}%)\n\n",
            i + 1,
            dim.label,
            dim.score,
            dim.weight
        ));
        if let Some(analysis) = report.dimension_analyses.get(&dim.key) {
            output.push_str(&format!("{}\n\n", analysis));
        }
        if !dim.details.is_empty() {
            output.push_str(&format!("- Evidence: {}\n\n", dim.details));
        }
    }

    output.push_str("## 5. Improvement Suggestions\n\n");
    let groups = [
        ("Technology", &report.tech_suggestions),
        ("Scenario", &report.scenario_suggestions),
        ("Product", &report.product_suggestions),
    ];
    let mut index = 0;
    for (name, suggestions) in groups {
        if suggestions.is_empty() {
            continue;
        }
        output.push_str(&format!("### {} suggestions\n\n", name));
        for suggestion in suggestions.iter() {
            index += 1;
            push_suggestion(&mut output, index, suggestion);
        }
    }

    output.push_str("## 6. Judge Focus\n\n");
    for (i, q) in report.judge_focus_points.iter().enumerate() {
        output.push_str(&format!("**Q{}. {}**\n\n", i + 1, q.question));
        output.push_str(&format!("- Purpose: {}\n", q.purpose));
        output.push_str(&format!("- Expected answer: {}\n", q.expected_answer));
        output.push_str(&format!("- Scoring: {}\n\n", q.scoring_criteria));
    }

    output.push_str("## 7. References\n\n");
    for (key, label) in REFERENCE_LINKS {
        if let Some(url) = report.research_links.get(*key) {
            output.push_str(&format!("- [{}]({})\n", label, url));
        }
    }
    if report.research_links.is_empty() {
        output.push_str("- No research links available\n");
    }

    output.push_str("\n## 8. Project Health\n\n");
    output.push_str("| Metric | Value |\n|--------|-------|\n");
    output.push_str(&format!("| Stars | {} |\n", report.community.stars));
    output.push_str(&format!("| Contributors | {} |\n", report.community.contributors));
    output.push_str(&format!("| Open issues | {} |\n", report.community.open_issues));

    output.push_str(&format!(
        "\n---\n*Generated {} in {:.2}s*\n",
        report.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.analysis_secs
    ));

    output
}

fn push_suggestion(output: &mut String, index: usize, suggestion: &Suggestion) {
    output.push_str(&format!(
        "#### Suggestion {}: {} (priority: {})\n\n",
        index, suggestion.title, suggestion.priority
    ));
    output.push_str(&format!("{}\n\n", suggestion.description));
    output.push_str(&format!("- Reason: {}\n", suggestion.reason));
    for measure in &suggestion.measures {
        output.push_str(&format!("- Measure: {}\n", measure));
    }
    output.push_str(&format!("- Expected effect: {}\n\n", suggestion.expected_effect));
}

fn category_weight(report: &InnovationReport, category: DimensionCategory) -> f64 {
    report.dimensions_in(category).map(|d| d.weight).sum()
}

pub fn render_innovation_text(report: &InnovationReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n=== Innovation Assessment: {} ===\n\n", report.repo_name));
    output.push_str(&format!("{}\n\n", report.core_value_summary.replace("**", "")));
    output.push_str(&format!(
        "Total: {:.1}/100 {} ({})\n",
        report.total_score,
        star_string(report.level.stars()),
        report.level
    ));
    output.push_str(&format!("Type: {}\n", report.innovation_type));
    output.push_str(&format!(
        "Technology: {:.1}  Scenario: {:.1}\n\n",
        report.tech_score, report.scenario_score
    ));

    output.push_str("Dimensions:\n");
    for dim in &report.dimensions {
        output.push_str(&format!("  {:<30} {} {:>5.1}\n", dim.label, bar(dim.score), dim.score));
    }
    output.push_str(&format!("\n{}\n", report.radar_analysis));

    let top: Vec<&Suggestion> = report
        .tech_suggestions
        .iter()
        .chain(&report.scenario_suggestions)
        .chain(&report.product_suggestions)
        .take(5)
        .collect();
    if !top.is_empty() {
        output.push_str("\nSuggestions:\n");
        for s in top {
            output.push_str(&format!("  - [{}] {}\n", s.priority, s.title));
        }
    }

    output.push_str(&format!(
        "\nAnalyzed on: {} ({:.2}s)\n",
        report.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.analysis_secs
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RepoInfo;
    use crate::report::QualityEvaluator;
    use crate::scoring::{DimensionWeights, InnovationScorer};

    fn sample_report() -> InnovationReport {
        let repo = RepoInfo {
            name: "memorymate".to_string(),
            full_name: "acme/memorymate".to_string(),
            html_url: "https://github.com/acme/memorymate".to_string(),
            description: "Voice companion for Alzheimer patients".to_string(),
            readme: "# MemoryMate\nAn agent that helps elderly users.".to_string(),
            requirements: "langgraph\nfastapi\n".to_string(),
            ..Default::default()
        };
        InnovationScorer::new().score(&repo, &DimensionWeights::innovation())
    }

    #[test]
    fn test_markdown_sections() {
        let markdown = render_innovation_markdown(&sample_report());
        for section in [
            "## 1. Project Overview",
            "## 2. Innovation Verdict",
            "## 3. Capability Radar",
            "## 4. Dimension Analysis",
            "## 5. Improvement Suggestions",
            "## 6. Judge Focus",
            "## 7. References",
            "## 8. Project Health",
        ] {
            assert!(markdown.contains(section), "missing {}", section);
        }
        assert!(markdown.contains("### 4.6 Market fit"));
        assert!(markdown.contains("(priority: high)"));
        assert!(markdown.contains("| Technology innovation |"));
    }

    #[test]
    fn test_template_is_complete_for_quality_check() {
        let markdown = render_innovation_markdown(&sample_report());
        let quality = QualityEvaluator::new().evaluate(&markdown);
        assert_eq!(quality.completeness, 100.0);
        assert!(quality.missing_sections.is_empty());
    }

    #[test]
    fn test_text_summary() {
        let text = render_innovation_text(&sample_report());
        assert!(text.contains("=== Innovation Assessment: acme/memorymate ==="));
        assert!(!text.contains("**"));
        assert!(text.contains("Suggestions:"));
    }
}
