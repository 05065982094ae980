use std::sync::Arc;

use crate::analysis::keywords::excerpt;
use crate::llm::prompts::report_request;
use crate::llm::LLMProvider;
use crate::models::{InnovationReport, SocialValueReport};
use crate::report::quality::{render_quality_markdown, QualityEvaluator};

/// Rewrites template reports with an LLM. Innovation reports also get a
/// quality review, whose required sections are innovation sections.
pub struct ReportOptimizer {
    llm: Option<Arc<dyn LLMProvider>>,
    quality: QualityEvaluator,
}

impl ReportOptimizer {
    pub fn new(llm: Option<Arc<dyn LLMProvider>>) -> Self {
        Self {
            llm,
            quality: QualityEvaluator::new(),
        }
    }

    pub async fn finalize_innovation(&self, report: &InnovationReport, template: String) -> String {
        let body = self.rewrite(template, innovation_data(report)).await;
        self.with_quality_appendix(body)
    }

    pub async fn finalize_social(&self, report: &SocialValueReport, template: String) -> String {
        self.rewrite(template, social_data(report)).await
    }

    async fn rewrite(&self, template: String, data: String) -> String {
        let Some(llm) = &self.llm else {
            return template;
        };

        tracing::info!("Refining report with {}", llm.name());
        match llm.complete(report_request(&template, &data)).await {
            Ok(text) => strip_markdown_fence(&text),
            Err(e) => {
                tracing::warn!("Report optimization failed, using template: {}", e);
                template
            }
        }
    }

    fn with_quality_appendix(&self, body: String) -> String {
        let result = self.quality.evaluate(&body);
        tracing::info!(
            "Report quality {:.1}/100 ({})",
            result.overall,
            if result.is_qualified { "qualified" } else { "not qualified" }
        );
        format!("{}\n\n{}", body.trim_end(), render_quality_markdown(&result))
    }
}

fn strip_markdown_fence(text: &str) -> String {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```markdown")
        .or_else(|| trimmed.strip_prefix("```md"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .map(|inner| inner.trim().to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

fn innovation_data(report: &InnovationReport) -> String {
    let mut data = String::new();
    data.push_str(&format!(
        "Project: {} ({})\nTotal: {:.1}/100, {}\nType: {}\nTechnology: {:.1}, Scenario: {:.1}\n\n",
        report.repo_name,
        report.repo_url,
        report.total_score,
        report.level,
        report.innovation_type,
        report.tech_score,
        report.scenario_score
    ));

    data.push_str("| Dimension | Score | Weight | Details |\n|---|---|---|---|\n");
    for dim in &report.dimensions {
        data.push_str(&format!(
            "| {} | {:.0} | {:.0}% | {} |\n",
            dim.label,
            dim.score,
            dim.weight,
            excerpt(&dim.details, 50)
        ));
    }

    data.push_str("\nAnalyses:\n");
    for (key, analysis) in &report.dimension_analyses {
        data.push_str(&format!("- {}: {}\n", key, analysis));
    }

    data.push_str("\nSuggestions:\n");
    for s in report
        .tech_suggestions
        .iter()
        .chain(&report.scenario_suggestions)
        .chain(&report.product_suggestions)
    {
        data.push_str(&format!("- [{}] {}: {}\n", s.priority, s.title, s.description));
    }

    data.push_str("\nJudge questions:\n");
    for q in &report.judge_focus_points {
        data.push_str(&format!("- {}\n", q.question));
    }
    data
}

fn social_data(report: &SocialValueReport) -> String {
    let mut data = String::new();
    data.push_str(&format!(
        "Project: {} ({})\nTotal: {:.1}/100, {}\nEthics: {}, Privacy: {}, Fairness: {}\n\n",
        report.repo_name,
        report.repo_url,
        report.total_score,
        report.level,
        report.ethics.risk_level,
        report.privacy_compliance,
        report.fairness_awareness
    ));

    data.push_str("| Dimension | Score | Weight | Details |\n|---|---|---|---|\n");
    for dim in &report.dimensions {
        data.push_str(&format!(
            "| {} | {:.0} | {:.0}% | {} |\n",
            dim.label,
            dim.score,
            dim.weight,
            excerpt(&dim.details, 50)
        ));
    }

    for (title, items) in [
        ("Highlights", &report.highlights),
        ("Suggestions", &report.suggestions),
        ("Judge questions", &report.judge_focus_points),
    ] {
        data.push_str(&format!("\n{}:\n", title));
        for item in items.iter() {
            data.push_str(&format!("- {}\n", item));
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::llm::CompletionRequest;
    use crate::models::RepoInfo;
    use crate::report::{render_innovation_markdown, render_social_markdown};
    use crate::scoring::{DimensionWeights, InnovationScorer, SocialValueScorer};
    use async_trait::async_trait;

    struct FixedLlm(Option<&'static str>);

    #[async_trait]
    impl LLMProvider for FixedLlm {
        async fn complete(&self, _request: CompletionRequest) -> Result<String> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| Error::LLMApi("boom".to_string()))
        }

        fn max_context_tokens(&self) -> usize {
            1000
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn report() -> InnovationReport {
        let repo = RepoInfo {
            name: "demo".to_string(),
            full_name: "acme/demo".to_string(),
            ..Default::default()
        };
        InnovationScorer::new().score(&repo, &DimensionWeights::innovation())
    }

    #[tokio::test]
    async fn test_llm_failure_falls_back_to_template() {
        let report = report();
        let template = render_innovation_markdown(&report);
        let optimizer = ReportOptimizer::new(Some(Arc::new(FixedLlm(None))));
        let output = optimizer.finalize_innovation(&report, template.clone()).await;
        assert!(output.starts_with(template.trim_end()));
        assert!(output.contains("## Report Quality"));
    }

    #[tokio::test]
    async fn test_uses_llm_rewrite() {
        let report = report();
        let optimizer = ReportOptimizer::new(Some(Arc::new(FixedLlm(Some(
            "```markdown\n# Rewritten\n```",
        )))));
        let output = optimizer.finalize_innovation(&report, "# Template".to_string()).await;
        assert!(output.starts_with("# Rewritten"));
        assert!(!output.contains("# Template"));
    }

    #[tokio::test]
    async fn test_social_report_has_no_innovation_review() {
        let repo = RepoInfo {
            name: "care".to_string(),
            full_name: "acme/care".to_string(),
            ..Default::default()
        };
        let report = SocialValueScorer::new().score(&repo, &DimensionWeights::social_value());
        let template = render_social_markdown(&report);
        let output = ReportOptimizer::new(None).finalize_social(&report, template.clone()).await;
        assert_eq!(output, template);
        assert!(!output.contains("Innovation Verdict"));
        assert!(!output.contains("## Report Quality"));
    }

    #[test]
    fn test_prompt_data_truncates_details() {
        let data = innovation_data(&report());
        assert!(data.contains("| Dimension | Score | Weight | Details |"));
        assert!(data.contains("Judge questions:"));
    }
}
