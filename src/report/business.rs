use crate::models::BusinessReport;

pub fn render_business_markdown(report: &BusinessReport) -> String {
    let identity = &report.project_identity;
    let industry = &report.industry_analysis;
    let mut output = String::new();

    output.push_str(&format!("# Business Potential: {}\n\n", identity.project_name));
    if identity.slogan != "N/A" && !identity.slogan.is_empty() {
        output.push_str(&format!("> {}\n\n", identity.slogan));
    }
    output.push_str(&format!("{}\n\n", identity.elevator_pitch));

    output.push_str("## Summary\n\n");
    output.push_str("| Metric | Value |\n|--------|-------|\n");
    output.push_str(&format!("| Stage | {} |\n", identity.stage));
    output.push_str(&format!("| Industry | {} |\n", industry.detected_industry));
    output.push_str(&format!("| Market size | {} |\n", industry.market_size));
    output.push_str(&format!("| CAGR | {} |\n", industry.cagr));
    output.push_str(&format!("| Source | {} |\n", industry.source));
    output.push_str(&format!(
        "| Funding heat | {} |\n",
        report.funding_ecosystem.heat_level
    ));
    output.push_str(&format!(
        "| Pain point | {:.1}/10 |\n",
        report.pain_point_validation.score
    ));
    output.push_str(&format!("| Sentiment | {} |\n", report.public_sentiment.label));

    output.push_str("\n## Pain Point Validation\n\n");
    output.push_str(&format!("{}\n", report.pain_point_validation.reason));

    if !report.competitors.is_empty() {
        output.push_str("\n## Competitors\n\n");
        output.push_str("| Name | Description | Our Advantage |\n|------|-------------|---------------|\n");
        for c in &report.competitors {
            output.push_str(&format!("| {} | {} | {} |\n", c.name, c.description, c.advantage));
        }
    }

    output.push_str("\n## Funding Landscape\n\n");
    output.push_str(&format!("{}\n", report.funding_ecosystem.trend_summary));
    if !report.funding_mentions.is_empty() {
        output.push_str(&format!(
            "\nAmounts seen in search results: {}\n",
            report.funding_mentions.join(", ")
        ));
    }

    output.push_str("\n## Public Sentiment\n\n");
    output.push_str(&format!("{}\n", report.public_sentiment.summary));

    output.push_str("\n## Risks\n\n");
    for risk in &report.risk_assessment {
        output.push_str(&format!("- {}\n", risk));
    }

    if !report.search_keywords.is_empty() {
        output.push_str(&format!(
            "\n---\n*Researched with: {}*\n",
            report.search_keywords.join(", ")
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Competitor;

    #[test]
    fn test_render_business_markdown() {
        let mut report = BusinessReport::default();
        report.project_identity.project_name = "MemoryMate".to_string();
        report.competitors.push(Competitor {
            name: "CareBot".to_string(),
            description: "Companion robot".to_string(),
            advantage: "Cheaper".to_string(),
        });
        report.funding_mentions = vec!["12 million USD".to_string()];

        let md = render_business_markdown(&report);
        assert!(md.starts_with("# Business Potential: MemoryMate"));
        assert!(md.contains("| CareBot | Companion robot | Cheaper |"));
        assert!(md.contains("| Pain point | 0.0/10 |"));
        assert!(md.contains("12 million USD"));
        assert!(md.contains("- Risk identification failed"));
        assert!(!md.contains("> N/A"));
    }
}
