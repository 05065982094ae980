use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectIdentity {
    pub project_name: String,
    pub slogan: String,
    pub elevator_pitch: String,
    pub stage: String,
}

impl Default for ProjectIdentity {
    fn default() -> Self {
        Self {
            project_name: "Unknown Project".to_string(),
            slogan: "N/A".to_string(),
            elevator_pitch: "N/A".to_string(),
            stage: "Unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndustryAnalysis {
    pub detected_industry: String,
    pub market_size: String,
    pub cagr: String,
    pub source: String,
}

impl Default for IndustryAnalysis {
    fn default() -> Self {
        Self {
            detected_industry: "General".to_string(),
            market_size: "Not Found".to_string(),
            cagr: "Not Found".to_string(),
            source: "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Competitor {
    pub name: String,
    pub description: String,
    pub advantage: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FundingEcosystem {
    pub heat_level: String,
    pub trend_summary: String,
}

impl Default for FundingEcosystem {
    fn default() -> Self {
        Self {
            heat_level: "Unknown".to_string(),
            trend_summary: "Not Found".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PainPointValidation {
    #[serde(deserialize_with = "lenient_score")]
    pub score: f64,
    pub reason: String,
}

impl Default for PainPointValidation {
    fn default() -> Self {
        Self {
            score: 0.0,
            reason: "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicSentiment {
    pub label: String,
    pub summary: String,
}

impl Default for PublicSentiment {
    fn default() -> Self {
        Self {
            label: "Neutral".to_string(),
            summary: "Not Found".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessReport {
    pub project_identity: ProjectIdentity,
    pub industry_analysis: IndustryAnalysis,
    pub competitors: Vec<Competitor>,
    pub funding_ecosystem: FundingEcosystem,
    pub pain_point_validation: PainPointValidation,
    pub public_sentiment: PublicSentiment,
    pub risk_assessment: Vec<String>,
    pub search_keywords: Vec<String>,
    pub funding_mentions: Vec<String>,
}

impl Default for BusinessReport {
    fn default() -> Self {
        Self {
            project_identity: ProjectIdentity::default(),
            industry_analysis: IndustryAnalysis::default(),
            competitors: Vec::new(),
            funding_ecosystem: FundingEcosystem::default(),
            pain_point_validation: PainPointValidation::default(),
            public_sentiment: PublicSentiment::default(),
            risk_assessment: vec!["Risk identification failed".to_string()],
            search_keywords: Vec::new(),
            funding_mentions: Vec::new(),
        }
    }
}

impl BusinessReport {
    /// Top-level keys the analysis model is asked to produce.
    pub const SECTIONS: [&'static str; 7] = [
        "project_identity",
        "industry_analysis",
        "competitors",
        "funding_ecosystem",
        "pain_point_validation",
        "public_sentiment",
        "risk_assessment",
    ];
}

// Models return the score as 7, 7.5 or "7/10".
fn lenient_score<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s
            .split('/')
            .next()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0.0),
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_report_uses_defaults() {
        let report: BusinessReport = serde_json::from_str(
            r#"{"project_identity": {"project_name": "CareBot"},
                "pain_point_validation": {"score": "8/10", "reason": "Real demand"}}"#,
        )
        .unwrap();
        assert_eq!(report.project_identity.project_name, "CareBot");
        assert_eq!(report.project_identity.stage, "Unknown");
        assert_eq!(report.pain_point_validation.score, 8.0);
        assert_eq!(report.public_sentiment.label, "Neutral");
        assert_eq!(report.risk_assessment, vec!["Risk identification failed".to_string()]);
    }
}
