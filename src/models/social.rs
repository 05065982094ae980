use serde::{Deserialize, Serialize};

use super::score::{DimensionCategory, DimensionScore, SocialValueLevel};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EthicsRiskLevel {
    Safe,
    NeedsAttention,
    Dangerous,
}

impl std::fmt::Display for EthicsRiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EthicsRiskLevel::Safe => write!(f, "Safe"),
            EthicsRiskLevel::NeedsAttention => write!(f, "Needs attention"),
            EthicsRiskLevel::Dangerous => write!(f, "Dangerous"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PrivacyCompliance {
    Compliant,
    Basic,
    NonCompliant,
}

impl std::fmt::Display for PrivacyCompliance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrivacyCompliance::Compliant => write!(f, "Compliant"),
            PrivacyCompliance::Basic => write!(f, "Basically compliant"),
            PrivacyCompliance::NonCompliant => write!(f, "Non-compliant"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FairnessAwareness {
    HighlyAware,
    Basic,
    Lacking,
}

impl std::fmt::Display for FairnessAwareness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FairnessAwareness::HighlyAware => write!(f, "Highly aware"),
            FairnessAwareness::Basic => write!(f, "Basic awareness"),
            FairnessAwareness::Lacking => write!(f, "Lacking"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "High"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthicsAssessment {
    pub risk_level: EthicsRiskLevel,
    pub detected_risks: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialValueReport {
    pub repo_name: String,
    pub repo_url: String,
    pub description: String,

    pub total_score: f64,
    pub level: SocialValueLevel,
    pub core_value_summary: String,
    pub value_types: Vec<String>,
    pub basic_score: f64,
    pub bonus_score: f64,
    pub dimensions: Vec<DimensionScore>,

    pub ethics: EthicsAssessment,
    pub privacy_compliance: PrivacyCompliance,
    pub fairness_awareness: FairnessAwareness,

    pub highlights: Vec<String>,
    pub suggestions: Vec<String>,
    pub judge_focus_points: Vec<String>,

    pub confidence: Confidence,
    pub information_sufficiency: Confidence,

    pub analysis_secs: f64,
    pub analyzed_at: chrono::DateTime<chrono::Utc>,
}

impl SocialValueReport {
    pub fn dimension(&self, key: &str) -> Option<&DimensionScore> {
        self.dimensions.iter().find(|d| d.key == key)
    }

    pub fn dimensions_in(&self, category: DimensionCategory) -> impl Iterator<Item = &DimensionScore> {
        self.dimensions.iter().filter(move |d| d.category == category)
    }

    /// Likelihood the claimed value is realized, read off the total.
    pub fn implementation_possibility(&self) -> Confidence {
        match self.total_score {
            s if s >= 80.0 => Confidence::High,
            s if s >= 60.0 => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}
