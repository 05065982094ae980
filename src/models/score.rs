use serde::{Deserialize, Serialize};

/// Which scorer produced a report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EvaluationKind {
    Innovation,
    SocialValue,
}

impl EvaluationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationKind::Innovation => "innovation",
            EvaluationKind::SocialValue => "social_value",
        }
    }
}

impl std::fmt::Display for EvaluationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EvaluationKind {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s {
            "innovation" => Ok(EvaluationKind::Innovation),
            "social" | "social_value" => Ok(EvaluationKind::SocialValue),
            other => Err(crate::error::Error::ParseError(format!(
                "Unknown evaluation kind: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DimensionCategory {
    Tech,
    Scenario,
    Basic,
    Bonus,
}

impl std::fmt::Display for DimensionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DimensionCategory::Tech => write!(f, "Technology"),
            DimensionCategory::Scenario => write!(f, "Scenario"),
            DimensionCategory::Basic => write!(f, "Baseline"),
            DimensionCategory::Bonus => write!(f, "Bonus"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionScore {
    pub key: String,
    pub label: String,
    pub score: f64,
    pub weight: f64,
    pub weighted_score: f64,
    pub details: String,
    pub category: DimensionCategory,
}

impl DimensionScore {
    pub fn new(
        key: &str,
        label: &str,
        score: f64,
        weight: f64,
        details: impl Into<String>,
        category: DimensionCategory,
    ) -> Self {
        let score = score.clamp(0.0, 100.0);
        Self {
            key: key.to_string(),
            label: label.to_string(),
            score,
            weight,
            weighted_score: score * weight / 100.0,
            details: details.into(),
            category,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
    pub reason: String,
    pub measures: Vec<String>,
    pub expected_effect: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeQuestion {
    pub question: String,
    pub purpose: String,
    pub expected_answer: String,
    pub scoring_criteria: String,
}

/// Score band shared by both scorers. Lower bounds are inclusive, so 89.9
/// falls into the 75 band rather than between bands.
fn band(score: f64) -> usize {
    match score {
        s if s >= 90.0 => 0,
        s if s >= 75.0 => 1,
        s if s >= 60.0 => 2,
        s if s >= 40.0 => 3,
        _ => 4,
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InnovationLevel {
    Breakthrough,
    Significant,
    Moderate,
    Incremental,
    Conventional,
}

impl InnovationLevel {
    pub fn from_score(score: f64) -> Self {
        [
            InnovationLevel::Breakthrough,
            InnovationLevel::Significant,
            InnovationLevel::Moderate,
            InnovationLevel::Incremental,
            InnovationLevel::Conventional,
        ][band(score)]
    }

    pub fn stars(&self) -> u8 {
        match self {
            InnovationLevel::Breakthrough => 5,
            InnovationLevel::Significant => 4,
            InnovationLevel::Moderate => 3,
            InnovationLevel::Incremental => 2,
            InnovationLevel::Conventional => 1,
        }
    }
}

impl std::fmt::Display for InnovationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InnovationLevel::Breakthrough => write!(f, "Breakthrough innovation"),
            InnovationLevel::Significant => write!(f, "Significant innovation"),
            InnovationLevel::Moderate => write!(f, "Moderate innovation"),
            InnovationLevel::Incremental => write!(f, "Incremental innovation"),
            InnovationLevel::Conventional => write!(f, "Conventional implementation"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SocialValueLevel {
    Outstanding,
    Significant,
    Good,
    Fair,
    Limited,
}

impl SocialValueLevel {
    pub fn from_score(score: f64) -> Self {
        [
            SocialValueLevel::Outstanding,
            SocialValueLevel::Significant,
            SocialValueLevel::Good,
            SocialValueLevel::Fair,
            SocialValueLevel::Limited,
        ][band(score)]
    }

    pub fn stars(&self) -> u8 {
        match self {
            SocialValueLevel::Outstanding => 5,
            SocialValueLevel::Significant => 4,
            SocialValueLevel::Good => 3,
            SocialValueLevel::Fair => 2,
            SocialValueLevel::Limited => 1,
        }
    }
}

impl std::fmt::Display for SocialValueLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SocialValueLevel::Outstanding => write!(f, "Outstanding social value"),
            SocialValueLevel::Significant => write!(f, "Significant social value"),
            SocialValueLevel::Good => write!(f, "Good social value"),
            SocialValueLevel::Fair => write!(f, "Fair social value"),
            SocialValueLevel::Limited => write!(f, "Limited social value"),
        }
    }
}

pub fn star_string(stars: u8) -> String {
    let filled = stars.min(5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_bands_have_no_gaps() {
        assert_eq!(InnovationLevel::from_score(90.0), InnovationLevel::Breakthrough);
        assert_eq!(InnovationLevel::from_score(89.5), InnovationLevel::Significant);
        assert_eq!(InnovationLevel::from_score(74.99), InnovationLevel::Moderate);
        assert_eq!(InnovationLevel::from_score(40.0), InnovationLevel::Incremental);
        assert_eq!(InnovationLevel::from_score(39.9), InnovationLevel::Conventional);
        assert_eq!(SocialValueLevel::from_score(60.0), SocialValueLevel::Good);
        assert_eq!(SocialValueLevel::from_score(0.0).stars(), 1);
    }

    #[test]
    fn test_dimension_score_weighting() {
        let dim = DimensionScore::new("x", "X", 120.0, 25.0, "", DimensionCategory::Bonus);
        assert_eq!(dim.score, 100.0);
        assert_eq!(dim.weighted_score, 25.0);
    }

    #[test]
    fn test_star_string() {
        assert_eq!(star_string(3), "★★★☆☆");
    }
}
