use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::score::{DimensionCategory, DimensionScore, InnovationLevel, JudgeQuestion, Suggestion};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechDetails {
    pub packages: Vec<String>,
    pub cutting_edge: Vec<String>,
    pub modern: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeDetails {
    pub functions: usize,
    pub classes: usize,
    pub avg_complexity: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchitectureDetails {
    pub patterns: Vec<String>,
    pub depth: usize,
    pub modules: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineeringDetails {
    pub has_ci: bool,
    pub has_docker: bool,
    pub test_files: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolutionDetails {
    pub problem_clarity: f64,
    pub is_cross_domain: bool,
    pub domain_tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommunityHealth {
    pub stars: u32,
    pub contributors: u32,
    pub open_issues: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InnovationReport {
    pub repo_name: String,
    pub repo_url: String,
    pub description: String,
    pub language: Option<String>,
    pub stars: u32,

    pub total_score: f64,
    pub level: InnovationLevel,
    pub core_value_summary: String,
    pub innovation_type: String,
    pub tech_score: f64,
    pub scenario_score: f64,
    pub dimensions: Vec<DimensionScore>,

    pub radar_analysis: String,
    pub dimension_analyses: BTreeMap<String, String>,

    pub tech_suggestions: Vec<Suggestion>,
    pub scenario_suggestions: Vec<Suggestion>,
    pub product_suggestions: Vec<Suggestion>,
    pub judge_focus_points: Vec<JudgeQuestion>,

    pub tech_details: TechDetails,
    pub code_details: CodeDetails,
    pub architecture_details: ArchitectureDetails,
    pub engineering_details: EngineeringDetails,
    pub solution_details: SolutionDetails,
    pub research_links: BTreeMap<String, String>,
    pub community: CommunityHealth,

    pub analysis_secs: f64,
    pub analyzed_at: chrono::DateTime<chrono::Utc>,
}

impl InnovationReport {
    pub fn dimension(&self, key: &str) -> Option<&DimensionScore> {
        self.dimensions.iter().find(|d| d.key == key)
    }

    pub fn dimensions_in(&self, category: DimensionCategory) -> impl Iterator<Item = &DimensionScore> {
        self.dimensions.iter().filter(move |d| d.category == category)
    }
}
