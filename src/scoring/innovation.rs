use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Utc;

use crate::analysis::keywords::{contains_any, excerpt, fold, matching};
use crate::analysis::{
    ArchitectureAnalyzer, ArchitectureResult, CodeAnalysisResult, CodeAnalyzer,
    EngineeringAnalyzer, EngineeringResult, SolutionAnalyzer, SolutionResult, TechStackAnalyzer,
    TechStackResult,
};
use crate::models::{
    ArchitectureDetails, CodeDetails, CommunityHealth, DimensionCategory, DimensionScore, EngineeringDetails,
    EvaluationKind, InnovationLevel, InnovationReport, JudgeQuestion, Priority, RepoInfo,
    SolutionDetails, Suggestion, TechDetails,
};
use crate::scoring::weights::{spec, DimensionWeights};

const SCENARIOS: &[(&str, &str, &[&str])] = &[
    ("healthcare", "healthcare", &["医疗", "健康", "患者", "诊断", "阿尔茨海默", "alzheimer", "medical", "health", "patient"]),
    ("education", "education", &["教育", "学习", "教学", "学生", "培训", "education", "learning", "student", "teacher"]),
    ("elderly_care", "elderly care", &["老年", "养老", "陪伴", "elderly", "senior", "aging", "care"]),
    ("accessibility", "accessibility", &["无障碍", "残障", "辅助", "accessibility", "disability", "assistive"]),
    ("mental_health", "mental health", &["心理", "情绪", "心灵", "mental", "emotion", "therapy", "counseling"]),
    ("environment", "environmental protection", &["环保", "可持续", "绿色", "environment", "sustainable", "green", "climate"]),
    ("social_good", "social good", &["公益", "慈善", "社会", "social", "charity", "nonprofit", "community"]),
    ("creative", "creative work", &["创作", "艺术", "音乐", "creative", "art", "music", "design"]),
    ("productivity", "productivity", &["效率", "自动化", "工作流", "productivity", "automation", "workflow"]),
    ("developer_tools", "developer tooling", &["开发者", "工具", "sdk", "api", "developer", "tools", "framework"]),
];

const HIGH_VALUE_SCENARIOS: &[&str] = &[
    "healthcare",
    "elderly_care",
    "accessibility",
    "mental_health",
    "social_good",
];

const SPECIFIC_GROUPS: &[(&[&str], &str, f64)] = &[
    (&["alzheimer", "阿尔茨海默"], "Alzheimer's patients", 10.0),
    (&["elderly", "老年"], "elderly people", 5.0),
    (&["disabled", "残障", "无障碍"], "people with disabilities", 10.0),
    (&["child", "儿童"], "children", 5.0),
];

const INTEGRATION_WORDS: &[&str] = &["api", "sdk", "plugin", "extension", "integration", "webhook"];
const LLM_VENDORS: &[&str] = &["openai", "anthropic", "claude"];

#[derive(Debug, Clone, Default)]
pub struct ScenarioEvaluation {
    pub score: f64,
    pub scenarios: Vec<&'static str>,
    pub scenario_labels: Vec<&'static str>,
    pub specific_groups: Vec<&'static str>,
    pub analysis: String,
}

#[derive(Debug, Clone, Default)]
pub struct MarketEvaluation {
    pub score: f64,
    pub analysis: String,
}

/// Outputs of the five repository analyzers for one run.
pub struct AnalyzerOutputs {
    pub tech: TechStackResult,
    pub architecture: ArchitectureResult,
    pub code: CodeAnalysisResult,
    pub engineering: EngineeringResult,
    pub solution: SolutionResult,
}

/// Scores a repository's innovation across three technology and three
/// scenario dimensions.
pub struct InnovationScorer {
    tech: TechStackAnalyzer,
    architecture: ArchitectureAnalyzer,
    code: CodeAnalyzer,
    engineering: EngineeringAnalyzer,
    solution: SolutionAnalyzer,
}

impl InnovationScorer {
    pub fn new() -> Self {
        Self {
            tech: TechStackAnalyzer::new(),
            architecture: ArchitectureAnalyzer::new(),
            code: CodeAnalyzer::new(),
            engineering: EngineeringAnalyzer::new(),
            solution: SolutionAnalyzer::new(),
        }
    }

    pub fn run_analyzers(&self, repo: &RepoInfo) -> AnalyzerOutputs {
        let readme = if repo.readme.trim().is_empty() {
            repo.description.as_str()
        } else {
            repo.readme.as_str()
        };
        AnalyzerOutputs {
            tech: self.tech.analyze(&repo.requirements, &repo.pyproject),
            architecture: self.architecture.analyze(&repo.directory_tree, &repo.source_files),
            code: self.code.analyze(&repo.code_files),
            engineering: self
                .engineering
                .analyze(&repo.directory_tree, &repo.source_files, &repo.readme),
            solution: self.solution.analyze(readme),
        }
    }

    pub fn score(&self, repo: &RepoInfo, weights: &DimensionWeights) -> InnovationReport {
        let started = Instant::now();
        let weights = weights.normalized();
        let outputs = self.run_analyzers(repo);

        let text = fold(&repo.narrative());
        let scenario = evaluate_scenario(&text, &outputs.solution);
        let market = evaluate_market(repo, &text, &outputs.tech);

        let dimension = |key: &str, score: f64, details: String| {
            let (label, category) = spec(EvaluationKind::Innovation, key)
                .map(|s| (s.label, s.category))
                .unwrap_or((key, DimensionCategory::Tech));
            DimensionScore::new(key, label, score, weights.get(key), details, category)
        };

        let dimensions = vec![
            dimension("tech_implementation", outputs.tech.score, outputs.tech.details.clone()),
            dimension(
                "architecture_design",
                outputs.architecture.score,
                outputs.architecture.details.clone(),
            ),
            dimension(
                "engineering_sustainability",
                outputs.engineering.score,
                outputs.engineering.details.clone(),
            ),
            dimension("problem_value", outputs.solution.score, outputs.solution.details.clone()),
            dimension("scenario_innovation", scenario.score, scenario.analysis.clone()),
            dimension("market_fit", market.score, market.analysis.clone()),
        ];

        let total_score: f64 = dimensions.iter().map(|d| d.weighted_score).sum();
        let tech_score: f64 = dimensions
            .iter()
            .filter(|d| d.category == DimensionCategory::Tech)
            .map(|d| d.weighted_score)
            .sum();
        let scenario_score = total_score - tech_score;

        let mut dimension_analyses = BTreeMap::new();
        dimension_analyses.insert("tech_implementation".to_string(), analyze_tech(&outputs));
        dimension_analyses.insert(
            "architecture_design".to_string(),
            analyze_architecture(&outputs.architecture),
        );
        dimension_analyses.insert(
            "engineering_sustainability".to_string(),
            analyze_engineering(&outputs.engineering),
        );
        dimension_analyses.insert("problem_value".to_string(), analyze_problem(&outputs.solution));
        dimension_analyses.insert("scenario_innovation".to_string(), scenario.analysis.clone());
        dimension_analyses.insert("market_fit".to_string(), market.analysis.clone());

        let report = InnovationReport {
            repo_name: display_name(repo),
            repo_url: repo.url(),
            description: repo.description.clone(),
            language: repo.language.clone(),
            stars: repo.stars,
            total_score,
            level: InnovationLevel::from_score(total_score),
            core_value_summary: core_value_summary(repo, &scenario),
            innovation_type: innovation_type(tech_score, scenario_score, total_score, &scenario),
            tech_score,
            scenario_score,
            radar_analysis: radar_analysis(&dimensions),
            dimensions,
            dimension_analyses,
            tech_suggestions: tech_suggestions(&outputs),
            scenario_suggestions: scenario_suggestions(&scenario, &outputs.solution),
            product_suggestions: product_suggestions(&outputs.engineering),
            judge_focus_points: judge_questions(repo, &outputs.tech, &scenario, total_score),
            tech_details: TechDetails {
                packages: outputs.tech.packages.clone(),
                cutting_edge: outputs.tech.cutting_edge.clone(),
                modern: outputs.tech.modern.clone(),
            },
            code_details: CodeDetails {
                functions: outputs.code.function_count + outputs.code.async_function_count,
                classes: outputs.code.class_count,
                avg_complexity: outputs.code.avg_complexity,
            },
            architecture_details: ArchitectureDetails {
                patterns: outputs.architecture.patterns.clone(),
                depth: outputs.architecture.depth,
                modules: outputs.architecture.module_count,
            },
            engineering_details: EngineeringDetails {
                has_ci: outputs.engineering.has_ci,
                has_docker: outputs.engineering.has_docker,
                test_files: outputs.engineering.test_file_count,
            },
            solution_details: SolutionDetails {
                problem_clarity: outputs.solution.problem_clarity,
                is_cross_domain: outputs.solution.is_cross_domain,
                domain_tags: outputs.solution.domain_tags.clone(),
            },
            research_links: repo.research_links.clone(),
            community: CommunityHealth {
                stars: repo.stars,
                contributors: repo.contributors_count,
                open_issues: repo.open_issues_count,
            },
            analysis_secs: started.elapsed().as_secs_f64(),
            analyzed_at: Utc::now(),
        };

        tracing::info!(
            "Innovation score for {}: {:.1} ({})",
            report.repo_name,
            report.total_score,
            report.level
        );
        report
    }
}

impl Default for InnovationScorer {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn display_name(repo: &RepoInfo) -> String {
    if repo.full_name.is_empty() {
        repo.name.clone()
    } else {
        repo.full_name.clone()
    }
}

pub fn evaluate_scenario(text: &str, solution: &SolutionResult) -> ScenarioEvaluation {
    let mut eval = ScenarioEvaluation {
        score: 40.0,
        ..Default::default()
    };

    for &(key, label, words) in SCENARIOS {
        if contains_any(text, words) {
            eval.scenarios.push(key);
            eval.scenario_labels.push(label);
        }
    }

    let mut parts = Vec::new();
    if !eval.scenarios.is_empty() {
        let high_value = eval.scenarios.iter().any(|s| HIGH_VALUE_SCENARIOS.contains(s));
        eval.score += if high_value { 25.0 } else { 15.0 };
        let labels = eval.scenario_labels.iter().take(2).copied().collect::<Vec<_>>().join(" and ");
        parts.push(if high_value {
            format!("Targets high-value scenarios: {}", labels)
        } else {
            format!("Targets {} scenarios", labels)
        });
    }

    for &(words, group, bonus) in SPECIFIC_GROUPS {
        if contains_any(text, words) {
            eval.score += bonus;
            eval.specific_groups.push(group);
        }
    }
    if !eval.specific_groups.is_empty() {
        parts.push(format!("Serves specific groups: {}", eval.specific_groups.join(", ")));
    }

    if solution.is_cross_domain && eval.scenarios.len() >= 2 {
        eval.score += 10.0;
        parts.push("Combines several application domains".to_string());
    }

    if solution.problem_clarity > 0.7 {
        eval.score += 5.0;
        parts.push("Problem statement is clear".to_string());
    }

    eval.score = eval.score.min(100.0);
    eval.analysis = if parts.is_empty() {
        "No clear application scenario detected; clarify target users and use cases".to_string()
    } else {
        parts.join("; ")
    };
    eval
}

pub fn evaluate_market(repo: &RepoInfo, text: &str, tech: &TechStackResult) -> MarketEvaluation {
    let mut score: f64 = 40.0;
    let mut parts = Vec::new();

    if !tech.cutting_edge.is_empty() {
        score += 20.0;
        parts.push(format!(
            "Built on a cutting-edge stack ({})",
            tech.cutting_edge.iter().take(2).cloned().collect::<Vec<_>>().join(", ")
        ));
    } else if !tech.modern.is_empty() {
        score += 10.0;
        parts.push("Uses a modern technology stack".to_string());
    }

    if repo.stars > 1000 {
        score += 15.0;
        parts.push(format!("Strong community traction ({} stars)", repo.stars));
    } else if repo.stars > 100 {
        score += 8.0;
        parts.push(format!("Some community traction ({} stars)", repo.stars));
    }

    let integrations = matching(text, INTEGRATION_WORDS);
    if !integrations.is_empty() {
        score += 10.0;
        parts.push(format!("Integration-friendly ({})", integrations.join(", ")));
    }

    let license = repo.license_name.as_deref().unwrap_or("").to_lowercase();
    if license.contains("mit") || license.contains("apache") {
        score += 5.0;
        parts.push("Permissive open-source license".to_string());
    }

    MarketEvaluation {
        score: score.min(100.0),
        analysis: if parts.is_empty() {
            "Few market signals detected".to_string()
        } else {
            parts.join("; ")
        },
    }
}

fn core_value_summary(repo: &RepoInfo, scenario: &ScenarioEvaluation) -> String {
    let name = if repo.name.is_empty() { &repo.full_name } else { &repo.name };
    let description = repo.description.trim();

    let (lead, limit) = if let Some(group) = scenario.specific_groups.first() {
        (format!("**{}** is an AI application for {}", name, group), 50)
    } else if let Some(label) = scenario.scenario_labels.first() {
        (format!("**{}** is an AI application for {}", name, label), 50)
    } else {
        (format!("**{}** is an AI application project", name), 60)
    };

    if description.is_empty() {
        format!("{}.", lead)
    } else {
        format!("{}: {}", lead, excerpt(description, limit))
    }
}

fn innovation_type(tech: f64, scenario: f64, total: f64, eval: &ScenarioEvaluation) -> String {
    if scenario > tech * 1.2 {
        if !eval.specific_groups.is_empty() {
            "Social-value innovation focused on specific groups".to_string()
        } else {
            "Scenario-driven practical innovation".to_string()
        }
    } else if tech > scenario * 0.8 {
        "Engineering-led technical innovation".to_string()
    } else if total >= 75.0 {
        "Well-rounded innovation across technology and scenario".to_string()
    } else if total >= 60.0 {
        "Application project with moderate innovation".to_string()
    } else {
        "Incremental improvement project".to_string()
    }
}

pub fn radar_analysis(dimensions: &[DimensionScore]) -> String {
    let mut sorted: Vec<&DimensionScore> = dimensions.iter().collect();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));

    let strengths: Vec<String> = sorted
        .iter()
        .take(2)
        .filter(|d| d.score >= 60.0)
        .map(|d| format!("{} ({:.0})", d.label, d.score))
        .collect();
    let weaknesses: Vec<String> = sorted
        .iter()
        .rev()
        .take(2)
        .filter(|d| d.score < 60.0)
        .map(|d| format!("{} ({:.0})", d.label, d.score))
        .collect();

    let mut parts = Vec::new();
    if !strengths.is_empty() {
        parts.push(format!("Strengths: {}", strengths.join(", ")));
    }
    if !weaknesses.is_empty() {
        parts.push(format!("Weaknesses: {}", weaknesses.join(", ")));
    }
    if parts.is_empty() {
        "Scores are balanced across all dimensions".to_string()
    } else {
        format!("{}.", parts.join(". "))
    }
}

fn analyze_tech(outputs: &AnalyzerOutputs) -> String {
    let tech = &outputs.tech;
    let complexity = outputs.code.avg_complexity;
    let quality = if complexity < 8.0 {
        "the code structure is reasonable"
    } else {
        "some functions are overly complex"
    };
    let top3 = |items: &[String]| items.iter().take(3).cloned().collect::<Vec<_>>().join(", ");

    if !tech.cutting_edge.is_empty() {
        format!(
            "Adopts cutting-edge AI frameworks ({}); {} (average complexity {:.1}).",
            top3(&tech.cutting_edge),
            quality,
            complexity
        )
    } else if !tech.modern.is_empty() {
        format!(
            "Uses a modern stack ({}); {} (average complexity {:.1}).",
            top3(&tech.modern),
            quality,
            complexity
        )
    } else {
        "Relies on a basic technology stack without frontier frameworks.".to_string()
    }
}

fn analyze_architecture(arch: &ArchitectureResult) -> String {
    let mut parts = Vec::new();
    if !arch.patterns.is_empty() {
        parts.push(arch.architecture_type.clone());
        parts.push(arch.coupling_assessment.to_lowercase());
        if arch.module_count >= 5 {
            parts.push("clear module boundaries".to_string());
        }
    } else {
        parts.push(format!(
            "Directory depth {} with {} modules",
            arch.depth, arch.module_count
        ));
        parts.push(arch.coupling_assessment.to_lowercase());
    }
    if let Some(template) = &arch.template {
        parts.push(format!("structure follows the {} template", template));
    }
    format!("{}.", parts.join("; "))
}

fn analyze_engineering(eng: &EngineeringResult) -> String {
    let mut features = Vec::new();
    if eng.has_ci {
        features.push("CI/CD".to_string());
    }
    if eng.has_docker {
        features.push("Docker".to_string());
    }
    if eng.has_tests {
        features.push(format!("tests ({} files)", eng.test_file_count));
    }

    match features.len() {
        0 => "No CI, containerization or tests detected.".to_string(),
        1 => format!("Some engineering practice in place: {}.", features[0]),
        _ => format!("Solid engineering practice: {}.", features.join(", ")),
    }
}

fn analyze_problem(solution: &SolutionResult) -> String {
    let clarity = solution.problem_clarity;
    if clarity > 0.7 {
        format!(
            "The problem is clearly framed, with users and scenarios spelled out (clarity {:.0}%).",
            clarity * 100.0
        )
    } else if clarity > 0.4 {
        format!(
            "The problem is partly framed; target users or pain points need more detail (clarity {:.0}%).",
            clarity * 100.0
        )
    } else {
        format!(
            "The problem definition is vague (clarity {:.0}%).",
            clarity * 100.0
        )
    }
}

fn suggestion(
    title: &str,
    description: &str,
    reason: &str,
    measures: &[&str],
    expected_effect: &str,
    priority: Priority,
) -> Suggestion {
    Suggestion {
        title: title.to_string(),
        description: description.to_string(),
        reason: reason.to_string(),
        measures: measures.iter().map(|m| m.to_string()).collect(),
        expected_effect: expected_effect.to_string(),
        priority,
    }
}

fn tech_suggestions(outputs: &AnalyzerOutputs) -> Vec<Suggestion> {
    let mut out = Vec::new();
    if outputs.tech.cutting_edge.is_empty() {
        out.push(suggestion(
            "Adopt frontier AI frameworks",
            "Introduce agent or retrieval frameworks such as LangGraph, LlamaIndex or DSPy.",
            "No cutting-edge dependencies were detected.",
            &[
                "Prototype the core flow with an agent framework",
                "Add retrieval augmentation where domain knowledge matters",
            ],
            "Raises the technical ceiling and the tech-implementation score.",
            Priority::High,
        ));
    }
    if outputs.code.avg_complexity < 2.0 {
        out.push(suggestion(
            "Strengthen core algorithm implementation",
            "Move beyond API wrapping with project-specific logic.",
            "Average control-flow complexity is low, which suggests thin wrappers.",
            &[
                "Implement domain-specific ranking, planning or evaluation logic",
                "Document the algorithmic choices in the README",
            ],
            "Shows original technical contribution.",
            Priority::High,
        ));
    }
    if outputs.architecture.patterns.is_empty() {
        out.push(suggestion(
            "Improve system architecture",
            "Organize code into explicit layers or components.",
            "No recognizable architecture pattern was found.",
            &[
                "Separate core logic, integrations and interface code",
                "Introduce module boundaries such as services/, core/ and adapters/",
            ],
            "Improves maintainability and the architecture score.",
            Priority::Medium,
        ));
    }
    if !outputs.engineering.has_tests {
        out.push(suggestion(
            "Build out a test suite",
            "Add automated tests for the critical paths.",
            "No test files were detected.",
            &["Cover core logic with unit tests", "Run tests in CI on every push"],
            "Demonstrates reliability to judges and users.",
            Priority::Medium,
        ));
    }
    out.truncate(3);
    out
}

fn scenario_suggestions(scenario: &ScenarioEvaluation, solution: &SolutionResult) -> Vec<Suggestion> {
    let mut out = Vec::new();
    if scenario.specific_groups.is_empty() {
        out.push(suggestion(
            "Define target user groups",
            "Name the specific people the project serves.",
            "No specific user group was identified.",
            &["Write user personas", "Describe one concrete day-in-the-life scenario"],
            "Makes the social and commercial value tangible.",
            Priority::High,
        ));
    }
    if solution.problem_clarity < 0.6 {
        out.push(suggestion(
            "Sharpen the problem definition",
            "State the pain point, who has it and why current options fail.",
            "The README leaves the problem statement unclear.",
            &["Add a Background or Motivation section", "Quantify the pain point with data"],
            "Raises the problem-value score and judge confidence.",
            Priority::High,
        ));
    }
    if scenario.scenarios.is_empty() {
        out.push(suggestion(
            "Focus on high-value scenarios",
            "Anchor the project in a domain such as healthcare, education or accessibility.",
            "No application scenario was detected.",
            &["Pick one scenario and tailor the demo to it"],
            "Lifts the scenario-innovation score.",
            Priority::High,
        ));
    }
    out.push(suggestion(
        "Establish a user feedback loop",
        "Collect feedback from real users and iterate.",
        "Validated demand is the strongest evidence of value.",
        &["Run short user interviews", "Track usage metrics in the demo"],
        "Provides evidence for market fit.",
        Priority::Medium,
    ));
    out.truncate(3);
    out
}

fn product_suggestions(eng: &EngineeringResult) -> Vec<Suggestion> {
    let mut out = Vec::new();
    if !eng.has_docker {
        out.push(suggestion(
            "Add container support",
            "Provide a Dockerfile and a compose file for one-command startup.",
            "No container configuration was detected.",
            &["Write a Dockerfile", "Document `docker compose up` in the README"],
            "Lets judges run the project in minutes.",
            Priority::Medium,
        ));
    }
    if !eng.has_ci {
        out.push(suggestion(
            "Set up CI/CD",
            "Automate linting, tests and builds.",
            "No CI configuration was detected.",
            &["Add a GitHub Actions workflow"],
            "Signals engineering maturity.",
            Priority::Medium,
        ));
    }
    out.push(suggestion(
        "Publish an online demo",
        "Deploy a hosted demo that judges can try without setup.",
        "A live experience communicates value faster than a README.",
        &["Deploy to a free hosting tier", "Link the demo at the top of the README"],
        "Improves judge engagement and perceived completeness.",
        Priority::High,
    ));
    out.push(suggestion(
        "Improve technical docs",
        "Document architecture, setup and limitations.",
        "Clear docs make the project easier to evaluate and adopt.",
        &["Add an architecture diagram", "List known limitations and roadmap"],
        "Improves clarity for judges and contributors.",
        Priority::Medium,
    ));
    out.truncate(3);
    out
}

fn judge_question(question: &str, purpose: &str, expected: &str, criteria: &str) -> JudgeQuestion {
    JudgeQuestion {
        question: question.to_string(),
        purpose: purpose.to_string(),
        expected_answer: expected.to_string(),
        scoring_criteria: criteria.to_string(),
    }
}

fn judge_questions(
    repo: &RepoInfo,
    tech: &TechStackResult,
    scenario: &ScenarioEvaluation,
    total: f64,
) -> Vec<JudgeQuestion> {
    let mut out = Vec::new();

    if let Some(group) = scenario.specific_groups.first() {
        out.push(judge_question(
            &format!("How did you learn what {} actually need?", group),
            "Checks depth of user understanding.",
            "Interviews, field observation or domain experts involved in design.",
            "High marks for first-hand user research.",
        ));
    }

    let uses_llm_api = tech
        .packages
        .iter()
        .any(|p| LLM_VENDORS.iter().any(|v| p.contains(v)));
    if uses_llm_api {
        out.push(judge_question(
            "What does the project add beyond calling a hosted LLM API, and what does it cost to run?",
            "Separates original contribution from API wrapping.",
            "Specific prompting, retrieval or orchestration logic plus a cost estimate.",
            "High marks for clear value-add and cost awareness.",
        ));
    }

    if total >= 70.0 {
        out.push(judge_question(
            "Can you demo the core flow live, end to end?",
            "Verifies the implementation matches the claims.",
            "A working demo of the main scenario.",
            "High marks for a stable live demo.",
        ));
    }

    out.push(judge_question(
        "How does this differ from existing solutions?",
        "Assesses differentiation.",
        "Named alternatives and a concrete point of difference.",
        "High marks for a clear, evidenced differentiator.",
    ));

    if repo.stars > 500 {
        out.push(judge_question(
            "What have you learned from community feedback?",
            "Checks whether traction informs the roadmap.",
            "Examples of issues or requests that changed the product.",
            "High marks for evidence of iteration.",
        ));
    }

    out.push(judge_question(
        "Why this architecture, and how would it scale?",
        "Probes technical judgement.",
        "Trade-offs considered and a plan for growth.",
        "High marks for reasoned trade-offs.",
    ));

    out.push(judge_question(
        "What is new about the application scenario itself?",
        "Assesses scenario innovation.",
        "An underserved need or a new combination of domains.",
        "High marks for a novel, well-motivated scenario.",
    ));

    out.truncate(5);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_repo() -> RepoInfo {
        RepoInfo {
            owner: "acme".to_string(),
            name: "memorymate".to_string(),
            full_name: "acme/memorymate".to_string(),
            description: "Voice companion for Alzheimer patients and their caregivers".to_string(),
            stars: 150,
            license_name: Some("MIT License".to_string()),
            readme: "# MemoryMate\n\nA multi-agent assistant for elderly people with memory loss. \
                     It solves the problem of forgotten routines with retrieval and voice reminders.\n"
                .to_string(),
            requirements: "langgraph\nopenai\nfastapi\n".to_string(),
            directory_tree: vec![
                "src/".to_string(),
                "src/agents/".to_string(),
                "src/tools/".to_string(),
                "src/agents/planner.py".to_string(),
                "Dockerfile".to_string(),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_scenario_evaluation() {
        let repo = sample_repo();
        let text = fold(&repo.narrative());
        let solution = SolutionResult::default();
        let eval = evaluate_scenario(&text, &solution);
        assert!(eval.scenarios.contains(&"healthcare"));
        assert!(eval.scenarios.contains(&"elderly_care"));
        assert_eq!(eval.specific_groups, vec!["Alzheimer's patients", "elderly people"]);
        // 40 + 25 (high value) + 10 + 5
        assert_eq!(eval.score, 80.0);
        assert!(eval.analysis.starts_with("Targets high-value scenarios"));
    }

    #[test]
    fn test_scenario_nothing_detected() {
        let eval = evaluate_scenario("a b c", &SolutionResult::default());
        assert_eq!(eval.score, 40.0);
        assert!(eval.analysis.contains("clarify target users"));
    }

    #[test]
    fn test_market_fit() {
        let repo = sample_repo();
        let text = fold(&repo.narrative());
        let tech = TechStackAnalyzer::new().analyze(&repo.requirements, "");
        let market = evaluate_market(&repo, &text, &tech);
        // 40 + 20 (cutting edge) + 8 (stars) + 5 (MIT)
        assert_eq!(market.score, 73.0);
        assert!(market.analysis.contains("langgraph, openai"));
    }

    #[test]
    fn test_full_report() {
        let report = InnovationScorer::new().score(&sample_repo(), &DimensionWeights::innovation());
        assert_eq!(report.dimensions.len(), 6);
        let weight_sum: f64 = report.dimensions.iter().map(|d| d.weight).sum();
        assert!((weight_sum - 100.0).abs() < 1e-9);
        assert!((report.tech_score + report.scenario_score - report.total_score).abs() < 1e-9);
        assert_eq!(report.dimensions_in(DimensionCategory::Tech).count(), 3);
        assert_eq!(report.level, InnovationLevel::from_score(report.total_score));
        assert!(report.core_value_summary.starts_with("**memorymate** is an AI application for Alzheimer's patients"));
        assert!(report.tech_suggestions.len() <= 3);
        assert!(report.scenario_suggestions.len() <= 3);
        assert!(report.product_suggestions.len() <= 3);
        assert!(report.judge_focus_points.len() <= 5);
        assert!(report.judge_focus_points[0].question.contains("Alzheimer's patients"));
        assert!(report.judge_focus_points[1].question.contains("LLM API"));
        assert_eq!(report.dimension_analyses.len(), 6);
    }

    #[test]
    fn test_radar_analysis() {
        let dims = vec![
            DimensionScore::new("a", "Alpha", 85.0, 50.0, "", DimensionCategory::Tech),
            DimensionScore::new("b", "Beta", 55.0, 25.0, "", DimensionCategory::Tech),
            DimensionScore::new("c", "Gamma", 30.0, 25.0, "", DimensionCategory::Scenario),
        ];
        assert_eq!(
            radar_analysis(&dims),
            "Strengths: Alpha (85). Weaknesses: Gamma (30), Beta (55)."
        );

        let balanced = vec![DimensionScore::new("a", "Alpha", 59.0, 100.0, "", DimensionCategory::Tech)];
        assert_eq!(radar_analysis(&balanced), "Weaknesses: Alpha (59).");
    }

    #[test]
    fn test_innovation_type() {
        let eval = ScenarioEvaluation::default();
        assert_eq!(innovation_type(10.0, 30.0, 40.0, &eval), "Scenario-driven practical innovation");
        assert_eq!(innovation_type(30.0, 30.0, 60.0, &eval), "Engineering-led technical innovation");
        assert_eq!(innovation_type(0.0, 0.0, 0.0, &eval), "Incremental improvement project");
    }
}
