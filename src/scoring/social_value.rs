use std::time::Instant;

use chrono::Utc;

use crate::analysis::keywords::{contains_any, excerpt, fold, matching};
use crate::models::{
    Confidence, DimensionCategory, DimensionScore, EthicsAssessment, EthicsRiskLevel,
    EvaluationKind, FairnessAwareness, PrivacyCompliance, RepoInfo, SocialValueLevel,
    SocialValueReport,
};
use crate::scoring::innovation::display_name;
use crate::scoring::weights::{spec, DimensionWeights};

const SOCIAL_IMPACT_WORDS: &[&str] = &[
    "医疗", "健康", "教育", "养老", "残障", "无障碍", "弱势群体", "社会问题",
    "community", "health", "education", "elderly", "disability", "vulnerable",
];
const ENVIRONMENTAL_WORDS: &[&str] = &[
    "环保", "可持续", "绿色", "气候", "低碳", "碳中和",
    "environment", "sustainable", "green", "climate",
];
const CHARITY_WORDS: &[&str] = &[
    "公益", "慈善", "非营利", "普惠", "accessibility", "charity", "nonprofit", "public good",
];
const VISION_WORDS: &[&str] = &[
    "长期", "愿景", "变革", "未来", "sustainable", "vision", "future", "transformation",
];

/// Risk category, matching words, score penalty and the level it escalates to.
const ETHICS_RISKS: &[(&str, &[&str], f64, Option<EthicsRiskLevel>)] = &[
    ("surveillance", &["监控", "surveillance", "monitoring", "tracking"], 30.0, Some(EthicsRiskLevel::NeedsAttention)),
    ("discrimination", &["歧视", "偏见", "bias", "discrimination"], 25.0, Some(EthicsRiskLevel::NeedsAttention)),
    ("harm", &["危害", "伤害", "harm", "danger"], 40.0, Some(EthicsRiskLevel::Dangerous)),
    ("deception", &["欺骗", "操纵", "deception", "manipulation"], 20.0, Some(EthicsRiskLevel::NeedsAttention)),
    ("privacy", &["隐私", "数据收集", "data collection", "privacy"], 0.0, None),
];

const PRIVACY_WORDS: &[&str] = &["隐私", "数据保护", "privacy", "data protection", "consent", "同意"];
const DATA_COLLECTION_WORDS: &[&str] = &["数据收集", "用户数据", "data collection", "user data"];
const FAIRNESS_WORDS: &[&str] = &["公平", "bias", "歧视", "fairness", "equity", "inclusion"];
const DIVERSITY_WORDS: &[&str] = &["多样性", "inclusion", "包容性", "diversity"];
const GROUP_WORDS: &[(&str, &str)] = &[
    ("老人", "older adults"),
    ("elderly", "older adults"),
    ("儿童", "children"),
    ("children", "children"),
    ("残障", "people with disabilities"),
    ("disabled", "people with disabilities"),
    ("弱势群体", "vulnerable groups"),
    ("vulnerable", "vulnerable groups"),
];
const PROBLEM_SOLVING_WORDS: &[&str] = &["解决", "问题", "solution", "solve", "address"];
const SUSTAINABILITY_WORDS: &[&str] = &["可持续", "sustainable", "绿色", "green", "低碳", "low carbon"];
const EFFICIENCY_WORDS: &[&str] = &["节能", "减排", "资源节约", "energy saving", "resource efficiency"];
const INCLUSIVE_WORDS: &[&str] = &["普惠", "无障碍", "accessibility", "inclusive", "affordable"];
const NONPROFIT_WORDS: &[&str] = &["非营利", "nonprofit", "慈善", "charity", "公益", "public good"];
const CHANGE_WORDS: &[&str] = &["变革", "创新", "transformation", "innovation", "change"];
const SYSTEMIC_WORDS: &[&str] = &["系统", "生态", "system", "ecosystem", "holistic"];

#[derive(Debug, Clone)]
struct DimensionEval {
    score: f64,
    level: Confidence,
    analysis: String,
}

/// Scores a repository's social value: a three-part ethics baseline plus
/// four bonus dimensions.
#[derive(Default)]
pub struct SocialValueScorer;

impl SocialValueScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, repo: &RepoInfo, weights: &DimensionWeights) -> SocialValueReport {
        let started = Instant::now();
        let weights = weights.normalized();
        let text = fold(&repo.narrative());

        let ethics = assess_ethics(&text);
        let (privacy, privacy_compliance) = assess_privacy(&text, repo.license_name.is_some());
        let (fairness, fairness_awareness) = assess_fairness(&text);
        let impact = assess_social_impact(&text);
        let environment = assess_environment(&text);
        let charity = assess_charity(&text);
        let vision = assess_vision(&text);

        let evals: [(&str, &DimensionEval); 7] = [
            ("ethics_redline", &ethics.0),
            ("privacy_protection", &privacy),
            ("algorithm_fairness", &fairness),
            ("social_impact", &impact),
            ("environmental_friendliness", &environment),
            ("charity_orientation", &charity),
            ("long_term_vision", &vision),
        ];
        let dimensions: Vec<DimensionScore> = evals
            .iter()
            .map(|(key, eval)| {
                let (label, category) = spec(EvaluationKind::SocialValue, key)
                    .map(|s| (s.label, s.category))
                    .unwrap_or((*key, DimensionCategory::Bonus));
                DimensionScore::new(key, label, eval.score, weights.get(key), eval.analysis.clone(), category)
            })
            .collect();

        let total_score: f64 = dimensions.iter().map(|d| d.weighted_score).sum();
        let basic_score: f64 = dimensions
            .iter()
            .filter(|d| d.category == DimensionCategory::Basic)
            .map(|d| d.weighted_score)
            .sum();
        let bonus_score = total_score - basic_score;

        let bonus = [
            ("social_impact", &impact, "Social problem-solving"),
            ("environmental_friendliness", &environment, "Environment-friendly"),
            ("charity_orientation", &charity, "Charity and inclusion"),
            ("long_term_vision", &vision, "Vision-led transformation"),
        ];

        let value_types = value_types(&bonus);
        let highlights = highlights(&dimensions, &ethics.1);
        let suggestions = suggestions(&dimensions, &ethics.1, privacy_compliance, fairness_awareness);
        let judge_focus_points = judge_points(&ethics.1, &impact, &environment, &charity, &vision);
        let (confidence, information_sufficiency) = confidence(repo);

        let report = SocialValueReport {
            repo_name: display_name(repo),
            repo_url: repo.url(),
            description: repo.description.clone(),
            total_score,
            level: SocialValueLevel::from_score(total_score),
            core_value_summary: core_value_summary(repo, &text, &value_types),
            value_types,
            basic_score,
            bonus_score,
            dimensions,
            ethics: ethics.1,
            privacy_compliance,
            fairness_awareness,
            highlights,
            suggestions,
            judge_focus_points,
            confidence,
            information_sufficiency,
            analysis_secs: started.elapsed().as_secs_f64(),
            analyzed_at: Utc::now(),
        };

        tracing::info!(
            "Social value score for {}: {:.1} ({})",
            report.repo_name,
            report.total_score,
            report.level
        );
        report
    }
}

fn assess_ethics(text: &str) -> (DimensionEval, EthicsAssessment) {
    let mut score: f64 = 80.0;
    let mut risk_level = EthicsRiskLevel::Safe;
    let mut detected = Vec::new();

    for &(category, words, penalty, escalation) in ETHICS_RISKS {
        if !contains_any(text, words) {
            continue;
        }
        detected.push(category.to_string());
        score -= penalty;
        match escalation {
            Some(EthicsRiskLevel::Dangerous) => risk_level = EthicsRiskLevel::Dangerous,
            Some(level) if risk_level == EthicsRiskLevel::Safe => risk_level = level,
            _ => {}
        }
    }

    let analysis = if detected.is_empty() {
        "No evident ethical risk in the project description".to_string()
    } else {
        format!("Potential risk areas mentioned: {}", detected.join(", "))
    };

    (
        DimensionEval {
            score: score.clamp(0.0, 100.0),
            level: Confidence::Medium,
            analysis,
        },
        EthicsAssessment {
            risk_level,
            detected_risks: detected,
        },
    )
}

fn assess_privacy(text: &str, has_license: bool) -> (DimensionEval, PrivacyCompliance) {
    let mut score: f64 = 70.0;
    let mut parts = Vec::new();

    if contains_any(text, PRIVACY_WORDS) {
        score += 15.0;
        parts.push("Mentions privacy or data protection measures");
    }
    if contains_any(text, DATA_COLLECTION_WORDS) {
        parts.push("Collects user data");
    }
    if has_license {
        score += 10.0;
        parts.push("Published under an explicit license");
    }

    let compliance = match score {
        s if s >= 90.0 => PrivacyCompliance::Compliant,
        s if s < 60.0 => PrivacyCompliance::NonCompliant,
        _ => PrivacyCompliance::Basic,
    };
    let analysis = if parts.is_empty() {
        "No privacy statement found".to_string()
    } else {
        parts.join("; ")
    };

    (
        DimensionEval {
            score: score.min(100.0),
            level: Confidence::Medium,
            analysis,
        },
        compliance,
    )
}

fn assess_fairness(text: &str) -> (DimensionEval, FairnessAwareness) {
    let mut score: f64 = 60.0;
    let mut parts = Vec::new();

    let aware = contains_any(text, FAIRNESS_WORDS);
    if aware {
        score += 25.0;
        parts.push("Addresses fairness or bias explicitly");
    }
    if contains_any(text, DIVERSITY_WORDS) {
        score += 10.0;
        parts.push("Considers diversity and inclusion");
    }

    let awareness = if aware {
        FairnessAwareness::HighlyAware
    } else if score < 50.0 {
        FairnessAwareness::Lacking
    } else {
        FairnessAwareness::Basic
    };
    let analysis = if parts.is_empty() {
        "No discussion of algorithmic fairness".to_string()
    } else {
        parts.join("; ")
    };

    (
        DimensionEval {
            score: score.min(100.0),
            level: Confidence::Medium,
            analysis,
        },
        awareness,
    )
}

fn detected_groups(text: &str) -> Vec<&'static str> {
    let mut groups: Vec<&'static str> = Vec::new();
    for &(word, group) in GROUP_WORDS {
        if text.contains(word) && !groups.contains(&group) {
            groups.push(group);
        }
    }
    groups
}

fn assess_social_impact(text: &str) -> DimensionEval {
    let mut eval = DimensionEval {
        score: 50.0,
        level: Confidence::Medium,
        analysis: String::new(),
    };
    let mut parts = Vec::new();

    let found = matching(text, SOCIAL_IMPACT_WORDS);
    if !found.is_empty() {
        eval.score += 25.0;
        eval.level = Confidence::High;
        parts.push(format!("Works on social issues ({})", found.join(", ")));
    }
    let groups = detected_groups(text);
    if !groups.is_empty() {
        eval.score += 15.0;
        parts.push(format!("Serves {}", groups.join(", ")));
    }
    if contains_any(text, PROBLEM_SOLVING_WORDS) {
        eval.score += 10.0;
        parts.push("Frames a concrete problem to solve".to_string());
    }

    eval.score = eval.score.min(100.0);
    eval.analysis = if parts.is_empty() {
        "Social impact is not described".to_string()
    } else {
        parts.join("; ")
    };
    eval
}

fn assess_environment(text: &str) -> DimensionEval {
    let mut eval = DimensionEval {
        score: 40.0,
        level: Confidence::Low,
        analysis: String::new(),
    };
    let mut parts = Vec::new();

    if contains_any(text, ENVIRONMENTAL_WORDS) {
        eval.score += 35.0;
        eval.level = Confidence::High;
        parts.push("Addresses environmental topics");
    }
    if contains_any(text, SUSTAINABILITY_WORDS) {
        eval.score += 15.0;
        parts.push("Emphasizes sustainability");
    }
    if contains_any(text, EFFICIENCY_WORDS) {
        eval.score += 10.0;
        parts.push("Targets energy or resource savings");
    }

    eval.score = eval.score.min(100.0);
    eval.analysis = if parts.is_empty() {
        "No environmental angle described".to_string()
    } else {
        parts.join("; ")
    };
    eval
}

fn assess_charity(text: &str) -> DimensionEval {
    let mut eval = DimensionEval {
        score: 45.0,
        level: Confidence::Medium,
        analysis: String::new(),
    };
    let mut parts = Vec::new();

    if contains_any(text, CHARITY_WORDS) {
        eval.score += 30.0;
        eval.level = Confidence::High;
        parts.push("Public-good orientation stated");
    }
    if contains_any(text, INCLUSIVE_WORDS) {
        eval.score += 15.0;
        parts.push("Designed to be inclusive or affordable");
    }
    if contains_any(text, NONPROFIT_WORDS) {
        eval.score += 10.0;
        parts.push("Nonprofit or charitable intent");
    }

    eval.score = eval.score.min(100.0);
    eval.analysis = if parts.is_empty() {
        "No public-good orientation described".to_string()
    } else {
        parts.join("; ")
    };
    eval
}

fn assess_vision(text: &str) -> DimensionEval {
    let mut eval = DimensionEval {
        score: 50.0,
        level: Confidence::Medium,
        analysis: String::new(),
    };
    let mut parts = Vec::new();

    if contains_any(text, VISION_WORDS) {
        eval.score += 20.0;
        eval.level = Confidence::High;
        parts.push("States a long-term vision");
    }
    if contains_any(text, CHANGE_WORDS) {
        eval.score += 15.0;
        parts.push("Aims at transformation rather than incremental change");
    }
    if contains_any(text, SYSTEMIC_WORDS) {
        eval.score += 10.0;
        parts.push("Takes a systemic view");
    }

    eval.score = eval.score.min(100.0);
    eval.analysis = if parts.is_empty() {
        "No long-term vision described".to_string()
    } else {
        parts.join("; ")
    };
    eval
}

fn value_types(bonus: &[(&str, &DimensionEval, &str); 4]) -> Vec<String> {
    let mut types: Vec<String> = bonus
        .iter()
        .filter(|(_, eval, _)| eval.level == Confidence::High)
        .map(|(_, _, label)| label.to_string())
        .collect();

    if types.is_empty() {
        if let Some((_, _, label)) = bonus
            .iter()
            .max_by(|a, b| a.1.score.total_cmp(&b.1.score))
        {
            types.push(label.to_string());
        }
    }
    types.truncate(2);
    types
}

fn highlights(dimensions: &[DimensionScore], ethics: &EthicsAssessment) -> Vec<String> {
    let mut out: Vec<String> = dimensions
        .iter()
        .filter(|d| d.category == DimensionCategory::Bonus && d.score >= 70.0)
        .map(|d| format!("{} ({:.0}): {}", d.label, d.score, d.details))
        .collect();
    if ethics.risk_level == EthicsRiskLevel::Safe {
        out.push("Clears the ethics baseline with no evident risk".to_string());
    }
    out.truncate(3);
    out
}

fn suggestions(
    dimensions: &[DimensionScore],
    ethics: &EthicsAssessment,
    privacy: PrivacyCompliance,
    fairness: FairnessAwareness,
) -> Vec<String> {
    let mut out = Vec::new();
    if ethics.risk_level != EthicsRiskLevel::Safe {
        out.push(format!(
            "Add explicit safeguards for the flagged risk areas ({})",
            ethics.detected_risks.join(", ")
        ));
    }
    if privacy != PrivacyCompliance::Compliant {
        out.push("Publish a privacy policy covering data handling and user consent".to_string());
    }
    if fairness != FairnessAwareness::HighlyAware {
        out.push("Evaluate outputs for bias and document fairness measures".to_string());
    }
    let weakest = dimensions
        .iter()
        .filter(|d| d.category == DimensionCategory::Bonus)
        .min_by(|a, b| a.score.total_cmp(&b.score));
    if let Some(dim) = weakest {
        if dim.score < 60.0 {
            out.push(format!("Strengthen {}", dim.label.to_lowercase()));
        }
    }
    out.truncate(3);
    out
}

fn judge_points(
    ethics: &EthicsAssessment,
    impact: &DimensionEval,
    environment: &DimensionEval,
    charity: &DimensionEval,
    vision: &DimensionEval,
) -> Vec<String> {
    let mut out = Vec::new();
    if ethics.risk_level != EthicsRiskLevel::Safe {
        out.push(format!(
            "How are the risks around {} mitigated?",
            ethics.detected_risks.join(" and ")
        ));
    }
    if impact.score >= 70.0 {
        out.push("What measurable social impact has the project achieved so far?".to_string());
    }
    if environment.level == Confidence::High {
        out.push("How is the environmental benefit quantified?".to_string());
    }
    if charity.level == Confidence::High {
        out.push("How will the project stay accessible and affordable for the people it serves?".to_string());
    }
    if vision.level == Confidence::High {
        out.push("What is the long-term roadmap, and who will sustain it?".to_string());
    }
    out.push("What is the core value proposition, and who benefits most?".to_string());
    out.truncate(5);
    out
}

/// Confidence and information sufficiency share one band.
fn confidence(repo: &RepoInfo) -> (Confidence, Confidence) {
    let has_description = !repo.description.trim().is_empty();
    let readme_len = repo.readme.chars().count();

    let level = if has_description && readme_len > 500 {
        Confidence::High
    } else if !has_description && readme_len < 200 {
        Confidence::Low
    } else {
        Confidence::Medium
    };
    (level, level)
}

fn core_value_summary(repo: &RepoInfo, text: &str, value_types: &[String]) -> String {
    let name = if repo.name.is_empty() { &repo.full_name } else { &repo.name };
    let description = repo.description.trim();

    let (lead, limit) = if let Some(group) = detected_groups(text).first() {
        (format!("**{}** is a project serving {}", name, group), 50)
    } else if let Some(kind) = value_types.first() {
        (format!("**{}** is a project focused on {}", name, kind.to_lowercase()), 50)
    } else {
        (format!("**{}** is an open-source project", name), 60)
    };

    if description.is_empty() {
        format!("{}.", lead)
    } else {
        format!("{}: {}", lead, excerpt(description, limit))
    }
}
