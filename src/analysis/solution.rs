use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::analysis::keywords::{contains_any, count_matching, fold, matching};

const INNOVATION_KEYWORDS: &[&str] = &[
    "novel", "innovative", "breakthrough", "first", "unique", "state-of-the-art",
    "cutting-edge", "pioneering", "revolutionary",
    "创新", "首创", "突破", "独创", "领先", "原创", "新颖", "前沿", "开创性", "革命性",
];

const DOMAINS: &[(&str, &[&str])] = &[
    ("nlp", &["nlp", "natural language", "text", "语言", "文本", "对话", "chatbot"]),
    ("cv", &["computer vision", "image", "video", "视觉", "图像", "视频", "检测"]),
    ("ml", &["machine learning", "deep learning", "neural", "机器学习", "深度学习", "神经网络"]),
    ("rag", &["rag", "retrieval", "knowledge base", "检索", "知识库", "向量"]),
    ("agent", &["agent", "autonomous", "multi-agent", "智能体", "代理", "自主"]),
    ("audio", &["audio", "speech", "voice", "音频", "语音", "声音"]),
    ("recommendation", &["recommendation", "personalization", "推荐", "个性化"]),
    ("automation", &["automation", "workflow", "pipeline", "自动化", "工作流"]),
];

const CROSS_DOMAIN_PAIRS: &[(&str, &str)] = &[
    ("nlp", "cv"),
    ("agent", "rag"),
    ("audio", "nlp"),
    ("ml", "automation"),
];

const PROBLEM_WORDS: &[&str] = &[
    "problem", "challenge", "issue", "solve", "address", "pain point",
    "问题", "挑战", "解决", "痛点", "需求", "困难",
];
const SCENARIO_WORDS: &[&str] = &[
    "use case", "scenario", "application", "example", "demo",
    "场景", "应用", "用途", "示例", "案例",
];
const USER_WORDS: &[&str] = &[
    "user", "developer", "researcher", "team", "enterprise", "for ",
    "用户", "开发者", "研究者", "团队", "企业", "适合",
];
const BACKGROUND_WORDS: &[&str] = &[
    "background", "motivation", "why", "introduction", "overview",
    "背景", "动机", "为什么", "介绍", "概述",
];

const SECTION_KINDS: &[(&str, &[&str])] = &[
    ("title", &["# "]),
    ("description", &["introduction", "about", "overview", "介绍", "简介"]),
    ("features", &["feature", "功能", "特性"]),
    ("installation", &["install", "setup", "getting started", "安装", "开始"]),
    ("usage", &["usage", "how to", "example", "使用", "示例"]),
];

const TECH_WORDS: &[&str] = &[
    "algorithm", "model", "architecture", "pipeline", "framework", "method",
    "算法", "模型", "架构", "流程", "框架", "方法", "技术",
];
const COMPARISON_WORDS: &[&str] = &[
    "compared to", "unlike", "different from", "improve", "better than", " vs", "versus",
    "相比", "不同于", "改进", "优于", "区别",
];

static QUANTITATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+%|\d+x\b|\d+倍|\d+ms|\d+秒|accuracy|precision|recall|\bf1\b|准确率|性能|效率")
        .unwrap()
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadmeSections {
    pub title: String,
    pub description: String,
    pub features: String,
    pub usage: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionResult {
    pub score: f64,
    pub problem_clarity: f64,
    pub solution_uniqueness: f64,
    pub innovation_keywords: Vec<String>,
    pub domain_tags: Vec<String>,
    pub is_cross_domain: bool,
    pub details: String,
}

impl Default for SolutionResult {
    fn default() -> Self {
        Self {
            score: 30.0,
            problem_clarity: 0.0,
            solution_uniqueness: 0.0,
            innovation_keywords: Vec::new(),
            domain_tags: Vec::new(),
            is_cross_domain: false,
            details: "No README or project description detected".to_string(),
        }
    }
}

/// Reads the README for problem framing, domain coverage and claims of
/// originality.
#[derive(Default)]
pub struct SolutionAnalyzer;

impl SolutionAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, readme: &str) -> SolutionResult {
        if readme.trim().is_empty() {
            return SolutionResult::default();
        }

        let sections = split_sections(readme);
        let full = fold(readme);

        let innovation_keywords: Vec<String> = {
            let mut found: Vec<String> = Vec::new();
            for kw in matching(&full, INNOVATION_KEYWORDS) {
                if !found.iter().any(|f| f == kw) {
                    found.push(kw.to_string());
                }
            }
            found
        };

        let domain_tags: Vec<String> = DOMAINS
            .iter()
            .filter(|(_, words)| contains_any(&full, words))
            .map(|(tag, _)| tag.to_string())
            .collect();
        let is_cross_domain = domain_tags.len() >= 3
            || CROSS_DOMAIN_PAIRS.iter().any(|(a, b)| {
                domain_tags.iter().any(|t| t == a) && domain_tags.iter().any(|t| t == b)
            });

        let clarity_text = fold(&format!(
            "{} {} {}",
            sections.description, sections.title, readme
        ));
        let problem_clarity = clarity(&clarity_text, readme);
        let solution_uniqueness = uniqueness(&full, innovation_keywords.len(), domain_tags.len());

        let score = round1(problem_clarity * 40.0)
            + round1(solution_uniqueness * 40.0)
            + if is_cross_domain { 15.0 } else { 0.0 }
            + (2.0 * innovation_keywords.len() as f64).min(5.0);

        let mut details = Vec::new();
        if !domain_tags.is_empty() {
            details.push(format!("Domains: {}", domain_tags.join(", ")));
        }
        if is_cross_domain {
            details.push("Cross-domain".to_string());
        }
        if !innovation_keywords.is_empty() {
            details.push(format!(
                "Innovation keywords: {}",
                innovation_keywords.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
            ));
        }

        SolutionResult {
            score: score.clamp(0.0, 100.0),
            problem_clarity,
            solution_uniqueness,
            innovation_keywords,
            domain_tags,
            is_cross_domain,
            details: if details.is_empty() {
                "Problem definition needs work".to_string()
            } else {
                details.join("; ")
            },
        }
    }
}

#[derive(Clone, Copy)]
enum Section {
    Description,
    Features,
    Usage,
    Other,
}

pub fn split_sections(readme: &str) -> ReadmeSections {
    let mut sections = ReadmeSections::default();
    let mut current = Section::Description;

    for line in readme.lines() {
        let trimmed = line.trim();
        if let Some(title) = trimmed.strip_prefix("# ") {
            if sections.title.is_empty() {
                sections.title = title.trim().to_string();
            }
            continue;
        }
        if let Some(header) = trimmed.strip_prefix("## ") {
            let header = header.to_lowercase();
            current = if header.contains("feature") || header.contains("功能") {
                Section::Features
            } else if header.contains("usage")
                || header.contains("使用")
                || header.contains("getting started")
            {
                Section::Usage
            } else if header.contains("介绍")
                || header.contains("about")
                || header.contains("introduction")
            {
                Section::Description
            } else {
                Section::Other
            };
            continue;
        }

        let target = match current {
            Section::Features => &mut sections.features,
            Section::Usage => &mut sections.usage,
            Section::Description => &mut sections.description,
            Section::Other => continue,
        };
        target.push_str(line);
        target.push('\n');
    }

    sections
}

fn clarity(folded: &str, raw: &str) -> f64 {
    let mut score = 0.0;
    if contains_any(folded, PROBLEM_WORDS) {
        score += 20.0;
    }
    if contains_any(folded, SCENARIO_WORDS) {
        score += 15.0;
    }
    if contains_any(folded, USER_WORDS) {
        score += 15.0;
    }
    if contains_any(folded, BACKGROUND_WORDS) {
        score += 15.0;
    }

    let raw_folded = fold(raw);
    let section_kinds = SECTION_KINDS
        .iter()
        .filter(|(_, markers)| contains_any(&raw_folded, markers))
        .count();
    score += (5.0 * section_kinds as f64).min(20.0);

    score += match raw.chars().count() {
        800..=3000 => 15.0,
        400..=5000 => 10.0,
        n if n > 200 => 5.0,
        _ => 0.0,
    };

    score.min(100.0) / 100.0
}

fn uniqueness(folded: &str, keyword_count: usize, domain_count: usize) -> f64 {
    let mut score = (8.0 * keyword_count as f64).min(25.0);

    score += match domain_count {
        n if n >= 3 => 20.0,
        2 => 15.0,
        1 => 5.0,
        _ => 0.0,
    };

    score += match count_matching(folded, TECH_WORDS) {
        n if n >= 3 => 20.0,
        n if n >= 1 => 10.0,
        _ => 0.0,
    };

    if contains_any(folded, COMPARISON_WORDS) {
        score += 20.0;
    }
    if QUANTITATIVE.is_match(folded) {
        score += 15.0;
    }

    score.min(100.0) / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const README: &str = "# MemoryMate\n\n\
        An innovative multi-agent assistant for Alzheimer's caregivers.\n\n\
        ## About\nWhy MemoryMate? Families face the problem of tracking daily routines. \
        Unlike generic reminders, MemoryMate uses retrieval over a knowledge base.\n\n\
        ## Features\n- Voice reminders\n- Agent planner with 95% recall\n\n\
        ## Usage\nRun the demo with docker compose.\n";

    #[test]
    fn test_split_sections() {
        let sections = split_sections(README);
        assert_eq!(sections.title, "MemoryMate");
        assert!(sections.description.contains("innovative multi-agent"));
        assert!(sections.description.contains("Families face"));
        assert!(sections.features.contains("Voice reminders"));
        assert!(sections.usage.contains("docker compose"));
    }

    #[test]
    fn test_domains_and_cross_domain() {
        let result = SolutionAnalyzer::new().analyze(README);
        assert!(result.domain_tags.contains(&"agent".to_string()));
        assert!(result.domain_tags.contains(&"rag".to_string()));
        assert!(result.is_cross_domain);
        assert!(result.innovation_keywords.contains(&"innovative".to_string()));
        assert!(result.details.contains("Cross-domain"));
    }

    #[test]
    fn test_clarity_components() {
        let result = SolutionAnalyzer::new().analyze(README);
        // problem + scenario + user + background = 65, sections: title, description,
        // features, usage = 20, length > 200 = 5
        assert!((result.problem_clarity - 0.90).abs() < 1e-9);
        assert!(result.solution_uniqueness > 0.5);
        assert!(result.score > 60.0);
    }

    #[test]
    fn test_empty_readme() {
        let result = SolutionAnalyzer::new().analyze("   ");
        assert_eq!(result.score, 30.0);
        assert_eq!(result.details, "No README or project description detected");
    }
}
