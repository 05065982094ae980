use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::analysis::keywords::{count_matching, fold};

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^(#{1,6})\s+(.*)$").unwrap());
static TOP_SECTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#{1,3}\s+").unwrap());
static STRUCTURE_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#{1,6}\s+.*|-\s+.*|\|.*\|)$").unwrap());
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[。！？.!?]").unwrap());

static PROFESSIONAL_ELEMENTS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("total score", r"(?i)total.*?/100"),
        ("radar or strengths", r"(?i)radar|strength"),
        ("improvement suggestions", r"(?i)suggestion"),
        ("judge focus", r"(?i)judge"),
        ("priorities", r"(?i)priority.*?(high|medium|low)"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).unwrap()))
    .collect()
});

/// Section name and the heading keywords that satisfy it, in expected order.
const REQUIRED_SECTIONS: &[(&str, &[&str])] = &[
    ("Project Overview", &["overview"]),
    ("Innovation Verdict", &["verdict", "conclusion"]),
    ("Capability Radar", &["radar"]),
    ("Dimension Analysis", &["dimension analysis", "dimensions"]),
    ("Improvement Suggestions", &["suggestion"]),
    ("Judge Focus", &["judge"]),
];

const DOMAIN_TERMS: &[&str] = &[
    "architecture", "scalability", "deployment", "ci/cd", "docker", "test",
    "framework", "agent", "llm", "api", "performance", "modular", "pipeline",
    "retrieval", "latency", "maintainability",
];

const MIN_SECTIONS: f64 = 8.0;
const TARGET_WORDS: f64 = 2000.0;
const DIMENSION_SECTIONS: f64 = 6.0;
const SHORT_SECTION_WORDS: usize = 150;
const TARGET_TERMS: f64 = 8.0;
const TARGET_STRUCTURE_ELEMENTS: f64 = 50.0;
const TARGET_TOP_SECTIONS: f64 = 10.0;
const PASS_SCORE: f64 = 70.0;

/// Five-metric quality score for a rendered Markdown report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityResult {
    pub overall: f64,
    pub completeness: f64,
    pub depth: f64,
    pub professionalism: f64,
    pub clarity: f64,
    pub structure: f64,
    pub is_qualified: bool,
    pub missing_sections: Vec<String>,
    pub suggestions: Vec<String>,
}

impl QualityResult {
    fn metrics(&self) -> [(&'static str, f64, f64); 5] {
        [
            ("Completeness", self.completeness, 0.25),
            ("Depth", self.depth, 0.30),
            ("Professionalism", self.professionalism, 0.20),
            ("Clarity", self.clarity, 0.15),
            ("Structure", self.structure, 0.10),
        ]
    }
}

#[derive(Default)]
pub struct QualityEvaluator;

impl QualityEvaluator {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, markdown: &str) -> QualityResult {
        let headings: Vec<(usize, String)> = HEADING
            .captures_iter(markdown)
            .map(|c| (c[1].len(), c[2].trim().to_lowercase()))
            .collect();

        let mut suggestions = Vec::new();

        let (completeness, missing_sections) = completeness(&headings);
        for section in &missing_sections {
            suggestions.push(format!("Add the missing section: {}", section));
        }

        let depth = depth(markdown);
        if depth < 60.0 {
            suggestions.push("Expand the dimension analyses with concrete evidence".to_string());
        }

        let professionalism = professionalism(markdown);
        if professionalism < 60.0 {
            suggestions.push("Use more precise technical terminology and explicit priorities".to_string());
        }

        let clarity = clarity(markdown, &headings);
        if clarity < 60.0 {
            suggestions.push("Shorten sentences and use lists or tables for key facts".to_string());
        }

        let (structure, section_count) = structure(markdown, &headings);
        if (section_count as f64) < MIN_SECTIONS {
            suggestions.push(format!(
                "Split the report into at least {} sections (found {})",
                MIN_SECTIONS, section_count
            ));
        }
        if structure < 60.0 {
            suggestions.push("Reorder sections: overview, verdict, radar, analysis, suggestions, judge focus".to_string());
        }

        let mut unique: Vec<String> = Vec::new();
        for s in suggestions {
            if !unique.contains(&s) {
                unique.push(s);
            }
        }
        unique.truncate(10);

        let mut result = QualityResult {
            completeness,
            depth,
            professionalism,
            clarity,
            structure,
            missing_sections,
            suggestions: unique,
            ..Default::default()
        };
        result.overall = result.metrics().iter().map(|(_, score, weight)| score * weight).sum();
        result.is_qualified = result.overall >= PASS_SCORE;
        result
    }
}

fn find_section(headings: &[(usize, String)], keywords: &[&str]) -> Option<usize> {
    headings
        .iter()
        .position(|(_, text)| keywords.iter().any(|k| text.contains(k)))
}

fn completeness(headings: &[(usize, String)]) -> (f64, Vec<String>) {
    let section_score = (headings.len() as f64 / MIN_SECTIONS * 100.0).min(100.0);
    let missing: Vec<String> = REQUIRED_SECTIONS
        .iter()
        .filter(|(_, keywords)| find_section(headings, keywords).is_none())
        .map(|(name, _)| name.to_string())
        .collect();
    let found = REQUIRED_SECTIONS.len() - missing.len();
    let required_score = found as f64 / REQUIRED_SECTIONS.len() as f64 * 60.0;
    (section_score * 0.4 + required_score, missing)
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Word counts of the subsections under the dimension analysis heading.
fn dimension_segments(markdown: &str) -> Vec<usize> {
    let mut segments = Vec::new();
    let mut in_analysis = false;
    let mut current: Option<usize> = None;

    for line in markdown.lines() {
        if let Some(caps) = HEADING.captures(line) {
            let level = caps[1].len();
            let text = caps[2].to_lowercase();
            if level <= 2 {
                if let Some(words) = current.take() {
                    segments.push(words);
                }
                in_analysis = text.contains("dimension analysis");
                continue;
            }
            if in_analysis && level == 3 {
                if let Some(words) = current.take() {
                    segments.push(words);
                }
                current = Some(0);
                continue;
            }
        }
        if let Some(words) = current.as_mut() {
            *words += word_count(line);
        }
    }
    if let Some(words) = current {
        segments.push(words);
    }
    segments
}

fn depth(markdown: &str) -> f64 {
    let words = word_count(markdown) as f64;
    let word_score = (words / TARGET_WORDS * 100.0).min(100.0);

    let segments = dimension_segments(markdown);
    let short = if segments.is_empty() {
        DIMENSION_SECTIONS
    } else {
        segments.iter().filter(|w| **w < SHORT_SECTION_WORDS).count() as f64
    };
    let segment_score = ((1.0 - short / DIMENSION_SECTIONS) * 100.0).max(0.0);

    word_score * 0.6 + segment_score * 0.4
}

fn professionalism(markdown: &str) -> f64 {
    let found = PROFESSIONAL_ELEMENTS
        .iter()
        .filter(|(_, re)| re.is_match(markdown))
        .count();
    let element_score = found as f64 / PROFESSIONAL_ELEMENTS.len() as f64 * 70.0;

    let terms = count_matching(&fold(markdown), DOMAIN_TERMS) as f64;
    let term_score = (terms / TARGET_TERMS * 100.0).min(100.0);

    element_score + term_score * 0.3
}

fn clarity(markdown: &str, headings: &[(usize, String)]) -> f64 {
    let elements = STRUCTURE_ELEMENT.find_iter(markdown).count() as f64;
    let structure_score = (elements / TARGET_STRUCTURE_ELEMENTS * 100.0).min(100.0);

    let sentences: Vec<&str> = SENTENCE_END
        .split(markdown)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let avg_words = if sentences.is_empty() {
        0.0
    } else {
        sentences.iter().map(|s| word_count(s)).sum::<usize>() as f64 / sentences.len() as f64
    };
    let readability = (100.0 - (avg_words - 15.0).max(0.0) * 2.0).max(0.0);

    let format_issues = match (
        headings.iter().map(|(l, _)| *l).min(),
        headings.iter().map(|(l, _)| *l).max(),
    ) {
        (Some(min), Some(max)) if max - min > 3 => 1.0,
        _ => 0.0,
    };
    let format_score = (100.0_f64 - 20.0 * format_issues).max(0.0);

    structure_score * 0.4 + readability * 0.4 + format_score * 0.2
}

fn structure(markdown: &str, headings: &[(usize, String)]) -> (f64, usize) {
    let positions: Vec<usize> = REQUIRED_SECTIONS
        .iter()
        .filter_map(|(_, keywords)| find_section(headings, keywords))
        .collect();
    let flow_issues = positions.windows(2).filter(|w| w[1] < w[0]).count() as f64;
    let flow_score = (100.0 - 20.0 * flow_issues).max(0.0);

    let sections = TOP_SECTION.find_iter(markdown).count();
    let section_score = (sections as f64 / TARGET_TOP_SECTIONS * 100.0).min(100.0);

    (flow_score * 0.6 + section_score * 0.4, sections)
}

pub fn render_quality_markdown(result: &QualityResult) -> String {
    let mut output = String::new();

    output.push_str("## Report Quality\n\n");
    output.push_str(&format!(
        "**Overall**: {:.1}/100 ({})\n\n",
        result.overall,
        if result.is_qualified { "qualified" } else { "not qualified" }
    ));

    output.push_str("| Metric | Score | Weight |\n|--------|-------|--------|\n");
    for (name, score, weight) in result.metrics() {
        output.push_str(&format!("| {} | {:.1} | {:.0}% |\n", name, score, weight * 100.0));
    }

    if !result.suggestions.is_empty() {
        output.push_str("\n### Quality suggestions\n\n");
        for s in &result.suggestions {
            output.push_str(&format!("- {}\n", s));
        }
    }

    let failing: Vec<_> = result.metrics().into_iter().filter(|(_, s, _)| *s < 60.0).collect();
    if !failing.is_empty() {
        output.push_str("\n### Reasons for low scores\n\n");
        for (name, score, _) in failing {
            output.push_str(&format!("- {} scored {:.1}, below 60\n", name, score));
        }
    }

    output.push_str("\n### Reference\n\n| Score | Grade |\n|-------|-------|\n");
    output.push_str("| ≥90 | Excellent |\n| ≥80 | Good |\n| ≥70 | Pass |\n| ≥60 | Basic |\n| <60 | Fail |\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completeness_math() {
        let headings = vec![
            (2, "project overview".to_string()),
            (2, "radar".to_string()),
            (2, "judge focus".to_string()),
            (2, "misc".to_string()),
        ];
        let (score, missing) = completeness(&headings);
        // 4/8 sections = 50 * 0.4 = 20, 3 of 6 required = 30
        assert_eq!(score, 50.0);
        assert_eq!(missing, vec!["Innovation Verdict", "Dimension Analysis", "Improvement Suggestions"]);
    }

    #[test]
    fn test_dimension_segments() {
        let md = "## Dimension Analysis\n### A\none two three\n### B\nfour\n## Next\nignored words here\n";
        assert_eq!(dimension_segments(md), vec![3, 1]);
    }

    #[test]
    fn test_flow_order_penalty() {
        let ordered = vec![
            (2, "overview".to_string()),
            (2, "verdict".to_string()),
            (2, "judge".to_string()),
        ];
        let swapped = vec![
            (2, "judge".to_string()),
            (2, "overview".to_string()),
            (2, "verdict".to_string()),
        ];
        let (ordered_score, _) = structure("", &ordered);
        let (swapped_score, _) = structure("", &swapped);
        assert_eq!(ordered_score, 60.0);
        assert_eq!(swapped_score, 48.0);
    }

    #[test]
    fn test_short_report_fails() {
        let result = QualityEvaluator::new().evaluate("# Title\n\nJust a line.\n");
        assert!(!result.is_qualified);
        assert_eq!(result.missing_sections.len(), 6);
        assert!(result.suggestions.len() <= 10);
        assert!(result.suggestions.iter().any(|s| s.starts_with("Split the report")));
        let rendered = render_quality_markdown(&result);
        assert!(rendered.contains("not qualified"));
        assert!(rendered.contains("### Reasons for low scores"));
    }
}
