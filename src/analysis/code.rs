use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

static PY_FUNCTION: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^\s*def\s+\w+"));
static PY_ASYNC_FUNCTION: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^\s*async\s+def\s+\w+"));
static PY_CLASS: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^\s*class\s+\w+"));
static PY_CLASS_BASES: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^\s*class\s+\w+\s*\(([^)]*)\)"));
static PY_CONTROL: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?m)^\s*(?:if|elif|for|while|try|except|with|assert)\b"));
static PY_BOOL_OP: LazyLock<Regex> = LazyLock::new(|| re(r"\s(?:and|or)\s"));
static PY_DECORATOR: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^\s*@\w+"));
static PY_YIELD: LazyLock<Regex> = LazyLock::new(|| re(r"\byield\b"));
static PY_MAGIC_METHOD: LazyLock<Regex> = LazyLock::new(|| re(r"def\s+__\w+__"));

static COMPLEX_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"for\s+.+\s+in\s+.+:",
        r"while\s+.+:",
        r"if\s+.+:",
        r"try\s*:",
        r"async\s+def",
        r"yield\s+",
        r"@property",
        r"__\w+__",
    ]
    .into_iter()
    .map(re)
    .collect()
});

static WRAPPER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"return\s+\w+\.\w+\(",
        r"(?m)^\s*self\.\w+\s*=\s*\w+",
        r"(?m)^\s*pass\s*$",
    ]
    .into_iter()
    .map(re)
    .collect()
});

static JS_FUNCTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"function\s+\w+",
        r"const\s+\w+\s*=\s*(?:async\s+)?\(",
        r"(?:async\s+)?function\s*\(",
        r"\w+\s*:\s*(?:async\s+)?\(",
    ]
    .into_iter()
    .map(re)
    .collect()
});
static JS_CLASS: LazyLock<Regex> = LazyLock::new(|| re(r"(?:class|interface|type)\s+\w+"));
static JS_ASYNC: LazyLock<Regex> = LazyLock::new(|| re(r"async\s+(?:function|\()"));
static JS_COMPONENT: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?:export\s+)?(?:const|function)\s+\w+.*?(?:React\.FC|JSX\.Element|<\w+)")
});
static JS_HOOK: LazyLock<Regex> = LazyLock::new(|| re(r"use[A-Z]\w+"));
static JS_LOOP: LazyLock<Regex> = LazyLock::new(|| re(r"(?:for|while|\.map|\.forEach|\.reduce)\s*\("));
static JS_CONDITIONAL: LazyLock<Regex> = LazyLock::new(|| re(r"(?:if|switch|\?|&&|\|\|)"));

static DATA_STRUCTURE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| re(r"class\s+\w*(?:Tree|Graph|Queue|Stack|Heap|Cache|Buffer)"));

/// Algorithmic signals, each worth three points.
static ALGORITHM_SIGNALS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (
            r"(?i)def\s+\w*(?:sort|search|traverse|optimize|compute|calculate|parse|transform)",
            "algorithmic functions",
        ),
        (r"(?i)(?:递归|recursion|dynamic\s*programming|dp\[)", "recursion or dynamic programming"),
        (r"(?i)(?:bfs|dfs|dijkstra|backtrack)", "graph search algorithms"),
        (r"(?i)(?:embedding|vector|similarity|distance)", "vector similarity computation"),
        (r"(?i)(?:tokenize|parse|compile|interpret)", "parsing or compilation"),
        (r"(?i)(?:agent|orchestrat|pipeline|workflow)", "agent orchestration"),
    ]
    .into_iter()
    .map(|(p, label)| (re(p), label))
    .collect()
});

static DESIGN_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"class\s+\w*Factory", "factory"),
        (r"class\s+\w*Singleton|_instance\s*=", "singleton"),
        (r"class\s+\w*Observer|on_\w+|emit|subscribe", "observer"),
        (r"class\s+\w*Strategy|execute\s*\(", "strategy"),
        (r"__enter__|__exit__|with\s+", "context manager"),
    ]
    .into_iter()
    .map(|(p, label)| (re(p), label))
    .collect()
});

const PYTHON_INDICATORS: &[&str] = &["def ", "class ", "import ", "from ", "self.", "elif "];
const JS_INDICATORS: &[&str] = &["const ", "let ", "function ", "=>", "export ", "import {"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourceDialect {
    Python,
    JavaScript,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub size: f64,
    pub complexity: f64,
    pub custom: f64,
    pub algorithm: f64,
    pub async_bonus: f64,
    pub design_patterns: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeAnalysisResult {
    pub score: f64,
    pub dialect: Option<SourceDialect>,
    pub function_count: usize,
    pub async_function_count: usize,
    pub class_count: usize,
    pub avg_complexity: f64,
    pub custom_implementations: usize,
    pub key_features: Vec<String>,
    pub innovation_reasons: Vec<String>,
    pub design_patterns: Vec<String>,
    pub breakdown: ScoreBreakdown,
    pub algorithm_innovation_score: f64,
    pub implementation_quality_score: f64,
    pub novelty_score: f64,
    pub novelty_explanation: String,
    pub details: String,
}

impl Default for CodeAnalysisResult {
    fn default() -> Self {
        Self {
            score: 30.0,
            dialect: None,
            function_count: 0,
            async_function_count: 0,
            class_count: 0,
            avg_complexity: 0.0,
            custom_implementations: 0,
            key_features: Vec::new(),
            innovation_reasons: Vec::new(),
            design_patterns: Vec::new(),
            breakdown: ScoreBreakdown::default(),
            algorithm_innovation_score: 0.0,
            implementation_quality_score: 0.0,
            novelty_score: 0.5,
            novelty_explanation: String::new(),
            details: "No code files detected".to_string(),
        }
    }
}

/// Counts gathered from one pass over the sampled sources.
#[derive(Debug, Default)]
struct SourceMetrics {
    functions: usize,
    async_functions: usize,
    classes: usize,
    complexity: f64,
    custom: usize,
    features: Vec<String>,
}

/// Regex-level approximation of code structure and originality. No parser
/// is involved, so counts are estimates.
#[derive(Default)]
pub struct CodeAnalyzer;

impl CodeAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, code_files: &BTreeMap<String, String>) -> CodeAnalysisResult {
        if code_files.is_empty() {
            return CodeAnalysisResult::default();
        }

        let all_code = code_files.values().cloned().collect::<Vec<_>>().join("\n\n");
        let dialect = detect_dialect(&all_code);
        let metrics = match dialect {
            SourceDialect::Python => python_metrics(&all_code),
            SourceDialect::JavaScript => javascript_metrics(&all_code),
        };

        let innovation_reasons: Vec<String> = {
            let mut reasons = Vec::new();
            if DATA_STRUCTURE_CLASS.is_match(&all_code) {
                reasons.push("custom data structures".to_string());
            }
            reasons.extend(
                ALGORITHM_SIGNALS
                    .iter()
                    .filter(|(re, _)| re.is_match(&all_code))
                    .map(|(_, label)| label.to_string()),
            );
            reasons
        };

        let design_patterns: Vec<String> = DESIGN_PATTERNS
            .iter()
            .filter(|(re, _)| re.is_match(&all_code))
            .map(|(_, label)| label.to_string())
            .collect();

        let breakdown = breakdown(&metrics, &all_code, design_patterns.len());
        let score = (breakdown.base
            + breakdown.size
            + breakdown.complexity
            + breakdown.custom
            + breakdown.algorithm
            + breakdown.async_bonus
            + breakdown.design_patterns)
            .clamp(0.0, 100.0);

        let novelty_score = 0.5;
        let novelty_explanation = explain_novelty(
            novelty_score,
            &innovation_reasons,
            &design_patterns,
            metrics.custom,
        );

        let details = format!(
            "Functions: {}, Classes: {}, Complexity: {:.1}, Algorithm innovation: {}",
            metrics.functions + metrics.async_functions,
            metrics.classes,
            metrics.complexity,
            breakdown.algorithm
        );

        CodeAnalysisResult {
            score,
            dialect: Some(dialect),
            function_count: metrics.functions,
            async_function_count: metrics.async_functions,
            class_count: metrics.classes,
            avg_complexity: metrics.complexity,
            custom_implementations: metrics.custom,
            key_features: metrics.features,
            innovation_reasons,
            design_patterns,
            algorithm_innovation_score: breakdown.algorithm + breakdown.custom * 0.5,
            implementation_quality_score: breakdown.complexity
                + breakdown.size
                + breakdown.async_bonus
                + breakdown.design_patterns,
            breakdown,
            novelty_score,
            novelty_explanation,
            details,
        }
    }
}

pub fn detect_dialect(code: &str) -> SourceDialect {
    // Distinct indicators present, not occurrences
    let python = PYTHON_INDICATORS.iter().filter(|i| code.contains(**i)).count();
    let js = JS_INDICATORS.iter().filter(|i| code.contains(**i)).count();
    if python > js {
        SourceDialect::Python
    } else {
        SourceDialect::JavaScript
    }
}

fn python_metrics(code: &str) -> SourceMetrics {
    let functions = PY_FUNCTION.find_iter(code).count();
    let async_functions = PY_ASYNC_FUNCTION.find_iter(code).count();
    let classes = PY_CLASS.find_iter(code).count();

    let control = PY_CONTROL.find_iter(code).count() + PY_BOOL_OP.find_iter(code).count();
    let all_functions = functions + async_functions;
    let complexity = if all_functions > 0 {
        control as f64 / all_functions as f64
    } else {
        control as f64
    };

    let complex: usize = COMPLEX_PATTERNS.iter().map(|r| r.find_iter(code).count()).sum();
    let wrappers: usize = WRAPPER_PATTERNS.iter().map(|r| r.find_iter(code).count()).sum();
    let custom = complex.saturating_sub(wrappers);

    let mut features = Vec::new();
    if async_functions > 0 {
        features.push(format!("{} async functions", async_functions));
    }
    if PY_YIELD.is_match(code) {
        features.push("generators".to_string());
    }
    if PY_DECORATOR.find_iter(code).count() > 2 {
        features.push("decorators".to_string());
    }
    let inherits = PY_CLASS_BASES.captures_iter(code).any(|c| {
        let bases = c[1].trim();
        !bases.is_empty() && bases != "object" && bases != "Exception"
    });
    if inherits {
        features.push("class inheritance".to_string());
    }
    if PY_MAGIC_METHOD.is_match(code) {
        features.push("magic methods".to_string());
    }
    features.truncate(5);

    SourceMetrics {
        functions,
        async_functions,
        classes,
        complexity,
        custom,
        features,
    }
}

fn javascript_metrics(code: &str) -> SourceMetrics {
    let functions: usize = JS_FUNCTION_PATTERNS.iter().map(|r| r.find_iter(code).count()).sum();
    let classes = JS_CLASS.find_iter(code).count();
    let async_functions = JS_ASYNC.find_iter(code).count();
    let components = JS_COMPONENT.find_iter(code).count();
    let hooks = JS_HOOK.find_iter(code).count();

    let loops = JS_LOOP.find_iter(code).count();
    let conditionals = JS_CONDITIONAL.find_iter(code).count();
    let complexity = (loops + conditionals) as f64 / functions.max(1) as f64;

    let mut features = Vec::new();
    if async_functions > 0 {
        features.push(format!("{} async functions", async_functions));
    }
    if components > 0 {
        features.push(format!("{} React components", components));
    }
    if hooks > 0 {
        features.push(format!("{} hook calls", hooks));
    }
    if code.contains("TypeScript") || code.contains(": ") {
        features.push("type annotations".to_string());
    }

    SourceMetrics {
        functions,
        async_functions,
        classes,
        complexity,
        custom: functions + classes,
        features,
    }
}

fn breakdown(metrics: &SourceMetrics, code: &str, pattern_count: usize) -> ScoreBreakdown {
    let size = match metrics.functions + metrics.async_functions + metrics.classes {
        n if n >= 10 => 10.0,
        n if n >= 5 => 7.0,
        n if n >= 2 => 5.0,
        _ => 2.0,
    };

    let complexity = match metrics.complexity {
        c if (3.0..=6.0).contains(&c) => 15.0,
        c if c > 6.0 => 10.0,
        c if c > 1.0 => 8.0,
        _ => 3.0,
    };

    let custom = match metrics.custom {
        n if n >= 15 => 15.0,
        n if n >= 10 => 12.0,
        n if n >= 5 => 8.0,
        n if n >= 2 => 5.0,
        _ => 2.0,
    };

    let mut algorithm: f64 = 0.0;
    if DATA_STRUCTURE_CLASS.is_match(code) {
        algorithm += 5.0;
    }
    algorithm += 3.0 * ALGORITHM_SIGNALS.iter().filter(|(re, _)| re.is_match(code)).count() as f64;

    ScoreBreakdown {
        base: 30.0,
        size,
        complexity,
        custom,
        algorithm: algorithm.min(20.0),
        async_bonus: if metrics.async_functions > 0 { 5.0 } else { 0.0 },
        design_patterns: (2.0 * pattern_count as f64).min(5.0),
    }
}

fn explain_novelty(
    novelty: f64,
    reasons: &[String],
    patterns: &[String],
    custom: usize,
) -> String {
    let novelty_label = if novelty >= 0.7 {
        "high"
    } else if novelty >= 0.4 {
        "medium"
    } else {
        "low"
    };

    let mut parts = vec![format!("Novelty {:.2} ({})", novelty, novelty_label)];
    if reasons.is_empty() {
        parts.push("no algorithmic innovation detected".to_string());
    } else {
        parts.push(format!("innovation signals: {}", reasons.join(", ")));
    }
    if !patterns.is_empty() {
        parts.push(format!("design patterns: {}", patterns.join(", ")));
    }
    parts.push(
        match custom {
            n if n >= 10 => "rich custom logic",
            n if n >= 5 => "some custom logic",
            _ => "few custom implementations, mostly API wrapping",
        }
        .to_string(),
    );
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(items: &[(&str, &str)]) -> BTreeMap<String, String> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    const PYTHON_SAMPLE: &str = r#"
import heapq
from typing import List

class LRUCache(object):
    def __init__(self, capacity):
        self.capacity = capacity

    def get(self, key):
        if key in self.data and self.enabled:
            return self.data[key]
        return None

class Planner(BaseAgent):
    async def run(self, tasks):
        for task in tasks:
            if task.ready:
                yield await self.compute_route(task)

    def compute_route(self, task):
        while task.pending:
            task.step()
        return task
"#;

    #[test]
    fn test_detect_dialect() {
        assert_eq!(detect_dialect(PYTHON_SAMPLE), SourceDialect::Python);
        assert_eq!(
            detect_dialect("export const App = () => { const x = 1; }"),
            SourceDialect::JavaScript
        );
    }

    #[test]
    fn test_import_heavy_tsx_is_javascript() {
        let tsx = r#"import { useState } from "react";
import { Button } from "./components/Button";
import { fetchItems } from "./api";
import { Item } from "./types";

export const App = () => <Button onClick={() => fetchItems()} />;
"#;
        assert_eq!(detect_dialect(tsx), SourceDialect::JavaScript);
    }

    #[test]
    fn test_python_analysis() {
        let result = CodeAnalyzer::new().analyze(&files(&[("cache.py", PYTHON_SAMPLE)]));
        assert_eq!(result.dialect, Some(SourceDialect::Python));
        assert_eq!(result.function_count, 3);
        assert_eq!(result.async_function_count, 1);
        assert_eq!(result.class_count, 2);
        assert!(result.key_features.contains(&"generators".to_string()));
        assert!(result.key_features.contains(&"class inheritance".to_string()));
        assert!(result.innovation_reasons.contains(&"custom data structures".to_string()));
        assert_eq!(result.breakdown.async_bonus, 5.0);
        assert!(result.score > 60.0);
        assert!(result.details.starts_with("Functions: 4, Classes: 2"));
    }

    #[test]
    fn test_javascript_analysis() {
        let code = r#"
export const Chat = async () => {
  const [messages, setMessages] = useState([]);
  if (messages.length > 0 && ready) {
    messages.map((m) => m.id);
  }
};
function helper(a: number) { return a; }
"#;
        let result = CodeAnalyzer::new().analyze(&files(&[("chat.tsx", code)]));
        assert_eq!(result.dialect, Some(SourceDialect::JavaScript));
        assert!(result.function_count >= 2);
        assert!(result.key_features.iter().any(|f| f.contains("hook")));
        assert!(result.key_features.contains(&"type annotations".to_string()));
    }

    #[test]
    fn test_empty_input() {
        let result = CodeAnalyzer::new().analyze(&BTreeMap::new());
        assert_eq!(result.score, 30.0);
        assert_eq!(result.details, "No code files detected");
        assert_eq!(result.novelty_score, 0.5);
    }

    #[test]
    fn test_novelty_explanation_mentions_wrapping() {
        let text = explain_novelty(0.5, &[], &[], 1);
        assert!(text.contains("(medium)"));
        assert!(text.contains("mostly API wrapping"));
    }
}
