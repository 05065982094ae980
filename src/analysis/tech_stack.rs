use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::taxonomy::{normalize_package, TechCatalog, TechTier};

static REQUIREMENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_\-]+").unwrap());
static PACKAGE_JSON_FALLBACK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(@?[\w\-]+(?:/[\w\-.]+)?)"\s*:\s*"[\^~]?\d"#).unwrap());
static QUOTED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']([A-Za-z0-9][A-Za-z0-9_.\-]*)"#).unwrap());
static TOML_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9][A-Za-z0-9_.\-]*)\s*=").unwrap());
static PYPROJECT_FALLBACK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z][a-zA-Z0-9_\-]*)\s*[=<>~!]").unwrap());

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechStackResult {
    pub score: f64,
    pub packages: Vec<String>,
    pub cutting_edge: Vec<String>,
    pub modern: Vec<String>,
    pub standard: Vec<String>,
    pub unknown: Vec<String>,
    pub novelty_ratio: f64,
    pub details: String,
}

pub struct TechStackAnalyzer {
    catalog: TechCatalog,
}

impl TechStackAnalyzer {
    pub fn new() -> Self {
        Self {
            catalog: TechCatalog::new(),
        }
    }

    /// Rates the dependency stack declared in `requirements` (requirements.txt
    /// or package.json) and `pyproject` (pyproject.toml).
    pub fn analyze(&self, requirements: &str, pyproject: &str) -> TechStackResult {
        let mut packages = Vec::new();
        if requirements.trim_start().starts_with('{') {
            packages.extend(parse_package_json(requirements));
        } else {
            packages.extend(parse_requirements(requirements));
        }
        packages.extend(parse_pyproject(pyproject));
        let packages = dedup(packages);

        let mut result = TechStackResult {
            packages: packages.clone(),
            ..Default::default()
        };

        for package in &packages {
            match self.catalog.classify(package) {
                Some(TechTier::CuttingEdge) => result.cutting_edge.push(package.clone()),
                Some(TechTier::Modern) => result.modern.push(package.clone()),
                Some(TechTier::Standard) => result.standard.push(package.clone()),
                None => result.unknown.push(package.clone()),
            }
        }

        result.score = self.score(&result);
        result.novelty_ratio = (result.cutting_edge.len() as f64
            + 0.5 * result.modern.len() as f64)
            / packages.len().max(1) as f64;
        result.details = describe(&result);
        result
    }

    fn score(&self, result: &TechStackResult) -> f64 {
        let total = result.packages.len();
        if total == 0 {
            return 50.0;
        }

        let points = result.cutting_edge.len() as f64 * TechTier::CuttingEdge.points()
            + result.modern.len() as f64 * TechTier::Modern.points()
            + result.standard.len() as f64 * TechTier::Standard.points()
            + result.unknown.len() as f64 * 40.0;
        let mut score = points / total as f64;

        if result.cutting_edge.len() >= 3 {
            score += 10.0;
        } else if result.cutting_edge.len() >= 2 {
            score += 5.0;
        }

        if result.cutting_edge.is_empty() && result.modern.is_empty() {
            score -= 10.0;
        }

        score.clamp(0.0, 100.0)
    }
}

impl Default for TechStackAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn describe(result: &TechStackResult) -> String {
    let mut parts = Vec::new();
    if !result.cutting_edge.is_empty() {
        parts.push(format!("Cutting-edge: {}", head(&result.cutting_edge, 5)));
    }
    if !result.modern.is_empty() {
        parts.push(format!("Modern: {}", head(&result.modern, 5)));
    }
    if !result.standard.is_empty() {
        parts.push(format!("Standard: {}", head(&result.standard, 3)));
    }

    if !parts.is_empty() {
        parts.join("; ")
    } else if !result.packages.is_empty() {
        format!("Detected {} packages", result.packages.len())
    } else {
        "No dependency files detected".to_string()
    }
}

fn head(items: &[String], n: usize) -> String {
    items.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
}

fn dedup(packages: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    packages
        .into_iter()
        .filter(|p| !p.is_empty() && seen.insert(p.clone()))
        .collect()
}

pub fn parse_requirements(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| REQUIREMENT_NAME.find(line))
        .map(|m| normalize_package(m.as_str()))
        .collect()
}

pub fn parse_package_json(content: &str) -> Vec<String> {
    let names: Vec<String> = match serde_json::from_str::<serde_json::Value>(content) {
        Ok(json) => ["dependencies", "devDependencies"]
            .iter()
            .filter_map(|section| json.get(section).and_then(|v| v.as_object()))
            .flat_map(|deps| deps.keys().cloned())
            .collect(),
        Err(e) => {
            tracing::debug!("package.json is not valid JSON ({}), scanning with regex", e);
            PACKAGE_JSON_FALLBACK
                .captures_iter(content)
                .map(|c| c[1].to_string())
                .collect()
        }
    };

    let mut packages = Vec::new();
    for name in names {
        // "@scope/pkg" counts as both the scope and the package.
        match name.strip_prefix('@').and_then(|n| n.split_once('/')) {
            Some((scope, pkg)) => {
                packages.push(normalize_package(scope));
                packages.push(normalize_package(pkg));
            }
            None => packages.push(normalize_package(&name)),
        }
    }
    packages
}

pub fn parse_pyproject(content: &str) -> Vec<String> {
    if content.trim().is_empty() {
        return Vec::new();
    }

    let mut packages = Vec::new();
    let mut found_section = false;
    let mut in_section = false;
    let mut in_project = false;
    let mut in_array = false;

    for raw in content.lines() {
        let line = raw.trim();
        if line.starts_with('[') && !in_array {
            in_section = matches!(line, "[project.dependencies]" | "[tool.poetry.dependencies]");
            in_project = line == "[project]";
            found_section |= in_section;
            continue;
        }

        if in_project && line.starts_with("dependencies") && line.contains('[') {
            found_section = true;
            in_array = !line.contains(']');
            collect_quoted(line.split_once('[').map(|(_, rest)| rest).unwrap_or(""), &mut packages);
            continue;
        }

        if in_array {
            collect_quoted(line, &mut packages);
            if line.contains(']') {
                in_array = false;
            }
            continue;
        }

        if in_section {
            if let Some(c) = TOML_KEY.captures(line) {
                packages.push(normalize_package(&c[1]));
            } else {
                collect_quoted(line, &mut packages);
            }
        }
    }

    if !found_section {
        packages = PYPROJECT_FALLBACK
            .captures_iter(content)
            .map(|c| normalize_package(&c[1]))
            .filter(|name| name.len() > 2)
            .collect();
    }

    packages
        .into_iter()
        .filter(|name| name != "python" && !name.starts_with('^'))
        .collect()
}

fn collect_quoted(line: &str, packages: &mut Vec<String>) {
    for c in QUOTED_NAME.captures_iter(line) {
        let name = c[1].split(['[', '<', '>', '=', '~', '!', ' ']).next().unwrap_or("");
        packages.push(normalize_package(name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_requirements() {
        let content = "# core\nlangchain==0.2.1\nsentence_transformers>=2\n\nFastAPI\n";
        assert_eq!(
            parse_requirements(content),
            vec!["langchain", "sentence-transformers", "fastapi"]
        );
    }

    #[test]
    fn test_parse_package_json_splits_scopes() {
        let content = r#"{"dependencies": {"@langchain/core": "^0.2", "next": "14.0.0"},
                          "devDependencies": {"typescript": "^5"}}"#;
        let packages = parse_package_json(content);
        assert!(packages.contains(&"langchain".to_string()));
        assert!(packages.contains(&"core".to_string()));
        assert!(packages.contains(&"next".to_string()));
        assert!(packages.contains(&"typescript".to_string()));
    }

    #[test]
    fn test_parse_package_json_fallback_on_invalid_json() {
        let content = r#"{"dependencies": {"react": "^18.2.0", "zod": "3.22.0",}"#;
        let packages = parse_package_json(content);
        assert_eq!(packages, vec!["react", "zod"]);
    }

    #[test]
    fn test_parse_pyproject_poetry_and_pep621() {
        let poetry = "[tool.poetry.dependencies]\npython = \"^3.11\"\nlanggraph = \"^0.1\"\n\n[tool.black]\nline-length = 88\n";
        assert_eq!(parse_pyproject(poetry), vec!["langgraph"]);

        let pep621 = "[project]\nname = \"demo\"\ndependencies = [\n  \"openai>=1.0\",\n  \"chromadb\",\n]\n";
        assert_eq!(parse_pyproject(pep621), vec!["openai", "chromadb"]);
    }

    #[test]
    fn test_scoring_rewards_cutting_edge() {
        let analyzer = TechStackAnalyzer::new();
        let result = analyzer.analyze("langchain\nlanggraph\nvllm\nfastapi\n", "");
        // (100*3 + 75) / 4 + 10
        assert_eq!(result.score, 100.0);
        assert_eq!(result.cutting_edge.len(), 3);
        assert!((result.novelty_ratio - 0.875).abs() < 1e-9);
        assert!(result.details.starts_with("Cutting-edge: langchain, langgraph, vllm"));
    }

    #[test]
    fn test_scoring_penalizes_legacy_stack() {
        let analyzer = TechStackAnalyzer::new();
        let result = analyzer.analyze("flask\nnumpy\nleftpad\n", "");
        // (50 + 50 + 40) / 3 - 10
        assert!((result.score - (140.0 / 3.0 - 10.0)).abs() < 1e-9);
        assert_eq!(result.unknown, vec!["leftpad"]);
    }

    #[test]
    fn test_empty_stack() {
        let result = TechStackAnalyzer::new().analyze("", "");
        assert_eq!(result.score, 50.0);
        assert_eq!(result.details, "No dependency files detected");
    }
}
