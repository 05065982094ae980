use serde::{Deserialize, Serialize};

struct ArchitecturePattern {
    name: &'static str,
    description: &'static str,
    markers: &'static [&'static str],
    bonus: f64,
}

const PATTERNS: &[ArchitecturePattern] = &[
    ArchitecturePattern {
        name: "microservices",
        description: "microservice architecture",
        markers: &["services/", "api/", "gateway/"],
        bonus: 12.0,
    },
    ArchitecturePattern {
        name: "clean_architecture",
        description: "clean architecture",
        markers: &["domain/", "usecases/", "interfaces/", "infrastructure/"],
        bonus: 15.0,
    },
    ArchitecturePattern {
        name: "hexagonal",
        description: "hexagonal architecture",
        markers: &["adapters/", "ports/", "core/"],
        bonus: 15.0,
    },
    ArchitecturePattern {
        name: "plugin_system",
        description: "plugin system",
        markers: &["plugins/", "extensions/", "addons/"],
        bonus: 10.0,
    },
    ArchitecturePattern {
        name: "multi_agent",
        description: "multi-agent architecture",
        markers: &["agents/", "orchestrator/", "tools/"],
        bonus: 12.0,
    },
    ArchitecturePattern {
        name: "mvc",
        description: "MVC layering",
        markers: &["models/", "views/", "controllers/"],
        bonus: 8.0,
    },
    ArchitecturePattern {
        name: "pipeline",
        description: "pipeline architecture",
        markers: &["pipeline/", "stages/", "processors/"],
        bonus: 10.0,
    },
    ArchitecturePattern {
        name: "event_driven",
        description: "event-driven architecture",
        markers: &["events/", "handlers/", "listeners/", "subscribers/"],
        bonus: 12.0,
    },
    ArchitecturePattern {
        name: "monorepo",
        description: "monorepo",
        markers: &["packages/", "apps/", "libs/"],
        bonus: 8.0,
    },
];

const TEMPLATES: &[(&str, &[&str])] = &[
    ("streamlit_simple", &["app.py", "requirements.txt"]),
    ("fastapi_basic", &["main.py", "requirements.txt", "routers/"]),
    ("flask_basic", &["app.py", "templates/", "static/"]),
    ("django_standard", &["manage.py", "settings.py", "urls.py"]),
    ("ml_notebook", &[".ipynb", "data/", "notebooks/"]),
    ("nextjs_basic", &["pages/", "next.config", "package.json"]),
];

const SEPARATION_DIRS: &[&str] = &[
    "utils", "config", "models", "services", "core", "lib", "helpers", "common",
];

const MONOREPO_DIRS: &[&str] = &["packages", "apps", "libs", "modules"];

const ENVIRONMENT_FILES: &[&str] = &[
    "requirements-dev",
    "requirements-prod",
    "package-lock",
    "yarn.lock",
    "pnpm-lock",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchitectureResult {
    pub score: f64,
    pub depth: usize,
    pub breadth: usize,
    pub module_count: usize,
    pub has_package_structure: bool,
    pub patterns: Vec<String>,
    pub is_template: bool,
    pub template: Option<String>,
    pub architecture_type: String,
    pub dependency_complexity: String,
    pub coupling_assessment: String,
    pub details: String,
}

/// Flattened view of a directory listing.
#[derive(Debug, Default)]
struct TreeShape {
    items: Vec<String>,
    dirs: Vec<String>,
    top_level_dirs: usize,
    files: Vec<String>,
    python_files: Vec<String>,
    max_depth: usize,
}

impl TreeShape {
    fn parse(tree: &[String], source_files: &[String]) -> Self {
        let mut shape = TreeShape::default();

        for raw in tree {
            let stripped = raw.trim();
            if stripped.is_empty() {
                continue;
            }
            let indent = raw.len() - raw.trim_start().len();
            // Indented listings encode depth with two spaces, flat API paths with '/'.
            let depth = indent / 2 + stripped.trim_end_matches('/').matches('/').count();
            shape.max_depth = shape.max_depth.max(depth);
            shape.items.push(stripped.to_lowercase());

            if stripped.ends_with('/') {
                if depth == 0 {
                    shape.top_level_dirs += 1;
                }
                shape.dirs.push(stripped.to_lowercase());
            } else {
                if stripped.ends_with(".py") {
                    shape.python_files.push(stripped.to_string());
                }
                shape.files.push(stripped.to_string());
            }
        }

        for file in source_files {
            if file.ends_with(".py") && !shape.python_files.contains(file) {
                shape.python_files.push(file.clone());
            }
        }

        shape
    }
}

#[derive(Default)]
pub struct ArchitectureAnalyzer;

impl ArchitectureAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, tree: &[String], source_files: &[String]) -> ArchitectureResult {
        let shape = TreeShape::parse(tree, source_files);

        let template = detect_template(&shape);
        let patterns = detect_patterns(&shape);
        let (dependency_points, dependency_complexity) = dependency_complexity(&shape);
        let (coupling_points, coupling_assessment) = coupling(&shape);
        let modularity = modularity(&shape);

        let pattern_bonus: f64 = patterns.iter().map(|p| p.bonus).sum();
        let mut score = 30.0
            + ((modularity - 50.0) / 2.0).min(25.0)
            + dependency_points
            + coupling_points
            + pattern_bonus.min(20.0);
        if template.is_some() {
            score -= 15.0;
        }

        let architecture_type = if !patterns.is_empty() {
            format!(
                "Uses {}",
                patterns.iter().map(|p| p.description).collect::<Vec<_>>().join(" + ")
            )
        } else if let Some(name) = template {
            format!("Standard {} template", name)
        } else {
            "Conventional project layout".to_string()
        };

        let mut details = vec![
            format!("Depth: {}", shape.max_depth),
            format!("Modules: {}", shape.dirs.len()),
            format!("Coupling: {}", coupling_assessment),
        ];
        if let Some(name) = template {
            details.push(format!("Template: {}", name));
        }
        if !patterns.is_empty() {
            details.push(format!(
                "Patterns: {}",
                patterns.iter().map(|p| p.name).collect::<Vec<_>>().join(", ")
            ));
        }

        ArchitectureResult {
            score: score.clamp(0.0, 100.0),
            depth: shape.max_depth,
            breadth: shape.top_level_dirs,
            module_count: shape.dirs.len(),
            has_package_structure: shape.items.iter().any(|i| i.contains("__init__")),
            patterns: patterns.iter().map(|p| p.name.to_string()).collect(),
            is_template: template.is_some(),
            template: template.map(str::to_string),
            architecture_type,
            dependency_complexity: dependency_complexity.to_string(),
            coupling_assessment: coupling_assessment.to_string(),
            details: details.join("; "),
        }
    }
}

fn detect_template(shape: &TreeShape) -> Option<&'static str> {
    TEMPLATES.iter().find_map(|(name, markers)| {
        let hits = markers
            .iter()
            .filter(|m| shape.items.iter().any(|i| i.contains(*m)))
            .count();
        (hits as f64 / markers.len() as f64 >= 0.7).then_some(*name)
    })
}

fn detect_patterns(shape: &TreeShape) -> Vec<&'static ArchitecturePattern> {
    PATTERNS
        .iter()
        .filter(|pattern| {
            let hits = pattern
                .markers
                .iter()
                .map(|m| m.trim_end_matches('/'))
                .filter(|m| shape.dirs.iter().any(|d| d.contains(m)))
                .count();
            hits >= 2
        })
        .collect()
}

fn dependency_complexity(shape: &TreeShape) -> (f64, &'static str) {
    let is_monorepo = shape.dirs.iter().any(|d| {
        let last = d.trim_end_matches('/').rsplit('/').next().unwrap_or("");
        MONOREPO_DIRS.contains(&last)
    });
    if is_monorepo {
        return (15.0, "High (monorepo)");
    }

    let environment_files = shape
        .files
        .iter()
        .filter(|f| {
            let f = f.to_lowercase();
            ENVIRONMENT_FILES.iter().any(|e| f.contains(e))
        })
        .count();
    if environment_files >= 2 {
        return (10.0, "Medium-high (multiple environments)");
    }

    let has_manifest = shape.files.iter().any(|f| {
        let f = f.to_lowercase();
        f.contains("requirements") || f.ends_with("package.json")
    });
    if has_manifest {
        (5.0, "Medium")
    } else {
        (0.0, "Low")
    }
}

fn coupling(shape: &TreeShape) -> (f64, &'static str) {
    let files = shape.files.len();
    let dirs = shape.dirs.len();

    let ratio_points = if files > 0 && dirs > 0 {
        let ratio = files as f64 / dirs as f64;
        if ratio <= 3.0 {
            3
        } else if ratio <= 5.0 {
            2
        } else {
            1
        }
    } else {
        0
    };

    let depth_points = match shape.max_depth {
        2..=4 => 3,
        1 | 5 => 2,
        _ => 1,
    };

    let separated = SEPARATION_DIRS
        .iter()
        .filter(|s| shape.dirs.iter().any(|d| d.contains(*s)))
        .count();
    let separation_points = match separated {
        n if n >= 3 => 3,
        n if n >= 1 => 2,
        _ => 1,
    };

    match ratio_points + depth_points + separation_points {
        t if t >= 8 => (15.0, "Low coupling"),
        t if t >= 6 => (10.0, "Medium coupling"),
        _ => (5.0, "High coupling"),
    }
}

fn modularity(shape: &TreeShape) -> f64 {
    if shape.python_files.is_empty() {
        return 50.0;
    }

    let mut score: f64 = 50.0;
    if shape.items.iter().any(|i| i.contains("__init__")) {
        score += 15.0;
    }
    match shape.max_depth {
        2..=4 => score += 10.0,
        d if d > 4 => score += 5.0,
        _ => {}
    }
    match shape.dirs.len() {
        3..=10 => score += 10.0,
        n if n > 10 => score += 5.0,
        _ => {}
    }
    let per_dir = shape.python_files.len() as f64 / shape.dirs.len().max(1) as f64;
    if (1.0..=5.0).contains(&per_dir) {
        score += 10.0;
    }

    score.min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_streamlit_template_is_penalized() {
        let tree = paths(&["app.py", "requirements.txt", "README.md"]);
        let result = ArchitectureAnalyzer::new().analyze(&tree, &[]);
        assert!(result.is_template);
        assert_eq!(result.template.as_deref(), Some("streamlit_simple"));
        assert_eq!(result.architecture_type, "Standard streamlit_simple template");
        // modularity 60 -> +5, requirements -> +5, coupling 0 + 1 + 1 -> +5
        assert_eq!(result.score, 30.0 + 5.0 + 5.0 + 5.0 - 15.0);
    }

    #[test]
    fn test_multi_agent_layout() {
        let tree = paths(&[
            "src/",
            "src/agents/",
            "src/agents/__init__.py",
            "src/agents/planner.py",
            "src/tools/",
            "src/tools/search.py",
            "src/core/",
            "src/core/config.py",
            "src/utils/",
            "src/utils/io.py",
            "requirements.txt",
        ]);
        let result = ArchitectureAnalyzer::new().analyze(&tree, &[]);
        assert_eq!(result.patterns, vec!["multi_agent"]);
        assert!(result.has_package_structure);
        assert_eq!(result.depth, 2);
        assert_eq!(result.breadth, 1);
        assert_eq!(result.module_count, 5);
        assert!(result.architecture_type.starts_with("Uses multi-agent"));
        // files 6 / dirs 5 -> 3, depth 2 -> 3, separation (utils, core) -> 2
        assert_eq!(result.coupling_assessment, "Low coupling");
        // modularity 50 + 15 + 10 + 10 + 10 = 95
        // 30 + 22.5 + 5 + 15 + 12
        assert_eq!(result.score, 84.5);
    }

    #[test]
    fn test_indented_tree_depth() {
        let tree = paths(&["backend/", "  api/", "    routes.py", "packages/"]);
        let result = ArchitectureAnalyzer::new().analyze(&tree, &[]);
        assert_eq!(result.depth, 2);
        assert_eq!(result.breadth, 2);
        assert_eq!(result.dependency_complexity, "High (monorepo)");
    }
}
