use serde::{Deserialize, Serialize};

const CI_MARKERS: &[(&str, &str)] = &[
    (".github/workflows", "GitHub Actions"),
    (".gitlab-ci.yml", "GitLab CI"),
    ("azure-pipelines.yml", "Azure Pipelines"),
    ("jenkinsfile", "Jenkins"),
    (".circleci", "CircleCI"),
    (".travis.yml", "Travis CI"),
    ("bitbucket-pipelines.yml", "Bitbucket Pipelines"),
];

const DOCKER_MARKERS: &[(&str, &str)] = &[
    ("dockerfile", "Docker"),
    ("docker-compose.yml", "Docker Compose"),
    ("docker-compose.yaml", "Docker Compose"),
    (".dockerignore", "Docker"),
];

const DEPLOYMENT_MARKERS: &[(&str, &str)] = &[
    ("kubernetes/", "Kubernetes"),
    ("k8s/", "Kubernetes"),
    ("helm/", "Helm"),
    ("terraform/", "Terraform"),
    ("serverless.yml", "Serverless Framework"),
    ("vercel.json", "Vercel"),
    ("netlify.toml", "Netlify"),
    ("fly.toml", "Fly.io"),
    ("railway.json", "Railway"),
    ("render.yaml", "Render"),
    ("procfile", "Heroku"),
    ("app.yaml", "Google App Engine"),
    ("wrangler.toml", "Cloudflare Workers"),
];

const QUALITY_MARKERS: &[(&str, &str)] = &[
    (".pre-commit-config.yaml", "pre-commit"),
    ("pyproject.toml", "pyproject"),
    ("setup.cfg", "setup.cfg"),
    (".pylintrc", "Pylint"),
    (".flake8", "Flake8"),
    ("mypy.ini", "mypy"),
    ("ruff.toml", "Ruff"),
    (".eslintrc", "ESLint"),
    ("eslint.config", "ESLint"),
    (".prettierrc", "Prettier"),
    ("prettier.config", "Prettier"),
    ("biome.json", "Biome"),
    ("tsconfig.json", "TypeScript"),
    (".husky/", "Husky"),
    ("turbo.json", "Turborepo"),
];

const TEST_MARKERS: &[&str] = &["test_", "_test.py", "/tests/", "/test/", ".test.", ".spec."];

const README_DEPLOYMENT_HINTS: &[(&str, &str)] = &[
    ("kubernetes", "Kubernetes"),
    ("k8s", "Kubernetes"),
    ("docker", "Docker"),
    ("aws", "AWS"),
    ("gcp", "GCP"),
    ("azure", "Azure"),
    ("heroku", "Heroku"),
    ("vercel", "Vercel"),
    ("serverless", "Serverless Framework"),
    ("lambda", "AWS Lambda"),
];

const PRODUCTION_DEPLOYMENTS: &[&str] = &["Kubernetes", "Serverless Framework", "Terraform", "Helm"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineeringResult {
    pub score: f64,
    pub has_ci: bool,
    pub ci_tools: Vec<String>,
    pub has_docker: bool,
    pub has_tests: bool,
    pub test_file_count: usize,
    pub deployment_tools: Vec<String>,
    pub quality_tools: Vec<String>,
    /// Distinct CI, Docker, deployment and quality tool names.
    pub detected_tools: Vec<String>,
    pub deployment_type: String,
    pub details: String,
}

#[derive(Default)]
pub struct EngineeringAnalyzer;

impl EngineeringAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, tree: &[String], source_files: &[String], readme: &str) -> EngineeringResult {
        let joined = tree.join("\n").to_lowercase();

        let ci_tools = detect(&joined, CI_MARKERS);
        let docker_tools = detect(&joined, DOCKER_MARKERS);
        let deployment_tools = detect(&joined, DEPLOYMENT_MARKERS);
        let quality_tools = detect(&joined, QUALITY_MARKERS);

        let test_file_count = tree
            .iter()
            .chain(source_files.iter())
            .map(|p| p.to_lowercase())
            .filter(|p| TEST_MARKERS.iter().any(|m| p.contains(m)))
            .count();

        let deployment_type = deployment_tools
            .first()
            .cloned()
            .or_else(|| {
                let readme = readme.to_lowercase();
                README_DEPLOYMENT_HINTS
                    .iter()
                    .find(|(hint, _)| readme.contains(hint))
                    .map(|(_, name)| name.to_string())
            })
            .unwrap_or_else(|| "Unknown".to_string());

        let mut detected_tools: Vec<String> = Vec::new();
        for tool in ci_tools
            .iter()
            .chain(&docker_tools)
            .chain(&deployment_tools)
            .chain(&quality_tools)
        {
            if !detected_tools.contains(tool) {
                detected_tools.push(tool.clone());
            }
        }

        let mut result = EngineeringResult {
            has_ci: !ci_tools.is_empty(),
            ci_tools,
            has_docker: !docker_tools.is_empty(),
            has_tests: test_file_count > 0,
            test_file_count,
            deployment_tools,
            quality_tools,
            detected_tools,
            deployment_type,
            ..Default::default()
        };
        result.score = score(&result);
        result.details = describe(&result);
        result
    }
}

fn detect(joined: &str, markers: &[(&str, &str)]) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for (marker, name) in markers {
        if joined.contains(marker) && !found.iter().any(|f| f == name) {
            found.push(name.to_string());
        }
    }
    found
}

fn score(result: &EngineeringResult) -> f64 {
    let mut score = 20.0;
    if result.has_ci {
        score += 25.0;
    }
    if result.has_docker {
        score += 20.0;
    }
    if result.has_tests {
        score += 10.0;
        if result.test_file_count >= 5 {
            score += 10.0;
        } else if result.test_file_count >= 2 {
            score += 5.0;
        }
    }
    score += (3.0 * result.detected_tools.len() as f64).min(15.0);

    if PRODUCTION_DEPLOYMENTS.contains(&result.deployment_type.as_str()) {
        score += 10.0;
    } else if result.deployment_type != "Unknown" {
        score += 5.0;
    }

    score.clamp(0.0, 100.0)
}

fn describe(result: &EngineeringResult) -> String {
    let mut parts = Vec::new();
    if result.has_ci {
        parts.push(format!("CI/CD: {}", result.ci_tools.join(", ")));
    }
    if result.has_docker {
        parts.push("Docker".to_string());
    }
    if result.has_tests {
        parts.push(format!("Tests: {} files", result.test_file_count));
    }
    if !result.quality_tools.is_empty() {
        parts.push(format!("Quality: {}", result.quality_tools.join(", ")));
    }
    if result.deployment_type != "Unknown" {
        parts.push(format!("Deployment: {}", result.deployment_type));
    }

    if parts.is_empty() {
        "No engineering practices detected".to_string()
    } else {
        parts.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_well_engineered_repo() {
        let tree = paths(&[
            ".github/",
            ".github/workflows/ci.yml",
            "Dockerfile",
            "k8s/",
            "k8s/deploy.yaml",
            "pyproject.toml",
            ".pre-commit-config.yaml",
            "tests/",
            "tests/test_api.py",
            "tests/test_core.py",
        ]);
        let result = EngineeringAnalyzer::new().analyze(&tree, &[], "");
        assert!(result.has_ci);
        assert_eq!(result.ci_tools, vec!["GitHub Actions"]);
        assert!(result.has_docker);
        assert_eq!(result.deployment_type, "Kubernetes");
        assert_eq!(result.test_file_count, 2);
        assert_eq!(
            result.detected_tools,
            vec!["GitHub Actions", "Docker", "Kubernetes", "pre-commit", "pyproject"]
        );
        // 20 + 25 + 20 + (10 + 5) + 15 + 10, capped
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn test_tool_bonus_counts_every_tool_kind() {
        let tree = paths(&[
            ".github/workflows/ci.yml",
            "Dockerfile",
            ".dockerignore",
            "k8s/deploy.yaml",
        ]);
        let result = EngineeringAnalyzer::new().analyze(&tree, &[], "");
        assert!(result.quality_tools.is_empty());
        assert_eq!(result.detected_tools, vec!["GitHub Actions", "Docker", "Kubernetes"]);
        // 20 + 25 + 20 + 3*3 + 10
        assert_eq!(result.score, 84.0);
    }

    #[test]
    fn test_readme_deployment_hint() {
        let tree = paths(&["app.py", "requirements.txt"]);
        let result = EngineeringAnalyzer::new().analyze(&tree, &[], "Deploy to Heroku in one click");
        assert_eq!(result.deployment_type, "Heroku");
        assert_eq!(result.score, 25.0);
    }

    #[test]
    fn test_bare_repo() {
        let result = EngineeringAnalyzer::new().analyze(&paths(&["main.py"]), &[], "");
        assert_eq!(result.score, 20.0);
        assert_eq!(result.deployment_type, "Unknown");
        assert_eq!(result.details, "No engineering practices detected");
    }
}
