use std::sync::Arc;

use crate::error::{Error, Result};
use crate::github::client::GitHubClient;
use crate::github::repo_url::parse_repo_url;
use crate::github::research::build_research_links;
use crate::models::{ContributorSummary, GitTree, IssueSummary, RepoInfo, RepoMetadata};
use crate::storage::Storage;
use crate::taxonomy::{code_extensions, dominant_language, is_javascript_family};

const MAX_TREE_SCAN: usize = 500;
const MAX_TREE_ENTRIES: usize = 100;
const MAX_PATH_DEPTH: usize = 3;
const MAX_CODE_CANDIDATES: usize = 5;
const MAX_CODE_FILES: usize = 3;
const TOP_CONTRIBUTORS: usize = 5;
const MAX_CONTRIBUTORS_COUNTED: u32 = 100;

const EXCLUDED_DIRS: &[&str] = &[
    "__pycache__", "node_modules", ".git", "vendor", "dist", "build", ".next", "coverage",
];

const ENGINEERING_MARKERS: &[&str] = &[
    ".github", "dockerfile", "docker-compose", ".dockerignore",
    "jest.config", "vitest.config", "cypress", "playwright",
    ".eslintrc", "eslint.config", ".prettierrc", "biome.json", "tsconfig", "turbo.json", ".husky",
    "vercel.json", "netlify", "kubernetes", "k8s", "helm", "terraform", "serverless",
    "pytest", "conftest", "tox.ini", ".coveragerc", "pyproject.toml", "setup.cfg", ".pre-commit",
    "tests/", "test/", "__tests__",
];

const CORE_NAMES: &[&str] = &["main", "app", "core", "api", "agent", "index", "server"];

/// Pulls everything the analyzers need about one repository, through the
/// SQLite cache.
pub struct RepoFetcher {
    github: GitHubClient,
    storage: Arc<Storage>,
    cache_ttl_secs: u64,
}

impl RepoFetcher {
    pub fn new(github: GitHubClient, storage: Arc<Storage>, cache_ttl_secs: u64) -> Self {
        Self {
            github,
            storage,
            cache_ttl_secs,
        }
    }

    pub async fn fetch(&self, url: &str, use_cache: bool) -> Result<RepoInfo> {
        let (owner, name) = parse_repo_url(url)?;
        let full_name = format!("{}/{}", owner, name);

        if use_cache {
            match self.storage.get_cached_repo(&full_name, self.cache_ttl_secs) {
                Ok(Some(info)) => {
                    tracing::info!("Using cached data for {}", full_name);
                    return Ok(info);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Cache lookup failed for {}: {}", full_name, e),
            }
        }

        let metadata = self
            .github
            .get_repo(&owner, &name)
            .await?
            .ok_or_else(|| Error::RepoNotFound(full_name.clone()))?;
        let mut info = repo_info_from(&metadata);

        let tree = match self.github.get_tree(&owner, &name, &info.default_branch).await {
            Ok(tree) => tree,
            Err(e) => {
                tracing::warn!("Could not fetch tree for {}: {}", full_name, e);
                None
            }
        };
        if let Some(tree) = &tree {
            if tree.truncated {
                tracing::debug!("Tree for {} is truncated", full_name);
            }
            let (directory_tree, source_files) = select_tree(tree);
            info.directory_tree = directory_tree;
            info.source_files = source_files;
        }

        if info.language.is_none() {
            info.language = dominant_language(info.source_files.iter().map(String::as_str))
                .map(str::to_string);
        }

        info.readme = self.optional_file(&owner, &name, "README.md").await;

        if is_javascript_family(info.language.as_deref()) {
            info.requirements = self.optional_file(&owner, &name, "package.json").await;
        } else {
            info.requirements = self.optional_file(&owner, &name, "requirements.txt").await;
            if info.requirements.is_empty() {
                info.pyproject = self.optional_file(&owner, &name, "pyproject.toml").await;
            }
        }

        if let Some(tree) = &tree {
            let candidates = code_candidates(tree, info.language.as_deref());
            for path in candidates.iter().take(MAX_CODE_FILES) {
                let content = self.optional_file(&owner, &name, path).await;
                if !content.is_empty() {
                    info.code_files.insert(path.clone(), content);
                }
            }
        }

        self.fetch_deep_data(&owner, &name, &mut info).await;
        info.research_links = build_research_links(&info);

        if let Err(e) = self.storage.cache_repo(&info) {
            tracing::warn!("Could not cache {}: {}", full_name, e);
        }

        tracing::info!(
            "Fetched {}: {} tree entries, {} code files",
            full_name,
            info.directory_tree.len(),
            info.code_files.len()
        );
        Ok(info)
    }

    async fn optional_file(&self, owner: &str, name: &str, path: &str) -> String {
        match self.github.get_file(owner, name, path).await {
            Ok(content) => content.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Could not fetch {} from {}/{}: {}", path, owner, name, e);
                String::new()
            }
        }
    }

    async fn fetch_deep_data(&self, owner: &str, name: &str, info: &mut RepoInfo) {
        match self.github.get_recent_issues(owner, name, 10).await {
            Ok(issues) => info.recent_issues = issues.into_iter().map(IssueSummary::from).collect(),
            Err(e) => tracing::warn!("Could not fetch issues for {}/{}: {}", owner, name, e),
        }

        match self
            .github
            .get_contributors(owner, name, MAX_CONTRIBUTORS_COUNTED)
            .await
        {
            Ok(contributors) => {
                info.contributors_count = contributors.len() as u32;
                info.top_contributors = contributors
                    .into_iter()
                    .take(TOP_CONTRIBUTORS)
                    .map(ContributorSummary::from)
                    .collect();
            }
            Err(e) => tracing::warn!("Could not fetch contributors for {}/{}: {}", owner, name, e),
        }

        match self.github.get_latest_commit_date(owner, name).await {
            Ok(date) => info.last_commit_date = date,
            Err(e) => tracing::warn!("Could not fetch last commit for {}/{}: {}", owner, name, e),
        }

        match self.github.count_releases(owner, name, 10).await {
            Ok(count) => info.releases_count = count,
            Err(e) => tracing::warn!("Could not fetch releases for {}/{}: {}", owner, name, e),
        }
    }
}

fn repo_info_from(metadata: &RepoMetadata) -> RepoInfo {
    RepoInfo {
        owner: metadata.owner.login.clone(),
        name: metadata.name.clone(),
        full_name: metadata.full_name.clone(),
        html_url: metadata.html_url.clone(),
        description: metadata.description.clone().unwrap_or_default(),
        stars: metadata.stargazers_count,
        forks: metadata.forks_count,
        language: metadata.language.clone(),
        topics: metadata.topics.clone(),
        default_branch: metadata.default_branch.clone(),
        open_issues_count: metadata.open_issues_count,
        created_at: metadata.created_at,
        updated_at: metadata.updated_at,
        license_name: metadata
            .license
            .as_ref()
            .and_then(|l| l.name.clone().or_else(|| l.spdx_id.clone())),
        ..Default::default()
    }
}

fn is_engineering_path(path: &str) -> bool {
    let lower = path.to_lowercase();
    ENGINEERING_MARKERS.iter().any(|m| lower.contains(m))
}

fn is_excluded(path: &str) -> bool {
    path.split('/').any(|part| EXCLUDED_DIRS.contains(&part))
}

/// Directory listing (dirs end in `/`) and the blob paths within it.
pub fn select_tree(tree: &GitTree) -> (Vec<String>, Vec<String>) {
    let mut directory_tree = Vec::new();
    let mut source_files = Vec::new();

    for entry in tree.tree.iter().take(MAX_TREE_SCAN) {
        if directory_tree.len() >= MAX_TREE_ENTRIES {
            break;
        }
        let engineering = is_engineering_path(&entry.path);
        if is_excluded(&entry.path) && !engineering {
            continue;
        }
        let depth = entry.path.split('/').count();
        if depth > MAX_PATH_DEPTH && !engineering {
            continue;
        }

        if entry.is_dir() {
            directory_tree.push(format!("{}/", entry.path));
        } else {
            directory_tree.push(entry.path.clone());
            if entry.is_blob() {
                source_files.push(entry.path.clone());
            }
        }
    }

    (directory_tree, source_files)
}

/// Code files worth reading, core-looking names first.
pub fn code_candidates(tree: &GitTree, language: Option<&str>) -> Vec<String> {
    let extensions = code_extensions(language);
    let mut core = Vec::new();
    let mut rest = Vec::new();

    for entry in tree.tree.iter().filter(|e| e.is_blob()) {
        let lower = entry.path.to_lowercase();
        let file_name = lower.rsplit('/').next().unwrap_or(&lower);
        let matches_language = file_name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| extensions.contains(&ext));
        if is_excluded(&entry.path) || !matches_language {
            continue;
        }
        if CORE_NAMES.iter().any(|n| file_name.contains(n)) {
            core.push(entry.path.clone());
        } else {
            rest.push(entry.path.clone());
        }
    }

    core.into_iter()
        .chain(rest)
        .take(MAX_CODE_CANDIDATES)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TreeEntry;
    use httpmock::prelude::*;

    fn entry(path: &str, entry_type: &str) -> TreeEntry {
        TreeEntry {
            path: path.to_string(),
            entry_type: entry_type.to_string(),
        }
    }

    fn tree() -> GitTree {
        GitTree {
            tree: vec![
                entry("src", "tree"),
                entry("src/utils.py", "blob"),
                entry("src/app.py", "blob"),
                entry("src/deep/nested/module/x.py", "blob"),
                entry("node_modules/lib/index.js", "blob"),
                entry(".github/workflows/ci.yml", "blob"),
                entry("tests/unit/models/test_x.py", "blob"),
                entry("README.md", "blob"),
            ],
            truncated: false,
        }
    }

    #[test]
    fn test_select_tree_filters() {
        let (dirs, files) = select_tree(&tree());
        assert_eq!(
            dirs,
            vec![
                "src/",
                "src/utils.py",
                "src/app.py",
                ".github/workflows/ci.yml",
                "tests/unit/models/test_x.py",
                "README.md",
            ]
        );
        assert!(!files.contains(&"src/".to_string()));
        assert_eq!(files.len(), 5);
    }

    #[test]
    fn test_code_candidates_prefer_core_names() {
        let candidates = code_candidates(&tree(), Some("Python"));
        assert_eq!(candidates[0], "src/app.py");
        assert!(!candidates.iter().any(|c| c.contains("node_modules")));
    }

    #[tokio::test]
    async fn test_fetch_missing_repo() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/ghost");
            then.status(404);
        });

        let github = GitHubClient::new(None, 1000).unwrap().with_base_url(server.base_url());
        let fetcher = RepoFetcher::new(github, Arc::new(Storage::in_memory().unwrap()), 60);
        let err = fetcher.fetch("https://github.com/acme/ghost", false).await.unwrap_err();
        assert!(matches!(err, Error::RepoNotFound(name) if name == "acme/ghost"));
    }

    #[tokio::test]
    async fn test_fetch_uses_cache() {
        let storage = Arc::new(Storage::in_memory().unwrap());
        storage
            .cache_repo(&RepoInfo {
                full_name: "acme/demo".to_string(),
                stars: 99,
                ..Default::default()
            })
            .unwrap();

        // No mocks registered: any HTTP call would fail the fetch
        let server = MockServer::start();
        let github = GitHubClient::new(None, 1000).unwrap().with_base_url(server.base_url());
        let fetcher = RepoFetcher::new(github, storage, 3600);
        let info = fetcher.fetch("https://github.com/acme/demo", true).await.unwrap();
        assert_eq!(info.stars, 99);
    }

    #[tokio::test]
    async fn test_fetch_full_repo() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/demo");
            then.status(200).json_body(serde_json::json!({
                "name": "demo",
                "full_name": "acme/demo",
                "owner": {"login": "acme"},
                "description": "An LLM agent",
                "html_url": "https://github.com/acme/demo",
                "stargazers_count": 3,
                "language": "Python",
                "default_branch": "main",
                "license": {"name": "MIT License", "spdx_id": "MIT"}
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/demo/git/trees/main");
            then.status(200).json_body(serde_json::json!({
                "tree": [
                    {"path": "app.py", "type": "blob"},
                    {"path": "requirements.txt", "type": "blob"}
                ],
                "truncated": false
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/demo/contents/README.md");
            then.status(200).json_body(serde_json::json!({
                "path": "README.md", "content": "IyBEZW1vCg==", "encoding": "base64"
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/demo/contents/requirements.txt");
            then.status(200).json_body(serde_json::json!({
                "path": "requirements.txt", "content": "langgraph\n", "encoding": "utf-8"
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/demo/contents/app.py");
            then.status(200).json_body(serde_json::json!({
                "path": "app.py", "content": "def main():\n    pass\n", "encoding": "utf-8"
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/demo/contributors");
            then.status(200).json_body(serde_json::json!([
                {"login": "alice", "contributions": 10},
                {"login": "bob", "contributions": 2}
            ]));
        });
        // issues, commits and releases are left unmocked and degrade gracefully

        let storage = Arc::new(Storage::in_memory().unwrap());
        let github = GitHubClient::new(None, 1000).unwrap().with_base_url(server.base_url());
        let fetcher = RepoFetcher::new(github, storage.clone(), 3600);
        let info = fetcher.fetch("https://github.com/acme/demo", false).await.unwrap();

        assert_eq!(info.readme, "# Demo\n");
        assert_eq!(info.requirements, "langgraph\n");
        assert!(info.code_files.contains_key("app.py"));
        assert_eq!(info.contributors_count, 2);
        assert_eq!(info.license_name.as_deref(), Some("MIT License"));
        assert!(info.research_links.contains_key("github_search"));
        assert!(storage.get_cached_repo("acme/demo", 3600).unwrap().is_some());
    }
}
