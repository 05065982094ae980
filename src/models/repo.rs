use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `GET /repos/{owner}/{repo}` payload, trimmed to the fields scoring uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoMetadata {
    pub name: String,
    pub full_name: String,
    pub owner: Owner,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub open_issues_count: u32,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    pub license: Option<License>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_branch() -> String {
    "main".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub name: Option<String>,
    pub spdx_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitTree {
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: String,
}

impl TreeEntry {
    pub fn is_dir(&self) -> bool {
        self.entry_type == "tree"
    }

    pub fn is_blob(&self) -> bool {
        self.entry_type == "blob"
    }
}

/// `GET /repos/{owner}/{repo}/contents/{path}` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentFile {
    pub path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub created_at: Option<DateTime<Utc>>,
    pub pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contributor {
    pub login: String,
    #[serde(default)]
    pub contributions: u32,
    #[serde(default)]
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub committer: Option<CommitSignature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitSignature {
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueSummary {
    pub title: String,
    pub state: String,
    pub labels: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub is_pull_request: bool,
}

impl From<Issue> for IssueSummary {
    fn from(issue: Issue) -> Self {
        Self {
            title: issue.title,
            state: issue.state,
            labels: issue.labels.into_iter().map(|l| l.name).collect(),
            created_at: issue.created_at,
            is_pull_request: issue.pull_request.is_some(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContributorSummary {
    pub login: String,
    pub contributions: u32,
    pub html_url: String,
}

impl From<Contributor> for ContributorSummary {
    fn from(c: Contributor) -> Self {
        Self {
            login: c.login,
            contributions: c.contributions,
            html_url: c.html_url,
        }
    }
}

/// Everything the analyzers need about one repository. Serialized as-is
/// into the repo cache.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoInfo {
    pub owner: String,
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub description: String,
    pub stars: u32,
    pub forks: u32,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub default_branch: String,

    pub readme: String,
    /// requirements.txt, or package.json for JS/TS projects.
    pub requirements: String,
    pub pyproject: String,
    pub directory_tree: Vec<String>,
    pub source_files: Vec<String>,
    pub code_files: BTreeMap<String, String>,

    pub open_issues_count: u32,
    pub contributors_count: u32,
    pub releases_count: u32,
    pub last_commit_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub license_name: Option<String>,
    pub recent_issues: Vec<IssueSummary>,
    pub top_contributors: Vec<ContributorSummary>,

    pub research_links: BTreeMap<String, String>,
}

impl RepoInfo {
    /// Description and README joined, the text most keyword heuristics run on.
    pub fn narrative(&self) -> String {
        format!("{} {}", self.description, self.readme)
    }

    pub fn url(&self) -> String {
        if self.html_url.is_empty() {
            format!("https://github.com/{}", self.full_name)
        } else {
            self.html_url.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_metadata_deserialize() {
        let json = r#"{
            "name": "demo",
            "full_name": "acme/demo",
            "owner": {"login": "acme"},
            "description": null,
            "html_url": "https://github.com/acme/demo",
            "stargazers_count": 12,
            "language": "Python",
            "license": {"name": "MIT License", "spdx_id": "MIT"},
            "created_at": "2024-01-02T03:04:05Z"
        }"#;
        let meta: RepoMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.owner.login, "acme");
        assert_eq!(meta.default_branch, "main");
        assert_eq!(meta.stargazers_count, 12);
        assert!(meta.topics.is_empty());
    }

    #[test]
    fn test_issue_summary_marks_pull_requests() {
        let issue: Issue = serde_json::from_str(
            r#"{"title": "Add docs", "state": "open", "labels": [{"name": "docs"}],
                "created_at": null, "pull_request": {"url": "x"}}"#,
        )
        .unwrap();
        let summary = IssueSummary::from(issue);
        assert!(summary.is_pull_request);
        assert_eq!(summary.labels, vec!["docs".to_string()]);
    }
}
