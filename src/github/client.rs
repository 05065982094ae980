use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::{sleep, Duration};

use crate::error::{Error, Result};
use crate::github::paginator::Paginator;
use crate::github::rate_limiter::RateLimiter;
use crate::models::{CommitSummary, ContentFile, Contributor, GitTree, Issue, Release, RepoMetadata};

const MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

pub struct GitHubClient {
    client: Client,
    rate_limiter: RateLimiter,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: Option<&str>, requests_per_minute: u32) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        } else {
            tracing::warn!("No GITHUB_TOKEN set, using unauthenticated GitHub access");
        }
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("sagescore/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(requests_per_minute),
            base_url: "https://api.github.com".to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// GETs `path` and deserializes the body. A 404 is `Ok(None)`; rate
    /// limits and network errors are retried with exponential backoff.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let mut attempt = 0;
        loop {
            match self.try_get_json(path).await {
                Err(e) if e.is_retryable() && attempt + 1 < MAX_ATTEMPTS => {
                    let backoff = Duration::from_secs(2u64.pow(attempt));
                    tracing::warn!(
                        "GitHub request {} failed ({}), retrying in {:?}",
                        path,
                        e,
                        backoff
                    );
                    sleep(backoff).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn try_get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        self.rate_limiter.wait().await;
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Fetching: {}", url);

        let response = self.client.get(&url).send().await?;
        self.rate_limiter.update_from_headers(response.headers()).await;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(Error::RateLimited(retry_after));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "Failed to fetch {}: {} - {}",
                path, status, body
            )));
        }

        Ok(Some(response.json().await?))
    }

    pub async fn get_repo(&self, owner: &str, repo: &str) -> Result<Option<RepoMetadata>> {
        tracing::info!("Fetching repository: {}/{}", owner, repo);
        self.get_json(&format!("/repos/{}/{}", owner, repo)).await
    }

    pub async fn get_tree(&self, owner: &str, repo: &str, branch: &str) -> Result<Option<GitTree>> {
        self.get_json(&format!(
            "/repos/{}/{}/git/trees/{}?recursive=1",
            owner, repo, branch
        ))
        .await
    }

    /// Decoded UTF-8 (lossy) contents of a file, or `None` if it does not exist.
    pub async fn get_file(&self, owner: &str, repo: &str, path: &str) -> Result<Option<String>> {
        let file: Option<ContentFile> = self
            .get_json(&format!("/repos/{}/{}/contents/{}", owner, repo, path))
            .await?;

        file.map(|f| decode_content(&f)).transpose()
    }

    pub async fn get_recent_issues(&self, owner: &str, repo: &str, limit: u32) -> Result<Vec<Issue>> {
        let issues: Option<Vec<Issue>> = self
            .get_json(&format!(
                "/repos/{}/{}/issues?state=all&per_page={}&sort=created&direction=desc",
                owner, repo, limit
            ))
            .await?;
        Ok(issues.unwrap_or_default())
    }

    /// Contributors in contribution order, up to `max`.
    pub async fn get_contributors(&self, owner: &str, repo: &str, max: u32) -> Result<Vec<Contributor>> {
        let url = format!("{}/repos/{}/{}/contributors", self.base_url, owner, repo);
        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        paginator.fetch_limited(&url, max.min(100), max).await
    }

    pub async fn get_latest_commit_date(&self, owner: &str, repo: &str) -> Result<Option<DateTime<Utc>>> {
        let commits: Option<Vec<CommitSummary>> = self
            .get_json(&format!("/repos/{}/{}/commits?per_page=1", owner, repo))
            .await?;
        Ok(commits
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.commit.committer)
            .and_then(|c| c.date))
    }

    pub async fn count_releases(&self, owner: &str, repo: &str, per_page: u32) -> Result<u32> {
        let releases: Option<Vec<Release>> = self
            .get_json(&format!("/repos/{}/{}/releases?per_page={}", owner, repo, per_page))
            .await?;
        Ok(releases.map(|r| r.len() as u32).unwrap_or(0))
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}

fn decode_content(file: &ContentFile) -> Result<String> {
    if file.encoding != "base64" {
        return Ok(file.content.clone());
    }
    let compact: String = file.content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| Error::ParseError(format!("Invalid base64 in {}: {}", file.path, e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
