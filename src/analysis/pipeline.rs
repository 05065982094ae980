use std::sync::Arc;

use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::sync::Semaphore;

use crate::config::EvaluationConfig;
use crate::error::Result;
use crate::github::RepoFetcher;
use crate::llm::LLMProvider;
use crate::models::{EvaluationKind, InnovationReport, SocialValueReport};
use crate::report::{render_innovation_markdown, render_social_markdown, ReportOptimizer};
use crate::scoring::{InnovationScorer, SocialValueScorer};
use crate::storage::Storage;

/// One finished evaluation in a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationSummary {
    pub repo_full_name: String,
    pub repo_url: String,
    pub kind: EvaluationKind,
    pub total_score: f64,
    pub level: String,
    pub markdown: String,
}

pub struct EvaluationPipeline {
    fetcher: Arc<RepoFetcher>,
    innovation: InnovationScorer,
    social: SocialValueScorer,
    optimizer: ReportOptimizer,
    storage: Arc<Storage>,
    config: EvaluationConfig,
}

impl EvaluationPipeline {
    /// `llm` is only used for report rewriting when `config.use_llm` is set.
    pub fn new(
        fetcher: RepoFetcher,
        llm: Option<Arc<dyn LLMProvider>>,
        storage: Arc<Storage>,
        config: EvaluationConfig,
    ) -> Self {
        let llm = llm.filter(|_| config.use_llm);
        Self {
            fetcher: Arc::new(fetcher),
            innovation: InnovationScorer::new(),
            social: SocialValueScorer::new(),
            optimizer: ReportOptimizer::new(llm),
            storage,
            config,
        }
    }

    pub async fn evaluate_innovation(&self, url: &str) -> Result<(InnovationReport, String)> {
        let repo = self.fetcher.fetch(url, self.config.use_cache).await?;

        tracing::info!("Scoring innovation for {}", repo.full_name);
        let report = self.innovation.score(&repo, &self.config.innovation_weights);
        let markdown = self
            .optimizer
            .finalize_innovation(&report, render_innovation_markdown(&report))
            .await;

        self.storage.save_evaluation(
            EvaluationKind::Innovation,
            &repo.full_name,
            report.total_score,
            &report.level.to_string(),
            &report,
        )?;
        tracing::info!(
            "{}: {:.1}/100 ({})",
            repo.full_name,
            report.total_score,
            report.level
        );

        Ok((report, markdown))
    }

    pub async fn evaluate_social(&self, url: &str) -> Result<(SocialValueReport, String)> {
        let repo = self.fetcher.fetch(url, self.config.use_cache).await?;

        tracing::info!("Scoring social value for {}", repo.full_name);
        let report = self.social.score(&repo, &self.config.social_weights);
        let markdown = self
            .optimizer
            .finalize_social(&report, render_social_markdown(&report))
            .await;

        self.storage.save_evaluation(
            EvaluationKind::SocialValue,
            &repo.full_name,
            report.total_score,
            &report.level.to_string(),
            &report,
        )?;
        tracing::info!(
            "{}: {:.1}/100 ({})",
            repo.full_name,
            report.total_score,
            report.level
        );

        Ok((report, markdown))
    }

    /// Evaluates every URL with at most `concurrency_limit` in flight.
    /// Failed repositories are logged and left out of the result.
    pub async fn evaluate_batch(
        &self,
        urls: &[String],
        kind: EvaluationKind,
    ) -> Vec<EvaluationSummary> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency_limit.max(1)));

        let pb = ProgressBar::new(urls.len() as u64);
        match ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} repos")
        {
            Ok(style) => pb.set_style(style.progress_chars("#>-")),
            Err(e) => tracing::debug!("Progress template rejected: {}", e),
        }

        let futures = urls.iter().map(|url| {
            let sem = semaphore.clone();
            let pb = pb.clone();
            async move {
                let _permit = sem.acquire().await.ok()?;
                let outcome = self.evaluate_one(url, kind).await;
                pb.inc(1);

                match outcome {
                    Ok(summary) => Some(summary),
                    Err(e) => {
                        tracing::warn!("Skipping {}: {}", url, e);
                        None
                    }
                }
            }
        });

        let results: Vec<EvaluationSummary> = join_all(futures).await.into_iter().flatten().collect();
        pb.finish_with_message("Batch evaluation complete");
        tracing::info!("Evaluated {}/{} repositories", results.len(), urls.len());
        results
    }

    async fn evaluate_one(&self, url: &str, kind: EvaluationKind) -> Result<EvaluationSummary> {
        match kind {
            EvaluationKind::Innovation => {
                let (report, markdown) = self.evaluate_innovation(url).await?;
                Ok(EvaluationSummary {
                    repo_full_name: report.repo_name.clone(),
                    repo_url: report.repo_url.clone(),
                    kind,
                    total_score: report.total_score,
                    level: report.level.to_string(),
                    markdown,
                })
            }
            EvaluationKind::SocialValue => {
                let (report, markdown) = self.evaluate_social(url).await?;
                Ok(EvaluationSummary {
                    repo_full_name: report.repo_name.clone(),
                    repo_url: report.repo_url.clone(),
                    kind,
                    total_score: report.total_score,
                    level: report.level.to_string(),
                    markdown,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::GitHubClient;
    use crate::scoring::DimensionWeights;
    use httpmock::prelude::*;

    fn config() -> EvaluationConfig {
        EvaluationConfig {
            use_cache: false,
            cache_ttl_secs: 60,
            concurrency_limit: 2,
            use_llm: false,
            innovation_weights: DimensionWeights::innovation(),
            social_weights: DimensionWeights::social_value(),
        }
    }

    fn mock_repo(server: &MockServer, name: &str) {
        server.mock(|when, then| {
            when.method(GET).path(format!("/repos/acme/{}", name));
            then.status(200).json_body(serde_json::json!({
                "name": name,
                "full_name": format!("acme/{}", name),
                "owner": {"login": "acme"},
                "description": "An LLM agent that helps elderly people with dementia",
                "html_url": format!("https://github.com/acme/{}", name),
                "stargazers_count": 5,
                "language": "Python"
            }));
        });
    }

    fn pipeline(server: &MockServer, storage: Arc<Storage>) -> EvaluationPipeline {
        let github = GitHubClient::new(None, 1000).unwrap().with_base_url(server.base_url());
        let fetcher = RepoFetcher::new(github, storage.clone(), 60);
        EvaluationPipeline::new(fetcher, None, storage, config())
    }

    #[tokio::test]
    async fn test_evaluate_innovation_saves_history() {
        let server = MockServer::start();
        mock_repo(&server, "memorymate");
        let storage = Arc::new(Storage::in_memory().unwrap());

        let (report, markdown) = pipeline(&server, storage.clone())
            .evaluate_innovation("https://github.com/acme/memorymate")
            .await
            .unwrap();

        assert!(markdown.contains("# Innovation Assessment"));
        assert!(markdown.contains("## Report Quality"));
        let stored = storage
            .latest_evaluation("acme/memorymate", EvaluationKind::Innovation)
            .unwrap()
            .unwrap();
        assert_eq!(stored.total_score, report.total_score);
    }

    #[tokio::test]
    async fn test_batch_skips_failures() {
        let server = MockServer::start();
        mock_repo(&server, "memorymate");
        let storage = Arc::new(Storage::in_memory().unwrap());

        let urls = vec![
            "https://github.com/acme/memorymate".to_string(),
            "https://github.com/acme/ghost".to_string(),
            "not a url".to_string(),
        ];
        let results = pipeline(&server, storage.clone())
            .evaluate_batch(&urls, EvaluationKind::SocialValue)
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, EvaluationKind::SocialValue);
        assert_eq!(storage.list_evaluations(10).unwrap().len(), 1);
    }
}
