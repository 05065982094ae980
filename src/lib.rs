pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod llm;
pub mod taxonomy;
pub mod analysis;
pub mod scoring;
pub mod report;
pub mod search;
pub mod business;
pub mod storage;

pub use config::{Config, EvaluationConfig};
pub use error::{Error, Result};
pub use github::{GitHubClient, RepoFetcher};
pub use llm::{provider_from_config, LLMProvider};
pub use analysis::{EvaluationPipeline, EvaluationSummary};
pub use business::BusinessResearcher;
pub use search::SerperClient;
pub use storage::Storage;
