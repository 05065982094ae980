pub mod client;
pub mod rate_limiter;
pub mod paginator;
pub mod repo_url;
pub mod research;
pub mod fetcher;

pub use client::GitHubClient;
pub use rate_limiter::RateLimiter;
pub use paginator::Paginator;
pub use repo_url::parse_repo_url;
pub use research::{build_research_links, research_keywords};
pub use fetcher::RepoFetcher;
