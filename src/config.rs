use crate::error::{Error, Result};
use crate::scoring::DimensionWeights;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    /// Any endpoint speaking the OpenAI chat completions protocol.
    OpenAICompatible,
    Anthropic,
}

impl std::str::FromStr for LlmBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "deepseek" | "openai-compatible" => Ok(LlmBackend::OpenAICompatible),
            "anthropic" | "claude" => Ok(LlmBackend::Anthropic),
            other => Err(Error::Config(format!("Unknown LLM_PROVIDER: {}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub llm_backend: LlmBackend,
    pub llm_api_key: Option<String>,
    pub llm_api_base: String,
    pub llm_model: String,
    pub serper_api_key: Option<String>,
    pub database_path: String,
    pub cache_ttl_secs: u64,
    pub concurrency_limit: usize,
    pub requests_per_minute: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let github_token = non_empty_var("GITHUB_TOKEN");

        let llm_backend = match env::var("LLM_PROVIDER") {
            Ok(v) => v.parse()?,
            Err(_) => LlmBackend::OpenAICompatible,
        };

        let llm_api_key = non_empty_var("LLM_API_KEY");

        let llm_api_base = env::var("LLM_API_BASE")
            .unwrap_or_else(|_| "https://api.deepseek.com/v1".to_string());

        let llm_model = env::var("LLM_MODEL").unwrap_or_else(|_| match llm_backend {
            LlmBackend::OpenAICompatible => "deepseek-chat".to_string(),
            LlmBackend::Anthropic => "claude-sonnet-4-20250514".to_string(),
        });

        let serper_api_key = non_empty_var("SERPER_API_KEY");

        let database_path = env::var("DATABASE_PATH")
            .unwrap_or_else(|_| "sagescore.db".to_string());

        let cache_ttl_secs = env::var("CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let concurrency_limit = env::var("CONCURRENCY_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v: &usize| *v > 0)
            .unwrap_or(4);

        let requests_per_minute = env::var("REQUESTS_PER_MINUTE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            github_token,
            llm_backend,
            llm_api_key,
            llm_api_base,
            llm_model,
            serper_api_key,
            database_path,
            cache_ttl_secs,
            concurrency_limit,
            requests_per_minute,
        })
    }

    pub fn require_llm_key(&self) -> Result<&str> {
        self.llm_api_key
            .as_deref()
            .ok_or_else(|| Error::Config("LLM_API_KEY environment variable not set".to_string()))
    }

    pub fn require_serper_key(&self) -> Result<&str> {
        self.serper_api_key
            .as_deref()
            .ok_or_else(|| Error::Config("SERPER_API_KEY environment variable not set".to_string()))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Per-run knobs for the evaluation pipeline. The CLI overrides these after
/// deriving them from the environment.
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    pub use_cache: bool,
    pub cache_ttl_secs: u64,
    pub concurrency_limit: usize,
    pub use_llm: bool,
    pub innovation_weights: DimensionWeights,
    pub social_weights: DimensionWeights,
}

impl From<&Config> for EvaluationConfig {
    fn from(config: &Config) -> Self {
        Self {
            use_cache: true,
            cache_ttl_secs: config.cache_ttl_secs,
            concurrency_limit: config.concurrency_limit,
            use_llm: false,
            innovation_weights: DimensionWeights::innovation(),
            social_weights: DimensionWeights::social_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_backend_parsing() {
        assert_eq!("openai".parse::<LlmBackend>().unwrap(), LlmBackend::OpenAICompatible);
        assert_eq!("Claude".parse::<LlmBackend>().unwrap(), LlmBackend::Anthropic);
        assert!("gemini".parse::<LlmBackend>().is_err());
    }

    #[test]
    fn test_require_keys() {
        let config = Config {
            github_token: None,
            llm_backend: LlmBackend::OpenAICompatible,
            llm_api_key: Some("sk-test".to_string()),
            llm_api_base: "http://localhost".to_string(),
            llm_model: "m".to_string(),
            serper_api_key: None,
            database_path: ":memory:".to_string(),
            cache_ttl_secs: 60,
            concurrency_limit: 2,
            requests_per_minute: 30,
        };
        assert_eq!(config.require_llm_key().unwrap(), "sk-test");
        assert!(matches!(config.require_serper_key(), Err(Error::Config(_))));

        let eval = EvaluationConfig::from(&config);
        assert_eq!(eval.concurrency_limit, 2);
        assert!(eval.use_cache);
        assert!(!eval.use_llm);
    }
}
