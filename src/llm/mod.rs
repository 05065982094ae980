pub mod provider;
pub mod openai;
pub mod claude;
pub mod prompts;
pub mod parser;

use std::sync::Arc;

pub use provider::{CompletionRequest, LLMProvider};
pub use openai::OpenAICompatProvider;
pub use claude::ClaudeProvider;

use crate::config::{Config, LlmBackend};
use crate::error::Result;

/// Builds the provider selected by `LLM_PROVIDER`. Fails when no API key is set.
pub fn provider_from_config(config: &Config) -> Result<Arc<dyn LLMProvider>> {
    let api_key = config.require_llm_key()?.to_string();
    let provider: Arc<dyn LLMProvider> = match config.llm_backend {
        LlmBackend::OpenAICompatible => Arc::new(OpenAICompatProvider::new(
            api_key,
            config.llm_api_base.clone(),
            config.llm_model.clone(),
        )?),
        LlmBackend::Anthropic => Arc::new(ClaudeProvider::new(api_key, Some(config.llm_model.clone()))?),
    };
    tracing::info!("Using {} ({})", provider.name(), config.llm_model);
    Ok(provider)
}
