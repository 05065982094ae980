pub mod languages;

use serde::{Deserialize, Serialize};

pub use languages::{code_extensions, detect_language, dominant_language, is_javascript_family};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TechTier {
    CuttingEdge,
    Modern,
    Standard,
}

impl TechTier {
    /// Points a single package contributes to the tech-stack average.
    pub fn points(&self) -> f64 {
        match self {
            TechTier::CuttingEdge => 100.0,
            TechTier::Modern => 75.0,
            TechTier::Standard => 50.0,
        }
    }
}

impl std::fmt::Display for TechTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TechTier::CuttingEdge => write!(f, "Cutting-edge"),
            TechTier::Modern => write!(f, "Modern"),
            TechTier::Standard => write!(f, "Standard"),
        }
    }
}

const CUTTING_EDGE: &[&str] = &[
    // Agent and LLM orchestration
    "vllm", "langchain", "langgraph", "autogen", "crewai", "lmdeploy", "ollama",
    "llamaindex", "llama-index", "dspy", "guidance", "outlines", "instructor",
    "pydantic-ai", "mirascope", "openai-agents", "smolagents", "agno", "phidata",
    "mem0", "letta", "browser-use", "crawl4ai",
    // Fine-tuning
    "unsloth", "axolotl", "trl",
    // JS AI SDKs
    "ai", "ai-sdk", "vercel-ai", "anthropic-ai", "openai",
];

const MODERN: &[&str] = &[
    "transformers", "anthropic", "cohere", "together",
    "fastapi", "streamlit", "gradio", "chainlit", "mesop",
    "chromadb", "pinecone", "weaviate", "qdrant", "milvus", "pgvector",
    "sentence-transformers", "huggingface-hub", "litellm", "groq",
    "fireworks-ai", "replicate", "modal", "ray", "celery",
    "next", "react", "vue", "svelte", "solid-js", "hono", "elysia", "bun", "deno",
    "drizzle-orm", "prisma", "trpc", "zod", "turborepo", "nx",
];

const STANDARD: &[&str] = &[
    "flask", "django", "requests", "numpy", "pandas", "scikit-learn",
    "matplotlib", "pillow", "opencv-python", "pydantic", "typer", "click", "rich",
    "express", "koa", "nestjs", "axios", "lodash", "typescript", "webpack",
    "vite", "eslint", "prettier",
];

/// Tiered catalog of third-party packages used to rate how current a
/// project's dependency stack is.
pub struct TechCatalog {
    tiers: Vec<(TechTier, &'static [&'static str])>,
}

impl TechCatalog {
    pub fn new() -> Self {
        Self {
            tiers: vec![
                (TechTier::CuttingEdge, CUTTING_EDGE),
                (TechTier::Modern, MODERN),
                (TechTier::Standard, STANDARD),
            ],
        }
    }

    /// First tier containing the package, checked from newest to oldest.
    pub fn classify(&self, package: &str) -> Option<TechTier> {
        let normalized = normalize_package(package);
        self.tiers
            .iter()
            .find(|(_, names)| names.iter().any(|name| matches_entry(&normalized, name)))
            .map(|(tier, _)| *tier)
    }
}

impl Default for TechCatalog {
    fn default() -> Self {
        Self::new()
    }
}

pub fn normalize_package(name: &str) -> String {
    name.trim().trim_start_matches('@').to_lowercase().replace('_', "-")
}

// "langchain-openai" belongs to "langchain", but "aiohttp" is not "ai".
fn matches_entry(package: &str, entry: &str) -> bool {
    match package.strip_prefix(entry) {
        Some("") => true,
        Some(rest) => rest.starts_with(['-', '.', '/', '[']),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_tiers() {
        let catalog = TechCatalog::new();
        assert_eq!(catalog.classify("langchain"), Some(TechTier::CuttingEdge));
        assert_eq!(catalog.classify("langchain-community"), Some(TechTier::CuttingEdge));
        assert_eq!(catalog.classify("openai"), Some(TechTier::CuttingEdge));
        assert_eq!(catalog.classify("FastAPI"), Some(TechTier::Modern));
        assert_eq!(catalog.classify("sentence_transformers"), Some(TechTier::Modern));
        assert_eq!(catalog.classify("numpy"), Some(TechTier::Standard));
        assert_eq!(catalog.classify("leftpad"), None);
    }

    #[test]
    fn test_prefix_match_requires_separator() {
        let catalog = TechCatalog::new();
        assert_eq!(catalog.classify("aiohttp"), None);
        assert_eq!(catalog.classify("nextra"), None);
        assert_eq!(catalog.classify("@ai-sdk"), Some(TechTier::CuttingEdge));
    }

    #[test]
    fn test_each_package_in_one_tier() {
        let all: Vec<&str> = CUTTING_EDGE.iter().chain(MODERN).chain(STANDARD).copied().collect();
        for (i, name) in all.iter().enumerate() {
            assert!(!all[i + 1..].contains(name), "{} listed twice", name);
        }
    }
}
