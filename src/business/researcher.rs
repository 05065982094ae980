use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;

use crate::business::funding::extract_funding_amounts;
use crate::error::{Error, Result};
use crate::llm::parser::{extract_json, repair_json};
use crate::llm::prompts::{industry_request, keyword_request, parse_keywords, vc_request};
use crate::llm::LLMProvider;
use crate::models::BusinessReport;
use crate::search::{format_hits, SearchHit, SerperClient};

const FALLBACK_INDUSTRY: &str = "General";
const MAX_KEYWORDS: usize = 5;

/// Venture-style due diligence on a business plan: industry detection,
/// web research, then a structured memo from the LLM.
pub struct BusinessResearcher {
    llm: Arc<dyn LLMProvider>,
    search: SerperClient,
}

impl BusinessResearcher {
    pub fn new(llm: Arc<dyn LLMProvider>, search: SerperClient) -> Self {
        Self { llm, search }
    }

    pub async fn analyze(&self, bp_text: &str) -> Result<BusinessReport> {
        if bp_text.trim().is_empty() {
            return Err(Error::ParseError("Business plan text is empty".to_string()));
        }

        let industry = self.detect_industry(bp_text).await;
        let keywords = self.search_keywords(bp_text, &industry).await;
        tracing::info!("Researching {} queries for {}", keywords.len(), industry);

        let search_context = self.research(&keywords).await;

        tracing::info!("Running investment analysis with {}", self.llm.name());
        let answer = self
            .llm
            .complete(vc_request(bp_text, &industry, &search_context))
            .await?;

        let mut report = parse_report(&answer)?;
        if report.industry_analysis.detected_industry.trim().is_empty()
            || report.industry_analysis.detected_industry == FALLBACK_INDUSTRY
        {
            report.industry_analysis.detected_industry = industry;
        }
        report.search_keywords = keywords;
        report.funding_mentions = extract_funding_amounts(&search_context);

        tracing::info!(
            "Business analysis complete: {}",
            report.project_identity.project_name
        );
        Ok(report)
    }

    async fn detect_industry(&self, bp_text: &str) -> String {
        match self.llm.complete(industry_request(bp_text)).await {
            Ok(answer) => {
                let industry = answer
                    .lines()
                    .map(|l| l.trim().trim_matches(|c| c == '"' || c == '\'' || c == '*'))
                    .find(|l| !l.is_empty())
                    .unwrap_or(FALLBACK_INDUSTRY)
                    .to_string();
                tracing::info!("Detected industry: {}", industry);
                industry
            }
            Err(e) => {
                tracing::warn!("Industry detection failed: {}", e);
                FALLBACK_INDUSTRY.to_string()
            }
        }
    }

    async fn search_keywords(&self, bp_text: &str, industry: &str) -> Vec<String> {
        let fallback = || {
            vec![
                format!("{} market report", industry),
                format!("{} competitors", industry),
            ]
        };

        match self.llm.complete(keyword_request(bp_text)).await {
            Ok(answer) => {
                let keywords = parse_keywords(&answer, MAX_KEYWORDS);
                if keywords.is_empty() {
                    tracing::warn!("No search keywords in LLM answer, using defaults");
                    fallback()
                } else {
                    keywords
                }
            }
            Err(e) => {
                tracing::warn!("Keyword extraction failed: {}", e);
                fallback()
            }
        }
    }

    /// Runs every query concurrently and renders one citation block per
    /// query, numbered continuously across blocks.
    async fn research(&self, keywords: &[String]) -> String {
        let searches = keywords.iter().map(|kw| async move {
            match self.search.search(kw).await {
                Ok(hits) => hits,
                Err(e) => {
                    tracing::warn!("Search for '{}' failed: {}", kw, e);
                    Vec::new()
                }
            }
        });
        let results: Vec<Vec<SearchHit>> = join_all(searches).await;

        let mut context = String::new();
        let mut next_citation = 1;
        for (kw, hits) in keywords.iter().zip(&results) {
            context.push_str(&format!("--- Keyword: {} ---\n", kw));
            if !hits.is_empty() {
                context.push_str(&format_hits(hits, next_citation));
                context.push('\n');
                next_citation += hits.len();
            }
        }
        context
    }
}

fn parse_report(answer: &str) -> Result<BusinessReport> {
    let json = match extract_json(answer) {
        Ok(json) => repair_json(&json),
        Err(e) => {
            tracing::warn!("{}; using an empty analysis", e);
            "{}".to_string()
        }
    };

    let value: Value = serde_json::from_str(&json)?;
    let Some(object) = value.as_object() else {
        return Err(Error::ParseError(
            "Investment analysis is not a JSON object".to_string(),
        ));
    };
    for key in BusinessReport::SECTIONS {
        if !object.contains_key(key) {
            tracing::warn!("Analysis is missing '{}', using defaults", key);
        }
    }

    serde_json::from_value(value)
        .map_err(|e| Error::ParseError(format!("Malformed investment analysis: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::CompletionRequest;
    use async_trait::async_trait;
    use httpmock::prelude::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned answers in order and records the prompts it saw.
    struct ScriptedLlm {
        answers: Mutex<VecDeque<Option<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        fn new(answers: Vec<Option<&str>>) -> Self {
            Self {
                answers: Mutex::new(answers.into_iter().map(|a| a.map(str::to_string)).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedLlm {
        async fn complete(&self, request: CompletionRequest) -> Result<String> {
            self.prompts.lock().unwrap().push(request.prompt);
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .flatten()
                .ok_or_else(|| Error::LLMApi("unavailable".to_string()))
        }

        fn max_context_tokens(&self) -> usize {
            8000
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn search_mock(server: &MockServer) {
        server.mock(|when, then| {
            when.method(POST).path("/search");
            then.status(200).json_body(serde_json::json!({
                "organic": [{
                    "title": "Elder care funding",
                    "link": "https://example.com/funding",
                    "snippet": "CareCo raised 12 million USD in 2024"
                }]
            }));
        });
    }

    #[test]
    fn test_parse_report_fills_missing_sections() {
        let report = parse_report(
            "Memo:\n```json\n{\"project_identity\": {\"project_name\": \"MemoryMate\"}, \"competitors\": [{\"name\": \"CareBot\"}]\n```",
        )
        .unwrap();
        assert_eq!(report.project_identity.project_name, "MemoryMate");
        assert_eq!(report.competitors[0].name, "CareBot");
        assert_eq!(report.funding_ecosystem.heat_level, "Unknown");
        assert_eq!(report.industry_analysis.market_size, "Not Found");
    }

    #[test]
    fn test_parse_report_without_json() {
        let report = parse_report("I cannot help with that.").unwrap();
        assert_eq!(report.project_identity.project_name, "Unknown Project");
    }

    #[tokio::test]
    async fn test_empty_plan_is_rejected() {
        let server = MockServer::start();
        let researcher = BusinessResearcher::new(
            Arc::new(ScriptedLlm::new(vec![])),
            SerperClient::new("key").unwrap().with_base_url(server.base_url()),
        );
        let err = researcher.analyze("   ").await.unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[tokio::test]
    async fn test_analyze_full_flow() {
        let server = MockServer::start();
        search_mock(&server);

        let llm = Arc::new(ScriptedLlm::new(vec![
            Some("Healthcare - Elder Care"),
            Some("elder care market size, dementia companion startups"),
            Some(r#"{"project_identity": {"project_name": "MemoryMate", "stage": "mvp"},
                     "pain_point_validation": {"score": 8, "reason": "Caregiver burden"},
                     "risk_assessment": ["Regulation"]}"#),
        ]));
        let researcher = BusinessResearcher::new(
            llm.clone(),
            SerperClient::new("key").unwrap().with_base_url(server.base_url()),
        );

        let report = researcher.analyze("MemoryMate helps people with dementia.").await.unwrap();
        assert_eq!(report.project_identity.project_name, "MemoryMate");
        assert_eq!(report.industry_analysis.detected_industry, "Healthcare - Elder Care");
        assert_eq!(report.pain_point_validation.score, 8.0);
        assert_eq!(report.search_keywords.len(), 2);
        assert_eq!(report.funding_mentions, vec!["12 million USD"]);

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[2].contains("[S1] URL: https://example.com/funding"));
        assert!(prompts[2].contains("[S2] URL: https://example.com/funding"));
    }

    #[tokio::test]
    async fn test_llm_fallbacks_before_analysis() {
        let server = MockServer::start();
        search_mock(&server);

        let llm = Arc::new(ScriptedLlm::new(vec![None, None, Some("{}")]));
        let researcher = BusinessResearcher::new(
            llm,
            SerperClient::new("key").unwrap().with_base_url(server.base_url()),
        );

        let report = researcher.analyze("A plan").await.unwrap();
        assert_eq!(report.industry_analysis.detected_industry, "General");
        assert_eq!(
            report.search_keywords,
            vec!["General market report", "General competitors"]
        );
    }

    #[tokio::test]
    async fn test_analysis_failure_is_an_error() {
        let server = MockServer::start();
        search_mock(&server);

        let llm = Arc::new(ScriptedLlm::new(vec![Some("Fintech"), Some("payments"), None]));
        let researcher = BusinessResearcher::new(
            llm,
            SerperClient::new("key").unwrap().with_base_url(server.base_url()),
        );
        assert!(matches!(
            researcher.analyze("A plan").await.unwrap_err(),
            Error::LLMApi(_)
        ));
    }
}
