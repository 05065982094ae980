use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const SERPER_API_URL: &str = "https://google.serper.dev";
const MAX_HITS: usize = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<SearchHit>,
}

/// Google results through the Serper.dev API.
pub struct SerperClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SerperClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: SERPER_API_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Top organic results for `query`.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        tracing::info!("Searching: {}", query);

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("X-API-KEY", &self.api_key)
            .json(&SearchRequest { q: query })
            .send()
            .await
            .map_err(|e| Error::Search(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!("Serper returned {}: {}", status, body)));
        }

        let result: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Search(format!("Failed to parse results: {}", e)))?;

        if result.organic.is_empty() {
            tracing::warn!("No results for '{}'", query);
        }
        Ok(result.organic.into_iter().take(MAX_HITS).collect())
    }
}

/// Numbered citation lines, `[S{start}]` onwards, for the analysis prompt.
pub fn format_hits(hits: &[SearchHit], start: usize) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            format!(
                "[S{}] URL: {} Title: {} Snippet: {}",
                start + i,
                or_placeholder(&hit.link, "no link"),
                or_placeholder(&hit.title, "untitled"),
                or_placeholder(&hit.snippet, "no snippet")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_search_returns_top_hits() {
        let server = MockServer::start();
        let organic: Vec<_> = (0..8)
            .map(|i| {
                serde_json::json!({
                    "title": format!("Result {}", i),
                    "link": format!("https://example.com/{}", i),
                    "snippet": "elder care market"
                })
            })
            .collect();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/search")
                .header("x-api-key", "serper-key")
                .json_body(serde_json::json!({"q": "elder care"}));
            then.status(200).json_body(serde_json::json!({ "organic": organic }));
        });

        let client = SerperClient::new("serper-key").unwrap().with_base_url(server.base_url());
        let hits = client.search("elder care").await.unwrap();
        mock.assert();
        assert_eq!(hits.len(), 5);
        assert_eq!(hits[0].title, "Result 0");
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/search");
            then.status(401).body("bad key");
        });

        let client = SerperClient::new("nope").unwrap().with_base_url(server.base_url());
        let err = client.search("anything").await.unwrap_err();
        assert!(matches!(err, Error::Search(msg) if msg.contains("401")));
    }

    #[test]
    fn test_format_hits_numbering() {
        let hits = vec![
            SearchHit {
                title: "Aging report".to_string(),
                link: "https://example.com/a".to_string(),
                snippet: "Market grows 8%".to_string(),
            },
            SearchHit {
                title: String::new(),
                link: "https://example.com/b".to_string(),
                snippet: String::new(),
            },
        ];
        let formatted = format_hits(&hits, 6);
        let lines: Vec<_> = formatted.lines().collect();
        assert_eq!(
            lines[0],
            "[S6] URL: https://example.com/a Title: Aging report Snippet: Market grows 8%"
        );
        assert_eq!(
            lines[1],
            "[S7] URL: https://example.com/b Title: untitled Snippet: no snippet"
        );
    }
}
