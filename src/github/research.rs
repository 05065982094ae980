use std::collections::BTreeMap;

use crate::analysis::keywords::fold;
use crate::llm::prompts::truncate_chars;
use crate::models::RepoInfo;

const AI_KEYWORDS: &[&str] = &[
    "llm", "langchain", "agent", "rag", "retrieval", "embedding", "vector", "gpt",
    "transformer", "nlp", "chatbot", "memory", "ai", "machine learning", "deep learning",
    "neural", "model", "inference", "fine-tune",
];

const MAX_TOPICS: usize = 3;
const MAX_KEYWORDS: usize = 5;

/// Search keywords for related work: topics first, then AI terms from the
/// description and the start of the README.
pub fn research_keywords(info: &RepoInfo) -> Vec<String> {
    let mut keywords: Vec<String> = info.topics.iter().take(MAX_TOPICS).cloned().collect();

    let text = fold(&format!(
        "{} {}",
        info.description,
        truncate_chars(&info.readme, 500)
    ));
    for kw in AI_KEYWORDS {
        if keywords.len() >= MAX_KEYWORDS {
            break;
        }
        if text.contains(kw) && !keywords.iter().any(|k| k == kw) {
            keywords.push(kw.to_string());
        }
    }
    keywords.truncate(MAX_KEYWORDS);
    keywords
}

/// Links for judges to verify novelty: related-work searches plus the
/// repository's own pages.
pub fn build_research_links(info: &RepoInfo) -> BTreeMap<String, String> {
    let mut links = BTreeMap::new();
    let keywords = research_keywords(info);

    if !keywords.is_empty() {
        let top: Vec<String> = keywords
            .iter()
            .take(3)
            .map(|k| k.replace(' ', "+"))
            .collect();
        let query = top.join("+");
        links.insert(
            "github_search".to_string(),
            format!("https://github.com/search?q={}&type=repositories&s=stars&o=desc", query),
        );
        links.insert(
            "arxiv_search".to_string(),
            format!(
                "https://arxiv.org/search/?query={}&searchtype=all&source=header",
                top.join("+AND+")
            ),
        );
        links.insert(
            "huggingface_search".to_string(),
            format!("https://huggingface.co/models?search={}", query),
        );
        links.insert(
            "paperswithcode_search".to_string(),
            format!("https://paperswithcode.com/search?q={}", query),
        );
    }

    let repo_url = info.url();
    links.insert("github_repo".to_string(), repo_url.clone());
    links.insert("github_issues".to_string(), format!("{}/issues", repo_url));
    links.insert("github_prs".to_string(), format!("{}/pulls", repo_url));
    links.insert("github_releases".to_string(), format!("{}/releases", repo_url));
    links.insert(
        "github_contributors".to_string(),
        format!("{}/graphs/contributors", repo_url),
    );
    links.insert(
        "hackernews_search".to_string(),
        format!("https://hn.algolia.com/?q={}", info.name.replace('-', "+")),
    );

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> RepoInfo {
        RepoInfo {
            name: "memory-mate".to_string(),
            full_name: "acme/memory-mate".to_string(),
            html_url: "https://github.com/acme/memory-mate".to_string(),
            description: "RAG agent with long-term memory".to_string(),
            topics: vec!["llm".to_string(), "eldercare".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_keywords_topics_first() {
        let keywords = research_keywords(&info());
        assert_eq!(keywords, vec!["llm", "eldercare", "agent", "rag", "memory"]);
    }

    #[test]
    fn test_links() {
        let links = build_research_links(&info());
        assert_eq!(
            links["github_search"],
            "https://github.com/search?q=llm+eldercare+agent&type=repositories&s=stars&o=desc"
        );
        assert!(links["arxiv_search"].contains("query=llm+AND+eldercare+AND+agent"));
        assert_eq!(links["github_prs"], "https://github.com/acme/memory-mate/pulls");
        assert_eq!(links["hackernews_search"], "https://hn.algolia.com/?q=memory+mate");
    }

    #[test]
    fn test_links_without_keywords() {
        let bare = RepoInfo {
            name: "x".to_string(),
            full_name: "acme/x".to_string(),
            ..Default::default()
        };
        let links = build_research_links(&bare);
        assert!(!links.contains_key("github_search"));
        assert_eq!(links["github_repo"], "https://github.com/acme/x");
        assert_eq!(links.len(), 6);
    }
}
