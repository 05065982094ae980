use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};

static GITHUB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.)?github\.com/([^/]+)/([^/\s?#]+)").unwrap()
});

/// Owner and repository name from a GitHub URL.
pub fn parse_repo_url(url: &str) -> Result<(String, String)> {
    let caps = GITHUB_URL
        .captures(url.trim())
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))?;

    let owner = caps[1].to_string();
    let name = caps[2].trim_end_matches(".git").to_string();
    if name.is_empty() {
        return Err(Error::InvalidUrl(url.to_string()));
    }
    Ok((owner, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_url_variants() {
        for url in [
            "https://github.com/acme/memorymate",
            "http://www.github.com/acme/memorymate",
            "github.com/acme/memorymate.git",
            "https://github.com/acme/memorymate/tree/main/src",
            "https://github.com/acme/memorymate?tab=readme#intro",
        ] {
            assert_eq!(
                parse_repo_url(url).unwrap(),
                ("acme".to_string(), "memorymate".to_string()),
                "{}",
                url
            );
        }
    }

    #[test]
    fn test_parse_repo_url_rejects_others() {
        assert!(matches!(
            parse_repo_url("https://gitlab.com/acme/demo"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(parse_repo_url("https://github.com/acme").is_err());
    }
}
