use crate::llm::provider::CompletionRequest;

pub const REPORT_SYSTEM_PROMPT: &str = r#"You are a senior reviewer for AI hackathons and venture competitions.
You receive a template assessment report for a GitHub project together with its structured scores.

Rewrite the report in Markdown so it reads like an expert's review:
- Keep every section and every numeric score exactly as given; never invent scores.
- Keep the section order: overview, verdict, capability radar, dimension analysis, improvement suggestions, judge focus, references, project health.
- Expand each dimension analysis with concrete evidence from the data (packages, patterns, files).
- Keep suggestions actionable, each with a priority (high, medium or low).
- Respond with the Markdown report only, without surrounding commentary."#;

pub const INDUSTRY_PROMPT: &str = r#"Read the business plan excerpt below and name its industry.
Answer with a single line in the form "Sector - Subsector" (for example "Healthcare - Elder Care") and nothing else.

Business plan:
"#;

pub const KEYWORD_PROMPT: &str = r#"Read the business plan below and propose web search queries that would help a venture analyst verify its market, competitors and funding landscape.
Return at most 5 queries, comma-separated, on one line, with no numbering or commentary.

Business plan:
"#;

pub const VC_SYSTEM_PROMPT: &str = r#"You are a partner at a venture capital firm performing due diligence on a business plan.
Use the business plan and the cited web search results ([S1], [S2], ...) to produce an investment memo.

You must respond with valid JSON matching this exact schema:
{
    "project_identity": {
        "project_name": "string",
        "slogan": "string",
        "elevator_pitch": "one or two sentences",
        "stage": "idea|prototype|mvp|growth|unknown"
    },
    "industry_analysis": {
        "detected_industry": "Sector - Subsector",
        "market_size": "string with unit, or 'Not Found'",
        "cagr": "string percentage, or 'Not Found'",
        "source": "[S#] citation or 'N/A'"
    },
    "competitors": [
        {"name": "string", "description": "string", "advantage": "how the project differs"}
    ],
    "funding_ecosystem": {
        "heat_level": "Hot|Warm|Cold|Unknown",
        "trend_summary": "string citing [S#]"
    },
    "pain_point_validation": {
        "score": 0-10,
        "reason": "string"
    },
    "public_sentiment": {
        "label": "Positive|Neutral|Negative",
        "summary": "string"
    },
    "risk_assessment": ["string"]
}

Guidelines:
- Only state market figures that appear in the search results, and cite them
- Use "Not Found" when the evidence is missing rather than guessing
- List at most 5 competitors and at most 5 risks"#;

pub const INDUSTRY_EXCERPT_CHARS: usize = 3000;
pub const KEYWORD_EXCERPT_CHARS: usize = 20000;
pub const VC_EXCERPT_CHARS: usize = 5000;

/// First `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4
}

pub fn industry_request(bp_text: &str) -> CompletionRequest {
    CompletionRequest::new(format!(
        "{}{}",
        INDUSTRY_PROMPT,
        truncate_chars(bp_text, INDUSTRY_EXCERPT_CHARS)
    ))
    .with_temperature(0.2)
    .with_max_tokens(64)
}

pub fn keyword_request(bp_text: &str) -> CompletionRequest {
    CompletionRequest::new(format!(
        "{}{}",
        KEYWORD_PROMPT,
        truncate_chars(bp_text, KEYWORD_EXCERPT_CHARS)
    ))
    .with_temperature(0.3)
    .with_max_tokens(256)
}

pub fn vc_request(bp_text: &str, industry: &str, search_context: &str) -> CompletionRequest {
    let prompt = format!(
        "Industry: {}\n\n## Business plan\n\n{}\n\n## Web search results\n\n{}\n",
        industry,
        truncate_chars(bp_text, VC_EXCERPT_CHARS),
        if search_context.trim().is_empty() {
            "No search results available."
        } else {
            search_context
        }
    );
    CompletionRequest::new(prompt)
        .with_system(VC_SYSTEM_PROMPT)
        .with_temperature(0.5)
        .with_max_tokens(4096)
}

pub fn report_request(template: &str, data: &str) -> CompletionRequest {
    CompletionRequest::new(format!(
        "## Structured data\n\n{}\n\n## Template report\n\n{}\n",
        data, template
    ))
    .with_system(REPORT_SYSTEM_PROMPT)
    .with_temperature(0.4)
    .with_max_tokens(8192)
}

/// Splits a comma-separated keyword answer, tolerating numbering, quotes and
/// full-width commas.
pub fn parse_keywords(answer: &str, max: usize) -> Vec<String> {
    answer
        .split([',', '，', '\n'])
        .map(|k| {
            let k = k.trim().trim_start_matches("- ");
            let k = match k.find(|c: char| !c.is_ascii_digit()) {
                Some(i) if i > 0 && (k[i..].starts_with('.') || k[i..].starts_with(')')) => &k[i + 1..],
                _ => k,
            };
            k.trim()
                .trim_matches(|c| c == '"' || c == '\'' || c == '`')
                .trim()
                .to_string()
        })
        .filter(|k| !k.is_empty())
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("阿尔茨海默", 2), "阿尔");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_parse_keywords() {
        let parsed = parse_keywords("1. elder care market, \"AI companion\"，dementia startups", 5);
        assert_eq!(parsed, vec!["elder care market", "AI companion", "dementia startups"]);
        assert_eq!(parse_keywords("a, b, c, d, e, f", 5).len(), 5);
    }

    #[test]
    fn test_vc_request_carries_schema() {
        let request = vc_request("Our BP", "Healthcare - Elder Care", "");
        assert!(request.system.unwrap().contains("pain_point_validation"));
        assert!(request.prompt.contains("No search results available."));
        assert_eq!(request.temperature, 0.5);
    }
}
