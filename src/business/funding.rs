use std::sync::LazyLock;

use regex::Regex;

const MAX_AMOUNTS: usize = 5;

static FUNDING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\d+\.?\d*\s*亿\s*(美元|元|RMB|USD)?",
        r"(?i)\d+\.?\d*\s*万\s*(美元|元|RMB|USD)?",
        r"(?i)\d+\.?\d*\s*(million|billion)\s*(USD|RMB)?",
        r"[A-Z]轮\d+\.?\d*亿",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Funding amounts quoted in `text`, such as "3亿美元", "B轮2亿" or
/// "12.5 million USD". First occurrences win; at most five are kept.
pub fn extract_funding_amounts(text: &str) -> Vec<String> {
    let mut amounts: Vec<String> = Vec::new();
    for pattern in FUNDING_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            let amount = m.as_str().trim().to_string();
            if !amounts.contains(&amount) {
                amounts.push(amount);
            }
        }
    }
    amounts.truncate(MAX_AMOUNTS);
    amounts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_mixed_units() {
        let text = "公司完成B轮2亿融资，估值 15 亿美元；另有 500万元 天使轮。\
                    Competitor raised 12.5 million USD and 1 Billion.";
        let amounts = extract_funding_amounts(text);
        assert_eq!(
            amounts,
            vec!["2亿", "15 亿美元", "500万元", "12.5 million USD", "1 Billion"]
        );
    }

    #[test]
    fn test_round_letter_is_uppercase() {
        let amounts = extract_funding_amounts("b轮2亿 与 C轮3亿");
        assert_eq!(amounts, vec!["2亿", "3亿", "C轮3亿"]);
    }

    #[test]
    fn test_dedupes_and_caps() {
        let text = "3亿 3亿 4亿 5亿 6亿 7亿 8亿";
        let amounts = extract_funding_amounts(text);
        assert_eq!(amounts, vec!["3亿", "4亿", "5亿", "6亿", "7亿"]);
        assert!(extract_funding_amounts("no numbers here").is_empty());
    }
}
