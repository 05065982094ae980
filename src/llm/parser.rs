use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Extracts, repairs and deserializes the JSON object in an LLM answer.
pub fn parse_llm_json<T: DeserializeOwned>(response: &str) -> Result<T> {
    let json_str = extract_json(response)?;
    let repaired = repair_json(&json_str);

    serde_json::from_str(&repaired)
        .map_err(|e| Error::ParseError(format!("Failed to parse LLM response: {}", e)))
}

pub fn extract_json(text: &str) -> Result<String> {
    // Try to find JSON block in markdown code blocks
    if let Some(start) = text.find("```json") {
        let start = start + 7;
        if let Some(end) = text[start..].find("```") {
            return Ok(text[start..start + end].trim().to_string());
        }
    }

    // Try plain code block
    if let Some(start) = text.find("```") {
        let start = start + 3;
        // Skip any language identifier on the same line
        let start = text[start..]
            .find('\n')
            .map(|i| start + i + 1)
            .unwrap_or(start);
        if let Some(end) = text[start..].find("```") {
            let content = text[start..start + end].trim();
            if content.starts_with('{') {
                return Ok(content.to_string());
            }
        }
    }

    // Try to find raw JSON object
    if let Some(start) = text.find('{') {
        let mut depth = 0;
        let mut end = start;
        let mut in_string = false;
        let mut escape_next = false;

        for (i, c) in text[start..].char_indices() {
            if escape_next {
                escape_next = false;
                continue;
            }

            match c {
                '\\' if in_string => escape_next = true,
                '"' => in_string = !in_string,
                '{' if !in_string => depth += 1,
                '}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        end = start + i + 1;
                        break;
                    }
                }
                _ => {}
            }
        }

        if depth == 0 && end > start {
            return Ok(text[start..end].to_string());
        }

        // Unbalanced: hand the tail to repair_json
        return Ok(text[start..].trim().to_string());
    }

    Err(Error::ParseError("No valid JSON found in response".to_string()))
}

/// Closes brackets left open by a truncated answer. Returns `"{}"` when the
/// text cannot be repaired.
pub fn repair_json(text: &str) -> String {
    if serde_json::from_str::<serde_json::Value>(text).is_ok() {
        return text.to_string();
    }

    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escape_next = false;
    for c in text.chars() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' | '[' if !in_string => stack.push(c),
            '}' | ']' if !in_string => {
                stack.pop();
            }
            _ => {}
        }
    }

    let mut repaired = text.trim_end().trim_end_matches(',').to_string();
    if in_string {
        repaired.push('"');
    }
    let closers = stack.len();
    repaired.extend(stack.iter().rev().map(|open| if *open == '[' { ']' } else { '}' }));

    if serde_json::from_str::<serde_json::Value>(&repaired).is_ok() {
        tracing::debug!("Repaired truncated JSON ({} closers)", closers);
        return repaired;
    }

    tracing::warn!("Could not repair LLM JSON output, falling back to an empty object");
    "{}".to_string()
}
