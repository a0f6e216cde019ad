//! Recover the requirement object from LLM output
//!
//! Hosted models often wrap their JSON in prose or Markdown fences despite
//! being told not to. Candidates are tried in order, and the first one that
//! parses as a JSON object wins:
//!
//! 1. the whole (trimmed) response
//! 2. the body of the first Markdown code fence
//! 3. the first balanced `{ ... }` span, found with a string-aware brace
//!    matcher, that holds a `functional` or `non_functional` key
//! 4. the greedy span from the first `{` to the last `}`
//!
//! Valid JSON of another type (such as an array around the object) falls
//! through to steps 3 and 4.
//!
//! Step 3 only accepts objects carrying a requirement key, so a fragment of
//! a truncated answer is never mistaken for the whole.

use reqsift_domain::{ExtractionResult, JsonObject, RequirementKind};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Why no requirement object could be recovered
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Nothing shaped like a JSON object in the response
    #[error("No valid JSON detected")]
    NoJsonObject,

    /// A candidate span was found but is not valid JSON
    #[error("Malformed JSON: {0}")]
    Malformed(String),

    /// Valid JSON, but not the expected shape
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
}

/// The recovered object and its typed view
#[derive(Debug, Clone)]
pub struct ParsedResponse {
    /// The JSON object exactly as the model wrote it
    pub document: JsonObject,

    /// Typed requirement lists
    pub result: ExtractionResult,
}

/// Parse LLM output into a requirement object
pub fn parse_llm_response(response: &str) -> Result<ParsedResponse, ParseError> {
    let document = extract_json_object(response)?;

    let result = ExtractionResult::from_object(&document)
        .map_err(|e| ParseError::SchemaMismatch(e.to_string()))?;

    Ok(ParsedResponse { document, result })
}

/// Find and parse the JSON object embedded in `response`
///
/// Valid JSON that is not an object (an array wrapping the answer, say) does
/// not end the search: the spans inside it are still scanned. It is only
/// reported as a schema mismatch when no object can be found at all.
pub fn extract_json_object(response: &str) -> Result<JsonObject, ParseError> {
    let trimmed = response.trim();
    let mut non_object = None;

    // Whole response, then fenced body
    let direct = std::iter::once(trimmed).chain(fenced_body(trimmed));
    for candidate in direct {
        match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(map)) => return Ok(map),
            Ok(other) => {
                debug!("Candidate is {}, scanning inside it", json_type(&other));
                non_object.get_or_insert(json_type(&other));
            }
            Err(_) => {}
        }
    }

    if let Some(map) = scan_balanced_objects(trimmed) {
        return Ok(map);
    }

    let mismatch = |found: &str| {
        ParseError::SchemaMismatch(format!("expected a JSON object, found {}", found))
    };

    // Greedy span, the last resort
    let span = trimmed
        .find('{')
        .zip(trimmed.rfind('}'))
        .filter(|(start, end)| start < end);
    let Some((start, end)) = span else {
        return Err(non_object.map_or(ParseError::NoJsonObject, mismatch));
    };

    debug!("Falling back to greedy span {}..={}", start, end);
    match serde_json::from_str::<Value>(&trimmed[start..=end]) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(mismatch(json_type(&other))),
        Err(e) => Err(match non_object {
            Some(found) => mismatch(found),
            None => ParseError::Malformed(e.to_string()),
        }),
    }
}

/// Body of the first Markdown code fence, without the language tag
fn fenced_body(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    let body_start = after_open.find('\n')? + 1;
    let body = &after_open[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}

fn scan_balanced_objects(text: &str) -> Option<JsonObject> {
    text.match_indices('{').find_map(|(start, _)| {
        let end = matching_brace(text, start)?;
        match serde_json::from_str::<Value>(&text[start..=end]) {
            Ok(Value::Object(map)) if has_requirement_keys(&map) => Some(map),
            _ => None,
        }
    })
}

/// Byte index of the `}` closing the `{` at `start`
///
/// Braces inside string literals (including escaped quotes) are ignored.
fn matching_brace(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}

fn has_requirement_keys(map: &JsonObject) -> bool {
    RequirementKind::ALL
        .iter()
        .any(|kind| map.contains_key(kind.key()))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PERF: &str = r#"{"functional":[],"non_functional":[{"title":"Perf","description":"The system shall respond within 2s.","source":{"page":null,"start_index":null}}]}"#;

    #[test]
    fn test_parse_plain_json() {
        let parsed = parse_llm_response(PERF).unwrap();
        assert!(parsed.result.functional.is_empty());
        assert_eq!(parsed.result.non_functional.len(), 1);
        assert_eq!(parsed.result.non_functional[0].title, "Perf");
    }

    #[test]
    fn test_parse_json_in_prose() {
        let response = format!("Prose... {} Trailing.", PERF);
        let parsed = parse_llm_response(&response).unwrap();

        let expected: Value = serde_json::from_str(PERF).unwrap();
        assert_eq!(Value::Object(parsed.document), expected);
        assert!(parsed.result.functional.is_empty());
        assert_eq!(parsed.result.non_functional.len(), 1);
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = "Here you go:\n```json\n{\"functional\": [{\"title\": \"Login\"}]}\n```\nDone.";
        let parsed = parse_llm_response(response).unwrap();
        assert_eq!(parsed.result.functional[0].title, "Login");
    }

    #[test]
    fn test_parse_fence_without_language() {
        let response = "```\n{\"non_functional\": []}\n```";
        let parsed = parse_llm_response(response).unwrap();
        assert!(parsed.result.is_empty());
    }

    #[test]
    fn test_closing_brace_inside_string() {
        let response = r#"Result: {"functional":[{"title":"Braces","description":"Render } and { literally, even \"}\""}]} -- end }"#;
        let parsed = parse_llm_response(response).unwrap();
        assert_eq!(
            parsed.result.functional[0].description,
            "Render } and { literally, even \"}\""
        );
    }

    #[test]
    fn test_stray_braces_in_prose_are_skipped() {
        let response = format!("Use {{placeholders}} like {{this}}. Answer: {}", PERF);
        let parsed = parse_llm_response(&response).unwrap();
        assert_eq!(parsed.result.non_functional.len(), 1);
    }

    #[test]
    fn test_requirement_object_preferred_over_earlier_object() {
        let response = format!("Options {{\"verbose\": true}} applied. {}", PERF);
        let parsed = parse_llm_response(&response).unwrap();
        assert!(parsed.document.contains_key("non_functional"));
        assert!(!parsed.document.contains_key("verbose"));
    }

    #[test]
    fn test_object_without_requirement_keys_via_greedy_span() {
        let parsed = parse_llm_response("note: {\"summary\": \"nothing found\"}").unwrap();
        assert_eq!(parsed.document["summary"], json!("nothing found"));
        assert!(parsed.result.is_empty());
    }

    #[test]
    fn test_missing_non_functional_key_is_empty() {
        let parsed = parse_llm_response(r#"{"functional": [{"title": "A"}]}"#).unwrap();
        assert_eq!(parsed.result.functional.len(), 1);
        assert!(parsed.result.non_functional.is_empty());
    }

    #[test]
    fn test_no_braces() {
        let err = parse_llm_response("Sorry, I cannot comply.").unwrap_err();
        assert_eq!(err, ParseError::NoJsonObject);
        assert_eq!(err.to_string(), "No valid JSON detected");
    }

    #[test]
    fn test_reversed_braces() {
        let err = parse_llm_response("} nothing here {").unwrap_err();
        assert_eq!(err, ParseError::NoJsonObject);
    }

    #[test]
    fn test_truncated_json_is_malformed_not_a_fragment() {
        let err = parse_llm_response(r#"{"functional": [{"title": "A"}, {"title": }"#).unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn test_object_wrapped_in_array_is_recovered() {
        let parsed = parse_llm_response(
            r#"[{"functional":[],"non_functional":[{"title":"Perf","description":"x"}]}]"#,
        )
        .unwrap();
        assert!(parsed.result.functional.is_empty());
        assert_eq!(parsed.result.non_functional[0].title, "Perf");
    }

    #[test]
    fn test_fenced_array_is_recovered() {
        let parsed = parse_llm_response("```json\n[{\"functional\": [{\"title\": \"A\"}]}]\n```").unwrap();
        assert_eq!(parsed.result.functional[0].title, "A");
    }

    #[test]
    fn test_array_without_objects_is_schema_mismatch() {
        let err = parse_llm_response(r#"["login", "logout"]"#).unwrap_err();
        assert!(matches!(err, ParseError::SchemaMismatch(msg) if msg.contains("array")));
    }

    #[test]
    fn test_bare_string_is_schema_mismatch() {
        let err = parse_llm_response(r#""no requirements""#).unwrap_err();
        assert!(matches!(err, ParseError::SchemaMismatch(msg) if msg.contains("string")));
    }

    #[test]
    fn test_wrongly_typed_list_is_schema_mismatch() {
        let err = parse_llm_response(r#"{"functional": "none", "non_functional": []}"#).unwrap_err();
        assert!(matches!(err, ParseError::SchemaMismatch(_)));
    }

    #[test]
    fn test_matching_brace_handles_nesting_and_escapes() {
        let text = r#"{"a": {"b": "x\\"}, "c": "}"}"#;
        assert_eq!(matching_brace(text, 0), Some(text.len() - 1));
        assert_eq!(matching_brace("{ unclosed", 0), None);
    }

    #[test]
    fn test_fenced_body() {
        assert_eq!(fenced_body("```json\n{}\n```"), Some("{}"));
        assert_eq!(fenced_body("no fence"), None);
        assert_eq!(fenced_body("```json\n{} never closed"), None);
    }
}
