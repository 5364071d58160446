//! Extraction of the structured verdict from raw model output.

use thiserror::Error;

use crate::base::types::TicketAnalysis;

/// How much of the offending payload an extraction error carries.
const SNIPPET_LEN: usize = 120;

// Errors.

/// The model answered, but its output was not a valid analysis object.
///
/// This is terminal for the reply that produced it: the text is already in
/// hand, so retrying a provider cannot fix it. Whether the analyzer then
/// consults another provider is a policy decision made by the caller.
#[derive(Debug, Error)]
#[error("model output was not a valid analysis object: {source}; payload began: {snippet:?}")]
pub struct ParseError {
    source: serde_json::Error,
    snippet: String,
}

// Functions.

/// Extract a [`TicketAnalysis`] from raw model text.
///
/// Models are instructed to answer with bare JSON but routinely wrap it in a
/// markdown fence anyway. A fence tagged `json` (any casing) is preferred
/// wherever it sits in the text, then the first plain fenced block, then the
/// whole trimmed text. The function is pure: the same input always yields the
/// same result.
pub fn extract_analysis(raw: &str) -> Result<TicketAnalysis, ParseError> {
    let payload = fenced_block(raw).unwrap_or_else(|| raw.trim());

    serde_json::from_str(payload).map_err(|source| ParseError {
        source,
        snippet: payload.chars().take(SNIPPET_LEN).collect(),
    })
}

/// Find the best markdown-fenced block and return its trimmed inner content.
fn fenced_block(raw: &str) -> Option<&str> {
    // The tag and the fence are ASCII, so an ASCII-lowered copy shares byte
    // offsets with the original.
    let lowered = raw.to_ascii_lowercase();

    if let Some(open) = lowered.find("```json") {
        let inner = &raw[open + "```json".len()..];

        if let Some(close) = inner.find("```") {
            return Some(inner[..close].trim());
        }
    }

    let open = lowered.find("```")?;
    let inner = &raw[open + "```".len()..];
    let close = inner.find("```")?;

    Some(inner[..close].trim())
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::types::TicketPriority;

    const VERDICT: &str = r#"{
        "summary": "Users cannot log in after the OAuth redirect.",
        "priority": "high",
        "helpfulNotes": "Check the session cookie domain. See https://example.com/docs/oauth.",
        "relatedSkills": ["React", "OAuth"]
    }"#;

    fn assert_verdict(result: Result<TicketAnalysis, ParseError>) {
        let analysis = result.unwrap();

        assert_eq!(analysis.summary, "Users cannot log in after the OAuth redirect.");
        assert_eq!(analysis.priority, TicketPriority::High);
        assert_eq!(analysis.related_skills, vec!["React".to_string(), "OAuth".to_string()]);
    }

    #[test]
    fn parses_bare_json() {
        assert_verdict(extract_analysis(VERDICT));
    }

    #[test]
    fn parses_bare_json_with_surrounding_whitespace() {
        assert_verdict(extract_analysis(&format!("\n\n  {VERDICT}  \n")));
    }

    #[test]
    fn parses_json_tagged_fence() {
        assert_verdict(extract_analysis(&format!("```json\n{VERDICT}\n```")));
    }

    #[test]
    fn parses_fence_with_uppercase_tag() {
        assert_verdict(extract_analysis(&format!("```JSON\n{VERDICT}\n```")));
    }

    #[test]
    fn parses_untagged_fence() {
        assert_verdict(extract_analysis(&format!("```\n{VERDICT}\n```")));
    }

    #[test]
    fn parses_fence_with_surrounding_prose() {
        let raw = format!("Here is the analysis you asked for:\n\n```json\n{VERDICT}\n```\n\nLet me know if you need more.");

        assert_verdict(extract_analysis(&raw));
    }

    #[test]
    fn prefers_json_tagged_fence_over_earlier_plain_fence() {
        let raw = format!("```\nnot the payload\n```\n\n```json\n{VERDICT}\n```");

        assert_verdict(extract_analysis(&raw));
    }

    #[test]
    fn unterminated_fence_falls_back_to_whole_text() {
        let raw = format!("```json\n{VERDICT}");

        assert!(extract_analysis(&raw).is_err());
    }

    #[test]
    fn rejects_prose() {
        assert!(extract_analysis("I am sorry, I cannot help with that.").is_err());
    }

    #[test]
    fn rejects_json_with_missing_fields() {
        assert!(extract_analysis(r#"{"summary": "s", "priority": "low"}"#).is_err());
    }

    #[test]
    fn rejects_unknown_priority() {
        let raw = VERDICT.replace("high", "urgent");

        assert!(extract_analysis(&raw).is_err());
    }

    #[test]
    fn extraction_is_deterministic() {
        let raw = format!("```json\n{VERDICT}\n```");

        let first = extract_analysis(&raw).unwrap();
        let second = extract_analysis(&raw).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn error_snippet_is_bounded() {
        let raw = "x".repeat(10_000);

        let err = extract_analysis(&raw).unwrap_err();

        assert!(err.to_string().len() < 400);
    }
}
