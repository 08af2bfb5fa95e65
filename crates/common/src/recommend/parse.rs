//! Model-output parsing for recommendations
//!
//! The model is asked for a JSON array of paper ids. Real responses often
//! arrive fenced, prefixed with prose, or truncated, so parsing runs in
//! three tiers:
//! 1. strict JSON parse of the whole (unfenced) text;
//! 2. regex extraction of the first bracketed array in the text;
//! 3. in-order scan for known catalog ids appearing anywhere in the text.
//! Every tier filters against the candidate catalog, so the output only
//! ever contains ids that exist. If all tiers fail the caller gets a typed
//! error instead of a silently substituted answer.

use crate::errors::{AppError, Result};
use regex_lite::Regex;
use std::collections::BTreeSet;

/// Hard cap on model output accepted by the parser
pub const MAX_RESPONSE_BYTES: usize = 64 * 1024;

/// Parse the model's response into an ordered, deduplicated list of
/// catalog ids, at most `limit` long.
pub fn parse_recommended_ids(raw: &str, catalog: &[String], limit: usize) -> Result<Vec<String>> {
    if raw.len() > MAX_RESPONSE_BYTES {
        return Err(AppError::Unavailable {
            message: "recommendation response exceeded size limit".into(),
        });
    }

    let text = strip_fences(raw);

    if let Ok(ids) = serde_json::from_str::<Vec<String>>(text) {
        let kept = filter_known(ids, catalog, limit);
        if !kept.is_empty() {
            return Ok(kept);
        }
    }

    if let Some(ids) = extract_array(text) {
        let kept = filter_known(ids, catalog, limit);
        if !kept.is_empty() {
            return Ok(kept);
        }
    }

    let kept = scan_for_ids(text, catalog, limit);
    if !kept.is_empty() {
        return Ok(kept);
    }

    Err(AppError::Unavailable {
        message: "recommendation response could not be parsed".into(),
    })
}

/// Remove a markdown code fence if the whole response is wrapped in one
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Pull the first bracketed array out of surrounding prose and parse it
fn extract_array(text: &str) -> Option<Vec<String>> {
    let re = Regex::new(r#"\[[^\[\]]*\]"#).ok()?;
    let candidate = re.find(text)?.as_str();
    serde_json::from_str::<Vec<String>>(candidate).ok()
}

/// Last resort: keep catalog ids in the order they appear in the text
fn scan_for_ids(text: &str, catalog: &[String], limit: usize) -> Vec<String> {
    let mut hits: Vec<(usize, &String)> = catalog
        .iter()
        .filter_map(|id| text.find(id.as_str()).map(|pos| (pos, id)))
        .collect();
    hits.sort_by_key(|(pos, _)| *pos);
    hits.into_iter().take(limit).map(|(_, id)| id.clone()).collect()
}

/// Keep only ids present in the catalog, preserving model order, deduped
fn filter_known(ids: Vec<String>, catalog: &[String], limit: usize) -> Vec<String> {
    let known: BTreeSet<&str> = catalog.iter().map(String::as_str).collect();
    let mut seen = BTreeSet::new();
    ids.into_iter()
        .filter(|id| known.contains(id.as_str()) && seen.insert(id.clone()))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<String> {
        vec!["P001".into(), "P002".into(), "P003".into(), "P004".into()]
    }

    #[test]
    fn test_strict_json_array() {
        let ids =
            parse_recommended_ids(r#"["P002", "P001"]"#, &catalog(), 10).unwrap();
        assert_eq!(ids, vec!["P002", "P001"]);
    }

    #[test]
    fn test_fenced_response() {
        let raw = "```json\n[\"P003\", \"P001\"]\n```";
        let ids = parse_recommended_ids(raw, &catalog(), 10).unwrap();
        assert_eq!(ids, vec!["P003", "P001"]);
    }

    #[test]
    fn test_array_embedded_in_prose() {
        let raw = "Here are my picks: [\"P004\", \"P002\"] based on topical overlap.";
        let ids = parse_recommended_ids(raw, &catalog(), 10).unwrap();
        assert_eq!(ids, vec!["P004", "P002"]);
    }

    #[test]
    fn test_id_scan_on_truncated_output() {
        // truncated mid-array, so both JSON tiers fail
        let raw = "[\"P002\", \"P003\", \"P0";
        let ids = parse_recommended_ids(raw, &catalog(), 10).unwrap();
        assert_eq!(ids, vec!["P002", "P003"]);
    }

    #[test]
    fn test_unknown_ids_are_dropped() {
        let ids = parse_recommended_ids(r#"["P999", "P001"]"#, &catalog(), 10).unwrap();
        assert_eq!(ids, vec!["P001"]);
    }

    #[test]
    fn test_duplicates_removed_order_kept() {
        let ids =
            parse_recommended_ids(r#"["P002", "P002", "P001"]"#, &catalog(), 10).unwrap();
        assert_eq!(ids, vec!["P002", "P001"]);
    }

    #[test]
    fn test_limit_truncates() {
        let ids = parse_recommended_ids(
            r#"["P001", "P002", "P003", "P004"]"#,
            &catalog(),
            2,
        )
        .unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_total_failure_is_typed_error() {
        let err = parse_recommended_ids("I cannot help with that.", &catalog(), 10)
            .unwrap_err();
        assert!(matches!(err, AppError::Unavailable { .. }));
    }

    #[test]
    fn test_oversized_response_rejected() {
        let raw = "x".repeat(MAX_RESPONSE_BYTES + 1);
        let err = parse_recommended_ids(&raw, &catalog(), 10).unwrap_err();
        assert!(matches!(err, AppError::Unavailable { .. }));
    }
}
