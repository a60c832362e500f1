//! Tolerant parsing of batch scoring responses
//!
//! Models wrap JSON in markdown fences, prepend commentary, or drop fields.
//! Parsing never fails the batch: anything unrecoverable degrades to default
//! results so the aggregate always covers the full measure set.

use crate::types::{Confidence, MeasureResult};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::{debug, warn};

fn fenced_json_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("fenced json regex")
    })
}

/// Outcome of JSON extraction from one raw response. Malformed is never a
/// hard failure: callers downgrade it to a full-default measure map.
#[derive(Debug)]
pub enum ParsedBatch {
    /// The `measures` object, keyed by measure id
    Parsed(serde_json::Map<String, Value>),
    Malformed(String),
}

/// Pull the `measures` object out of a raw model response.
///
/// Preference order: a fenced ```json block, then the widest brace-delimited
/// span that mentions `"measures"`.
pub fn extract_measures(raw: &str) -> ParsedBatch {
    let payload = extract_json_payload(raw);

    let Some(payload) = payload else {
        return ParsedBatch::Malformed("no JSON object found in response".to_string());
    };
    match payload.get("measures") {
        Some(Value::Object(map)) => ParsedBatch::Parsed(map.clone()),
        Some(_) => ParsedBatch::Malformed("\"measures\" is not a JSON object".to_string()),
        None => ParsedBatch::Malformed("JSON object has no \"measures\" key".to_string()),
    }
}

fn extract_json_payload(raw: &str) -> Option<Value> {
    if let Some(caps) = fenced_json_re().captures(raw) {
        if let Ok(value) = serde_json::from_str::<Value>(&caps[1]) {
            return Some(value);
        }
        debug!("Fenced block found but did not parse as JSON, trying bare span");
    }

    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    let span = &raw[start..=end];
    if !span.contains("\"measures\"") {
        return None;
    }
    serde_json::from_str::<Value>(span).ok()
}

/// Coerce a score field to the 0-4 ordinal scale. Accepts integers, floats,
/// and numeric strings; anything else is 0.
fn coerce_score(value: Option<&Value>) -> u8 {
    let Some(value) = value else { return 0 };
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    n.round().clamp(0.0, 4.0) as u8
}

/// Split a pipe-delimited field, also accepting a JSON array of strings.
fn coerce_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => s
            .split('|')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn coerce_measure(measure_id: &str, entry: &Value, model: &str) -> MeasureResult {
    let score = coerce_score(entry.get("score"));
    let confidence = entry
        .get("confidence")
        .and_then(Value::as_str)
        .map(Confidence::parse)
        .unwrap_or(Confidence::Unknown);
    let rationale = entry
        .get("rationale")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| "No assessment provided".to_string());

    let mut evidence = coerce_list(entry.get("evidence"));
    if evidence.is_empty() {
        evidence.push("No evidence found".to_string());
    }
    // The output contract says "source"; tolerate the plural too.
    let sources = match entry.get("source") {
        Some(v) => coerce_list(Some(v)),
        None => coerce_list(entry.get("sources")),
    };

    MeasureResult {
        measure_id: measure_id.to_string(),
        score,
        confidence,
        rationale,
        evidence,
        sources,
        model: model.to_string(),
    }
}

/// Parse one batch response into results for exactly the requested measures.
///
/// Measures missing from the response, and responses with no recoverable
/// JSON at all, come back as zero-score defaults. The returned map's key set
/// is always identical to `requested_ids`.
pub fn parse_batch_response(
    raw: &str,
    requested_ids: &[&str],
    model: &str,
) -> BTreeMap<String, MeasureResult> {
    let measures = match extract_measures(raw) {
        ParsedBatch::Parsed(map) => map,
        ParsedBatch::Malformed(reason) => {
            warn!(
                reason = %reason,
                response_chars = raw.len(),
                "Malformed batch response, using defaults"
            );
            return requested_ids
                .iter()
                .map(|id| {
                    (
                        id.to_string(),
                        MeasureResult::default_for(
                            id,
                            "Assessment failed: response could not be parsed",
                            model,
                        ),
                    )
                })
                .collect();
        }
    };

    requested_ids
        .iter()
        .map(|id| {
            let result = match measures.get(*id) {
                Some(entry) if entry.is_object() => coerce_measure(id, entry, model),
                _ => {
                    debug!("Measure {} missing from batch response, defaulting", id);
                    MeasureResult::default_for(id, "No assessment provided", model)
                }
            };
            (id.to_string(), result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDS: &[&str] = &["M01", "M02"];

    #[test]
    fn parses_fenced_json_block() {
        let raw = r#"Here is my assessment:
```json
{"measures": {"M01": {"score": 3, "confidence": "High", "rationale": "Strong disclosure.", "evidence": "Quote A|Quote B", "source": "https://a.example.com"}, "M02": {"score": 1, "confidence": "Low", "rationale": "Thin evidence.", "evidence": "Quote C", "source": ""}}}
```
Let me know if you need more."#;

        let parsed = parse_batch_response(raw, IDS, "deepseek-chat");
        assert_eq!(parsed.len(), 2);

        let m01 = &parsed["M01"];
        assert_eq!(m01.score, 3);
        assert_eq!(m01.confidence, Confidence::High);
        assert_eq!(m01.evidence, vec!["Quote A", "Quote B"]);
        assert_eq!(m01.sources, vec!["https://a.example.com"]);
        assert_eq!(m01.model, "deepseek-chat");

        let m02 = &parsed["M02"];
        assert_eq!(m02.score, 1);
        assert!(m02.sources.is_empty());
    }

    #[test]
    fn falls_back_to_bare_json_span() {
        let raw = r#"Assessment follows. {"measures": {"M01": {"score": 2, "confidence": "Medium", "rationale": "Some process exists."}}} End of output."#;
        let parsed = parse_batch_response(raw, IDS, "deepseek-chat");
        assert_eq!(parsed["M01"].score, 2);
        // M02 was requested but absent, so it gets the stock default entry
        assert_eq!(parsed["M02"].score, 0);
        assert_eq!(parsed["M02"].confidence, Confidence::Unknown);
        assert_eq!(parsed["M02"].rationale, "No assessment provided");
    }

    #[test]
    fn extraction_tags_malformed_responses_with_a_reason() {
        match extract_measures("no json here at all") {
            ParsedBatch::Malformed(reason) => assert!(reason.contains("no JSON object")),
            ParsedBatch::Parsed(_) => panic!("should be malformed"),
        }
        match extract_measures(r#"{"measures": "not an object"}"#) {
            ParsedBatch::Malformed(reason) => assert!(reason.contains("not a JSON object")),
            ParsedBatch::Parsed(_) => panic!("should be malformed"),
        }
    }

    #[test]
    fn garbage_response_yields_defaults_for_all_requested() {
        let parsed = parse_batch_response("I cannot help with that.", IDS, "m");
        assert_eq!(parsed.len(), 2);
        for id in IDS {
            let r = &parsed[*id];
            assert_eq!(r.score, 0);
            assert_eq!(r.confidence, Confidence::Unknown);
            assert_eq!(r.evidence, vec!["No evidence found"]);
            assert!(r.rationale.contains("could not be parsed"));
        }
    }

    #[test]
    fn key_set_matches_requested_ids_exactly() {
        let raw = r#"{"measures": {"M01": {"score": 4}, "M99": {"score": 4}}}"#;
        let parsed = parse_batch_response(raw, IDS, "m");
        let keys: Vec<&str> = parsed.keys().map(String::as_str).collect();
        assert_eq!(keys, IDS);
    }

    #[test]
    fn coerces_string_and_out_of_range_scores() {
        let raw = r#"{"measures": {"M01": {"score": "3"}, "M02": {"score": 9}}}"#;
        let parsed = parse_batch_response(raw, IDS, "m");
        assert_eq!(parsed["M01"].score, 3);
        assert_eq!(parsed["M02"].score, 4);
    }

    #[test]
    fn accepts_array_evidence_and_plural_sources() {
        let raw = r#"{"measures": {"M01": {"score": 2, "evidence": ["Quote A", "Quote B"], "sources": "https://a.example.com|https://b.example.com"}}}"#;
        let parsed = parse_batch_response(raw, &["M01"], "m");
        assert_eq!(parsed["M01"].evidence, vec!["Quote A", "Quote B"]);
        assert_eq!(parsed["M01"].sources.len(), 2);
    }
}
