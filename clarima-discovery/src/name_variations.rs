//! Company name variation resolution
//!
//! Derives the normalized name tokens used for relevance filtering and
//! query substitution: suffix-stripped tokens, joined prefixes, an
//! initialism, and (when an identifier is available) variations harvested
//! from a disambiguation search.

use crate::search::SearchProvider;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use tracing::debug;

/// Legal-entity suffixes stripped during name cleaning
const LEGAL_SUFFIXES: &[&str] = &[
    "corporation",
    "corp",
    "inc",
    "incorporated",
    "ltd",
    "limited",
    "plc",
    "llc",
    "company",
    "co",
    "group",
    "holdings",
    "sa",
    "ag",
    "nv",
    "se",
    "gmbh",
    "shs",
    "sbvtg",
];

fn punctuation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]").expect("static regex"))
}

fn capitalized_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([A-Z][A-Za-z&.\-]+(?:\s+[A-Z][A-Za-z&.\-]+){0,3})").expect("static regex")
    })
}

/// Lowercase, strip punctuation and legal-entity suffixes, collapse spaces.
pub fn clean_company_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = punctuation_re().replace_all(&lowered, " ");

    stripped
        .split_whitespace()
        .filter(|token| !LEGAL_SUFFIXES.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derive name variations from the name alone.
///
/// Always returns at least one non-empty token: the cleaned full name, or
/// the raw lowercased name as a last resort.
pub fn resolve_offline(company_name: &str) -> Vec<String> {
    let cleaned = clean_company_name(company_name);
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();

    let mut variations = BTreeSet::new();

    if let Some(first) = tokens.first() {
        if first.len() > 2 {
            variations.insert(first.to_string());
        }
    }
    if tokens.len() >= 2 {
        variations.insert(tokens[..2].join(" "));

        // Initialism of up to the first three tokens
        let initialism: String = tokens
            .iter()
            .take(3)
            .filter_map(|t| t.chars().next())
            .collect();
        if initialism.len() >= 2 {
            variations.insert(initialism);
        }
    }
    if !cleaned.is_empty() {
        variations.insert(cleaned);
    }

    let mut variations: Vec<String> = variations.into_iter().filter(|v| !v.is_empty()).collect();
    if variations.is_empty() {
        // Last resort: the raw lowercased name
        variations.push(company_name.trim().to_lowercase());
    }
    variations
}

/// Resolve name variations, additionally scanning one identifier-keyed
/// search for `(name near identifier)` mentions. Lookup failures fall back
/// silently to the offline derivation.
pub async fn resolve(
    company_name: &str,
    identifier: Option<&str>,
    provider: &dyn SearchProvider,
) -> Vec<String> {
    let mut variations = resolve_offline(company_name);

    let Some(identifier) = identifier else {
        return variations;
    };

    let query = format!("\"{}\" company name", identifier);
    let hits = match provider.search(&query, 10).await {
        Ok(hits) => hits,
        Err(e) => {
            debug!(identifier, error = %e, "Identifier lookup failed, using name-only variations");
            return variations;
        }
    };

    let anchor = variations
        .iter()
        .min_by_key(|v| v.len())
        .cloned()
        .unwrap_or_default();

    let mut extra = BTreeSet::new();
    for hit in hits {
        let text = format!("{} {}", hit.title, hit.snippet);
        if !text.contains(identifier) {
            continue;
        }
        for cap in capitalized_run_re().captures_iter(&text) {
            let candidate = clean_company_name(&cap[1]);
            // Only accept runs that share the shortest known token,
            // otherwise any capitalized phrase near the identifier would slip in
            if !candidate.is_empty() && !anchor.is_empty() && candidate.contains(&anchor) {
                extra.insert(candidate);
            }
        }
    }

    for candidate in extra {
        if !variations.contains(&candidate) {
            variations.push(candidate);
        }
    }
    variations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_legal_suffixes_and_punctuation() {
        assert_eq!(clean_company_name("Acme Corp."), "acme");
        assert_eq!(clean_company_name("Siemens AG"), "siemens");
        assert_eq!(clean_company_name("Rio Tinto Group Ltd"), "rio tinto");
    }

    #[test]
    fn derives_prefix_and_initialism_variants() {
        let variations = resolve_offline("International Business Machines Corp");
        assert!(variations.contains(&"international".to_string()));
        assert!(variations.contains(&"international business".to_string()));
        assert!(variations.contains(&"international business machines".to_string()));
        assert!(variations.contains(&"ibm".to_string()));
    }

    #[test]
    fn never_returns_empty_set() {
        // A name that is nothing but a suffix still yields the raw fallback
        let variations = resolve_offline("Inc.");
        assert!(!variations.is_empty());
        assert!(variations.iter().all(|v| !v.is_empty()));
    }

    #[test]
    fn single_word_name_resolves_to_itself() {
        let variations = resolve_offline("Vattenfall");
        assert_eq!(variations, vec!["vattenfall".to_string()]);
    }
}
