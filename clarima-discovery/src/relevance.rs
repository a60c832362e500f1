//! Relevance filtering for search hits
//!
//! A strict AND of identity match and topical relevance, with one
//! exception: an identifier match is treated as self-sufficient.
//! Rejection rules run in order; the first match wins.

use tracing::trace;

/// Generic reference domains whose content is never company-specific
const BLOCKED_DOMAINS: &[&str] = &[
    "ipcc.ch",
    "unfccc.int",
    "epa.gov",
    "nasa.gov",
    "noaa.gov",
    "climate.gov",
    "wikipedia.org",
    "britannica.com",
    "investopedia.com",
    "worldbank.org",
    "imf.org",
    "oecd.org",
    "un.org",
    "carbonbrief.org",
    "climatecentral.org",
];

/// Phrases that mark generic-topic content rather than company disclosure
const GENERIC_PHRASES: &[&str] = &[
    "what is climate change",
    "climate change explained",
    "climate change basics",
    "introduction to",
    "overview of",
    "guide to",
    "climate science",
    "global warming basics",
    "climate 101",
];

/// Topical keywords that must accompany a name match
const CONTEXT_KEYWORDS: &[&str] = &[
    "climate",
    "sustainability",
    "esg",
    "tcfd",
    "cdp",
    "risk",
    "resilience",
    "adaptation",
    "weather",
    "environmental",
    "emissions",
];

/// Decide whether a single search hit should be kept.
pub fn accept(
    url: &str,
    title: &str,
    snippet: &str,
    identifier: Option<&str>,
    name_variations: &[String],
) -> bool {
    let text = format!("{} {}", title, snippet).to_lowercase();

    // Rule 1: generic reference domains
    if is_blocked_domain(url) {
        trace!(url, "Rejected: blocked domain");
        return false;
    }

    // Rule 2: generic-topic content
    if GENERIC_PHRASES.iter().any(|phrase| text.contains(phrase)) {
        trace!(url, "Rejected: generic content");
        return false;
    }

    // Rule 3: a verbatim identifier match is the strongest signal
    if let Some(id) = identifier {
        if !id.is_empty() && format!("{} {}", title, snippet).contains(id) {
            return true;
        }
    }

    // Rules 4-6: name variation must co-occur with a topical keyword
    let name_matched = name_variations.iter().any(|v| text.contains(v.as_str()));
    if !name_matched {
        trace!(url, "Rejected: no company match");
        return false;
    }

    let context_matched = CONTEXT_KEYWORDS.iter().any(|kw| text.contains(kw));
    if !context_matched {
        trace!(url, "Rejected: name match without topical context");
        return false;
    }

    true
}

fn is_blocked_domain(raw_url: &str) -> bool {
    let host = url::Url::parse(raw_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()));

    match host {
        Some(host) => BLOCKED_DOMAINS
            .iter()
            .any(|blocked| host == *blocked || host.ends_with(&format!(".{blocked}"))),
        // Unparseable URLs fall back to substring matching
        None => {
            let lowered = raw_url.to_lowercase();
            BLOCKED_DOMAINS.iter().any(|blocked| lowered.contains(blocked))
        }
    }
}
