//! Batch prompt construction
//!
//! Each batch gets one self-contained prompt: company identity, the
//! size-capped document corpus, the scoring methodology, the 0-4 rubric,
//! this batch's measures, and the JSON output contract.

use crate::measures::{display_name, BATCH_COUNT};
use clarima_core::{CompanyProfile, ScoringConfig};
use clarima_discovery::Document;

/// System prompt sent with every batch call
pub const SCORING_SYSTEM_PROMPT: &str = "You are an expert climate risk analyst. \
Provide comprehensive, evidence-based assessments with detailed multi-paragraph \
rationale, specific verbatim evidence quotes, and source URLs for each measure.";

/// Default assessment methodology text embedded in each prompt. Deployments
/// can override it with their own versioned methodology document.
pub const DEFAULT_METHODOLOGY: &str = r#"Assess each measure on documented practice, not stated ambition. A score reflects what the company demonstrably does today:
- Prefer primary disclosures (TCFD reports, CDP responses, annual filings) over secondary commentary.
- Weigh evidence recency; disclosures older than three years support at most a "developing" rating.
- Evidence must name the company or its assets; sector-wide statements do not count.
- Where disclosures conflict, score the weaker reading and note the conflict in the rationale.
- Confidence reflects evidence quality and directness, not the score level."#;

/// Per-document cap on extracted page text included in the corpus
const EXTRACT_SNIPPET_CHARS: usize = 2_000;

/// One document plus optional extracted page text for corpus formatting
#[derive(Debug, Clone)]
pub struct CorpusEntry {
    pub document: Document,
    pub extract: Option<String>,
}

impl CorpusEntry {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            extract: None,
        }
    }
}

/// Format the discovered documents as numbered sources, capped to a
/// character budget. Truncation happens at an entry boundary and is
/// marked explicitly so the model is not misled into assuming the corpus
/// is complete.
pub fn format_document_corpus(entries: &[CorpusEntry], char_budget: usize) -> String {
    if entries.is_empty() {
        return "No relevant documents found.".to_string();
    }

    let mut formatted = String::new();
    for (i, entry) in entries.iter().enumerate() {
        let mut block = format!(
            "[Source {}]\nTitle: {}\nURL: {}\nSnippet: {}\n",
            i + 1,
            entry.document.title,
            entry.document.url,
            entry.document.snippet
        );
        if let Some(extract) = &entry.extract {
            let capped: String = extract.chars().take(EXTRACT_SNIPPET_CHARS).collect();
            block.push_str(&format!("Extract: {}\n", capped));
        }
        block.push('\n');

        if formatted.len() + block.len() > char_budget {
            formatted.push_str(&format!(
                "[Document corpus truncated: {} of {} sources included]\n",
                i,
                entries.len()
            ));
            break;
        }
        formatted.push_str(&block);
    }
    formatted
}

/// Cap the methodology text, marking the cut explicitly.
fn cap_methodology(methodology: &str, char_budget: usize) -> String {
    if methodology.len() <= char_budget {
        return methodology.to_string();
    }
    let mut end = char_budget;
    while !methodology.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\n\n[Assessment methodology truncated]", &methodology[..end])
}

/// Render the prompt for one batch of measures. The retry pass reuses this
/// with just the weak subset of a batch's measures.
pub fn build_batch_prompt(
    company: &CompanyProfile,
    corpus_text: &str,
    methodology: &str,
    batch_number: u8,
    measure_ids: &[&str],
    config: &ScoringConfig,
) -> String {
    let measures_list = measure_ids
        .iter()
        .map(|id| format!("- **{}**: {}", id, display_name(id).unwrap_or("Unknown measure")))
        .collect::<Vec<_>>()
        .join("\n");

    let methodology = cap_methodology(methodology, config.methodology_char_budget);
    let first_id = measure_ids.first().copied().unwrap_or("M01");
    let measure_count = measure_ids.len();

    format!(
        r#"# Physical Climate Risk Assessment - Batch {batch_num}/{batch_count}

**CRITICAL: PHYSICAL CLIMATE RISK EXCLUSIVE FOCUS**

This assessment focuses EXCLUSIVELY on **PHYSICAL CLIMATE RISKS** - the direct impacts of climate change (extreme weather, sea level rise, temperature changes, water stress, etc.).

**DO NOT accept evidence about:**
- Transition risks (policy, carbon pricing, technology, market changes)
- Generic "climate risks" or "climate-related risks" without PHYSICAL specification
- Regulatory or reputational climate risks

**ONLY accept evidence that explicitly mentions:**
- Physical climate risks, physical hazards, extreme weather events
- Climate adaptation, resilience, vulnerability to physical impacts
- Specific physical hazards (floods, hurricanes, droughts, heat, sea level rise, etc.)

**Evidence Validation Rule:**
If evidence only mentions "climate risks" or "climate-related risks" WITHOUT specifying PHYSICAL impacts, assign score 0 or "Unknown" with rationale explaining the lack of physical-risk-specific evidence.

---

## COMPANY INFORMATION
- **Company Name:** {name}
- **ISIN:** {isin}
- **Sector:** {sector}
- **Industry:** {industry}
- **Country:** {country}

## WEB SEARCH RESULTS (Company-Specific Climate Information)
{corpus}

## ASSESSMENT METHODOLOGY
{methodology}

## YOUR TASK

Assess the following {measure_count} measures for **{name}**:

{measures_list}

**For EACH measure, provide:**

1. **Score** (0-4):
   - 0 = No evidence found
   - 1 = Basic implementation (minimal or ad-hoc practices)
   - 2 = Developing implementation (some structured processes)
   - 3 = Structured implementation (clear processes and accountability)
   - 4 = Advanced implementation (demonstrated effectiveness and best practices)

2. **Confidence** (Low/Medium/High/Unknown): Your confidence in the score based on evidence quality

3. **Rationale** (2-4 paragraphs): Comprehensive explanation including:
   - Detailed justification for the score assigned
   - Specific references to evidence found in web results
   - Analysis of what the company is doing (or not doing)
   - What would be needed to achieve higher scores

4. **Evidence** (verbatim quotes): Direct quotes from web search results
   - Use "|" to separate multiple quotes
   - If no evidence found, state "No evidence found"

5. **Source** (URLs): Where evidence was found
   - Use "|" to separate multiple URLs
   - URLs should correspond to evidence quotes
   - If no evidence, leave empty

**OUTPUT FORMAT (JSON):**

```json
{{
  "measures": {{
    "{first_id}": {{
      "score": 0-4,
      "confidence": "Low|Medium|High|Unknown",
      "rationale": "Detailed multi-paragraph explanation...",
      "evidence": "Quote 1|Quote 2|Quote 3",
      "source": "URL1|URL2|URL3"
    }},
    ... (all {measure_count} measures in this batch)
  }}
}}
```

**CRITICAL REQUIREMENTS:**
- Provide ALL {measure_count} measures in this batch
- Be thorough and evidence-based
- Use verbatim quotes for evidence
- Be realistic - score 0 if no evidence found
"#,
        batch_num = batch_number,
        batch_count = BATCH_COUNT,
        name = company.name,
        isin = company.isin.as_deref().unwrap_or("Unknown"),
        sector = company.sector.as_deref().unwrap_or("Unknown"),
        industry = company.industry.as_deref().unwrap_or("Unknown"),
        country = company.country.as_deref().unwrap_or("Unknown"),
        corpus = corpus_text,
        methodology = methodology,
        measure_count = measure_count,
        measures_list = measures_list,
        first_id = first_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measures::BATCHES;

    fn doc(url: &str, title: &str, snippet: &str) -> Document {
        Document {
            url: url.to_string(),
            title: title.to_string(),
            snippet: snippet.to_string(),
            originating_query: "test".to_string(),
        }
    }

    fn test_config() -> ScoringConfig {
        ScoringConfig {
            corpus_char_budget: 60_000,
            methodology_char_budget: 40_000,
            max_concurrent_batches: 2,
            enable_retry_pass: true,
        }
    }

    #[test]
    fn corpus_numbers_sources_in_order() {
        let entries = vec![
            CorpusEntry::new(doc("https://a.example.com", "A", "first")),
            CorpusEntry::new(doc("https://b.example.com", "B", "second")),
        ];
        let corpus = format_document_corpus(&entries, 60_000);
        assert!(corpus.contains("[Source 1]"));
        assert!(corpus.contains("[Source 2]"));
        let pos1 = corpus.find("[Source 1]").unwrap();
        let pos2 = corpus.find("[Source 2]").unwrap();
        assert!(pos1 < pos2);
    }

    #[test]
    fn corpus_truncates_at_entry_boundary_with_marker() {
        let entries: Vec<CorpusEntry> = (0..50)
            .map(|i| {
                CorpusEntry::new(doc(
                    &format!("https://example.com/{i}"),
                    "Report",
                    &"x".repeat(200),
                ))
            })
            .collect();
        let corpus = format_document_corpus(&entries, 1_000);
        assert!(corpus.len() < 1_200);
        assert!(corpus.contains("[Document corpus truncated"));
        // No half-written source block after the marker
        assert!(corpus.trim_end().ends_with("sources included]"));
    }

    #[test]
    fn empty_corpus_has_placeholder() {
        assert_eq!(format_document_corpus(&[], 60_000), "No relevant documents found.");
    }

    #[test]
    fn methodology_over_budget_carries_marker() {
        let long = "m".repeat(50_000);
        let mut config = test_config();
        config.methodology_char_budget = 10_000;

        let company = CompanyProfile::new("Acme Corp");
        let prompt =
            build_batch_prompt(&company, "corpus", &long, 1, BATCHES[0].measure_ids, &config);
        assert!(prompt.contains("[Assessment methodology truncated]"));
    }

    #[test]
    fn prompt_lists_every_measure_in_the_batch() {
        let company = CompanyProfile::new("Acme Corp").with_isin("US0000000000");
        for batch in &BATCHES {
            let prompt = build_batch_prompt(
                &company,
                "No relevant documents found.",
                DEFAULT_METHODOLOGY,
                batch.number,
                batch.measure_ids,
                &test_config(),
            );
            for id in batch.measure_ids {
                assert!(prompt.contains(id), "batch {} missing {id}", batch.number);
            }
            assert!(prompt.contains(&format!("Batch {}/5", batch.number)));
            assert!(prompt.contains("US0000000000"));
        }
    }
}
