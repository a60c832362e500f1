//! Search query template generation
//!
//! Seven query strategies, one set per iteration, cycling once the defined
//! templates are exhausted so later iterations reuse earlier strategies.

use crate::name_variations::clean_company_name;

/// Number of distinct iteration strategies before cycling
pub const TEMPLATE_SET_SIZE: u32 = 7;

/// Generates the query set for each discovery iteration
#[derive(Debug, Clone)]
pub struct QueryTemplateGenerator {
    company_name: String,
    identifier: Option<String>,
    inferred_domain: Option<String>,
}

impl QueryTemplateGenerator {
    pub fn new(company_name: &str, identifier: Option<&str>) -> Self {
        Self {
            company_name: company_name.to_string(),
            identifier: identifier.map(|s| s.to_string()),
            inferred_domain: infer_company_domain(company_name),
        }
    }

    /// Queries for a 1-indexed iteration. Pure: same inputs, same queries.
    pub fn queries_for_iteration(&self, iteration: u32) -> Vec<String> {
        let name = &self.company_name;
        let idx = (iteration.saturating_sub(1)) % TEMPLATE_SET_SIZE;

        match idx {
            // Core climate risk
            0 => vec![
                format!("\"{name}\" climate physical risk"),
                format!("\"{name}\" TCFD physical risk"),
                format!("\"{name}\" climate adaptation resilience"),
            ],
            // Specific hazards
            1 => vec![
                format!("\"{name}\" flood risk extreme weather"),
                format!("\"{name}\" drought water stress"),
                format!("\"{name}\" extreme heat climate"),
            ],
            // Site-specific, when a domain could be inferred
            2 => match &self.inferred_domain {
                Some(domain) => vec![
                    format!("site:{domain} climate risk"),
                    format!("site:{domain} sustainability report"),
                    format!("site:{domain} ESG climate"),
                ],
                None => vec![
                    format!("{name} climate risk report"),
                    format!("{name} sustainability disclosure"),
                    format!("{name} ESG climate disclosure"),
                ],
            },
            // Regulatory & frameworks
            3 => {
                let mut queries = vec![
                    format!("\"{name}\" CDP climate disclosure"),
                    format!("\"{name}\" EU Taxonomy physical risk"),
                ];
                queries.push(match &self.identifier {
                    Some(id) => format!("{id} climate risk assessment"),
                    None => format!("{name} climate scenario analysis"),
                });
                queries
            }
            // Business impact
            4 => vec![
                format!("\"{name}\" business continuity climate"),
                format!("\"{name}\" supply chain climate risk"),
                format!("\"{name}\" asset resilience climate"),
            ],
            // Reporting
            5 => vec![
                format!("\"{name}\" annual report climate risk"),
                format!("\"{name}\" 10-K climate physical risk"),
                format!("\"{name}\" integrated report climate"),
            ],
            // Long-tail
            _ => vec![
                format!("\"{name}\" climate change impact assessment"),
                format!("\"{name}\" environmental risk management"),
                format!("\"{name}\" climate vulnerability"),
            ],
        }
    }
}

/// Infer a likely company web domain from its name, or `None` when the
/// cleaned name is too short or too long for a sensible guess.
pub fn infer_company_domain(company_name: &str) -> Option<String> {
    let cleaned = clean_company_name(company_name);
    if cleaned.is_empty() {
        return None;
    }

    if cleaned.contains(' ') {
        let first_word = cleaned.split_whitespace().next().unwrap_or_default();
        if first_word.len() > 3 {
            return Some(format!("{first_word}.com"));
        }

        let concatenated: String = cleaned.split_whitespace().collect();
        if concatenated.len() <= 20 {
            return Some(format!("{concatenated}.com"));
        }
        return None;
    }

    if cleaned.len() > 2 {
        return Some(format!("{cleaned}.com"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_cycle_after_defined_set() {
        let generator = QueryTemplateGenerator::new("Acme Corp", None);
        let first = generator.queries_for_iteration(1);
        let cycled = generator.queries_for_iteration(1 + TEMPLATE_SET_SIZE);
        assert_eq!(first, cycled);

        let second = generator.queries_for_iteration(2);
        assert_ne!(first, second);
    }

    #[test]
    fn identifier_feeds_regulatory_iteration() {
        let generator = QueryTemplateGenerator::new("Acme Corp", Some("US0000000000"));
        let queries = generator.queries_for_iteration(4);
        assert!(queries.iter().any(|q| q.contains("US0000000000")));
    }

    #[test]
    fn domain_inference_strips_suffixes() {
        assert_eq!(infer_company_domain("Cisco Systems Inc"), Some("cisco.com".to_string()));
        assert_eq!(infer_company_domain("Tesla Inc"), Some("tesla.com".to_string()));
        assert_eq!(infer_company_domain("AB"), None);
    }

    #[test]
    fn every_iteration_yields_three_queries() {
        let generator = QueryTemplateGenerator::new("Acme Corp", None);
        for iteration in 1..=10 {
            assert_eq!(generator.queries_for_iteration(iteration).len(), 3);
        }
    }
}
