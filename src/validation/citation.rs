use std::fmt::Display;

use crate::annotations::SourceFormat;
use crate::config::CitationPolicy;
use crate::validation::{Checked, HpoaError};

/// Citation prefixes that are accepted for all annotations
const CITATION_PREFIXES: [&str; 8] = [
    "PMID", "OMIM", "DECIPHER", "ISBN", "ISBN-10", "ISBN-13", "http", "https",
];

/// Orphanet derived annotations cite the disease itself
const ORPHANET_PREFIX: &str = "ORPHA";

/// A validated citation CURIE, e.g. `PMID:15517394` or `OMIM:154700`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Citation(String);

impl Citation {
    /// The prefix of the CURIE, e.g. `PMID`
    pub fn prefix(&self) -> &str {
        self.0.split_once(':').map_or("", |(prefix, _)| prefix)
    }

    /// The full citation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Citation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn canonical_prefix(prefix: &str, source: SourceFormat) -> Option<&'static str> {
    let orpha = (source == SourceFormat::Orphanet).then_some(ORPHANET_PREFIX);
    CITATION_PREFIXES
        .iter()
        .copied()
        .chain(orpha)
        .find(|known| known.eq_ignore_ascii_case(prefix))
        .or_else(|| prefix.eq_ignore_ascii_case("PUBMED").then_some("PMID"))
}

/// Checks a single citation
fn parse_citation(
    item: &str,
    field: &str,
    source: SourceFormat,
    policy: CitationPolicy,
) -> Result<Checked<Citation>, HpoaError> {
    let malformed = |reason: &str| HpoaError::MalformedCitation {
        value: field.to_string(),
        reason: reason.to_string(),
    };
    if item.is_empty() {
        return Err(malformed("empty citation"));
    }
    if item.contains(' ') {
        return Err(malformed("contains space"));
    }
    if item.contains("::") {
        return Err(malformed("double colon"));
    }
    let Some((prefix, id)) = item.split_once(':') else {
        return Err(malformed("not a CURIE"));
    };
    if id.contains(':') {
        return Err(malformed("more than one colon"));
    }
    if prefix.is_empty() || id.is_empty() {
        return Err(malformed("not a CURIE"));
    }
    match canonical_prefix(prefix, source) {
        Some(known) if known == prefix => Ok(Checked::new(Citation(item.to_string()))),
        Some(known) => match policy {
            CitationPolicy::Strict => Err(malformed("prefix is not spelled correctly")),
            CitationPolicy::RepairPrefixCase => Ok(Checked::with_notice(
                Citation(format!("{known}:{id}")),
                HpoaError::RepairedCitationPrefix {
                    found: item.to_string(),
                    prefix: known.to_string(),
                },
            )),
        },
        None => Err(malformed("unknown prefix")),
    }
}

/// Checks the `;`-separated publication field
///
/// # Errors
///
/// - [`HpoaError::MissingCitation`]: The field is empty
/// - [`HpoaError::MalformedCitation`]: At least one citation is invalid
pub fn parse_publications(
    raw: &str,
    source: SourceFormat,
    policy: CitationPolicy,
) -> Result<Checked<Vec<Citation>>, HpoaError> {
    if raw.is_empty() {
        return Err(HpoaError::MissingCitation);
    }
    let mut notices = Vec::new();
    let mut citations = Vec::new();
    for item in raw.split(';') {
        let checked = parse_citation(item, raw, source, policy)?;
        notices.extend(checked.notices);
        citations.push(checked.value);
    }
    Ok(Checked {
        value: citations,
        notices,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn strict(raw: &str) -> Result<Checked<Vec<Citation>>, HpoaError> {
        parse_publications(raw, SourceFormat::HpoProject, CitationPolicy::Strict)
    }

    #[test]
    fn valid_citations() {
        for raw in [
            "OMIM:216300",
            "PMID:15517394",
            "DECIPHER:1",
            "ISBN-13:978-0195148299",
            "https://www.ncbi.nlm.nih.gov/books/NBK1116/",
        ] {
            let checked = strict(raw).expect("valid citation");
            assert!(checked.notices.is_empty());
            assert_eq!(checked.value[0].as_str(), raw);
        }
    }

    #[test]
    fn multiple_citations() {
        let checked = strict("PMID:1;OMIM:100050").expect("valid citations");
        assert_eq!(checked.value.len(), 2);
        assert_eq!(checked.value[1].prefix(), "OMIM");
    }

    #[test]
    fn missing_citation() {
        assert_eq!(strict("").unwrap_err(), HpoaError::MissingCitation);
    }

    #[test]
    fn malformed_citations() {
        for raw in [
            "PMID 123",
            "PMID::123",
            "PMID123",
            "PMID:",
            ":123",
            "PMID:1:2",
            "FOO:123",
            "PMID:1;",
        ] {
            assert!(
                matches!(strict(raw), Err(HpoaError::MalformedCitation { .. })),
                "{raw} must be malformed"
            );
        }
    }

    #[test]
    fn lowercase_prefix_strict() {
        assert_eq!(
            strict("pmid:123"),
            Err(HpoaError::MalformedCitation {
                value: "pmid:123".to_string(),
                reason: "prefix is not spelled correctly".to_string()
            })
        );
    }

    #[test]
    fn lowercase_prefix_repaired() {
        let checked = parse_publications(
            "pmid:123",
            SourceFormat::HpoProject,
            CitationPolicy::RepairPrefixCase,
        )
        .expect("repairable citation");
        assert_eq!(checked.value[0].as_str(), "PMID:123");
        assert_eq!(
            checked.notices,
            vec![HpoaError::RepairedCitationPrefix {
                found: "pmid:123".to_string(),
                prefix: "PMID".to_string()
            }]
        );

        let checked = parse_publications(
            "PUBMED:123",
            SourceFormat::HpoProject,
            CitationPolicy::RepairPrefixCase,
        )
        .expect("repairable citation");
        assert_eq!(checked.value[0].as_str(), "PMID:123");
    }

    #[test]
    fn orpha_only_for_orphanet() {
        assert!(strict("ORPHA:558").is_err());
        assert!(
            parse_publications("ORPHA:558", SourceFormat::Orphanet, CitationPolicy::Strict).is_ok()
        );
    }
}
