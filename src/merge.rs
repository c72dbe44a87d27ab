//! Combines redundant annotations of the same disease and phenotype
//!
//! Curators often add the same phenotype several times, e.g. once per
//! publication. The [`AnnotationMerger`] collapses those entries into one,
//! as long as they do not differ in negation, sex or onset.
use std::collections::HashMap;

use tracing::debug;

use crate::annotations::{AnnotationEntry, AnnotationModel, EvidenceCode};
use crate::config::QcConfig;
use crate::ontology::OntologyGateway;
use crate::validation::{
    Biocuration, Citation, FrequencyErrorKind, FrequencyModifier, HpoaError, Validator,
};
use crate::HpoTermId;

/// Percentages and frequency terms are counted as observations in this many patients
const DEFAULT_NUMBER_OF_OBSERVATIONS: u64 = 10;

/// Rounds half up, like the frequencies in existing HPO releases
fn round_half_up(value: f64) -> u64 {
    (value + 0.5).floor() as u64
}

/// Sums heterogeneous frequencies into a single `n/m` fraction
///
/// - empty frequencies do not contribute
/// - `n/m` adds `n` and `m`
/// - a percentage `p` adds `round(p / 10)` out of 10
/// - a frequency term adds `round(mean * 10)` out of 10
///
/// If nothing contributes, the result is empty.
///
/// # Errors
///
/// [`HpoaError::InvalidFrequency`] if a frequency term has no mean frequency
/// in the ontology or the sums overflow
///
/// # Examples
///
/// ```
/// use hpoa_qc::{FrequencyModifier, Ontology};
/// use hpoa_qc::merge::merge_frequencies;
///
/// let ontology = Ontology::default();
/// let freqs = [
///     FrequencyModifier::Ratio { n: 2, m: 4 },
///     FrequencyModifier::Ratio { n: 3, m: 5 },
/// ];
/// let merged = merge_frequencies(&freqs, &ontology).unwrap();
/// assert_eq!(merged.to_string(), "5/9");
/// ```
pub fn merge_frequencies<'f, I, O>(frequencies: I, ontology: &O) -> Result<FrequencyModifier, HpoaError>
where
    I: IntoIterator<Item = &'f FrequencyModifier>,
    O: OntologyGateway + ?Sized,
{
    let mut numerator: u64 = 0;
    let mut denominator: u64 = 0;
    for freq in frequencies {
        match freq {
            FrequencyModifier::Empty => {}
            FrequencyModifier::Ratio { n, m } => {
                numerator += u64::from(*n);
                denominator += u64::from(*m);
            }
            FrequencyModifier::Percentage { value, .. } => {
                numerator += round_half_up(value / 10.0);
                denominator += DEFAULT_NUMBER_OF_OBSERVATIONS;
            }
            FrequencyModifier::Term(id) => {
                let mean = ontology
                    .mean_frequency(*id)
                    .ok_or_else(|| HpoaError::InvalidFrequency {
                        value: id.to_string(),
                        kind: FrequencyErrorKind::InvalidSubontology,
                    })?;
                numerator += round_half_up(mean * 10.0);
                denominator += DEFAULT_NUMBER_OF_OBSERVATIONS;
            }
        }
    }
    if numerator == 0 && denominator == 0 {
        return Ok(FrequencyModifier::Empty);
    }
    let overflow = || HpoaError::InvalidFrequency {
        value: format!("{numerator}/{denominator}"),
        kind: FrequencyErrorKind::Malformed,
    };
    Ok(FrequencyModifier::Ratio {
        n: u32::try_from(numerator).map_err(|_| overflow())?,
        m: u32::try_from(denominator).map_err(|_| overflow())?,
    })
}

/// Merges entries of an [`AnnotationModel`] that share the same phenotype
///
/// # Examples
///
/// ```
/// use hpoa_qc::{AnnotationMerger, Ontology, QcConfig, SourceFormat, Validator};
///
/// let ontology = Ontology::from_obo("tests/small.obo").unwrap();
/// let config = QcConfig::default();
/// let validator = Validator::new(&ontology, &config);
///
/// let lines = [
///     "OMIM:100050\tAarskog syndrome\tHP:0001250\tSeizure\t\t\t2/4\t\t\t\t\tPMID:1\tPCS\tHPO:probinson[2013-01-09]",
///     "OMIM:100050\tAarskog syndrome\tHP:0001250\tSeizure\t\t\t3/5\t\t\t\t\tPMID:2\tTAS\tHPO:probinson[2013-01-09]",
/// ];
/// let entries = lines
///     .iter()
///     .map(|line| validator.parse_line(line, None, SourceFormat::HpoProject).unwrap())
///     .collect::<Vec<_>>();
///
/// let merger = AnnotationMerger::new(&ontology, &config);
/// let merged = merger
///     .merge_entries(&entries.iter().collect::<Vec<_>>())
///     .unwrap();
/// assert_eq!(merged.frequency().to_string(), "5/9");
/// assert_eq!(merged.publications().len(), 2);
/// ```
pub struct AnnotationMerger<'a, O: ?Sized> {
    validator: Validator<'a, O>,
}

impl<'a, O: OntologyGateway + ?Sized> AnnotationMerger<'a, O> {
    /// Constructs a new [`AnnotationMerger`]
    pub fn new(ontology: &'a O, config: &'a QcConfig) -> Self {
        Self {
            validator: Validator::new(ontology, config),
        }
    }

    /// Returns `true` if all entries agree on negation, sex and onset
    pub fn is_mergeable(&self, entries: &[&AnnotationEntry]) -> bool {
        let Some((first, others)) = entries.split_first() else {
            return false;
        };
        others.iter().all(|entry| {
            entry.negated() == first.negated()
                && entry.sex() == first.sex()
                && entry.onset_id() == first.onset_id()
        })
    }

    /// Merges the entries into a single entry
    ///
    /// The caller must make sure that the entries are mergeable and describe
    /// the same phenotype. A single entry is returned unchanged.
    /// The merged line is validated again and problems are attached to the
    /// merged entry. Returns `None` if `entries` is empty.
    pub fn merge_entries(&self, entries: &[&AnnotationEntry]) -> Option<AnnotationEntry> {
        let first = *entries.first()?;
        if entries.len() == 1 {
            return Some(first.clone());
        }

        let mut frequency_error = None;
        let frequency = match merge_frequencies(entries.iter().map(|e| e.frequency()), self.validator.ontology()) {
            Ok(freq) => freq.to_string(),
            Err(err) => {
                frequency_error = Some(err);
                String::new()
            }
        };

        let modifiers = join(entries.iter().flat_map(|e| e.modifiers()));
        let descriptions = entries
            .iter()
            .map(|e| e.description())
            .filter(|desc| !desc.is_empty())
            .collect::<Vec<&str>>()
            .join(";");
        let mut publications: Vec<&Citation> = Vec::new();
        for citation in entries.iter().flat_map(|e| e.publications()) {
            if !publications.contains(&citation) {
                publications.push(citation);
            }
        }
        let evidence = entries
            .iter()
            .map(|e| e.evidence())
            .max()
            .unwrap_or(EvidenceCode::IEA);
        let mut biocuration = Biocuration::default();
        for stamp in entries.iter().flat_map(|e| e.biocuration().iter()) {
            biocuration.insert(stamp.clone());
        }

        let fields = [
            first.disease_id().to_string(),
            first.disease_name().to_string(),
            first.phenotype_id().to_string(),
            first.phenotype_label().to_string(),
            first.onset_id().map(|id| id.to_string()).unwrap_or_default(),
            first.onset_label().to_string(),
            frequency,
            first.sex().map(|sex| sex.to_string()).unwrap_or_default(),
            first.qualifier().to_string(),
            modifiers,
            descriptions,
            join(publications),
            evidence.to_string(),
            biocuration.to_string(),
        ];
        let fields = fields.each_ref().map(String::as_str);
        let mut merged = self
            .validator
            .parse_fields(&fields, first.line_number(), first.source());
        if let Some(err) = frequency_error {
            merged.add_error(err);
        }
        Some(merged)
    }

    /// Returns a new model with all mergeable entries merged
    ///
    /// Entries are grouped by phenotype in order of their first appearance.
    /// Entries with errors are never merged and are kept as they are.
    /// Groups whose entries differ in negation, sex or onset are kept unmerged.
    pub fn merge_model(&self, model: &AnnotationModel) -> AnnotationModel {
        let mut order: Vec<HpoTermId> = Vec::new();
        let mut groups: HashMap<HpoTermId, Vec<&AnnotationEntry>> = HashMap::new();
        for entry in model.entries() {
            groups
                .entry(entry.phenotype_id())
                .or_insert_with(|| {
                    order.push(entry.phenotype_id());
                    Vec::new()
                })
                .push(entry);
        }

        let mut entries = Vec::with_capacity(model.len());
        for id in order {
            let Some(group) = groups.remove(&id) else {
                continue;
            };
            let (clean, faulty): (Vec<&AnnotationEntry>, Vec<&AnnotationEntry>) =
                group.into_iter().partition(|entry| !entry.has_error());
            if clean.len() > 1 && self.is_mergeable(&clean) {
                debug!(
                    "Merging {} entries of {} in {}",
                    clean.len(),
                    id,
                    model.basename()
                );
                entries.extend(self.merge_entries(&clean));
            } else {
                entries.extend(clean.into_iter().cloned());
            }
            entries.extend(faulty.into_iter().cloned());
        }
        model.with_entries(entries)
    }
}

fn join<T: ToString, I: IntoIterator<Item = T>>(items: I) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<String>>()
        .join(";")
}
