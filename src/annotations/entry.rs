use smallvec::SmallVec;

use crate::annotations::{DiseaseId, EvidenceCode, Sex, SourceFormat};
use crate::aspect::Aspect;
use crate::validation::{Biocuration, Citation, FrequencyModifier, HpoaError};
use crate::HpoTermId;

/// A single phenotype annotation of a disease
///
/// An entry is created by the [`crate::Validator`] from one small file
/// line or one Orphanet record. Fields that failed validation hold a
/// placeholder and the problem is recorded in [`AnnotationEntry::errors`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationEntry {
    pub(crate) source: SourceFormat,
    pub(crate) line_number: Option<usize>,
    pub(crate) disease_id: DiseaseId,
    pub(crate) disease_name: String,
    pub(crate) phenotype_id: HpoTermId,
    pub(crate) phenotype_label: String,
    pub(crate) onset_id: Option<HpoTermId>,
    pub(crate) onset_label: String,
    pub(crate) frequency: FrequencyModifier,
    pub(crate) sex: Option<Sex>,
    pub(crate) negated: bool,
    pub(crate) modifiers: Vec<HpoTermId>,
    pub(crate) description: String,
    pub(crate) publications: Vec<Citation>,
    pub(crate) evidence: EvidenceCode,
    pub(crate) biocuration: Biocuration,
    pub(crate) aspect: Option<Aspect>,
    pub(crate) errors: SmallVec<[HpoaError; 2]>,
}

impl AnnotationEntry {
    /// Where the entry comes from
    pub fn source(&self) -> SourceFormat {
        self.source
    }

    /// The 1-based line in the small file, `None` for merged and Orphanet entries
    pub fn line_number(&self) -> Option<usize> {
        self.line_number
    }

    /// The disease CURIE
    pub fn disease_id(&self) -> &DiseaseId {
        &self.disease_id
    }

    /// The disease name
    pub fn disease_name(&self) -> &str {
        &self.disease_name
    }

    /// The phenotype term
    pub fn phenotype_id(&self) -> HpoTermId {
        self.phenotype_id
    }

    /// The label of the phenotype term
    pub fn phenotype_label(&self) -> &str {
        &self.phenotype_label
    }

    /// The term below `Onset`, if specified
    pub fn onset_id(&self) -> Option<HpoTermId> {
        self.onset_id
    }

    /// The label of the onset term, empty if no onset is specified
    pub fn onset_label(&self) -> &str {
        &self.onset_label
    }

    /// The frequency of the phenotype
    pub fn frequency(&self) -> &FrequencyModifier {
        &self.frequency
    }

    /// The sex the annotation is restricted to
    pub fn sex(&self) -> Option<Sex> {
        self.sex
    }

    /// `true` if the disease does **not** show the phenotype
    pub fn negated(&self) -> bool {
        self.negated
    }

    /// The terms below `Clinical modifier`
    pub fn modifiers(&self) -> &[HpoTermId] {
        &self.modifiers
    }

    /// Free text description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The supporting publications
    pub fn publications(&self) -> &[Citation] {
        &self.publications
    }

    /// The evidence code
    pub fn evidence(&self) -> EvidenceCode {
        self.evidence
    }

    /// The curator stamps
    pub fn biocuration(&self) -> &Biocuration {
        &self.biocuration
    }

    /// The aspect of the phenotype term, `None` if it could not be determined
    pub fn aspect(&self) -> Option<Aspect> {
        self.aspect
    }

    /// All problems of the entry, including notices
    pub fn errors(&self) -> &[HpoaError] {
        &self.errors
    }

    /// Returns `true` if at least one problem is not a notice
    ///
    /// Entries with errors are never merged or published.
    pub fn has_error(&self) -> bool {
        self.errors.iter().any(HpoaError::is_error)
    }

    pub(crate) fn add_error(&mut self, error: HpoaError) {
        self.errors.push(error);
    }

    /// The negation qualifier as written in the files
    pub fn qualifier(&self) -> &'static str {
        if self.negated {
            "NOT"
        } else {
            ""
        }
    }

    /// Serializes the entry in the 14-column small file format
    pub fn to_small_file_line(&self) -> String {
        [
            self.disease_id.to_string(),
            self.disease_name.clone(),
            self.phenotype_id.to_string(),
            self.phenotype_label.clone(),
            self.onset_id.map(|id| id.to_string()).unwrap_or_default(),
            self.onset_label.clone(),
            self.frequency.to_string(),
            self.sex.map(|sex| sex.to_string()).unwrap_or_default(),
            self.qualifier().to_string(),
            join(&self.modifiers),
            self.description.clone(),
            join(&self.publications),
            self.evidence.to_string(),
            self.biocuration.to_string(),
        ]
        .join("\t")
    }

    /// Serializes the entry in the 12-column big file format
    ///
    /// Returns `None` if the aspect of the entry is unknown
    pub fn to_big_file_line(&self) -> Option<String> {
        let aspect = self.aspect?;
        Some(
            [
                self.disease_id.to_string(),
                self.disease_name.clone(),
                self.qualifier().to_string(),
                self.phenotype_id.to_string(),
                join(&self.publications),
                self.evidence.to_string(),
                self.onset_id.map(|id| id.to_string()).unwrap_or_default(),
                self.frequency.to_string(),
                self.sex.map(|sex| sex.to_string()).unwrap_or_default(),
                join(&self.modifiers),
                aspect.to_string(),
                self.biocuration.to_string(),
            ]
            .join("\t"),
        )
    }
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join(";")
}
