//! Field validators for annotation lines
//!
//! Every field of a small file line is checked by its own function of
//! the [`Validator`]. A check never aborts the processing of the line, instead
//! its problem is returned as an [`HpoaError`] and attached to the resulting
//! [`AnnotationEntry`].
//!
//! Some checks accept a value after repairing it, e.g. by replacing an
//! alternative term id with its primary id. Those checks return a [`Checked`]
//! value that carries the repaired value and the notices describing the repair.
use smallvec::SmallVec;
use tracing::debug;

use crate::annotations::{AnnotationEntry, DiseaseId, EvidenceCode, Sex, SourceFormat};
use crate::aspect::AspectIdentifier;
use crate::config::{ObsoleteIdPolicy, QcConfig};
use crate::ontology::OntologyGateway;
use crate::parser::small_file::split_line;
use crate::{hpo_ids, HpoResult, HpoTermId, SMALL_FILE_FIELDS};

mod biocuration;
mod citation;
mod error;
mod frequency;

pub use biocuration::{Biocuration, BiocurationStamp};
pub use citation::{parse_publications, Citation};
pub use error::{FrequencyErrorKind, HpoaError, Severity};
pub use frequency::FrequencyModifier;

/// A validated value together with the notices of any repairs
#[derive(Debug, Clone, PartialEq)]
pub struct Checked<T> {
    /// the validated, possibly repaired, value
    pub value: T,
    /// notices about repairs, never errors
    pub notices: Vec<HpoaError>,
}

impl<T> Checked<T> {
    /// A value that was valid without any repair
    pub fn new(value: T) -> Self {
        Self {
            value,
            notices: Vec::new(),
        }
    }

    /// A repaired value
    pub fn with_notice(value: T, notice: HpoaError) -> Self {
        Self {
            value,
            notices: vec![notice],
        }
    }
}

/// Collects the problems of one line while its fields are checked
#[derive(Default)]
struct Problems(SmallVec<[HpoaError; 2]>);

impl Problems {
    /// Returns the value of a plain check or `default` on error
    fn take<T>(&mut self, result: Result<T, HpoaError>, default: T) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                self.0.push(err);
                default
            }
        }
    }

    /// Returns the value of a repairing check and keeps its notices
    fn take_checked<T>(&mut self, result: Result<Checked<T>, HpoaError>, default: T) -> T {
        match result {
            Ok(checked) => {
                self.0.extend(checked.notices);
                checked.value
            }
            Err(err) => {
                self.0.push(err);
                default
            }
        }
    }

    fn has_error(&self) -> bool {
        self.0.iter().any(HpoaError::is_error)
    }
}

/// Checks annotation fields against the ontology and the [`QcConfig`]
///
/// # Examples
///
/// ```
/// use hpoa_qc::{Ontology, QcConfig, SourceFormat, Validator};
///
/// let ontology = Ontology::from_obo("tests/small.obo").unwrap();
/// let config = QcConfig::default();
/// let validator = Validator::new(&ontology, &config);
///
/// let line = "OMIM:100050\tAarskog syndrome\tHP:0001250\tSeizure\t\t\t2/4\t\t\t\t\tOMIM:100050\tIEA\tHPO:probinson[2013-01-09]";
/// let entry = validator.parse_line(line, Some(2), SourceFormat::HpoProject).unwrap();
/// assert!(!entry.has_error());
/// assert_eq!(entry.frequency().to_string(), "2/4");
/// ```
pub struct Validator<'a, O: ?Sized> {
    ontology: &'a O,
    config: &'a QcConfig,
}

impl<'a, O: OntologyGateway + ?Sized> Validator<'a, O> {
    /// Constructs a new [`Validator`]
    pub fn new(ontology: &'a O, config: &'a QcConfig) -> Self {
        Self { ontology, config }
    }

    /// The ontology used for all term checks
    pub fn ontology(&self) -> &'a O {
        self.ontology
    }

    /// The active configuration
    pub fn config(&self) -> &'a QcConfig {
        self.config
    }

    /// Checks a disease CURIE
    ///
    /// # Errors
    ///
    /// [`HpoaError::MalformedDiseaseId`]
    pub fn disease_id(&self, raw: &str) -> Result<Checked<DiseaseId>, HpoaError> {
        DiseaseId::parse(raw)
    }

    /// Checks that the disease name is not empty
    ///
    /// # Errors
    ///
    /// [`HpoaError::MissingDiseaseName`]
    pub fn disease_name(&self, raw: &str) -> Result<String, HpoaError> {
        if raw.trim().is_empty() {
            return Err(HpoaError::MissingDiseaseName);
        }
        Ok(raw.to_string())
    }

    /// Resolves a term id to its primary id
    ///
    /// With [`ObsoleteIdPolicy::Replace`] alternative ids are replaced by
    /// the primary id and a notice is returned.
    ///
    /// # Errors
    ///
    /// - [`HpoaError::MalformedTermId`]: `raw` is not an HPO term id
    /// - [`HpoaError::TermIdNotInOntology`]: The term does not exist
    /// - [`HpoaError::ObsoleteTermId`]: An alternative id is used in strict mode
    pub fn term_id(&self, raw: &str) -> Result<Checked<HpoTermId>, HpoaError> {
        let id = HpoTermId::try_from(raw).map_err(|_| HpoaError::MalformedTermId {
            value: raw.to_string(),
        })?;
        let primary = self
            .ontology
            .primary_id(id)
            .ok_or_else(|| HpoaError::TermIdNotInOntology {
                value: raw.to_string(),
            })?;
        if primary == id {
            return Ok(Checked::new(id));
        }
        match self.config.obsolete_ids() {
            ObsoleteIdPolicy::Strict => Err(HpoaError::ObsoleteTermId {
                obsolete: id.to_string(),
                primary: primary.to_string(),
                label: self.ontology.label(primary).unwrap_or_default().to_string(),
            }),
            ObsoleteIdPolicy::Replace => {
                debug!("Replacing obsolete term id {} with {}", id, primary);
                Ok(Checked::with_notice(
                    primary,
                    HpoaError::ReplacedObsoleteTermId {
                        obsolete: id.to_string(),
                        primary: primary.to_string(),
                    },
                ))
            }
        }
    }

    /// Compares a term label with the current label of the term
    ///
    /// With [`ObsoleteIdPolicy::Replace`] an outdated label is replaced
    /// and a notice is returned.
    ///
    /// # Errors
    ///
    /// [`HpoaError::InvalidTermLabel`] if the label is empty or outdated in strict mode
    pub fn term_label(&self, id: HpoTermId, raw: &str) -> Result<Checked<String>, HpoaError> {
        let current = self.ontology.label(id).unwrap_or_default();
        if raw == current {
            return Ok(Checked::new(raw.to_string()));
        }
        let invalid = || HpoaError::InvalidTermLabel {
            id: id.to_string(),
            found: raw.to_string(),
            expected: current.to_string(),
        };
        if raw.is_empty() || current.is_empty() {
            return Err(invalid());
        }
        match self.config.obsolete_ids() {
            ObsoleteIdPolicy::Strict => Err(invalid()),
            ObsoleteIdPolicy::Replace => Ok(Checked::with_notice(
                current.to_string(),
                HpoaError::UpdatedTermLabel {
                    id: id.to_string(),
                    found: raw.to_string(),
                    current: current.to_string(),
                },
            )),
        }
    }

    /// Checks the onset id and label
    ///
    /// Both fields empty is valid.
    ///
    /// # Errors
    ///
    /// - [`HpoaError::InvalidOnsetId`]: The id is not a term below `Onset`
    /// - [`HpoaError::InvalidOnsetLabel`]: The label is missing, superfluous or outdated
    /// - [`HpoaError::ObsoleteTermId`]: An alternative id is used in strict mode
    pub fn onset(
        &self,
        raw_id: &str,
        raw_label: &str,
    ) -> Result<Checked<(Option<HpoTermId>, String)>, HpoaError> {
        if raw_id.is_empty() {
            if raw_label.is_empty() {
                return Ok(Checked::new((None, String::new())));
            }
            return Err(HpoaError::InvalidOnsetLabel {
                id: String::new(),
                found: raw_label.to_string(),
                expected: String::new(),
            });
        }
        let invalid_id = || HpoaError::InvalidOnsetId {
            value: raw_id.to_string(),
        };
        let checked_id = match self.term_id(raw_id) {
            Ok(checked) => checked,
            Err(HpoaError::MalformedTermId { .. } | HpoaError::TermIdNotInOntology { .. }) => {
                return Err(invalid_id())
            }
            Err(err) => return Err(err),
        };
        let id = checked_id.value;
        if !self.ontology.exists_path(id, hpo_ids::ONSET) {
            return Err(invalid_id());
        }
        let label = self.term_label(id, raw_label).map_err(|err| match err {
            HpoaError::InvalidTermLabel {
                id,
                found,
                expected,
            } => HpoaError::InvalidOnsetLabel {
                id,
                found,
                expected,
            },
            other => other,
        })?;
        let mut notices = checked_id.notices;
        notices.extend(label.notices);
        Ok(Checked {
            value: (Some(id), label.value),
            notices,
        })
    }

    /// Checks the frequency field
    ///
    /// # Errors
    ///
    /// [`HpoaError::InvalidFrequency`]
    pub fn frequency(&self, raw: &str) -> Result<FrequencyModifier, HpoaError> {
        FrequencyModifier::parse(raw, self.ontology)
    }

    /// Checks the sex field
    ///
    /// # Errors
    ///
    /// [`HpoaError::MalformedSex`] if the value is not empty, `MALE` or `FEMALE`
    pub fn sex(&self, raw: &str) -> Result<Option<Sex>, HpoaError> {
        match raw {
            "" => Ok(None),
            "MALE" => Ok(Some(Sex::Male)),
            "FEMALE" => Ok(Some(Sex::Female)),
            _ => Err(HpoaError::MalformedSex {
                value: raw.to_string(),
            }),
        }
    }

    /// Checks the negation field
    ///
    /// # Errors
    ///
    /// [`HpoaError::MalformedNegation`] if the value is not empty or `NOT`
    pub fn negation(&self, raw: &str) -> Result<bool, HpoaError> {
        match raw {
            "" => Ok(false),
            "NOT" => Ok(true),
            _ => Err(HpoaError::MalformedNegation {
                value: raw.to_string(),
            }),
        }
    }

    /// Checks the `;`-separated modifier terms
    ///
    /// # Errors
    ///
    /// - [`HpoaError::InvalidModifier`]: A term is not below `Clinical modifier`
    /// - Any error of [`Validator::term_id`]
    pub fn modifiers(&self, raw: &str) -> Result<Checked<Vec<HpoTermId>>, HpoaError> {
        let mut res = Checked::new(Vec::new());
        if raw.is_empty() {
            return Ok(res);
        }
        for item in raw.split(';') {
            let checked = self.term_id(item)?;
            let id = checked.value;
            if id != hpo_ids::CLINICAL_MODIFIER
                && !self.ontology.exists_path(id, hpo_ids::CLINICAL_MODIFIER)
            {
                return Err(HpoaError::InvalidModifier {
                    value: item.to_string(),
                });
            }
            res.notices.extend(checked.notices);
            res.value.push(id);
        }
        Ok(res)
    }

    /// Checks the publication field
    ///
    /// # Errors
    ///
    /// [`HpoaError::MissingCitation`] or [`HpoaError::MalformedCitation`]
    pub fn publications(
        &self,
        raw: &str,
        source: SourceFormat,
    ) -> Result<Checked<Vec<Citation>>, HpoaError> {
        parse_publications(raw, source, self.config.citations())
    }

    /// Checks the evidence code
    ///
    /// # Errors
    ///
    /// [`HpoaError::InvalidEvidenceCode`] if the value is not `IEA`, `PCS` or `TAS`
    pub fn evidence(&self, raw: &str) -> Result<EvidenceCode, HpoaError> {
        match raw {
            "IEA" => Ok(EvidenceCode::IEA),
            "PCS" => Ok(EvidenceCode::PCS),
            "TAS" => Ok(EvidenceCode::TAS),
            _ => Err(HpoaError::InvalidEvidenceCode {
                value: raw.to_string(),
            }),
        }
    }

    /// Checks the biocuration field
    ///
    /// # Errors
    ///
    /// [`HpoaError::MalformedBiocuration`]
    pub fn biocuration(&self, raw: &str) -> Result<Biocuration, HpoaError> {
        Biocuration::parse(raw)
    }

    /// Validates the 14 fields of a small file line
    ///
    /// The aspect of the phenotype is only determined if all fields are valid.
    pub fn parse_fields(
        &self,
        fields: &[&str; SMALL_FILE_FIELDS],
        line_number: Option<usize>,
        source: SourceFormat,
    ) -> AnnotationEntry {
        let [disease_id, disease_name, phenotype_id, phenotype_label, onset_id, onset_label, frequency, sex, negation, modifiers, description, publications, evidence, biocuration] =
            *fields;
        let mut problems = Problems::default();

        let disease_id = problems.take_checked(
            self.disease_id(disease_id),
            DiseaseId::invalid(disease_id),
        );
        let disease_name =
            problems.take(self.disease_name(disease_name), disease_name.to_string());
        let (phenotype_id, phenotype_label) = match self.term_id(phenotype_id) {
            Ok(checked) => {
                problems.0.extend(checked.notices);
                let label = problems.take_checked(
                    self.term_label(checked.value, phenotype_label),
                    phenotype_label.to_string(),
                );
                (checked.value, label)
            }
            Err(err) => {
                problems.0.push(err);
                let id = HpoTermId::try_from(phenotype_id).unwrap_or_default();
                (id, phenotype_label.to_string())
            }
        };
        let (onset_id, onset_label) = problems.take_checked(
            self.onset(onset_id, onset_label),
            (None, onset_label.to_string()),
        );
        let frequency = problems.take(self.frequency(frequency), FrequencyModifier::Empty);
        let sex = problems.take(self.sex(sex), None);
        let negated = problems.take(self.negation(negation), false);
        let modifiers = problems.take_checked(self.modifiers(modifiers), Vec::new());
        let publications =
            problems.take_checked(self.publications(publications, source), Vec::new());
        let evidence = problems.take(self.evidence(evidence), EvidenceCode::default());
        let biocuration = problems.take(self.biocuration(biocuration), Biocuration::default());

        let aspect = if problems.has_error() {
            None
        } else {
            problems.take(
                AspectIdentifier::new(self.ontology)
                    .aspect(phenotype_id)
                    .map(Some),
                None,
            )
        };

        AnnotationEntry {
            source,
            line_number,
            disease_id,
            disease_name,
            phenotype_id,
            phenotype_label,
            onset_id,
            onset_label,
            frequency,
            sex,
            negated,
            modifiers,
            description: description.to_string(),
            publications,
            evidence,
            biocuration,
            aspect,
            errors: problems.0,
        }
    }

    /// Splits and validates a small file line
    ///
    /// # Errors
    ///
    /// [`crate::HpoError::FieldCount`] if the line does not have 14 fields
    pub fn parse_line(
        &self,
        line: &str,
        line_number: Option<usize>,
        source: SourceFormat,
    ) -> HpoResult<AnnotationEntry> {
        let fields = split_line(line, line_number.unwrap_or_default())?;
        Ok(self.parse_fields(&fields, line_number, source))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Aspect, CitationPolicy, Ontology};

    const LINE: &str = "OMIM:100050\tAarskog syndrome\tHP:0001250\tSeizure\tHP:0003581\tAdult onset\t2/4\tMALE\t\tHP:0012828\tsome text\tPMID:123;OMIM:100050\tPCS\tHPO:probinson[2013-01-09]";

    fn ontology() -> Ontology {
        Ontology::from_obo("tests/small.obo").expect("fixture can be parsed")
    }

    fn line_with(field: usize, value: &str) -> String {
        let mut fields: Vec<&str> = LINE.split('\t').collect();
        fields[field] = value;
        fields.join("\t")
    }

    fn errors(config: &QcConfig, line: &str) -> Vec<HpoaError> {
        let ont = ontology();
        let validator = Validator::new(&ont, config);
        validator
            .parse_line(line, Some(2), SourceFormat::HpoProject)
            .expect("line has 14 fields")
            .errors()
            .to_vec()
    }

    #[test]
    fn valid_line() {
        let ont = ontology();
        let config = QcConfig::default();
        let validator = Validator::new(&ont, &config);
        let entry = validator
            .parse_line(LINE, Some(2), SourceFormat::HpoProject)
            .expect("line has 14 fields");
        assert!(entry.errors().is_empty());
        assert_eq!(entry.disease_id().as_str(), "OMIM:100050");
        assert_eq!(entry.onset_id(), Some(3581u32.into()));
        assert_eq!(entry.sex(), Some(Sex::Male));
        assert!(!entry.negated());
        assert_eq!(entry.modifiers(), &[HpoTermId::from(12828u32)]);
        assert_eq!(entry.publications().len(), 2);
        assert_eq!(entry.evidence(), EvidenceCode::PCS);
        assert_eq!(entry.aspect(), Some(Aspect::PhenotypicAbnormality));
        assert_eq!(entry.to_small_file_line(), LINE);
    }

    #[test]
    fn wrong_field_count() {
        let ont = ontology();
        let config = QcConfig::default();
        let validator = Validator::new(&ont, &config);
        assert!(validator
            .parse_line("OMIM:100050\tfoo", Some(3), SourceFormat::HpoProject)
            .is_err());
    }

    #[test]
    fn single_field_errors() {
        let config = QcConfig::default();
        let cases = [
            (0, "OMIM100050", "MalformedDiseaseId"),
            (1, "", "MissingDiseaseName"),
            (2, "HP:1250", "MalformedTermId"),
            (2, "HP:9999999", "TermIdNotInOntology"),
            (3, "Seizures", "InvalidTermLabel"),
            (4, "HP:0001250", "InvalidOnsetId"),
            (5, "Childhood onset", "InvalidOnsetLabel"),
            (6, "5/4", "InvalidFrequency"),
            (7, "male", "MalformedSex"),
            (8, "not", "MalformedNegation"),
            (9, "HP:0001250", "InvalidModifier"),
            (11, "", "MissingCitation"),
            (11, "PMID:1 ", "MalformedCitation"),
            (12, "ICE", "InvalidEvidenceCode"),
            (13, "HPOprobinson[2013-01-09]", "MalformedBiocuration"),
        ];
        for (field, value, kind) in cases {
            let errs = errors(&config, &line_with(field, value));
            assert_eq!(errs.len(), 1, "{field} {value}: {errs:?}");
            assert_eq!(errs[0].kind(), kind);
        }
    }

    #[test]
    fn onset_label_without_id() {
        let line = line_with(4, "");
        let errs = errors(&QcConfig::default(), &line);
        assert_eq!(
            errs,
            vec![HpoaError::InvalidOnsetLabel {
                id: String::new(),
                found: "Adult onset".to_string(),
                expected: String::new()
            }]
        );
    }

    #[test]
    fn empty_onset_is_valid() {
        let mut fields: Vec<&str> = LINE.split('\t').collect();
        fields[4] = "";
        fields[5] = "";
        assert!(errors(&QcConfig::default(), &fields.join("\t")).is_empty());
    }

    #[test]
    fn unknown_database_is_only_a_notice() {
        let ont = ontology();
        let config = QcConfig::default();
        let validator = Validator::new(&ont, &config);
        let entry = validator
            .parse_line(&line_with(0, "MONDO:0007037"), Some(2), SourceFormat::HpoProject)
            .expect("line has 14 fields");
        assert_eq!(entry.errors().len(), 1);
        assert!(!entry.has_error());
        assert!(entry.aspect().is_some());
    }

    #[test]
    fn alternative_id_strict() {
        let mut fields: Vec<&str> = LINE.split('\t').collect();
        fields[2] = "HP:0001568";
        fields[3] = "Single median maxillary incisor";
        let errs = errors(&QcConfig::default(), &fields.join("\t"));
        assert_eq!(
            errs,
            vec![HpoaError::ObsoleteTermId {
                obsolete: "HP:0001568".to_string(),
                primary: "HP:0006315".to_string(),
                label: "Single median maxillary incisor".to_string()
            }]
        );
    }

    #[test]
    fn alternative_id_replaced() {
        let ont = ontology();
        let config = QcConfig::default().with_obsolete_ids(ObsoleteIdPolicy::Replace);
        let validator = Validator::new(&ont, &config);
        let mut fields: Vec<&str> = LINE.split('\t').collect();
        fields[2] = "HP:0001568";
        fields[3] = "Single median maxillary incisor";
        let entry = validator
            .parse_line(&fields.join("\t"), Some(2), SourceFormat::HpoProject)
            .expect("line has 14 fields");
        assert!(!entry.has_error());
        assert_eq!(entry.phenotype_id(), "HP:0006315");
        assert_eq!(
            entry.errors(),
            &[HpoaError::ReplacedObsoleteTermId {
                obsolete: "HP:0001568".to_string(),
                primary: "HP:0006315".to_string()
            }]
        );
    }

    #[test]
    fn outdated_label_replaced() {
        let ont = ontology();
        let config = QcConfig::default().with_obsolete_ids(ObsoleteIdPolicy::Replace);
        let validator = Validator::new(&ont, &config);
        let entry = validator
            .parse_line(&line_with(3, "Seizures"), Some(2), SourceFormat::HpoProject)
            .expect("line has 14 fields");
        assert!(!entry.has_error());
        assert_eq!(entry.phenotype_label(), "Seizure");
        assert_eq!(entry.errors()[0].kind(), "UpdatedTermLabel");
    }

    #[test]
    fn lowercase_citation_policies() {
        let line = line_with(11, "pmid:123");
        let errs = errors(&QcConfig::default(), &line);
        assert_eq!(errs[0].kind(), "MalformedCitation");

        let config = QcConfig::default().with_citations(CitationPolicy::RepairPrefixCase);
        let errs = errors(&config, &line);
        assert_eq!(errs.len(), 1);
        assert!(!errs[0].is_error());
    }

    #[test]
    fn unclassifiable_phenotype() {
        let mut fields: Vec<&str> = LINE.split('\t').collect();
        fields[2] = "HP:0000001";
        fields[3] = "All";
        let errs = errors(&QcConfig::default(), &fields.join("\t"));
        assert_eq!(
            errs,
            vec![HpoaError::UnresolvableAspect {
                term: "HP:0000001".to_string()
            }]
        );
    }

    #[test]
    fn several_errors_in_one_line() {
        let mut fields: Vec<&str> = LINE.split('\t').collect();
        fields[7] = "M";
        fields[12] = "XYZ";
        let errs = errors(&QcConfig::default(), &fields.join("\t"));
        assert_eq!(errs.len(), 2);
    }
}
