//! Converts Orphanet phenotype and inheritance associations into annotations
//!
//! Orphanet provides its data as XML. The records here are the already
//! tokenized associations, one per disease and HPO term.
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::annotations::{AnnotationEntry, AnnotationModel, SourceFormat};
use crate::config::QcConfig;
use crate::ontology::{FrequencyTerm, OntologyGateway};
use crate::validation::Validator;

/// The curator stamp of Orphanet annotations
const ORPHA_BIOCURATOR: &str = "ORPHA:orphadata";
const ORPHA_EVIDENCE: &str = "TAS";

/// A phenotype association of an Orphanet disease
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphaRecord {
    /// e.g. `ORPHA:558`
    pub disease_id: String,
    /// e.g. `Marfan syndrome`
    pub disease_name: String,
    /// the HPO term id
    pub hpo_id: String,
    /// the HPO term label used by Orphanet
    pub hpo_label: String,
    /// one of the HPO frequency terms, e.g. `HP:0040283`
    pub frequency: String,
}

/// A mode of inheritance of an Orphanet disease
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphaInheritance {
    /// e.g. `ORPHA:558`
    pub disease_id: String,
    /// e.g. `Marfan syndrome`
    pub disease_name: String,
    /// the HPO term id below `Mode of inheritance`
    pub hpo_id: String,
    /// the HPO term label
    pub hpo_label: String,
}

/// Creates [`AnnotationModel`]s from Orphanet records
pub struct OrphaConverter<'a, O: ?Sized> {
    validator: Validator<'a, O>,
    biocuration: String,
}

impl<'a, O: OntologyGateway + ?Sized> OrphaConverter<'a, O> {
    /// Constructs a new converter
    ///
    /// `date` is the date of the Orphanet export and is used in the biocuration stamp.
    pub fn new(ontology: &'a O, config: &'a QcConfig, date: NaiveDate) -> Self {
        Self {
            validator: Validator::new(ontology, config),
            biocuration: format!("{ORPHA_BIOCURATOR}[{}]", date.format("%Y-%m-%d")),
        }
    }

    fn build(
        &self,
        disease_id: &str,
        disease_name: &str,
        hpo: (&str, &str),
        frequency: &str,
        negation: &str,
    ) -> AnnotationEntry {
        let fields = [
            disease_id,
            disease_name,
            hpo.0,
            hpo.1,
            "",
            "",
            frequency,
            "",
            negation,
            "",
            "",
            disease_id,
            ORPHA_EVIDENCE,
            self.biocuration.as_str(),
        ];
        self.validator
            .parse_fields(&fields, None, SourceFormat::Orphanet)
    }

    /// Converts a phenotype association
    ///
    /// The frequency `Excluded` is expressed as a negated annotation without frequency.
    pub fn entry(&self, record: &OrphaRecord) -> AnnotationEntry {
        let excluded = FrequencyTerm::Excluded.id().to_string();
        let (frequency, negation) = if record.frequency == excluded {
            ("", "NOT")
        } else {
            (record.frequency.as_str(), "")
        };
        self.build(
            &record.disease_id,
            &record.disease_name,
            (record.hpo_id.as_str(), record.hpo_label.as_str()),
            frequency,
            negation,
        )
    }

    /// Converts a mode of inheritance, which never has a frequency
    pub fn inheritance_entry(&self, record: &OrphaInheritance) -> AnnotationEntry {
        self.build(
            &record.disease_id,
            &record.disease_name,
            (record.hpo_id.as_str(), record.hpo_label.as_str()),
            "",
            "",
        )
    }

    /// Groups all records into one model per disease
    ///
    /// Models are returned in order of the first appearance of each disease,
    /// phenotype entries come before the inheritance entries.
    pub fn models(
        &self,
        records: &[OrphaRecord],
        inheritance: &[OrphaInheritance],
    ) -> Vec<AnnotationModel> {
        let mut order: Vec<&str> = Vec::new();
        let mut grouped: HashMap<&str, Vec<AnnotationEntry>> = HashMap::new();
        let phenotypes = records
            .iter()
            .map(|record| (record.disease_id.as_str(), self.entry(record)));
        let modes = inheritance
            .iter()
            .map(|record| (record.disease_id.as_str(), self.inheritance_entry(record)));
        for (disease_id, entry) in phenotypes.chain(modes) {
            grouped
                .entry(disease_id)
                .or_insert_with(|| {
                    order.push(disease_id);
                    Vec::new()
                })
                .push(entry);
        }
        order
            .into_iter()
            .filter_map(|disease_id| {
                let entries = grouped.remove(disease_id)?;
                Some(AnnotationModel::new(
                    disease_id.to_string(),
                    SourceFormat::Orphanet,
                    entries,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Aspect, HpoaError, ObsoleteIdPolicy, Ontology};

    fn ontology() -> Ontology {
        Ontology::from_obo("tests/small.obo").expect("fixture can be parsed")
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 16).expect("valid date")
    }

    fn record(hpo_id: &str, hpo_label: &str, frequency: &str) -> OrphaRecord {
        OrphaRecord {
            disease_id: "ORPHA:558".to_string(),
            disease_name: "Marfan syndrome".to_string(),
            hpo_id: hpo_id.to_string(),
            hpo_label: hpo_label.to_string(),
            frequency: frequency.to_string(),
        }
    }

    #[test]
    fn phenotype_entry() {
        let ont = ontology();
        let config = QcConfig::default();
        let converter = OrphaConverter::new(&ont, &config, date());
        let entry = converter.entry(&record("HP:0004322", "Short stature", "HP:0040283"));
        assert!(entry.errors().is_empty(), "{:?}", entry.errors());
        assert_eq!(entry.frequency().to_string(), "HP:0040283");
        assert_eq!(entry.publications()[0].as_str(), "ORPHA:558");
        assert_eq!(entry.biocuration().to_string(), "ORPHA:orphadata[2024-01-16]");
        assert_eq!(entry.evidence().to_string(), "TAS");
        assert_eq!(entry.aspect(), Some(Aspect::PhenotypicAbnormality));
    }

    #[test]
    fn excluded_becomes_negation() {
        let ont = ontology();
        let config = QcConfig::default();
        let converter = OrphaConverter::new(&ont, &config, date());
        let entry = converter.entry(&record("HP:0004322", "Short stature", "HP:0040285"));
        assert!(entry.negated());
        assert!(entry.frequency().is_empty());
        assert!(!entry.has_error());
    }

    #[test]
    fn obsolete_ids_follow_policy() {
        let ont = ontology();
        let rec = record("HP:0001568", "Single median maxillary incisor", "HP:0040283");

        let config = QcConfig::default();
        let entry = OrphaConverter::new(&ont, &config, date()).entry(&rec);
        assert!(entry.has_error());

        let config = QcConfig::default().with_obsolete_ids(ObsoleteIdPolicy::Replace);
        let entry = OrphaConverter::new(&ont, &config, date()).entry(&rec);
        assert!(!entry.has_error());
        assert_eq!(entry.phenotype_id(), "HP:0006315");
    }

    #[test]
    fn unclassifiable_term() {
        let ont = ontology();
        let config = QcConfig::default();
        let converter = OrphaConverter::new(&ont, &config, date());
        let entry = converter.entry(&record("HP:0000001", "All", "HP:0040283"));
        assert_eq!(
            entry.errors(),
            &[HpoaError::UnresolvableAspect {
                term: "HP:0000001".to_string()
            }]
        );
    }

    #[test]
    fn grouped_models() {
        let ont = ontology();
        let config = QcConfig::default();
        let converter = OrphaConverter::new(&ont, &config, date());
        let mut other = record("HP:0001250", "Seizure", "HP:0040281");
        other.disease_id = "ORPHA:100".to_string();
        other.disease_name = "Other disease".to_string();
        let records = [
            record("HP:0004322", "Short stature", "HP:0040283"),
            other,
            record("HP:0001250", "Seizure", "HP:0040280"),
        ];
        let inheritance = [OrphaInheritance {
            disease_id: "ORPHA:558".to_string(),
            disease_name: "Marfan syndrome".to_string(),
            hpo_id: "HP:0000006".to_string(),
            hpo_label: "Autosomal dominant inheritance".to_string(),
        }];
        let models = converter.models(&records, &inheritance);
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].basename(), "ORPHA:558");
        assert_eq!(models[0].len(), 3);
        assert_eq!(models[0].entries()[2].aspect(), Some(Aspect::Inheritance));
        assert!(models[0].entries()[2].frequency().is_empty());
        assert_eq!(models[1].basename(), "ORPHA:100");
        assert!(models.iter().all(|model| !model.has_error()));
    }
}
