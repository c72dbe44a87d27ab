//! Assigns phenotype terms to one of the five sub-ontologies of the HPO
use std::fmt::Display;

use crate::ontology::OntologyGateway;
use crate::validation::HpoaError;
use crate::{hpo_ids, HpoTermId};

/// The sub-ontology of a phenotype term
///
/// The declaration order is the classification priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Aspect {
    /// `P`: below Phenotypic abnormality
    PhenotypicAbnormality,
    /// `I`: below Mode of inheritance
    Inheritance,
    /// `C`: below Clinical course
    ClinicalCourse,
    /// `M`: below Clinical modifier
    ClinicalModifier,
    /// `H`: below Past medical history
    PastMedicalHistory,
}

impl Aspect {
    /// All aspects in classification priority
    pub const PRIORITY: [Aspect; 5] = [
        Aspect::PhenotypicAbnormality,
        Aspect::Inheritance,
        Aspect::ClinicalCourse,
        Aspect::ClinicalModifier,
        Aspect::PastMedicalHistory,
    ];

    /// The root term of the sub-ontology
    pub fn root(&self) -> HpoTermId {
        match self {
            Aspect::PhenotypicAbnormality => hpo_ids::PHENOTYPIC_ABNORMALITY,
            Aspect::Inheritance => hpo_ids::INHERITANCE,
            Aspect::ClinicalCourse => hpo_ids::CLINICAL_COURSE,
            Aspect::ClinicalModifier => hpo_ids::CLINICAL_MODIFIER,
            Aspect::PastMedicalHistory => hpo_ids::PAST_MEDICAL_HISTORY,
        }
    }

    /// The single letter code used in the big file
    pub fn letter(&self) -> char {
        match self {
            Aspect::PhenotypicAbnormality => 'P',
            Aspect::Inheritance => 'I',
            Aspect::ClinicalCourse => 'C',
            Aspect::ClinicalModifier => 'M',
            Aspect::PastMedicalHistory => 'H',
        }
    }
}

impl Display for Aspect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Classifies terms into their [`Aspect`]
///
/// # Examples
///
/// ```
/// use hpoa_qc::{Aspect, AspectIdentifier, Ontology};
///
/// let mut ontology = Ontology::default();
/// ontology.insert_term("All".into(), 1u32);
/// ontology.insert_term("Mode of inheritance".into(), 5u32);
/// ontology.insert_term("Autosomal recessive inheritance".into(), 7u32);
/// ontology.add_parent(1u32, 5u32).unwrap();
/// ontology.add_parent(5u32, 7u32).unwrap();
/// ontology.create_cache();
///
/// let identifier = AspectIdentifier::new(&ontology);
/// assert_eq!(identifier.aspect(7u32.into()), Ok(Aspect::Inheritance));
/// assert!(identifier.aspect(1u32.into()).is_err());
/// ```
pub struct AspectIdentifier<'a, O: ?Sized> {
    ontology: &'a O,
}

impl<'a, O: OntologyGateway + ?Sized> AspectIdentifier<'a, O> {
    /// Constructs a new [`AspectIdentifier`]
    pub fn new(ontology: &'a O) -> Self {
        Self { ontology }
    }

    /// Returns the aspect of the term
    ///
    /// Alternative and obsolete ids are resolved to their primary id first.
    /// Terms with paths to several roots get the aspect with the highest priority.
    ///
    /// # Errors
    ///
    /// [`HpoaError::UnresolvableAspect`] if the term is unknown or not
    /// below any of the five roots
    pub fn aspect(&self, id: HpoTermId) -> Result<Aspect, HpoaError> {
        let unresolvable = || HpoaError::UnresolvableAspect {
            term: id.to_string(),
        };
        let primary = self.ontology.primary_id(id).ok_or_else(unresolvable)?;
        Aspect::PRIORITY
            .into_iter()
            .find(|aspect| self.ontology.exists_path(primary, aspect.root()))
            .or_else(|| {
                Aspect::PRIORITY
                    .into_iter()
                    .find(|aspect| aspect.root() == primary)
            })
            .ok_or_else(unresolvable)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Ontology;

    fn ontology() -> Ontology {
        Ontology::from_obo("tests/small.obo").expect("fixture can be parsed")
    }

    #[test]
    fn all_aspects() {
        let ont = ontology();
        let identifier = AspectIdentifier::new(&ont);
        for (id, aspect) in [
            (1250u32, Aspect::PhenotypicAbnormality),
            (7, Aspect::Inheritance),
            (3581, Aspect::ClinicalCourse),
            (12828, Aspect::ClinicalModifier),
        ] {
            assert_eq!(identifier.aspect(id.into()), Ok(aspect));
        }
    }

    #[test]
    fn phenotypic_abnormality_wins_over_past_medical_history() {
        let ont = ontology();
        assert!(ont.exists_path(2373u32.into(), hpo_ids::PAST_MEDICAL_HISTORY));
        let identifier = AspectIdentifier::new(&ont);
        assert_eq!(
            identifier.aspect(2373u32.into()),
            Ok(Aspect::PhenotypicAbnormality)
        );
    }

    #[test]
    fn roots_map_to_their_own_aspect() {
        let ont = ontology();
        let identifier = AspectIdentifier::new(&ont);
        assert_eq!(
            identifier.aspect(hpo_ids::PAST_MEDICAL_HISTORY),
            Ok(Aspect::PastMedicalHistory)
        );
        assert_eq!(
            identifier.aspect(hpo_ids::PHENOTYPIC_ABNORMALITY),
            Ok(Aspect::PhenotypicAbnormality)
        );
    }

    #[test]
    fn alternative_ids_are_resolved() {
        let ont = ontology();
        let identifier = AspectIdentifier::new(&ont);
        assert_eq!(
            identifier.aspect(1568u32.into()),
            Ok(Aspect::PhenotypicAbnormality)
        );
    }

    #[test]
    fn unresolvable() {
        let ont = ontology();
        let identifier = AspectIdentifier::new(&ont);
        for id in [hpo_ids::ALL, hpo_ids::FREQUENCY, 40283u32.into(), 31337u32.into()] {
            assert_eq!(
                identifier.aspect(id),
                Err(HpoaError::UnresolvableAspect {
                    term: id.to_string()
                })
            );
        }
    }

    #[test]
    fn letters() {
        let letters: String = Aspect::PRIORITY.iter().map(Aspect::letter).collect();
        assert_eq!(letters, "PICMH");
    }
}
