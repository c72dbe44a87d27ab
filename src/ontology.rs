//! Access to the HPO graph
//!
//! All quality control rules only need a handful of questions answered
//! by the ontology. They are collected in the [`OntologyGateway`] trait
//! so that validators, the merge engine and the big-file assembler can
//! be used with any ontology backend.
//!
//! [`Ontology`] is the in-memory implementation that is built from an
//! `hp.obo` file or manually, term by term.
use std::collections::HashMap;
use std::path::Path;

use tracing::trace;

use crate::parser;
use crate::term::internal::HpoTermInternal;
use crate::term::HpoGroup;
use crate::{hpo_ids, HpoError, HpoResult, HpoTermId};

mod termarena;
use termarena::Arena;

/// The read-only queries that quality control issues against the HPO
///
/// Implementors must be safe to share between threads when used
/// for parallel ingestion.
pub trait OntologyGateway {
    /// Returns the current primary id of a term
    ///
    /// Live terms map to themselves, alternative ids and obsolete terms with
    /// a replacement map to their primary term. Unknown ids return `None`.
    fn primary_id(&self, id: HpoTermId) -> Option<HpoTermId>;

    /// Returns the name of the primary term of `id`
    fn label(&self, id: HpoTermId) -> Option<&str>;

    /// Returns `true` if `ancestor` is a direct or indirect parent of `child`
    ///
    /// A term is never its own ancestor.
    fn exists_path(&self, child: HpoTermId, ancestor: HpoTermId) -> bool;

    /// Returns the mean proportion of a frequency term, e.g. `0.17` for `Occasional`
    ///
    /// Returns `None` for all terms that are not one of the six frequency terms.
    fn mean_frequency(&self, id: HpoTermId) -> Option<f64>;

    /// The release version of the ontology, if known
    fn version(&self) -> Option<&str> {
        None
    }
}

/// The six terms below `Frequency` (`HP:0040279`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyTerm {
    /// `HP:0040280`, present in 100% of the cases
    Obligate,
    /// `HP:0040281`, present in 80% to 99% of the cases
    VeryFrequent,
    /// `HP:0040282`, present in 30% to 79% of the cases
    Frequent,
    /// `HP:0040283`, present in 5% to 29% of the cases
    Occasional,
    /// `HP:0040284`, present in 1% to 4% of the cases
    VeryRare,
    /// `HP:0040285`, present in 0% of the cases
    Excluded,
}

impl FrequencyTerm {
    /// The mean proportion of patients that show the feature
    pub fn mean(&self) -> f64 {
        match self {
            FrequencyTerm::Obligate => 1.0,
            FrequencyTerm::VeryFrequent => 0.895,
            FrequencyTerm::Frequent => 0.545,
            FrequencyTerm::Occasional => 0.17,
            FrequencyTerm::VeryRare => 0.025,
            FrequencyTerm::Excluded => 0.0,
        }
    }

    /// The [`HpoTermId`] of the frequency term
    pub fn id(&self) -> HpoTermId {
        HpoTermId::from_u32(match self {
            FrequencyTerm::Obligate => 40280,
            FrequencyTerm::VeryFrequent => 40281,
            FrequencyTerm::Frequent => 40282,
            FrequencyTerm::Occasional => 40283,
            FrequencyTerm::VeryRare => 40284,
            FrequencyTerm::Excluded => 40285,
        })
    }
}

impl TryFrom<HpoTermId> for FrequencyTerm {
    type Error = HpoError;

    fn try_from(id: HpoTermId) -> HpoResult<Self> {
        match id.as_u32() {
            40280 => Ok(FrequencyTerm::Obligate),
            40281 => Ok(FrequencyTerm::VeryFrequent),
            40282 => Ok(FrequencyTerm::Frequent),
            40283 => Ok(FrequencyTerm::Occasional),
            40284 => Ok(FrequencyTerm::VeryRare),
            40285 => Ok(FrequencyTerm::Excluded),
            _ => Err(HpoError::DoesNotExist),
        }
    }
}

/// In-memory representation of the HPO
///
/// # Examples
///
/// ```
/// use hpoa_qc::{HpoTermId, Ontology, OntologyGateway};
///
/// let mut ontology = Ontology::default();
/// ontology.insert_term("All".into(), 1u32);
/// ontology.insert_term("Phenotypic abnormality".into(), 118u32);
/// ontology.insert_term("Seizure".into(), 1250u32);
/// ontology.add_parent(1u32, 118u32).unwrap();
/// ontology.add_parent(118u32, 1250u32).unwrap();
/// ontology.create_cache();
///
/// assert!(ontology.exists_path(1250u32.into(), 1u32.into()));
/// assert!(!ontology.exists_path(1u32.into(), 1250u32.into()));
/// assert_eq!(ontology.label(1250u32.into()), Some("Seizure"));
/// ```
#[derive(Debug, Default)]
pub struct Ontology {
    hpo_terms: Arena,
    alt_ids: HashMap<HpoTermId, HpoTermId>,
    hpo_version: Option<String>,
}

impl Ontology {
    /// Builds the ontology from an `hp.obo` file
    ///
    /// # Errors
    ///
    /// - [`HpoError::CannotOpenFile`]: The file does not exist or cannot be read
    /// - [`HpoError::InvalidInput`]: A stanza contains a malformed term id or
    ///   references a term that is not defined in the file
    pub fn from_obo<P: AsRef<Path>>(path: P) -> HpoResult<Self> {
        let mut ont = Ontology::default();
        parser::hp_obo::read_obo_file(path, &mut ont)?;
        Ok(ont)
    }

    /// Returns the number of terms in the ontology, including obsolete ones
    pub fn len(&self) -> usize {
        self.hpo_terms.len()
    }

    /// Returns `true` if the ontology does not contain any terms
    pub fn is_empty(&self) -> bool {
        self.hpo_terms.len() == 0
    }

    /// Adds a new term to the ontology
    ///
    /// An existing term with the same id is replaced.
    pub fn insert_term<I: Into<HpoTermId>>(&mut self, name: String, id: I) {
        let term = HpoTermInternal::new(name, id.into());
        self.hpo_terms.insert(term);
    }

    /// Connects a term to its parent
    ///
    /// # Errors
    ///
    /// [`HpoError::DoesNotExist`] if one of the terms is not present
    pub fn add_parent<I: Into<HpoTermId>, J: Into<HpoTermId>>(
        &mut self,
        parent_id: I,
        child_id: J,
    ) -> HpoResult<()> {
        let parent_id = parent_id.into();
        let child_id = child_id.into();
        if self.hpo_terms.get(parent_id).is_none() {
            return Err(HpoError::DoesNotExist);
        }
        self.hpo_terms
            .get_mut(child_id)
            .ok_or(HpoError::DoesNotExist)?
            .add_parent(parent_id);
        Ok(())
    }

    /// Registers `alt_id` as an alternative identifier of `primary`
    ///
    /// # Errors
    ///
    /// [`HpoError::DoesNotExist`] if `primary` is not present
    pub fn add_alt_id<I: Into<HpoTermId>, J: Into<HpoTermId>>(
        &mut self,
        alt_id: I,
        primary: J,
    ) -> HpoResult<()> {
        let primary = primary.into();
        if self.hpo_terms.get(primary).is_none() {
            return Err(HpoError::DoesNotExist);
        }
        self.alt_ids.insert(alt_id.into(), primary);
        Ok(())
    }

    /// Flags a term as obsolete, optionally with the term that replaces it
    ///
    /// # Errors
    ///
    /// [`HpoError::DoesNotExist`] if the term is not present
    pub fn set_obsolete<I: Into<HpoTermId>>(
        &mut self,
        id: I,
        replacement: Option<HpoTermId>,
    ) -> HpoResult<()> {
        let term = self
            .hpo_terms
            .get_mut(id.into())
            .ok_or(HpoError::DoesNotExist)?;
        *term.obsolete_mut() = true;
        *term.replacement_mut() = replacement;
        Ok(())
    }

    /// Sets the release version, e.g. `2024-01-16`
    pub fn set_version(&mut self, version: String) {
        self.hpo_version = Some(version);
    }

    /// Returns the name of the term itself, without resolving alternative ids
    pub fn term_name<I: Into<HpoTermId>>(&self, id: I) -> Option<&str> {
        self.hpo_terms.get(id.into()).map(|term| term.name())
    }

    /// Returns `true` if the term is flagged as obsolete
    pub fn is_obsolete<I: Into<HpoTermId>>(&self, id: I) -> bool {
        self.hpo_terms
            .get(id.into())
            .map_or(false, |term| term.obsolete())
    }

    /// Creates and caches the direct and indirect parents of every term
    ///
    /// Must be called after all terms and connections are added and before
    /// any path queries. Terms that are cached already are not recalculated.
    pub fn create_cache(&mut self) {
        let term_ids = self.hpo_terms.keys();
        for id in term_ids {
            let cached = self
                .hpo_terms
                .get(id)
                .map_or(true, |term| term.parents_cached());
            if !cached {
                self.create_cache_of_grandparents(id);
            }
        }
        trace!("Created ancestor cache for {} terms", self.len());
    }

    fn all_grandparents(&mut self, term_id: HpoTermId) -> HpoGroup {
        let cached = match self.hpo_terms.get(term_id) {
            Some(term) => term.parents_cached(),
            None => return HpoGroup::default(),
        };
        if !cached {
            self.create_cache_of_grandparents(term_id);
        }
        self.hpo_terms
            .get(term_id)
            .map(|term| term.all_parents().clone())
            .unwrap_or_default()
    }

    /// Recursively collects the ancestors of all parents and caches them
    /// in each visited term on the way back down
    fn create_cache_of_grandparents(&mut self, term_id: HpoTermId) {
        let Some(parents) = self.hpo_terms.get(term_id).map(|term| term.parents().clone()) else {
            return;
        };
        let mut res = HpoGroup::default();
        for parent in &parents {
            let grandparents = self.all_grandparents(parent);
            res = &res | &grandparents;
        }
        if let Some(term) = self.hpo_terms.get_mut(term_id) {
            *term.all_parents_mut() = &res | &parents;
        }
    }
}

impl OntologyGateway for Ontology {
    fn primary_id(&self, id: HpoTermId) -> Option<HpoTermId> {
        if let Some(primary) = self.alt_ids.get(&id) {
            return Some(*primary);
        }
        let term = self.hpo_terms.get(id)?;
        if !term.obsolete() {
            return Some(id);
        }
        let replacement = term.replacement()?;
        match self.hpo_terms.get(replacement) {
            Some(next) if !next.obsolete() => Some(replacement),
            _ => None,
        }
    }

    fn label(&self, id: HpoTermId) -> Option<&str> {
        let primary = self.primary_id(id)?;
        self.term_name(primary)
    }

    fn exists_path(&self, child: HpoTermId, ancestor: HpoTermId) -> bool {
        self.hpo_terms
            .get(child)
            .map_or(false, |term| term.all_parents().contains(&ancestor))
    }

    fn mean_frequency(&self, id: HpoTermId) -> Option<f64> {
        let term = FrequencyTerm::try_from(id).ok()?;
        if self.hpo_terms.get(id).is_some() && !self.exists_path(id, hpo_ids::FREQUENCY) {
            return None;
        }
        Some(term.mean())
    }

    fn version(&self) -> Option<&str> {
        self.hpo_version.as_deref()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ontology() -> Ontology {
        let mut ont = Ontology::default();
        ont.insert_term("All".into(), 1u32);
        ont.insert_term("Phenotypic abnormality".into(), 118u32);
        ont.insert_term("Abnormality of the nervous system".into(), 707u32);
        ont.insert_term("Seizure".into(), 1250u32);
        ont.insert_term("Old seizure".into(), 9999u32);
        ont.insert_term("Unconnected".into(), 4242u32);
        ont.add_parent(1u32, 118u32).unwrap();
        ont.add_parent(118u32, 707u32).unwrap();
        ont.add_parent(707u32, 1250u32).unwrap();
        ont.add_alt_id(1568u32, 1250u32).unwrap();
        ont.set_obsolete(9999u32, Some(1250u32.into())).unwrap();
        ont.set_obsolete(4242u32, None).unwrap();
        ont.create_cache();
        ont
    }

    #[test]
    fn cache_contains_all_ancestors() {
        let ont = ontology();
        assert!(ont.exists_path(1250u32.into(), 707u32.into()));
        assert!(ont.exists_path(1250u32.into(), 118u32.into()));
        assert!(ont.exists_path(1250u32.into(), 1u32.into()));
        assert!(!ont.exists_path(1250u32.into(), 1250u32.into()));
        assert!(!ont.exists_path(118u32.into(), 1250u32.into()));
        assert!(!ont.exists_path(31337u32.into(), 1u32.into()));
    }

    #[test]
    fn primary_id_resolution() {
        let ont = ontology();
        assert_eq!(ont.primary_id(1250u32.into()), Some(1250u32.into()));
        assert_eq!(ont.primary_id(1568u32.into()), Some(1250u32.into()));
        assert_eq!(ont.primary_id(9999u32.into()), Some(1250u32.into()));
        assert_eq!(ont.primary_id(4242u32.into()), None);
        assert_eq!(ont.primary_id(31337u32.into()), None);
    }

    #[test]
    fn label_of_primary_term() {
        let ont = ontology();
        assert_eq!(ont.label(1568u32.into()), Some("Seizure"));
        assert_eq!(ont.label(9999u32.into()), Some("Seizure"));
        assert_eq!(ont.term_name(9999u32), Some("Old seizure"));
    }

    #[test]
    fn add_parent_requires_terms() {
        let mut ont = ontology();
        assert_eq!(ont.add_parent(1u32, 31337u32), Err(HpoError::DoesNotExist));
        assert_eq!(ont.add_parent(31337u32, 1u32), Err(HpoError::DoesNotExist));
        assert_eq!(ont.add_alt_id(2u32, 31337u32), Err(HpoError::DoesNotExist));
    }

    #[test]
    fn frequency_table() {
        let ont = Ontology::default();
        assert_eq!(ont.mean_frequency(40283u32.into()), Some(0.17));
        assert_eq!(ont.mean_frequency(40285u32.into()), Some(0.0));
        assert_eq!(ont.mean_frequency(1250u32.into()), None);
        assert_eq!(
            FrequencyTerm::try_from(HpoTermId::from(40281u32)),
            Ok(FrequencyTerm::VeryFrequent)
        );
        assert_eq!(FrequencyTerm::Frequent.id(), "HP:0040282");
    }
}
