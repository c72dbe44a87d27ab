//! Disease annotations as they are curated in small files or imported from Orphanet
//!
//! The underlying principle for all annotations is the same:
//! - Each [`AnnotationEntry`] describes one phenotype of one disease
//! - All entries of one disease are grouped in an [`AnnotationModel`]
//! - Problems are attached to the entries as [`crate::HpoaError`]s
//!
//! Entries are created by the [`crate::Validator`] only, so every
//! field of an entry holds a checked value.

use std::fmt::Display;

mod disease;
mod entry;
mod model;
pub mod orpha;

pub use disease::{DiseaseDatabase, DiseaseId};
pub use entry::AnnotationEntry;
pub use model::AnnotationModel;

/// The origin of an annotation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceFormat {
    /// curated in a small file of the HPO project
    #[default]
    HpoProject,
    /// imported from the Orphanet XML export
    Orphanet,
}

impl Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::HpoProject => write!(f, "HPO"),
            SourceFormat::Orphanet => write!(f, "ORPHA"),
        }
    }
}

/// The sex an annotation is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    /// `MALE`
    Male,
    /// `FEMALE`
    Female,
}

impl Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sex::Male => write!(f, "MALE"),
            Sex::Female => write!(f, "FEMALE"),
        }
    }
}

/// The evidence code of an annotation
///
/// The variants are ordered by confidence, so the
/// highest evidence of several entries is their `max()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EvidenceCode {
    /// Inferred from electronic annotation
    #[default]
    IEA,
    /// Traceable author statement
    TAS,
    /// Published clinical study
    PCS,
}

impl Display for EvidenceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvidenceCode::IEA => write!(f, "IEA"),
            EvidenceCode::TAS => write!(f, "TAS"),
            EvidenceCode::PCS => write!(f, "PCS"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn evidence_priority() {
        let codes = [EvidenceCode::TAS, EvidenceCode::PCS, EvidenceCode::IEA];
        assert_eq!(codes.iter().max(), Some(&EvidenceCode::PCS));
        let codes = [EvidenceCode::IEA, EvidenceCode::TAS];
        assert_eq!(codes.iter().max(), Some(&EvidenceCode::TAS));
        assert_eq!(EvidenceCode::default(), EvidenceCode::IEA);
    }
}
