use std::fmt::Display;

use thiserror::Error;

/// Whether a problem blocks the annotation or is only reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// The value was accepted, possibly after a repair
    Notice,
    /// The annotation must not be merged or published
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Notice => write!(f, "NOTICE"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// The reason why a frequency value is invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyErrorKind {
    /// `n/m` with `n > m` or `m == 0`
    InvalidFraction,
    /// a percentage outside of `(0, 100]`
    InvalidPercentage,
    /// an HPO term that is not a descendant of `Frequency`
    InvalidSubontology,
    /// neither a fraction, a percentage nor an HPO term
    Malformed,
}

impl Display for FrequencyErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            FrequencyErrorKind::InvalidFraction => "invalid fraction",
            FrequencyErrorKind::InvalidPercentage => "invalid percentage",
            FrequencyErrorKind::InvalidSubontology => "term is not in the frequency subontology",
            FrequencyErrorKind::Malformed => "malformed frequency",
        };
        f.write_str(msg)
    }
}

/// A problem with a single annotation line
///
/// Errors are plain data that is attached to the affected [`crate::AnnotationEntry`].
/// Some variants are notices, see [`HpoaError::severity`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HpoaError {
    /// The biocuration field contains an invalid stamp
    #[error("malformed biocuration entry \"{value}\"")]
    MalformedBiocuration {
        /// the complete biocuration field
        value: String,
    },
    /// The citation does not have the expected format
    #[error("malformed citation \"{value}\": {reason}")]
    MalformedCitation {
        /// the complete publication field
        value: String,
        /// description of the problem
        reason: String,
    },
    /// The publication field is empty
    #[error("missing citation")]
    MissingCitation,
    /// The frequency is neither empty nor a valid frequency
    #[error("invalid frequency \"{value}\": {kind}")]
    InvalidFrequency {
        /// the raw frequency field
        value: String,
        /// the reason
        kind: FrequencyErrorKind,
    },
    /// An alternative or obsolete id was used instead of the primary id
    #[error("obsolete term id {obsolete} instead of {primary} ({label})")]
    ObsoleteTermId {
        /// the id that was used
        obsolete: String,
        /// the current primary id
        primary: String,
        /// the name of the primary term
        label: String,
    },
    /// An alternative or obsolete id was replaced by its primary id
    #[error("replaced obsolete term id {obsolete} with {primary}")]
    ReplacedObsoleteTermId {
        /// the id that was used
        obsolete: String,
        /// the current primary id
        primary: String,
    },
    /// An outdated term label was replaced by the current label
    #[error("updated label of {id} from \"{found}\" to \"{current}\"")]
    UpdatedTermLabel {
        /// the term id
        id: String,
        /// the label in the annotation line
        found: String,
        /// the label of the term in the ontology
        current: String,
    },
    /// A citation prefix was converted to its canonical spelling
    #[error("changed citation prefix of \"{found}\" to {prefix}")]
    RepairedCitationPrefix {
        /// the original citation
        found: String,
        /// the corrected prefix
        prefix: String,
    },
    /// The disease id does not belong to OMIM, ORPHA or DECIPHER
    #[error("unknown disease database in \"{value}\"")]
    UnknownDatabasePrefix {
        /// the disease id
        value: String,
    },
    /// A well-formed term id that does not exist in the ontology
    #[error("term id {value} is not in the ontology")]
    TermIdNotInOntology {
        /// the term id
        value: String,
    },
    /// A value that is not an HPO term id
    #[error("malformed term id \"{value}\"")]
    MalformedTermId {
        /// the raw field
        value: String,
    },
    /// The term label does not match the ontology
    #[error("invalid label \"{found}\" for {id}, expected \"{expected}\"")]
    InvalidTermLabel {
        /// the term id
        id: String,
        /// the label in the annotation line
        found: String,
        /// the label of the term in the ontology
        expected: String,
    },
    /// The term is not below any of the five aspect roots
    #[error("unable to determine the aspect of {term}")]
    UnresolvableAspect {
        /// the phenotype term id
        term: String,
    },
    /// The disease name field is empty
    #[error("missing disease name")]
    MissingDiseaseName,
    /// The disease id is not a CURIE
    #[error("malformed disease id \"{value}\"")]
    MalformedDiseaseId {
        /// the raw field
        value: String,
    },
    /// Negation is neither empty nor `NOT`
    #[error("malformed negation \"{value}\"")]
    MalformedNegation {
        /// the raw field
        value: String,
    },
    /// Sex is neither empty, `MALE` nor `FEMALE`
    #[error("malformed sex \"{value}\"")]
    MalformedSex {
        /// the raw field
        value: String,
    },
    /// Evidence is not one of `IEA`, `PCS` or `TAS`
    #[error("invalid evidence code \"{value}\"")]
    InvalidEvidenceCode {
        /// the raw field
        value: String,
    },
    /// The onset id is not a descendant of `Onset`
    #[error("invalid onset id \"{value}\"")]
    InvalidOnsetId {
        /// the raw field
        value: String,
    },
    /// The onset label is missing, superfluous or outdated
    #[error("invalid onset label \"{found}\" for \"{id}\", expected \"{expected}\"")]
    InvalidOnsetLabel {
        /// the onset id
        id: String,
        /// the label in the annotation line
        found: String,
        /// the label of the term in the ontology
        expected: String,
    },
    /// A modifier is not a descendant of `Clinical modifier`
    #[error("invalid modifier \"{value}\"")]
    InvalidModifier {
        /// the offending modifier
        value: String,
    },
    /// The disease id differs from the other entries of the file
    #[error("disease id {found} differs from {expected}")]
    InconsistentDiseaseId {
        /// the id of this entry
        found: String,
        /// the id of the first entry
        expected: String,
    },
    /// The small file header is malformed
    #[error("malformed header: {message}")]
    HeaderSchemaMismatch {
        /// description of the first mismatch
        message: String,
    },
    /// The line does not contain 14 fields
    #[error("expected 14 fields but got {found}")]
    MalformedLine {
        /// number of fields in the line
        found: usize,
    },
    /// The small file cannot be opened or is not valid UTF-8
    #[error("cannot read {path}")]
    UnreadableFile {
        /// the path of the file
        path: String,
    },
}

impl HpoaError {
    /// Returns whether the problem blocks the annotation
    pub fn severity(&self) -> Severity {
        match self {
            HpoaError::ReplacedObsoleteTermId { .. }
            | HpoaError::UpdatedTermLabel { .. }
            | HpoaError::RepairedCitationPrefix { .. }
            | HpoaError::UnknownDatabasePrefix { .. } => Severity::Notice,
            _ => Severity::Error,
        }
    }

    /// Returns `true` if the problem blocks the annotation
    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    /// A short, stable name of the error category
    pub fn kind(&self) -> &'static str {
        match self {
            HpoaError::MalformedBiocuration { .. } => "MalformedBiocuration",
            HpoaError::MalformedCitation { .. } => "MalformedCitation",
            HpoaError::MissingCitation => "MissingCitation",
            HpoaError::InvalidFrequency { .. } => "InvalidFrequency",
            HpoaError::ObsoleteTermId { .. } => "ObsoleteTermId",
            HpoaError::ReplacedObsoleteTermId { .. } => "ReplacedObsoleteTermId",
            HpoaError::UpdatedTermLabel { .. } => "UpdatedTermLabel",
            HpoaError::RepairedCitationPrefix { .. } => "RepairedCitationPrefix",
            HpoaError::UnknownDatabasePrefix { .. } => "UnknownDatabasePrefix",
            HpoaError::TermIdNotInOntology { .. } => "TermIdNotInOntology",
            HpoaError::MalformedTermId { .. } => "MalformedTermId",
            HpoaError::InvalidTermLabel { .. } => "InvalidTermLabel",
            HpoaError::UnresolvableAspect { .. } => "UnresolvableAspect",
            HpoaError::MissingDiseaseName => "MissingDiseaseName",
            HpoaError::MalformedDiseaseId { .. } => "MalformedDiseaseId",
            HpoaError::MalformedNegation { .. } => "MalformedNegation",
            HpoaError::MalformedSex { .. } => "MalformedSex",
            HpoaError::InvalidEvidenceCode { .. } => "InvalidEvidenceCode",
            HpoaError::InvalidOnsetId { .. } => "InvalidOnsetId",
            HpoaError::InvalidOnsetLabel { .. } => "InvalidOnsetLabel",
            HpoaError::InvalidModifier { .. } => "InvalidModifier",
            HpoaError::InconsistentDiseaseId { .. } => "InconsistentDiseaseId",
            HpoaError::HeaderSchemaMismatch { .. } => "HeaderSchemaMismatch",
            HpoaError::MalformedLine { .. } => "MalformedLine",
            HpoaError::UnreadableFile { .. } => "UnreadableFile",
        }
    }
}
