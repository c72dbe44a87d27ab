//! Quality control and aggregation of HPO disease annotations
//!
//! Curators maintain one *small file* per disease with 14 tab-separated
//! columns. This crate validates every field of every line against the HPO,
//! merges redundant annotations of the same phenotype and assembles all
//! diseases, together with Orphanet data, into the `phenotype.hpoa` *big file*.
//!
//! Nothing is published if any annotation has an error. All problems are
//! collected into an [`ErrorReport`] first, so that they can be fixed at once.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use hpoa_qc::{BigFile, Ontology, QcConfig, SmallFileIngestor};
//!
//! let ontology = Ontology::from_obo("tests/small.obo").unwrap();
//! let config = QcConfig::default();
//!
//! let ingestion = SmallFileIngestor::new(&ontology, &config)
//!     .collect("tests/smallfiles")
//!     .unwrap();
//! assert!(!ingestion.report().has_error());
//!
//! let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
//! let mut bigfile = BigFile::new(&ontology, &config, date);
//! bigfile.add_hpo_models(ingestion.into_models());
//! let assembly = bigfile.assemble();
//! assert_eq!(assembly.rows().len(), 4);
//! ```
use std::num::ParseIntError;
use thiserror::Error;

pub mod annotations;
pub mod aspect;
pub mod bigfile;
pub mod config;
pub mod ingest;
pub mod merge;
pub mod ontology;
pub mod parser;
pub mod qc;
pub mod term;
pub mod validation;

pub use annotations::{AnnotationEntry, AnnotationModel, DiseaseDatabase, DiseaseId, SourceFormat};
pub use aspect::{Aspect, AspectIdentifier};
pub use bigfile::{BigFile, BigFileSummary};
pub use config::{CitationPolicy, ObsoleteIdPolicy, QcConfig};
pub use ingest::{IngestSummary, Ingestion, SmallFileIngestor};
pub use merge::AnnotationMerger;
pub use ontology::{Ontology, OntologyGateway};
pub use qc::{ErrorReport, ReportedError};
pub use term::{HpoGroup, HpoTermId};
pub use validation::{FrequencyModifier, HpoaError, Severity, Validator};

const DEFAULT_NUM_PARENTS: usize = 10;
const DEFAULT_NUM_ALL_PARENTS: usize = 30;
const MAX_HPO_ID_INTEGER: u32 = 10_000_000;

/// Default file name of the error report
const ERROR_REPORT_FILENAME: &str = "HPOA-errors.txt";
/// File name of the omit list inside the small file directory
const OMIT_LIST_FILENAME: &str = "omit-list.txt";

/// Number of tab-separated fields of a small file line
pub const SMALL_FILE_FIELDS: usize = 14;

/// Well-known terms of the HPO that the QC rules depend on
pub mod hpo_ids {
    use crate::HpoTermId;

    /// `HP:0000001` | All
    pub const ALL: HpoTermId = HpoTermId::from_u32(1);
    /// `HP:0000118` | Phenotypic abnormality
    pub const PHENOTYPIC_ABNORMALITY: HpoTermId = HpoTermId::from_u32(118);
    /// `HP:0000005` | Mode of inheritance
    pub const INHERITANCE: HpoTermId = HpoTermId::from_u32(5);
    /// `HP:0031797` | Clinical course
    pub const CLINICAL_COURSE: HpoTermId = HpoTermId::from_u32(31797);
    /// `HP:0012823` | Clinical modifier
    pub const CLINICAL_MODIFIER: HpoTermId = HpoTermId::from_u32(12823);
    /// `HP:0032443` | Past medical history
    pub const PAST_MEDICAL_HISTORY: HpoTermId = HpoTermId::from_u32(32443);
    /// `HP:0040279` | Frequency
    pub const FREQUENCY: HpoTermId = HpoTermId::from_u32(40279);
    /// `HP:0003674` | Onset
    pub const ONSET: HpoTermId = HpoTermId::from_u32(3674);
}

/// Errors that abort processing of a file or of the whole run
///
/// Problems with individual annotation lines are not reported through
/// this enum, but attached to the lines as [`HpoaError`]s.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HpoError {
    /// The term does not exist in the ontology
    #[error("term does not exist")]
    DoesNotExist,
    /// A string could not be parsed into an integer
    #[error("unable to parse Integer")]
    ParseIntError,
    /// A file could not be opened or read
    #[error("cannot open file {0}")]
    CannotOpenFile(String),
    /// A file could not be created or written
    #[error("cannot write to file {0}")]
    CannotWriteFile(String),
    /// The input data is not in the expected format
    #[error("invalid input data: {0}")]
    InvalidInput(String),
    /// The header of a small file does not match the required columns
    #[error("malformed header in {file}: {message}")]
    HeaderSchemaMismatch {
        /// name of the offending small file
        file: String,
        /// description of the first mismatch
        message: String,
    },
    /// A small file line does not contain the required number of fields
    #[error("expected 14 fields but got {found} in line {line}")]
    FieldCount {
        /// 1-based line number
        line: usize,
        /// number of fields in the line
        found: usize,
    },
    /// Quality control found errors, no aggregated output is produced
    #[error("quality control failed with {0} errors")]
    QcFailed(usize),
}

impl From<ParseIntError> for HpoError {
    fn from(_: ParseIntError) -> Self {
        HpoError::ParseIntError
    }
}

/// Shortcut for `Result<T, HpoError>`
pub type HpoResult<T> = Result<T, HpoError>;
