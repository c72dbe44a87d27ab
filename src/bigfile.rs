//! Assembles the aggregated `phenotype.hpoa` file
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::annotations::{AnnotationEntry, AnnotationModel, DiseaseDatabase, SourceFormat};
use crate::config::QcConfig;
use crate::ontology::OntologyGateway;
use crate::qc::{ErrorReport, ReportedError};
use crate::validation::HpoaError;
use crate::{HpoError, HpoResult};

/// The column names of the big file
pub const BIG_FILE_HEADER: [&str; 12] = [
    "database_id",
    "disease_name",
    "qualifier",
    "hpo_id",
    "reference",
    "evidence",
    "onset",
    "frequency",
    "sex",
    "modifier",
    "aspect",
    "biocuration",
];

const TRACKER: &str = "https://github.com/obophenotype/human-phenotype-ontology/issues";

/// One line of the big file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigFileRow {
    source: SourceFormat,
    line: String,
}

impl BigFileRow {
    /// Where the annotation comes from
    pub fn source(&self) -> SourceFormat {
        self.source
    }

    /// The tab-separated line, without line break
    pub fn as_str(&self) -> &str {
        &self.line
    }
}

impl Display for BigFileRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.line)
    }
}

/// The `#` metadata lines at the top of the big file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigFileHeader {
    omim: usize,
    decipher: usize,
    orphanet: usize,
    unknown: usize,
    version: NaiveDate,
    hpo_version: Option<String>,
}

impl BigFileHeader {
    /// Number of OMIM diseases
    pub fn omim(&self) -> usize {
        self.omim
    }

    /// Number of DECIPHER diseases
    pub fn decipher(&self) -> usize {
        self.decipher
    }

    /// Number of Orphanet diseases
    pub fn orphanet(&self) -> usize {
        self.orphanet
    }

    /// Number of diseases from small files that belong to no known database
    pub fn unknown(&self) -> usize {
        self.unknown
    }

    /// The `#description` line
    pub fn description(&self) -> String {
        let description = format!(
            "#description: \"HPO annotations for rare diseases [{}: OMIM; {}: DECIPHER; {} ORPHANET]\"",
            self.omim, self.decipher, self.orphanet
        );
        if self.unknown > 0 {
            format!(
                "{description} -- warning: {} entries could not be assigned to a database",
                self.unknown
            )
        } else {
            description
        }
    }
}

impl Display for BigFileHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.description())?;
        writeln!(f, "#version: {}", self.version.format("%Y-%m-%d"))?;
        writeln!(f, "#tracker: {TRACKER}")?;
        if let Some(hpo_version) = &self.hpo_version {
            writeln!(f, "#hpo-version: {hpo_version}")?;
        }
        write!(f, "{}", BIG_FILE_HEADER.join("\t"))
    }
}

/// Counts of a written big file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BigFileSummary {
    /// rows from HPO project small files
    pub hpo_rows: usize,
    /// rows from Orphanet
    pub orpha_rows: usize,
    /// Orphanet annotations that were dropped
    pub skipped: usize,
}

/// The content of the big file, before anything is written
#[derive(Debug)]
pub struct Assembly {
    header: BigFileHeader,
    rows: Vec<BigFileRow>,
    report: ErrorReport,
    skipped: usize,
}

impl Assembly {
    /// The metadata lines
    pub fn header(&self) -> &BigFileHeader {
        &self.header
    }

    /// All rows in output order
    pub fn rows(&self) -> &[BigFileRow] {
        &self.rows
    }

    /// Errors and notices of all annotations
    pub fn report(&self) -> &ErrorReport {
        &self.report
    }

    /// Number of dropped Orphanet annotations
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn write<W: Write>(&self, mut writer: W) -> HpoResult<BigFileSummary> {
        let failed = |_| HpoError::CannotWriteFile("big file".to_string());
        writeln!(writer, "{}", self.header).map_err(failed)?;
        for row in &self.rows {
            writeln!(writer, "{row}").map_err(failed)?;
        }
        writer.flush().map_err(failed)?;

        let summary = self.summary();
        info!(
            "Wrote {} HPO and {} Orphanet annotations, skipped {}",
            summary.hpo_rows, summary.orpha_rows, summary.skipped
        );
        Ok(summary)
    }

    fn summary(&self) -> BigFileSummary {
        let orpha_rows = self
            .rows
            .iter()
            .filter(|row| row.source == SourceFormat::Orphanet)
            .count();
        BigFileSummary {
            hpo_rows: self.rows.len() - orpha_rows,
            orpha_rows,
            skipped: self.skipped,
        }
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Combines the models of all sources into the big file
///
/// Small file models come first, ordered by disease, followed by
/// the Orphanet models. Entries keep their order within a model.
///
/// Orphanet annotations whose term cannot be assigned to an aspect are dropped.
/// Every other error prevents the big file from being written. The error
/// report is written to [`QcConfig::error_report`] before that decision.
///
/// ```mermaid
/// flowchart LR
///     S[small files] --> I[SmallFileIngestor]
///     X[Orphanet records] --> O[OrphaConverter]
///     I --> B[BigFile]
///     O --> B
///     B --> A[assemble]
///     A --> R[error report]
///     R --> G{QC gate}
///     G -->|no errors| W[phenotype.hpoa]
///     G -->|errors| E[QcFailed]
/// ```
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use hpoa_qc::{BigFile, Ontology, QcConfig, SmallFileIngestor};
///
/// let ontology = Ontology::from_obo("tests/small.obo").unwrap();
/// let config = QcConfig::default();
/// let ingestion = SmallFileIngestor::new(&ontology, &config)
///     .collect("tests/smallfiles")
///     .unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
/// let mut bigfile = BigFile::new(&ontology, &config, date);
/// bigfile.add_hpo_models(ingestion.into_models());
///
/// let mut buffer = Vec::new();
/// let summary = bigfile.write(&mut buffer).unwrap();
/// assert_eq!(summary.hpo_rows, 4);
/// ```
pub struct BigFile<'a, O: ?Sized> {
    ontology: &'a O,
    config: &'a QcConfig,
    version: NaiveDate,
    hpo_models: Vec<AnnotationModel>,
    orpha_models: Vec<AnnotationModel>,
}

impl<'a, O: OntologyGateway + ?Sized> BigFile<'a, O> {
    /// Constructs a new, empty big file
    ///
    /// `version` is the release date that is written into the header.
    pub fn new(ontology: &'a O, config: &'a QcConfig, version: NaiveDate) -> Self {
        Self {
            ontology,
            config,
            version,
            hpo_models: Vec::new(),
            orpha_models: Vec::new(),
        }
    }

    /// Adds models from HPO project small files
    pub fn add_hpo_models<I: IntoIterator<Item = AnnotationModel>>(&mut self, models: I) {
        self.hpo_models.extend(models);
    }

    /// Adds models created from Orphanet data
    pub fn add_orpha_models<I: IntoIterator<Item = AnnotationModel>>(&mut self, models: I) {
        self.orpha_models.extend(models);
    }

    fn header(&self) -> BigFileHeader {
        let mut header = BigFileHeader {
            omim: 0,
            decipher: 0,
            orphanet: self.orpha_models.len(),
            unknown: 0,
            version: self.version,
            hpo_version: self.ontology.version().map(str::to_string),
        };
        for model in &self.hpo_models {
            match model.database() {
                DiseaseDatabase::Omim => header.omim += 1,
                DiseaseDatabase::Decipher => header.decipher += 1,
                _ => header.unknown += 1,
            }
        }
        header
    }

    /// Creates all rows and collects all problems
    pub fn assemble(&self) -> Assembly {
        let mut hpo: Vec<&AnnotationModel> = self.hpo_models.iter().collect();
        hpo.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
        let mut orpha: Vec<&AnnotationModel> = self.orpha_models.iter().collect();
        orpha.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));

        let mut assembly = Assembly {
            header: self.header(),
            rows: Vec::new(),
            report: ErrorReport::default(),
            skipped: 0,
        };
        for model in hpo.into_iter().chain(orpha) {
            for entry in model.entries() {
                add_entry(&mut assembly, model.sort_key(), entry);
            }
        }
        assembly
    }

    /// Writes the big file
    ///
    /// Nothing is written if any annotation has an error.
    ///
    /// # Errors
    ///
    /// - [`HpoError::QcFailed`]: At least one annotation has an error
    /// - [`HpoError::CannotWriteFile`]: The writer or the error report fails
    pub fn write<W: Write>(&self, writer: W) -> HpoResult<BigFileSummary> {
        self.checked_assembly()?.write(writer)
    }

    /// Writes the big file into a new file
    ///
    /// The file is not created if any annotation has an error.
    ///
    /// # Errors
    ///
    /// See [`BigFile::write`]
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> HpoResult<BigFileSummary> {
        let assembly = self.checked_assembly()?;
        let filename = path.as_ref().display().to_string();
        let file = File::create(path).map_err(|_| HpoError::CannotWriteFile(filename.clone()))?;
        assembly
            .write(BufWriter::new(file))
            .map_err(|_| HpoError::CannotWriteFile(filename))
    }

    /// Assembles the rows and writes the error report before applying the QC gate
    fn checked_assembly(&self) -> HpoResult<Assembly> {
        let assembly = self.assemble();
        if !assembly.report.is_empty() {
            assembly
                .report
                .write_to_file(self.config.error_report())?;
            info!(
                "Wrote {} problems to {}",
                assembly.report.len(),
                self.config.error_report().display()
            );
        }
        assembly.report.gate()?;
        Ok(assembly)
    }
}

fn add_entry(assembly: &mut Assembly, disease: &str, entry: &AnnotationEntry) {
    let reported: Vec<ReportedError> = entry
        .errors()
        .iter()
        .map(|err| {
            ReportedError::new(
                disease.to_string(),
                entry.line_number(),
                entry.source(),
                err.clone(),
            )
        })
        .collect();

    if entry.has_error() {
        let skippable = reported
            .iter()
            .all(|err| err.is_notice() || err.is_skippable());
        if skippable {
            warn!(
                "Skipping annotation of {} with {}",
                disease,
                entry.phenotype_id()
            );
            assembly.skipped += 1;
            assembly
                .report
                .extend(reported.into_iter().filter(ReportedError::is_notice));
        } else {
            assembly.report.extend(reported);
        }
        return;
    }

    assembly.report.extend(reported);
    match entry.to_big_file_line() {
        Some(line) => assembly.rows.push(BigFileRow {
            source: entry.source(),
            line,
        }),
        None => assembly.report.push(ReportedError::new(
            disease.to_string(),
            entry.line_number(),
            entry.source(),
            HpoaError::UnresolvableAspect {
                term: entry.phenotype_id().to_string(),
            },
        )),
    }
}
