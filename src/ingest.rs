//! Reads a directory of small files into validated and merged [`AnnotationModel`]s
//!
//! Every file is parsed, validated and merged on its own, so the files are
//! processed in parallel. The results are ordered by disease afterwards and
//! do not depend on the scheduling.
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::annotations::{AnnotationModel, SourceFormat};
use crate::config::QcConfig;
use crate::merge::AnnotationMerger;
use crate::ontology::OntologyGateway;
use crate::parser::omit_list::OmitList;
use crate::parser::small_file::{disease_curie_from_filename, read_small_file};
use crate::qc::{ErrorReport, ReportedError};
use crate::validation::Validator;
use crate::{HpoError, HpoResult, OMIT_LIST_FILENAME};

/// Counts of an ingestion run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// number of `.tab` files in the directory
    pub files_found: usize,
    /// number of files skipped because of the omit list
    pub omitted: usize,
    /// number of files that were parsed into a model
    pub parsed: usize,
    /// number of annotation lines in all parsed files, before merging
    pub annotation_lines: usize,
}

/// The result of an ingestion run
#[derive(Debug)]
pub struct Ingestion {
    models: Vec<AnnotationModel>,
    report: ErrorReport,
    summary: IngestSummary,
}

impl Ingestion {
    /// All models, ordered by disease
    pub fn models(&self) -> &[AnnotationModel] {
        &self.models
    }

    /// Consumes the ingestion and returns the models
    pub fn into_models(self) -> Vec<AnnotationModel> {
        self.models
    }

    /// All errors and notices of all files
    pub fn report(&self) -> &ErrorReport {
        &self.report
    }

    /// The counts of the run
    pub fn summary(&self) -> IngestSummary {
        self.summary
    }
}

/// Outcome of a single small file
enum ParsedFile {
    Model {
        model: AnnotationModel,
        report: ErrorReport,
        lines: usize,
    },
    Rejected(ReportedError),
}

/// Ingests all small files of a directory
///
/// # Examples
///
/// ```
/// use hpoa_qc::{Ontology, QcConfig, SmallFileIngestor};
///
/// let ontology = Ontology::from_obo("tests/small.obo").unwrap();
/// let config = QcConfig::default();
/// let ingestor = SmallFileIngestor::new(&ontology, &config);
///
/// let ingestion = ingestor.collect("tests/smallfiles").unwrap();
/// assert!(!ingestion.report().has_error());
/// assert_eq!(ingestion.summary().omitted, 1);
/// ```
pub struct SmallFileIngestor<'a, O: ?Sized> {
    ontology: &'a O,
    config: &'a QcConfig,
}

impl<'a, O: OntologyGateway + Sync + ?Sized> SmallFileIngestor<'a, O> {
    /// Constructs a new [`SmallFileIngestor`]
    pub fn new(ontology: &'a O, config: &'a QcConfig) -> Self {
        Self { ontology, config }
    }

    /// Ingests the directory and fails if any annotation has an error
    ///
    /// The error report is written to [`QcConfig::error_report`] whenever it
    /// contains errors or notices, before the run fails.
    ///
    /// # Errors
    ///
    /// - [`HpoError::CannotOpenFile`]: The directory or the omit list cannot be read
    /// - [`HpoError::CannotWriteFile`]: The error report cannot be written
    /// - [`HpoError::QcFailed`]: At least one annotation has an error
    pub fn ingest<P: AsRef<Path>>(&self, dir: P) -> HpoResult<Ingestion> {
        let ingestion = self.collect(dir)?;
        if !ingestion.report.is_empty() {
            ingestion
                .report
                .write_to_file(self.config.error_report())?;
            info!(
                "Wrote {} problems to {}",
                ingestion.report.len(),
                self.config.error_report().display()
            );
        }
        ingestion.report.gate()?;
        Ok(ingestion)
    }

    /// Parses, validates and merges all small files without writing anything
    ///
    /// Files that cannot be read end up in the report as `UnreadableFile`.
    ///
    /// # Errors
    ///
    /// [`HpoError::CannotOpenFile`] if the directory or the omit list cannot be read
    pub fn collect<P: AsRef<Path>>(&self, dir: P) -> HpoResult<Ingestion> {
        let dir = dir.as_ref();
        let files = small_files(dir)?;
        let omit_list = self.omit_list(dir)?;

        let mut summary = IngestSummary {
            files_found: files.len(),
            ..Default::default()
        };
        let files: Vec<PathBuf> = files
            .into_iter()
            .filter(|path| {
                let curie = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .and_then(disease_curie_from_filename);
                match curie {
                    Some(curie) if omit_list.contains(&curie) => {
                        debug!("Omitting {}", path.display());
                        false
                    }
                    _ => true,
                }
            })
            .collect();
        summary.omitted = summary.files_found - files.len();

        let parsed = files
            .par_iter()
            .map(|path| self.parse_file(path))
            .collect::<HpoResult<Vec<ParsedFile>>>()?;

        let mut models = Vec::with_capacity(parsed.len());
        let mut report = ErrorReport::default();
        for file in parsed {
            match file {
                ParsedFile::Model {
                    model,
                    report: file_report,
                    lines,
                } => {
                    summary.parsed += 1;
                    summary.annotation_lines += lines;
                    report.append(file_report);
                    models.push(model);
                }
                ParsedFile::Rejected(err) => report.push(err),
            }
        }
        models.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
        report.sort();

        info!(
            "Ingested {} of {} small files with {} annotation lines ({} omitted)",
            summary.parsed, summary.files_found, summary.annotation_lines, summary.omitted
        );
        Ok(Ingestion {
            models,
            report,
            summary,
        })
    }

    fn omit_list(&self, dir: &Path) -> HpoResult<OmitList> {
        if let Some(path) = self.config.omit_list() {
            return OmitList::from_file(path);
        }
        let default = dir.join(OMIT_LIST_FILENAME);
        if default.is_file() {
            OmitList::from_file(default)
        } else {
            Ok(OmitList::default())
        }
    }

    fn parse_file(&self, path: &Path) -> HpoResult<ParsedFile> {
        let basename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        let lines = match read_small_file(path) {
            Ok(lines) => lines,
            Err(err) => {
                return ReportedError::from_file_error(&basename, &err)
                    .map(ParsedFile::Rejected)
                    .ok_or(err)
            }
        };

        let validator = Validator::new(self.ontology, self.config);
        let entries = lines
            .iter()
            .map(|line| {
                validator.parse_line(&line.text, Some(line.line_number), SourceFormat::HpoProject)
            })
            .collect::<HpoResult<Vec<_>>>()?;
        let count = entries.len();
        let model = AnnotationModel::new(basename, SourceFormat::HpoProject, entries);
        let mut report = ErrorReport::from_model(&model);
        debug!("Parsed {} with {} lines", model.basename(), count);

        let model = if self.config.merge_entries() {
            let merged = AnnotationMerger::new(self.ontology, self.config).merge_model(&model);
            for entry in merged.entries() {
                if !model.entries().contains(entry) {
                    report.add_entry(merged.sort_key(), entry);
                }
            }
            merged
        } else {
            model
        };
        Ok(ParsedFile::Model {
            model,
            report,
            lines: count,
        })
    }
}

/// All `.tab` files of the directory, sorted by name
fn small_files(dir: &Path) -> HpoResult<Vec<PathBuf>> {
    let cannot_open = || HpoError::CannotOpenFile(dir.display().to_string());
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|_| cannot_open())? {
        let path = entry.map_err(|_| cannot_open())?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "tab") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{HpoaError, Ontology};

    fn ontology() -> Ontology {
        Ontology::from_obo("tests/small.obo").expect("fixture can be parsed")
    }

    #[test]
    fn ingest_directory() {
        let ont = ontology();
        let config = QcConfig::default();
        let ingestion = SmallFileIngestor::new(&ont, &config)
            .collect("tests/smallfiles")
            .expect("directory can be read");
        let summary = ingestion.summary();
        assert_eq!(summary.files_found, 3);
        assert_eq!(summary.omitted, 1);
        assert_eq!(summary.parsed, 2);
        assert_eq!(summary.annotation_lines, 5);

        let ids: Vec<_> = ingestion.models().iter().map(|m| m.sort_key()).collect();
        assert_eq!(ids, vec!["DECIPHER:1", "OMIM:100050"]);
        assert!(!ingestion.report().has_error());
    }

    #[test]
    fn merged_frequencies() {
        let ont = ontology();
        let config = QcConfig::default();
        let ingestion = SmallFileIngestor::new(&ont, &config)
            .collect("tests/smallfiles")
            .expect("directory can be read");
        let omim = &ingestion.models()[1];
        assert_eq!(omim.len(), 2);
        assert_eq!(omim.entries()[0].frequency().to_string(), "5/9");
    }

    #[test]
    fn merging_can_be_disabled() {
        let ont = ontology();
        let config = QcConfig::default().with_merge_entries(false);
        let ingestion = SmallFileIngestor::new(&ont, &config)
            .collect("tests/smallfiles")
            .expect("directory can be read");
        assert_eq!(ingestion.models()[1].len(), 3);
    }

    #[test]
    fn explicit_omit_list() {
        let ont = ontology();
        let omit = std::env::temp_dir().join("hpoa-qc-empty-omit-list.txt");
        fs::write(&omit, "# nothing is omitted\n").expect("temp dir is writable");
        let config = QcConfig::default().with_omit_list(&omit);
        let ingestion = SmallFileIngestor::new(&ont, &config)
            .collect("tests/smallfiles")
            .expect("directory can be read");
        assert_eq!(ingestion.summary().omitted, 0);
        assert_eq!(ingestion.summary().parsed, 3);
    }

    #[test]
    fn header_errors_are_reported() {
        let ont = ontology();
        let report = std::env::temp_dir().join("hpoa-qc-malformed-errors.txt");
        let config = QcConfig::default().with_error_report(&report);
        let ingestor = SmallFileIngestor::new(&ont, &config);

        let ingestion = ingestor.collect("tests/malformed").expect("directory can be read");
        assert!(ingestion.models().is_empty());
        let errors: Vec<_> = ingestion.report().iter().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].disease(), "OMIM-999999.tab");
        assert!(matches!(
            errors[0].error(),
            HpoaError::HeaderSchemaMismatch { .. }
        ));

        assert_eq!(
            ingestor.ingest("tests/malformed").map(|_| ()),
            Err(HpoError::QcFailed(1))
        );
        let written = fs::read_to_string(&report).expect("report was written");
        assert!(written.contains("HeaderSchemaMismatch"));
    }

    #[test]
    fn unreadable_files_are_reported() {
        let ont = ontology();
        let report = std::env::temp_dir().join("hpoa-qc-unreadable-errors.txt");
        let config = QcConfig::default().with_error_report(&report);
        let ingestor = SmallFileIngestor::new(&ont, &config);

        let ingestion = ingestor.collect("tests/unreadable").expect("directory can be read");
        assert_eq!(ingestion.summary().files_found, 3);
        assert_eq!(ingestion.summary().parsed, 2);
        let kinds: Vec<_> = ingestion
            .report()
            .iter()
            .map(|err| (err.disease(), err.error().kind()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("OMIM-222222.tab", "UnreadableFile"),
                ("OMIM:100001", "InvalidEvidenceCode")
            ]
        );

        assert_eq!(
            ingestor.ingest("tests/unreadable").map(|_| ()),
            Err(HpoError::QcFailed(2))
        );
        let written = fs::read_to_string(&report).expect("report was written");
        assert!(written.contains("UnreadableFile"));
        assert!(written.contains("InvalidEvidenceCode"));
    }

    #[test]
    fn merge_errors_are_reported_next_to_line_errors() {
        let ont = ontology();
        let dir = std::env::temp_dir().join("hpoa-qc-merge-overflow");
        fs::create_dir_all(&dir).expect("temp dir is writable");
        let row = |frequency: &str, evidence: &str| {
            format!(
                "OMIM:100050\tAarskog syndrome\tHP:0001250\tSeizure\t\t\t{frequency}\t\t\t\t\tOMIM:100050\t{evidence}\tHPO:probinson[2013-01-09]\n"
            )
        };
        let content = [
            crate::parser::small_file::SMALL_FILE_HEADER.join("\t") + "\n",
            row("4000000000/4000000000", "IEA"),
            row("4000000000/4000000000", "IEA"),
            row("1/2", "XYZ"),
        ]
        .concat();
        fs::write(dir.join("OMIM-100050.tab"), content).expect("temp dir is writable");

        let config = QcConfig::default();
        let ingestion = SmallFileIngestor::new(&ont, &config)
            .collect(&dir)
            .expect("directory can be read");
        let kinds: Vec<_> = ingestion
            .report()
            .iter()
            .map(|err| (err.line(), err.error().kind()))
            .collect();
        assert_eq!(
            kinds,
            vec![(Some(2), "InvalidFrequency"), (Some(4), "InvalidEvidenceCode")]
        );
    }

    #[test]
    fn missing_directory() {
        let ont = ontology();
        let config = QcConfig::default();
        let ingestor = SmallFileIngestor::new(&ont, &config);
        assert!(matches!(
            ingestor.collect("tests/does-not-exist"),
            Err(HpoError::CannotOpenFile(_))
        ));
    }
}
