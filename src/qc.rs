//! Collects the problems of all annotations and decides if output may be produced
//!
//! Every [`HpoaError`] of every entry ends up in an [`ErrorReport`]. The
//! report is written in full before the [`ErrorReport::gate`] fails, so that
//! curators can fix all problems at once.
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::error;

use crate::annotations::{AnnotationEntry, AnnotationModel, SourceFormat};
use crate::validation::HpoaError;
use crate::{HpoError, HpoResult};

/// One problem, located by disease and line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedError {
    disease: String,
    line: Option<usize>,
    source: SourceFormat,
    error: HpoaError,
}

impl ReportedError {
    /// Constructs a new [`ReportedError`]
    ///
    /// `disease` is the disease CURIE or, if that is unknown, the file name.
    pub fn new(disease: String, line: Option<usize>, source: SourceFormat, error: HpoaError) -> Self {
        Self {
            disease,
            line,
            source,
            error,
        }
    }

    /// Converts a file-level failure of a small file into a report entry
    ///
    /// Returns `None` for failures that do not belong to a single file.
    pub fn from_file_error(basename: &str, err: &HpoError) -> Option<Self> {
        let (line, error) = match err {
            HpoError::HeaderSchemaMismatch { message, .. } => (
                Some(1),
                HpoaError::HeaderSchemaMismatch {
                    message: message.clone(),
                },
            ),
            HpoError::FieldCount { line, found } => {
                (Some(*line), HpoaError::MalformedLine { found: *found })
            }
            HpoError::CannotOpenFile(path) => {
                (None, HpoaError::UnreadableFile { path: path.clone() })
            }
            _ => return None,
        };
        Some(Self::new(
            basename.to_string(),
            line,
            SourceFormat::HpoProject,
            error,
        ))
    }

    /// The disease CURIE or file name
    pub fn disease(&self) -> &str {
        &self.disease
    }

    /// The 1-based line number, if known
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// The source of the affected annotation
    pub fn source(&self) -> SourceFormat {
        self.source
    }

    /// The actual problem
    pub fn error(&self) -> &HpoaError {
        &self.error
    }

    /// Returns `true` if the problem does not block any output
    pub fn is_notice(&self) -> bool {
        !self.error.is_error()
    }

    /// Returns `true` if the annotation can be dropped instead of failing the run
    ///
    /// This only applies to Orphanet terms that cannot be assigned to an aspect.
    pub fn is_skippable(&self) -> bool {
        self.source == SourceFormat::Orphanet
            && matches!(self.error, HpoaError::UnresolvableAspect { .. })
    }
}

impl Display for ReportedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let line = self.line.map(|n| n.to_string()).unwrap_or_default();
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.disease,
            line,
            self.source,
            self.error.severity(),
            self.error.kind(),
            self.error
        )
    }
}

/// All problems of an ingestion or assembly run
///
/// # Examples
///
/// ```
/// use hpoa_qc::{ErrorReport, HpoaError, ReportedError, SourceFormat};
///
/// let mut report = ErrorReport::default();
/// report.push(ReportedError::new(
///     "OMIM:100050".to_string(),
///     Some(3),
///     SourceFormat::HpoProject,
///     HpoaError::MissingCitation,
/// ));
/// assert!(report.has_error());
/// assert!(report.gate().is_err());
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ErrorReport {
    errors: Vec<ReportedError>,
}

impl ErrorReport {
    /// Collects all errors and notices of the model
    pub fn from_model(model: &AnnotationModel) -> Self {
        let mut report = Self::default();
        report.add_model(model);
        report
    }

    /// Adds all errors and notices of the model
    pub fn add_model(&mut self, model: &AnnotationModel) {
        for entry in model.entries() {
            self.add_entry(model.sort_key(), entry);
        }
    }

    /// Adds all errors and notices of a single entry of `disease`
    pub fn add_entry(&mut self, disease: &str, entry: &AnnotationEntry) {
        self.errors.extend(entry.errors().iter().map(|err| {
            ReportedError::new(
                disease.to_string(),
                entry.line_number(),
                entry.source(),
                err.clone(),
            )
        }));
    }

    /// Adds a single problem
    pub fn push(&mut self, error: ReportedError) {
        self.errors.push(error);
    }

    /// Moves all problems of `other` into this report
    pub fn append(&mut self, other: ErrorReport) {
        self.errors.extend(other.errors);
    }

    /// Sorts the problems by disease and line, keeping the order within a line
    pub fn sort(&mut self) {
        self.errors
            .sort_by(|a, b| a.disease.cmp(&b.disease).then(a.line.cmp(&b.line)));
    }

    /// Number of problems, including notices
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns `true` if the report has neither errors nor notices
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `true` if any problem blocks the output
    pub fn has_error(&self) -> bool {
        self.fatal().next().is_some()
    }

    /// All problems in their current order
    pub fn iter(&self) -> std::slice::Iter<'_, ReportedError> {
        self.errors.iter()
    }

    /// All problems that block the output
    pub fn fatal(&self) -> impl Iterator<Item = &ReportedError> {
        self.errors.iter().filter(|err| !err.is_notice())
    }

    /// All notices
    pub fn notices(&self) -> impl Iterator<Item = &ReportedError> {
        self.errors.iter().filter(|err| err.is_notice())
    }

    /// Writes the report as tab-separated lines
    ///
    /// # Errors
    ///
    /// [`HpoError::CannotWriteFile`] if the writer fails
    pub fn write<W: Write>(&self, mut writer: W) -> HpoResult<()> {
        let failed = |_| HpoError::CannotWriteFile("error report".to_string());
        writeln!(writer, "#disease\tline\tsource\tseverity\tkind\tmessage").map_err(failed)?;
        for err in &self.errors {
            writeln!(writer, "{err}").map_err(failed)?;
        }
        writer.flush().map_err(failed)
    }

    /// Writes the report into a new file
    ///
    /// # Errors
    ///
    /// [`HpoError::CannotWriteFile`] if the file cannot be created or written
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> HpoResult<()> {
        let filename = path.as_ref().display().to_string();
        let file = File::create(path).map_err(|_| HpoError::CannotWriteFile(filename.clone()))?;
        self.write(BufWriter::new(file))
            .map_err(|_| HpoError::CannotWriteFile(filename))
    }

    /// Fails if any problem blocks the output
    ///
    /// # Errors
    ///
    /// [`HpoError::QcFailed`] with the number of blocking problems
    pub fn gate(&self) -> HpoResult<()> {
        let mut count = 0;
        for err in self.fatal() {
            error!("{err}");
            count += 1;
        }
        if count > 0 {
            return Err(HpoError::QcFailed(count));
        }
        Ok(())
    }
}

impl Extend<ReportedError> for ErrorReport {
    fn extend<T: IntoIterator<Item = ReportedError>>(&mut self, iter: T) {
        self.errors.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ErrorReport {
    type Item = &'a ReportedError;
    type IntoIter = std::slice::Iter<'a, ReportedError>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
