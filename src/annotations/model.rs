use crate::annotations::{AnnotationEntry, DiseaseDatabase, DiseaseId, SourceFormat};
use crate::validation::HpoaError;

/// All annotations of one disease
///
/// For small files, a model corresponds to one file. Merging creates
/// a new model and never modifies the original one.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationModel {
    basename: String,
    source: SourceFormat,
    entries: Vec<AnnotationEntry>,
}

impl AnnotationModel {
    /// Constructs a new model
    ///
    /// All entries must belong to the disease of the first entry. Entries of
    /// other diseases receive an [`HpoaError::InconsistentDiseaseId`].
    pub fn new(basename: String, source: SourceFormat, mut entries: Vec<AnnotationEntry>) -> Self {
        if let Some(expected) = entries.first().map(|entry| entry.disease_id().clone()) {
            for entry in entries.iter_mut().skip(1) {
                if entry.disease_id() != &expected {
                    let found = entry.disease_id().to_string();
                    entry.add_error(HpoaError::InconsistentDiseaseId {
                        found,
                        expected: expected.to_string(),
                    });
                }
            }
        }
        Self {
            basename,
            source,
            entries,
        }
    }

    /// Returns a new model of the same disease with other entries
    pub(crate) fn with_entries(&self, entries: Vec<AnnotationEntry>) -> Self {
        Self {
            basename: self.basename.clone(),
            source: self.source,
            entries,
        }
    }

    /// The file name of the model, e.g. `OMIM-100050.tab`
    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// Where the annotations come from
    pub fn source(&self) -> SourceFormat {
        self.source
    }

    /// The disease of the model, `None` if the model has no entries
    pub fn disease_id(&self) -> Option<&DiseaseId> {
        self.entries.first().map(AnnotationEntry::disease_id)
    }

    /// The database of the disease
    pub fn database(&self) -> DiseaseDatabase {
        self.disease_id()
            .map_or(DiseaseDatabase::Unknown, DiseaseId::database)
    }

    /// The disease name of the first entry
    pub fn disease_name(&self) -> Option<&str> {
        self.entries.first().map(AnnotationEntry::disease_name)
    }

    /// The entries in their original order
    pub fn entries(&self) -> &[AnnotationEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the model has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if any entry has an error, notices are ignored
    pub fn has_error(&self) -> bool {
        self.entries.iter().any(AnnotationEntry::has_error)
    }

    /// Iterates all problems of all entries, including notices
    pub fn errors(&self) -> impl Iterator<Item = (&AnnotationEntry, &HpoaError)> {
        self.entries
            .iter()
            .flat_map(|entry| entry.errors().iter().map(move |err| (entry, err)))
    }

    /// The key used to order models in reports and the big file
    pub(crate) fn sort_key(&self) -> &str {
        self.disease_id()
            .map_or(self.basename.as_str(), DiseaseId::as_str)
    }
}
