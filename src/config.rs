//! Settings that change how strict quality control is
use std::path::{Path, PathBuf};

/// How to handle alternative or obsolete term ids and stale term labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObsoleteIdPolicy {
    /// Alternative ids and outdated labels are errors
    #[default]
    Strict,
    /// Rewrite to the primary id and current label and report a notice
    Replace,
}

/// How to handle citations with a lower-case prefix, e.g. `pmid:123`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CitationPolicy {
    /// Lower-case prefixes are malformed citations
    #[default]
    Strict,
    /// Upper-case the prefix and report a notice
    RepairPrefixCase,
}

/// Configuration of the quality control run
///
/// ```
/// use hpoa_qc::{CitationPolicy, ObsoleteIdPolicy, QcConfig};
///
/// let config = QcConfig::default()
///     .with_obsolete_ids(ObsoleteIdPolicy::Replace)
///     .with_citations(CitationPolicy::RepairPrefixCase)
///     .with_merge_entries(false);
///
/// assert_eq!(config.obsolete_ids(), ObsoleteIdPolicy::Replace);
/// assert!(!config.merge_entries());
/// assert_eq!(config.error_report().to_str(), Some("HPOA-errors.txt"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QcConfig {
    obsolete_ids: ObsoleteIdPolicy,
    citations: CitationPolicy,
    merge_entries: bool,
    omit_list: Option<PathBuf>,
    error_report: PathBuf,
}

impl Default for QcConfig {
    fn default() -> Self {
        Self {
            obsolete_ids: ObsoleteIdPolicy::default(),
            citations: CitationPolicy::default(),
            merge_entries: true,
            omit_list: None,
            error_report: PathBuf::from(crate::ERROR_REPORT_FILENAME),
        }
    }
}

impl QcConfig {
    /// Sets the policy for alternative and obsolete term ids
    pub fn with_obsolete_ids(mut self, policy: ObsoleteIdPolicy) -> Self {
        self.obsolete_ids = policy;
        self
    }

    /// Sets the policy for lower-case citation prefixes
    pub fn with_citations(mut self, policy: CitationPolicy) -> Self {
        self.citations = policy;
        self
    }

    /// Enables or disables merging of entries with the same phenotype
    pub fn with_merge_entries(mut self, merge: bool) -> Self {
        self.merge_entries = merge;
        self
    }

    /// Sets the path to the omit list
    ///
    /// Without an explicit path, `omit-list.txt` inside the small file
    /// directory is used if it exists.
    pub fn with_omit_list<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.omit_list = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the path of the error report
    pub fn with_error_report<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.error_report = path.as_ref().to_path_buf();
        self
    }

    /// The policy for alternative and obsolete term ids
    pub fn obsolete_ids(&self) -> ObsoleteIdPolicy {
        self.obsolete_ids
    }

    /// The policy for lower-case citation prefixes
    pub fn citations(&self) -> CitationPolicy {
        self.citations
    }

    /// Whether entries with the same phenotype are merged
    pub fn merge_entries(&self) -> bool {
        self.merge_entries
    }

    /// The explicitly configured omit list
    pub fn omit_list(&self) -> Option<&Path> {
        self.omit_list.as_deref()
    }

    /// The path of the error report
    pub fn error_report(&self) -> &Path {
        &self.error_report
    }
}
