use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::{HpoError, HpoResult};

/// Disease CURIEs that must be excluded from ingestion
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OmitList {
    diseases: HashSet<String>,
}

impl OmitList {
    /// Reads the omit list file
    ///
    /// # Errors
    ///
    /// [`HpoError::CannotOpenFile`] if the file cannot be read
    pub fn from_file<P: AsRef<Path>>(path: P) -> HpoResult<Self> {
        let filename = path.as_ref().display().to_string();
        let content = fs::read_to_string(path).map_err(|_| HpoError::CannotOpenFile(filename))?;
        Ok(Self::parse(&content))
    }

    /// Parses the content of an omit list
    ///
    /// Lines starting with `#` and empty lines are ignored, otherwise the
    /// first whitespace separated token is the disease CURIE.
    ///
    /// ```
    /// use hpoa_qc::parser::omit_list::OmitList;
    ///
    /// let omit = OmitList::parse("# obsolete entries\nOMIM:600123 moved\n\nOMIM:100100\n");
    /// assert!(omit.contains("OMIM:600123"));
    /// assert!(omit.contains("OMIM:100100"));
    /// assert_eq!(omit.len(), 2);
    /// ```
    pub fn parse(content: &str) -> Self {
        let diseases = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string)
            .collect();
        Self { diseases }
    }

    /// Returns `true` if the disease must be omitted
    pub fn contains(&self, curie: &str) -> bool {
        self.diseases.contains(curie)
    }

    /// Number of omitted diseases
    pub fn len(&self) -> usize {
        self.diseases.len()
    }

    /// Returns `true` if no disease is omitted
    pub fn is_empty(&self) -> bool {
        self.diseases.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn comments_and_whitespace() {
        let omit = OmitList::parse("#OMIM:1\n  OMIM:2\tfoo bar\nOMIM:3 # trailing\n");
        assert!(!omit.contains("#OMIM:1"));
        assert!(!omit.contains("OMIM:1"));
        assert!(omit.contains("OMIM:2"));
        assert!(omit.contains("OMIM:3"));
        assert_eq!(omit.len(), 2);
    }

    #[test]
    fn empty_list() {
        assert!(OmitList::parse("").is_empty());
        assert!(OmitList::parse("# only comments\n").is_empty());
    }

    #[test]
    fn missing_file() {
        assert!(OmitList::from_file("tests/does-not-exist.txt").is_err());
    }
}
