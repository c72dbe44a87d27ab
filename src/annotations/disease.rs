use std::fmt::Display;

use crate::validation::{Checked, HpoaError};

/// The disease databases whose identifiers are used in small files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiseaseDatabase {
    /// `OMIM`
    Omim,
    /// `ORPHA`
    Orphanet,
    /// `DECIPHER`
    Decipher,
    /// any other prefix
    Unknown,
}

impl DiseaseDatabase {
    fn from_prefix(prefix: &str) -> Self {
        match prefix {
            "OMIM" => DiseaseDatabase::Omim,
            "ORPHA" => DiseaseDatabase::Orphanet,
            "DECIPHER" => DiseaseDatabase::Decipher,
            _ => DiseaseDatabase::Unknown,
        }
    }
}

impl Display for DiseaseDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiseaseDatabase::Omim => write!(f, "OMIM"),
            DiseaseDatabase::Orphanet => write!(f, "ORPHA"),
            DiseaseDatabase::Decipher => write!(f, "DECIPHER"),
            DiseaseDatabase::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A disease CURIE, e.g. `OMIM:100050`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiseaseId {
    curie: String,
    database: DiseaseDatabase,
}

impl DiseaseId {
    /// Validates a disease CURIE
    ///
    /// Prefixes other than `OMIM`, `ORPHA` and `DECIPHER` are accepted
    /// with a [`HpoaError::UnknownDatabasePrefix`] notice.
    ///
    /// # Errors
    ///
    /// [`HpoaError::MalformedDiseaseId`] if the value is not `PREFIX:IDENTIFIER`
    ///
    /// # Examples
    ///
    /// ```
    /// use hpoa_qc::{DiseaseDatabase, DiseaseId};
    ///
    /// let id = DiseaseId::parse("OMIM:100050").unwrap().value;
    /// assert_eq!(id.database(), DiseaseDatabase::Omim);
    /// assert_eq!(id.identifier(), "100050");
    ///
    /// assert!(DiseaseId::parse("OMIM100050").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Checked<Self>, HpoaError> {
        let malformed = || HpoaError::MalformedDiseaseId {
            value: raw.to_string(),
        };
        let (prefix, id) = raw.split_once(':').ok_or_else(malformed)?;
        if prefix.is_empty()
            || id.is_empty()
            || id.contains(':')
            || raw.contains(char::is_whitespace)
        {
            return Err(malformed());
        }
        let disease = DiseaseId {
            curie: raw.to_string(),
            database: DiseaseDatabase::from_prefix(prefix),
        };
        if disease.database == DiseaseDatabase::Unknown {
            return Ok(Checked::with_notice(
                disease,
                HpoaError::UnknownDatabasePrefix {
                    value: raw.to_string(),
                },
            ));
        }
        Ok(Checked::new(disease))
    }

    /// Placeholder for entries whose disease id is malformed
    pub(crate) fn invalid(raw: &str) -> Self {
        DiseaseId {
            curie: raw.to_string(),
            database: DiseaseDatabase::Unknown,
        }
    }

    /// The database of the disease
    pub fn database(&self) -> DiseaseDatabase {
        self.database
    }

    /// The identifier part of the CURIE
    pub fn identifier(&self) -> &str {
        self.curie.split_once(':').map_or("", |(_, id)| id)
    }

    /// The complete CURIE
    pub fn as_str(&self) -> &str {
        &self.curie
    }
}

impl Display for DiseaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.curie)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn known_databases() {
        for (raw, db) in [
            ("OMIM:100050", DiseaseDatabase::Omim),
            ("ORPHA:558", DiseaseDatabase::Orphanet),
            ("DECIPHER:17", DiseaseDatabase::Decipher),
        ] {
            let checked = DiseaseId::parse(raw).expect("valid disease id");
            assert_eq!(checked.value.database(), db);
            assert!(checked.notices.is_empty());
        }
    }

    #[test]
    fn unknown_database_is_a_notice() {
        let checked = DiseaseId::parse("MONDO:0007037").expect("well formed");
        assert_eq!(checked.value.database(), DiseaseDatabase::Unknown);
        assert_eq!(
            checked.notices,
            vec![HpoaError::UnknownDatabasePrefix {
                value: "MONDO:0007037".to_string()
            }]
        );
    }

    #[test]
    fn malformed() {
        for raw in ["", "OMIM", "OMIM:", ":100050", "OMIM:1:2", "OMIM: 100050"] {
            assert_eq!(
                DiseaseId::parse(raw).unwrap_err(),
                HpoaError::MalformedDiseaseId {
                    value: raw.to_string()
                }
            );
        }
    }

    #[test]
    fn ordering_by_curie() {
        let a = DiseaseId::parse("OMIM:100050").unwrap().value;
        let b = DiseaseId::parse("OMIM:200050").unwrap().value;
        assert!(a < b);
    }
}
