use std::fmt::Display;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::validation::HpoaError;

static STAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+:\w+|ORCID:\d{4}-\d{4}-\d{4}-\d{4})\[(\d{4}-\d{2}-\d{2})\]$")
        .expect("biocuration pattern is valid")
});

/// A single curator stamp, e.g. `HPO:probinson[2013-01-09]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BiocurationStamp {
    curator: String,
    date: NaiveDate,
}

impl BiocurationStamp {
    /// The curator CURIE, e.g. `HPO:probinson` or `ORCID:0000-0001-5208-3432`
    pub fn curator(&self) -> &str {
        &self.curator
    }

    /// The date of the curation
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    fn parse(item: &str) -> Option<Self> {
        let caps = STAMP.captures(item)?;
        let date = NaiveDate::parse_from_str(&caps[2], "%Y-%m-%d").ok()?;
        Some(Self {
            curator: caps[1].to_string(),
            date,
        })
    }
}

impl Display for BiocurationStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.curator, self.date.format("%Y-%m-%d"))
    }
}

/// The `;`-separated list of curator stamps of an annotation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Biocuration {
    stamps: Vec<BiocurationStamp>,
}

impl Biocuration {
    /// Validates the biocuration field
    ///
    /// A single malformed item invalidates the whole field.
    ///
    /// # Errors
    ///
    /// [`HpoaError::MalformedBiocuration`] with the complete field
    ///
    /// # Examples
    ///
    /// ```
    /// use hpoa_qc::validation::Biocuration;
    ///
    /// assert!(Biocuration::parse("HPO:probinson[2013-01-09]").is_ok());
    /// assert!(Biocuration::parse("HPOprobinson[2013-01-09]").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, HpoaError> {
        let malformed = || HpoaError::MalformedBiocuration {
            value: raw.to_string(),
        };
        if raw.is_empty() {
            return Err(malformed());
        }
        let stamps = raw
            .split(';')
            .map(BiocurationStamp::parse)
            .collect::<Option<Vec<BiocurationStamp>>>()
            .ok_or_else(malformed)?;
        Ok(Self { stamps })
    }

    /// Adds a stamp unless it is present already
    ///
    /// Returns `false` if the stamp was present
    pub fn insert(&mut self, stamp: BiocurationStamp) -> bool {
        if self.stamps.contains(&stamp) {
            return false;
        }
        self.stamps.push(stamp);
        true
    }

    /// Iterates the stamps in their original order
    pub fn iter(&self) -> std::slice::Iter<'_, BiocurationStamp> {
        self.stamps.iter()
    }

    /// Returns the number of stamps
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    /// Returns `true` if there are no stamps
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}

impl Display for Biocuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, stamp) in self.stamps.iter().enumerate() {
            if idx > 0 {
                f.write_str(";")?;
            }
            write!(f, "{stamp}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn single_stamp() {
        let bio = Biocuration::parse("HPO:probinson[2013-01-09]").expect("valid stamp");
        assert_eq!(bio.len(), 1);
        let stamp = bio.iter().next().expect("one stamp");
        assert_eq!(stamp.curator(), "HPO:probinson");
        assert_eq!(stamp.date(), NaiveDate::from_ymd_opt(2013, 1, 9).unwrap());
        assert_eq!(bio.to_string(), "HPO:probinson[2013-01-09]");
    }

    #[test]
    fn multiple_stamps() {
        let raw = "HPO:skoehler[2010-06-18];ORCID:0000-0001-5208-3432[2019-05-24]";
        let bio = Biocuration::parse(raw).expect("valid stamps");
        assert_eq!(bio.len(), 2);
        assert_eq!(bio.to_string(), raw);
    }

    #[test]
    fn missing_colon() {
        assert_eq!(
            Biocuration::parse("HPOprobinson[2013-01-09]"),
            Err(HpoaError::MalformedBiocuration {
                value: "HPOprobinson[2013-01-09]".to_string()
            })
        );
    }

    #[test]
    fn one_bad_item_names_full_field() {
        let raw = "HPO:probinson[2013-01-09];HPO:skoehler[2013-1-9]";
        assert_eq!(
            Biocuration::parse(raw),
            Err(HpoaError::MalformedBiocuration {
                value: raw.to_string()
            })
        );
    }

    #[test]
    fn invalid_values() {
        for raw in [
            "",
            "HPO:probinson",
            "HPO:probinson[2013-02-30]",
            "HPO:probinson[2013-01-09];",
            "ORCID:0000-0001-5208[2019-05-24]",
            " HPO:probinson[2013-01-09]",
        ] {
            assert!(Biocuration::parse(raw).is_err(), "{raw} must be invalid");
        }
    }

    #[test]
    fn insert_ignores_duplicates() {
        let mut bio = Biocuration::parse("HPO:probinson[2013-01-09]").expect("valid stamp");
        let other = Biocuration::parse("HPO:probinson[2013-01-09];HPO:skoehler[2014-11-27]")
            .expect("valid stamps");
        for stamp in other.iter() {
            bio.insert(stamp.clone());
        }
        assert_eq!(
            bio.to_string(),
            "HPO:probinson[2013-01-09];HPO:skoehler[2014-11-27]"
        );
    }
}
