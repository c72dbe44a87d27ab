use std::fmt::Display;
use std::sync::LazyLock;

use regex::Regex;

use crate::ontology::OntologyGateway;
use crate::validation::{FrequencyErrorKind, HpoaError};
use crate::{hpo_ids, HpoTermId};

static RATIO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)/(\d+)$").expect("ratio pattern is valid"));
static PERCENTAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d*\.?\d+)%$").expect("percentage pattern is valid"));
static TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^HP:\d{7}$").expect("term pattern is valid"));

/// The frequency of a phenotype in the patients of a disease
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FrequencyModifier {
    /// No frequency information
    #[default]
    Empty,
    /// Observed in `n` out of `m` patients
    Ratio {
        /// number of patients with the phenotype
        n: u32,
        /// number of examined patients
        m: u32,
    },
    /// Observed in a percentage of patients
    Percentage {
        /// the percentage, `0 < value <= 100`
        value: f64,
        /// the original spelling, e.g. `12.5%`
        raw: String,
    },
    /// A descendant of `Frequency` (`HP:0040279`)
    Term(HpoTermId),
}

impl FrequencyModifier {
    /// Validates a raw frequency field
    ///
    /// # Errors
    ///
    /// [`HpoaError::InvalidFrequency`] for all non-empty values that are
    /// not a valid fraction, percentage or frequency term
    ///
    /// # Examples
    ///
    /// ```
    /// use hpoa_qc::{FrequencyModifier, Ontology};
    ///
    /// let ontology = Ontology::default();
    /// assert_eq!(
    ///     FrequencyModifier::parse("2/4", &ontology),
    ///     Ok(FrequencyModifier::Ratio { n: 2, m: 4 })
    /// );
    /// assert!(FrequencyModifier::parse("5/4", &ontology).is_err());
    /// assert!(FrequencyModifier::parse("0%", &ontology).is_err());
    /// ```
    pub fn parse<O: OntologyGateway + ?Sized>(raw: &str, ontology: &O) -> Result<Self, HpoaError> {
        let invalid = |kind| HpoaError::InvalidFrequency {
            value: raw.to_string(),
            kind,
        };
        if raw.is_empty() {
            return Ok(Self::Empty);
        }
        if let Some(caps) = RATIO.captures(raw) {
            let n: u32 = caps[1]
                .parse()
                .map_err(|_| invalid(FrequencyErrorKind::Malformed))?;
            let m: u32 = caps[2]
                .parse()
                .map_err(|_| invalid(FrequencyErrorKind::Malformed))?;
            if m == 0 || n > m {
                return Err(invalid(FrequencyErrorKind::InvalidFraction));
            }
            return Ok(Self::Ratio { n, m });
        }
        if let Some(caps) = PERCENTAGE.captures(raw) {
            let value: f64 = caps[1]
                .parse()
                .map_err(|_| invalid(FrequencyErrorKind::Malformed))?;
            if value <= 0.0 || value > 100.0 {
                return Err(invalid(FrequencyErrorKind::InvalidPercentage));
            }
            return Ok(Self::Percentage {
                value,
                raw: raw.to_string(),
            });
        }
        if TERM.is_match(raw) {
            let id =
                HpoTermId::try_from(raw).map_err(|_| invalid(FrequencyErrorKind::Malformed))?;
            if ontology.exists_path(id, hpo_ids::FREQUENCY) {
                return Ok(Self::Term(id));
            }
            return Err(invalid(FrequencyErrorKind::InvalidSubontology));
        }
        Err(invalid(FrequencyErrorKind::Malformed))
    }

    /// Returns `true` if no frequency is specified
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl Display for FrequencyModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Ratio { n, m } => write!(f, "{n}/{m}"),
            Self::Percentage { raw, .. } => f.write_str(raw),
            Self::Term(id) => write!(f, "{id}"),
        }
    }
}
