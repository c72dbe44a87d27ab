use core::fmt::Debug;
use std::fmt::Display;

use crate::{HpoError, HpoResult, MAX_HPO_ID_INTEGER};

/// The identifier of an HPO term, e.g. `HP:0000118`
///
/// Only the integer part is stored. The string representation
/// is always the `HP:` prefix followed by 7 zero-padded digits.
#[derive(Clone, Copy, Default, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct HpoTermId {
    inner: u32,
}

impl HpoTermId {
    /// Constructs a new [`HpoTermId`] from its integer part
    ///
    /// # Examples
    ///
    /// ```
    /// use hpoa_qc::HpoTermId;
    ///
    /// let term = HpoTermId::from_u32(118);
    /// assert_eq!(term.to_string(), "HP:0000118");
    /// ```
    pub const fn from_u32(inner: u32) -> Self {
        Self { inner }
    }

    /// Returns the integer representation of the term id
    pub fn as_u32(&self) -> u32 {
        self.inner
    }

    /// Returns the memory representation of the inner integer as big-endian bytes
    pub fn to_be_bytes(&self) -> [u8; 4] {
        self.inner.to_be_bytes()
    }
}

impl TryFrom<&str> for HpoTermId {
    type Error = HpoError;
    /// Parses a CURIE such as `HP:0001250`
    ///
    /// # Errors
    ///
    /// - [`HpoError::InvalidInput`]: No `HP:` prefix or not exactly 7 digits
    /// - [`HpoError::ParseIntError`]: The id contains non-digit characters
    ///
    /// # Examples
    ///
    /// ```
    /// use hpoa_qc::HpoTermId;
    ///
    /// assert!(HpoTermId::try_from("HP:0001250").is_ok());
    /// assert!(HpoTermId::try_from("HP0001250").is_err());
    /// assert!(HpoTermId::try_from("HP:123").is_err());
    /// assert!(HpoTermId::try_from("MP:0001250").is_err());
    /// ```
    fn try_from(s: &str) -> HpoResult<Self> {
        let Some(digits) = s.strip_prefix("HP:") else {
            return Err(HpoError::InvalidInput(s.to_string()));
        };
        if digits.len() != 7 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HpoError::InvalidInput(s.to_string()));
        }
        let inner = digits.parse::<u32>()?;
        if inner >= MAX_HPO_ID_INTEGER {
            return Err(HpoError::InvalidInput(s.to_string()));
        }
        Ok(HpoTermId { inner })
    }
}

impl From<u32> for HpoTermId {
    fn from(inner: u32) -> Self {
        Self { inner }
    }
}

impl From<[u8; 4]> for HpoTermId {
    fn from(bytes: [u8; 4]) -> Self {
        Self {
            inner: u32::from_be_bytes(bytes),
        }
    }
}

impl Debug for HpoTermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HpoTermId({self})")
    }
}

impl Display for HpoTermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HP:{:07}", self.inner)
    }
}

impl PartialEq<str> for HpoTermId {
    fn eq(&self, other: &str) -> bool {
        HpoTermId::try_from(other).map_or(false, |other| *self == other)
    }
}

impl PartialEq<&str> for HpoTermId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(HpoTermId::from(1u32).to_string(), "HP:0000001");
        assert_eq!(HpoTermId::from(6315u32).to_string(), "HP:0006315");
        assert_eq!(HpoTermId::from(1234567u32).to_string(), "HP:1234567");
    }

    #[test]
    fn parse_valid_curie() {
        let id = HpoTermId::try_from("HP:0001250").expect("valid term id");
        assert_eq!(id.as_u32(), 1250);
        assert_eq!(id, "HP:0001250");
    }

    #[test]
    fn parse_rejects_wrong_prefix() {
        assert!(HpoTermId::try_from("hp:0001250").is_err());
        assert!(HpoTermId::try_from("OMIM:100050").is_err());
        assert!(HpoTermId::try_from("0001250").is_err());
    }

    #[test]
    fn parse_rejects_wrong_width() {
        assert!(HpoTermId::try_from("HP:00012500").is_err());
        assert!(HpoTermId::try_from("HP:000125").is_err());
        assert!(HpoTermId::try_from("HP:00012a0").is_err());
        assert!(HpoTermId::try_from("HP:").is_err());
    }

    #[test]
    fn compare_with_str() {
        let id = HpoTermId::from(118u32);
        assert!(id == "HP:0000118");
        assert!(id != "HP:0000119");
        assert!(id != "foobar");
    }
}
