//! Request identifiers: the opaque storage id and the human-readable number.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, stable request identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Errors returned when a request number is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestNumberError {
    /// The prefix was empty or contained whitespace.
    #[error("request number prefix must be non-empty and contain no whitespace")]
    InvalidPrefix,
    /// The value did not have the `<prefix>-<year>-<sequence>` shape.
    #[error("request number `{value}` must look like PREFIX-YYYY-NNN")]
    Malformed {
        /// The rejected input.
        value: String,
    },
}

/// Human-readable request number, e.g. `REQ-2024-001`.
///
/// # Examples
/// ```
/// use moveitright::domain::RequestNumber;
///
/// let number = RequestNumber::compose("REQ", 2024, 7).expect("valid prefix");
/// assert_eq!(number.as_str(), "REQ-2024-007");
/// assert_eq!(number.sequence(), 7);
/// let acd = number.with_prefix("ACD").expect("valid prefix");
/// assert_eq!(acd.as_str(), "ACD-2024-007");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequestNumber {
    value: String,
    year: i32,
    sequence: u32,
}

impl RequestNumber {
    /// Build a number from its parts; sequences are zero padded to three
    /// digits.
    pub fn compose(prefix: &str, year: i32, sequence: u32) -> Result<Self, RequestNumberError> {
        validate_prefix(prefix)?;
        Ok(Self {
            value: format!("{prefix}-{year:04}-{sequence:03}"),
            year,
            sequence,
        })
    }

    /// Parse a stored number.
    pub fn parse(value: impl Into<String>) -> Result<Self, RequestNumberError> {
        let value = value.into();
        let malformed = || RequestNumberError::Malformed {
            value: value.clone(),
        };
        let mut parts = value.rsplitn(3, '-');
        let sequence_part = parts.next().ok_or_else(malformed)?;
        let year_part = parts.next().ok_or_else(malformed)?;
        let prefix = parts.next().ok_or_else(malformed)?;
        if validate_prefix(prefix).is_err()
            || year_part.len() != 4
            || sequence_part.is_empty()
            || !year_part.bytes().all(|b| b.is_ascii_digit())
            || !sequence_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }
        let year = year_part.parse().map_err(|_| malformed())?;
        let sequence = sequence_part.parse().map_err(|_| malformed())?;
        Ok(Self {
            value,
            year,
            sequence,
        })
    }

    /// Borrow the number as text.
    pub fn as_str(&self) -> &str {
        self.value.as_str()
    }

    /// Calendar year the number was issued in.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Per-year sequence.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// The same year and sequence under another prefix (used for the asset
    /// collection document number).
    pub fn with_prefix(&self, prefix: &str) -> Result<Self, RequestNumberError> {
        Self::compose(prefix, self.year, self.sequence)
    }
}

fn validate_prefix(prefix: &str) -> Result<(), RequestNumberError> {
    if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
        return Err(RequestNumberError::InvalidPrefix);
    }
    Ok(())
}

impl AsRef<str> for RequestNumber {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RequestNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl TryFrom<String> for RequestNumber {
    type Error = RequestNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<RequestNumber> for String {
    fn from(value: RequestNumber) -> Self {
        value.value
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("REQ-2024-001", 2024, 1)]
    #[case("REQ-2025-1042", 2025, 1042)]
    #[case("ACME-REQ-2024-017", 2024, 17)]
    fn parses_stored_numbers(#[case] input: &str, #[case] year: i32, #[case] sequence: u32) {
        let number = RequestNumber::parse(input).expect("valid number");
        assert_eq!(number.year(), year);
        assert_eq!(number.sequence(), sequence);
        assert_eq!(number.as_str(), input);
    }

    #[rstest]
    #[case("REQ-24-001")]
    #[case("REQ-2024-")]
    #[case("2024-001")]
    #[case("REQ-2024-00a")]
    #[case("")]
    fn rejects_malformed_numbers(#[case] input: &str) {
        assert!(matches!(
            RequestNumber::parse(input),
            Err(RequestNumberError::Malformed { .. })
        ));
    }

    #[rstest]
    #[case("")]
    #[case("R Q")]
    fn compose_rejects_bad_prefix(#[case] prefix: &str) {
        assert_eq!(
            RequestNumber::compose(prefix, 2024, 1),
            Err(RequestNumberError::InvalidPrefix)
        );
    }

    #[rstest]
    fn serde_uses_plain_string() {
        let number = RequestNumber::compose("REQ", 2024, 12).expect("valid");
        let json = serde_json::to_string(&number).expect("serialize");
        assert_eq!(json, "\"REQ-2024-012\"");
        let parsed: RequestNumber = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, number);
    }

    #[rstest]
    fn request_id_parses_uuid_text() {
        let id = RequestId::random();
        let parsed: RequestId = id.to_string().parse().expect("uuid");
        assert_eq!(parsed, id);
    }
}
