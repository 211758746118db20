//! Validated text primitives shared across the orderbridge crates.
//!
//! Order numbers, display strings and FHIR logical ids all arrive as free text from the
//! EHR side. Wrapping them once at the boundary keeps the translation code free of
//! repeated emptiness and format checks.

use std::fmt;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// The input is longer than the 64 characters a FHIR id allows
    #[error("FHIR id exceeds 64 characters: {0}")]
    IdTooLong(usize),

    /// The input contains a character outside `[A-Za-z0-9.-]`
    #[error("FHIR id contains invalid character {0:?}")]
    IdInvalidChar(char),
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Maximum length of a FHIR logical id.
pub const FHIR_ID_MAX_LEN: usize = 64;

/// A FHIR logical id: 1 to 64 characters drawn from `[A-Za-z0-9.-]`.
///
/// Hyphenated UUIDs (the EHR's native identifiers) always satisfy this, so an order's uuid
/// can be carried straight into `ServiceRequest.id` and `ServiceRequest/{id}` references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FhirId(String);

impl FhirId {
    /// Validates `input` as a FHIR logical id.
    ///
    /// Unlike [`NonEmptyText`] this does not trim: surrounding whitespace is an invalid
    /// character, not padding.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`], [`TextError::IdTooLong`] or [`TextError::IdInvalidChar`].
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let input = input.as_ref();
        if input.is_empty() {
            return Err(TextError::Empty);
        }
        let len = input.chars().count();
        if len > FHIR_ID_MAX_LEN {
            return Err(TextError::IdTooLong(len));
        }
        if let Some(bad) = input
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
        {
            return Err(TextError::IdInvalidChar(bad));
        }
        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<uuid::Uuid> for FhirId {
    /// Hyphenated lowercase form, which is always a valid FHIR id.
    fn from(id: uuid::Uuid) -> Self {
        Self(id.hyphenated().to_string())
    }
}

impl fmt::Display for FhirId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FhirId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for FhirId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for FhirId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FhirId::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_and_rejects_blank() {
        let text = NonEmptyText::new("  ORD-1 ").expect("should accept padded text");
        assert_eq!(text.as_str(), "ORD-1");

        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
    }

    #[test]
    fn fhir_id_accepts_hyphenated_uuid() {
        let id = FhirId::new("4e4851c3-c265-400e-acc9-1f1b0ac7f9c4").expect("uuid is a valid id");
        assert_eq!(id.to_string(), "4e4851c3-c265-400e-acc9-1f1b0ac7f9c4");
    }

    #[test]
    fn fhir_id_from_uuid_is_hyphenated() {
        let uuid = uuid::Uuid::parse_str("efca4077493c496b8312856ee5d1cc27").expect("valid uuid");
        assert_eq!(
            FhirId::from(uuid).as_str(),
            "efca4077-493c-496b-8312-856ee5d1cc27"
        );
    }

    #[test]
    fn fhir_id_rejects_bad_input() {
        assert_eq!(FhirId::new(""), Err(TextError::Empty));
        assert_eq!(FhirId::new("a/b"), Err(TextError::IdInvalidChar('/')));
        assert_eq!(FhirId::new(" a"), Err(TextError::IdInvalidChar(' ')));
        assert_eq!(FhirId::new("x".repeat(65)), Err(TextError::IdTooLong(65)));
        assert!(FhirId::new("x".repeat(64)).is_ok());
    }

    #[test]
    fn deserialize_validates() {
        let ok: NonEmptyText = serde_json::from_str("\"ORD-2\"").expect("valid text");
        assert_eq!(ok.as_str(), "ORD-2");

        let err = serde_json::from_str::<FhirId>("\"has space\"").expect_err("invalid id");
        assert!(err.to_string().contains("invalid character"));
    }
}
