/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
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

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
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

/// Minimum length of a service phone number, not counting a leading `+`.
pub const MIN_PHONE_LENGTH: usize = 10;

/// Errors that can occur when creating a [`ServicePhone`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PhoneError {
    #[error("Phone number cannot be empty")]
    Empty,
    /// Only an optional leading `+` followed by digits, whitespace and hyphens is accepted.
    #[error("Phone number contains invalid characters")]
    InvalidCharacters,
    #[error("Phone number must be at least {MIN_PHONE_LENGTH} characters long")]
    TooShort,
}

/// A phone number attached to a clinic service.
///
/// Accepts an optional leading `+`, then at least [`MIN_PHONE_LENGTH`] characters of digits,
/// whitespace and hyphens. Separators count towards the length. The value keeps the caller's
/// formatting (trimmed); display formatting happens elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePhone(String);

impl ServicePhone {
    pub fn new(input: impl AsRef<str>) -> Result<Self, PhoneError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if !body
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || c == '-')
        {
            return Err(PhoneError::InvalidCharacters);
        }

        if body.chars().count() < MIN_PHONE_LENGTH {
            return Err(PhoneError::TooShort);
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ServicePhone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ServicePhone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for ServicePhone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for ServicePhone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ServicePhone::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Riverside Clinic ").expect("should accept");
        assert_eq!(text.as_str(), "Riverside Clinic");
    }

    #[test]
    fn test_non_empty_text_rejects_whitespace_only() {
        assert!(matches!(NonEmptyText::new("   "), Err(TextError::Empty)));
    }

    #[test]
    fn test_service_phone_accepts_international_format() {
        let phone = ServicePhone::new("+1 555-123-4567").expect("should accept");
        assert_eq!(phone.as_str(), "+1 555-123-4567");
    }

    #[test]
    fn test_service_phone_accepts_bare_digits() {
        assert!(ServicePhone::new("5551230000").is_ok());
    }

    #[test]
    fn test_service_phone_rejects_short_number() {
        assert_eq!(ServicePhone::new("12345"), Err(PhoneError::TooShort));
    }

    #[test]
    fn test_service_phone_rejects_letters() {
        assert_eq!(ServicePhone::new("abc"), Err(PhoneError::InvalidCharacters));
        assert_eq!(
            ServicePhone::new("555-CALL-NOW"),
            Err(PhoneError::InvalidCharacters)
        );
    }

    #[test]
    fn test_service_phone_rejects_plus_in_middle() {
        assert_eq!(
            ServicePhone::new("555+1234567890"),
            Err(PhoneError::InvalidCharacters)
        );
    }

    #[test]
    fn test_service_phone_length_counts_separators() {
        assert!(ServicePhone::new("123-456-789").is_ok());
        assert!(ServicePhone::new("555 12 34 5").is_ok());
        assert!(ServicePhone::new("12 - - - - 3").is_ok());
        assert_eq!(ServicePhone::new("+123-45-67"), Err(PhoneError::TooShort));
    }

    #[test]
    fn test_service_phone_deserialize_validates() {
        let err = serde_json::from_str::<ServicePhone>("\"123\"");
        assert!(err.is_err());
        let ok: ServicePhone = serde_json::from_str("\"555 123 4567\"").expect("valid phone");
        assert_eq!(ok.to_string(), "555 123 4567");
    }
}
