use crate::error::ValidationError;
use serde::Serialize;
use std::fmt::Display;
use std::ops::Deref;

/// Names are stored behind a one byte length prefix.
pub const NAME_CAPACITY: usize = u8::MAX as usize;

/// Table or field name. Trimmed, never blank, never longer than
/// [`NAME_CAPACITY`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Name(Box<str>);

impl Name {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Self::try_from(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Name {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Name {
    type Error = ValidationError;

    /// Surrounding whitespace is dropped before any check.
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if trimmed.len() > NAME_CAPACITY {
            return Err(ValidationError::NameTooLong(trimmed.to_owned()));
        }
        let name = if trimmed.len() == value.len() {
            value
        } else {
            trimmed.to_owned()
        };
        Ok(Self(name.into_boxed_str()))
    }
}

impl TryFrom<&str> for Name {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(value.to_owned())
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_names_are_rejected() {
        assert_eq!(Name::new(""), Err(ValidationError::EmptyName));
        assert_eq!(Name::new("   "), Err(ValidationError::EmptyName));
    }

    #[test]
    fn test_name_capacity() {
        assert!(Name::new("a".repeat(NAME_CAPACITY)).is_ok());
        let long = "a".repeat(NAME_CAPACITY + 1);
        assert_eq!(
            Name::new(long.clone()),
            Err(ValidationError::NameTooLong(long))
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_dropped() {
        let name = Name::new("  users \t").unwrap();
        assert_eq!(name, "users");
        assert_eq!(Name::new(" id").unwrap(), Name::new("id").unwrap());

        let padded = format!(" {} ", "a".repeat(NAME_CAPACITY));
        assert!(Name::new(padded).is_ok());
    }

    #[test]
    fn test_name_keeps_text() {
        let name = Name::new("value_a").unwrap();
        assert_eq!(name, "value_a");
        assert_eq!(name.to_string(), "value_a");
    }
}
