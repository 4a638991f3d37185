//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., well-formed client
//! identifiers, normalized/validated email) so that once a value reaches the
//! domain layer it can be treated as trusted.
use std::{ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided client identifier is not `C` followed by eight hex digits.
    #[error("client id must be 'C' followed by 8 hex characters")]
    InvalidClientId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Mobile number contained characters other than digits and separators.
    #[error("invalid mobile number")]
    InvalidPhone,
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

const CLIENT_ID_PREFIX: char = 'C';
const CLIENT_ID_HEX_LEN: usize = 8;

/// Public identifier of a client record: `C` followed by 8 lowercase hex characters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(String);

impl ClientId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(format!("{CLIENT_ID_PREFIX}{}", &hex[..CLIENT_ID_HEX_LEN]))
    }

    /// Validates a caller supplied identifier.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into().trim().to_string();
        let Some(hex) = value.strip_prefix(CLIENT_ID_PREFIX) else {
            return Err(TypeConstraintError::InvalidClientId);
        };
        let valid = hex.len() == CLIENT_ID_HEX_LEN
            && hex
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        if valid {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::InvalidClientId)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClientId {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ClientId {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientId> for String {
    fn from(value: ClientId) -> Self {
        value.0
    }
}

/// General email wrapper for client contact addresses.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ClientEmail(String);

impl ClientEmail {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ClientEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ClientEmail {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientEmail> for String {
    fn from(value: ClientEmail) -> Self {
        value.0
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(
    SalesRepId,
    "Identifier of the sales rep owning a client, as issued by the auth backend."
);

non_empty_string_newtype!(
    CustomerType,
    "Customer category (individual, corporate, ...) enforcing non-empty values."
);

non_empty_string_newtype!(
    ProductName,
    "Insurance product name enforcing non-empty values."
);

non_empty_string_newtype!(
    InsuranceProvider,
    "Insurer name enforcing non-empty values."
);

non_empty_string_newtype!(
    ClientName,
    "Customer name wrapper enforcing non-empty values."
);

/// Mobile number kept as entered, restricted to digits and common separators.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MobileNumber(String);

impl MobileNumber {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let inner = NonEmptyString::new(value)?.into_inner();
        let allowed = inner
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
        if !allowed || !inner.chars().any(|c| c.is_ascii_digit()) {
            return Err(TypeConstraintError::InvalidPhone);
        }
        Ok(Self(inner))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for MobileNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MobileNumber> for String {
    fn from(value: MobileNumber) -> Self {
        value.0
    }
}

/// Free-form remarks with HTML stripped down to a safe subset.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Remarks(String);

impl Remarks {
    /// Constructs a sanitized, trimmed, non-empty value.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let sanitized = ammonia::clean(&value.into());
        let inner = NonEmptyString::new(sanitized)?;
        Ok(Self(inner.into_inner()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_client_ids_are_well_formed() {
        for _ in 0..100 {
            let id = ClientId::generate();
            assert_eq!(id.as_str().len(), 9);
            assert!(ClientId::new(id.as_str()).is_ok(), "{id} rejected");
        }
    }

    #[test]
    fn client_id_rejects_malformed_values() {
        assert_eq!(
            ClientId::new("D1234abcd"),
            Err(TypeConstraintError::InvalidClientId)
        );
        assert_eq!(
            ClientId::new("C1234ABCD"),
            Err(TypeConstraintError::InvalidClientId)
        );
        assert_eq!(
            ClientId::new("C1234abc"),
            Err(TypeConstraintError::InvalidClientId)
        );
        assert!(ClientId::new(" C1234abcd ").is_ok());
    }

    #[test]
    fn client_email_is_normalized() {
        let email = ClientEmail::new("  John@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "john@example.com");
        assert_eq!(
            ClientEmail::new("not-an-email"),
            Err(TypeConstraintError::InvalidEmail)
        );
    }

    #[test]
    fn required_strings_reject_blank_input() {
        assert_eq!(ClientName::new("   "), Err(TypeConstraintError::EmptyString));
        assert_eq!(ClientName::new(" Acme ").unwrap().as_str(), "Acme");
    }

    #[test]
    fn mobile_number_accepts_common_formats() {
        assert!(MobileNumber::new("9876543210").is_ok());
        assert!(MobileNumber::new("+91 98765-43210").is_ok());
        assert_eq!(
            MobileNumber::new("call me"),
            Err(TypeConstraintError::InvalidPhone)
        );
        assert_eq!(MobileNumber::new(""), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn remarks_are_sanitized() {
        let remarks = Remarks::new("<script>alert(1)</script>Prefers calls").unwrap();
        assert_eq!(remarks.as_str(), "Prefers calls");
    }
}
