//! Phone number validation and the create-call request body.

use crate::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Template variable carrying the callee's name.
pub const VAR_CUSTOMER_NAME: &str = "customer_name";
/// Template variable carrying the date the agent should treat as today.
pub const VAR_TODAY_DATE: &str = "today_date";

// ASCII digits only; `\d` would also accept other Unicode digits.
static E164: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[1-9][0-9]{1,14}$").expect("Invalid E.164 regex"));

/// A destination number that matched the E.164 pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate raw form input. Blank input and malformed input are
    /// reported separately.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::MissingPhoneNumber);
        }
        if !E164.is_match(raw) {
            return Err(ValidationError::InvalidPhoneNumber {
                value: raw.to_string(),
            });
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for PhoneNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Body of `POST /api/calls/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRequest {
    pub to_number: PhoneNumber,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_variables: Option<BTreeMap<String, String>>,
}

impl CallRequest {
    pub fn new(to_number: PhoneNumber) -> Self {
        Self {
            to_number,
            dynamic_variables: None,
        }
    }

    /// Add a template variable. Values are trimmed; blank ones are skipped.
    pub fn with_variable(mut self, name: impl Into<String>, value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            return self;
        }
        self.dynamic_variables
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_numbers() {
        for raw in ["+14155550123", "+919876543210", "+12", "+123456789012345"] {
            assert!(PhoneNumber::parse(raw).is_ok(), "{} should be valid", raw);
        }
    }

    #[test]
    fn test_invalid_numbers() {
        for raw in [
            "14155550123",
            "+04155550123",
            "+1",
            "+1234567890123456",
            "+1 415 555 0123",
            " +14155550123",
            "+1415555012a",
        ] {
            assert!(
                matches!(
                    PhoneNumber::parse(raw),
                    Err(ValidationError::InvalidPhoneNumber { .. })
                ),
                "{} should be invalid",
                raw
            );
        }
    }

    #[test]
    fn test_blank_is_missing() {
        assert_eq!(PhoneNumber::parse(""), Err(ValidationError::MissingPhoneNumber));
        assert_eq!(PhoneNumber::parse("   "), Err(ValidationError::MissingPhoneNumber));
    }

    #[test]
    fn test_request_without_variables() {
        let request = CallRequest::new(PhoneNumber::parse("+14155550123").unwrap());
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, json!({ "to_number": "+14155550123" }));
    }

    #[test]
    fn test_blank_variables_dropped() {
        let request = CallRequest::new(PhoneNumber::parse("+14155550123").unwrap())
            .with_variable(VAR_CUSTOMER_NAME, "  ")
            .with_variable(VAR_TODAY_DATE, "");
        assert!(request.dynamic_variables.is_none());
    }

    #[test]
    fn test_variables_trimmed() {
        let request = CallRequest::new(PhoneNumber::parse("+14155550123").unwrap())
            .with_variable(VAR_CUSTOMER_NAME, "  Ada Lovelace ")
            .with_variable(VAR_TODAY_DATE, "2026-10-19");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "to_number": "+14155550123",
                "dynamic_variables": {
                    "customer_name": "Ada Lovelace",
                    "today_date": "2026-10-19"
                }
            })
        );
    }
}
