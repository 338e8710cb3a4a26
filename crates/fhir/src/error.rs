use crate::Field;
use thiserror::Error;

/// Decode failure shared by the JSON and XML codecs.
///
/// On the JSON path it travels through `serde::de::Error::custom`, so the
/// message is what callers see inside `serde_json::Error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown field \"{field}\" in {type_name}")]
    UnknownField { field: String, type_name: String },

    #[error("multiple values for field \"{field}[x]\" in {type_name}")]
    MultipleValues { field: String, type_name: String },

    #[error("unexpected {found} for \"{field}\" in {type_name}, expected {expected}")]
    UnexpectedToken {
        field: String,
        found: String,
        expected: String,
        type_name: String,
    },

    #[error("resourceType \"{found}\" does not match expected \"{expected}\"")]
    ResourceTypeMismatch { expected: String, found: String },

    #[error("missing resourceType")]
    MissingResourceType,

    #[error("unknown resourceType \"{0}\"")]
    UnknownResourceType(String),

    #[error("invalid {type_name} value {value} for \"{field}\": {reason}")]
    InvalidValue {
        field: String,
        type_name: String,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Custom(String),
}

impl DecodeError {
    pub fn unknown_field(field: impl Into<String>, type_name: &str) -> Self {
        DecodeError::UnknownField {
            field: field.into(),
            type_name: type_name.to_string(),
        }
    }

    pub fn multiple_values(field: &str, type_name: &str) -> Self {
        DecodeError::MultipleValues {
            field: field.to_string(),
            type_name: type_name.to_string(),
        }
    }

    pub fn resource_type_mismatch(expected: &str, found: impl Into<String>) -> Self {
        DecodeError::ResourceTypeMismatch {
            expected: expected.to_string(),
            found: found.into(),
        }
    }

    pub(crate) fn unexpected_token(field: Field<'_>, found: &str, expected: &str) -> Self {
        DecodeError::UnexpectedToken {
            field: field.name.to_string(),
            found: found.to_string(),
            expected: expected.to_string(),
            type_name: field.owner.to_string(),
        }
    }

    pub(crate) fn invalid_value(
        field: Field<'_>,
        type_name: &str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        DecodeError::InvalidValue {
            field: field.name.to_string(),
            type_name: type_name.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
