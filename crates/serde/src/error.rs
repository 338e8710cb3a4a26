use fhirbind_fhir::DecodeError;

/// Error types for FHIR serialization and deserialization.
#[derive(Debug)]
pub enum SerdeError {
    /// JSON serialization or deserialization error
    Json(serde_json::Error),

    /// Malformed XML
    Xml(quick_xml::Error),

    /// Well-formed XML that does not fit the model
    Decode(DecodeError),

    /// IO error during serialization/deserialization
    Io(std::io::Error),

    /// Custom error message
    Custom(String),
}

impl std::fmt::Display for SerdeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerdeError::Json(e) => write!(f, "JSON error: {}", e),
            SerdeError::Xml(e) => write!(f, "XML error: {}", e),
            SerdeError::Decode(e) => write!(f, "decode error: {}", e),
            SerdeError::Io(e) => write!(f, "IO error: {}", e),
            SerdeError::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SerdeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SerdeError::Json(e) => Some(e),
            SerdeError::Xml(e) => Some(e),
            SerdeError::Decode(e) => Some(e),
            SerdeError::Io(e) => Some(e),
            SerdeError::Custom(_) => None,
        }
    }
}

impl From<serde_json::Error> for SerdeError {
    fn from(err: serde_json::Error) -> Self {
        SerdeError::Json(err)
    }
}

impl From<quick_xml::Error> for SerdeError {
    fn from(err: quick_xml::Error) -> Self {
        SerdeError::Xml(err)
    }
}

impl From<quick_xml::events::attributes::AttrError> for SerdeError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        SerdeError::Xml(err.into())
    }
}

impl From<quick_xml::escape::EscapeError> for SerdeError {
    fn from(err: quick_xml::escape::EscapeError) -> Self {
        SerdeError::Xml(err.into())
    }
}

impl From<DecodeError> for SerdeError {
    fn from(err: DecodeError) -> Self {
        SerdeError::Decode(err)
    }
}

impl From<std::io::Error> for SerdeError {
    fn from(err: std::io::Error) -> Self {
        SerdeError::Io(err)
    }
}

impl From<String> for SerdeError {
    fn from(msg: String) -> Self {
        SerdeError::Custom(msg)
    }
}

impl From<&str> for SerdeError {
    fn from(msg: &str) -> Self {
        SerdeError::Custom(msg.to_string())
    }
}

/// Result type alias for FHIR serialization operations
pub type Result<T> = std::result::Result<T, SerdeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_decode_error_is_the_source() {
        let err = SerdeError::from(DecodeError::multiple_values("date", "RegulatedAuthorizationCase"));
        assert_eq!(
            err.to_string(),
            "decode error: multiple values for field \"date[x]\" in RegulatedAuthorizationCase"
        );
        assert!(err.source().is_some());
        assert!(SerdeError::from("plain").source().is_none());
    }
}
