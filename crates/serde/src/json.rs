//! JSON serialization wrapper functions for FHIR resources.
//!
//! The model's `Serialize`/`Deserialize` impls already speak FHIR JSON, so
//! these are thin wrappers around `serde_json` that unify the error type and
//! emit trace events.
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::trace;

/// Deserialize a FHIR resource from a JSON string.
///
/// # Examples
///
/// ```ignore
/// use fhirbind_serde::json::from_json_str;
/// use fhirbind_fhir::r5::Evidence;
///
/// let json = r#"{"resourceType": "Evidence", "id": "example"}"#;
/// let evidence: Evidence = from_json_str(json)?;
/// ```
pub fn from_json_str<'a, T>(s: &'a str) -> Result<T>
where
    T: Deserialize<'a>,
{
    trace!(format = "json", bytes = s.len(), "decoding");
    Ok(serde_json::from_str(s)?)
}

/// Serialize a FHIR resource to a JSON string.
pub fn to_json_string<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value)?;
    trace!(format = "json", bytes = json.len(), "encoded");
    Ok(json)
}

/// Serialize a FHIR resource to a pretty-printed JSON string.
pub fn to_json_string_pretty<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string_pretty(value)?;
    trace!(format = "json", bytes = json.len(), pretty = true, "encoded");
    Ok(json)
}

/// Deserialize a FHIR resource from a JSON byte slice.
pub fn from_json_slice<'a, T>(v: &'a [u8]) -> Result<T>
where
    T: Deserialize<'a>,
{
    trace!(format = "json", bytes = v.len(), "decoding");
    Ok(serde_json::from_slice(v)?)
}

/// Deserialize a FHIR resource from an `io::Read` source.
pub fn from_json_reader<R, T>(reader: R) -> Result<T>
where
    R: Read,
    T: serde::de::DeserializeOwned,
{
    trace!(format = "json", "decoding from reader");
    Ok(serde_json::from_reader(reader)?)
}

/// Serialize a FHIR resource to a JSON byte vector.
pub fn to_json_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    let bytes = serde_json::to_vec(value)?;
    trace!(format = "json", bytes = bytes.len(), "encoded");
    Ok(bytes)
}

/// Serialize a FHIR resource to a `serde_json::Value`.
///
/// Decimals stay `Number`s with their original text.
pub fn to_json_value<T>(value: &T) -> Result<serde_json::Value>
where
    T: Serialize + ?Sized,
{
    Ok(serde_json::to_value(value)?)
}

/// Deserialize a FHIR resource from a `serde_json::Value`.
///
/// # Examples
///
/// ```ignore
/// use fhirbind_serde::json::from_json_value;
/// use fhirbind_fhir::r5::Resource;
/// use serde_json::json;
///
/// let value = json!({"resourceType": "SpecimenDefinition", "id": "serum"});
/// let resource: Resource = from_json_value(value)?;
/// ```
pub fn from_json_value<T>(value: serde_json::Value) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    Ok(serde_json::from_value(value)?)
}
