//! Shared helpers for the FHIR JSON and XML encodings.
//!
//! - [`IdAndExtensionHelper`] / [`IdAndExtensionOwned`]: the `_field` object
//!   that carries a primitive's `id` and `extension` in JSON
//! - [`keys`]: naming rules for `_field` and `field[x]` keys
//! - [`xml::XmlElement`]: the owned element tree the XML codec reads into and
//!   writes from

pub mod keys;
pub mod xml;

pub use keys::{choice_key, choice_suffix, meta_key};
pub use xml::XmlElement;

/// Helper struct for serializing id and extension metadata for FHIR primitives.
///
/// In FHIR JSON, primitive values can have associated metadata stored in a parallel
/// `_fieldName` object containing an `id` and/or `extension` array.
///
/// This helper is used during serialization to output only the id/extension metadata
/// while the primitive value itself is serialized separately.
///
/// # Example
/// ```json
/// {
///   "status": "active",
///   "_status": {
///     "id": "status-1",
///     "extension": [...]
///   }
/// }
/// ```
#[derive(serde::Serialize)]
pub struct IdAndExtensionHelper<'a, E> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: &'a Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: &'a Option<Vec<E>>,
}

impl<'a, E> IdAndExtensionHelper<'a, E> {
    pub fn new(id: &'a Option<String>, extension: &'a Option<Vec<E>>) -> Self {
        Self { id, extension }
    }

    /// Whether there is anything to write under the `_field` key.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.extension.is_none()
    }
}

/// Owned counterpart of [`IdAndExtensionHelper`], read from a `_fieldName`
/// object (or from one slot of a `_fieldName` array).
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdAndExtensionOwned<E> {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub extension: Option<Vec<E>>,
}

impl<E> Default for IdAndExtensionOwned<E> {
    fn default() -> Self {
        Self {
            id: None,
            extension: None,
        }
    }
}
