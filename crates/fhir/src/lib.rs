//! # fhirbind-fhir
//!
//! Strongly typed FHIR R5 data types and resources.
//!
//! Every type in [`r5`] round-trips through FHIR JSON (via `serde`) and FHIR
//! XML (via the [`FhirXml`] / [`XmlResource`] traits, driven by the
//! `fhirbind-serde` crate), and exposes itself to FHIRPath evaluation through
//! [`fhirpath::FhirPathElement`].
//!
//! ```rust
//! use fhirbind_fhir::FhirResource;
//! use fhirbind_fhir::r5::{Evidence, Resource};
//!
//! let json = r#"{"resourceType":"Evidence","id":"ev-1","versionAlgorithmString":"semver"}"#;
//! let evidence: Evidence = serde_json::from_str(json).unwrap();
//! assert_eq!(evidence.resource_id(), Some("ev-1"));
//!
//! let resource = Resource::from(evidence);
//! assert_eq!(resource.resource_type(), "Evidence");
//! ```
//!
//! ## Model conventions
//!
//! - Every element is optional; repeating elements are `Option<Vec<T>>`.
//! - Primitives are `{id, extension, value}` triples (see [`primitives`]).
//! - A choice element `foo[x]` is a single field holding an enum with one
//!   variant per allowed type; on the wire the key is `fooString`,
//!   `fooCoding`, and so on.
//! - [`r5::Resource`] boxes each variant so nested `contained` lists stay small
//!   on the stack.

extern crate self as fhirbind_fhir;

pub mod datatypes;
pub mod error;
pub mod mem_size;
pub mod primitives;
pub mod resources;
mod serde_helpers;
mod xml_helpers;

pub use error::DecodeError;
pub use mem_size::MemSize;
pub use resources::{FhirResource, Resource};
pub use serde_helpers::{FhirJson, Field, next_array, next_items};
pub use xml_helpers::{FhirXml, XmlFields, XmlResource};

pub use fhirbind_fhir_macro::{FhirPath, FhirSerde, MemSize};
pub use fhirbind_fhirpath_support as fhirpath;
pub use fhirbind_serde_support::{XmlElement, choice_key, choice_suffix, meta_key};

/// The R5 model under one path: primitives, data types and resources.
pub mod r5 {
    pub use crate::datatypes::*;
    pub use crate::primitives::*;
    pub use crate::resources::*;
}

#[doc(hidden)]
pub mod __private {
    pub use fhirbind_fhirpath_support as fhirpath_support;
    pub use serde;
    pub use serde_json;
}
