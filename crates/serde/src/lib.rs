//! # fhirbind-serde
//!
//! JSON and XML entry points for the `fhirbind-fhir` R5 model.
//!
//! ## Features
//!
//! - **JSON Support**: thin wrappers around `serde_json`; the model's own
//!   `Serialize`/`Deserialize` impls produce FHIR JSON.
//! - **XML Support**: a quick-xml reader and writer over the model's
//!   element-tree codec, with the FHIR namespace, attribute-valued primitives,
//!   `contained` wrappers and verbatim XHTML narrative.
//!
//! Both directions emit `tracing` events at `TRACE` level (format, byte count,
//! resource type); no subscriber is installed here.
//!
//! ## Examples
//!
//! ```rust
//! use fhirbind_fhir::r5::Evidence;
//! use fhirbind_serde::{from_json_str, from_xml_str, to_xml_string};
//!
//! let evidence: Evidence =
//!     from_json_str(r#"{"resourceType":"Evidence","id":"ev","status":"active"}"#).unwrap();
//! let xml = to_xml_string(&evidence).unwrap();
//! assert_eq!(
//!     xml,
//!     r#"<Evidence xmlns="http://hl7.org/fhir"><id value="ev"/><status value="active"/></Evidence>"#
//! );
//! let back: Evidence = from_xml_str(&xml).unwrap();
//! assert_eq!(back, evidence);
//! ```

pub mod error;
pub mod json;
pub mod xml;

// Re-export common types and functions
pub use error::{Result, SerdeError};

// Re-export JSON functions at top level for convenience
pub use json::{
    from_json_reader, from_json_slice, from_json_str, from_json_value, to_json_string,
    to_json_string_pretty, to_json_value, to_json_vec,
};

pub use xml::{
    XmlWriteOptions, from_xml_reader, from_xml_slice, from_xml_str, to_xml_string,
    to_xml_string_with, to_xml_vec, to_xml_writer,
};
