//! XML serialization and deserialization for FHIR resources.
//!
//! Unlike JSON, FHIR XML is not driven through `serde`. Each model type
//! renders to and reads from an owned [`XmlElement`](fhirbind_serde_support::XmlElement)
//! tree (see `fhirbind_fhir::FhirXml`); this module moves that tree to and
//! from text with quick-xml.
//!
//! ## FHIR JSON ↔ XML Mapping
//!
//! | JSON Pattern | XML Pattern |
//! |--------------|-------------|
//! | `{"status": "active"}` | `<status value="active"/>` |
//! | `{"date": "2024", "_date": {"id": "d1"}}` | `<date id="d1" value="2024"/>` |
//! | `{"derivedFromUri": ["a", null], "_derivedFromUri": [null, {"id": "u"}]}` | `<derivedFromUri value="a"/><derivedFromUri id="u"/>` |
//! | `{"versionAlgorithmCoding": {"code": "c1"}}` | `<versionAlgorithmCoding><code value="c1"/></versionAlgorithmCoding>` |
//! | `{"contained": [{"resourceType": "Evidence"}]}` | `<contained><Evidence/></contained>` |
//! | `{"extension": [{"url": "u", "valueBoolean": true}]}` | `<extension url="u"><valueBoolean value="true"/></extension>` |
//!
//! ## Special Attributes
//!
//! - **`value`**: the primitive value of an element
//! - **`id`**: element identifier
//! - **`url`**: the extension URL
//!
//! All other data is represented as child elements.
//!
//! ## Namespace Handling
//!
//! - The FHIR namespace (`http://hl7.org/fhir`) is declared on the root
//!   resource element and checked when reading.
//! - The narrative `<div>` keeps its own XHTML namespace and is copied
//!   through as raw markup in both directions.

pub mod de;
pub mod ser;
mod utils;

pub use de::{from_xml_reader, from_xml_slice, from_xml_str, parse_document};
pub use ser::{XmlWriteOptions, to_xml_string, to_xml_string_with, to_xml_vec, to_xml_writer};
pub use utils::{FHIR_NAMESPACE, XHTML_NAMESPACE};
