//! Derive macros for the `fhirbind-fhir` model.
//!
//! - `FhirSerde` generates the JSON (`serde::Serialize` / `serde::Deserialize`)
//!   and XML (`FhirXml`, `XmlFields`) codecs plus `Display`. On a resource
//!   struct it also generates `FhirResource` and `XmlResource`.
//! - `FhirPath` generates `FhirPathElement`.
//! - `MemSize` generates `MemSize`.
//!
//! Structs must declare every field as `Option<T>` (single) or
//! `Option<Vec<T>>` (repeating). Enums are choice elements: each variant
//! wraps exactly one type and its name is the type suffix (`valueString`).
//!
//! Attributes, all under `#[fhir_serde(..)]`:
//!
//! | where     | attribute              | effect                                         |
//! |-----------|------------------------|------------------------------------------------|
//! | struct    | `resource = "Evidence"`| writes/checks `resourceType`, XML root element |
//! | struct    | `backbone`             | FHIRPath type is `BackboneElement`             |
//! | field     | `rename = "class"`     | FHIR element name                              |
//! | field     | `attribute`            | plain JSON string, XML attribute               |
//! | variant   | `rename = "..."`       | type suffix                                    |

mod fhir_path;
mod fhir_serde;
mod mem_size;
mod shape;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

#[proc_macro_derive(FhirSerde, attributes(fhir_serde))]
pub fn fhir_serde_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    fhir_serde::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[proc_macro_derive(FhirPath, attributes(fhir_serde))]
pub fn fhir_path_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    fhir_path::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[proc_macro_derive(MemSize)]
pub fn mem_size_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    mem_size::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Path to the model crate as seen from generated code.
fn krate() -> proc_macro2::TokenStream {
    quote::quote!(::fhirbind_fhir)
}
