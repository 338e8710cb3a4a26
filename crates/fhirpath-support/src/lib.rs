//! # FHIRPath Support
//!
//! Bridge types shared between the FHIR model crate, the code generated by
//! `fhirbind-fhir-macro`, and an external FHIRPath evaluator.
//!
//! The model never depends on an evaluator. Instead every model type
//! implements [`FhirPathElement`], which exposes:
//!
//! - type information (`FHIR.Coding`, `FHIR.dateTime`, `System.String`)
//! - the populated children, keyed by their FHIR element name
//! - the [`SystemValue`] carried by primitive elements
//! - equality, equivalence and the FHIRPath conversion functions
//!
//! Date and time values keep the precision they were written with, see
//! [`PrecisionDate`], [`PrecisionTime`] and [`PrecisionDateTime`].

mod element;
mod error;
mod system;
mod temporal;
mod type_info;

pub use element::{FhirPathElement, element_equal, element_equivalent};
pub use error::ConversionError;
pub use system::{SystemQuantity, SystemValue};
pub use temporal::{DatePrecision, PrecisionDate, PrecisionDateTime, PrecisionTime, TimePrecision};
pub use type_info::TypeInfoResult;
