use crate::datatypes::*;
use crate::primitives::*;
use crate::resources::Resource;
use crate::{FhirPath, FhirSerde, MemSize};

/// Regulatory approval, clearance or licence for a product or process.
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
#[fhir_serde(resource = "RegulatedAuthorization")]
pub struct RegulatedAuthorization {
    pub id: Option<Id>,
    pub meta: Option<Meta>,
    pub implicit_rules: Option<Uri>,
    pub language: Option<Code>,
    pub text: Option<Narrative>,
    pub contained: Option<Vec<Resource>>,
    pub extension: Option<Vec<Extension>>,
    pub modifier_extension: Option<Vec<Extension>>,
    pub identifier: Option<Vec<Identifier>>,
    pub subject: Option<Vec<Reference>>,
    pub r#type: Option<CodeableConcept>,
    pub description: Option<Markdown>,
    pub region: Option<Vec<CodeableConcept>>,
    pub status: Option<CodeableConcept>,
    pub status_date: Option<DateTime>,
    pub validity_period: Option<Period>,
    pub indication: Option<Vec<CodeableReference>>,
    pub intended_use: Option<CodeableConcept>,
    pub basis: Option<Vec<CodeableConcept>>,
    pub holder: Option<Reference>,
    pub regulator: Option<Reference>,
    pub attached_document: Option<Vec<Reference>>,
    pub case: Option<RegulatedAuthorizationCase>,
}

/// The case or regulatory procedure that granted the authorization.
/// Follow-up applications nest through `application`.
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
#[fhir_serde(backbone)]
pub struct RegulatedAuthorizationCase {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub modifier_extension: Option<Vec<Extension>>,
    pub identifier: Option<Identifier>,
    pub r#type: Option<CodeableConcept>,
    pub status: Option<CodeableConcept>,
    pub date: Option<RegulatedAuthorizationCaseDate>,
    pub application: Option<Vec<RegulatedAuthorizationCase>>,
}

/// `RegulatedAuthorization.case.date[x]`
#[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, MemSize)]
pub enum RegulatedAuthorizationCaseDate {
    Period(Period),
    DateTime(DateTime),
}
