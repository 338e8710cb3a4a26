use crate::datatypes::*;
use crate::primitives::*;
use crate::resources::Resource;
use crate::{FhirPath, FhirSerde, MemSize};

/// The Evidence resource: a statistical summary of the results of one or
/// more studies, with its certainty rating.
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
#[fhir_serde(resource = "Evidence")]
pub struct Evidence {
    pub id: Option<Id>,
    pub meta: Option<Meta>,
    pub implicit_rules: Option<Uri>,
    pub language: Option<Code>,
    pub text: Option<Narrative>,
    pub contained: Option<Vec<Resource>>,
    pub extension: Option<Vec<Extension>>,
    pub modifier_extension: Option<Vec<Extension>>,
    pub url: Option<Uri>,
    pub identifier: Option<Vec<Identifier>>,
    pub version: Option<String>,
    pub version_algorithm: Option<EvidenceVersionAlgorithm>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub cite_as: Option<EvidenceCiteAs>,
    pub status: Option<Code>,
    pub experimental: Option<Boolean>,
    pub date: Option<DateTime>,
    pub approval_date: Option<Date>,
    pub last_review_date: Option<Date>,
    pub publisher: Option<String>,
    pub contact: Option<Vec<ContactDetail>>,
    pub author: Option<Vec<ContactDetail>>,
    pub editor: Option<Vec<ContactDetail>>,
    pub reviewer: Option<Vec<ContactDetail>>,
    pub endorser: Option<Vec<ContactDetail>>,
    pub use_context: Option<Vec<UsageContext>>,
    pub purpose: Option<Markdown>,
    pub copyright: Option<Markdown>,
    pub copyright_label: Option<String>,
    pub related_artifact: Option<Vec<RelatedArtifact>>,
    pub description: Option<Markdown>,
    pub assertion: Option<Markdown>,
    pub note: Option<Vec<Annotation>>,
    pub variable_definition: Option<Vec<EvidenceVariableDefinition>>,
    pub synthesis_type: Option<CodeableConcept>,
    pub study_design: Option<Vec<CodeableConcept>>,
    pub statistic: Option<Vec<EvidenceStatistic>>,
    pub certainty: Option<Vec<EvidenceCertainty>>,
}

/// `Evidence.versionAlgorithm[x]`
#[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, MemSize)]
pub enum EvidenceVersionAlgorithm {
    String(String),
    Coding(Coding),
}

/// `Evidence.citeAs[x]`
#[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, MemSize)]
pub enum EvidenceCiteAs {
    Reference(Reference),
    Markdown(Markdown),
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
#[fhir_serde(backbone)]
pub struct EvidenceVariableDefinition {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub modifier_extension: Option<Vec<Extension>>,
    pub description: Option<Markdown>,
    pub note: Option<Vec<Annotation>>,
    pub variable_role: Option<CodeableConcept>,
    pub observed: Option<Reference>,
    pub intended: Option<Reference>,
    pub directness_match: Option<CodeableConcept>,
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
#[fhir_serde(backbone)]
pub struct EvidenceStatistic {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub modifier_extension: Option<Vec<Extension>>,
    pub description: Option<Markdown>,
    pub note: Option<Vec<Annotation>>,
    pub statistic_type: Option<CodeableConcept>,
    pub category: Option<CodeableConcept>,
    pub quantity: Option<Quantity>,
    pub number_of_events: Option<UnsignedInt>,
    pub number_affected: Option<UnsignedInt>,
    pub sample_size: Option<EvidenceStatisticSampleSize>,
    pub attribute_estimate: Option<Vec<EvidenceStatisticAttributeEstimate>>,
    pub model_characteristic: Option<Vec<EvidenceStatisticModelCharacteristic>>,
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
#[fhir_serde(backbone)]
pub struct EvidenceStatisticSampleSize {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub modifier_extension: Option<Vec<Extension>>,
    pub description: Option<Markdown>,
    pub note: Option<Vec<Annotation>>,
    pub number_of_studies: Option<UnsignedInt>,
    pub number_of_participants: Option<UnsignedInt>,
    pub known_data_count: Option<UnsignedInt>,
}

/// Nests through `attribute_estimate`.
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
#[fhir_serde(backbone)]
pub struct EvidenceStatisticAttributeEstimate {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub modifier_extension: Option<Vec<Extension>>,
    pub description: Option<Markdown>,
    pub note: Option<Vec<Annotation>>,
    pub r#type: Option<CodeableConcept>,
    pub quantity: Option<Quantity>,
    pub level: Option<Decimal>,
    pub range: Option<Range>,
    pub attribute_estimate: Option<Vec<EvidenceStatisticAttributeEstimate>>,
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
#[fhir_serde(backbone)]
pub struct EvidenceStatisticModelCharacteristic {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub modifier_extension: Option<Vec<Extension>>,
    pub code: Option<CodeableConcept>,
    pub value: Option<Quantity>,
    pub variable: Option<Vec<EvidenceStatisticModelCharacteristicVariable>>,
    pub attribute_estimate: Option<Vec<EvidenceStatisticAttributeEstimate>>,
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
#[fhir_serde(backbone)]
pub struct EvidenceStatisticModelCharacteristicVariable {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub modifier_extension: Option<Vec<Extension>>,
    pub variable_definition: Option<Reference>,
    pub handling: Option<Code>,
    pub value_category: Option<Vec<CodeableConcept>>,
    pub value_quantity: Option<Vec<Quantity>>,
    pub value_range: Option<Vec<Range>>,
    pub attribute_estimate: Option<Vec<EvidenceStatisticAttributeEstimate>>,
}

/// Nests through `subcomponent`.
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
#[fhir_serde(backbone)]
pub struct EvidenceCertainty {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub modifier_extension: Option<Vec<Extension>>,
    pub description: Option<Markdown>,
    pub note: Option<Vec<Annotation>>,
    pub r#type: Option<CodeableConcept>,
    pub rating: Option<CodeableConcept>,
    pub rater: Option<String>,
    pub subcomponent: Option<Vec<EvidenceCertainty>>,
}
