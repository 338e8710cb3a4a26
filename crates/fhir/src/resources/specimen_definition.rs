use crate::datatypes::*;
use crate::primitives::*;
use crate::resources::Resource;
use crate::{FhirPath, FhirSerde, MemSize};

/// A kind of specimen with its collection and handling requirements.
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
#[fhir_serde(resource = "SpecimenDefinition")]
pub struct SpecimenDefinition {
    pub id: Option<Id>,
    pub meta: Option<Meta>,
    pub implicit_rules: Option<Uri>,
    pub language: Option<Code>,
    pub text: Option<Narrative>,
    pub contained: Option<Vec<Resource>>,
    pub extension: Option<Vec<Extension>>,
    pub modifier_extension: Option<Vec<Extension>>,
    pub url: Option<Uri>,
    pub identifier: Option<Identifier>,
    pub version: Option<String>,
    pub version_algorithm: Option<SpecimenDefinitionVersionAlgorithm>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub derived_from_canonical: Option<Vec<Canonical>>,
    pub derived_from_uri: Option<Vec<Uri>>,
    pub status: Option<Code>,
    pub experimental: Option<Boolean>,
    pub subject: Option<SpecimenDefinitionSubject>,
    pub date: Option<DateTime>,
    pub publisher: Option<String>,
    pub contact: Option<Vec<ContactDetail>>,
    pub description: Option<Markdown>,
    pub use_context: Option<Vec<UsageContext>>,
    pub jurisdiction: Option<Vec<CodeableConcept>>,
    pub purpose: Option<Markdown>,
    pub copyright: Option<Markdown>,
    pub copyright_label: Option<String>,
    pub approval_date: Option<Date>,
    pub last_review_date: Option<Date>,
    pub effective_period: Option<Period>,
    pub type_collected: Option<CodeableConcept>,
    pub patient_preparation: Option<Vec<CodeableConcept>>,
    pub time_aspect: Option<String>,
    pub collection: Option<Vec<CodeableConcept>>,
    pub type_tested: Option<Vec<SpecimenDefinitionTypeTested>>,
}

/// `SpecimenDefinition.versionAlgorithm[x]`
#[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, MemSize)]
pub enum SpecimenDefinitionVersionAlgorithm {
    String(String),
    Coding(Coding),
}

/// `SpecimenDefinition.subject[x]`
#[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, MemSize)]
pub enum SpecimenDefinitionSubject {
    CodeableConcept(CodeableConcept),
    Reference(Reference),
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
#[fhir_serde(backbone)]
pub struct SpecimenDefinitionTypeTested {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub modifier_extension: Option<Vec<Extension>>,
    pub is_derived: Option<Boolean>,
    pub r#type: Option<CodeableConcept>,
    pub preference: Option<Code>,
    pub container: Option<SpecimenDefinitionTypeTestedContainer>,
    pub requirement: Option<Markdown>,
    pub retention_time: Option<Duration>,
    pub single_use: Option<Boolean>,
    pub rejection_criterion: Option<Vec<CodeableConcept>>,
    pub handling: Option<Vec<SpecimenDefinitionTypeTestedHandling>>,
    pub testing_destination: Option<Vec<CodeableConcept>>,
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
#[fhir_serde(backbone)]
pub struct SpecimenDefinitionTypeTestedContainer {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub modifier_extension: Option<Vec<Extension>>,
    pub material: Option<CodeableConcept>,
    pub r#type: Option<CodeableConcept>,
    pub cap: Option<CodeableConcept>,
    pub description: Option<Markdown>,
    pub capacity: Option<Quantity>,
    pub minimum_volume: Option<SpecimenDefinitionTypeTestedContainerMinimumVolume>,
    pub additive: Option<Vec<SpecimenDefinitionTypeTestedContainerAdditive>>,
    pub preparation: Option<Markdown>,
}

/// `SpecimenDefinition.typeTested.container.minimumVolume[x]`
#[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, MemSize)]
pub enum SpecimenDefinitionTypeTestedContainerMinimumVolume {
    Quantity(Quantity),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
#[fhir_serde(backbone)]
pub struct SpecimenDefinitionTypeTestedContainerAdditive {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub modifier_extension: Option<Vec<Extension>>,
    pub additive: Option<SpecimenDefinitionTypeTestedContainerAdditiveAdditive>,
}

/// `SpecimenDefinition.typeTested.container.additive.additive[x]`
#[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, MemSize)]
pub enum SpecimenDefinitionTypeTestedContainerAdditiveAdditive {
    CodeableConcept(CodeableConcept),
    Reference(Reference),
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
#[fhir_serde(backbone)]
pub struct SpecimenDefinitionTypeTestedHandling {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub modifier_extension: Option<Vec<Extension>>,
    pub temperature_qualifier: Option<CodeableConcept>,
    pub temperature_range: Option<Range>,
    pub max_duration: Option<Duration>,
    pub instruction: Option<Markdown>,
}
