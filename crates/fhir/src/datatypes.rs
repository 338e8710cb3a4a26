//! FHIR R5 complex data types used by the resources in this crate.

use crate::primitives::*;
use crate::{FhirPath, FhirSerde, MemSize};
use fhirbind_fhirpath_support::{FhirPathElement, SystemQuantity, SystemValue, TypeInfoResult};

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
pub struct Extension {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    #[fhir_serde(attribute)]
    pub url: Option<std::string::String>,
    pub value: Option<ExtensionValue>,
}

/// `Extension.value[x]`
#[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, MemSize)]
pub enum ExtensionValue {
    Base64Binary(Base64Binary),
    Boolean(Boolean),
    Canonical(Canonical),
    Code(Code),
    Date(Date),
    DateTime(DateTime),
    Decimal(Decimal),
    Id(Id),
    Instant(Instant),
    Integer(Integer),
    Integer64(Integer64),
    Markdown(Markdown),
    Oid(Oid),
    PositiveInt(PositiveInt),
    String(String),
    Time(Time),
    UnsignedInt(UnsignedInt),
    Uri(Uri),
    Url(Url),
    Uuid(Uuid),
    Annotation(Annotation),
    Attachment(Attachment),
    CodeableConcept(CodeableConcept),
    CodeableReference(CodeableReference),
    Coding(Coding),
    ContactPoint(ContactPoint),
    Duration(Duration),
    Identifier(Identifier),
    Period(Period),
    Quantity(Quantity),
    Range(Range),
    Reference(Reference),
    ContactDetail(ContactDetail),
    Expression(Expression),
    RelatedArtifact(RelatedArtifact),
    UsageContext(UsageContext),
    Meta(Meta),
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
pub struct Coding {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub system: Option<Uri>,
    pub version: Option<String>,
    pub code: Option<Code>,
    pub display: Option<String>,
    pub user_selected: Option<Boolean>,
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
pub struct CodeableConcept {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub coding: Option<Vec<Coding>>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
pub struct CodeableReference {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub concept: Option<CodeableConcept>,
    pub reference: Option<Reference>,
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
pub struct Reference {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub reference: Option<String>,
    pub r#type: Option<Uri>,
    pub identifier: Option<Box<Identifier>>,
    pub display: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
pub struct Identifier {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub r#use: Option<Code>,
    pub r#type: Option<CodeableConcept>,
    pub system: Option<Uri>,
    pub value: Option<String>,
    pub period: Option<Period>,
    pub assigner: Option<Box<Reference>>,
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
pub struct Period {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub start: Option<DateTime>,
    pub end: Option<DateTime>,
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, MemSize)]
pub struct Quantity {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub value: Option<Decimal>,
    pub comparator: Option<Code>,
    pub unit: Option<String>,
    pub system: Option<Uri>,
    pub code: Option<Code>,
}

/// Same shape as [`Quantity`], constrained to units of time.
#[derive(Debug, Clone, PartialEq, Default, FhirSerde, MemSize)]
pub struct Duration {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub value: Option<Decimal>,
    pub comparator: Option<Code>,
    pub unit: Option<String>,
    pub system: Option<Uri>,
    pub code: Option<Code>,
}

// Quantities surface as System.Quantity so they compare and convert like
// FHIRPath quantity literals. The coded unit wins over the display unit.
macro_rules! quantity_path {
    ($name:ident) => {
        impl FhirPathElement for $name {
            fn type_info(&self) -> TypeInfoResult {
                TypeInfoResult::fhir(stringify!($name))
            }

            fn fields(&self) -> Vec<(&'static str, &dyn FhirPathElement)> {
                let mut fields: Vec<(&'static str, &dyn FhirPathElement)> = Vec::new();
                if let Some(id) = &self.id {
                    fields.push(("id", id as &dyn FhirPathElement));
                }
                for extension in self.extension.iter().flatten() {
                    fields.push(("extension", extension as &dyn FhirPathElement));
                }
                if let Some(value) = &self.value {
                    fields.push(("value", value as &dyn FhirPathElement));
                }
                if let Some(comparator) = &self.comparator {
                    fields.push(("comparator", comparator as &dyn FhirPathElement));
                }
                if let Some(unit) = &self.unit {
                    fields.push(("unit", unit as &dyn FhirPathElement));
                }
                if let Some(system) = &self.system {
                    fields.push(("system", system as &dyn FhirPathElement));
                }
                if let Some(code) = &self.code {
                    fields.push(("code", code as &dyn FhirPathElement));
                }
                fields
            }

            fn system_value(&self) -> Option<SystemValue> {
                let value = self.value.as_ref()?.value?;
                let unit = self
                    .code
                    .as_ref()
                    .and_then(|code| code.value.clone())
                    .or_else(|| self.unit.as_ref().and_then(|unit| unit.value.clone()))
                    .unwrap_or_else(|| "1".to_string());
                Some(SystemValue::Quantity(SystemQuantity::new(value, unit)))
            }
        }
    };
}

quantity_path!(Quantity);
quantity_path!(Duration);

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
pub struct Range {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub low: Option<Quantity>,
    pub high: Option<Quantity>,
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
pub struct Annotation {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub author: Option<AnnotationAuthor>,
    pub time: Option<DateTime>,
    pub text: Option<Markdown>,
}

/// `Annotation.author[x]`
#[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, MemSize)]
pub enum AnnotationAuthor {
    Reference(Reference),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
pub struct ContactPoint {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub system: Option<Code>,
    pub value: Option<String>,
    pub r#use: Option<Code>,
    pub rank: Option<PositiveInt>,
    pub period: Option<Period>,
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
pub struct ContactDetail {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub name: Option<String>,
    pub telecom: Option<Vec<ContactPoint>>,
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
pub struct UsageContext {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub code: Option<Coding>,
    pub value: Option<UsageContextValue>,
}

/// `UsageContext.value[x]`
#[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, MemSize)]
pub enum UsageContextValue {
    CodeableConcept(CodeableConcept),
    Quantity(Quantity),
    Range(Range),
    Reference(Reference),
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
pub struct RelatedArtifact {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub r#type: Option<Code>,
    pub classifier: Option<Vec<CodeableConcept>>,
    pub label: Option<String>,
    pub display: Option<String>,
    pub citation: Option<Markdown>,
    pub document: Option<Attachment>,
    pub resource: Option<Canonical>,
    pub resource_reference: Option<Reference>,
    pub publication_status: Option<Code>,
    pub publication_date: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
pub struct Attachment {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub content_type: Option<Code>,
    pub language: Option<Code>,
    pub data: Option<Base64Binary>,
    pub url: Option<Url>,
    pub size: Option<Integer64>,
    pub hash: Option<Base64Binary>,
    pub title: Option<String>,
    pub creation: Option<DateTime>,
    pub height: Option<PositiveInt>,
    pub width: Option<PositiveInt>,
    pub frames: Option<PositiveInt>,
    pub duration: Option<Decimal>,
    pub pages: Option<PositiveInt>,
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
pub struct Meta {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub version_id: Option<Id>,
    pub last_updated: Option<Instant>,
    pub source: Option<Uri>,
    pub profile: Option<Vec<Canonical>>,
    pub security: Option<Vec<Coding>>,
    pub tag: Option<Vec<Coding>>,
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
pub struct Narrative {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub status: Option<Code>,
    pub div: Option<Xhtml>,
}

#[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, MemSize)]
pub struct Expression {
    #[fhir_serde(attribute)]
    pub id: Option<std::string::String>,
    pub extension: Option<Vec<Extension>>,
    pub description: Option<String>,
    pub name: Option<Code>,
    pub language: Option<Code>,
    pub expression: Option<String>,
    pub reference: Option<Uri>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_extension_url_is_plain_json() {
        let ext = Extension {
            url: Some("http://example.org/flag".to_string()),
            value: Some(ExtensionValue::Boolean(true.into())),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&ext).unwrap(),
            json!({"url": "http://example.org/flag", "valueBoolean": true})
        );
    }

    #[test]
    fn test_reference_type_field_name() {
        let reference = Reference {
            r#type: Some("Patient".into()),
            reference: Some("Patient/1".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&reference).unwrap();
        assert_eq!(value, json!({"reference": "Patient/1", "type": "Patient"}));
        let back: Reference = serde_json::from_value(value).unwrap();
        assert_eq!(back, reference);
    }

    #[test]
    fn test_quantity_system_value_prefers_code() {
        let quantity = Quantity {
            value: Some(dec!(5.0).into()),
            unit: Some("milligram".into()),
            code: Some("mg".into()),
            ..Default::default()
        };
        assert_eq!(
            quantity.to_quantity(false),
            Ok(Some(SystemQuantity::new(dec!(5.0), "mg")))
        );
        assert!(Range::default().to_quantity(false).is_err());
    }

    #[test]
    fn test_annotation_author_string_keeps_extension() {
        let input = json!({
            "authorString": "Dr. Who",
            "_authorString": {"id": "a1"},
            "text": "note"
        });
        let note: Annotation = serde_json::from_value(input.clone()).unwrap();
        match &note.author {
            Some(AnnotationAuthor::String(author)) => {
                assert_eq!(author.value.as_deref(), Some("Dr. Who"));
                assert_eq!(author.id.as_deref(), Some("a1"));
            }
            other => panic!("unexpected author {other:?}"),
        }
        assert_eq!(serde_json::to_value(&note).unwrap(), input);
    }
}
