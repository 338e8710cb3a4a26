//! Resources and the polymorphic [`Resource`] container.

mod evidence;
mod regulated_authorization;
mod specimen_definition;

pub use evidence::*;
pub use regulated_authorization::*;
pub use specimen_definition::*;

use crate::mem_size::MemSize;
use crate::{DecodeError, FhirJson, FhirXml, Field, XmlElement, XmlResource, next_items};
use fhirbind_fhirpath_support::{FhirPathElement, SystemValue, TypeInfoResult};
use serde::de::{Error as _, MapAccess};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identity shared by every resource type.
pub trait FhirResource {
    /// The `resourceType` discriminator, e.g. `"Evidence"`.
    fn resource_type(&self) -> &'static str;

    /// The logical id, when one is set.
    fn resource_id(&self) -> Option<&str>;
}

macro_rules! resource_enum {
    ($($variant:ident),+ $(,)?) => {
        /// Any resource, discriminated by `resourceType` on the wire.
        ///
        /// Variants are boxed so the enum stays pointer sized; `contained`
        /// lists nest it recursively.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Resource {
            $($variant(Box<$variant>),)+
        }

        impl Resource {
            /// Every resource type this enum can hold.
            pub const RESOURCE_TYPES: &'static [&'static str] = &[$(stringify!($variant)),+];

            fn deserialize_tagged(
                resource_type: &str,
                value: serde_json::Value,
            ) -> Result<Self, serde_json::Error> {
                match resource_type {
                    $(stringify!($variant) => {
                        $variant::deserialize(value).map(|r| Resource::$variant(Box::new(r)))
                    })+
                    other => Err(serde_json::Error::custom(DecodeError::UnknownResourceType(
                        other.to_string(),
                    ))),
                }
            }
        }

        $(
            impl From<$variant> for Resource {
                fn from(resource: $variant) -> Self {
                    Resource::$variant(Box::new(resource))
                }
            }
        )+

        impl FhirResource for Resource {
            fn resource_type(&self) -> &'static str {
                match self {
                    $(Resource::$variant(r) => r.resource_type(),)+
                }
            }

            fn resource_id(&self) -> Option<&str> {
                match self {
                    $(Resource::$variant(r) => r.resource_id(),)+
                }
            }
        }

        impl Serialize for Resource {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match self {
                    $(Resource::$variant(r) => r.serialize(serializer),)+
                }
            }
        }

        impl XmlResource for Resource {
            fn to_xml_resource(&self) -> XmlElement {
                match self {
                    $(Resource::$variant(r) => r.to_xml_resource(),)+
                }
            }

            fn from_xml_resource(element: &XmlElement) -> Result<Self, DecodeError> {
                match element.name.as_str() {
                    $(stringify!($variant) => {
                        $variant::from_xml_resource(element).map(|r| Resource::$variant(Box::new(r)))
                    })+
                    other => Err(DecodeError::UnknownResourceType(other.to_string())),
                }
            }
        }

        impl FhirPathElement for Resource {
            fn type_info(&self) -> TypeInfoResult {
                match self {
                    $(Resource::$variant(r) => r.type_info(),)+
                }
            }

            fn fields(&self) -> Vec<(&'static str, &dyn FhirPathElement)> {
                match self {
                    $(Resource::$variant(r) => r.fields(),)+
                }
            }

            fn system_value(&self) -> Option<SystemValue> {
                None
            }
        }

        impl MemSize for Resource {
            fn heap_size(&self) -> usize {
                match self {
                    $(Resource::$variant(r) => r.heap_size(),)+
                }
            }
        }
    };
}

resource_enum!(Evidence, RegulatedAuthorization, SpecimenDefinition);

impl<'de> Deserialize<'de> for Resource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Buffered so `resourceType` may appear anywhere in the object.
        let value = serde_json::Value::deserialize(deserializer)?;
        let resource_type = match value.get("resourceType") {
            Some(serde_json::Value::String(rt)) => rt.clone(),
            Some(other) => {
                return Err(D::Error::custom(format!(
                    "resourceType must be a string, found {other}"
                )));
            }
            None => return Err(D::Error::custom(DecodeError::MissingResourceType)),
        };
        Resource::deserialize_tagged(&resource_type, value).map_err(D::Error::custom)
    }
}

impl FhirJson for Resource {
    fn write_one<M: SerializeMap>(&self, name: &str, map: &mut M) -> Result<(), M::Error> {
        map.serialize_entry(name, self)
    }

    fn write_many<M: SerializeMap>(items: &[Self], name: &str, map: &mut M) -> Result<(), M::Error> {
        map.serialize_entry(name, items)
    }

    fn read_one<'de, A: MapAccess<'de>>(
        slot: &mut Option<Self>,
        field: Field<'_>,
        key: &str,
        map: &mut A,
    ) -> Result<bool, A::Error> {
        if key != field.name {
            return Ok(false);
        }
        *slot = Some(map.next_value()?);
        Ok(true)
    }

    fn read_many<'de, A: MapAccess<'de>>(
        slot: &mut Option<Vec<Self>>,
        field: Field<'_>,
        key: &str,
        map: &mut A,
    ) -> Result<bool, A::Error> {
        if key != field.name {
            return Ok(false);
        }
        *slot = Some(next_items(map, field)?);
        Ok(true)
    }
}

/// In XML a nested resource sits inside a wrapper element named after the
/// field: `<contained><Evidence>...</Evidence></contained>`.
impl FhirXml for Resource {
    fn write_xml(&self, name: &str, parent: &mut XmlElement) {
        let mut wrapper = XmlElement::new(name);
        wrapper.push_child(self.to_xml_resource());
        parent.push_child(wrapper);
    }

    fn read_xml(
        slot: &mut Option<Self>,
        field: Field<'_>,
        element: &XmlElement,
    ) -> Result<bool, DecodeError> {
        if element.name != field.name {
            return Ok(false);
        }
        let [child] = element.children.as_slice() else {
            return Err(DecodeError::unexpected_token(
                field,
                &format!("{} child elements", element.children.len()),
                "one resource element",
            ));
        };
        *slot = Some(Resource::from_xml_resource(child)?);
        Ok(true)
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string_pretty(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{Id, String as FhirString};
    use serde_json::json;

    #[test]
    fn test_resource_type_dispatch() {
        let resource: Resource = serde_json::from_value(json!({
            "id": "sd-1",
            "resourceType": "SpecimenDefinition",
            "title": "Serum"
        }))
        .unwrap();
        assert_eq!(resource.resource_type(), "SpecimenDefinition");
        assert_eq!(resource.resource_id(), Some("sd-1"));
    }

    #[test]
    fn test_missing_and_unknown_resource_type() {
        let err = serde_json::from_value::<Resource>(json!({"id": "x"})).unwrap_err();
        assert_eq!(err.to_string(), "missing resourceType");

        let err =
            serde_json::from_value::<Resource>(json!({"resourceType": "Patient"})).unwrap_err();
        assert_eq!(err.to_string(), "unknown resourceType \"Patient\"");
    }

    #[test]
    fn test_from_boxes_variant() {
        let evidence = Evidence {
            id: Some(Id::from("ev")),
            title: Some(FhirString::from("Aspirin")),
            ..Default::default()
        };
        let resource = Resource::from(evidence.clone());
        assert_eq!(resource, Resource::Evidence(Box::new(evidence)));
        assert_eq!(resource.type_info().to_string(), "FHIR.Evidence");
    }

    #[test]
    fn test_xml_wrapper_requires_single_child() {
        let mut wrapper = XmlElement::new("contained");
        wrapper.push_child(XmlElement::new("Evidence"));
        wrapper.push_child(XmlElement::new("Evidence"));
        let mut slot = None;
        let err = Resource::read_xml(&mut slot, Field::new("Evidence", "contained"), &wrapper)
            .unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedToken { .. }));
    }
}
