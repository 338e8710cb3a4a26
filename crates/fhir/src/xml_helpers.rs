//! The XML half of the field codec, over the owned [`XmlElement`] tree.
//!
//! Reading mirrors the JSON side: each child element of a complex element is
//! offered to the fields in declaration order until one claims it.

use crate::{DecodeError, Field};
use fhirbind_serde_support::XmlElement;

pub trait FhirXml: Sized {
    /// Appends the element(s) for this value, named `name`, to `parent`.
    /// Writes nothing when the value is empty.
    fn write_xml(&self, name: &str, parent: &mut XmlElement);

    /// Decodes `element` into `slot` if the element belongs to `field`.
    fn read_xml(
        slot: &mut Option<Self>,
        field: Field<'_>,
        element: &XmlElement,
    ) -> Result<bool, DecodeError>;

    /// Repeating fields appear as repeated sibling elements.
    fn read_xml_many(
        slot: &mut Option<Vec<Self>>,
        field: Field<'_>,
        element: &XmlElement,
    ) -> Result<bool, DecodeError> {
        let mut item = None;
        if !Self::read_xml(&mut item, field, element)? {
            return Ok(false);
        }
        slot.get_or_insert_with(Vec::new).extend(item);
        Ok(true)
    }
}

/// Attributes and child elements of a complex type, independent of the name
/// of the element that holds them.
pub trait XmlFields: Sized {
    fn write_xml_fields(&self, element: &mut XmlElement);

    fn from_xml_fields(element: &XmlElement) -> Result<Self, DecodeError>;
}

/// A resource as the root (or `contained` child) element named after its
/// resource type.
pub trait XmlResource: Sized {
    fn to_xml_resource(&self) -> XmlElement;

    fn from_xml_resource(element: &XmlElement) -> Result<Self, DecodeError>;
}

impl<T: FhirXml> FhirXml for Box<T> {
    fn write_xml(&self, name: &str, parent: &mut XmlElement) {
        (**self).write_xml(name, parent)
    }

    fn read_xml(
        slot: &mut Option<Self>,
        field: Field<'_>,
        element: &XmlElement,
    ) -> Result<bool, DecodeError> {
        let mut inner = slot.take().map(|boxed| *boxed);
        let claimed = T::read_xml(&mut inner, field, element)?;
        *slot = inner.map(Box::new);
        Ok(claimed)
    }
}
