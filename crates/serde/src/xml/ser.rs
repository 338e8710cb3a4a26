//! Model → FHIR XML.
//!
//! The resource renders itself into an owned [`XmlElement`] tree through its
//! [`XmlResource`] impl; this module writes that tree with quick-xml.

use crate::error::{Result, SerdeError};
use crate::xml::utils;
use fhirbind_fhir::XmlResource;
use fhirbind_serde_support::XmlElement;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;
use tracing::trace;

/// Output options for the XML writer.
///
/// The default is compact output with no XML declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XmlWriteOptions {
    /// Indent nested elements by this many spaces.
    pub indent: Option<usize>,
    /// Emit `<?xml version="1.0" encoding="UTF-8"?>` first.
    pub declaration: bool,
}

impl XmlWriteOptions {
    /// Two-space indentation with a declaration.
    pub fn pretty() -> Self {
        Self {
            indent: Some(2),
            declaration: true,
        }
    }
}

/// Serialize a FHIR resource to an XML string.
///
/// # Examples
///
/// ```ignore
/// use fhirbind_serde::xml::to_xml_string;
/// use fhirbind_fhir::r5::Evidence;
///
/// let evidence = Evidence::default();
/// let xml = to_xml_string(&evidence)?;
/// assert_eq!(xml, r#"<Evidence xmlns="http://hl7.org/fhir"/>"#);
/// ```
pub fn to_xml_string<T>(value: &T) -> Result<String>
where
    T: XmlResource,
{
    to_xml_string_with(value, XmlWriteOptions::default())
}

/// Serialize a FHIR resource to an XML string with explicit options.
pub fn to_xml_string_with<T>(value: &T, options: XmlWriteOptions) -> Result<String>
where
    T: XmlResource,
{
    let mut buffer = Vec::new();
    to_xml_writer(value, &mut buffer, options)?;
    String::from_utf8(buffer).map_err(|e| SerdeError::Custom(e.to_string()))
}

/// Serialize a FHIR resource to an XML byte vector.
pub fn to_xml_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: XmlResource,
{
    let mut buffer = Vec::new();
    to_xml_writer(value, &mut buffer, XmlWriteOptions::default())?;
    Ok(buffer)
}

/// Serialize a FHIR resource to an XML writer.
pub fn to_xml_writer<T, W>(value: &T, writer: W, options: XmlWriteOptions) -> Result<()>
where
    T: XmlResource,
    W: Write,
{
    let root = value.to_xml_resource();
    trace!(format = "xml", resource_type = %root.name, "encoding");

    let mut writer = match options.indent {
        Some(width) => Writer::new_with_indent(writer, b' ', width),
        None => Writer::new(writer),
    };
    if options.declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }
    write_element(&mut writer, &root, true)
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &XmlElement, root: bool) -> Result<()> {
    // Narrative markup is already XML.
    if let Some(markup) = &element.xhtml {
        writer.write_event(Event::Text(BytesText::from_escaped(markup.as_str())))?;
        return Ok(());
    }

    let mut start = BytesStart::new(element.name.as_str());
    if root {
        start.push_attribute(("xmlns", utils::FHIR_NAMESPACE));
    }
    for (key, value) in &element.attributes {
        let escaped = utils::escape_attribute(value);
        start.push_attribute((key.as_bytes(), escaped.as_bytes()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        write_element(writer, child, false)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}
