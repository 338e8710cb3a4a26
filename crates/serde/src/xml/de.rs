//! FHIR XML → model.
//!
//! The document is read with quick-xml into an owned [`XmlElement`] tree,
//! which the model's [`XmlResource`] impls then walk. The narrative `div` is
//! not parsed: its markup is sliced out of the input verbatim.

use crate::error::{Result, SerdeError};
use crate::xml::utils;
use fhirbind_fhir::XmlResource;
use fhirbind_serde_support::XmlElement;
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use std::io::Read;
use tracing::trace;

/// Deserialize a FHIR resource from an XML string.
///
/// # Examples
///
/// ```ignore
/// use fhirbind_serde::xml::from_xml_str;
/// use fhirbind_fhir::r5::Evidence;
///
/// let xml = r#"<?xml version="1.0"?>
/// <Evidence xmlns="http://hl7.org/fhir">
///   <id value="example"/>
/// </Evidence>"#;
/// let evidence: Evidence = from_xml_str(xml)?;
/// ```
pub fn from_xml_str<T>(xml: &str) -> Result<T>
where
    T: XmlResource,
{
    let root = parse_document(xml)?;
    trace!(format = "xml", bytes = xml.len(), resource_type = %root.name, "decoding");
    Ok(T::from_xml_resource(&root)?)
}

/// Deserialize a FHIR resource from XML bytes.
pub fn from_xml_slice<T>(xml: &[u8]) -> Result<T>
where
    T: XmlResource,
{
    let xml_str = std::str::from_utf8(xml)
        .map_err(|e| SerdeError::Custom(format!("Invalid UTF-8: {}", e)))?;
    from_xml_str(xml_str)
}

/// Deserialize a FHIR resource from an XML reader.
///
/// The input is read to the end first; the narrative is sliced out of the
/// complete text.
pub fn from_xml_reader<R, T>(mut reader: R) -> Result<T>
where
    R: Read,
    T: XmlResource,
{
    let mut xml = String::new();
    reader.read_to_string(&mut xml)?;
    from_xml_str(&xml)
}

/// Reads a whole document into its root element.
pub fn parse_document(xml: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let before = offset(&reader);
        match reader.read_event()? {
            Event::Start(start) => {
                let mut element = open_element(&start, stack.is_empty())?;
                if utils::is_div_element(&element.name) && !stack.is_empty() {
                    let name = start.name().as_ref().to_vec();
                    reader.read_to_end(quick_xml::name::QName(&name))?;
                    element.xhtml = Some(raw_markup(xml, before, offset(&reader)));
                    attach(&mut stack, &mut root, element)?;
                } else {
                    stack.push(element);
                }
            }
            Event::Empty(start) => {
                let mut element = open_element(&start, stack.is_empty())?;
                if utils::is_div_element(&element.name) && !stack.is_empty() {
                    element.xhtml = Some(raw_markup(xml, before, offset(&reader)));
                }
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| SerdeError::Custom("Unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                if !text.iter().all(u8::is_ascii_whitespace) {
                    let parent = stack.last().map_or("document", |e| e.name.as_str());
                    return Err(SerdeError::Custom(format!(
                        "Unexpected text content in <{}>",
                        parent
                    )));
                }
            }
            Event::CData(_) => {
                return Err(SerdeError::Custom(
                    "CDATA is not allowed in FHIR XML".to_string(),
                ));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(SerdeError::Custom(format!(
            "Unexpected EOF inside <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| SerdeError::Custom("XML document has no root element".to_string()))
}

fn offset(reader: &Reader<&[u8]>) -> usize {
    reader.buffer_position() as usize
}

fn raw_markup(xml: &str, start: usize, end: usize) -> String {
    xml[start..end].trim_start().to_string()
}

/// Local element name plus unescaped attributes, minus namespace
/// declarations. A root `xmlns`, when present, must be the FHIR namespace.
fn open_element(start: &BytesStart<'_>, is_root: bool) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).to_string();
    let mut element = XmlElement::new(name);
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        if utils::is_namespace_attribute(&key) {
            if is_root && key == "xmlns" && attr.value.as_ref() != utils::FHIR_NAMESPACE.as_bytes() {
                return Err(SerdeError::Custom(format!(
                    "<{}> is in namespace {}, expected {}",
                    element.name,
                    String::from_utf8_lossy(&attr.value),
                    utils::FHIR_NAMESPACE
                )));
            }
            continue;
        }
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw)?.into_owned();
        element.push_attribute(key, value);
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.push_child(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(SerdeError::Custom(
            "XML document has more than one root element".to_string(),
        ));
    }
    *root = Some(element);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree_and_attributes() {
        let root = parse_document(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <!-- comment -->
            <Evidence xmlns="http://hl7.org/fhir">
              <id value="ev"/>
              <title value="A &amp; B"/>
              <extension url="http://example.org/x"><valueBoolean value="true"/></extension>
            </Evidence>"#,
        )
        .unwrap();
        assert_eq!(root.name, "Evidence");
        assert!(root.attributes.is_empty());
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.children[1].attribute("value"), Some("A & B"));
        assert_eq!(root.children[2].attribute("url"), Some("http://example.org/x"));
        assert_eq!(root.children[2].children[0].name, "valueBoolean");
    }

    #[test]
    fn test_div_is_kept_verbatim() {
        let div = r#"<div xmlns="http://www.w3.org/1999/xhtml"><p>Serum <b>only</b> &lt;2h</p></div>"#;
        let xml = format!(
            r#"<SpecimenDefinition xmlns="http://hl7.org/fhir"><text><status value="generated"/>
            {div}</text></SpecimenDefinition>"#
        );
        let root = parse_document(&xml).unwrap();
        let text = root.child("text").unwrap();
        assert_eq!(text.child("div").unwrap().xhtml.as_deref(), Some(div));
    }

    #[test]
    fn test_rejects_malformed_documents() {
        assert!(parse_document("").is_err());
        assert!(parse_document("<Evidence xmlns=\"http://hl7.org/fhir\"><id value=\"x\"/>").is_err());
        assert!(parse_document("<Evidence>text</Evidence>").is_err());
        assert!(parse_document("<Evidence/><Evidence/>").is_err());
        assert!(parse_document("<Evidence xmlns=\"urn:other\"/>").is_err());
    }
}
