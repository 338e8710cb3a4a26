//! Constants and name checks shared by the XML reader and writer.

/// FHIR namespace URI, declared on the root resource element.
pub const FHIR_NAMESPACE: &str = "http://hl7.org/fhir";

/// Namespace of the narrative `div`.
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Checks if an element name is the special XHTML div element.
///
/// The `div` element carries arbitrary XHTML and is kept as raw markup.
pub fn is_div_element(name: &str) -> bool {
    name == "div"
}

/// Namespace declarations (`xmlns`, `xmlns:x`) are not model attributes.
pub fn is_namespace_attribute(key: &str) -> bool {
    key == "xmlns" || key.starts_with("xmlns:")
}

/// Escapes an attribute value. Tabs and line breaks become character
/// references, since parsers normalize literal ones to spaces.
pub fn escape_attribute(value: &str) -> String {
    let escaped = quick_xml::escape::escape(value);
    if !escaped.contains(['\t', '\n', '\r']) {
        return escaped.into_owned();
    }
    escaped
        .replace('\t', "&#x9;")
        .replace('\n', "&#xA;")
        .replace('\r', "&#xD;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_div_element() {
        assert!(is_div_element("div"));
        assert!(!is_div_element("Div"));
        assert!(!is_div_element("text"));
    }

    #[test]
    fn test_is_namespace_attribute() {
        assert!(is_namespace_attribute("xmlns"));
        assert!(is_namespace_attribute("xmlns:xhtml"));
        assert!(!is_namespace_attribute("xmlnsfoo"));
        assert!(!is_namespace_attribute("value"));
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(escape_attribute("plain"), "plain");
        assert_eq!(escape_attribute("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(
            escape_attribute("line one\r\nline\ttwo"),
            "line one&#xD;&#xA;line&#x9;two"
        );
    }
}
