//! Utility functions and constants for XML output.

use super::{XmlElement, XmlNode};

/// XML Schema instance namespace, declared on the root when a nil is present.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Element used for list items and for keys that are not valid element names.
pub const ENTRY_ELEMENT: &str = "entry";

/// Converts a Rust boolean to its string representation for XML.
pub fn bool_to_string(b: bool) -> &'static str {
    if b { "true" } else { "false" }
}

/// Checks whether `name` can be used as an element name as is.
pub fn is_valid_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !name.to_ascii_lowercase().starts_with("xml")
}

/// An element named after `key`, or an `<entry key="..">` when the key is
/// not a valid element name.
pub fn keyed_element(key: String, content: XmlNode) -> XmlElement {
    if is_valid_element_name(&key) {
        XmlElement::new(key, content)
    } else {
        XmlElement::new(ENTRY_ELEMENT, content).with_attribute("key", key)
    }
}

/// Splits text so that no section contains `]]>`.
pub fn cdata_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = text;
    while let Some(position) = rest.find("]]>") {
        sections.push(&rest[..position + 2]);
        rest = &rest[position + 2..];
    }
    sections.push(rest);
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_element_name() {
        assert!(is_valid_element_name("first_name"));
        assert!(is_valid_element_name("_links"));
        assert!(!is_valid_element_name("0"));
        assert!(!is_valid_element_name("has space"));
        assert!(!is_valid_element_name("xmlThing"));
        assert!(!is_valid_element_name(""));
    }

    #[test]
    fn test_keyed_element() {
        let element = keyed_element("42".to_string(), XmlNode::empty());
        assert_eq!(element.name, "entry");
        assert_eq!(element.attributes, vec![("key".to_string(), "42".to_string())]);
    }

    #[test]
    fn test_cdata_sections() {
        assert_eq!(cdata_sections("plain"), vec!["plain"]);
        assert_eq!(cdata_sections("a]]>b"), vec!["a]]", ">b"]);
        assert_eq!(cdata_sections(""), vec![""]);
    }

    #[test]
    fn test_bool_to_string() {
        assert_eq!(bool_to_string(true), "true");
        assert_eq!(bool_to_string(false), "false");
    }
}
