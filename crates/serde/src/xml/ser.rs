//! Writes an [`XmlElement`] tree as an indented XML document.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::utils;
use super::{XmlElement, XmlNode};
use crate::error::{Result, SerdeError};

/// Serialize a document rooted at `root` to an XML string.
pub fn to_xml_string(root: &XmlElement) -> Result<String> {
    String::from_utf8(to_xml_vec(root)?).map_err(|e| SerdeError::Custom(e.to_string()))
}

/// Serialize a document rooted at `root` to an XML byte vector.
///
/// The output starts with the XML declaration, uses two-space indentation
/// and ends with a newline.
pub fn to_xml_vec(root: &XmlElement) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let declare_xsi = root.content.contains_nil();
    write_element(&mut writer, root, declare_xsi)?;

    let mut buffer = writer.into_inner();
    buffer.push(b'\n');
    Ok(buffer)
}

fn write_element<W: Write>(
    writer: &mut Writer<W>,
    element: &XmlElement,
    declare_xsi: bool,
) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    if declare_xsi {
        start.push_attribute(("xmlns:xsi", utils::XSI_NAMESPACE));
    }
    for (name, value) in &element.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    match &element.content {
        XmlNode::Nil => {
            start.push_attribute(("xsi:nil", "true"));
            writer.write_event(Event::Empty(start))?;
        }
        XmlNode::Elements(children) if children.is_empty() => {
            writer.write_event(Event::Empty(start))?;
        }
        XmlNode::Elements(children) => {
            writer.write_event(Event::Start(start))?;
            for child in children {
                write_element(writer, child, false)?;
            }
            writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
        }
        XmlNode::Text(text) => {
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(text)))?;
            writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
        }
        XmlNode::CData(text) => {
            writer.write_event(Event::Start(start))?;
            for section in utils::cdata_sections(text) {
                writer.write_event(Event::CData(BytesCData::new(section)))?;
            }
            writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_layout() {
        let root = XmlElement::new(
            "result",
            XmlNode::Elements(vec![
                XmlElement::new("name", XmlNode::CData("reference1".into())),
                XmlElement::new(
                    "entry",
                    XmlNode::Elements(vec![
                        XmlElement::new("name", XmlNode::CData("reference2".into())),
                        XmlElement::new("entry", XmlNode::empty())
                            .with_attribute("rel", "reference1"),
                    ]),
                )
                .with_attribute("rel", "reference2"),
            ]),
        );

        assert_eq!(
            to_xml_string(&root).unwrap(),
            r#"<?xml version="1.0" encoding="UTF-8"?>
<result>
  <name><![CDATA[reference1]]></name>
  <entry rel="reference2">
    <name><![CDATA[reference2]]></name>
    <entry rel="reference1"/>
  </entry>
</result>
"#
        );
    }

    #[test]
    fn test_nil_declares_namespace_on_root() {
        let root = XmlElement::new(
            "result",
            XmlNode::Elements(vec![
                XmlElement::new("entry", XmlNode::Nil).with_attribute("rel", "reference2"),
            ]),
        );

        assert_eq!(
            to_xml_string(&root).unwrap(),
            r#"<?xml version="1.0" encoding="UTF-8"?>
<result xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <entry rel="reference2" xsi:nil="true"/>
</result>
"#
        );
    }

    #[test]
    fn test_text_is_escaped_and_cdata_split() {
        let root = XmlElement::new(
            "result",
            XmlNode::Elements(vec![
                XmlElement::new("number", XmlNode::Text("1<2".into())),
                XmlElement::new("raw", XmlNode::CData("a]]>b".into())),
            ]),
        );
        let xml = to_xml_string(&root).unwrap();
        assert!(xml.contains("<number>1&lt;2</number>"));
        assert!(xml.contains("<raw><![CDATA[a]]]]><![CDATA[>b]]></raw>"));
    }
}
