use graphconv_error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::element::{XmlElement, XmlNode};

/// Parse XML text into an element tree rooted at the document element.
///
/// Syntax errors surface as `ParseFailed` with the `quick-xml` error chained.
pub fn parse(input: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(input);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event().map_err(|err| {
            Error::parse_failed("invalid XML")
                .with_operation("xml::parse")
                .with_context("position", reader.buffer_position().to_string())
                .set_source(err)
        })?;

        match event {
            Event::Start(start) => stack.push(open(&start)?),
            Event::Empty(start) => {
                let element = open(&start)?;
                close(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::parse_failed("unbalanced end tag"))?;
                close(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|err| {
                    Error::parse_failed("invalid text content")
                        .with_operation("xml::parse")
                        .set_source(err)
                })?;
                if let Some(parent) = stack.last_mut() {
                    if !text.is_empty() {
                        parent.children.push(XmlNode::Text(text.into_owned()));
                    }
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&data).into_owned();
                    parent.children.push(XmlNode::Text(text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::parse_failed(format!("unclosed element '{}'", open.name))
            .with_operation("xml::parse"));
    }
    root.ok_or_else(|| Error::parse_failed("no root element").with_operation("xml::parse"))
}

fn open(start: &BytesStart<'_>) -> Result<XmlElement> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.local_name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|err| {
            Error::parse_failed("invalid attribute")
                .with_operation("xml::parse")
                .with_context("element", element.name.clone())
                .set_source(err)
        })?;
        let key = attr.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }
        let value = attr.unescape_value().map_err(|err| {
            Error::parse_failed("invalid attribute value")
                .with_operation("xml::parse")
                .with_context("element", element.name.clone())
                .set_source(err)
        })?;
        let name = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        element.attributes.push((name, value.into_owned()));
    }
    Ok(element)
}

/// Whitespace between child elements is indentation, not content. Text of a
/// leaf element is kept as written.
fn strip_layout(element: &mut XmlElement) {
    if element.elements().next().is_some() {
        element
            .children
            .retain(|node| !matches!(node, XmlNode::Text(text) if text.trim().is_empty()));
    }
}

fn close(
    mut element: XmlElement,
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
) -> Result<()> {
    strip_layout(&mut element);
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(Error::parse_failed("multiple root elements").with_operation("xml::parse"));
        }
    }
    Ok(())
}
