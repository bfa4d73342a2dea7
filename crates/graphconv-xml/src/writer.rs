use graphconv_error::{Error, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::element::{XmlElement, XmlNode};

/// Options for [`write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per nesting level; `None` writes everything on one line.
    pub indent: Option<usize>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { indent: Some(2) }
    }
}

impl WriteOptions {
    pub fn compact() -> Self {
        Self { indent: None }
    }
}

/// Serialize a tree with an `<?xml version="1.0" encoding="UTF-8"?>` prolog.
///
/// Attribute values and text are escaped; element names are written verbatim.
pub fn write(root: &XmlElement, options: &WriteOptions) -> Result<String> {
    let mut writer = match options.indent {
        Some(indent) => Writer::new_with_indent(Vec::new(), b' ', indent),
        None => Writer::new(Vec::new()),
    };

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_failed)?;
    write_element(&mut writer, root)?;

    String::from_utf8(writer.into_inner()).map_err(write_failed)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_failed);
    }

    writer.write_event(Event::Start(start)).map_err(write_failed)?;
    for child in &element.children {
        match child {
            XmlNode::Element(child) => write_element(writer, child)?,
            XmlNode::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(write_failed)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(write_failed)
}

fn write_failed<E>(err: E) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    Error::serialization_failed("cannot write XML")
        .with_operation("xml::write")
        .set_source(err)
}
