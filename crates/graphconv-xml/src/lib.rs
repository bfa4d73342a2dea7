//! A small owned XML element tree on top of `quick-xml`.
//!
//! XML attributes and child elements are kept structurally apart, so callers
//! never have to disambiguate an attribute from a same-named child. Reading
//! strips namespace prefixes and drops `xmlns` declarations; writing emits
//! names verbatim, so a writer can use `viz:color` and a reader sees `color`.

mod element;
mod reader;
mod writer;

pub use element::{XmlElement, XmlNode};
pub use reader::parse;
pub use writer::{WriteOptions, write};
