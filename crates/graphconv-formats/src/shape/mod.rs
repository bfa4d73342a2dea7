//! Element tree shapers.
//!
//! Each wire format nests an element's fields differently. A shaper is a
//! pair of pure functions between one normalized [`Element`] and the XML
//! subtree that format expects; the importers and exporters only assemble
//! the surrounding document.
//!
//! [`Element`]: graphconv_core::Element

pub mod gexf;
pub mod graphml;
pub mod yed;
