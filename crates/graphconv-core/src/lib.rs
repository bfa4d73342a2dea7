//! Normalized graph model shared by every graphconv importer and exporter.
//!
//! # Module Structure
//!
//! - [`model`]: `GraphDocument`, `Element`, `AttributeDef`, `GraphMeta`
//! - [`scalar`]: free-form attribute values and their types
//! - [`fields`]: the reserved field table driving every format mapping
//! - [`color`]: color parsing/formatting at the serialization boundary
//! - [`infer`]: attribute type inference from untyped input
//! - [`presence`]: which reserved fields a document actually uses

pub mod color;
pub mod fields;
pub mod infer;
pub mod model;
pub mod presence;
pub mod scalar;

pub use color::{Rgb, format_rgb, parse_color};
pub use fields::{
    COLOR_CHANNELS, FIELD_RULES, Field, FieldRule, GexfRule, GraphmlRule, Scope, reserved_names,
};
pub use graphconv_error::{Error, ErrorKind, Result};
pub use infer::{TypeHistogram, extend_schema, infer_schema};
pub use model::{AttributeDef, EdgeType, Element, GraphDocument, GraphMeta, GraphMode};
pub use presence::PresenceIndex;
pub use scalar::{AttributeType, Scalar, format_number, number_to_json};
