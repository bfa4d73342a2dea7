//! Reserved fields and how every wire format carries them.
//!
//! A reserved field has format-defined meaning and never appears in an
//! element's free-form `attributes`. [`FIELD_RULES`] is the single table that
//! importers, exporters and the tree shapers consult; adding a reserved field
//! means adding one row here and one accessor arm in `Element`.

use std::collections::HashSet;

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::scalar::AttributeType;

/// Element kind a schema entry or presence record applies to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Scope {
    Node,
    Edge,
}

impl Scope {
    pub const ALL: [Scope; 2] = [Scope::Node, Scope::Edge];

    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}

/// A reserved element field.
///
/// The discriminant order matches [`FIELD_RULES`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Id,
    Source,
    Target,
    Color,
    X,
    Y,
    Z,
    Size,
    Weight,
    Thickness,
    Shape,
    Label,
    Edgelabel,
    Start,
    End,
}

impl Field {
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn from_name(name: &str) -> Option<Field> {
        name.parse().ok()
    }

    pub fn is_reserved(name: &str) -> bool {
        Self::from_name(name).is_some()
    }

    pub fn rule(self) -> &'static FieldRule {
        &FIELD_RULES[self as usize]
    }

    /// `id`, `source` and `target` identify an element rather than describe it.
    pub fn is_identity(self) -> bool {
        matches!(self, Field::Id | Field::Source | Field::Target)
    }
}

/// Where a reserved field lives in a GEXF element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GexfRule {
    /// Plain XML attribute on `<node>`/`<edge>`.
    Attribute,
    /// `<viz:color r g b/>`.
    Color,
    /// One coordinate of the shared `<viz:position/>`.
    Position,
    /// Own `<viz:NAME value="..."/>` element.
    Viz(&'static str),
}

/// Where a reserved field lives in a GraphML element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphmlRule {
    /// XML attribute on `<node>`/`<edge>`.
    Attribute,
    /// Three `<data>` entries, one per color channel.
    Channels,
    /// One `<data key="NAME">` entry.
    Data,
}

/// How one reserved field is typed and carried by each format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: Field,
    /// Canonical type; `None` for color, which is not a scalar.
    pub ty: Option<AttributeType>,
    pub gexf: GexfRule,
    pub graphml: GraphmlRule,
    /// GraphML `attr.type` used when a key must be synthesized.
    pub key_type: Option<&'static str>,
}

const fn rule(
    field: Field,
    ty: Option<AttributeType>,
    gexf: GexfRule,
    graphml: GraphmlRule,
    key_type: Option<&'static str>,
) -> FieldRule {
    FieldRule {
        field,
        ty,
        gexf,
        graphml,
        key_type,
    }
}

const NUMBER: Option<AttributeType> = Some(AttributeType::Number);
const STRING: Option<AttributeType> = Some(AttributeType::String);

pub const FIELD_RULES: [FieldRule; 15] = [
    rule(Field::Id, STRING, GexfRule::Attribute, GraphmlRule::Attribute, None),
    rule(Field::Source, STRING, GexfRule::Attribute, GraphmlRule::Attribute, None),
    rule(Field::Target, STRING, GexfRule::Attribute, GraphmlRule::Attribute, None),
    rule(Field::Color, None, GexfRule::Color, GraphmlRule::Channels, Some("int")),
    rule(Field::X, NUMBER, GexfRule::Position, GraphmlRule::Data, Some("float")),
    rule(Field::Y, NUMBER, GexfRule::Position, GraphmlRule::Data, Some("float")),
    rule(Field::Z, NUMBER, GexfRule::Position, GraphmlRule::Data, Some("float")),
    rule(Field::Size, NUMBER, GexfRule::Viz("size"), GraphmlRule::Data, Some("float")),
    rule(Field::Weight, NUMBER, GexfRule::Attribute, GraphmlRule::Data, Some("float")),
    rule(Field::Thickness, NUMBER, GexfRule::Viz("thickness"), GraphmlRule::Data, Some("float")),
    rule(Field::Shape, STRING, GexfRule::Viz("shape"), GraphmlRule::Data, Some("string")),
    rule(Field::Label, STRING, GexfRule::Attribute, GraphmlRule::Data, Some("string")),
    rule(Field::Edgelabel, STRING, GexfRule::Attribute, GraphmlRule::Data, Some("string")),
    rule(Field::Start, STRING, GexfRule::Attribute, GraphmlRule::Data, Some("string")),
    rule(Field::End, STRING, GexfRule::Attribute, GraphmlRule::Data, Some("string")),
];

/// GraphML key ids of the decomposed color.
pub const COLOR_CHANNELS: [&str; 3] = ["r", "g", "b"];

/// Names the attribute inferencer must skip.
pub fn reserved_names() -> HashSet<&'static str> {
    FIELD_RULES.iter().map(|r| r.field.name()).collect()
}
