//! The normalized graph document every format converts through.

use std::collections::{BTreeMap, HashSet};

use graphconv_error::{Error, Result};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};

use crate::color::{Rgb, format_rgb, parse_color};
use crate::fields::{Field, Scope, reserved_names};
use crate::infer::{extend_schema, infer_schema};
use crate::scalar::{AttributeType, Scalar};

/// Declared type of one free-form attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDef {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub ty: AttributeType,
}

impl AttributeDef {
    /// Definition whose title defaults to its id.
    pub fn new(id: impl Into<String>, ty: AttributeType) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            ty,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EdgeType {
    Directed,
    #[default]
    Undirected,
    Mutual,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GraphMode {
    #[default]
    Static,
    Dynamic,
}

/// Graph-level metadata, the `attributes` object of the JSON formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphMeta {
    pub id: String,
    pub edge_type: EdgeType,
    pub mode: GraphMode,
}

impl Default for GraphMeta {
    fn default() -> Self {
        Self {
            id: "graph".to_string(),
            edge_type: EdgeType::default(),
            mode: GraphMode::default(),
        }
    }
}

/// A node or an edge.
///
/// Reserved fields live in dedicated slots; everything else lives in
/// `attributes`, which never holds a reserved name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub id: String,
    pub source: Option<String>,
    pub target: Option<String>,
    pub color: Option<Rgb>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub size: Option<f64>,
    pub weight: Option<f64>,
    pub thickness: Option<f64>,
    pub shape: Option<String>,
    pub label: Option<String>,
    pub edgelabel: Option<String>,
    pub start: Option<Scalar>,
    pub end: Option<Scalar>,
    pub attributes: BTreeMap<String, Scalar>,
}

impl Element {
    pub fn node(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn edge(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: Some(source.into()),
            target: Some(target.into()),
            ..Default::default()
        }
    }

    /// Read a reserved field as a scalar. Colors come back formatted as
    /// `rgb(r, g, b)`.
    pub fn get(&self, field: Field) -> Option<Scalar> {
        let text = |v: &Option<String>| v.as_ref().map(|s| Scalar::String(s.clone()));
        let number = |v: Option<f64>| v.map(Scalar::Number);
        match field {
            Field::Id => Some(Scalar::String(self.id.clone())),
            Field::Source => text(&self.source),
            Field::Target => text(&self.target),
            Field::Color => self.color.map(|c| Scalar::String(format_rgb(c))),
            Field::X => number(self.x),
            Field::Y => number(self.y),
            Field::Z => number(self.z),
            Field::Size => number(self.size),
            Field::Weight => number(self.weight),
            Field::Thickness => number(self.thickness),
            Field::Shape => text(&self.shape),
            Field::Label => text(&self.label),
            Field::Edgelabel => text(&self.edgelabel),
            Field::Start => self.start.clone(),
            Field::End => self.end.clone(),
        }
    }

    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::Id => true,
            Field::Source => self.source.is_some(),
            Field::Target => self.target.is_some(),
            Field::Color => self.color.is_some(),
            Field::X => self.x.is_some(),
            Field::Y => self.y.is_some(),
            Field::Z => self.z.is_some(),
            Field::Size => self.size.is_some(),
            Field::Weight => self.weight.is_some(),
            Field::Thickness => self.thickness.is_some(),
            Field::Shape => self.shape.is_some(),
            Field::Label => self.label.is_some(),
            Field::Edgelabel => self.edgelabel.is_some(),
            Field::Start => self.start.is_some(),
            Field::End => self.end.is_some(),
        }
    }

    /// Store a reserved field, coercing the value to its canonical type.
    pub fn set(&mut self, field: Field, value: Scalar) -> Result<()> {
        let number = |value: &Scalar| {
            value
                .as_number()
                .ok_or_else(|| Error::invalid_value(field.name(), "a number"))
        };
        match field {
            Field::Id => self.id = value.to_text(),
            Field::Source => self.source = Some(value.to_text()),
            Field::Target => self.target = Some(value.to_text()),
            Field::Color => {
                let text = value
                    .as_str()
                    .ok_or_else(|| Error::invalid_color(value.to_text()))?;
                self.color = Some(parse_color(text)?);
            }
            Field::X => self.x = Some(number(&value)?),
            Field::Y => self.y = Some(number(&value)?),
            Field::Z => self.z = Some(number(&value)?),
            Field::Size => self.size = Some(number(&value)?),
            Field::Weight => self.weight = Some(number(&value)?),
            Field::Thickness => self.thickness = Some(number(&value)?),
            Field::Shape => self.shape = Some(value.to_text()),
            Field::Label => self.label = Some(value.to_text()),
            Field::Edgelabel => self.edgelabel = Some(value.to_text()),
            Field::Start => self.start = Some(value),
            Field::End => self.end = Some(value),
        }
        Ok(())
    }

    /// Store a named value, promoting reserved names to their slots.
    pub fn set_attribute(&mut self, name: &str, value: Scalar) -> Result<()> {
        match Field::from_name(name) {
            Some(field) => self.set(field, value),
            None => {
                self.attributes.insert(name.to_string(), value);
                Ok(())
            }
        }
    }

    /// Edges carry `weight`, never `size`.
    pub fn normalize_edge(&mut self) {
        let Some(size) = self.size.take() else {
            return;
        };
        match self.weight {
            None => self.weight = Some(size),
            Some(weight) => tracing::warn!(
                edge = %self.id,
                size,
                weight,
                "edge carries both size and weight, dropping size"
            ),
        }
    }
}

/// The normalized graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphDocument {
    pub nodes: Vec<Element>,
    pub edges: Vec<Element>,
    pub node_schema: Vec<AttributeDef>,
    pub edge_schema: Vec<AttributeDef>,
    pub meta: GraphMeta,
}

impl GraphDocument {
    pub fn new(meta: GraphMeta) -> Self {
        Self {
            meta,
            ..Default::default()
        }
    }

    pub fn elements(&self, scope: Scope) -> &[Element] {
        match scope {
            Scope::Node => &self.nodes,
            Scope::Edge => &self.edges,
        }
    }

    pub fn schema(&self, scope: Scope) -> &[AttributeDef] {
        match scope {
            Scope::Node => &self.node_schema,
            Scope::Edge => &self.edge_schema,
        }
    }

    /// Declared schema plus inferred definitions for attributes it leaves out.
    pub fn complete_schema(&self, scope: Scope) -> Vec<AttributeDef> {
        let mut schema = self.schema(scope).to_vec();
        let attributes = self.elements(scope).iter().map(|e| &e.attributes);
        extend_schema(&mut schema, infer_schema(attributes, &reserved_names()));
        schema
    }

    /// Check the document invariants exporters rely on.
    pub fn validate(&self) -> Result<()> {
        for scope in Scope::ALL {
            let mut ids = HashSet::new();
            for (index, element) in self.elements(scope).iter().enumerate() {
                if !ids.insert(element.id.as_str()) {
                    return Err(Error::duplicate_id(&element.id)
                        .with_operation("validate")
                        .with_context("scope", scope.as_str()));
                }
                if scope == Scope::Edge {
                    for endpoint in [Field::Source, Field::Target] {
                        if !element.has(endpoint) {
                            return Err(Error::missing_field(endpoint.name())
                                .with_operation("validate")
                                .with_context("index", index.to_string())
                                .with_context("id", element.id.clone()));
                        }
                    }
                }
                if let Some(name) = element.attributes.keys().find(|k| Field::is_reserved(k)) {
                    return Err(Error::invalid_schema(format!(
                        "element '{}' stores reserved field '{}' as an attribute",
                        element.id, name
                    ))
                    .with_operation("validate")
                    .with_context("scope", scope.as_str()));
                }
            }

            // Other reserved fields may be declared to carry a title and type.
            let mut defs = HashSet::new();
            for def in self.schema(scope) {
                if Field::from_name(&def.id).is_some_and(Field::is_identity) {
                    return Err(Error::invalid_schema(format!(
                        "attribute '{}' shadows an identity field",
                        def.id
                    ))
                    .with_operation("validate")
                    .with_context("scope", scope.as_str()));
                }
                if !defs.insert(def.id.as_str()) {
                    return Err(Error::invalid_schema(format!(
                        "attribute '{}' is declared twice",
                        def.id
                    ))
                    .with_operation("validate")
                    .with_context("scope", scope.as_str()));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphconv_error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_meta_defaults() {
        let meta: GraphMeta = serde_json::from_str("{}").unwrap();
        assert_eq!(meta, GraphMeta::default());
        assert_eq!(meta.id, "graph");
        assert_eq!(meta.edge_type, EdgeType::Undirected);

        let meta: GraphMeta =
            serde_json::from_str(r#"{"id":"g","edgeType":"mutual","mode":"dynamic"}"#).unwrap();
        assert_eq!(meta.edge_type, EdgeType::Mutual);
        assert_eq!(meta.mode, GraphMode::Dynamic);
        assert_eq!(
            serde_json::to_value(&meta).unwrap(),
            serde_json::json!({"id": "g", "edgeType": "mutual", "mode": "dynamic"})
        );
    }

    #[test]
    fn test_set_coerces_to_canonical_type() {
        let mut node = Element::node("a");
        node.set(Field::X, Scalar::String("1.5".into())).unwrap();
        node.set(Field::Label, Scalar::Number(7.0)).unwrap();
        node.set(Field::Color, Scalar::String("#ff0000".into())).unwrap();

        assert_eq!(node.x, Some(1.5));
        assert_eq!(node.label.as_deref(), Some("7"));
        assert_eq!(node.color, Some(Rgb::new(255, 0, 0)));
        assert_eq!(
            node.get(Field::Color),
            Some(Scalar::String("rgb(255, 0, 0)".into()))
        );

        let err = node.set(Field::Size, Scalar::Boolean(true)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        let err = node.set(Field::Color, Scalar::Number(3.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidColor);
    }

    #[test]
    fn test_set_attribute_promotes_reserved() {
        let mut node = Element::node("a");
        node.set_attribute("weight", Scalar::Number(5.0)).unwrap();
        node.set_attribute("kind", Scalar::from("person")).unwrap();

        assert_eq!(node.weight, Some(5.0));
        assert!(!node.attributes.contains_key("weight"));
        assert_eq!(node.attributes.get("kind"), Some(&Scalar::from("person")));
    }

    #[test]
    fn test_normalize_edge() {
        let mut edge = Element::edge("e", "a", "b");
        edge.size = Some(2.0);
        edge.normalize_edge();
        assert_eq!((edge.size, edge.weight), (None, Some(2.0)));

        let mut edge = Element::edge("e", "a", "b");
        edge.size = Some(2.0);
        edge.weight = Some(3.0);
        edge.normalize_edge();
        assert_eq!((edge.size, edge.weight), (None, Some(3.0)));
    }

    #[test]
    fn test_validate() {
        let mut doc = GraphDocument::default();
        doc.nodes.push(Element::node("a"));
        doc.nodes.push(Element::node("b"));
        doc.edges.push(Element::edge("e", "a", "b"));
        doc.node_schema.push(AttributeDef::new("kind", AttributeType::String));
        assert!(doc.validate().is_ok());

        let mut dup = doc.clone();
        dup.nodes.push(Element::node("a"));
        assert_eq!(dup.validate().unwrap_err().kind(), ErrorKind::DuplicateId);

        let mut dup = doc.clone();
        dup.node_schema.push(AttributeDef::new("kind", AttributeType::Number));
        assert_eq!(dup.validate().unwrap_err().kind(), ErrorKind::InvalidSchema);

        let mut reserved = doc.clone();
        reserved.edge_schema.push(AttributeDef::new("weight", AttributeType::Number));
        assert!(reserved.validate().is_ok());
        reserved.edge_schema.push(AttributeDef::new("source", AttributeType::String));
        let err = reserved.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSchema);
        assert_eq!(err.context_value("scope"), Some("edge"));

        let mut dangling = doc.clone();
        dangling.edges.push(Element::node("e2"));
        let err = dangling.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.context_value("field"), Some("source"));

        let mut shadow = doc;
        shadow.nodes[0]
            .attributes
            .insert("label".into(), Scalar::from("x"));
        assert_eq!(shadow.validate().unwrap_err().kind(), ErrorKind::InvalidSchema);
    }

    #[test]
    fn test_complete_schema_infers_undeclared() {
        let mut doc = GraphDocument::default();
        let mut a = Element::node("a");
        a.attributes.insert("kind".into(), Scalar::from("x"));
        a.attributes.insert("rank".into(), Scalar::Number(1.0));
        doc.nodes.push(a);
        doc.node_schema.push(AttributeDef::new("kind", AttributeType::String).with_title("Kind"));

        let schema = doc.complete_schema(Scope::Node);
        assert_eq!(
            schema,
            vec![
                AttributeDef::new("kind", AttributeType::String).with_title("Kind"),
                AttributeDef::new("rank", AttributeType::Number),
            ]
        );
        assert!(doc.complete_schema(Scope::Edge).is_empty());
    }
}
