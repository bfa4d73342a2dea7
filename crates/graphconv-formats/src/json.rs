//! Plain JSON node/edge format.
//!
//! ```json
//! {"attributes": {"id": "g", "edgeType": "directed", "mode": "static"},
//!  "nodes": [{"id": "A", "label": "Alpha", "attributes": {"score": 3}}],
//!  "edges": [{"id": "E1", "source": "A", "target": "B", "color": "rgb(0, 255, 0)"}]}
//! ```
//!
//! Reserved fields sit at the top level of each element; every other field,
//! whether top-level or inside a nested `attributes` object, ends up in the
//! element's attributes.

use graphconv_core::{
    Element, Error, FIELD_RULES, Field, GraphDocument, GraphMeta, Result, Scalar, Scope,
    format_number, infer_schema, reserved_names,
};
use serde_json::{Map, Value};

use crate::ExportOptions;

const ATTRIBUTES: &str = "attributes";

/// Import from a JSON string.
pub fn import_json_str(text: &str) -> Result<GraphDocument> {
    let value: Value = serde_json::from_str(text).map_err(|err| {
        Error::parse_failed("invalid JSON")
            .with_operation("json::import")
            .set_source(err)
    })?;
    import_json(&value)
}

/// Import from a parsed JSON value.
pub fn import_json(value: &Value) -> Result<GraphDocument> {
    let root = value
        .as_object()
        .ok_or_else(|| Error::invalid_value("graph", "a JSON object").with_operation("json::import"))?;

    let meta = read_meta(root).map_err(|err| err.with_operation("json::import"))?;
    let nodes = read_elements(root, Scope::Node, true)?;
    let edges = read_elements(root, Scope::Edge, false)?;

    let reserved = reserved_names();
    let doc = GraphDocument {
        node_schema: infer_schema(nodes.iter().map(|n| &n.attributes), &reserved),
        edge_schema: infer_schema(edges.iter().map(|e| &e.attributes), &reserved),
        nodes,
        edges,
        meta,
    };
    doc.validate().map_err(|err| err.with_operation("json::import"))?;

    tracing::debug!(
        nodes = doc.nodes.len(),
        edges = doc.edges.len(),
        "imported JSON graph"
    );
    Ok(doc)
}

pub(crate) fn read_meta(root: &Map<String, Value>) -> Result<GraphMeta> {
    match root.get(ATTRIBUTES) {
        None | Some(Value::Null) => Ok(GraphMeta::default()),
        Some(value) => serde_json::from_value(value.clone()).map_err(|err| {
            Error::invalid_value(ATTRIBUTES, "graph metadata {id, edgeType, mode}").set_source(err)
        }),
    }
}

fn collection(scope: Scope) -> &'static str {
    match scope {
        Scope::Node => "nodes",
        Scope::Edge => "edges",
    }
}

fn read_elements(root: &Map<String, Value>, scope: Scope, required: bool) -> Result<Vec<Element>> {
    let name = collection(scope);
    let items: &[Value] = match root.get(name) {
        Some(Value::Array(items)) => items.as_slice(),
        None | Some(Value::Null) if !required => &[],
        None => return Err(Error::missing_field(name).with_operation("json::import")),
        Some(_) => {
            return Err(Error::invalid_value(name, "an array").with_operation("json::import"));
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            read_element(item, scope).map_err(|err| {
                err.with_operation("json::import")
                    .with_context("scope", scope.as_str())
                    .with_context("index", index.to_string())
            })
        })
        .collect()
}

fn read_element(item: &Value, scope: Scope) -> Result<Element> {
    let object = item
        .as_object()
        .ok_or_else(|| Error::invalid_value(scope.as_str(), "a JSON object"))?;

    let mut element = Element::default();
    element.id = match object.get("id") {
        Some(Value::String(id)) => id.clone(),
        // Same spelling as numeric endpoints, so `2.0` and `2` name one node.
        Some(Value::Number(id)) => id.as_f64().map_or_else(|| id.to_string(), format_number),
        None | Some(Value::Null) => return Err(Error::missing_field("id")),
        Some(_) => return Err(Error::invalid_value("id", "a string or a number")),
    };

    for (name, value) in object {
        match (name.as_str(), value) {
            ("id", _) => {}
            (ATTRIBUTES, Value::Object(nested)) => {
                for (name, value) in nested {
                    if Field::from_name(name).is_some_and(Field::is_identity) {
                        return Err(Error::invalid_value(
                            format!("{ATTRIBUTES}.{name}"),
                            "given at the top level of the element",
                        ));
                    }
                    if let Some(scalar) = Scalar::from_json(value) {
                        element.set_attribute(name, scalar)?;
                    }
                }
            }
            (name, value) => {
                if let Some(scalar) = Scalar::from_json(value) {
                    element.set_attribute(name, scalar)?;
                }
            }
        }
    }

    if scope == Scope::Edge {
        for endpoint in [Field::Source, Field::Target] {
            if !element.has(endpoint) {
                return Err(Error::missing_field(endpoint.name()));
            }
        }
        element.normalize_edge();
    }
    Ok(element)
}

/// Reserved fields of an element as a JSON object, colors as `rgb(r, g, b)`.
pub(crate) fn reserved_to_json(element: &Element, skip_identity: bool) -> Map<String, Value> {
    let mut object = Map::new();
    for rule in FIELD_RULES.iter() {
        if skip_identity && rule.field.is_identity() {
            continue;
        }
        if let Some(value) = element.get(rule.field) {
            object.insert(rule.field.name().to_string(), value.to_json());
        }
    }
    object
}

pub(crate) fn attributes_to_json(element: &Element) -> Map<String, Value> {
    element
        .attributes
        .iter()
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect()
}

fn element_to_json(element: &Element) -> Value {
    let mut object = reserved_to_json(element, false);
    if !element.attributes.is_empty() {
        object.insert(ATTRIBUTES.to_string(), Value::Object(attributes_to_json(element)));
    }
    Value::Object(object)
}

pub(crate) fn meta_to_json(meta: &GraphMeta) -> Result<Value> {
    serde_json::to_value(meta).map_err(|err| {
        Error::serialization_failed("cannot serialize graph metadata").set_source(err)
    })
}

/// Render as a JSON value.
pub fn to_json_value(doc: &GraphDocument) -> Result<Value> {
    doc.validate()
        .map_err(|err| err.with_operation("json::export"))?;

    let mut root = Map::new();
    root.insert(ATTRIBUTES.to_string(), meta_to_json(&doc.meta)?);
    root.insert(
        "nodes".to_string(),
        Value::Array(doc.nodes.iter().map(element_to_json).collect()),
    );
    root.insert(
        "edges".to_string(),
        Value::Array(doc.edges.iter().map(element_to_json).collect()),
    );
    Ok(Value::Object(root))
}

pub fn to_json(doc: &GraphDocument) -> Result<String> {
    to_json_with_options(doc, &ExportOptions::default())
}

pub fn to_json_with_options(doc: &GraphDocument, options: &ExportOptions) -> Result<String> {
    let value = to_json_value(doc)?;
    tracing::debug!(nodes = doc.nodes.len(), edges = doc.edges.len(), "exporting JSON");
    options.render_json(&value)
}
