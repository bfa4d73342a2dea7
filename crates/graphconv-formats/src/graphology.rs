//! Graphology serialization format.
//!
//! Every element wraps its fields in an `attributes` object next to its
//! `key`. Import flattens that wrapper into the plain JSON shape and reuses
//! the JSON importer.

use graphconv_core::{EdgeType, Error, GraphDocument, Result, Scalar, Scope};
use serde_json::{Map, Value, json};

use crate::ExportOptions;
use crate::json::{attributes_to_json, import_json, meta_to_json, reserved_to_json};

const OPERATION: &str = "graphology::import";
const UNDIRECTED: &str = "undirected";

pub fn import_graphology_str(text: &str) -> Result<GraphDocument> {
    let value: Value = serde_json::from_str(text).map_err(|err| {
        Error::parse_failed("invalid JSON")
            .with_operation(OPERATION)
            .set_source(err)
    })?;
    import_graphology(&value)
}

pub fn import_graphology(value: &Value) -> Result<GraphDocument> {
    let root = value
        .as_object()
        .ok_or_else(|| Error::invalid_value("graph", "a JSON object").with_operation(OPERATION))?;

    let meta = flatten_meta(root);
    let graph_undirected = !matches!(
        meta.get("edgeType").and_then(Value::as_str),
        Some("directed" | "mutual")
    );
    let mut flat = Map::new();
    flat.insert("attributes".to_string(), Value::Object(meta));
    for (name, scope) in [("nodes", Scope::Node), ("edges", Scope::Edge)] {
        let items = match root.get(name) {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => continue,
            Some(_) => {
                return Err(Error::invalid_value(name, "an array").with_operation(OPERATION));
            }
        };
        let flattened = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                flatten_element(item, scope, index, graph_undirected).map_err(|err| {
                    err.with_operation(OPERATION)
                        .with_context("scope", scope.as_str())
                        .with_context("index", index.to_string())
                })
            })
            .collect::<Result<Vec<_>>>()?;
        flat.insert(name.to_string(), Value::Array(flattened));
    }

    import_json(&Value::Object(flat)).map_err(|err| err.with_operation(OPERATION))
}

/// Graph attributes, with `options.type` standing in for a missing `edgeType`.
fn flatten_meta(root: &Map<String, Value>) -> Map<String, Value> {
    let mut meta = match root.get("attributes") {
        Some(Value::Object(attributes)) => attributes.clone(),
        _ => Map::new(),
    };
    // Graphology exports name the graph; the id takes precedence.
    meta.remove("name");
    if !meta.contains_key("edgeType") {
        let graph_type = root
            .get("options")
            .and_then(|options| options.get("type"))
            .and_then(Value::as_str);
        if let Some(ty @ ("directed" | "undirected")) = graph_type {
            meta.insert("edgeType".to_string(), Value::from(ty));
        }
    }
    meta
}

/// Flatten `{key, source, target, undirected, attributes}` into one object.
///
/// An edge's `undirected` flag is kept as an attribute only when it
/// disagrees with the graph type, so mixed graphs keep per-edge direction.
fn flatten_element(
    item: &Value,
    scope: Scope,
    index: usize,
    graph_undirected: bool,
) -> Result<Value> {
    let object = item
        .as_object()
        .ok_or_else(|| Error::invalid_value(scope.as_str(), "a JSON object"))?;

    let mut flat = match object.get("attributes") {
        Some(Value::Object(attributes)) => attributes.clone(),
        None | Some(Value::Null) => Map::new(),
        Some(_) => return Err(Error::invalid_value("attributes", "a JSON object")),
    };

    let key = match (object.get("key"), scope) {
        (Some(key @ (Value::String(_) | Value::Number(_))), _) => key.clone(),
        (None | Some(Value::Null), Scope::Edge) => Value::from(format!("e{index}")),
        (None | Some(Value::Null), Scope::Node) => return Err(Error::missing_field("key")),
        (Some(_), _) => return Err(Error::invalid_value("key", "a string or a number")),
    };
    flat.insert("id".to_string(), key);

    if scope == Scope::Edge {
        for endpoint in ["source", "target"] {
            let value = object
                .get(endpoint)
                .filter(|v| !v.is_null())
                .ok_or_else(|| Error::missing_field(endpoint))?;
            flat.insert(endpoint.to_string(), value.clone());
        }
        match object.get(UNDIRECTED) {
            Some(Value::Bool(flag)) if *flag != graph_undirected => {
                flat.insert(UNDIRECTED.to_string(), Value::Bool(*flag));
            }
            None | Some(Value::Null | Value::Bool(_)) => {}
            Some(_) => return Err(Error::invalid_value(UNDIRECTED, "a boolean")),
        }
    }
    Ok(Value::Object(flat))
}

/// Render as a Graphology JSON value.
pub fn to_graphology_value(doc: &GraphDocument) -> Result<Value> {
    doc.validate()
        .map_err(|err| err.with_operation("graphology::export"))?;

    let mut meta = meta_to_json(&doc.meta)?;
    if let Value::Object(meta) = &mut meta {
        meta.insert("name".to_string(), Value::from(doc.meta.id.as_str()));
    }

    let undirected = doc.meta.edge_type == EdgeType::Undirected;
    let graph_type = if undirected { "undirected" } else { "directed" };

    let nodes: Vec<Value> = doc
        .nodes
        .iter()
        .map(|node| {
            let mut attributes = reserved_to_json(node, true);
            attributes.extend(attributes_to_json(node));
            json!({"key": node.id, "attributes": attributes})
        })
        .collect();

    let edges: Vec<Value> = doc
        .edges
        .iter()
        .map(|edge| {
            let mut attributes = reserved_to_json(edge, true);
            attributes.extend(attributes_to_json(edge));
            let flag = match edge.attributes.get(UNDIRECTED) {
                Some(Scalar::Boolean(flag)) => *flag,
                _ => undirected,
            };
            json!({
                "key": edge.id,
                "source": edge.source,
                "target": edge.target,
                "undirected": flag,
                "attributes": attributes,
            })
        })
        .collect();

    Ok(json!({
        "attributes": meta,
        "options": {"type": graph_type},
        "nodes": nodes,
        "edges": edges,
    }))
}

pub fn to_graphology(doc: &GraphDocument) -> Result<String> {
    to_graphology_with_options(doc, &ExportOptions::default())
}

pub fn to_graphology_with_options(doc: &GraphDocument, options: &ExportOptions) -> Result<String> {
    let value = to_graphology_value(doc)?;
    tracing::debug!(
        nodes = doc.nodes.len(),
        edges = doc.edges.len(),
        "exporting Graphology"
    );
    options.render_json(&value)
}
