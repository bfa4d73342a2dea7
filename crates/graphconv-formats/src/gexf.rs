//! GEXF 1.3.

use std::str::FromStr;

use graphconv_core::{
    AttributeDef, AttributeType, Error, Field, GraphDocument, GraphMeta, Result, Scope,
    extend_schema, infer_schema, reserved_names,
};
use graphconv_xml::XmlElement;

use crate::ExportOptions;
use crate::shape::gexf::{element_to_tree, tree_to_element};

pub const NAMESPACE: &str = "http://www.gexf.net/1.3";
pub const VIZ_NAMESPACE: &str = "http://www.gexf.net/1.3/viz";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str = "http://www.gexf.net/1.3 http://www.gexf.net/1.3/gexf.xsd";
const VERSION: &str = "1.3";

/// Import GEXF text.
///
/// XML syntax errors are reported as `ParseFailed`; anything wrong with the
/// document structure as `MalformedFile`, with the specific cause chained.
pub fn import_gexf(text: &str) -> Result<GraphDocument> {
    let root = graphconv_xml::parse(text).map_err(|err| err.with_operation("gexf::import"))?;
    import_gexf_tree(&root)
}

/// Import an already parsed GEXF tree.
pub fn import_gexf_tree(root: &XmlElement) -> Result<GraphDocument> {
    let doc = read_document(root).map_err(|err| {
        Error::malformed_file("gexf")
            .with_operation("gexf::import")
            .set_source(err)
    })?;
    tracing::debug!(
        nodes = doc.nodes.len(),
        edges = doc.edges.len(),
        "imported GEXF graph"
    );
    Ok(doc)
}

fn read_document(root: &XmlElement) -> Result<GraphDocument> {
    if root.name != "gexf" {
        return Err(Error::invalid_value("root", "a <gexf> element"));
    }
    let graph = root
        .child("graph")
        .ok_or_else(|| Error::missing_field("gexf.graph"))?;

    let mut doc = GraphDocument::new(read_meta(graph)?);
    for block in graph.children_named("attributes") {
        let scope = match block.attr("class") {
            Some("node") => Scope::Node,
            Some("edge") => Scope::Edge,
            _ => continue,
        };
        let schema = match scope {
            Scope::Node => &mut doc.node_schema,
            Scope::Edge => &mut doc.edge_schema,
        };
        read_schema(block, schema)?;
    }

    let nodes = graph
        .child("nodes")
        .ok_or_else(|| Error::missing_field("graph.nodes"))?;
    for (index, tree) in nodes.children_named("node").enumerate() {
        let node = tree_to_element(tree, Scope::Node, index, &doc.node_schema)
            .map_err(|err| err.with_context("node", index.to_string()))?;
        doc.nodes.push(node);
    }
    if let Some(edges) = graph.child("edges") {
        for (index, tree) in edges.children_named("edge").enumerate() {
            let mut edge = tree_to_element(tree, Scope::Edge, index, &doc.edge_schema)
                .map_err(|err| err.with_context("edge", index.to_string()))?;
            edge.normalize_edge();
            doc.edges.push(edge);
        }
    }

    let reserved = reserved_names();
    let inferred = infer_schema(doc.nodes.iter().map(|n| &n.attributes), &reserved);
    extend_schema(&mut doc.node_schema, inferred);
    let inferred = infer_schema(doc.edges.iter().map(|e| &e.attributes), &reserved);
    extend_schema(&mut doc.edge_schema, inferred);

    doc.validate()?;
    Ok(doc)
}

fn read_meta(graph: &XmlElement) -> Result<GraphMeta> {
    let mut meta = GraphMeta::default();
    if let Some(id) = graph.attr("id") {
        meta.id = id.to_string();
    }
    if let Some(edge_type) = graph.attr("defaultedgetype") {
        meta.edge_type = parse_enum("defaultedgetype", edge_type, "directed, undirected or mutual")?;
    }
    if let Some(mode) = graph.attr("mode") {
        meta.mode = parse_enum("mode", mode, "static or dynamic")?;
    }
    Ok(meta)
}

fn parse_enum<T>(field: &'static str, value: &str, expected: &str) -> Result<T>
where
    T: FromStr<Err = strum::ParseError>,
{
    value
        .parse()
        .map_err(|err| Error::invalid_value(field, expected).set_source(err))
}

fn read_schema(block: &XmlElement, schema: &mut Vec<AttributeDef>) -> Result<()> {
    for attribute in block.children_named("attribute") {
        let id = attribute
            .attr("id")
            .ok_or_else(|| Error::missing_field("attribute.id"))?;
        let identity = Field::from_name(id).is_some_and(Field::is_identity);
        if identity || schema.iter().any(|def| def.id == id) {
            continue;
        }
        let ty = AttributeType::from_wire(attribute.attr("type").unwrap_or("string"));
        let title = attribute.attr("title").unwrap_or(id);
        schema.push(AttributeDef::new(id, ty).with_title(title));
    }
    Ok(())
}

fn schema_block(scope: Scope, schema: &[AttributeDef]) -> XmlElement {
    let mut block = XmlElement::new("attributes")
        .with_attr("class", scope.as_str())
        .with_attr("mode", "static");
    for def in schema {
        block.push_child(
            XmlElement::new("attribute")
                .with_attr("id", def.id.as_str())
                .with_attr("title", def.title.as_str())
                .with_attr("type", def.ty.to_wire()),
        );
    }
    block
}

/// Build the GEXF tree of a document.
pub fn to_gexf_tree(doc: &GraphDocument) -> Result<XmlElement> {
    doc.validate()
        .map_err(|err| err.with_operation("gexf::export"))?;

    let mut graph = XmlElement::new("graph")
        .with_attr("id", doc.meta.id.as_str())
        .with_attr("mode", doc.meta.mode.to_string())
        .with_attr("defaultedgetype", doc.meta.edge_type.to_string());

    let mut collections = Vec::new();
    for (scope, tag) in [(Scope::Node, "nodes"), (Scope::Edge, "edges")] {
        let schema = doc.complete_schema(scope);
        graph.push_child(schema_block(scope, &schema));
        let mut collection = XmlElement::new(tag);
        for element in doc.elements(scope) {
            collection.push_child(element_to_tree(scope, element, &schema));
        }
        collections.push(collection);
    }
    for collection in collections {
        graph.push_child(collection);
    }

    Ok(XmlElement::new("gexf")
        .with_attr("xmlns", NAMESPACE)
        .with_attr("xmlns:viz", VIZ_NAMESPACE)
        .with_attr("xmlns:xsi", XSI_NAMESPACE)
        .with_attr("xsi:schemaLocation", SCHEMA_LOCATION)
        .with_attr("version", VERSION)
        .with_child(graph))
}

pub fn to_gexf(doc: &GraphDocument) -> Result<String> {
    to_gexf_with_options(doc, &ExportOptions::default())
}

pub fn to_gexf_with_options(doc: &GraphDocument, options: &ExportOptions) -> Result<String> {
    let tree = to_gexf_tree(doc)?;
    tracing::debug!(nodes = doc.nodes.len(), edges = doc.edges.len(), "exporting GEXF");
    graphconv_xml::write(&tree, &options.write_options())
}
