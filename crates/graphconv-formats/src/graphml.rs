//! GraphML and its yEd flavor.

use graphconv_core::{
    AttributeDef, COLOR_CHANNELS, EdgeType, Error, FIELD_RULES, Field, GraphDocument, GraphMeta,
    GraphmlRule, PresenceIndex, Result, Scope, extend_schema, infer_schema, reserved_names,
};
use graphconv_xml::XmlElement;

use crate::ExportOptions;
use crate::shape::graphml::{Flavor, KeyTable, element_to_tree, tree_to_element};
use crate::shape::yed;

pub const NAMESPACE: &str = "http://graphml.graphdrawing.org/xmlns";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str =
    "http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd";

/// Import GraphML text, plain or yEd.
///
/// XML syntax errors are reported as `ParseFailed`; anything wrong with the
/// document structure as `MalformedFile`, with the specific cause chained.
pub fn import_graphml(text: &str) -> Result<GraphDocument> {
    let root = graphconv_xml::parse(text).map_err(|err| err.with_operation("graphml::import"))?;
    import_graphml_tree(&root)
}

/// Import an already parsed GraphML tree.
pub fn import_graphml_tree(root: &XmlElement) -> Result<GraphDocument> {
    let doc = read_document(root).map_err(|err| {
        Error::malformed_file("graphml")
            .with_operation("graphml::import")
            .set_source(err)
    })?;
    tracing::debug!(
        nodes = doc.nodes.len(),
        edges = doc.edges.len(),
        "imported GraphML graph"
    );
    Ok(doc)
}

fn read_document(root: &XmlElement) -> Result<GraphDocument> {
    if root.name != "graphml" {
        return Err(Error::invalid_value("root", "a <graphml> element"));
    }
    let keys = KeyTable::from_root(root)?;
    let graph = root
        .child("graph")
        .ok_or_else(|| Error::missing_field("graphml.graph"))?;

    let mut meta = GraphMeta::default();
    if let Some(id) = graph.attr("id") {
        meta.id = id.to_string();
    }
    meta.edge_type = match graph.attr("edgedefault") {
        Some("directed") => EdgeType::Directed,
        Some("undirected") | None => EdgeType::Undirected,
        Some(_) => return Err(Error::invalid_value("edgedefault", "directed or undirected")),
    };

    let mut doc = GraphDocument::new(meta);
    doc.node_schema = keys.schema(Scope::Node);
    doc.edge_schema = keys.schema(Scope::Edge);

    for (index, tree) in graph.children_named("node").enumerate() {
        let node = tree_to_element(tree, Scope::Node, index, &keys)
            .map_err(|err| err.with_context("node", index.to_string()))?;
        doc.nodes.push(node);
    }
    for (index, tree) in graph.children_named("edge").enumerate() {
        let mut edge = tree_to_element(tree, Scope::Edge, index, &keys)
            .map_err(|err| err.with_context("edge", index.to_string()))?;
        edge.normalize_edge();
        doc.edges.push(edge);
    }

    let reserved = reserved_names();
    let inferred = infer_schema(doc.nodes.iter().map(|n| &n.attributes), &reserved);
    extend_schema(&mut doc.node_schema, inferred);
    let inferred = infer_schema(doc.edges.iter().map(|e| &e.attributes), &reserved);
    extend_schema(&mut doc.edge_schema, inferred);

    doc.validate()?;
    Ok(doc)
}

fn key(id: &str, scope: Scope, name: &str, ty: &str) -> XmlElement {
    XmlElement::new("key")
        .with_attr("id", id)
        .with_attr("for", scope.as_str())
        .with_attr("attr.name", name)
        .with_attr("attr.type", ty)
}

/// Keys for the reserved fields of a scope, in table order.
///
/// A declared field keeps its title; a field some element uses but the
/// schema leaves out gets a synthesized key.
fn reserved_keys(
    scope: Scope,
    schema: &[AttributeDef],
    presence: &PresenceIndex,
    flavor: Flavor,
) -> Vec<XmlElement> {
    let mut keys = Vec::new();
    for rule in FIELD_RULES.iter() {
        let Some(synthesized) = rule.key_type else {
            continue;
        };
        let present = presence.contains(scope, rule.field);
        match rule.graphml {
            GraphmlRule::Attribute => {}
            GraphmlRule::Channels => {
                if present {
                    for channel in COLOR_CHANNELS {
                        tracing::trace!(scope = scope.as_str(), key = channel, "synthesized key");
                        keys.push(key(channel, scope, channel, synthesized));
                    }
                }
            }
            GraphmlRule::Data => {
                let name = rule.field.name();
                if flavor == Flavor::Yed && rule.field == Field::Label {
                    continue;
                }
                match schema.iter().find(|def| def.id == name) {
                    Some(def) => {
                        // A canonical type keeps the synthesized spelling.
                        let ty = if rule.ty == Some(def.ty) {
                            synthesized
                        } else {
                            def.ty.to_wire()
                        };
                        keys.push(key(name, scope, &def.title, ty));
                    }
                    None if present => {
                        tracing::trace!(scope = scope.as_str(), key = name, "synthesized key");
                        keys.push(key(name, scope, name, synthesized));
                    }
                    None => {}
                }
            }
        }
    }
    keys
}

/// GraphML spells color as `r`/`g`/`b` keys, so no attribute may use those ids.
fn check_channel_ids(scope: Scope, schema: &[AttributeDef]) -> Result<()> {
    match schema.iter().find(|def| COLOR_CHANNELS.contains(&def.id.as_str())) {
        Some(def) => Err(Error::invalid_schema(format!(
            "attribute '{}' collides with a color channel key",
            def.id
        ))
        .with_operation("graphml::export")
        .with_context("scope", scope.as_str())),
        None => Ok(()),
    }
}

fn edge_default(edge_type: EdgeType) -> &'static str {
    match edge_type {
        EdgeType::Directed => "directed",
        EdgeType::Undirected => "undirected",
        EdgeType::Mutual => {
            tracing::warn!("GraphML has no mutual edges, exporting as directed");
            "directed"
        }
    }
}

fn to_tree(doc: &GraphDocument, flavor: Flavor) -> Result<XmlElement> {
    doc.validate()
        .map_err(|err| err.with_operation("graphml::export"))?;

    let mut root = XmlElement::new("graphml").with_attr("xmlns", NAMESPACE);
    if flavor == Flavor::Yed {
        root.push_attr("xmlns:y", yed::NAMESPACE);
    }
    root.push_attr("xmlns:xsi", XSI_NAMESPACE);
    root.push_attr("xsi:schemaLocation", SCHEMA_LOCATION);

    let node_schema = doc.complete_schema(Scope::Node);
    let edge_schema = doc.complete_schema(Scope::Edge);
    for (scope, schema) in [(Scope::Node, &node_schema), (Scope::Edge, &edge_schema)] {
        check_channel_ids(scope, schema)?;
        for def in schema.iter().filter(|def| !Field::is_reserved(&def.id)) {
            root.push_child(key(&def.id, scope, &def.title, def.ty.to_wire()));
        }
    }

    let presence = PresenceIndex::build(doc);
    for (scope, schema) in [(Scope::Node, &node_schema), (Scope::Edge, &edge_schema)] {
        for decl in reserved_keys(scope, schema, &presence, flavor) {
            root.push_child(decl);
        }
    }
    if flavor == Flavor::Yed {
        root.push_child(yed::graphics_key_decl(Scope::Node));
        root.push_child(yed::graphics_key_decl(Scope::Edge));
    }

    let mut graph = XmlElement::new("graph")
        .with_attr("id", doc.meta.id.as_str())
        .with_attr("edgedefault", edge_default(doc.meta.edge_type));
    for node in &doc.nodes {
        graph.push_child(element_to_tree(Scope::Node, node, &node_schema, flavor));
    }
    for edge in &doc.edges {
        graph.push_child(element_to_tree(Scope::Edge, edge, &edge_schema, flavor));
    }
    Ok(root.with_child(graph))
}

/// Build the GraphML tree of a document.
pub fn to_graphml_tree(doc: &GraphDocument) -> Result<XmlElement> {
    to_tree(doc, Flavor::Plain)
}

/// Build the yEd-flavored GraphML tree of a document.
pub fn to_yed_graphml_tree(doc: &GraphDocument) -> Result<XmlElement> {
    to_tree(doc, Flavor::Yed)
}

pub fn to_graphml(doc: &GraphDocument) -> Result<String> {
    to_graphml_with_options(doc, &ExportOptions::default())
}

pub fn to_graphml_with_options(doc: &GraphDocument, options: &ExportOptions) -> Result<String> {
    let tree = to_graphml_tree(doc)?;
    tracing::debug!(nodes = doc.nodes.len(), edges = doc.edges.len(), "exporting GraphML");
    graphconv_xml::write(&tree, &options.write_options())
}

pub fn to_yed_graphml(doc: &GraphDocument) -> Result<String> {
    to_yed_graphml_with_options(doc, &ExportOptions::default())
}

pub fn to_yed_graphml_with_options(doc: &GraphDocument, options: &ExportOptions) -> Result<String> {
    let tree = to_yed_graphml_tree(doc)?;
    tracing::debug!(nodes = doc.nodes.len(), edges = doc.edges.len(), "exporting yEd GraphML");
    graphconv_xml::write(&tree, &options.write_options())
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphconv_core::{AttributeType, Element, ErrorKind, Rgb, Scalar};
    use pretty_assertions::assert_eq;

    fn key_ids(tree: &XmlElement, scope: Scope) -> Vec<String> {
        tree.children_named("key")
            .filter(|k| k.attr("for") == Some(scope.as_str()))
            .filter_map(|k| k.attr("id").map(str::to_string))
            .collect()
    }

    #[test]
    fn test_synthesis_only_for_present_fields() {
        let mut doc = GraphDocument::default();
        let mut a = Element::node("a");
        a.x = Some(1.0);
        a.y = Some(2.0);
        doc.nodes.push(a);
        doc.nodes.push(Element::node("b"));

        let tree = to_graphml_tree(&doc).unwrap();
        assert_eq!(key_ids(&tree, Scope::Node), vec!["x", "y"]);
        let x = tree.child("key").unwrap();
        assert_eq!(x.attr("attr.type"), Some("float"));

        let bare = GraphDocument {
            nodes: vec![Element::node("a")],
            ..Default::default()
        };
        let tree = to_graphml_tree(&bare).unwrap();
        assert_eq!(tree.children_named("key").count(), 0);
    }

    #[test]
    fn test_declared_keys_suppress_synthesis() {
        let mut doc = GraphDocument::default();
        let mut a = Element::node("a");
        a.x = Some(1.0);
        a.attributes.insert("rank".into(), Scalar::Number(1.0));
        doc.nodes.push(a);
        doc.node_schema.push(AttributeDef::new("x", AttributeType::Number));

        doc.node_schema[0].title = "X".into();

        let tree = to_graphml_tree(&doc).unwrap();
        assert_eq!(key_ids(&tree, Scope::Node), vec!["rank", "x"]);
        let x = tree.children_named("key").find(|k| k.attr("id") == Some("x")).unwrap();
        assert_eq!(x.attr("attr.name"), Some("X"));
        assert_eq!(x.attr("attr.type"), Some("float"));

        let node = tree.find("node").unwrap();
        assert_eq!(node.children_named("data").filter(|d| d.attr("key") == Some("x")).count(), 1);

        let back = import_graphml(&to_graphml(&doc).unwrap()).unwrap();
        assert_eq!(back.node_schema[1], AttributeDef::new("x", AttributeType::Number).with_title("X"));
        assert_eq!(to_graphml(&back).unwrap(), to_graphml(&doc).unwrap());
    }

    #[test]
    fn test_color_channel_ids_are_refused() {
        let mut doc = GraphDocument::default();
        let mut a = Element::node("a");
        a.attributes.insert("r".into(), Scalar::Number(7.0));
        doc.nodes.push(a);

        let err = to_graphml_tree(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSchema);
        assert_eq!(err.context_value("scope"), Some("node"));
        assert_eq!(to_yed_graphml_tree(&doc).unwrap_err().kind(), ErrorKind::InvalidSchema);
    }

    #[test]
    fn test_mutual_exports_directed() {
        let mut doc = GraphDocument::default();
        doc.meta.edge_type = EdgeType::Mutual;
        let tree = to_graphml_tree(&doc).unwrap();
        assert_eq!(
            tree.child("graph").and_then(|g| g.attr("edgedefault")),
            Some("directed")
        );
    }

    #[test]
    fn test_yed_flavor() {
        let mut doc = GraphDocument::default();
        let mut a = Element::node("a");
        a.label = Some("Alpha".into());
        doc.nodes.push(a);
        doc.nodes.push(Element::node("b"));
        let mut e = Element::edge("e", "a", "b");
        e.label = Some("link".into());
        e.color = Some(Rgb::new(0, 0, 255));
        doc.edges.push(e);

        let tree = to_yed_graphml_tree(&doc).unwrap();
        assert_eq!(tree.attr("xmlns:y"), Some(yed::NAMESPACE));
        assert_eq!(key_ids(&tree, Scope::Node), vec!["d4"]);
        assert_eq!(key_ids(&tree, Scope::Edge), vec!["r", "g", "b", "d9"]);

        let back = import_graphml(&to_yed_graphml(&doc).unwrap()).unwrap();
        assert_eq!(back.nodes[0].label.as_deref(), Some("Alpha"));
        assert_eq!(back.edges[0].label.as_deref(), Some("link"));
        assert_eq!(back.edges[0].color, Some(Rgb::new(0, 0, 255)));
        assert!(back.node_schema.is_empty());
    }

    #[test]
    fn test_import_keys_and_errors() {
        let doc = import_graphml(
            r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns">
                 <key id="w" for="edge" attr.name="weight" attr.type="double"/>
                 <key id="n" for="all" attr.name="note" attr.type="string"/>
                 <graph id="G" edgedefault="directed">
                   <node id="a"><data key="n">hi</data></node>
                   <node id="b"/>
                   <edge source="a" target="b"><data key="w">0.5</data></edge>
                 </graph>
               </graphml>"#,
        )
        .unwrap();
        assert_eq!(doc.meta.id, "G");
        assert_eq!(doc.meta.edge_type, EdgeType::Directed);
        assert_eq!(doc.edges[0].id, "e0");
        assert_eq!(doc.edges[0].weight, Some(0.5));
        assert_eq!(doc.nodes[0].attributes.get("n"), Some(&Scalar::from("hi")));
        assert_eq!(
            doc.node_schema,
            vec![AttributeDef::new("n", AttributeType::String).with_title("note")]
        );
        assert_eq!(
            doc.edge_schema,
            vec![
                AttributeDef::new("weight", AttributeType::Number),
                AttributeDef::new("n", AttributeType::String).with_title("note"),
            ]
        );

        let err = import_graphml("<graphml><graph><node/></graph></graphml>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedFile);

        let err = import_graphml("<graphml><graph>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailed);
    }
}
