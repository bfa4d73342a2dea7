use graphconv_core::{AttributeType, EdgeType, GraphDocument, Rgb, Scalar};
use graphconv_formats::{
    ExportOptions, GraphFormat, import_gexf, import_graphml, import_json, import_json_str,
    to_gexf, to_graphml, to_json, to_yed_graphml,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use strum::IntoEnumIterator;

fn sample() -> GraphDocument {
    import_json(&json!({
        "attributes": {"id": "trade", "edgeType": "directed", "mode": "static"},
        "nodes": [
            {
                "id": "fr", "label": "France & co <EU>", "color": "#ff0000",
                "x": 1.5, "y": -2.25, "z": 0, "size": 12, "shape": "disc",
                "population": 68, "coastal": true, "capital": "Paris"
            },
            {"id": "de", "label": "Germany", "population": 84, "coastal": true},
            {"id": "ch", "attributes": {"capital": "Bern", "coastal": false}}
        ],
        "edges": [
            {
                "id": "fr-de", "source": "fr", "target": "de", "weight": 3.5,
                "color": "rgb(0, 0, 255)", "thickness": 2, "shape": "dashed",
                "edgelabel": "exports", "start": "2001", "end": "2020", "goods": "wine"
            },
            {"id": "de-ch", "source": "de", "target": "ch", "size": 1, "label": "road"}
        ]
    }))
    .unwrap()
}

#[test]
fn sample_document_is_normalized() {
    let doc = sample();
    assert_eq!(doc.nodes.len(), 3);
    assert_eq!(doc.nodes[0].color, Some(Rgb::new(255, 0, 0)));
    assert_eq!(doc.edges[1].weight, Some(1.0));
    assert_eq!(
        doc.node_schema
            .iter()
            .map(|def| (def.id.as_str(), def.ty))
            .collect::<Vec<_>>(),
        vec![
            ("capital", AttributeType::String),
            ("coastal", AttributeType::Boolean),
            ("population", AttributeType::Number),
        ]
    );
}

#[test]
fn every_format_round_trips_elements() {
    let doc = sample();
    for format in GraphFormat::iter() {
        let text = format.export(&doc, &ExportOptions::default()).unwrap();
        let back = format.import(&text).unwrap();
        assert_eq!(back.nodes, doc.nodes, "nodes through {format}");
        assert_eq!(back.edges, doc.edges, "edges through {format}");
        assert_eq!(back.meta.id, "trade", "graph id through {format}");
        assert_eq!(back.meta.edge_type, EdgeType::Directed, "edge type through {format}");
    }
}

#[test]
fn second_export_is_identical() {
    let doc = sample();
    for format in GraphFormat::iter() {
        for options in [ExportOptions::default(), ExportOptions::compact()] {
            let first = format.export(&doc, &options).unwrap();
            let second = format
                .export(&format.import(&first).unwrap(), &options)
                .unwrap();
            assert_eq!(first, second, "idempotence of {format}");
        }
    }
}

#[test]
fn mutual_edges_become_directed_in_graphml_only() {
    let mut doc = sample();
    doc.meta.edge_type = EdgeType::Mutual;

    let back = import_graphml(&to_graphml(&doc).unwrap()).unwrap();
    assert_eq!(back.meta.edge_type, EdgeType::Directed);
    assert_eq!(back.edges, doc.edges);

    let back = import_gexf(&to_gexf(&doc).unwrap()).unwrap();
    assert_eq!(back.meta.edge_type, EdgeType::Mutual);

    let back = import_json_str(&to_json(&doc).unwrap()).unwrap();
    assert_eq!(back.meta.edge_type, EdgeType::Mutual);
}

#[test]
fn concrete_scenario_synthesizes_weight_and_color_keys() {
    let doc = import_json(&json!({
        "nodes": [{"id": "A", "weight": 5}, {"id": "B"}],
        "edges": [{"id": "E1", "source": "A", "target": "B", "color": "#00ff00"}],
        "attributes": {"id": "g", "edgeType": "directed", "mode": "static"}
    }))
    .unwrap();

    let xml = to_graphml(&doc).unwrap();
    assert!(xml.contains(
        r#"<key id="weight" for="node" attr.name="weight" attr.type="float"/>"#
    ));
    assert!(xml.contains(r#"<key id="r" for="edge" attr.name="r" attr.type="int"/>"#));
    assert!(xml.contains(r#"<graph id="g" edgedefault="directed">"#));
    assert!(xml.contains(r#"<data key="weight">5</data>"#));

    let graph = graphconv_xml::parse(&xml).unwrap();
    let edge = graph.find("edge").unwrap();
    assert_eq!(edge.attr("id"), Some("E1"));
    let channels: Vec<(String, String)> = edge
        .children_named("data")
        .map(|d| (d.attr("key").unwrap_or_default().to_string(), d.text()))
        .collect();
    assert_eq!(
        channels,
        vec![
            ("r".to_string(), "0".to_string()),
            ("g".to_string(), "255".to_string()),
            ("b".to_string(), "0".to_string()),
        ]
    );
}

#[test]
fn synthesis_counts_match_presence() {
    let doc = import_json(&json!({
        "nodes": [{"id": "a", "x": 1, "y": 2}, {"id": "b", "x": 3}]
    }))
    .unwrap();
    let xml = to_graphml(&doc).unwrap();
    assert_eq!(xml.matches(r#"<key id="x" for="node""#).count(), 1);
    assert_eq!(xml.matches(r#"<key id="y" for="node""#).count(), 1);
    assert!(xml.contains(r#"attr.name="x" attr.type="float""#));

    let doc = import_json(&json!({"nodes": [{"id": "a"}, {"id": "b"}]})).unwrap();
    let xml = to_graphml(&doc).unwrap();
    assert!(!xml.contains("<key"));
}

#[test]
fn color_fidelity_across_formats() {
    let doc = import_json(&json!({"nodes": [{"id": "n", "color": "#ff0000"}]})).unwrap();

    let json = to_json(&doc).unwrap();
    assert!(json.contains(r#""color": "rgb(255, 0, 0)""#));

    let gexf = to_gexf(&doc).unwrap();
    assert!(gexf.contains(r#"<viz:color r="255" g="0" b="0"/>"#));

    let yed = to_yed_graphml(&doc).unwrap();
    assert!(yed.contains(r#"<data key="g">0</data>"#));
}

#[test]
fn markup_in_values_is_escaped() {
    let doc = sample();
    let graphml = to_graphml(&doc).unwrap();
    assert!(graphml.contains("France &amp; co &lt;EU&gt;"));
    let gexf = to_gexf(&doc).unwrap();
    assert!(gexf.contains("label=\"France &amp; co &lt;EU&gt;\""));
}

#[test]
fn inference_is_stable_for_strict_majorities() {
    let forward = import_json(&json!({"nodes": [
        {"id": "a", "v": 1}, {"id": "b", "v": "x"}, {"id": "c", "v": 2}
    ]}))
    .unwrap();
    let backward = import_json(&json!({"nodes": [
        {"id": "c", "v": 2}, {"id": "b", "v": "x"}, {"id": "a", "v": 1}
    ]}))
    .unwrap();
    assert_eq!(forward.node_schema, backward.node_schema);
    assert_eq!(forward.node_schema[0].ty, AttributeType::Number);

    let tie = import_json(&json!({"nodes": [
        {"id": "a", "v": "x"}, {"id": "b", "v": true}
    ]}))
    .unwrap();
    assert_eq!(tie.node_schema[0].ty, AttributeType::String);
}

#[test]
fn yed_labels_survive_plain_graphml_import() {
    let doc = sample();
    let yed = to_yed_graphml(&doc).unwrap();
    assert!(yed.contains("<y:NodeLabel>Germany</y:NodeLabel>"));
    assert!(yed.contains(r#"<key id="d4" for="node" yfiles.type="nodegraphics"/>"#));
    assert!(!yed.contains(r#"<key id="label""#));

    let back = import_graphml(&yed).unwrap();
    assert_eq!(back.nodes[1].label.as_deref(), Some("Germany"));
    assert_eq!(back.edges[1].label.as_deref(), Some("road"));
    assert_eq!(back.nodes[2].attributes.get("capital"), Some(&Scalar::from("Bern")));
}

#[test]
fn padded_strings_keep_their_whitespace() {
    let doc = import_json(&json!({
        "nodes": [
            {"id": "a", "label": "  padded ", "note": " x "},
            {"id": "b", "label": " b", "note": "   "}
        ]
    }))
    .unwrap();
    for format in GraphFormat::iter() {
        for options in [ExportOptions::default(), ExportOptions::compact()] {
            let back = format.import(&format.export(&doc, &options).unwrap()).unwrap();
            assert_eq!(back.nodes, doc.nodes, "whitespace through {format}");
        }
    }
}
