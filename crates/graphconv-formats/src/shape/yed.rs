//! yEd label wrappers.
//!
//! yEd ignores generic `data` labels and reads them from its own graphics
//! payload instead: `y:ShapeNode > y:NodeLabel` for nodes and
//! `y:PolyLineEdge > y:EdgeLabel` for edges.

use graphconv_core::Scope;
use graphconv_xml::XmlElement;

pub const NAMESPACE: &str = "http://www.yworks.com/xml/graphml";

pub const NODE_GRAPHICS_KEY: &str = "d4";
pub const EDGE_GRAPHICS_KEY: &str = "d9";

/// Key id carrying labels for a scope.
pub fn graphics_key(scope: Scope) -> &'static str {
    match scope {
        Scope::Node => NODE_GRAPHICS_KEY,
        Scope::Edge => EDGE_GRAPHICS_KEY,
    }
}

/// `yfiles.type` of the graphics key for a scope.
pub fn graphics_type(scope: Scope) -> &'static str {
    match scope {
        Scope::Node => "nodegraphics",
        Scope::Edge => "edgegraphics",
    }
}

fn wrappers(scope: Scope) -> (&'static str, &'static str) {
    match scope {
        Scope::Node => ("ShapeNode", "NodeLabel"),
        Scope::Edge => ("PolyLineEdge", "EdgeLabel"),
    }
}

/// `<key>` declaration of the graphics key.
pub fn graphics_key_decl(scope: Scope) -> XmlElement {
    XmlElement::new("key")
        .with_attr("id", graphics_key(scope))
        .with_attr("for", scope.as_str())
        .with_attr("yfiles.type", graphics_type(scope))
}

/// `<data>` entry holding a label.
pub fn label_to_data(scope: Scope, label: &str) -> XmlElement {
    let (shape, label_tag) = wrappers(scope);
    XmlElement::new("data")
        .with_attr("key", graphics_key(scope))
        .with_child(
            XmlElement::new(format!("y:{shape}"))
                .with_child(XmlElement::new(format!("y:{label_tag}")).with_text(label)),
        )
}

/// Label text inside a graphics `<data>` entry, wherever yEd nested it.
///
/// Names are matched without prefix since the reader strips them.
pub fn label_from_data(data: &XmlElement, scope: Scope) -> Option<String> {
    let (_, label_tag) = wrappers(scope);
    data.find(label_tag).map(|label| {
        let text = label.text();
        // Nested label models leave indentation around the text.
        if label.elements().next().is_some() {
            text.trim().to_string()
        } else {
            text
        }
    })
}
