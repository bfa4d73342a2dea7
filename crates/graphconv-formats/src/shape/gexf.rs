//! GEXF element shape.
//!
//! Free attributes go to `<attvalues>`, visual fields to `viz:*` children and
//! the rest of the reserved fields to XML attributes. All three coordinates
//! share one `<viz:position>`.

use graphconv_core::{
    AttributeDef, AttributeType, Element, Error, FIELD_RULES, Field, GexfRule, Result, Rgb,
    Scalar, Scope, parse_color,
};
use graphconv_xml::XmlElement;

const POSITION: [Field; 3] = [Field::X, Field::Y, Field::Z];

/// Shape one element as `<node>`/`<edge>`.
pub fn element_to_tree(scope: Scope, element: &Element, schema: &[AttributeDef]) -> XmlElement {
    let mut tree = XmlElement::new(scope.as_str());
    for rule in FIELD_RULES.iter().filter(|r| r.gexf == GexfRule::Attribute) {
        if let Some(value) = element.get(rule.field) {
            tree.push_attr(rule.field.name(), value.to_text());
        }
    }

    // Declared reserved fields are written by their own rule below.
    let mut attvalues = XmlElement::new("attvalues");
    for def in schema.iter().filter(|def| !Field::is_reserved(&def.id)) {
        if let Some(value) = element.attributes.get(&def.id) {
            attvalues.push_child(
                XmlElement::new("attvalue")
                    .with_attr("for", def.id.as_str())
                    .with_attr("value", value.to_text()),
            );
        }
    }
    if !attvalues.children.is_empty() {
        tree.push_child(attvalues);
    }

    for rule in FIELD_RULES.iter() {
        match rule.gexf {
            GexfRule::Attribute => {}
            GexfRule::Color => {
                if let Some(color) = element.color {
                    let mut viz = XmlElement::new("viz:color");
                    for (channel, value) in color.channels() {
                        viz.push_attr(channel, value.to_string());
                    }
                    tree.push_child(viz);
                }
            }
            // Emitted once, at the first coordinate.
            GexfRule::Position if rule.field == Field::X => {
                let mut viz = XmlElement::new("viz:position");
                for field in POSITION {
                    if let Some(value) = element.get(field) {
                        viz.push_attr(field.name(), value.to_text());
                    }
                }
                if !viz.attributes.is_empty() {
                    tree.push_child(viz);
                }
            }
            GexfRule::Position => {}
            GexfRule::Viz(name) => {
                if let Some(value) = element.get(rule.field) {
                    tree.push_child(
                        XmlElement::new(format!("viz:{name}")).with_attr("value", value.to_text()),
                    );
                }
            }
        }
    }
    tree
}

/// Read one `<node>`/`<edge>`. Edges without an id are named `e<index>`.
///
/// `attvalue`s are typed by `schema`; undeclared ones and unknown XML
/// attributes are kept as strings.
pub fn tree_to_element(
    tree: &XmlElement,
    scope: Scope,
    index: usize,
    schema: &[AttributeDef],
) -> Result<Element> {
    let mut element = Element::default();
    element.id = match (tree.attr("id"), scope) {
        (Some(id), _) => id.to_string(),
        (None, Scope::Edge) => format!("e{index}"),
        (None, Scope::Node) => return Err(Error::missing_field("id")),
    };

    for (name, value) in &tree.attributes {
        if name == "id" {
            continue;
        }
        element.set_attribute(name, Scalar::from(value.as_str()))?;
    }
    if scope == Scope::Edge {
        for endpoint in [Field::Source, Field::Target] {
            if !element.has(endpoint) {
                return Err(Error::missing_field(endpoint.name()));
            }
        }
    }

    for child in tree.elements() {
        match child.name.as_str() {
            "attvalues" => read_attvalues(child, schema, &mut element)?,
            "color" => element.color = Some(read_color(child)?),
            "position" => {
                for field in POSITION {
                    if let Some(value) = child.attr(field.name()) {
                        element.set(field, Scalar::from(value))?;
                    }
                }
            }
            name => {
                let rule = FIELD_RULES
                    .iter()
                    .find(|r| matches!(r.gexf, GexfRule::Viz(viz) if viz == name));
                if let Some(rule) = rule {
                    let value = child
                        .attr("value")
                        .ok_or_else(|| Error::missing_field(format!("viz:{name}.value")))?;
                    element.set(rule.field, Scalar::from(value))?;
                }
            }
        }
    }
    Ok(element)
}

fn read_attvalues(tree: &XmlElement, schema: &[AttributeDef], element: &mut Element) -> Result<()> {
    for attvalue in tree.children_named("attvalue") {
        // GEXF 1.1 wrote `id` where later versions write `for`.
        let name = attvalue
            .attr("for")
            .or_else(|| attvalue.attr("id"))
            .ok_or_else(|| Error::missing_field("attvalue.for"))?;
        let text = attvalue
            .attr("value")
            .ok_or_else(|| Error::missing_field("attvalue.value"))?;
        let ty = schema
            .iter()
            .find(|def| def.id == name)
            .map_or(AttributeType::String, |def| def.ty);
        let value = Scalar::parse_typed(text, ty).unwrap_or_else(|| Scalar::from(text));
        element.set_attribute(name, value)?;
    }
    Ok(())
}

fn read_color(tree: &XmlElement) -> Result<Rgb> {
    if let Some(hex) = tree.attr("hex") {
        return parse_color(hex);
    }
    let channel = |name: &'static str| {
        tree.attr(name)
            .map(Scalar::from)
            .ok_or_else(|| Error::missing_field(format!("viz:color.{name}")))
    };
    Rgb::from_channels(&channel("r")?, &channel("g")?, &channel("b")?)
}
