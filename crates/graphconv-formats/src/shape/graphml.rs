//! GraphML element shape: identity as XML attributes, everything else as
//! `<data key="...">` entries.

use graphconv_core::{
    AttributeDef, AttributeType, COLOR_CHANNELS, Element, Error, FIELD_RULES, Field, GraphmlRule,
    Result, Rgb, Scalar, Scope,
};
use graphconv_xml::XmlElement;

use super::yed;

/// GraphML dialect being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Plain,
    Yed,
}

/// What a declared `<key>` feeds on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// A reserved field, by key id or `attr.name`.
    Field(Field),
    /// One channel of the decomposed color.
    Channel(usize),
    /// yEd graphics payload carrying the label.
    Label,
    /// Other yEd graphics (ports, resources); skipped.
    Ignored,
    /// A free attribute.
    Attribute,
}

/// A `<key>` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    pub id: String,
    /// `None` for `for="all"`.
    pub scope: Option<Scope>,
    pub name: String,
    pub ty: AttributeType,
    pub yfiles: Option<String>,
}

impl Key {
    pub fn from_tree(tree: &XmlElement) -> Result<Option<Key>> {
        let id = tree.attr("id").ok_or_else(|| Error::missing_field("key.id"))?;
        let scope = match tree.attr("for").unwrap_or("all") {
            "node" => Some(Scope::Node),
            "edge" => Some(Scope::Edge),
            "all" => None,
            // graph, port, hyperedge, ...
            _ => return Ok(None),
        };
        Ok(Some(Key {
            id: id.to_string(),
            scope,
            name: tree.attr("attr.name").unwrap_or(id).to_string(),
            ty: AttributeType::from_wire(tree.attr("attr.type").unwrap_or("string")),
            yfiles: tree.attr("yfiles.type").map(str::to_string),
        }))
    }

    pub fn applies_to(&self, scope: Scope) -> bool {
        self.scope.is_none_or(|s| s == scope)
    }

    pub fn role(&self, scope: Scope) -> KeyRole {
        if let Some(yfiles) = &self.yfiles {
            return if yfiles == yed::graphics_type(scope) {
                KeyRole::Label
            } else {
                KeyRole::Ignored
            };
        }
        let field = Field::from_name(&self.id).or_else(|| Field::from_name(&self.name));
        if let Some(field) = field {
            return KeyRole::Field(field);
        }
        match COLOR_CHANNELS.iter().position(|c| *c == self.id) {
            Some(channel) => KeyRole::Channel(channel),
            None => KeyRole::Attribute,
        }
    }
}

/// Every usable `<key>` of a document.
#[derive(Debug, Clone, Default)]
pub struct KeyTable {
    keys: Vec<Key>,
}

impl KeyTable {
    pub fn from_root(root: &XmlElement) -> Result<Self> {
        let mut keys = Vec::new();
        for tree in root.children_named("key") {
            if let Some(key) = Key::from_tree(tree)? {
                keys.push(key);
            }
        }
        Ok(Self { keys })
    }

    pub fn lookup(&self, scope: Scope, id: &str) -> Option<&Key> {
        self.keys
            .iter()
            .find(|k| k.id == id && k.applies_to(scope))
    }

    /// Attribute declarations of a scope.
    ///
    /// Keys of reserved `data` fields are kept under the field name so their
    /// title and type survive; color channels and yEd graphics are not.
    pub fn schema(&self, scope: Scope) -> Vec<AttributeDef> {
        let mut schema: Vec<AttributeDef> = Vec::new();
        for key in self.keys.iter().filter(|k| k.applies_to(scope)) {
            let id = match key.role(scope) {
                KeyRole::Attribute => key.id.as_str(),
                KeyRole::Field(field) if field.rule().graphml == GraphmlRule::Data => field.name(),
                _ => continue,
            };
            if !schema.iter().any(|d| d.id == id) {
                schema.push(AttributeDef::new(id, key.ty).with_title(&key.name));
            }
        }
        schema
    }
}

fn data(key: &str, text: String) -> XmlElement {
    XmlElement::new("data").with_attr("key", key).with_text(text)
}

/// Shape one element as `<node>`/`<edge>`.
///
/// Free attributes are written in `schema` order; attributes the schema does
/// not declare are left out.
pub fn element_to_tree(
    scope: Scope,
    element: &Element,
    schema: &[AttributeDef],
    flavor: Flavor,
) -> XmlElement {
    let mut tree = XmlElement::new(scope.as_str());
    for rule in FIELD_RULES.iter().filter(|r| r.graphml == GraphmlRule::Attribute) {
        if let Some(value) = element.get(rule.field) {
            tree.push_attr(rule.field.name(), value.to_text());
        }
    }

    for def in schema.iter().filter(|def| !Field::is_reserved(&def.id)) {
        if let Some(value) = element.attributes.get(&def.id) {
            tree.push_child(data(&def.id, value.to_text()));
        }
    }

    for rule in FIELD_RULES.iter() {
        match rule.graphml {
            GraphmlRule::Attribute => {}
            GraphmlRule::Channels => {
                if let Some(color) = element.color {
                    for (channel, value) in color.channels() {
                        tree.push_child(data(channel, value.to_string()));
                    }
                }
            }
            GraphmlRule::Data => match (rule.field, flavor, &element.label) {
                (Field::Label, Flavor::Yed, Some(label)) => {
                    tree.push_child(yed::label_to_data(scope, label));
                }
                (Field::Label, Flavor::Yed, None) => {}
                (field, _, _) => {
                    if let Some(value) = element.get(field) {
                        tree.push_child(data(field.name(), value.to_text()));
                    }
                }
            },
        }
    }
    tree
}

/// Read one `<node>`/`<edge>`. Edges without an id are named `e<index>`.
pub fn tree_to_element(
    tree: &XmlElement,
    scope: Scope,
    index: usize,
    keys: &KeyTable,
) -> Result<Element> {
    let mut element = Element::default();
    element.id = match (tree.attr("id"), scope) {
        (Some(id), _) => id.to_string(),
        (None, Scope::Edge) => format!("e{index}"),
        (None, Scope::Node) => return Err(Error::missing_field("id")),
    };
    if scope == Scope::Edge {
        for endpoint in [Field::Source, Field::Target] {
            let value = tree
                .attr(endpoint.name())
                .ok_or_else(|| Error::missing_field(endpoint.name()))?;
            element.set(endpoint, Scalar::from(value))?;
        }
    }

    let mut channels: [Option<Scalar>; 3] = [None, None, None];
    for entry in tree.children_named("data") {
        let key_id = entry
            .attr("key")
            .ok_or_else(|| Error::missing_field("data.key"))?;
        let Some(key) = keys.lookup(scope, key_id) else {
            tracing::debug!(key = key_id, "data references an undeclared key");
            match COLOR_CHANNELS.iter().position(|c| *c == key_id) {
                Some(channel) => channels[channel] = Some(Scalar::String(entry.text())),
                None => element.set_attribute(key_id, Scalar::String(entry.text()))?,
            }
            continue;
        };

        let typed = || {
            let text = entry.text();
            Scalar::parse_typed(&text, key.ty).unwrap_or(Scalar::String(text))
        };
        match key.role(scope) {
            KeyRole::Field(field) => {
                // Reserved fields follow their canonical type, not the key's.
                let text = entry.text();
                let ty = field.rule().ty.unwrap_or_default();
                let value = Scalar::parse_typed(&text, ty).unwrap_or(Scalar::String(text));
                element.set(field, value)?;
            }
            KeyRole::Channel(channel) => channels[channel] = Some(typed()),
            KeyRole::Label => {
                if let Some(label) = yed::label_from_data(entry, scope) {
                    element.label = Some(label);
                }
            }
            KeyRole::Ignored => {}
            KeyRole::Attribute => {
                element.attributes.insert(key.id.clone(), typed());
            }
        }
    }

    match channels {
        [Some(r), Some(g), Some(b)] => element.color = Some(Rgb::from_channels(&r, &g, &b)?),
        [None, None, None] => {}
        partial => {
            let missing = COLOR_CHANNELS
                .iter()
                .zip(&partial)
                .find_map(|(name, value)| value.is_none().then_some(*name))
                .unwrap_or_default();
            return Err(Error::missing_field(missing).with_context("id", element.id.clone()));
        }
    }
    Ok(element)
}
