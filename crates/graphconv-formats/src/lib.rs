//! Importers and exporters between [`GraphDocument`] and the supported wire
//! formats.
//!
//! # Module Structure
//!
//! - [`json`]: plain JSON node/edge format
//! - [`graphology`]: Graphology `key`/`attributes` wrapper format
//! - [`gexf`]: GEXF 1.3 with `viz:` extensions
//! - [`graphml`]: GraphML, plain and yEd-flavored
//! - [`shape`]: per-format element tree shapers
//! - [`options`]: export layout options

pub mod gexf;
pub mod graphml;
pub mod graphology;
pub mod json;
pub mod options;
pub mod shape;

use std::path::Path;

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

pub use gexf::{import_gexf, to_gexf, to_gexf_with_options};
pub use graphconv_core::{Error, ErrorKind, GraphDocument, Result};
pub use graphml::{
    import_graphml, to_graphml, to_graphml_with_options, to_yed_graphml,
    to_yed_graphml_with_options,
};
pub use graphology::{
    import_graphology, import_graphology_str, to_graphology, to_graphology_with_options,
};
pub use json::{import_json, import_json_str, to_json, to_json_with_options};
pub use options::ExportOptions;

/// A supported wire format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum GraphFormat {
    Json,
    Graphology,
    Gexf,
    Graphml,
    /// GraphML with yEd label graphics. Imports like plain GraphML.
    Yed,
}

impl GraphFormat {
    /// Guess a format from a file extension.
    ///
    /// `.json` maps to plain JSON; Graphology files must be named explicitly.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(GraphFormat::Json),
            "gexf" => Some(GraphFormat::Gexf),
            "graphml" => Some(GraphFormat::Graphml),
            _ => None,
        }
    }

    pub fn import(self, text: &str) -> Result<GraphDocument> {
        match self {
            GraphFormat::Json => import_json_str(text),
            GraphFormat::Graphology => import_graphology_str(text),
            GraphFormat::Gexf => import_gexf(text),
            GraphFormat::Graphml | GraphFormat::Yed => import_graphml(text),
        }
    }

    pub fn export(self, doc: &GraphDocument, options: &ExportOptions) -> Result<String> {
        match self {
            GraphFormat::Json => to_json_with_options(doc, options),
            GraphFormat::Graphology => to_graphology_with_options(doc, options),
            GraphFormat::Gexf => to_gexf_with_options(doc, options),
            GraphFormat::Graphml => to_graphml_with_options(doc, options),
            GraphFormat::Yed => to_yed_graphml_with_options(doc, options),
        }
    }
}

/// Convert text from one format to another.
pub fn convert(
    text: &str,
    from: GraphFormat,
    to: GraphFormat,
    options: &ExportOptions,
) -> Result<String> {
    let doc = from.import(text)?;
    tracing::info!(%from, %to, nodes = doc.nodes.len(), edges = doc.edges.len(), "converting");
    to.export(&doc, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_format_names() {
        assert_eq!("yed".parse::<GraphFormat>().unwrap(), GraphFormat::Yed);
        assert_eq!(GraphFormat::Graphology.to_string(), "graphology");
        assert!("dot".parse::<GraphFormat>().is_err());
        assert_eq!(GraphFormat::iter().count(), 5);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            GraphFormat::from_path(Path::new("a/b.GEXF")),
            Some(GraphFormat::Gexf)
        );
        assert_eq!(
            GraphFormat::from_path(Path::new("g.graphml")),
            Some(GraphFormat::Graphml)
        );
        assert_eq!(GraphFormat::from_path(Path::new("g.json")), Some(GraphFormat::Json));
        assert_eq!(GraphFormat::from_path(Path::new("g.dot")), None);
        assert_eq!(GraphFormat::from_path(Path::new("noext")), None);
    }
}
