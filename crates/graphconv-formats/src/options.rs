//! Export options shared by every exporter.

use graphconv_core::{Error, Result};
use graphconv_xml::WriteOptions;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

/// How exported text is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Indent nested structures, one level per line.
    pub pretty: bool,
    /// Spaces per level when `pretty` is set.
    pub indent: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 2,
        }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::default()
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub(crate) fn write_options(&self) -> WriteOptions {
        WriteOptions {
            indent: self.pretty.then_some(self.indent),
        }
    }

    pub(crate) fn render_json(&self, value: &Value) -> Result<String> {
        let failed = |err: serde_json::Error| {
            Error::serialization_failed("cannot write JSON")
                .with_operation("json::render")
                .set_source(err)
        };
        if !self.pretty {
            return serde_json::to_string(value).map_err(failed);
        }

        let indent = " ".repeat(self.indent);
        let mut out = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent.as_bytes()));
        value.serialize(&mut serializer).map_err(failed)?;
        String::from_utf8(out).map_err(|err| {
            Error::serialization_failed("JSON output is not UTF-8")
                .with_operation("json::render")
                .set_source(err)
        })
    }
}
