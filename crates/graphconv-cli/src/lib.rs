//! graphconv command-line interface.
//!
use std::io::Read;
use std::path::{Path, PathBuf};

use graphconv_core::{Error, Result};
use graphconv_formats::{ExportOptions, GraphFormat, convert};

/// Options for one conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Input file; `None` or `-` reads stdin.
    pub input: Option<PathBuf>,
    /// Output file; `None` writes to stdout.
    pub output: Option<PathBuf>,
    pub from: Option<GraphFormat>,
    pub to: Option<GraphFormat>,
    pub export: ExportOptions,
}

impl ConvertOptions {
    fn input_path(&self) -> Option<&Path> {
        self.input.as_deref().filter(|path| *path != Path::new("-"))
    }

    /// Source format, named explicitly or guessed from the input extension.
    pub fn source_format(&self) -> Result<GraphFormat> {
        resolve_format(self.from, self.input_path(), "--from")
    }

    /// Target format, named explicitly or guessed from the output extension.
    pub fn target_format(&self) -> Result<GraphFormat> {
        resolve_format(self.to, self.output.as_deref(), "--to")
    }
}

fn resolve_format(
    explicit: Option<GraphFormat>,
    path: Option<&Path>,
    flag: &'static str,
) -> Result<GraphFormat> {
    if let Some(format) = explicit {
        return Ok(format);
    }
    path.and_then(GraphFormat::from_path).ok_or_else(|| {
        Error::invalid_argument(format!(
            "cannot guess the format, pass {flag} (json, graphology, gexf, graphml, yed)"
        ))
        .with_context("flag", flag)
    })
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|err| Error::from(err).with_context("path", path.display().to_string())),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Read, convert and return the rendered output.
pub fn run_main(opts: &ConvertOptions) -> Result<String> {
    let from = opts.source_format()?;
    let to = opts.target_format()?;
    let text = read_input(opts.input_path())?;
    tracing::debug!(bytes = text.len(), %from, %to, "input read");
    convert(&text, from, to, &opts.export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphconv_core::ErrorKind;

    #[test]
    fn test_formats_follow_flags_then_extensions() {
        let opts = ConvertOptions {
            input: Some("in.GraphML".into()),
            output: Some("out.json".into()),
            to: Some(GraphFormat::Graphology),
            ..Default::default()
        };
        assert_eq!(opts.source_format().unwrap(), GraphFormat::Graphml);
        assert_eq!(opts.target_format().unwrap(), GraphFormat::Graphology);
    }

    #[test]
    fn test_stdin_needs_explicit_format() {
        let opts = ConvertOptions {
            input: Some("-".into()),
            to: Some(GraphFormat::Json),
            ..Default::default()
        };
        let err = opts.source_format().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.context_value("flag"), Some("--from"));

        let opts = ConvertOptions {
            from: Some(GraphFormat::Gexf),
            ..Default::default()
        };
        assert!(opts.target_format().is_err());
    }
}
