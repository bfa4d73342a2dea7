use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use graphconv_cli::{ConvertOptions, run_main};
use graphconv_core::Result;
use graphconv_formats::{ExportOptions, GraphFormat};

#[derive(Parser, Debug)]
#[command(
    name = "graphconv",
    about = "graphconv: move graphs between JSON, Graphology, GEXF and GraphML",
    version
)]
pub struct Cli {
    /// Input file, `-` or nothing for stdin
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Input format: json, graphology, gexf, graphml (guessed from the extension if omitted)
    #[arg(long, value_name = "FORMAT")]
    from: Option<GraphFormat>,

    /// Output format: json, graphology, gexf, graphml, yed (guessed from the extension if omitted)
    #[arg(long, value_name = "FORMAT")]
    to: Option<GraphFormat>,

    /// Output file path (writes to file instead of stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Emit everything on one line
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Spaces per nesting level in pretty output
    #[arg(long, default_value = "2", conflicts_with = "compact")]
    indent: usize,
}

pub fn run(args: Cli) -> Result<()> {
    let start = Instant::now();

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let export = if args.compact {
        ExportOptions::compact()
    } else {
        ExportOptions::new().with_indent(args.indent)
    };
    let opts = ConvertOptions {
        input: args.input,
        output: args.output,
        from: args.from,
        to: args.to,
        export,
    };

    let output = run_main(&opts).inspect_err(|e| {
        tracing::error!(
            error = %e,
            cause = %e.root_cause(),
            bad_input = e.kind().is_input_error(),
            "conversion failed"
        );
    })?;
    match &opts.output {
        Some(path) => {
            std::fs::write(path, &output)?;
            tracing::info!(path = %path.display(), "output written");
        }
        None => println!("{output}"),
    }

    tracing::info!(total_secs = start.elapsed().as_secs_f64(), "complete");
    Ok(())
}

pub fn main() -> Result<()> {
    let args = Cli::parse();
    run(args)
}
