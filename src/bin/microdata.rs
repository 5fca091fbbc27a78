//! Command-line microdata extractor.
//!
//! Fetches a URL, or reads a document from stdin, and prints the extracted
//! items as JSON on stdout.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use rs_microdata::{parse_reader, parse_url, Microdata, Options};
use tracing_subscriber::EnvFilter;

/// Extract HTML Microdata items as JSON.
#[derive(Parser)]
#[command(name = "microdata")]
#[command(version, about, long_about = None)]
struct Cli {
    /// URL to fetch. Reads the document from stdin when omitted.
    url: Option<String>,

    /// Base URL for relative links when reading stdin
    #[arg(short, long)]
    base_url: Option<String>,

    /// Content-Type of the stdin document (e.g. "text/html; charset=ISO-8859-1")
    #[arg(short, long)]
    content_type: Option<String>,

    /// JSON pointer selecting part of the output (e.g. /items/0/properties/name/0)
    #[arg(short, long)]
    pointer: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    // Initialize tracing with WARN level by default, respecting RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = Options {
        base_url: cli.base_url.clone(),
        ..Options::default()
    };

    let data = match &cli.url {
        Some(url) => parse_url(url, &options)?,
        None => parse_reader(io::stdin().lock(), cli.content_type.as_deref(), &options)?,
    };

    let output = render(&data, cli.pointer.as_deref(), cli.pretty)?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}")?;
    Ok(())
}

fn render(
    data: &Microdata,
    pointer: Option<&str>,
    pretty: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let value = data.to_value()?;

    let selected = match pointer {
        None => &value,
        Some(p) => value
            .pointer(p)
            .ok_or_else(|| format!("JSON pointer '{p}' matched nothing"))?,
    };

    if let serde_json::Value::String(text) = selected {
        return Ok(text.clone());
    }

    let rendered = if pretty {
        serde_json::to_string_pretty(selected)?
    } else {
        serde_json::to_string(selected)?
    };
    Ok(rendered)
}
