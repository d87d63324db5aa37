mod config;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use csvane_core::{Decoder, Document, Encoder, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::resolve_config;

#[derive(Parser)]
#[command(name = "csvane")]
#[command(about = "Inspect and reformat CSV files", long_about = None)]
struct Cli {
    /// TOML file with reader and writer settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Field separator, overrides the config file
    #[arg(short, long, global = true)]
    separator: Option<char>,

    /// Treat the first record as a header
    #[arg(long, global = true)]
    header: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every cell with its inferred type
    Inspect {
        /// Input file, standard input when omitted
        input: Option<PathBuf>,

        /// Print the document as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode and re-encode with different settings
    Reformat {
        /// Input file, standard input when omitted
        input: Option<PathBuf>,

        /// Output separator
        #[arg(long)]
        to: Option<char>,

        /// Terminate output lines with CRLF
        #[arg(long)]
        crlf: bool,
    },
}

fn open_input(input: Option<PathBuf>) -> anyhow::Result<Box<dyn BufRead>> {
    Ok(match input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    })
}

fn print_document(document: &Document, out: &mut impl Write) -> io::Result<()> {
    if let Some(header) = document.header() {
        writeln!(out, "header: {}", header.join(" | "))?;
    }
    for (i, row) in document.rows().iter().enumerate() {
        let cells: Vec<_> = row
            .values()
            .iter()
            .map(|value| match value {
                Value::String(s) => format!("{s:?}: {}", value.type_name()),
                other => format!("{other}: {}", other.type_name()),
            })
            .collect();
        writeln!(out, "{i}: {}", cells.join(" | "))?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref(), cli.separator, cli.header)?;
    debug!(?config, "resolved config");

    match cli.command {
        Command::Inspect { input, json } => {
            let document = Decoder::with_config(open_input(input)?, &config)?.decode_document()?;
            let mut out = io::stdout().lock();
            if json {
                serde_json::to_writer_pretty(&mut out, &document)?;
                writeln!(out)?;
            } else {
                print_document(&document, &mut out)?;
            }
        }
        Command::Reformat { input, to, crlf } => {
            let document = Decoder::with_config(open_input(input)?, &config)?.decode_document()?;

            let mut output = config.clone();
            if let Some(separator) = to {
                output.separator = separator;
            }
            output.carriage_return |= crlf;

            let mut encoder = Encoder::with_config(io::stdout().lock(), &output)?;
            encoder.encode_document(&document)?;
        }
    }

    Ok(())
}
