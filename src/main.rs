use clap::{Parser, Subcommand};
use sheet_mapper::cli;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheet-mapper")]
#[command(about = "Append a computed column to the first sheet of a spreadsheet.")]
#[command(long_about = "Sheet Mapper - row-wise spreadsheet enrichment

Reads a workbook (xlsx, xlsm, xlsb, xls, ods), treats row 1 of the first
sheet as headers, renders a template for every data row and writes the
result into a new trailing column. Other sheets are carried over unchanged.
The output is always xlsx.

COMMANDS:
  map       - Render a template into a new column
  headers   - List the header labels of the first sheet

EXAMPLES:
  sheet-mapper map people.xlsx out.xlsx --template \"{Name} <{Email}>\"
  sheet-mapper map people.xlsx out.xlsx -t \"{#0}-{#2}\" --header Key
  sheet-mapper headers people.xlsx

Set RUST_LOG=sheet_mapper=debug for diagnostic logging.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Render a template for every data row into a new column.

TEMPLATE SYNTAX:
  {Label}   keyed value of the column headed 'Label'
  {#N}      positional value of zero-based column N
  {{ }}     literal braces

Blank cells render as nothing. A label that matches no header aborts the
run and no output file is written.")]
    /// Render a template into a new trailing column
    Map {
        /// Input spreadsheet
        input: PathBuf,

        /// Output .xlsx path (parent directories are created)
        output: PathBuf,

        /// Template rendered per row
        #[arg(short, long)]
        template: String,

        /// Header label for the new column
        #[arg(long, env = "SHEET_MAPPER_HEADER", conflicts_with = "no_header")]
        header: Option<String>,

        /// Leave the header cell of the new column empty
        #[arg(long)]
        no_header: bool,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the header labels of the first sheet
    Headers {
        /// Input spreadsheet
        input: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "sheet_mapper=debug"
    } else {
        "sheet_mapper=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Map {
            input,
            output,
            template,
            header,
            no_header,
            verbose,
        } => {
            init_tracing(verbose);
            cli::map(input, output, template, header, no_header, verbose)?;
        }

        Commands::Headers { input } => {
            init_tracing(false);
            cli::headers(input)?;
        }
    }

    Ok(())
}
