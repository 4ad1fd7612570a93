#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for cause list report generation.
//!
//! Takes a saved HTML page of the court portal's results table (loaded by
//! hand in a browser, captcha and all), extracts the cases and writes them
//! as a PDF report.

mod pipeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cause_list", about = "Court cause list to PDF converter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract cases from a saved results page and write the report
    Render {
        /// Saved HTML page containing the results table
        input: PathBuf,
        /// Output PDF path
        #[arg(short, long, default_value = cause_list_pdf::DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Extraction config (TOML); see `cause_list config`
        #[arg(long)]
        config: Option<PathBuf>,
        /// Report title
        #[arg(long, default_value = cause_list_pdf::DEFAULT_TITLE)]
        title: String,
        /// CSS selector of the results table
        #[arg(long, default_value = "#dispTable")]
        table: String,
        /// Print the records as JSON instead of writing a PDF
        #[arg(long)]
        json: bool,
    },
    /// Show how each table row is classified
    Classify {
        /// Saved HTML page containing the results table
        input: PathBuf,
        /// Extraction config (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// CSS selector of the results table
        #[arg(long, default_value = "#dispTable")]
        table: String,
    },
    /// Print the extraction config, merged over the defaults if a file is given
    Config {
        /// Extraction config (TOML) to merge
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_logger() {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(log::LevelFilter::Info);
    builder.parse_env("RUST_LOG");
    builder.try_init().ok();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            output,
            config,
            title,
            table,
            json,
        } => {
            let source = pipeline::Source {
                input,
                config,
                table,
            };
            if json {
                let records = pipeline::extract(&source)?;
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                pipeline::render(&source, &output, &title)?;
            }
        }
        Commands::Classify {
            input,
            config,
            table,
        } => {
            let source = pipeline::Source {
                input,
                config,
                table,
            };
            for (index, row, kind) in pipeline::classify(&source)? {
                println!("{index:>4}  {:<14} {}", kind.as_ref(), pipeline::preview(&row));
            }
        }
        Commands::Config { config } => {
            print!("{}", pipeline::effective_config(config.as_deref())?);
        }
    }

    Ok(())
}
