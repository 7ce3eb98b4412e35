use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use voxtab::{probe, read_header_with, TableConfig, TableHandle};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "voxtab CLI - inspect and query voxel table files")]
struct Cli {
    /// JSON file with reader configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the table header
    Info {
        /// Table file
        path: PathBuf,

        /// Print the header as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print one value
    Value {
        path: PathBuf,
        voxel: usize,
        channel: usize,
    },
    /// Print all channel values of one voxel
    Row { path: PathBuf, voxel: usize },
    /// Report how far the write of a table got
    Check { path: PathBuf },
}

fn load_config(path: Option<&Path>) -> CliResult<TableConfig> {
    match path {
        Some(path) => Ok(TableConfig::from_json_file(path)?),
        None => Ok(TableConfig::default()),
    }
}

fn run<W: Write>(command: &Commands, config: &TableConfig, out: &mut W) -> CliResult<()> {
    match command {
        Commands::Info { path, json } => {
            let layout = read_header_with(path, config)?;
            if *json {
                let report = serde_json::json!({
                    "path": path,
                    "header": layout.header,
                    "data_offset": layout.data_offset,
                });
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                writeln!(out, "{layout}")?;
            }
        }
        Commands::Value {
            path,
            voxel,
            channel,
        } => {
            let table = TableHandle::open_with(path, config)?;
            writeln!(out, "{}", table.value(*voxel, *channel)?)?;
        }
        Commands::Row { path, voxel } => {
            let table = TableHandle::open_with(path, config)?;
            for (channel, value) in table.row(*voxel)?.iter().enumerate() {
                writeln!(out, "{channel}\t{value}")?;
            }
        }
        Commands::Check { path } => {
            writeln!(out, "{}", probe(path)?)?;
        }
    }
    Ok(())
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let start_time = std::time::Instant::now();

    run(&cli.command, &config, &mut std::io::stdout().lock())?;

    tracing::debug!(elapsed = ?start_time.elapsed(), "command finished");
    Ok(())
}
