use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use codec::{UpdateType, ValuePolicy};
use qsync_tools::{
    decode_search, format_values_pretty, inspect_search, parse_assignment, parse_schema,
    update_search, UpdateRequest,
};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "qsync-tools",
    version,
    about = "qsync query string inspection tools"
)]
struct Cli {
    /// Log decode and update decisions to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the encoded entries of a search string.
    Inspect {
        /// Search string, with or without the leading `?`.
        search: String,
    },
    /// Decode a search string against a schema.
    Decode {
        search: String,
        /// Schema JSON describing the parameters.
        #[arg(long)]
        schema: PathBuf,
        /// Report null decodes instead of dropping them.
        #[arg(long)]
        keep_null: bool,
        /// Report empty-string decodes instead of dropping them.
        #[arg(long)]
        keep_empty_string: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Print the search string an update would produce.
    Update {
        /// Schema JSON describing the parameters.
        #[arg(long)]
        schema: PathBuf,
        /// Current search string.
        #[arg(long, default_value = "")]
        current: String,
        /// `name=raw` with the raw value in the param's encoded form.
        #[arg(long, value_parser = parse_assignment)]
        set: Vec<(String, String)>,
        /// Remove a parameter.
        #[arg(long)]
        unset: Vec<String>,
        /// replace, replaceIn, push or pushIn.
        #[arg(long, default_value_t = UpdateType::PushIn)]
        update_type: UpdateType,
        /// Drop values equal to their default.
        #[arg(long)]
        remove_defaults: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Inspect { search } => {
            let report = inspect_search(&search);
            let json = serde_json::to_string_pretty(&report).context("serialize json")?;
            println!("{json}");
        }
        Command::Decode {
            search,
            schema,
            keep_null,
            keep_empty_string,
            format,
        } => {
            let map = load_schema(&schema)?;
            let values = decode_search(
                &map,
                &search,
                ValuePolicy::new(keep_null, keep_empty_string),
            );
            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&values).context("serialize json")?;
                    println!("{json}");
                }
                OutputFormat::Pretty => println!("{}", format_values_pretty(&values)),
            }
        }
        Command::Update {
            schema,
            current,
            set,
            unset,
            update_type,
            remove_defaults,
        } => {
            let map = load_schema(&schema)?;
            let request = UpdateRequest {
                current,
                set,
                unset,
                update_type,
                remove_defaults,
            };
            println!("{}", update_search(&map, &request));
        }
    }
    Ok(())
}

fn load_schema(path: &Path) -> Result<schema::ParamConfigMap> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read schema {}", path.display()))?;
    parse_schema(&contents).with_context(|| format!("load schema {}", path.display()))
}
