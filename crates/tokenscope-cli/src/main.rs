//! tokenscope command line interface
//!
//! ```bash
//! # Query the registry
//! tokenscope query "tokens.color.*"
//! tokenscope query "components where name = 'Button'" --format table
//!
//! # Preview a patch list against the registry
//! tokenscope preview --patches patches.json --format html --save preview
//!
//! # Interactive selector loop
//! tokenscope repl
//! ```

mod diagnostics;
mod repl;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokenscope_preview::{apply_patches, build_preview, save_preview, PreviewConfig, PreviewFormat};
use tokenscope_query::{format_result, FormatOptions, QueryConfig, QueryEngine};
use tokenscope_registry::{load_json, load_patches, write_output, RegistryDocument};
use tokenscope_selector::{parse_selector, OutputFormat};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tokenscope")]
#[command(version)]
#[command(about = "Query and preview mutations of a component & design-token registry")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Registry document to read
    #[arg(
        long,
        short,
        global = true,
        env = "TOKENSCOPE_REGISTRY",
        default_value = "registry.json"
    )]
    registry: PathBuf,

    /// Disable ANSI colour
    #[arg(long, global = true)]
    no_color: bool,

    /// Literal selector semantics: `**` acts like `*` and unit values never compare as numbers
    #[arg(long, global = true)]
    strict: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a selector against the registry
    Query {
        /// Selector, e.g. "tokens.color.*"
        selector: String,

        /// Output format: default, json, table, list, or count
        #[arg(short, long, default_value = "default")]
        format: OutputFormat,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Preview the effect of a patch list on the registry
    Preview {
        /// JSON array of RFC 6902 patch operations
        #[arg(short, long)]
        patches: PathBuf,

        /// Already-patched registry; patches are applied to a copy when absent
        #[arg(short, long)]
        mutated: Option<PathBuf>,

        /// Output format: terminal, html, or json
        #[arg(short, long, default_value = "terminal")]
        format: PreviewFormat,

        /// Write `<base>.<ext>` instead of printing
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Interactive selector loop
    Repl,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let result = match &cli.command {
        Commands::Query {
            selector,
            format,
            compact,
            output,
        } => cmd_query(&cli, selector, *format, *compact, output.as_deref()),
        Commands::Preview {
            patches,
            mutated,
            format,
            save,
        } => cmd_preview(&cli, patches, mutated.as_deref(), *format, save.as_deref()),
        Commands::Repl => cmd_repl(&cli),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn engine(cli: &Cli) -> QueryEngine {
    if cli.strict {
        QueryEngine::with_config(QueryConfig::strict_parity())
    } else {
        QueryEngine::new()
    }
}

fn cmd_query(
    cli: &Cli,
    selector: &str,
    format: OutputFormat,
    compact: bool,
    output: Option<&Path>,
) -> Result<()> {
    let (query, diagnostics) = parse_selector(selector);
    let query = query.with_output(format);
    diagnostics::report_diagnostics(selector, &diagnostics, !cli.no_color);

    let registry = RegistryDocument::load(&cli.registry)?;
    let result = engine(cli).execute(&registry, &query, &cli.registry.display().to_string());

    let options = FormatOptions {
        pretty: !compact,
        color: !cli.no_color && output.is_none(),
    };
    let rendered = format_result(&result, format, &options);

    match output {
        Some(path) => write_output(path, &rendered)?,
        None => println!("{}", rendered),
    }
    Ok(())
}

fn cmd_preview(
    cli: &Cli,
    patches: &Path,
    mutated: Option<&Path>,
    format: PreviewFormat,
    save: Option<&Path>,
) -> Result<()> {
    // Patch pointers address the file as written
    let original = load_json(&cli.registry)?;
    let patch_list = load_patches(patches)?;
    let config = PreviewConfig {
        color: !cli.no_color,
        ..PreviewConfig::default()
    };

    let mutated = match mutated {
        Some(path) => load_json(path)?,
        None => apply_patches(&original, &patch_list)
            .with_context(|| format!("applying {}", patches.display()))?,
    };
    let preview = build_preview(&original, &mutated, &patch_list, &config);

    match save {
        Some(base) => {
            let path = save_preview(&preview, format, base)?;
            eprintln!("{} {}", "saved".green().bold(), path.display());
        }
        None => println!("{}", preview.formats.get(format)),
    }
    Ok(())
}

fn cmd_repl(cli: &Cli) -> Result<()> {
    repl::Repl::new(&cli.registry, engine(cli), !cli.no_color).run()
}
