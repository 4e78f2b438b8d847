use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use skulookup::error::{BatchError, BuildError};
use skulookup::index::stats::show_stats;
use skulookup::index::{BuiltIndex, IndexHandle};
use skulookup::output::{self, BATCH_RESULTS_FILE};
use skulookup::query::{annotate_table, lookup_one, search_descriptions};
use skulookup::source::{open_sources, read_batch_table, TableSource};
use skulookup::utils::{get_config_path, init_logging, spinner, AppConfig};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "skulookup")]
#[command(about = "Look up punch and die SKUs in a spreadsheet catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalog workbook, or one or more CSV files (one per sheet)
    #[arg(short, long, global = true, env = "SKU_LOOKUP_SOURCE")]
    source: Vec<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Don't show the loading spinner
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a single SKU
    Lookup {
        /// SKU to resolve
        sku: String,
    },
    /// Look up every SKU in an uploaded list (xlsx or csv with a SKU column)
    Batch {
        /// File with a SKU column
        file: PathBuf,

        /// Write the results to CSV
        #[arg(short, long, num_args = 0..=1, default_missing_value = BATCH_RESULTS_FILE)]
        output: Option<PathBuf>,
    },
    /// Search descriptions by keyword or dimension (e.g. '1/2', 'Hex')
    Search {
        /// Case-insensitive text to find in descriptions
        term: String,
    },
    /// Show per-sheet statistics for the catalog
    Stats,
    /// Interactive session over one loaded catalog
    Shell,
    /// Show or update the saved configuration
    Config {
        /// Save a default catalog path
        #[arg(long)]
        set_source: Option<PathBuf>,

        /// Save the text shown for unknown SKUs
        #[arg(long)]
        set_not_found: Option<String>,
    },
}

/// Exit status for a catalog with no usable sheets
const EXIT_EMPTY_SOURCE: u8 = 2;
/// Exit status for an uploaded list without a SKU column
const EXIT_MALFORMED_BATCH: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(BuildError::EmptySource { .. }) = e.downcast_ref::<BuildError>() {
                ExitCode::from(EXIT_EMPTY_SOURCE)
            } else if e.downcast_ref::<BatchError>().is_some() {
                ExitCode::from(EXIT_MALFORMED_BATCH)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load()?;
    let color = config.color && !cli.no_color;

    if let Commands::Config {
        set_source,
        set_not_found,
    } = cli.command
    {
        return handle_config(config, set_source, set_not_found);
    }

    let source = if cli.source.is_empty() {
        match config.resolve_source(None) {
            Some(path) => open_sources(&[path])?,
            None => bail!(
                "No catalog given. Pass --source, set SKU_LOOKUP_SOURCE, or run 'skulookup config --set-source <PATH>'"
            ),
        }
    } else {
        open_sources(&cli.source)?
    };

    let mut handle = IndexHandle::new(source);
    let built = load(&mut handle, cli.quiet)?;
    let not_found = config.not_found_message.as_str();

    match cli.command {
        Commands::Lookup { sku } => {
            output::print_lookup(&lookup_one(&built.index, &sku), not_found, color)?;
        }
        Commands::Batch { file, output: save_to } => {
            let upload = read_batch_table(&file)?;
            let annotated = annotate_table(&built.index, &upload, not_found)?;

            println!("Batch lookup complete.");
            output::print_table(&annotated, color)?;

            if let Some(path) = save_to {
                output::write_table_csv(&annotated, &path)?;
                println!("Results written to {}", path.display());
            }
        }
        Commands::Search { term } => {
            let outcome = search_descriptions(&built.corpus, &term);
            output::print_matches(&outcome, &term, color)?;
        }
        Commands::Stats => {
            show_stats(&built, &handle.source().describe())?;
        }
        Commands::Shell => {
            drop(built);
            run_shell(&mut handle, not_found, color, cli.quiet)?;
        }
        Commands::Config { .. } => unreachable!("handled before loading the catalog"),
    }

    Ok(())
}

/// Get the index from the handle with a spinner while it loads
fn load<S: TableSource>(handle: &mut IndexHandle<S>, quiet: bool) -> Result<Arc<BuiltIndex>> {
    let loading = if handle.is_built() {
        None
    } else {
        spinner("Loading SKU data...", quiet)
    };

    let result = handle.get();

    if let Some(loading) = loading {
        loading.finish_and_clear();
    }

    result
}

fn handle_config(
    mut config: AppConfig,
    set_source: Option<PathBuf>,
    set_not_found: Option<String>,
) -> Result<()> {
    let changed = set_source.is_some() || set_not_found.is_some();

    if let Some(path) = set_source {
        let path = path
            .canonicalize()
            .with_context(|| format!("Catalog not found: {}", path.display()))?;
        config.source = Some(path);
    }
    if let Some(message) = set_not_found {
        config.not_found_message = message;
    }
    if changed {
        config.save()?;
    }

    println!("Config file:      {}", get_config_path()?.display());
    match &config.source {
        Some(path) => println!("Catalog:          {}", path.display()),
        None => println!("Catalog:          (not set)"),
    }
    println!("Not-found text:   {}", config.not_found_message);
    println!("Color:            {}", config.color);

    Ok(())
}

const SHELL_HELP: &str = "\
Enter a SKU to look it up, or:
  /search <term>   search descriptions
  /refresh         reload the catalog
  /stats           show catalog statistics
  /help            show this help
  /quit            exit";

fn run_shell<S: TableSource>(
    handle: &mut IndexHandle<S>,
    not_found: &str,
    color: bool,
    quiet: bool,
) -> Result<()> {
    println!("{}", SHELL_HELP);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("sku> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }

        let (command, rest) = match input.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim_start()),
            None => (input, ""),
        };

        match command {
            "/quit" | "/exit" => break,
            "/help" => println!("{}", SHELL_HELP),
            "/refresh" => {
                handle.invalidate();
                match load(handle, quiet) {
                    Ok(built) => println!(
                        "Reloaded: {} SKUs, {} descriptions",
                        built.index.len(),
                        built.corpus.len()
                    ),
                    Err(e) => eprintln!("Reload failed: {:#}", e),
                }
            }
            "/stats" => match load(handle, quiet) {
                Ok(built) => show_stats(&built, &handle.source().describe())?,
                Err(e) => eprintln!("Error: {:#}", e),
            },
            "/search" => match load(handle, quiet) {
                Ok(built) => {
                    let outcome = search_descriptions(&built.corpus, rest);
                    if outcome.is_skipped() {
                        println!("Usage: /search <term>");
                    } else {
                        output::print_matches(&outcome, rest, color)?;
                    }
                }
                Err(e) => eprintln!("Error: {:#}", e),
            },
            _ => match load(handle, quiet) {
                Ok(built) => {
                    output::print_lookup(&lookup_one(&built.index, input), not_found, color)?
                }
                Err(e) => eprintln!("Error: {:#}", e),
            },
        }
    }

    Ok(())
}
