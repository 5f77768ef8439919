//! Warehouse - interactive inventory console
//!
//! Keeps the warehouse and sales stores as TSV files in a data directory and
//! answers the commands `add`, `list`, `sale`, `profits`, `help` and `close`.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use warehouse::config::{DEFAULT_SALES_FILE, DEFAULT_WAREHOUSE_FILE};
use warehouse::{session, ConsoleOperator, Inventory, StorePaths};

/// Warehouse inventory console - tracks stock, sales and profit
#[derive(Parser, Debug)]
#[command(name = "warehouse")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the store files
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// File name of the warehouse store
    #[arg(long, default_value = DEFAULT_WAREHOUSE_FILE)]
    warehouse_file: String,

    /// File name of the sales store
    #[arg(long, default_value = DEFAULT_SALES_FILE)]
    sales_file: String,
}

fn run(args: Args) -> Result<()> {
    let paths = StorePaths::new(&args.data_dir, &args.warehouse_file, &args.sales_file);
    log::info!("Warehouse store: {}", paths.warehouse.display());
    log::info!("Sales store: {}", paths.sales.display());

    paths
        .ensure_dirs()
        .context("Failed to create data directory")?;

    let inventory = Inventory::open(&paths);
    let stdin = io::stdin();
    let mut operator = ConsoleOperator::new(stdin.lock(), io::stdout());

    session::run(&inventory, &mut operator).context("Console session failed")?;
    Ok(())
}

fn main() {
    // Prompts share the terminal with the log, so only warnings by default.
    // Set RUST_LOG=info or RUST_LOG=warehouse=debug for more.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("Application error: {e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
