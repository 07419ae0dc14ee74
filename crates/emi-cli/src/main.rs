mod commands;
mod config;
mod error;
mod input;
mod output;
mod store;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::currency::CurrencyArgs;
use commands::format::{FormatArgs, SanitizeArgs};
use commands::history::HistoryArgs;
use commands::loan::{CalculateArgs, ScheduleArgs};
use commands::Context;
use config::CliConfig;
use error::CliResult;

/// Loan EMI calculations with region-aware currency formatting
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "Loan EMI calculations with region-aware currency formatting",
    long_about = "Computes equated monthly installments and amortization schedules \
                  with decimal precision, formats amounts in Indian (lakh/crore) or \
                  Western grouping, and keeps a local history of calculations."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path to a TOML config file
    #[arg(long, global = true, env = "EMI_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the EMI, total interest and total payable for a loan
    Calculate(CalculateArgs),
    /// Print the month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Format an amount for a currency
    Format(FormatArgs),
    /// Clean raw amount or rate input the way the entry fields do
    Sanitize(SanitizeArgs),
    /// List supported display currencies
    Currencies,
    /// Read or change the saved display currency
    Currency(CurrencyArgs),
    /// Browse and manage saved calculations
    History(HistoryArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Version = cli.command {
        println!("emi {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    match run(cli.command, cli.config) {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

fn run(command: Commands, config_path: Option<PathBuf>) -> CliResult<serde_json::Value> {
    let ctx = Context::new(CliConfig::load(config_path.as_deref())?);

    match command {
        Commands::Calculate(args) => commands::loan::run_calculate(args, &ctx),
        Commands::Schedule(args) => commands::loan::run_schedule(args, &ctx),
        Commands::Format(args) => commands::format::run_format(args, &ctx),
        Commands::Sanitize(args) => commands::format::run_sanitize(args, &ctx),
        Commands::Currencies => commands::currency::run_currencies(),
        Commands::Currency(args) => commands::currency::run_currency(args, &ctx),
        Commands::History(args) => commands::history::run_history(args, &ctx),
        Commands::Version => Ok(serde_json::json!({ "version": env!("CARGO_PKG_VERSION") })),
    }
}

/// Logs go to stderr so stdout stays parseable. `RUST_LOG` overrides the
/// default filter.
fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "emi_cli=debug,emi_core=debug"
    } else {
        "emi_cli=warn,emi_core=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
