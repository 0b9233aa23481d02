mod input;

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use gymplan_core::{resolve_duration, PaymentType};
use gymplan_eval::{classify_offers, Classifier};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (tracing `EnvFilter` syntax).
const LOG_ENV: &str = "GYMPLAN_LOG";

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Gym membership plan classifier.
#[derive(Parser)]
#[command(name = "gymplan", version, about = "Gym membership plan classifier")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress error messages and log output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a candidate plan against the current membership
    Classify {
        /// Path to the current membership JSON
        current: PathBuf,
        /// Path to the candidate plan JSON
        candidate: PathBuf,
        /// End date of the current membership (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,
        /// Section catalog TOML for exact group/section comparisons
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Classify every tariff in a list against the current membership
    Offers {
        /// Path to the current membership JSON
        current: PathBuf,
        /// Path to a JSON array of candidate plans
        candidates: PathBuf,
        /// End date of the current membership (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,
        /// Section catalog TOML for exact group/section comparisons
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Resolve the duration of a payment type
    Duration {
        /// Payment type (monthly, semi_annual, annual, session_pack, ...)
        payment_type: String,
        /// Explicit duration in days (0 means none)
        #[arg(long)]
        days: Option<u32>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    match cli.command {
        Commands::Classify {
            current,
            candidate,
            end_date,
            catalog,
        } => {
            cmd_classify(
                &current,
                &candidate,
                end_date.as_deref(),
                catalog.as_deref(),
                cli.output,
                cli.quiet,
            );
        }
        Commands::Offers {
            current,
            candidates,
            end_date,
            catalog,
        } => {
            cmd_offers(
                &current,
                &candidates,
                end_date.as_deref(),
                catalog.as_deref(),
                cli.output,
                cli.quiet,
            );
        }
        Commands::Duration { payment_type, days } => {
            cmd_duration(&payment_type, days, cli.output);
        }
    }
}

fn init_tracing(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn cmd_classify(
    current_path: &Path,
    candidate_path: &Path,
    end_date: Option<&str>,
    catalog_path: Option<&Path>,
    output: OutputFormat,
    quiet: bool,
) {
    let current = unwrap_or_exit(input::read_plan(current_path), output, quiet);
    let candidate = unwrap_or_exit(input::read_plan(candidate_path), output, quiet);
    let catalog = unwrap_or_exit(input::read_catalog(catalog_path), output, quiet);

    let classifier = Classifier::new(catalog.as_ref());
    let result = match classifier.classify(&current, &candidate, end_date) {
        Ok(r) => r,
        Err(e) => {
            report_error(&format!("classification error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Text => println!("{}", result),
        OutputFormat::Json => print_json(&result),
    }
}

fn cmd_offers(
    current_path: &Path,
    candidates_path: &Path,
    end_date: Option<&str>,
    catalog_path: Option<&Path>,
    output: OutputFormat,
    quiet: bool,
) {
    let current = unwrap_or_exit(input::read_plan(current_path), output, quiet);
    let candidates = unwrap_or_exit(input::read_candidates(candidates_path), output, quiet);
    let catalog = unwrap_or_exit(input::read_catalog(catalog_path), output, quiet);

    let classifier = Classifier::new(catalog.as_ref());
    let report = match classify_offers(&classifier, &current, &candidates, end_date) {
        Ok(r) => r,
        Err(e) => {
            report_error(&format!("classification error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Text => println!("{}", report.to_text()),
        OutputFormat::Json => print_json(&report.to_json()),
    }
}

fn cmd_duration(payment_type: &str, days: Option<u32>, output: OutputFormat) {
    let payment_type = PaymentType::from(payment_type);
    let resolved = resolve_duration(&payment_type, days.and_then(NonZeroU32::new));

    match output {
        OutputFormat::Text => println!("{} days ({})", resolved.days, resolved.source),
        OutputFormat::Json => print_json(&resolved),
    }
}

fn unwrap_or_exit<T>(result: Result<T, String>, output: OutputFormat, quiet: bool) -> T {
    match result {
        Ok(value) => value,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => {
            eprintln!("error serializing output: {}", e);
            process::exit(1);
        }
    }
}

/// Report an error in the requested output format.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
