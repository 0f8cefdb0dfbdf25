//! foresight CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "foresight",
    version,
    about = "Score forecasts against realized outcomes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a forecast set against a question set
    Score {
        /// Path to .toml question set or directory
        #[arg(long)]
        questions: PathBuf,

        /// Forecast file (.toml or .json)
        #[arg(long, required_unless_present = "simulate")]
        forecasts: Option<PathBuf>,

        /// Score simulated forecasts instead of a forecast file
        #[arg(long, conflicts_with = "forecasts")]
        simulate: bool,

        /// Seed for --simulate (default: from config)
        #[arg(long, requires = "simulate")]
        seed: Option<u64>,

        /// Date-error horizon in days (default: from config)
        #[arg(long)]
        max_days: Option<u32>,

        /// Do not cap date errors beyond the horizon
        #[arg(long)]
        unclamped: bool,

        /// Skip questions that cannot be scored instead of aborting
        #[arg(long)]
        skip_invalid: bool,

        /// Output directory (default: from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: table, json, html, all
        #[arg(long, default_value = "table")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write simulated forecasts for a question set to a file
    Simulate {
        /// Path to .toml question set or directory
        #[arg(long)]
        questions: PathBuf,

        /// Random seed (default: from config)
        #[arg(long)]
        seed: Option<u64>,

        /// Forecast file to write (.toml or .json)
        #[arg(long)]
        output: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question set TOML files
    Validate {
        /// Path to question set file or directory
        #[arg(long)]
        questions: PathBuf,
    },

    /// Compare two score reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Score change treated as significant
        #[arg(long, default_value = "0.05")]
        threshold: f64,

        /// Exit code 1 if regressions found
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create starter config, question set and forecasts
    Init,
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "foresight=info".parse::<tracing_subscriber::filter::Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            questions,
            forecasts,
            simulate,
            seed,
            max_days,
            unclamped,
            skip_invalid,
            output,
            format,
            config,
        } => commands::score::execute(commands::score::ScoreArgs {
            questions,
            forecasts,
            simulate,
            seed,
            max_days,
            unclamped,
            skip_invalid,
            output,
            format,
            config,
        }),
        Commands::Simulate {
            questions,
            seed,
            output,
            config,
        } => commands::simulate::execute(questions, seed, output, config),
        Commands::Validate { questions } => commands::validate::execute(questions),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_regression, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
