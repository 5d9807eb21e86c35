//! Command line front end for fare estimation.
//!
//! Usage:
//!   fare-estimator [--model PATH] [--strict-schema] [-v...] <COMMAND>
//!
//! Commands:
//!   predict       Estimate the fare for one trip given as flags
//!   batch [FILE]  Estimate one fare per JSON line (stdin when FILE is omitted)
//!   schema        Show the feature schema resolved for the model
//!   performance   Show the static model performance summary
//!
//! Examples:
//!   fare-estimator --model model.json predict --pickup-date 2024-01-17 \
//!       --pickup-time 08:30:00 --trip-distance 3.1 --tip-amount 2.5
//!
//!   echo '{"pickup_date": "2024-01-17", "pickup_time": "08:30:00"}' \
//!       | fare-estimator --model model.json batch
//!
//! Exit codes: 0 on success, 1 if the model or its schema cannot be loaded,
//! 2 if a single `predict` fails.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fare_estimator::features::{
    RawInput, DEFAULT_CONGESTION_SURCHARGE, DEFAULT_EXTRA, DEFAULT_FARE_AMOUNT,
    DEFAULT_IMPROVEMENT_SURCHARGE, DEFAULT_MTA_TAX, DEFAULT_PASSENGER_COUNT, DEFAULT_TIP_AMOUNT,
    DEFAULT_TOLLS_AMOUNT, DEFAULT_TRIP_DISTANCE,
};
use fare_estimator::model::Predict;
use fare_estimator::report::{outcome_message, render_performance};
use fare_estimator::{batch, Estimator, EstimatorConfig, Regressor, SchemaFallback};

#[derive(Debug, Parser)]
#[command(
    name = "fare-estimator",
    version,
    about = "Estimate NYC green taxi total fares with a pre-trained regression model"
)]
struct Cli {
    /// Model artifact (JSON).
    #[arg(long, global = true, default_value = "model.json")]
    model: PathBuf,

    /// Fail instead of assuming the default feature list when the model
    /// artifact has no feature names.
    #[arg(long, global = true)]
    strict_schema: bool,

    /// Increase log verbosity (-v, -vv, -vvv). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Estimate the fare for a single trip.
    Predict(TripArgs),
    /// Estimate one fare per JSON line.
    Batch {
        /// Input file; reads stdin when omitted.
        file: Option<PathBuf>,
    },
    /// Show the feature schema resolved for the model.
    Schema,
    /// Show the static model performance summary.
    Performance,
}

#[derive(Debug, Args)]
struct TripArgs {
    /// Pickup date (YYYY-MM-DD). Default: today.
    #[arg(long)]
    pickup_date: Option<NaiveDate>,

    /// Pickup time (HH:MM:SS). Default: now.
    #[arg(long)]
    pickup_time: Option<NaiveTime>,

    /// Trip distance (miles).
    #[arg(long, default_value_t = DEFAULT_TRIP_DISTANCE)]
    trip_distance: f64,

    /// Fare amount ($).
    #[arg(long, default_value_t = DEFAULT_FARE_AMOUNT)]
    fare_amount: f64,

    /// MTA tax ($).
    #[arg(long, default_value_t = DEFAULT_MTA_TAX)]
    mta_tax: f64,

    /// Tolls amount ($).
    #[arg(long, default_value_t = DEFAULT_TOLLS_AMOUNT)]
    tolls_amount: f64,

    /// Tip amount ($).
    #[arg(long, default_value_t = DEFAULT_TIP_AMOUNT)]
    tip_amount: f64,

    /// Number of passengers (1-6).
    #[arg(
        long,
        default_value_t = DEFAULT_PASSENGER_COUNT,
        value_parser = clap::value_parser!(u8).range(1..=6)
    )]
    passenger_count: u8,

    /// Extra amount ($).
    #[arg(long, default_value_t = DEFAULT_EXTRA)]
    extra: f64,

    /// Improvement surcharge ($).
    #[arg(long, default_value_t = DEFAULT_IMPROVEMENT_SURCHARGE)]
    improvement_surcharge: f64,

    /// Congestion surcharge ($).
    #[arg(long, default_value_t = DEFAULT_CONGESTION_SURCHARGE)]
    congestion_surcharge: f64,

    /// Print the assembled feature vector before the estimate.
    #[arg(long)]
    show_features: bool,
}

impl TripArgs {
    fn to_input(&self) -> RawInput {
        let now = Local::now().naive_local();
        let pickup_time = self
            .pickup_time
            .unwrap_or_else(|| now.time().with_nanosecond(0).unwrap_or(now.time()));

        RawInput {
            pickup_date: self.pickup_date.unwrap_or(now.date()),
            pickup_time,
            trip_distance: self.trip_distance,
            fare_amount: self.fare_amount,
            mta_tax: self.mta_tax,
            tolls_amount: self.tolls_amount,
            tip_amount: self.tip_amount,
            passenger_count: self.passenger_count,
            extra: self.extra,
            improvement_surcharge: self.improvement_surcharge,
            congestion_surcharge: self.congestion_surcharge,
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_estimator(cli: &Cli) -> anyhow::Result<Estimator> {
    let fallback = if cli.strict_schema {
        SchemaFallback::Strict
    } else {
        SchemaFallback::Default
    };
    let config = EstimatorConfig::builder()
        .schema_fallback(fallback)
        .build()?;

    Estimator::load(&cli.model, config)
        .with_context(|| format!("configuration error for model {}", cli.model.display()))
}

fn predict(estimator: &Estimator, args: &TripArgs) -> anyhow::Result<ExitCode> {
    let input = args.to_input();

    if args.show_features {
        let vector = estimator.feature_vector(&input);
        for (name, value) in estimator.schema().iter().zip(vector.as_slice()) {
            println!("{name} = {value}");
        }
    }

    let outcome = estimator.estimate(&input);
    println!("{}", outcome_message(&outcome));
    Ok(if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

fn run_batch(estimator: &Estimator, file: Option<&PathBuf>) -> anyhow::Result<ExitCode> {
    let reader: Box<dyn BufRead> = match file {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let summary = batch::run(estimator, reader, io::stdout().lock())?;
    tracing::info!(ok = summary.ok, failed = summary.failed, "batch finished");
    Ok(ExitCode::SUCCESS)
}

fn show_schema(estimator: &Estimator) {
    println!(
        "Schema from {} ({} artifact, {} model with {} features)",
        estimator.schema_source(),
        estimator.artifact_shape(),
        estimator.model().kind(),
        estimator.model().n_features()
    );
    match estimator.model() {
        Regressor::Linear(model) => {
            println!("bias = {}", model.bias());
            for (i, name) in estimator.schema().iter().enumerate() {
                match model.weight(i) {
                    Some(w) => println!("{i:>3}  {name}  (weight {w})"),
                    None => println!("{i:>3}  {name}  (no weight)"),
                }
            }
        }
        Regressor::TreeEnsemble(model) => {
            println!("{} trees, base score {}", model.n_trees(), model.base_score());
            for (i, name) in estimator.schema().iter().enumerate() {
                println!("{i:>3}  {name}");
            }
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if let Command::Performance = cli.command {
        print!("{}", render_performance());
        return Ok(ExitCode::SUCCESS);
    }

    let estimator = match load_estimator(&cli) {
        Ok(estimator) => estimator,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return Ok(ExitCode::from(1));
        }
    };

    match &cli.command {
        Command::Predict(args) => predict(&estimator, args),
        Command::Batch { file } => run_batch(&estimator, file.as_ref()),
        Command::Schema => {
            show_schema(&estimator);
            Ok(ExitCode::SUCCESS)
        }
        Command::Performance => unreachable!("handled before loading the model"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
