//! CLI entry point for the route rater tool.
//!
//! Provides subcommands for simulating shipment routes and for scoring a
//! route table loaded from a file or URL, exporting winners as CSV and
//! map-ready JSON.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use route_rater::{
    features::FeatureBuilder,
    fetch::{BasicClient, fetch_bytes},
    ingest::routes_from_csv,
    model::{FeatureSchema, LinearModel},
    output::{print_json, write_map_data, write_records},
    planner::RoutePlanner,
    shipment::{CandidateRoute, WeightTriple},
    simulate::{simulate_shipments, simulate_shipments_seeded},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "route_rater")]
#[command(about = "A tool to score and select shipment routes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Relative importance of the three route metrics. Normalized to sum to 1
/// before scoring; defaults mirror the dashboard's slider positions.
#[derive(Args)]
struct WeightArgs {
    /// Weight: predicted transit time
    #[arg(long, default_value_t = 0.5)]
    weight_time: f64,

    /// Weight: logistics cost
    #[arg(long, default_value_t = 0.3)]
    weight_cost: f64,

    /// Weight: customs-delay risk
    #[arg(long, default_value_t = 0.2)]
    weight_risk: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate shipments and select the best route per shipment
    Simulate {
        /// Number of shipments to simulate
        #[arg(short = 'n', long, default_value_t = 5)]
        shipments: u32,

        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Model artifact JSON; the built-in model is used when omitted
        #[arg(short, long)]
        model: Option<String>,

        #[command(flatten)]
        weights: WeightArgs,

        /// CSV file to write the winning routes to
        #[arg(short, long, default_value = "best_routes.csv")]
        output: String,

        /// Optional JSON file with map-ready route lines
        #[arg(long)]
        map_output: Option<String>,
    },
    /// Score a candidate route table from a CSV file or URL
    Analyze {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Model artifact JSON; the built-in model is used when omitted
        #[arg(short, long)]
        model: Option<String>,

        /// Feature schema JSON overriding the model artifact's column list
        #[arg(long)]
        schema: Option<String>,

        #[command(flatten)]
        weights: WeightArgs,

        /// CSV file to write the winning routes to
        #[arg(short, long, default_value = "best_routes.csv")]
        output: String,

        /// Optional JSON file with map-ready route lines
        #[arg(long)]
        map_output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/route_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("route_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            shipments,
            seed,
            model,
            weights,
            output,
            map_output,
        } => {
            let model = load_model(model.as_deref())?;
            let builder = FeatureBuilder::new(model.schema());

            let routes = match seed {
                Some(seed) => simulate_shipments_seeded(shipments, seed),
                None => simulate_shipments(shipments),
            };

            run_selection(
                &builder,
                &model,
                &routes,
                &weights,
                &output,
                map_output.as_deref(),
            )?;
        }
        Commands::Analyze {
            source,
            model,
            schema,
            weights,
            output,
            map_output,
        } => {
            let model = load_model(model.as_deref())?;
            let schema = match schema {
                Some(path) => FeatureSchema::load(&path)?,
                None => model.schema(),
            };
            // An override schema that disagrees with the artifact would pair
            // every coefficient with the wrong feature; reject it up front.
            model.check_schema(&schema)?;
            let builder = FeatureBuilder::new(schema);

            let bytes = fetcher(&source).await?;
            let routes = routes_from_csv(&bytes)?;
            info!(source = %source, candidates = routes.len(), "Route table loaded");

            run_selection(
                &builder,
                &model,
                &routes,
                &weights,
                &output,
                map_output.as_deref(),
            )?;
        }
    }

    Ok(())
}

fn load_model(path: Option<&str>) -> Result<LinearModel> {
    match path {
        Some(path) => {
            info!(path, "Loading model artifact");
            LinearModel::load(path)
        }
        None => Ok(LinearModel::builtin()),
    }
}

/// Enriches the routes, selects one winner per shipment, and writes the
/// CSV (and optional map JSON) exports.
fn run_selection(
    builder: &FeatureBuilder,
    model: &LinearModel,
    routes: &[CandidateRoute],
    weights: &WeightArgs,
    output: &str,
    map_output: Option<&str>,
) -> Result<()> {
    let weights = WeightTriple::new(weights.weight_time, weights.weight_cost, weights.weight_risk)
        .normalized()?;

    let mut planner = RoutePlanner::load(builder, routes, model)?;
    let winners = planner.select(&weights)?;

    info!(
        shipments = winners.len(),
        candidates = routes.len(),
        "Best routes selected"
    );
    print_json(&winners)?;
    write_records(output, &winners)?;
    info!(output, "Winning routes written");

    if let Some(map_path) = map_output {
        write_map_data(map_path, &winners)?;
        info!(map_path, "Map data written");
    }

    Ok(())
}

/// Loads route-table data from a local file path or fetches it over HTTP.
#[tracing::instrument(fields(source = %url))]
async fn fetcher(url: &String) -> Result<Vec<u8>> {
    let bytes = if url.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, url).await?
    } else {
        std::fs::read(url)?
    };
    Ok(bytes)
}
