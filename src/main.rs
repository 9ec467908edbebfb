use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use courierd::config::Config;
use courierd::http::{self, AppState};
use courierd::rates::RateEngine;
use courierd::table::RateTable;
use courierd::telemetry::{counters, init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(name = "courierd")]
#[command(author, version, about = "Shipping carrier rate resolution service")]
struct Args {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Validate config and rate table, then exit
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (to get log settings)
    let config = Config::load(&args.config)?;

    let tracing_config = TracingConfig {
        service_name: "courierd".to_string(),
        log_level: config.telemetry.log_level.clone(),
        json_logs: config.telemetry.json_logs,
    };

    init_tracing(&tracing_config)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        "starting courierd"
    );

    // Validate only mode: config parsed, table must load cleanly
    if args.validate {
        let table = RateTable::load(&config.table.path)?;
        info!(
            carriers = table.carriers.len(),
            "configuration and rate table are valid"
        );
        return Ok(());
    }

    counters::init();

    // The table is loaded once and never mutated. A load failure does not
    // abort the process: the HTTP surface still starts so /health can report
    // the problem, and /rates answers 500 until the operator fixes the file.
    let engine = match RateTable::load(&config.table.path) {
        Ok(table) => {
            info!(
                carriers = table.carriers.len(),
                services = table.services_count(),
                locations = table.locations_count(),
                "rate table loaded"
            );
            Some(Arc::new(RateEngine::new(Arc::new(table))))
        }
        Err(e) => {
            error!(error = %e, "failed to load rate table, serving unhealthy");
            None
        }
    };

    let state = Arc::new(AppState::new(engine));
    http::serve(state, config.server.address, config.server.permissive_cors).await
}
