//! Operator daemon entry point.
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use fiobench_operator::benchmark;

/// Operator for automating distributed storage benchmarks.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the controller daemon.
    Daemon {
        /// Endpoint for exporting OTLP traces.
        #[arg(
            long,
            env = "OPERATOR_OTLP_ENDPOINT",
            default_value = "http://localhost:4317"
        )]
        otlp_endpoint: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Daemon { otlp_endpoint } => {
            fiobench_common::telemetry::init(otlp_endpoint).await?;
            info!("starting fiobench operator");
            benchmark::run().await;
        }
    }
    Ok(())
}
