//! Parley CLI binary

use clap::Parser;
use parley::cli::{app, Cli, Commands, SimulationConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            sellers,
            max_price,
            balance,
            keep_searching,
            wait,
            silent,
        } => {
            tracing::info!("starting negotiation against {} sellers", sellers);
            app::run(SimulationConfig {
                sellers,
                max_price,
                balance,
                stop_on_first_result: !keep_searching,
                wait_secs: wait,
                silent,
            })
            .await?;
        }
    }

    Ok(())
}
