//! CLI command definitions

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "Parley - one-to-many CFP negotiation for autonomous agents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a negotiation round against simulated counterparties
    Run {
        /// Number of simulated sellers the directory returns
        #[arg(short, long, default_value = "3")]
        sellers: usize,

        /// Maximum acceptable unit price
        #[arg(short, long, default_value = "20")]
        max_price: u64,

        /// Available balance
        #[arg(short, long, default_value = "100")]
        balance: u64,

        /// Keep querying the directory even after a non-empty result
        #[arg(long)]
        keep_searching: bool,

        /// Seconds to wait for proposals before forcing the decision
        #[arg(short, long, default_value = "5")]
        wait: u64,

        /// Number of sellers that never answer their CFP
        #[arg(long, default_value = "0")]
        silent: usize,
    },
}
