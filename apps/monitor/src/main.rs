mod alerts;
mod config;
mod main_lib;
mod scheduler;

use chrono::Utc;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::warn;

use peakwatch_core::constants::DEFAULT_SIMULATED_PEAK_OFFSET;
use peakwatch_core::tracking::WindowStatus;

use config::Config;
use main_lib::{build_state, init_tracing, AppState};

#[derive(Parser)]
#[command(name = "peakwatch", version, about = "Trading-window stock peak monitor")]
struct Cli {
    /// Track a specific window instead of the current month
    /// ("YYYY-MM" or "YYYY-MM-DD_to_YYYY-MM-DD").
    #[arg(long, global = true)]
    window: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the background monitor until interrupted
    Run,
    /// Print the active window's tracking record
    Status,
    /// Force a manual tracking cycle (also reverts a simulated peak)
    Refresh,
    /// Inject a simulated peak above the current reference price
    Simulate {
        /// Amount added to the reference price
        #[arg(long, default_value_t = DEFAULT_SIMULATED_PEAK_OFFSET)]
        offset: Decimal,
    },
    /// Delete the active window's tracking record
    Clear,
    /// Summarize historical trading windows
    Analyze {
        /// Number of years of history to analyze
        #[arg(long, default_value_t = 10)]
        years: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();
    init_tracing();
    let state = build_state(config)?;

    if let Some(key) = &cli.window {
        state.tracking_service.set_active_window(key)?;
    }

    match cli.command {
        Command::Run => run_monitor(state).await,
        Command::Status => match state.tracking_service.status() {
            Some(status) => print_status(&state, status).await,
            None => {
                println!(
                    "no data for window {}",
                    state.tracking_service.active_window().key()
                );
                Ok(())
            }
        },
        Command::Refresh => match state.tracking_service.track_cycle(true).await? {
            Some(status) => print_status(&state, status).await,
            None => {
                println!("price source unavailable, nothing recorded yet");
                Ok(())
            }
        },
        Command::Simulate { offset } => {
            let status = state.tracking_service.simulate_peak(offset).await?;
            print_status(&state, status).await
        }
        Command::Clear => {
            match state.tracking_service.clear_window().await? {
                Some(key) => println!("cleared window {}", key),
                None => println!(
                    "nothing to clear for window {}",
                    state.tracking_service.active_window().key()
                ),
            }
            Ok(())
        }
        Command::Analyze { years } => {
            let today = Utc::now().date_naive();
            let report = state.analysis_service.run(years, today).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

async fn run_monitor(state: Arc<AppState>) -> anyhow::Result<()> {
    scheduler::start_tracking_scheduler(state.clone());
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    Ok(())
}

async fn print_status(state: &Arc<AppState>, status: WindowStatus) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&status)?);

    if let Some(to) = &state.config.display_currency {
        let today = Utc::now().date_naive();
        match state
            .fx_service
            .convert(
                status.record.current_price,
                &state.config.quote_currency,
                to,
                today,
            )
            .await
        {
            Ok(converted) => println!("current price in {}: {:.2}", to, converted),
            Err(e) => warn!("display conversion unavailable: {}", e),
        }
    }
    Ok(())
}
