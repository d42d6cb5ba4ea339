//! Environment-driven configuration for the monitor.

use std::env;
use std::path::PathBuf;

use peakwatch_core::constants::{
    DEFAULT_DATA_FILE, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_QUOTE_CURRENCY, DEFAULT_TICKER,
};

#[derive(Clone, Debug)]
pub struct Config {
    /// Ticker symbol to track.
    pub ticker: String,
    /// Path of the JSON window store.
    pub data_file: PathBuf,
    /// Background polling interval in seconds.
    pub poll_interval_secs: u64,
    /// Currency the provider quotes in.
    pub quote_currency: String,
    /// Optional second currency for displaying the current price.
    pub display_currency: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let ticker = env::var("PEAKWATCH_TICKER").unwrap_or_else(|_| DEFAULT_TICKER.to_string());
        let data_file = env::var("PEAKWATCH_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILE));
        let poll_interval_secs = env::var("PEAKWATCH_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        let quote_currency = env::var("PEAKWATCH_CURRENCY")
            .unwrap_or_else(|_| DEFAULT_QUOTE_CURRENCY.to_string());
        let display_currency = env::var("PEAKWATCH_DISPLAY_CURRENCY").ok();

        Self {
            ticker,
            data_file,
            poll_interval_secs,
            quote_currency,
            display_currency,
        }
    }
}
