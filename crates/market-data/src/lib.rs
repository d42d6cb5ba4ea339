//! Peakwatch Market Data Crate
//!
//! This crate provides the price source used by the peak tracker. It is
//! deliberately narrow: one provider trait, one Yahoo Finance
//! implementation, and an error taxonomy with retry classification.
//!
//! # Overview
//!
//! The tracker needs three views of an instrument's price history:
//!
//! - the latest observed price (`get_latest_quote`)
//! - the daily bars for a date range (`get_daily_quotes`)
//! - the minute bars for a single trading day (`get_intraday_quotes`)
//!
//! All three return [`Quote`] values ordered by timestamp ascending.
//!
//! # Core Types
//!
//! - [`MarketDataProvider`] - The provider trait
//! - [`YahooProvider`] - Yahoo Finance implementation
//! - [`Quote`] - Market data quote with OHLC data
//! - [`MarketDataError`] - Error enum, classified via [`RetryClass`]

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::{with_backoff, MarketDataError, RetryClass};
pub use models::Quote;
pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;
