//! Market data provider trait definitions.
//!
//! This module defines the core `MarketDataProvider` trait that all
//! market data providers must implement.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::MarketDataError;
use crate::models::Quote;

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source. The
/// tracker treats the provider as an opaque price source; only the latest
/// quote, daily bars, and intraday bars are required.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "YAHOO". Used for logging and error
    /// attribution.
    fn id(&self) -> &'static str;

    /// Fetch the latest quote for a symbol.
    ///
    /// # Returns
    ///
    /// The latest quote on success, or a `MarketDataError` on failure.
    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    /// Fetch daily bars for a symbol over a date range.
    ///
    /// # Arguments
    ///
    /// * `start` - First calendar date of the range (inclusive)
    /// * `end` - Last calendar date of the range (inclusive)
    ///
    /// # Returns
    ///
    /// One quote per trading day, ordered by timestamp ascending. Returns
    /// `NoDataForRange` when the range contains no trading days.
    async fn get_daily_quotes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Quote>, MarketDataError>;

    /// Fetch minute bars for a symbol on a single trading day.
    ///
    /// Ordered by timestamp ascending. Returns `NoDataForRange` when the
    /// provider has no intraday data for the day (common for days outside
    /// the provider's intraday retention).
    async fn get_intraday_quotes(
        &self,
        symbol: &str,
        day: NaiveDate,
    ) -> Result<Vec<Quote>, MarketDataError>;
}
