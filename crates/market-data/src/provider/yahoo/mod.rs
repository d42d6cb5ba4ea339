//! Yahoo Finance market data provider.
//!
//! Uses the Yahoo Finance API to fetch latest, daily, and intraday quotes
//! for equities/ETFs (e.g. NOW, AAPL) and FX pairs (e.g. USDILS=X).

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::Quote;
use crate::provider::MarketDataProvider;

const PROVIDER_ID: &str = "YAHOO";

/// Quote currency reported for Yahoo quotes when none is configured.
const DEFAULT_CURRENCY: &str = "USD";

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    currency: String,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, MarketDataError> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to initialize Yahoo connector: {}", e),
            })?;
        Ok(Self {
            connector,
            currency: DEFAULT_CURRENCY.to_string(),
        })
    }

    /// Override the currency attached to returned quotes.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Convert a calendar date at UTC midnight to time::OffsetDateTime for
    /// the Yahoo API.
    fn date_to_offset_datetime(date: NaiveDate) -> OffsetDateTime {
        let dt = date.and_time(NaiveTime::MIN).and_utc();
        OffsetDateTime::from_unix_timestamp(dt.timestamp())
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
    }

    /// Convert a Yahoo quote to our Quote model.
    fn yahoo_quote_to_quote(&self, yahoo_quote: yahoo::Quote) -> Result<Quote, MarketDataError> {
        // Validate timestamp
        let timestamp: DateTime<Utc> = Utc
            .timestamp_opt(yahoo_quote.timestamp as i64, 0)
            .single()
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!("Invalid timestamp: {}", yahoo_quote.timestamp),
            })?;

        // Close price is required
        let close = Decimal::from_f64_retain(yahoo_quote.close).ok_or_else(|| {
            MarketDataError::ValidationFailed {
                message: format!(
                    "Failed to convert close price {} to Decimal",
                    yahoo_quote.close
                ),
            }
        })?;

        Ok(Quote {
            timestamp,
            open: Decimal::from_f64_retain(yahoo_quote.open),
            high: Decimal::from_f64_retain(yahoo_quote.high),
            low: Decimal::from_f64_retain(yahoo_quote.low),
            close,
            currency: self.currency.clone(),
            source: PROVIDER_ID.to_string(),
        })
    }

    fn map_yahoo_error(symbol: &str, e: yahoo::YahooError) -> MarketDataError {
        if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
            MarketDataError::SymbolNotFound(symbol.to_string())
        } else {
            MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: e.to_string(),
            }
        }
    }

    /// Convert a Yahoo response into ordered quotes, dropping bars that fail
    /// conversion.
    fn collect_quotes(
        &self,
        symbol: &str,
        response: yahoo::YResponse,
    ) -> Result<Vec<Quote>, MarketDataError> {
        match response.quotes() {
            Ok(yahoo_quotes) => {
                let quotes: Vec<Quote> = yahoo_quotes
                    .into_iter()
                    .filter_map(|q| match self.yahoo_quote_to_quote(q) {
                        Ok(quote) => Some(quote),
                        Err(e) => {
                            warn!("Skipping quote due to conversion error: {:?}", e);
                            None
                        }
                    })
                    .collect();

                if quotes.is_empty() {
                    return Err(MarketDataError::NoDataForRange);
                }

                Ok(quotes)
            }
            Err(yahoo::YahooError::NoQuotes) => {
                warn!("No quotes returned for '{}'", symbol);
                Err(MarketDataError::NoDataForRange)
            }
            Err(e) => Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        debug!("Fetching latest quote for {} from Yahoo", symbol);

        let response = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| Self::map_yahoo_error(symbol, e))?;

        let yahoo_quote = response.last_quote().map_err(|e| {
            warn!("No quotes returned for {}: {}", symbol, e);
            MarketDataError::SymbolNotFound(symbol.to_string())
        })?;

        self.yahoo_quote_to_quote(yahoo_quote)
    }

    async fn get_daily_quotes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Quote>, MarketDataError> {
        debug!(
            "Fetching daily quotes for {} from {} to {} from Yahoo",
            symbol, start, end
        );

        let start_time = Self::date_to_offset_datetime(start);
        // Yahoo treats the range end as exclusive; push it past the last
        // requested calendar day.
        let end_time = Self::date_to_offset_datetime(end.succ_opt().unwrap_or(end));

        let response = self
            .connector
            .get_quote_history(symbol, start_time, end_time)
            .await
            .map_err(|e| Self::map_yahoo_error(symbol, e))?;

        self.collect_quotes(symbol, response)
    }

    async fn get_intraday_quotes(
        &self,
        symbol: &str,
        day: NaiveDate,
    ) -> Result<Vec<Quote>, MarketDataError> {
        debug!("Fetching intraday quotes for {} on {} from Yahoo", symbol, day);

        let start_time = Self::date_to_offset_datetime(day);
        let end_time = Self::date_to_offset_datetime(day.succ_opt().unwrap_or(day));

        let response = self
            .connector
            .get_quote_history_interval(symbol, start_time, end_time, "1m")
            .await
            .map_err(|e| Self::map_yahoo_error(symbol, e))?;

        self.collect_quotes(symbol, response)
    }
}
