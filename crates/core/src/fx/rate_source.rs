use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use peakwatch_market_data::{MarketDataError, MarketDataProvider};

use crate::errors::Result;
use crate::fx::fx_traits::RateSourceTrait;

/// Rate source backed by the market data provider, using the provider's FX
/// pair symbol convention (e.g. `USDILS=X`).
pub struct MarketDataRateSource {
    provider: Arc<dyn MarketDataProvider>,
}

impl MarketDataRateSource {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    fn pair_symbol(from: &str, to: &str) -> String {
        format!("{}{}=X", from, to)
    }
}

#[async_trait]
impl RateSourceTrait for MarketDataRateSource {
    async fn get_rate(&self, from: &str, to: &str, date: NaiveDate) -> Result<Decimal> {
        if from == to {
            return Ok(Decimal::ONE);
        }
        let symbol = Self::pair_symbol(from, to);

        match self.provider.get_daily_quotes(&symbol, date, date).await {
            Ok(quotes) => match quotes.last() {
                Some(quote) => Ok(quote.close),
                None => Ok(self.provider.get_latest_quote(&symbol).await?.close),
            },
            // FX markets close on weekends; take the latest quote instead.
            Err(MarketDataError::NoDataForRange) => {
                Ok(self.provider.get_latest_quote(&symbol).await?.close)
            }
            Err(e) => Err(e.into()),
        }
    }
}
