use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::fx::fx_errors::FxError;
use crate::fx::fx_model::ExchangeRateCache;
use crate::fx::fx_traits::{FxServiceTrait, RateSourceTrait};

/// Exchange-rate service: per-date cache in front of an opaque source.
///
/// When the source is unreachable the most recent cached rate is served
/// instead.
pub struct FxService {
    source: Arc<dyn RateSourceTrait>,
    cache: Arc<ExchangeRateCache>,
}

impl FxService {
    pub fn new(source: Arc<dyn RateSourceTrait>, cache: Arc<ExchangeRateCache>) -> Self {
        Self { source, cache }
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    async fn get_rate(&self, from: &str, to: &str, date: NaiveDate) -> Result<Decimal> {
        if from == to {
            return Ok(Decimal::ONE);
        }

        if let Some(rate) = self.cache.get(from, to, date) {
            return Ok(rate);
        }

        match self.source.get_rate(from, to, date).await {
            Ok(rate) => {
                self.cache.insert(from, to, date, rate);
                Ok(rate)
            }
            Err(e) => {
                warn!("rate source unavailable for {}/{} on {}: {}", from, to, date, e);
                match self.cache.latest(from, to) {
                    Some(cached) => {
                        warn!("using cached {} rate from {}", cached.pair(), cached.date);
                        Ok(cached.rate)
                    }
                    None => Err(FxError::RateNotFound(format!("{}/{}", from, to)).into()),
                }
            }
        }
    }

    async fn convert(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
        date: NaiveDate,
    ) -> Result<Decimal> {
        let rate = self.get_rate(from, to, date).await?;
        Ok(amount * rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    struct MockRateSource {
        rate: Decimal,
        fail: AtomicBool,
        calls: AtomicU32,
    }

    impl MockRateSource {
        fn new(rate: Decimal) -> Self {
            Self {
                rate,
                fail: AtomicBool::new(false),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl RateSourceTrait for MockRateSource {
        async fn get_rate(&self, from: &str, to: &str, _date: NaiveDate) -> Result<Decimal> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                Err(FxError::Source(format!("{}/{} unreachable", from, to)).into())
            } else {
                Ok(self.rate)
            }
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    #[tokio::test]
    async fn test_same_currency_is_identity() {
        let source = Arc::new(MockRateSource::new(dec!(3.40)));
        let service = FxService::new(source.clone(), Arc::new(ExchangeRateCache::new()));

        let rate = service.get_rate("USD", "USD", date(1)).await.unwrap();
        assert_eq!(rate, Decimal::ONE);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rate_is_cached_per_date() {
        let source = Arc::new(MockRateSource::new(dec!(3.40)));
        let service = FxService::new(source.clone(), Arc::new(ExchangeRateCache::new()));

        assert_eq!(service.get_rate("USD", "ILS", date(1)).await.unwrap(), dec!(3.40));
        assert_eq!(service.get_rate("USD", "ILS", date(1)).await.unwrap(), dec!(3.40));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        // A new date goes back to the source.
        service.get_rate("USD", "ILS", date(2)).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_outage_degrades_to_latest_cached_rate() {
        let source = Arc::new(MockRateSource::new(dec!(3.40)));
        let cache = Arc::new(ExchangeRateCache::new());
        let service = FxService::new(source.clone(), cache);

        service.get_rate("USD", "ILS", date(1)).await.unwrap();
        source.fail.store(true, Ordering::SeqCst);

        let rate = service.get_rate("USD", "ILS", date(4)).await.unwrap();
        assert_eq!(rate, dec!(3.40));
    }

    #[tokio::test]
    async fn test_outage_with_empty_cache_is_an_error() {
        let source = Arc::new(MockRateSource::new(dec!(3.40)));
        source.fail.store(true, Ordering::SeqCst);
        let service = FxService::new(source, Arc::new(ExchangeRateCache::new()));

        match service.get_rate("USD", "ILS", date(1)).await {
            Err(Error::Fx(FxError::RateNotFound(pair))) => assert_eq!(pair, "USD/ILS"),
            other => panic!("expected RateNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_convert_multiplies_by_rate() {
        let source = Arc::new(MockRateSource::new(dec!(3.40)));
        let service = FxService::new(source, Arc::new(ExchangeRateCache::new()));

        let converted = service
            .convert(dec!(900), "USD", "ILS", date(1))
            .await
            .unwrap();
        assert_eq!(converted, dec!(3060.00));
    }
}
