use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A currency pair's rate on a given date.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    pub date: NaiveDate,
}

impl ExchangeRate {
    pub fn new(
        from_currency: impl Into<String>,
        to_currency: impl Into<String>,
        rate: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            from_currency: from_currency.into(),
            to_currency: to_currency.into(),
            rate,
            date,
        }
    }

    pub fn pair(&self) -> String {
        format!("{}/{}", self.from_currency, self.to_currency)
    }
}

/// Explicit exchange-rate cache, keyed by `(from, to, date)`.
///
/// Owned by the composition root and handed to the services that need it.
/// Keying by date makes entries expire naturally: a lookup on a new trading
/// day misses and triggers a fresh fetch, while old entries remain usable
/// as a degraded fallback when the source is down.
#[derive(Default)]
pub struct ExchangeRateCache {
    entries: RwLock<HashMap<(String, String, NaiveDate), Decimal>>,
}

impl ExchangeRateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, from: &str, to: &str, date: NaiveDate) -> Option<Decimal> {
        self.entries
            .read()
            .unwrap()
            .get(&(from.to_string(), to.to_string(), date))
            .copied()
    }

    pub fn insert(&self, from: &str, to: &str, date: NaiveDate, rate: Decimal) {
        self.entries
            .write()
            .unwrap()
            .insert((from.to_string(), to.to_string(), date), rate);
    }

    /// The most recently dated cached rate for a pair, if any.
    pub fn latest(&self, from: &str, to: &str) -> Option<ExchangeRate> {
        self.entries
            .read()
            .unwrap()
            .iter()
            .filter(|((f, t, _), _)| f == from && t == to)
            .max_by_key(|((_, _, date), _)| *date)
            .map(|((f, t, date), rate)| ExchangeRate::new(f.clone(), t.clone(), *rate, *date))
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    #[test]
    fn test_cache_is_keyed_by_date() {
        let cache = ExchangeRateCache::new();
        cache.insert("USD", "ILS", date(1), dec!(3.40));

        assert_eq!(cache.get("USD", "ILS", date(1)), Some(dec!(3.40)));
        // A new day misses even though yesterday's rate is cached.
        assert_eq!(cache.get("USD", "ILS", date(2)), None);
        assert_eq!(cache.get("USD", "EUR", date(1)), None);
    }

    #[test]
    fn test_latest_picks_most_recent_date() {
        let cache = ExchangeRateCache::new();
        cache.insert("USD", "ILS", date(1), dec!(3.40));
        cache.insert("USD", "ILS", date(5), dec!(3.42));
        cache.insert("USD", "ILS", date(3), dec!(3.44));
        cache.insert("USD", "EUR", date(6), dec!(0.91));

        let latest = cache.latest("USD", "ILS").unwrap();
        assert_eq!(latest.date, date(5));
        assert_eq!(latest.rate, dec!(3.42));
        assert_eq!(latest.pair(), "USD/ILS");
    }

    #[test]
    fn test_latest_empty_pair() {
        let cache = ExchangeRateCache::new();
        assert!(cache.latest("USD", "ILS").is_none());
        assert!(cache.is_empty());
    }
}
