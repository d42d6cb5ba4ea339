use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::Result;

/// Trait for an opaque exchange-rate source.
#[async_trait]
pub trait RateSourceTrait: Send + Sync {
    /// The `from` → `to` rate on `date`. Falls back to the latest available
    /// rate when the exact date has no data (weekends, holidays).
    async fn get_rate(&self, from: &str, to: &str, date: NaiveDate) -> Result<Decimal>;
}

/// Trait for fx service operations.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    async fn get_rate(&self, from: &str, to: &str, date: NaiveDate) -> Result<Decimal>;
    async fn convert(&self, amount: Decimal, from: &str, to: &str, date: NaiveDate)
        -> Result<Decimal>;
}
