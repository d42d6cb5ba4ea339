//! Trading-window domain models and the peak/baseline state machine.
//!
//! A [`TradingWindow`] tracks one date range (by default a calendar month)
//! as a single unit: the window's first trading price (baseline), the
//! highest qualifying price seen so far (peak), and the most recent
//! observation (current). Peaks come in two flavors: real peaks promoted
//! from market observations, and simulated peaks injected for demos, which
//! are flagged so a later manual refresh can revert them.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Separator used in window keys for non-monthly date ranges.
const KEY_RANGE_SEPARATOR: &str = "_to_";

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).and_then(|d| d.pred_opt())
}

/// Inclusive date bounds of a trading window.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WindowBounds {
    start: NaiveDate,
    end: NaiveDate,
}

impl WindowBounds {
    /// Bounds covering the calendar month that contains `today`.
    pub fn current_month(today: NaiveDate) -> Self {
        let start = today.with_day(1).unwrap_or(today);
        let end = last_day_of_month(today.year(), today.month()).unwrap_or(today);
        Self { start, end }
    }

    /// Bounds for an arbitrary inclusive date range.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvalidWindowKey(format!(
                "{}{}{}",
                start, KEY_RANGE_SEPARATOR, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Store key for this window: `"YYYY-MM"` when the bounds are exactly
    /// one calendar month, otherwise `"<start>_to_<end>"`.
    pub fn key(&self) -> String {
        let monthly = self.start.day() == 1
            && self.start.year() == self.end.year()
            && self.start.month() == self.end.month()
            && Some(self.end) == last_day_of_month(self.start.year(), self.start.month());
        if monthly {
            self.start.format("%Y-%m").to_string()
        } else {
            format!("{}{}{}", self.start, KEY_RANGE_SEPARATOR, self.end)
        }
    }

    /// Parses a window key, rejecting malformed input before any state is
    /// touched.
    pub fn parse_key(key: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidWindowKey(key.to_string());

        if let Some((start, end)) = key.split_once(KEY_RANGE_SEPARATOR) {
            let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").map_err(|_| invalid())?;
            let end = NaiveDate::parse_from_str(end, "%Y-%m-%d").map_err(|_| invalid())?;
            Self::new(start, end).map_err(|_| invalid())
        } else {
            let (year, month) = key.split_once('-').ok_or_else(invalid)?;
            let year: i32 = year.parse().map_err(|_| invalid())?;
            let month: u32 = month.parse().map_err(|_| invalid())?;
            let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
            let end = last_day_of_month(year, month).ok_or_else(invalid)?;
            Ok(Self { start, end })
        }
    }
}

/// The window's first available trading price and when it traded.
///
/// Recomputed on every cycle rather than cached: the upstream data for
/// "first price in window" is immutable once the trading day has closed, so
/// repeated recomputation is idempotent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Baseline {
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Baseline {
    pub fn new(price: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self { price, timestamp }
    }
}

/// What a tracking cycle did to the window, beyond refreshing baseline and
/// current price.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickEffects {
    /// A simulated peak was reverted to the last real peak (or cleared).
    pub reverted_simulated: bool,
    /// A new real peak was promoted.
    pub new_peak: Option<(Decimal, NaiveDate)>,
}

/// Per-window tracking record.
///
/// Serialized field names are the store's JSON shape; optional fields
/// default when absent so records written by older versions still load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradingWindow {
    pub baseline_price: Decimal,
    pub baseline_date: DateTime<Utc>,

    #[serde(default)]
    pub peak_price: Option<Decimal>,
    #[serde(default)]
    pub peak_date: Option<NaiveDate>,

    pub current_price: Decimal,

    #[serde(default)]
    pub peak_simulated: bool,

    #[serde(default)]
    pub last_real_peak_price: Option<Decimal>,
    #[serde(default)]
    pub last_real_peak_date: Option<NaiveDate>,
}

impl TradingWindow {
    /// First-cycle record: baseline and current price only, peak unset.
    ///
    /// A window must observe at least two cycles before a peak can be
    /// declared, so initialization performs no peak checks.
    pub fn initialize(baseline: Baseline, current_price: Decimal) -> Self {
        Self {
            baseline_price: baseline.price,
            baseline_date: baseline.timestamp,
            peak_price: None,
            peak_date: None,
            current_price,
            peak_simulated: false,
            last_real_peak_price: None,
            last_real_peak_date: None,
        }
    }

    /// Applies one price observation to an already-tracked window.
    ///
    /// In order:
    /// 1. the baseline is overwritten with the freshly recomputed value
    ///    (guards against the window's start date shifting or initial data
    ///    lag);
    /// 2. on a manual cycle, a simulated peak is reverted to the last real
    ///    peak, or cleared when none exists;
    /// 3. the observation is promoted to a new real peak when it strictly
    ///    exceeds both the prior real peak (or baseline) and the baseline;
    ///    equal values never promote;
    /// 4. the current price is updated unconditionally.
    pub fn tick(
        &mut self,
        baseline: Baseline,
        observed_price: Decimal,
        observed_date: NaiveDate,
        manual: bool,
    ) -> TickEffects {
        let mut effects = TickEffects::default();

        self.baseline_price = baseline.price;
        self.baseline_date = baseline.timestamp;

        if manual && self.peak_simulated {
            self.peak_price = self.last_real_peak_price;
            self.peak_date = self.last_real_peak_date;
            self.peak_simulated = false;
            effects.reverted_simulated = true;
        }

        // Promotion threshold: the higher of the last real peak and the
        // baseline. The last real peak, when present, is never below it.
        let reference = self.last_real_peak_price.unwrap_or(self.baseline_price);
        if observed_price > reference.max(self.baseline_price) {
            self.peak_price = Some(observed_price);
            self.peak_date = Some(observed_date);
            self.last_real_peak_price = Some(observed_price);
            self.last_real_peak_date = Some(observed_date);
            effects.new_peak = Some((observed_price, observed_date));
        }

        self.current_price = observed_price;

        effects
    }

    /// Injects a simulated peak at `reference + offset` and returns the
    /// simulated price.
    ///
    /// The reference is the first available of: last real peak, current
    /// unsimulated peak, baseline. `last_real_peak_*` is left untouched so
    /// the simulation can be reverted.
    pub fn simulate_peak(&mut self, offset: Decimal, today: NaiveDate) -> Decimal {
        let unsimulated_peak = if self.peak_simulated {
            None
        } else {
            self.peak_price
        };
        let reference = self
            .last_real_peak_price
            .or(unsimulated_peak)
            .unwrap_or(self.baseline_price);

        let simulated = reference + offset;
        self.peak_price = Some(simulated);
        self.peak_date = Some(today);
        self.current_price = simulated;
        self.peak_simulated = true;
        simulated
    }
}

/// A window's tracking record together with its store key, as returned to
/// callers and rendered by the CLI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowStatus {
    pub key: String,
    #[serde(flatten)]
    pub record: TradingWindow,
}

impl WindowStatus {
    pub fn new(key: impl Into<String>, record: TradingWindow) -> Self {
        Self {
            key: key.into(),
            record,
        }
    }
}
