use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use peakwatch_market_data::{with_backoff, MarketDataError, MarketDataProvider, Quote};

use crate::constants::LATEST_QUOTE_ATTEMPTS;
use crate::errors::{Error, Result, ValidationError};
use crate::events::{MonitorEvent, MonitorEventSink, NoOpEventSink};

use super::tracking_model::{Baseline, TradingWindow, WindowBounds, WindowStatus};
use super::tracking_store::WindowMap;
use super::tracking_traits::{TrackingServiceTrait, WindowStoreTrait};

/// Service owning all trading-window state.
///
/// One instance is the single logical owner of the window map: the
/// background scheduler and foreground user actions (manual refresh,
/// simulate, clear) all go through it, and an internal cycle lock
/// serializes the mutating operations so two cycles never interleave.
///
/// The in-memory map is authoritative for the running process; the store is
/// written back after every mutation. A failed write is reported to the
/// caller while the in-memory state keeps the new values, so the next
/// successful cycle heals the file.
pub struct TrackingService {
    provider: Arc<dyn MarketDataProvider>,
    store: Arc<dyn WindowStoreTrait>,
    event_sink: Arc<dyn MonitorEventSink>,
    ticker: String,
    windows: RwLock<WindowMap>,
    active_override: RwLock<Option<WindowBounds>>,
    cycle_lock: Mutex<()>,
}

impl TrackingService {
    /// Creates the service, loading previously persisted windows.
    ///
    /// A missing store file starts empty; a corrupted or unreadable one is
    /// an error.
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        store: Arc<dyn WindowStoreTrait>,
        ticker: impl Into<String>,
    ) -> Result<Self> {
        let windows = store.load()?;
        Ok(Self {
            provider,
            store,
            event_sink: Arc::new(NoOpEventSink),
            ticker: ticker.into(),
            windows: RwLock::new(windows),
            active_override: RwLock::new(None),
            cycle_lock: Mutex::new(()),
        })
    }

    /// Sets the monitor event sink for this service.
    pub fn with_event_sink(mut self, event_sink: Arc<dyn MonitorEventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    async fn fetch_latest_quote(&self) -> std::result::Result<Quote, MarketDataError> {
        with_backoff(LATEST_QUOTE_ATTEMPTS, || {
            self.provider.get_latest_quote(&self.ticker)
        })
        .await
    }

    fn status_for(&self, key: &str) -> Option<WindowStatus> {
        self.windows
            .read()
            .unwrap()
            .get(key)
            .cloned()
            .map(|record| WindowStatus::new(key, record))
    }

    fn persist(&self) -> Result<()> {
        let windows = self.windows.read().unwrap();
        self.store.save(&windows)
    }
}

#[async_trait]
impl TrackingServiceTrait for TrackingService {
    fn active_window(&self) -> WindowBounds {
        self.active_override
            .read()
            .unwrap()
            .unwrap_or_else(|| WindowBounds::current_month(Utc::now().date_naive()))
    }

    fn set_active_window(&self, key: &str) -> Result<WindowBounds> {
        let bounds = WindowBounds::parse_key(key)?;
        *self.active_override.write().unwrap() = Some(bounds);
        Ok(bounds)
    }

    fn status(&self) -> Option<WindowStatus> {
        self.status_for(&self.active_window().key())
    }

    async fn recompute_baseline(&self, bounds: &WindowBounds) -> Option<Baseline> {
        let days = match self
            .provider
            .get_daily_quotes(&self.ticker, bounds.start(), bounds.end())
            .await
        {
            Ok(days) => days,
            Err(e) => {
                warn!(
                    "no daily data for window {}, baseline degraded: {}",
                    bounds.key(),
                    e
                );
                return None;
            }
        };
        let first_day = days.first()?;
        let trading_day = first_day.timestamp.date_naive();

        // Prefer the first minute bar of the first trading day; fall back to
        // the daily open when intraday data is unavailable (e.g. outside the
        // provider's intraday retention).
        match self
            .provider
            .get_intraday_quotes(&self.ticker, trading_day)
            .await
        {
            Ok(minutes) if !minutes.is_empty() => {
                let first_minute = &minutes[0];
                Some(Baseline::new(
                    first_minute.open_or_close(),
                    first_minute.timestamp,
                ))
            }
            Ok(_) => Some(Baseline::new(
                first_day.open_or_close(),
                first_day.timestamp,
            )),
            Err(e) => {
                debug!(
                    "no intraday data for {}, using daily open: {}",
                    trading_day, e
                );
                Some(Baseline::new(
                    first_day.open_or_close(),
                    first_day.timestamp,
                ))
            }
        }
    }

    async fn track_cycle(&self, manual: bool) -> Result<Option<WindowStatus>> {
        let _cycle = self.cycle_lock.lock().await;

        let now = Utc::now();
        let bounds = self.active_window();
        let key = bounds.key();

        let quote = match self.fetch_latest_quote().await {
            Ok(quote) => quote,
            Err(e) => {
                warn!("could not fetch {} price, skipping cycle: {}", self.ticker, e);
                return Ok(self.status_for(&key));
            }
        };
        let observed_price = quote.close;
        let observed_date = quote.timestamp.date_naive();

        let baseline = self
            .recompute_baseline(&bounds)
            .await
            .unwrap_or_else(|| Baseline::new(observed_price, now));

        let effects = {
            let mut windows = self.windows.write().unwrap();
            match windows.get_mut(&key) {
                Some(record) => Some(record.tick(baseline, observed_price, observed_date, manual)),
                None => {
                    info!(
                        "initialized baseline for {}: {} on {}",
                        key, baseline.price, baseline.timestamp
                    );
                    windows.insert(
                        key.clone(),
                        TradingWindow::initialize(baseline, observed_price),
                    );
                    None
                }
            }
        };

        if let Some(effects) = effects {
            if effects.reverted_simulated {
                info!("simulated peak cleared for {}, restored last real peak", key);
            }
            match effects.new_peak {
                Some((price, date)) => {
                    info!("new peak for {}: {} on {}", key, price, date);
                    self.event_sink
                        .emit(MonitorEvent::peak_detected(price, date, false));
                }
                None => debug!("checked {}: current price {}", key, observed_price),
            }
        }

        self.persist()?;
        Ok(self.status_for(&key))
    }

    async fn simulate_peak(&self, offset: Decimal) -> Result<WindowStatus> {
        let _cycle = self.cycle_lock.lock().await;

        if offset <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveOffset(offset.to_string()).into());
        }

        let key = self.active_window().key();
        let today = Utc::now().date_naive();

        let simulated = {
            let mut windows = self.windows.write().unwrap();
            let record = windows
                .get_mut(&key)
                .ok_or_else(|| Error::WindowNotTracked(key.clone()))?;
            record.simulate_peak(offset, today)
        };

        info!("simulated peak for {}: {}", key, simulated);
        self.event_sink
            .emit(MonitorEvent::peak_detected(simulated, today, true));
        self.persist()?;

        self.status_for(&key)
            .ok_or_else(|| Error::WindowNotTracked(key))
    }

    async fn clear_window(&self) -> Result<Option<String>> {
        let _cycle = self.cycle_lock.lock().await;

        let key = self.active_window().key();
        let removed = self.windows.write().unwrap().remove(&key).is_some();
        if !removed {
            return Ok(None);
        }

        info!("cleared tracking window {}", key);
        self.event_sink.emit(MonitorEvent::window_cleared(key.clone()));
        self.persist()?;
        Ok(Some(key))
    }
}
