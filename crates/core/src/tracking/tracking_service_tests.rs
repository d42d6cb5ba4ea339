#[cfg(test)]
mod tests {
    use crate::errors::{Error, StoreError, ValidationError};
    use crate::events::{MockEventSink, MonitorEvent};
    use crate::tracking::{
        TrackingService, TrackingServiceTrait, WindowMap, WindowStoreTrait,
    };
    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDate, Utc};
    use peakwatch_market_data::{MarketDataError, MarketDataProvider, Quote};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    const TICKER: &str = "NOW";

    fn quote(close: Decimal, timestamp: DateTime<Utc>) -> Quote {
        Quote::new(timestamp, close, "USD".to_string(), "MOCK".to_string())
    }

    fn ohlc(open: Decimal, close: Decimal, timestamp: DateTime<Utc>) -> Quote {
        Quote::ohlc(
            timestamp,
            open,
            close.max(open),
            close.min(open),
            close,
            "USD".to_string(),
            "MOCK".to_string(),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    // --- Mock MarketDataProvider ---

    #[derive(Default)]
    struct MockProvider {
        /// Scripted latest quotes, consumed front to back. Empty = source down.
        latest: Mutex<VecDeque<Quote>>,
        /// Daily bars returned for any range query. Empty = no data.
        daily: Mutex<Vec<Quote>>,
        /// Minute bars returned for any day query. Empty = no data.
        intraday: Mutex<Vec<Quote>>,
    }

    impl MockProvider {
        fn new() -> Self {
            Self::default()
        }

        fn push_latest(&self, q: Quote) {
            self.latest.lock().unwrap().push_back(q);
        }

        fn set_daily(&self, quotes: Vec<Quote>) {
            *self.daily.lock().unwrap() = quotes;
        }

        fn set_intraday(&self, quotes: Vec<Quote>) {
            *self.intraday.lock().unwrap() = quotes;
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockProvider {
        fn id(&self) -> &'static str {
            "MOCK"
        }

        async fn get_latest_quote(&self, _symbol: &str) -> Result<Quote, MarketDataError> {
            self.latest
                .lock()
                .unwrap()
                .pop_front()
                .ok_or(MarketDataError::NoDataForRange)
        }

        async fn get_daily_quotes(
            &self,
            _symbol: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<Quote>, MarketDataError> {
            let daily = self.daily.lock().unwrap().clone();
            if daily.is_empty() {
                Err(MarketDataError::NoDataForRange)
            } else {
                Ok(daily)
            }
        }

        async fn get_intraday_quotes(
            &self,
            _symbol: &str,
            _day: NaiveDate,
        ) -> Result<Vec<Quote>, MarketDataError> {
            let intraday = self.intraday.lock().unwrap().clone();
            if intraday.is_empty() {
                Err(MarketDataError::NoDataForRange)
            } else {
                Ok(intraday)
            }
        }
    }

    // --- Mock WindowStore ---

    #[derive(Default)]
    struct MockStore {
        saved: Mutex<Option<WindowMap>>,
        fail_save: AtomicBool,
    }

    impl MockStore {
        fn new() -> Self {
            Self::default()
        }

        fn fail_next_saves(&self) {
            self.fail_save.store(true, Ordering::SeqCst);
        }

        fn saved(&self) -> Option<WindowMap> {
            self.saved.lock().unwrap().clone()
        }
    }

    impl WindowStoreTrait for MockStore {
        fn load(&self) -> crate::errors::Result<WindowMap> {
            Ok(self.saved.lock().unwrap().clone().unwrap_or_default())
        }

        fn save(&self, windows: &WindowMap) -> crate::errors::Result<()> {
            if self.fail_save.load(Ordering::SeqCst) {
                return Err(StoreError::WriteFailed("disk full".to_string()).into());
            }
            *self.saved.lock().unwrap() = Some(windows.clone());
            Ok(())
        }
    }

    struct Harness {
        provider: Arc<MockProvider>,
        store: Arc<MockStore>,
        sink: Arc<MockEventSink>,
        service: TrackingService,
    }

    fn harness() -> Harness {
        let provider = Arc::new(MockProvider::new());
        let store = Arc::new(MockStore::new());
        let sink = Arc::new(MockEventSink::new());
        let service = TrackingService::new(provider.clone(), store.clone(), TICKER)
            .unwrap()
            .with_event_sink(sink.clone());
        Harness {
            provider,
            store,
            sink,
            service,
        }
    }

    fn peak_events(sink: &MockEventSink) -> Vec<(Decimal, bool)> {
        sink.events()
            .into_iter()
            .filter_map(|e| match e {
                MonitorEvent::PeakDetected {
                    price, simulated, ..
                } => Some((price, simulated)),
                _ => None,
            })
            .collect()
    }

    // ==================== Cycle Tests ====================

    #[tokio::test]
    async fn test_first_cycle_initializes_without_peak_checks() {
        let h = harness();
        h.provider.set_daily(vec![ohlc(dec!(98), dec!(99), now())]);
        h.provider.push_latest(quote(dec!(250), now()));

        let status = h.service.track_cycle(false).await.unwrap().unwrap();
        // Baseline comes from the first daily bar's open (no intraday data).
        assert_eq!(status.record.baseline_price, dec!(98));
        assert_eq!(status.record.current_price, dec!(250));
        // Even a price far above baseline sets no peak on the first cycle.
        assert!(status.record.peak_price.is_none());
        assert!(h.sink.is_empty());
        assert!(h.store.saved().unwrap().contains_key(&status.key));
    }

    #[tokio::test]
    async fn test_intraday_bar_refines_baseline() {
        let h = harness();
        let minute = ohlc(dec!(97.5), dec!(97.8), now());
        h.provider.set_daily(vec![ohlc(dec!(98), dec!(99), now())]);
        h.provider.set_intraday(vec![minute.clone()]);
        h.provider.push_latest(quote(dec!(100), now()));

        let status = h.service.track_cycle(false).await.unwrap().unwrap();
        assert_eq!(status.record.baseline_price, dec!(97.5));
        assert_eq!(status.record.baseline_date, minute.timestamp);
    }

    #[tokio::test]
    async fn test_baseline_degrades_to_observed_price() {
        let h = harness();
        // No daily data at all: baseline falls back to the observation.
        h.provider.push_latest(quote(dec!(103), now()));

        let status = h.service.track_cycle(false).await.unwrap().unwrap();
        assert_eq!(status.record.baseline_price, dec!(103));
        assert_eq!(status.record.current_price, dec!(103));
    }

    #[tokio::test]
    async fn test_second_cycle_promotes_real_peak() {
        let h = harness();
        h.provider.set_daily(vec![ohlc(dec!(100), dec!(100), now())]);
        h.provider.push_latest(quote(dec!(100), now()));
        h.provider.push_latest(quote(dec!(120), now()));

        h.service.track_cycle(false).await.unwrap();
        let status = h.service.track_cycle(false).await.unwrap().unwrap();

        assert_eq!(status.record.peak_price, Some(dec!(120)));
        assert_eq!(status.record.last_real_peak_price, Some(dec!(120)));
        assert_eq!(peak_events(&h.sink), vec![(dec!(120), false)]);
    }

    #[tokio::test]
    async fn test_flat_price_promotes_nothing() {
        let h = harness();
        h.provider.set_daily(vec![ohlc(dec!(100), dec!(100), now())]);
        h.provider.push_latest(quote(dec!(100), now()));
        h.provider.push_latest(quote(dec!(100), now()));

        h.service.track_cycle(false).await.unwrap();
        let status = h.service.track_cycle(false).await.unwrap().unwrap();

        assert!(status.record.peak_price.is_none());
        assert!(h.sink.is_empty());
    }

    #[tokio::test]
    async fn test_source_outage_skips_cycle_and_keeps_state() {
        let h = harness();
        h.provider.set_daily(vec![ohlc(dec!(100), dec!(100), now())]);
        h.provider.push_latest(quote(dec!(105), now()));
        h.service.track_cycle(false).await.unwrap();

        // Latest queue is now empty: the source is down.
        let status = h.service.track_cycle(false).await.unwrap().unwrap();
        assert_eq!(status.record.current_price, dec!(105));
        assert!(h.sink.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_reported_but_memory_state_survives() {
        let h = harness();
        h.provider.set_daily(vec![ohlc(dec!(100), dec!(100), now())]);
        h.provider.push_latest(quote(dec!(100), now()));
        h.store.fail_next_saves();

        let result = h.service.track_cycle(false).await;
        assert!(matches!(result, Err(Error::Store(_))));

        // The cycle's effect is still visible to readers.
        let status = h.service.status().unwrap();
        assert_eq!(status.record.current_price, dec!(100));
    }

    // ==================== Simulated Peak Tests ====================

    #[tokio::test]
    async fn test_simulate_peak_emits_simulated_event() {
        let h = harness();
        h.provider.set_daily(vec![ohlc(dec!(100), dec!(100), now())]);
        h.provider.push_latest(quote(dec!(100), now()));
        h.provider.push_latest(quote(dec!(120), now()));
        h.service.track_cycle(false).await.unwrap();
        h.service.track_cycle(false).await.unwrap();

        let status = h.service.simulate_peak(dec!(50)).await.unwrap();
        assert_eq!(status.record.peak_price, Some(dec!(170)));
        assert_eq!(status.record.current_price, dec!(170));
        assert!(status.record.peak_simulated);
        assert_eq!(
            peak_events(&h.sink),
            vec![(dec!(120), false), (dec!(170), true)]
        );
    }

    #[tokio::test]
    async fn test_manual_refresh_reverts_simulated_peak() {
        let h = harness();
        h.provider.set_daily(vec![ohlc(dec!(100), dec!(100), now())]);
        h.provider.push_latest(quote(dec!(100), now()));
        h.provider.push_latest(quote(dec!(120), now()));
        h.service.track_cycle(false).await.unwrap();
        h.service.track_cycle(false).await.unwrap();
        h.service.simulate_peak(dec!(50)).await.unwrap();

        h.provider.push_latest(quote(dec!(110), now()));
        let status = h.service.track_cycle(true).await.unwrap().unwrap();

        assert_eq!(status.record.peak_price, Some(dec!(120)));
        assert!(!status.record.peak_simulated);
        assert_eq!(status.record.current_price, dec!(110));
        // No additional peak event from the reverting refresh.
        assert_eq!(peak_events(&h.sink).len(), 2);
    }

    #[tokio::test]
    async fn test_scheduled_cycle_leaves_simulated_peak_alone() {
        let h = harness();
        h.provider.set_daily(vec![ohlc(dec!(100), dec!(100), now())]);
        h.provider.push_latest(quote(dec!(100), now()));
        h.service.track_cycle(false).await.unwrap();
        h.service.simulate_peak(dec!(50)).await.unwrap();

        h.provider.push_latest(quote(dec!(99), now()));
        let status = h.service.track_cycle(false).await.unwrap().unwrap();
        assert!(status.record.peak_simulated);
        assert_eq!(status.record.peak_price, Some(dec!(150)));
    }

    #[tokio::test]
    async fn test_simulate_rejects_non_positive_offset() {
        let h = harness();
        for offset in [dec!(0), dec!(-10)] {
            match h.service.simulate_peak(offset).await {
                Err(Error::Validation(ValidationError::NonPositiveOffset(_))) => {}
                other => panic!("expected NonPositiveOffset, got {:?}", other.map(|_| ())),
            }
        }
    }

    #[tokio::test]
    async fn test_simulate_requires_tracked_window() {
        let h = harness();
        match h.service.simulate_peak(dec!(50)).await {
            Err(Error::WindowNotTracked(_)) => {}
            other => panic!("expected WindowNotTracked, got {:?}", other.map(|_| ())),
        }
    }

    // ==================== Clear / Window Selection Tests ====================

    #[tokio::test]
    async fn test_clear_window_removes_record_and_emits() {
        let h = harness();
        h.provider.set_daily(vec![ohlc(dec!(100), dec!(100), now())]);
        h.provider.push_latest(quote(dec!(100), now()));
        h.service.track_cycle(false).await.unwrap();

        let cleared = h.service.clear_window().await.unwrap();
        assert!(cleared.is_some());
        assert!(h.service.status().is_none());
        assert!(h
            .sink
            .events()
            .iter()
            .any(|e| matches!(e, MonitorEvent::WindowCleared { .. })));

        // Clearing again is a no-op.
        assert!(h.service.clear_window().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_active_window_rejects_malformed_key() {
        let h = harness();
        let before = h.service.active_window();
        match h.service.set_active_window("not-a-window") {
            Err(Error::Validation(ValidationError::InvalidWindowKey(_))) => {}
            other => panic!("expected InvalidWindowKey, got {:?}", other.map(|_| ())),
        }
        assert_eq!(h.service.active_window(), before);
    }

    #[tokio::test]
    async fn test_custom_window_records_under_its_own_key() {
        let h = harness();
        h.service
            .set_active_window("2025-08-05_to_2025-09-10")
            .unwrap();
        h.provider.set_daily(vec![ohlc(dec!(100), dec!(100), now())]);
        h.provider.push_latest(quote(dec!(100), now()));

        let status = h.service.track_cycle(false).await.unwrap().unwrap();
        assert_eq!(status.key, "2025-08-05_to_2025-09-10");
        assert!(h
            .store
            .saved()
            .unwrap()
            .contains_key("2025-08-05_to_2025-09-10"));
    }

    #[tokio::test]
    async fn test_historical_windows_persist_alongside_active() {
        let h = harness();
        h.provider.set_daily(vec![ohlc(dec!(100), dec!(100), now())]);
        h.provider.push_latest(quote(dec!(100), now()));
        h.service.track_cycle(false).await.unwrap();

        h.service.set_active_window("2025-01").unwrap();
        h.provider.push_latest(quote(dec!(90), now()));
        h.service.track_cycle(false).await.unwrap();

        let saved = h.store.saved().unwrap();
        assert_eq!(saved.len(), 2);
    }
}
