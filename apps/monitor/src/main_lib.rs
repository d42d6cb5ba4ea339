//! Application state and wiring.

use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use peakwatch_core::analysis::{AnalysisService, AnalysisServiceTrait};
use peakwatch_core::fx::{ExchangeRateCache, FxService, FxServiceTrait, MarketDataRateSource};
use peakwatch_core::tracking::{FileWindowStore, TrackingService, TrackingServiceTrait};
use peakwatch_market_data::YahooProvider;

use crate::alerts::AlertEventSink;
use crate::config::Config;

pub struct AppState {
    pub config: Config,
    pub tracking_service: Arc<dyn TrackingServiceTrait>,
    pub fx_service: Arc<dyn FxServiceTrait>,
    pub analysis_service: Arc<dyn AnalysisServiceTrait>,
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

pub fn build_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let provider = Arc::new(YahooProvider::new()?.with_currency(config.quote_currency.clone()));

    let store = Arc::new(FileWindowStore::new(&config.data_file));
    let alert_sink = Arc::new(AlertEventSink::new(config.ticker.clone()));
    let tracking_service = Arc::new(
        TrackingService::new(provider.clone(), store, config.ticker.clone())?
            .with_event_sink(alert_sink),
    );

    let rate_cache = Arc::new(ExchangeRateCache::new());
    let rate_source = Arc::new(MarketDataRateSource::new(provider.clone()));
    let fx_service = Arc::new(FxService::new(rate_source, rate_cache));

    let analysis_service = Arc::new(AnalysisService::new(provider, config.ticker.clone()));

    Ok(Arc::new(AppState {
        config,
        tracking_service,
        fx_service,
        analysis_service,
    }))
}
