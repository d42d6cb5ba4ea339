//! Tracking module - the trading-window peak/baseline state machine,
//! its flat-file store, and the service orchestrating polling cycles.

mod tracking_model;
mod tracking_service;
mod tracking_store;
mod tracking_traits;


#[cfg(test)]
mod tracking_service_tests;

pub use tracking_model::{Baseline, TickEffects, TradingWindow, WindowBounds, WindowStatus};
pub use tracking_service::TrackingService;
pub use tracking_store::{FileWindowStore, WindowMap};
pub use tracking_traits::{TrackingServiceTrait, WindowStoreTrait};
