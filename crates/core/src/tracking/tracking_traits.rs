use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::tracking::tracking_model::{Baseline, WindowBounds, WindowStatus};
use crate::tracking::tracking_store::WindowMap;

/// Trait for window store operations.
///
/// The store holds the full window map; the service keeps an in-memory copy
/// and writes the whole map back after each mutation, so a failed write
/// never corrupts what the service is serving.
pub trait WindowStoreTrait: Send + Sync {
    fn load(&self) -> Result<WindowMap>;
    fn save(&self, windows: &WindowMap) -> Result<()>;
}

/// Trait for tracking service operations.
#[async_trait]
pub trait TrackingServiceTrait: Send + Sync {
    /// The window currently targeted by interactive operations.
    fn active_window(&self) -> WindowBounds;

    /// Targets a different window, validating the key first. Returns the
    /// parsed bounds.
    fn set_active_window(&self, key: &str) -> Result<WindowBounds>;

    /// The active window's tracking record, if any cycle has run for it.
    fn status(&self) -> Option<WindowStatus>;

    /// Recomputes the window's baseline from the price source: the first
    /// intraday observation of the window's first trading day when
    /// available, else that day's opening price. Returns `None` when the
    /// source has no data for the window (the caller degrades to the
    /// current observation). Idempotent for unchanged upstream data.
    async fn recompute_baseline(&self, bounds: &WindowBounds) -> Option<Baseline>;

    /// Runs one tracking cycle against the active window: fetch the latest
    /// price, refresh the baseline, and update the window record. `manual`
    /// marks a user-triggered refresh, which additionally reverts a
    /// simulated peak. Price-source unavailability skips the cycle and is
    /// not an error; a failed store write is, though the in-memory record
    /// keeps the new state.
    async fn track_cycle(&self, manual: bool) -> Result<Option<WindowStatus>>;

    /// Injects a simulated peak `offset` above the reference price.
    /// The offset must be positive and the active window must already be
    /// tracked.
    async fn simulate_peak(&self, offset: Decimal) -> Result<WindowStatus>;

    /// Deletes the active window's record. Returns the removed key, if a
    /// record existed.
    async fn clear_window(&self) -> Result<Option<String>>;
}
