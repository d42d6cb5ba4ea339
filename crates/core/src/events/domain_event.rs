//! Monitor event types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Events emitted by the tracker after successful mutations.
///
/// These represent facts about tracking-state changes. Runtime adapters
/// translate them into platform-specific actions (alert logging, desktop
/// notification, dashboard refresh).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MonitorEvent {
    /// A new peak price was recorded for the active window.
    PeakDetected {
        price: Decimal,
        date: NaiveDate,
        /// True when the peak was injected by `simulate_peak` rather than
        /// observed from the market.
        simulated: bool,
    },

    /// A window's tracking record was explicitly cleared.
    WindowCleared { key: String },
}

impl MonitorEvent {
    /// Creates a PeakDetected event.
    pub fn peak_detected(price: Decimal, date: NaiveDate, simulated: bool) -> Self {
        Self::PeakDetected {
            price,
            date,
            simulated,
        }
    }

    /// Creates a WindowCleared event.
    pub fn window_cleared(key: impl Into<String>) -> Self {
        Self::WindowCleared { key: key.into() }
    }
}
