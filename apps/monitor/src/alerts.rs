//! Alert delivery for monitor events.
//!
//! Renders peak events as structured log alerts. Sound and email delivery
//! hooks would plug in here; logging is the only channel wired up.

use peakwatch_core::events::{MonitorEvent, MonitorEventSink};
use tracing::info;

fn simulation_note() -> &'static str {
    "\n\nNote: This is a simulation, not a real alert."
}

/// Event sink that turns peak detections into log alerts.
pub struct AlertEventSink {
    ticker: String,
}

impl AlertEventSink {
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
        }
    }
}

impl MonitorEventSink for AlertEventSink {
    fn emit(&self, event: MonitorEvent) {
        match event {
            MonitorEvent::PeakDetected {
                price,
                date,
                simulated,
            } => {
                let mut message = format!(
                    "{} stock hit a new window peak: ${:.2} on {}",
                    self.ticker, price, date
                );
                if simulated {
                    message.push_str(simulation_note());
                }
                info!(target: "peakwatch::alerts", "[ALERT] {}", message);
            }
            MonitorEvent::WindowCleared { key } => {
                info!(target: "peakwatch::alerts", "tracking window {} cleared", key);
            }
        }
    }
}
