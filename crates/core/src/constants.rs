//! Application-wide constants.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Ticker tracked when none is configured.
pub const DEFAULT_TICKER: &str = "NOW";

/// Default flat-file window store location, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "peakwatch_windows.json";

/// Default background polling interval.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 600;

/// Default currency quotes are denominated in.
pub const DEFAULT_QUOTE_CURRENCY: &str = "USD";

/// Amount added to the reference price when a peak is simulated.
pub const DEFAULT_SIMULATED_PEAK_OFFSET: Decimal = dec!(100);

/// Attempts made for the latest-price fetch before a cycle degrades.
pub const LATEST_QUOTE_ATTEMPTS: u32 = 3;
