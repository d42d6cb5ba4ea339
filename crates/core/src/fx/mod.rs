//! FX (Foreign Exchange) module - display-currency conversion.
//!
//! The tracker quotes in one currency (usually USD) and can render the
//! current price in another. Rates come from an opaque source behind
//! [`RateSourceTrait`], fronted by an explicit per-date cache owned by the
//! composition root.

mod fx_errors;
mod fx_model;
mod fx_service;
mod fx_traits;
mod rate_source;

pub use fx_errors::FxError;
pub use fx_model::{ExchangeRate, ExchangeRateCache};
pub use fx_service::FxService;
pub use fx_traits::{FxServiceTrait, RateSourceTrait};
pub use rate_source::MarketDataRateSource;
