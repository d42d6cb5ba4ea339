use thiserror::Error;

/// Errors raised by exchange-rate lookups.
#[derive(Error, Debug)]
pub enum FxError {
    /// No rate is available, from the source or the cache.
    #[error("Exchange rate not found for {0}")]
    RateNotFound(String),

    /// The rate source failed in a way that is not a plain miss.
    #[error("Rate source error: {0}")]
    Source(String),
}
