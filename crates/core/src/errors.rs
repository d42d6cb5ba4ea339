//! Core error types for the peakwatch application.
//!
//! This module defines storage-agnostic error types. The file store converts
//! its I/O and serialization failures into [`StoreError`] so callers can
//! distinguish "the store is unwritable" (degraded, in-memory state is still
//! valid) from everything else.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

use crate::fx::FxError;
use peakwatch_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the tracker.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Window store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Fx error: {0}")]
    Fx(#[from] FxError),

    #[error("No tracked window for key '{0}'")]
    WindowNotTracked(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors raised by the window store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store file could not be read.
    #[error("Failed to read window store: {0}")]
    ReadFailed(String),

    /// The store file could not be written.
    #[error("Failed to write window store: {0}")]
    WriteFailed(String),

    /// The store file exists but does not deserialize.
    #[error("Window store is corrupted: {0}")]
    Corrupted(String),
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid window key: {0}")]
    InvalidWindowKey(String),

    #[error("Simulation offset must be positive, got {0}")]
    NonPositiveOffset(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
