use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate};
use log::{debug, warn};
use rust_decimal::Decimal;

use peakwatch_market_data::{MarketDataProvider, Quote};

use crate::errors::{Result, ValidationError};

use super::analysis_model::{
    AnalysisReport, BestStretch, PeakTiming, TimingCounts, WindowSummary,
};

/// Months that open an employee trading window.
pub const WINDOW_MONTHS: [u32; 4] = [2, 5, 8, 11];

/// Labels matching [`WINDOW_MONTHS`].
pub const WINDOW_LABELS: [&str; 4] = ["Q1-Feb", "Q2-May", "Q3-Aug", "Q4-Nov"];

/// Windows with fewer trading days than this are skipped.
const MIN_WINDOW_DAYS: usize = 3;

/// Stretch lengths evaluated for the best selling run.
const STRETCH_LENGTHS: [usize; 3] = [3, 4, 5];

/// Trait for historical window analysis.
#[async_trait]
pub trait AnalysisServiceTrait: Send + Sync {
    /// Analyzes every trading window over the last `years` years, ending at
    /// `today`.
    async fn run(&self, years: u32, today: NaiveDate) -> Result<AnalysisReport>;
}

/// Computes window summaries and timing statistics from daily quotes.
pub struct AnalysisService {
    provider: Arc<dyn MarketDataProvider>,
    ticker: String,
}

impl AnalysisService {
    pub fn new(provider: Arc<dyn MarketDataProvider>, ticker: impl Into<String>) -> Self {
        Self {
            provider,
            ticker: ticker.into(),
        }
    }
}

#[async_trait]
impl AnalysisServiceTrait for AnalysisService {
    async fn run(&self, years: u32, today: NaiveDate) -> Result<AnalysisReport> {
        if years == 0 {
            return Err(
                ValidationError::InvalidInput("years must be at least 1".to_string()).into(),
            );
        }

        let start = today - Duration::days(i64::from(years) * 365);
        debug!(
            "analyzing {} windows from {} to {}",
            self.ticker, start, today
        );
        let quotes = self
            .provider
            .get_daily_quotes(&self.ticker, start, today)
            .await?;

        let mut summaries = Vec::new();
        let mut best_stretches = Vec::new();
        let mut timing_counts = TimingCounts::default();

        for year in (today.year() - years as i32 + 1)..=today.year() {
            for (i, &month) in WINDOW_MONTHS.iter().enumerate() {
                let Some(window) = window_quotes(&quotes, year, month) else {
                    continue;
                };
                if window.len() < MIN_WINDOW_DAYS {
                    warn!(
                        "skipping {}-{}: only {} trading days",
                        year,
                        WINDOW_LABELS[i],
                        window.len()
                    );
                    continue;
                }

                let label = format!("{}-{}", year, WINDOW_LABELS[i]);
                let summary = summarize_window(&label, &window);
                timing_counts.record(summary.max_when);
                summaries.push(summary);

                for length in STRETCH_LENGTHS {
                    if let Some(stretch) = best_stretch(&label, &window, length) {
                        best_stretches.push(stretch);
                    }
                }
            }
        }

        let recommendation = recommendation_for(timing_counts.most_common(), years);

        Ok(AnalysisReport {
            years,
            recommendation,
            timing_counts,
            summaries,
            best_stretches,
        })
    }
}

/// The quotes falling inside one window month, in order. `None` when empty.
pub(super) fn window_quotes(quotes: &[Quote], year: i32, month: u32) -> Option<Vec<Quote>> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end_exclusive = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    let window: Vec<Quote> = quotes
        .iter()
        .filter(|q| {
            let date = q.timestamp.date_naive();
            start <= date && date < end_exclusive
        })
        .cloned()
        .collect();

    if window.is_empty() {
        None
    } else {
        Some(window)
    }
}

pub(super) fn classify_position(position: usize, total: usize) -> PeakTiming {
    if position == 0 {
        PeakTiming::Start
    } else if position + 1 == total {
        PeakTiming::End
    } else {
        PeakTiming::Middle
    }
}

/// Summarizes one window's quotes. The window must be non-empty; ties on
/// max/min keep the earliest day.
pub(super) fn summarize_window(label: &str, window: &[Quote]) -> WindowSummary {
    let first = &window[0];
    let last = &window[window.len() - 1];

    let mut max_pos = 0;
    let mut min_pos = 0;
    for (pos, quote) in window.iter().enumerate() {
        if quote.close > window[max_pos].close {
            max_pos = pos;
        }
        if quote.close < window[min_pos].close {
            min_pos = pos;
        }
    }

    WindowSummary {
        window: label.to_string(),
        first_date: first.timestamp.date_naive(),
        first_close: first.close,
        last_date: last.timestamp.date_naive(),
        last_close: last.close,
        max_date: window[max_pos].timestamp.date_naive(),
        max_close: window[max_pos].close,
        max_when: classify_position(max_pos, window.len()),
        min_date: window[min_pos].timestamp.date_naive(),
        min_close: window[min_pos].close,
    }
}

/// The contiguous `length`-day run with the highest average close. Ties
/// keep the earliest run.
pub(super) fn best_stretch(label: &str, window: &[Quote], length: usize) -> Option<BestStretch> {
    if window.len() < length || length == 0 {
        return None;
    }

    let mut best_start = 0;
    let mut best_avg = Decimal::MIN;
    for start in 0..=(window.len() - length) {
        let sum: Decimal = window[start..start + length].iter().map(|q| q.close).sum();
        let avg = sum / Decimal::from(length as u64);
        if avg > best_avg {
            best_avg = avg;
            best_start = start;
        }
    }

    Some(BestStretch {
        window: label.to_string(),
        length,
        start_date: window[best_start].timestamp.date_naive(),
        avg_close: best_avg,
    })
}

fn recommendation_for(timing: PeakTiming, years: u32) -> String {
    match timing {
        PeakTiming::Start => format!(
            "Based on the last {} years, the highest price during trading windows most often \
             occurs at the START of the window. Consider selling early in the window.",
            years
        ),
        PeakTiming::End => format!(
            "Based on the last {} years, the highest price during trading windows most often \
             occurs at the END of the window. Consider selling late in the window.",
            years
        ),
        PeakTiming::Middle => format!(
            "Based on the last {} years, the highest price during trading windows most often \
             occurs in the MIDDLE of the window. Consider monitoring prices throughout the \
             window and selling when a spike occurs.",
            years
        ),
    }
}
