use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where inside a window the maximum close landed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PeakTiming {
    Start,
    Middle,
    End,
}

impl std::fmt::Display for PeakTiming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::Middle => write!(f, "Middle"),
            Self::End => write!(f, "End"),
        }
    }
}

/// One historical window's key prices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    /// Window label, e.g. "2024-Q3-Aug".
    pub window: String,
    pub first_date: NaiveDate,
    pub first_close: Decimal,
    pub last_date: NaiveDate,
    pub last_close: Decimal,
    pub max_date: NaiveDate,
    pub max_close: Decimal,
    pub max_when: PeakTiming,
    pub min_date: NaiveDate,
    pub min_close: Decimal,
}

/// The best contiguous run of trading days in a window, judged by average
/// close.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BestStretch {
    pub window: String,
    pub length: usize,
    pub start_date: NaiveDate,
    pub avg_close: Decimal,
}

/// How often the window maximum landed in each part of the window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingCounts {
    pub start: usize,
    pub middle: usize,
    pub end: usize,
}

impl TimingCounts {
    pub fn record(&mut self, timing: PeakTiming) {
        match timing {
            PeakTiming::Start => self.start += 1,
            PeakTiming::Middle => self.middle += 1,
            PeakTiming::End => self.end += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.start + self.middle + self.end
    }

    /// The most common timing; ties resolve Start, then Middle, then End.
    pub fn most_common(&self) -> PeakTiming {
        if self.start >= self.middle && self.start >= self.end {
            PeakTiming::Start
        } else if self.middle >= self.end {
            PeakTiming::Middle
        } else {
            PeakTiming::End
        }
    }
}

/// Full multi-year analysis output.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub years: u32,
    pub recommendation: String,
    pub timing_counts: TimingCounts,
    pub summaries: Vec<WindowSummary>,
    pub best_stretches: Vec<BestStretch>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_counts_most_common() {
        let mut counts = TimingCounts::default();
        counts.record(PeakTiming::End);
        counts.record(PeakTiming::End);
        counts.record(PeakTiming::Middle);
        assert_eq!(counts.most_common(), PeakTiming::End);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_timing_counts_tie_prefers_start() {
        let mut counts = TimingCounts::default();
        counts.record(PeakTiming::Start);
        counts.record(PeakTiming::End);
        assert_eq!(counts.most_common(), PeakTiming::Start);
    }

    #[test]
    fn test_peak_timing_display() {
        assert_eq!(PeakTiming::Middle.to_string(), "Middle");
    }
}
