//! Historical window analysis module.
//!
//! Summarizes how the tracked equity behaved inside past employee trading
//! windows (Feb/May/Aug/Nov): where in each window the maximum landed, and
//! which short stretch of days would have been the best time to sell.

mod analysis_model;
mod analysis_service;


pub use analysis_model::{
    AnalysisReport, BestStretch, PeakTiming, TimingCounts, WindowSummary,
};
pub use analysis_service::{AnalysisService, AnalysisServiceTrait, WINDOW_LABELS, WINDOW_MONTHS};
