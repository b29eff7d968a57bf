use serde::{Deserialize, Serialize};

use super::aggregate::OverallStats;
use super::cohort::CohortStats;
use super::trend::ImprovementEntry;

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    /// Lookback in months; one of 3, 6 or 12.
    #[serde(default = "default_months")]
    pub months: u32,
}
fn default_months() -> u32 {
    3
}

/// One point of the trend chart: bucket summary plus the delta against
/// the previous bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub month: String,
    pub count: usize,
    pub completion_rate: u8,
    pub average_score: i32,
    pub improvement: i32,
}

#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub months: u32,
    pub buckets: Vec<TrendPoint>,
}

#[derive(Debug, Serialize)]
pub struct TopImproversResponse {
    pub improvers: Vec<ImprovementEntry>,
}

#[derive(Debug, Serialize)]
pub struct CohortResponse {
    pub cohorts: Vec<CohortStats>,
}

/// `stats` is null when the parent has no children yet.
#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub stats: Option<OverallStats>,
}
