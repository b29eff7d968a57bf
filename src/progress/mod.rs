use crate::state::AppState;
use axum::Router;

pub mod aggregate;
pub mod cohort;
mod dto;
pub mod handlers;
pub mod services;
pub mod trend;
pub mod window;

/// Expected journal/insight cadence per child per month, used for
/// completion percentages. A business rule, not a derived value;
/// overridable through `PROGRESS_ENTRIES_PER_MONTH`.
pub const DEFAULT_ENTRIES_PER_CHILD_PER_MONTH: u32 = 4;

/// Lookback windows are converted to a fetch lower bound as
/// `months * 30 days`. Deliberately not calendar-accurate; the windowing
/// stage re-filters by true calendar months.
pub const APPROX_DAYS_PER_MONTH: i64 = 30;

pub fn router() -> Router<AppState> {
    handlers::progress_routes()
}
