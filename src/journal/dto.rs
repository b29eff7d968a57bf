use serde::{Deserialize, Serialize};
use time::Date;

use super::repo::{JournalEntry, Ratings, Reflections};

/// Request body for the daily journal form. Date defaults to today (UTC)
/// when omitted.
#[derive(Debug, Deserialize)]
pub struct SubmitEntryRequest {
    pub entry_date: Option<Date>,
    #[serde(default)]
    pub ratings: Ratings,
    #[serde(default)]
    pub reflections: Reflections,
}

#[derive(Debug, Serialize)]
pub struct SubmitEntryResponse {
    pub entry: JournalEntry,
    pub xp_awarded: i32,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    30
}

pub const MAX_PAGE_SIZE: i64 = 100;

impl Pagination {
    /// Query-string bounds are advisory: negative values are clamped
    /// before they reach SQL and the page size is capped.
    pub fn clamped(&self) -> (i64, i64) {
        (self.limit.clamp(1, MAX_PAGE_SIZE), self.offset.max(0))
    }
}
