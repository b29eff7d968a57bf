use serde::Deserialize;
use time::OffsetDateTime;

/// Request body from the external analysis step. Each score is 0-10;
/// `recorded_at` defaults to now when omitted.
#[derive(Debug, Deserialize)]
pub struct CreateInsightRequest {
    pub self_awareness: i16,
    pub self_management: i16,
    pub social_awareness: i16,
    pub relationship_skills: i16,
    pub responsible_decision: i16,
    pub source_text: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub recorded_at: Option<OffsetDateTime>,
}

impl CreateInsightRequest {
    pub fn scores(&self) -> [i16; super::repo::COMPETENCY_COUNT] {
        [
            self.self_awareness,
            self.self_management,
            self.social_awareness,
            self.relationship_skills,
            self.responsible_decision,
        ]
    }
}

/// Query for listing a child's insights.
#[derive(Debug, Deserialize)]
pub struct InsightQuery {
    /// Lookback in months; omitted means full history.
    pub months: Option<u32>,
}
