use axum::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::children::repo::Child;
use crate::insights::repo::SelInsight;

/// Failure modes of the record store. `Unavailable` (transport/query failure)
/// is deliberately distinct from an `Ok` empty result, which is the valid
/// "no data yet" state; callers must never conflate the two.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store unavailable")]
    Unavailable(#[source] sqlx::Error),
    #[error("record not found")]
    NotFound,
}

impl StoreError {
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Unavailable(other),
        }
    }
}

/// Read seam the progress aggregation engine fetches through. The engine
/// treats the store as a black box; tests swap in an in-memory fake.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All children owned by a parent, oldest first.
    async fn children_of(&self, parent_id: Uuid) -> Result<Vec<Child>, StoreError>;

    /// Insights for the given children recorded at or after `since`,
    /// ascending by time. An empty id set yields an empty list.
    async fn insights_since(
        &self,
        child_ids: &[Uuid],
        since: OffsetDateTime,
    ) -> Result<Vec<SelInsight>, StoreError>;
}

#[derive(Clone)]
pub struct PgRecordStore {
    db: PgPool,
}

impl PgRecordStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn children_of(&self, parent_id: Uuid) -> Result<Vec<Child>, StoreError> {
        let rows = sqlx::query_as::<_, Child>(
            r#"
            SELECT id, parent_id, display_name, date_of_birth, grade, avatar,
                   learning_styles, sel_strengths, interests, story_preferences,
                   sel_challenges, relationship_to_parent, streak_count, xp_points,
                   badges, daily_check_in_completed, last_check_in_date,
                   creation_status, created_at
            FROM children
            WHERE parent_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(parent_id)
        .fetch_all(&self.db)
        .await
        .map_err(StoreError::from_sqlx)?;
        Ok(rows)
    }

    async fn insights_since(
        &self,
        child_ids: &[Uuid],
        since: OffsetDateTime,
    ) -> Result<Vec<SelInsight>, StoreError> {
        if child_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, SelInsight>(
            r#"
            SELECT id, child_id, self_awareness, self_management, social_awareness,
                   relationship_skills, responsible_decision, source_text,
                   recorded_at, created_at
            FROM sel_insights
            WHERE child_id = ANY($1) AND recorded_at >= $2
            ORDER BY recorded_at ASC
            "#,
        )
        .bind(child_ids)
        .bind(since)
        .fetch_all(&self.db)
        .await
        .map_err(StoreError::from_sqlx)?;
        Ok(rows)
    }
}
