use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// The five tracked SEL competencies.
pub const COMPETENCY_COUNT: usize = 5;

/// Upper bound of each competency scale.
pub const COMPETENCY_MAX: i16 = 10;

/// One assessment event for a child: five 0-10 competency scores produced
/// by an external analysis step. Read-only to the aggregation engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SelInsight {
    pub id: Uuid,
    pub child_id: Uuid,
    pub self_awareness: i16,
    pub self_management: i16,
    pub social_awareness: i16,
    pub relationship_skills: i16,
    pub responsible_decision: i16,
    pub source_text: Option<String>,
    pub recorded_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

impl SelInsight {
    pub fn competencies(&self) -> [i16; COMPETENCY_COUNT] {
        [
            self.self_awareness,
            self.self_management,
            self.social_awareness,
            self.relationship_skills,
            self.responsible_decision,
        ]
    }

    pub fn competency_sum(&self) -> i32 {
        self.competencies().iter().map(|&c| c as i32).sum()
    }

    pub async fn create(
        db: &PgPool,
        child_id: Uuid,
        scores: [i16; COMPETENCY_COUNT],
        source_text: Option<&str>,
        recorded_at: OffsetDateTime,
    ) -> anyhow::Result<SelInsight> {
        let insight = sqlx::query_as::<_, SelInsight>(
            r#"
            INSERT INTO sel_insights
                (child_id, self_awareness, self_management, social_awareness,
                 relationship_skills, responsible_decision, source_text, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, child_id, self_awareness, self_management, social_awareness,
                      relationship_skills, responsible_decision, source_text,
                      recorded_at, created_at
            "#,
        )
        .bind(child_id)
        .bind(scores[0])
        .bind(scores[1])
        .bind(scores[2])
        .bind(scores[3])
        .bind(scores[4])
        .bind(source_text)
        .bind(recorded_at)
        .fetch_one(db)
        .await?;
        Ok(insight)
    }

    pub async fn list_by_child(
        db: &PgPool,
        child_id: Uuid,
        since: OffsetDateTime,
    ) -> anyhow::Result<Vec<SelInsight>> {
        let rows = sqlx::query_as::<_, SelInsight>(
            r#"
            SELECT id, child_id, self_awareness, self_management, social_awareness,
                   relationship_skills, responsible_decision, source_text,
                   recorded_at, created_at
            FROM sel_insights
            WHERE child_id = $1 AND recorded_at >= $2
            ORDER BY recorded_at ASC
            "#,
        )
        .bind(child_id)
        .bind(since)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
