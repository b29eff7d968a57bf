use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// The eight bounded 0-10 self-report ratings. Missing means the child
/// skipped the question; it is stored as NULL and never defaulted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Ratings {
    pub mood: Option<i16>,
    pub sleep: Option<i16>,
    pub water: Option<i16>,
    pub exercise: Option<i16>,
    pub mindfulness: Option<i16>,
    pub kindness: Option<i16>,
    pub positivity: Option<i16>,
    pub confidence: Option<i16>,
}

impl Ratings {
    pub fn iter(&self) -> impl Iterator<Item = Option<i16>> {
        [
            self.mood,
            self.sleep,
            self.water,
            self.exercise,
            self.mindfulness,
            self.kindness,
            self.positivity,
            self.confidence,
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reflections {
    pub gratitude: Option<String>,
    pub highlight: Option<String>,
    pub challenge: Option<String>,
    pub goal: Option<String>,
    pub notes: Option<String>,
}

/// One self-report per child per calendar day, unique on (child, day);
/// a second write for the same day replaces the first.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub id: Uuid,
    pub child_id: Uuid,
    pub entry_date: Date,
    pub mood: Option<i16>,
    pub sleep: Option<i16>,
    pub water: Option<i16>,
    pub exercise: Option<i16>,
    pub mindfulness: Option<i16>,
    pub kindness: Option<i16>,
    pub positivity: Option<i16>,
    pub confidence: Option<i16>,
    pub gratitude: Option<String>,
    pub highlight: Option<String>,
    pub challenge: Option<String>,
    pub goal: Option<String>,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

const ENTRY_COLUMNS: &str = r#"id, child_id, entry_date, mood, sleep, water, exercise,
       mindfulness, kindness, positivity, confidence, gratitude, highlight,
       challenge, goal, notes, created_at"#;

impl JournalEntry {
    pub async fn find_by_day(
        tx: &mut Transaction<'_, Postgres>,
        child_id: Uuid,
        entry_date: Date,
    ) -> anyhow::Result<Option<JournalEntry>> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM journal_entries WHERE child_id = $1 AND entry_date = $2"
        );
        let entry = sqlx::query_as::<_, JournalEntry>(&sql)
            .bind(child_id)
            .bind(entry_date)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(entry)
    }

    pub async fn upsert(
        tx: &mut Transaction<'_, Postgres>,
        child_id: Uuid,
        entry_date: Date,
        ratings: Ratings,
        reflections: &Reflections,
    ) -> anyhow::Result<JournalEntry> {
        let sql = format!(
            r#"
            INSERT INTO journal_entries
                (child_id, entry_date, mood, sleep, water, exercise, mindfulness,
                 kindness, positivity, confidence, gratitude, highlight, challenge,
                 goal, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (child_id, entry_date) DO UPDATE SET
                mood = EXCLUDED.mood, sleep = EXCLUDED.sleep, water = EXCLUDED.water,
                exercise = EXCLUDED.exercise, mindfulness = EXCLUDED.mindfulness,
                kindness = EXCLUDED.kindness, positivity = EXCLUDED.positivity,
                confidence = EXCLUDED.confidence, gratitude = EXCLUDED.gratitude,
                highlight = EXCLUDED.highlight, challenge = EXCLUDED.challenge,
                goal = EXCLUDED.goal, notes = EXCLUDED.notes
            RETURNING {ENTRY_COLUMNS}
            "#
        );
        let entry = sqlx::query_as::<_, JournalEntry>(&sql)
            .bind(child_id)
            .bind(entry_date)
            .bind(ratings.mood)
            .bind(ratings.sleep)
            .bind(ratings.water)
            .bind(ratings.exercise)
            .bind(ratings.mindfulness)
            .bind(ratings.kindness)
            .bind(ratings.positivity)
            .bind(ratings.confidence)
            .bind(reflections.gratitude.as_deref())
            .bind(reflections.highlight.as_deref())
            .bind(reflections.challenge.as_deref())
            .bind(reflections.goal.as_deref())
            .bind(reflections.notes.as_deref())
            .fetch_one(&mut **tx)
            .await?;
        Ok(entry)
    }

    pub async fn list_by_child(
        db: &PgPool,
        child_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<JournalEntry>> {
        let sql = format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM journal_entries
            WHERE child_id = $1
            ORDER BY entry_date DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let rows = sqlx::query_as::<_, JournalEntry>(&sql)
            .bind(child_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }
}
