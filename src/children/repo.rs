use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Aggregate root for one child. Owned by exactly one parent; journal
/// entries and insights cascade on delete.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Child {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub display_name: String,
    pub date_of_birth: Date,
    pub grade: Option<String>,
    pub avatar: Option<String>,
    pub learning_styles: Vec<String>,
    pub sel_strengths: Vec<String>,
    pub interests: Vec<String>,
    pub story_preferences: Vec<String>,
    pub sel_challenges: Vec<String>,
    pub relationship_to_parent: Option<String>,
    pub streak_count: i32,
    pub xp_points: i32,
    pub badges: Vec<String>,
    pub daily_check_in_completed: bool,
    pub last_check_in_date: Option<Date>,
    pub creation_status: String,
    pub created_at: OffsetDateTime,
}

const CHILD_COLUMNS: &str = r#"id, parent_id, display_name, date_of_birth, grade, avatar,
       learning_styles, sel_strengths, interests, story_preferences, sel_challenges,
       relationship_to_parent, streak_count, xp_points, badges,
       daily_check_in_completed, last_check_in_date, creation_status, created_at"#;

pub struct NewChild<'a> {
    pub display_name: &'a str,
    pub date_of_birth: Date,
    pub grade: Option<&'a str>,
    pub avatar: Option<&'a str>,
    pub learning_styles: &'a [String],
    pub sel_strengths: &'a [String],
    pub interests: &'a [String],
    pub story_preferences: &'a [String],
    pub sel_challenges: &'a [String],
    pub relationship_to_parent: Option<&'a str>,
}

impl Child {
    pub async fn create(
        db: &PgPool,
        parent_id: Uuid,
        new: NewChild<'_>,
    ) -> anyhow::Result<Child> {
        let sql = format!(
            r#"
            INSERT INTO children
                (parent_id, display_name, date_of_birth, grade, avatar,
                 learning_styles, sel_strengths, interests, story_preferences,
                 sel_challenges, relationship_to_parent)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {CHILD_COLUMNS}
            "#
        );
        let child = sqlx::query_as::<_, Child>(&sql)
            .bind(parent_id)
            .bind(new.display_name)
            .bind(new.date_of_birth)
            .bind(new.grade)
            .bind(new.avatar)
            .bind(new.learning_styles)
            .bind(new.sel_strengths)
            .bind(new.interests)
            .bind(new.story_preferences)
            .bind(new.sel_challenges)
            .bind(new.relationship_to_parent)
            .fetch_one(db)
            .await?;
        Ok(child)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Child>> {
        let sql = format!("SELECT {CHILD_COLUMNS} FROM children WHERE id = $1");
        let child = sqlx::query_as::<_, Child>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(child)
    }

    pub async fn list_by_parent(db: &PgPool, parent_id: Uuid) -> anyhow::Result<Vec<Child>> {
        let sql = format!(
            "SELECT {CHILD_COLUMNS} FROM children WHERE parent_id = $1 ORDER BY created_at ASC"
        );
        let rows = sqlx::query_as::<_, Child>(&sql)
            .bind(parent_id)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        new: NewChild<'_>,
        creation_status: &str,
    ) -> anyhow::Result<Option<Child>> {
        let sql = format!(
            r#"
            UPDATE children
            SET display_name = $2, date_of_birth = $3, grade = $4, avatar = $5,
                learning_styles = $6, sel_strengths = $7, interests = $8,
                story_preferences = $9, sel_challenges = $10,
                relationship_to_parent = $11, creation_status = $12
            WHERE id = $1
            RETURNING {CHILD_COLUMNS}
            "#
        );
        let child = sqlx::query_as::<_, Child>(&sql)
            .bind(id)
            .bind(new.display_name)
            .bind(new.date_of_birth)
            .bind(new.grade)
            .bind(new.avatar)
            .bind(new.learning_styles)
            .bind(new.sel_strengths)
            .bind(new.interests)
            .bind(new.story_preferences)
            .bind(new.sel_challenges)
            .bind(new.relationship_to_parent)
            .bind(creation_status)
            .fetch_optional(db)
            .await?;
        Ok(child)
    }

    /// Cascades to journal entries and insights via foreign keys.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM children WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Locks the row for the duration of a read-modify-write mutation.
    pub async fn lock_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> anyhow::Result<Option<Child>> {
        let sql = format!("SELECT {CHILD_COLUMNS} FROM children WHERE id = $1 FOR UPDATE");
        let child = sqlx::query_as::<_, Child>(&sql)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(child)
    }

    pub async fn apply_check_in(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        streak: i32,
        xp_delta: i32,
        badges: &[String],
        date: Date,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE children
            SET streak_count = $2, xp_points = xp_points + $3, badges = $4,
                daily_check_in_completed = TRUE, last_check_in_date = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(streak)
        .bind(xp_delta)
        .bind(badges)
        .bind(date)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn award_xp(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        xp_delta: i32,
    ) -> anyhow::Result<()> {
        sqlx::query("UPDATE children SET xp_points = xp_points + $2 WHERE id = $1")
            .bind(id)
            .bind(xp_delta)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
