use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Parent {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub relationship: Option<String>,
    pub emergency_contact: Option<String>,
    pub created_at: OffsetDateTime,
}

impl Parent {
    pub async fn create(
        db: &PgPool,
        id: Uuid,
        name: &str,
        email: &str,
        relationship: Option<&str>,
        emergency_contact: Option<&str>,
    ) -> anyhow::Result<Parent> {
        let parent = sqlx::query_as::<_, Parent>(
            r#"
            INSERT INTO parents (id, name, email, relationship, emergency_contact)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, relationship, emergency_contact, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(relationship)
        .bind(emergency_contact)
        .fetch_one(db)
        .await?;
        Ok(parent)
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Parent>> {
        let parent = sqlx::query_as::<_, Parent>(
            r#"
            SELECT id, name, email, relationship, emergency_contact, created_at
            FROM parents
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(parent)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Parent>> {
        let parent = sqlx::query_as::<_, Parent>(
            r#"
            SELECT id, name, email, relationship, emergency_contact, created_at
            FROM parents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(parent)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: &str,
        relationship: Option<&str>,
        emergency_contact: Option<&str>,
    ) -> anyhow::Result<Option<Parent>> {
        let parent = sqlx::query_as::<_, Parent>(
            r#"
            UPDATE parents
            SET name = $2, relationship = $3, emergency_contact = $4
            WHERE id = $1
            RETURNING id, name, email, relationship, emergency_contact, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(relationship)
        .bind(emergency_contact)
        .fetch_optional(db)
        .await?;
        Ok(parent)
    }
}
