use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ChamberId, PortfolioItemId};

/// Work sample attached to a chamber profile
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PortfolioItem {
    pub id: PortfolioItemId,
    pub chamber_id: ChamberId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PortfolioItem {
    pub async fn create(
        chamber_id: ChamberId,
        title: &str,
        description: Option<&str>,
        image_url: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self> {
        let item = sqlx::query_as::<_, PortfolioItem>(
            r#"
            INSERT INTO chamber_portfolio (chamber_id, title, description, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(chamber_id)
        .bind(title)
        .bind(description)
        .bind(image_url)
        .fetch_one(pool)
        .await?;
        Ok(item)
    }

    pub async fn find_by_id_optional(
        id: PortfolioItemId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let item = sqlx::query_as::<_, PortfolioItem>(
            "SELECT * FROM chamber_portfolio WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(item)
    }

    pub async fn find_by_chamber(chamber_id: ChamberId, pool: &PgPool) -> Result<Vec<Self>> {
        let items = sqlx::query_as::<_, PortfolioItem>(
            "SELECT * FROM chamber_portfolio WHERE chamber_id = $1 ORDER BY created_at ASC",
        )
        .bind(chamber_id)
        .fetch_all(pool)
        .await?;
        Ok(items)
    }

    pub async fn delete(id: PortfolioItemId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM chamber_portfolio WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
