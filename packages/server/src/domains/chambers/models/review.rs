use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ChamberId, ReviewId};

/// Client review of a chamber
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: ReviewId,
    pub chamber_id: ChamberId,
    pub reviewer_name: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Create a review and refresh the chamber's rating aggregates in the
    /// same transaction.
    pub async fn create(
        chamber_id: ChamberId,
        reviewer_name: &str,
        rating: i32,
        comment: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self> {
        let mut tx = pool.begin().await?;

        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO chamber_reviews (chamber_id, reviewer_name, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(chamber_id)
        .bind(reviewer_name)
        .bind(rating)
        .bind(comment)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE chambers SET
                rating = (SELECT AVG(rating)::float8 FROM chamber_reviews WHERE chamber_id = $1),
                review_count = (SELECT COUNT(*)::int4 FROM chamber_reviews WHERE chamber_id = $1),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(chamber_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(review)
    }

    /// Reviews for a chamber, newest first
    pub async fn find_by_chamber(chamber_id: ChamberId, pool: &PgPool) -> Result<Vec<Self>> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT * FROM chamber_reviews WHERE chamber_id = $1 ORDER BY created_at DESC",
        )
        .bind(chamber_id)
        .fetch_all(pool)
        .await?;
        Ok(reviews)
    }
}
