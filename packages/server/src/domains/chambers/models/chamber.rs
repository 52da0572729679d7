use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{ChamberId, IdentityId, PaginationDirection, ValidatedPaginationArgs};

/// Chamber status enum for type-safe querying
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChamberStatus {
    PendingReview,
    Approved,
    Rejected,
    Suspended,
}

impl std::fmt::Display for ChamberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChamberStatus::PendingReview => write!(f, "pending_review"),
            ChamberStatus::Approved => write!(f, "approved"),
            ChamberStatus::Rejected => write!(f, "rejected"),
            ChamberStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for ChamberStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending_review" => Ok(ChamberStatus::PendingReview),
            "approved" => Ok(ChamberStatus::Approved),
            "rejected" => Ok(ChamberStatus::Rejected),
            "suspended" => Ok(ChamberStatus::Suspended),
            _ => Err(anyhow::anyhow!("Invalid chamber status: {}", s)),
        }
    }
}

/// Chamber model - service providers in the marketplace directory
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Chamber {
    pub id: ChamberId,

    // Owner
    pub identity_id: Option<Uuid>,

    // Profile
    pub first_name: String,
    pub last_name: String,
    pub dni: Option<String>,
    pub age: Option<i32>,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub profile_photo_url: Option<String>,

    // Services offered
    pub services: Vec<String>,
    pub other_service: Option<String>,

    // Directory placement
    pub featured: bool,
    pub rating: f64,
    pub review_count: i32,

    // Approval workflow
    pub status: String,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,

    // Timestamps
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new chamber profile
#[derive(Debug, Clone)]
pub struct CreateChamber {
    pub identity_id: Option<IdentityId>,
    pub first_name: String,
    pub last_name: String,
    pub dni: Option<String>,
    pub age: Option<i32>,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub profile_photo_url: Option<String>,
    pub services: Vec<String>,
    pub other_service: Option<String>,
}

/// Input for updating a chamber profile
#[derive(Debug, Clone, Default)]
pub struct UpdateChamber {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dni: Option<String>,
    pub age: Option<i32>,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub profile_photo_url: Option<String>,
    pub services: Option<Vec<String>>,
    pub other_service: Option<String>,
}

/// Filters for directory listing
#[derive(Debug, Clone, Default)]
pub struct ChamberFilters {
    /// Only chambers offering this service category
    pub service: Option<String>,
    /// Case-insensitive text search over name and description
    pub search: Option<String>,
    /// Only featured chambers
    pub featured_only: bool,
}

impl Chamber {
    /// Find chamber by ID
    pub async fn find_by_id(id: ChamberId, pool: &PgPool) -> Result<Self> {
        let chamber = sqlx::query_as::<_, Self>("SELECT * FROM chambers WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(chamber)
    }

    /// Find chamber by ID, returning None if not found
    pub async fn find_by_id_optional(id: ChamberId, pool: &PgPool) -> Result<Option<Self>> {
        let chamber = sqlx::query_as::<_, Self>("SELECT * FROM chambers WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(chamber)
    }

    /// Find the chamber owned by an identity
    pub async fn find_by_identity_id(
        identity_id: IdentityId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let chamber = sqlx::query_as::<_, Self>("SELECT * FROM chambers WHERE identity_id = $1")
            .bind(identity_id.as_uuid())
            .fetch_optional(pool)
            .await?;
        Ok(chamber)
    }

    /// Find all chambers with a specific status
    pub async fn find_by_status(status: &str, pool: &PgPool) -> Result<Vec<Self>> {
        let chambers = sqlx::query_as::<_, Self>(
            "SELECT * FROM chambers WHERE status = $1 ORDER BY created_at DESC",
        )
        .bind(status)
        .fetch_all(pool)
        .await?;
        Ok(chambers)
    }

    /// Find all pending chambers (for admin approval queue)
    pub async fn find_pending(pool: &PgPool) -> Result<Vec<Self>> {
        Self::find_by_status("pending_review", pool).await
    }

    /// Search approved chambers with directory filters
    pub async fn find_approved_with_filters(
        filters: &ChamberFilters,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let search_pattern = filters.search.as_ref().map(|s| format!("%{}%", s));
        let chambers = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM chambers
            WHERE status = 'approved'
              AND ($1::text IS NULL OR $1 = ANY(services))
              AND ($2::text IS NULL OR
                   first_name || ' ' || last_name ILIKE $2 OR
                   COALESCE(description, '') ILIKE $2)
              AND (NOT $3 OR featured)
            ORDER BY featured DESC, rating DESC, created_at DESC
            "#,
        )
        .bind(&filters.service)
        .bind(&search_pattern)
        .bind(filters.featured_only)
        .fetch_all(pool)
        .await?;
        Ok(chambers)
    }

    /// Create a new chamber profile (enters the approval queue)
    pub async fn create(input: CreateChamber, pool: &PgPool) -> Result<Self> {
        let chamber = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO chambers (
                identity_id, first_name, last_name, dni, age, phone_number,
                description, profile_photo_url, services, other_service, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending_review')
            RETURNING *
            "#,
        )
        .bind(input.identity_id.map(|id| *id.as_uuid()))
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.dni)
        .bind(input.age)
        .bind(&input.phone_number)
        .bind(&input.description)
        .bind(&input.profile_photo_url)
        .bind(&input.services)
        .bind(&input.other_service)
        .fetch_one(pool)
        .await?;
        Ok(chamber)
    }

    /// Update a chamber profile
    pub async fn update(id: ChamberId, input: UpdateChamber, pool: &PgPool) -> Result<Self> {
        let chamber = sqlx::query_as::<_, Self>(
            r#"
            UPDATE chambers SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                dni = COALESCE($4, dni),
                age = COALESCE($5, age),
                phone_number = COALESCE($6, phone_number),
                description = COALESCE($7, description),
                profile_photo_url = COALESCE($8, profile_photo_url),
                services = COALESCE($9, services),
                other_service = COALESCE($10, other_service),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.dni)
        .bind(input.age)
        .bind(&input.phone_number)
        .bind(&input.description)
        .bind(&input.profile_photo_url)
        .bind(&input.services)
        .bind(&input.other_service)
        .fetch_one(pool)
        .await?;
        Ok(chamber)
    }

    /// Approve a chamber
    pub async fn approve(id: ChamberId, reviewed_by: IdentityId, pool: &PgPool) -> Result<Self> {
        let chamber = sqlx::query_as::<_, Self>(
            r#"
            UPDATE chambers SET
                status = 'approved',
                reviewed_by = $2,
                reviewed_at = NOW(),
                rejection_reason = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reviewed_by.as_uuid())
        .fetch_one(pool)
        .await?;
        Ok(chamber)
    }

    /// Reject a chamber
    pub async fn reject(
        id: ChamberId,
        reviewed_by: IdentityId,
        reason: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let chamber = sqlx::query_as::<_, Self>(
            r#"
            UPDATE chambers SET
                status = 'rejected',
                reviewed_by = $2,
                reviewed_at = NOW(),
                rejection_reason = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reviewed_by.as_uuid())
        .bind(reason)
        .fetch_one(pool)
        .await?;
        Ok(chamber)
    }

    /// Suspend a chamber
    pub async fn suspend(
        id: ChamberId,
        reviewed_by: IdentityId,
        reason: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let chamber = sqlx::query_as::<_, Self>(
            r#"
            UPDATE chambers SET
                status = 'suspended',
                reviewed_by = $2,
                reviewed_at = NOW(),
                rejection_reason = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reviewed_by.as_uuid())
        .bind(reason)
        .fetch_one(pool)
        .await?;
        Ok(chamber)
    }

    /// Set the featured flag
    pub async fn set_featured(id: ChamberId, featured: bool, pool: &PgPool) -> Result<Self> {
        let chamber = sqlx::query_as::<_, Self>(
            "UPDATE chambers SET featured = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(featured)
        .fetch_one(pool)
        .await?;
        Ok(chamber)
    }

    /// Count chambers by status
    pub async fn count_by_status(status: &str, pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chambers WHERE status = $1")
            .bind(status)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // Cursor-Based Pagination (Relay spec)
    // =========================================================================

    /// Find chambers with cursor-based pagination
    pub async fn find_paginated(
        status: Option<&str>,
        args: &ValidatedPaginationArgs,
        pool: &PgPool,
    ) -> Result<(Vec<Self>, bool)> {
        let fetch_limit = args.fetch_limit();

        let results = match args.direction {
            PaginationDirection::Forward => {
                sqlx::query_as::<_, Self>(
                    r#"
                    SELECT * FROM chambers
                    WHERE ($1::text IS NULL OR status = $1)
                      AND ($2::uuid IS NULL OR id > $2)
                    ORDER BY id ASC
                    LIMIT $3
                    "#,
                )
                .bind(status)
                .bind(args.cursor)
                .bind(fetch_limit)
                .fetch_all(pool)
                .await?
            }
            PaginationDirection::Backward => {
                let mut rows = sqlx::query_as::<_, Self>(
                    r#"
                    SELECT * FROM chambers
                    WHERE ($1::text IS NULL OR status = $1)
                      AND ($2::uuid IS NULL OR id < $2)
                    ORDER BY id DESC
                    LIMIT $3
                    "#,
                )
                .bind(status)
                .bind(args.cursor)
                .bind(fetch_limit)
                .fetch_all(pool)
                .await?;

                rows.reverse();
                rows
            }
        };

        let has_more = results.len() > args.limit as usize;
        let results = if has_more {
            results.into_iter().take(args.limit as usize).collect()
        } else {
            results
        };

        Ok((results, has_more))
    }

    /// Count chambers with optional status filter
    pub async fn count_with_filters(status: Option<&str>, pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM chambers WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ChamberStatus::PendingReview,
            ChamberStatus::Approved,
            ChamberStatus::Rejected,
            ChamberStatus::Suspended,
        ] {
            let parsed = ChamberStatus::from_str(&status.to_string()).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_rejects_unknown() {
        assert!(ChamberStatus::from_str("active").is_err());
    }
}
