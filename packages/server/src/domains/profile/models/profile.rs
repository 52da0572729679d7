use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::IdentityId;

/// UserProfile - per-identity profile record
///
/// Shares its primary key with the identity. Created lazily on first use.
/// `phone_number` is set exactly once by the account linking operation and
/// is unique across all profiles (enforced by a partial unique index on
/// `phone_hash`).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: IdentityId,
    pub email: String,
    pub phone_number: Option<String>,
    pub phone_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl UserProfile {
    /// Find profile by identity ID
    pub async fn find_by_id_optional(id: IdentityId, pool: &PgPool) -> Result<Option<Self>> {
        let profile = sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(profile)
    }

    /// Find the profile a phone is linked to, by identifier hash
    pub async fn find_by_phone_hash(phone_hash: &str, pool: &PgPool) -> Result<Option<Self>> {
        let profile =
            sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE phone_hash = $1")
                .bind(phone_hash)
                .fetch_optional(pool)
                .await?;
        Ok(profile)
    }

    /// Get the profile for an identity, creating the row if it doesn't exist yet
    pub async fn get_or_create(id: IdentityId, email: &str, pool: &PgPool) -> Result<Self> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles (id, email)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(email)
        .fetch_one(pool)
        .await?;
        Ok(profile)
    }

    /// Set the phone number on a profile that doesn't have one yet.
    ///
    /// Returns false if the profile already carries a phone number; the
    /// existing link is never overwritten.
    pub async fn set_phone(
        id: IdentityId,
        phone_number: &str,
        phone_hash: &str,
        pool: &PgPool,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE user_profiles
            SET phone_number = $2, phone_hash = $3, updated_at = NOW()
            WHERE id = $1 AND phone_number IS NULL
            "#,
        )
        .bind(id)
        .bind(phone_number)
        .bind(phone_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
