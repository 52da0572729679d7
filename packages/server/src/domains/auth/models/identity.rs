use anyhow::Result;
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::IdentityId;

/// Identity - an authenticated account (primary credential: email + password)
///
/// Immutable id; created once on successful sign-up. The phone factor is
/// tracked on the user profile, never here.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Identity {
    pub id: IdentityId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Identity {
    /// Find identity by email (case-insensitive)
    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        let identity = sqlx::query_as::<_, Identity>(
            "SELECT * FROM identities WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;
        Ok(identity)
    }

    /// Find identity by ID, returning None if not found
    pub async fn find_by_id_optional(id: IdentityId, pool: &PgPool) -> Result<Option<Self>> {
        let identity = sqlx::query_as::<_, Identity>("SELECT * FROM identities WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(identity)
    }

    /// Create a new identity with an already-hashed password
    pub async fn create(email: &str, password_hash: &str, pool: &PgPool) -> Result<Self> {
        let identity = sqlx::query_as::<_, Identity>(
            r#"
            INSERT INTO identities (email, password_hash)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;
        Ok(identity)
    }

    /// Replace the password hash (used by password reset)
    pub async fn update_password(id: IdentityId, password_hash: &str, pool: &PgPool) -> Result<()> {
        sqlx::query("UPDATE identities SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash.
///
/// Returns false for a wrong password; errors only on a malformed hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Malformed password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Check if an email should be granted admin privileges.
///
/// Case-insensitive match against the configured admin email list.
pub fn is_admin_email(email: &str, admin_emails: &[String]) -> bool {
    admin_emails
        .iter()
        .any(|admin| admin.eq_ignore_ascii_case(email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hash1 = hash_password("secret123").unwrap();
        let hash2 = hash_password("secret123").unwrap();
        assert_ne!(hash1, hash2, "Same password should produce different hashes");
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_is_admin_email_case_insensitive() {
        let admin_emails = vec!["Admin@Chambier.com".to_string()];

        assert!(is_admin_email("admin@chambier.com", &admin_emails));
        assert!(is_admin_email("ADMIN@CHAMBIER.COM", &admin_emails));
        assert!(!is_admin_email("user@chambier.com", &admin_emails));
    }

    #[test]
    fn test_is_admin_email_empty_list() {
        assert!(!is_admin_email("admin@chambier.com", &[]));
    }
}
