use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::common::CodeId;

/// How long an issued code stays valid.
pub const CODE_TTL_MINUTES: i64 = 10;

/// One-time verification code for a phone number.
///
/// The phone number is stored as a SHA256 hash; raw identifiers are never
/// used as lookup keys. At most one unused, unexpired code exists per phone:
/// issuing a new code burns any previous active one.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VerificationCode {
    pub id: CodeId,
    pub phone_hash: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
}

/// Outcome of checking a submitted code against the active one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeCheck {
    /// Code matched; it has been marked used and will not validate again.
    Valid,
    /// No active code for this phone, or the code didn't match.
    Invalid,
    /// The active code matched but its TTL has elapsed.
    Expired,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl VerificationCode {
    /// Issue a fresh code for a phone, retiring any previous active code.
    ///
    /// Returns the stored row; the caller is responsible for delivery.
    pub async fn issue(phone_hash: &str, pool: &PgPool) -> Result<Self> {
        let code = generate_code();
        let expires_at = Utc::now() + Duration::minutes(CODE_TTL_MINUTES);

        let mut tx = pool.begin().await?;

        // Single-active-code invariant: burn whatever was outstanding.
        sqlx::query(
            "UPDATE phone_verification_codes SET used = TRUE WHERE phone_hash = $1 AND used = FALSE",
        )
        .bind(phone_hash)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, VerificationCode>(
            r#"
            INSERT INTO phone_verification_codes (phone_hash, code, expires_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(phone_hash)
        .bind(&code)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Check a submitted code against the active code for a phone.
    ///
    /// A matching code is marked used in the same statement, so a code can
    /// only ever validate once.
    pub async fn check(phone_hash: &str, code: &str, pool: &PgPool) -> Result<CodeCheck> {
        let active = sqlx::query_as::<_, VerificationCode>(
            r#"
            SELECT * FROM phone_verification_codes
            WHERE phone_hash = $1 AND used = FALSE
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(phone_hash)
        .fetch_optional(pool)
        .await?;

        let Some(active) = active else {
            return Ok(CodeCheck::Invalid);
        };

        if active.code != code {
            return Ok(CodeCheck::Invalid);
        }

        if active.expires_at < Utc::now() {
            return Ok(CodeCheck::Expired);
        }

        sqlx::query("UPDATE phone_verification_codes SET used = TRUE WHERE id = $1")
            .bind(active.id)
            .execute(pool)
            .await?;

        Ok(CodeCheck::Valid)
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Generate a random 6-digit verification code.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

/// Hash an identifier (phone number or email) using SHA256
///
/// Identifiers are hashed for privacy - we never store raw identifiers
/// as lookup keys.
pub fn hash_identifier(identifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identifier.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.chars().next(), Some('0'), "No leading zeros");
        }
    }

    #[test]
    fn test_hash_identifier_consistency() {
        let hash1 = hash_identifier("+51987654321");
        let hash2 = hash_identifier("+51987654321");
        assert_eq!(hash1, hash2, "Same phone should produce same hash");
    }

    #[test]
    fn test_hash_identifier_uniqueness() {
        let hash1 = hash_identifier("+51987654321");
        let hash2 = hash_identifier("+51912345678");
        assert_ne!(
            hash1, hash2,
            "Different phones should have different hashes"
        );
    }

    #[test]
    fn test_hash_identifier_format() {
        let hash = hash_identifier("+51987654321");
        assert_eq!(hash.len(), 64, "SHA256 hash should be 64 hex characters");
        assert!(
            hash.chars().all(|c| c.is_ascii_hexdigit()),
            "Hash should only contain hex digits"
        );
    }

    #[test]
    fn test_email_hash_works() {
        // Function works for emails too, not just phones
        let hash1 = hash_identifier("user@example.com");
        let hash2 = hash_identifier("user@example.com");
        assert_eq!(hash1, hash2, "Same email should produce same hash");
    }
}
