//! Verify phone code action

use anyhow::Result;
use tracing::info;

use crate::common::IdentityId;
use crate::domains::auth::machines::{validate_code, validate_phone};
use crate::domains::auth::models::{hash_identifier, CodeCheck, VerificationCode};
use crate::domains::auth::types::{TEST_PHONE_CODE, TEST_PHONE_NUMBER};
use crate::domains::profile::models::UserProfile;
use crate::kernel::ServerDeps;

/// Result of verifying a phone code
#[derive(Debug)]
pub enum VerifyCodeResult {
    /// Code matched. `matched_identity_id` is the identity the phone is
    /// already linked to, or None if no account holds this phone yet.
    Verified {
        matched_identity_id: Option<IdentityId>,
    },
    /// Code invalid or expired; the caller stays on the code screen.
    Failed { reason: String },
}

/// Check a submitted code for a phone number.
///
/// Format validation (6 ASCII digits, plausible phone) runs before any
/// lookup. A matching code is consumed and never validates again.
pub async fn verify_phone_code(
    phone_number: String,
    code: String,
    deps: &ServerDeps,
) -> Result<VerifyCodeResult> {
    validate_phone(&phone_number)?;
    validate_code(&code)?;

    // TEST IDENTIFIER BYPASS: Only available in debug builds (development)
    #[cfg(debug_assertions)]
    if deps.test_identifier_enabled
        && phone_number == TEST_PHONE_NUMBER
        && code == TEST_PHONE_CODE
    {
        info!("Test identifier bypass activated for {}", phone_number);
        let phone_hash = hash_identifier(&phone_number);
        let matched = UserProfile::find_by_phone_hash(&phone_hash, &deps.db_pool)
            .await?
            .map(|p| p.id);
        return Ok(VerifyCodeResult::Verified {
            matched_identity_id: matched,
        });
    }

    let phone_hash = hash_identifier(&phone_number);
    match VerificationCode::check(&phone_hash, &code, &deps.db_pool).await? {
        CodeCheck::Valid => {
            let matched = UserProfile::find_by_phone_hash(&phone_hash, &deps.db_pool)
                .await?
                .map(|p| p.id);
            info!(
                matched = matched.is_some(),
                "Phone verified: {}", phone_number
            );
            Ok(VerifyCodeResult::Verified {
                matched_identity_id: matched,
            })
        }
        CodeCheck::Invalid => Ok(VerifyCodeResult::Failed {
            reason: "Código inválido".to_string(),
        }),
        CodeCheck::Expired => Ok(VerifyCodeResult::Failed {
            reason: "Código expirado".to_string(),
        }),
    }
}
