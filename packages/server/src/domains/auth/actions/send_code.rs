//! Request verification code action

use anyhow::Result;
use tracing::{error, info};

use crate::domains::auth::machines::validate_phone;
use crate::domains::auth::models::{hash_identifier, VerificationCode};
use crate::domains::auth::types::TEST_PHONE_NUMBER;
use crate::kernel::ServerDeps;

/// Issue a one-time code for a phone number and deliver it over SMS.
///
/// The phone is validated before any database or network work. Issuing a
/// new code retires whatever code was previously outstanding for the phone.
pub async fn request_phone_code(phone_number: String, deps: &ServerDeps) -> Result<()> {
    // Production safety check - test identifier should never be enabled in production
    if deps.test_identifier_enabled && !cfg!(debug_assertions) {
        error!("SECURITY WARNING: TEST_IDENTIFIER_ENABLED is true in production build!");
    }

    validate_phone(&phone_number)?;

    // TEST IDENTIFIER BYPASS: Skip code issuance and delivery for the test phone
    #[cfg(debug_assertions)]
    if deps.test_identifier_enabled && phone_number == TEST_PHONE_NUMBER {
        info!("Test identifier: skipping code delivery for {}", phone_number);
        return Ok(());
    }

    let phone_hash = hash_identifier(&phone_number);
    let code = VerificationCode::issue(&phone_hash, &deps.db_pool).await?;

    deps.sms
        .send_code(&phone_number, &code.code)
        .await
        .map_err(|e| {
            error!("Failed to deliver verification code: {}", e);
            anyhow::anyhow!("No se pudo enviar el código de verificación")
        })?;

    info!("Verification code sent to {}", phone_number);
    Ok(())
}
