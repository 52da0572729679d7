//! Password reset actions
//!
//! Reset requests are verified through the linked phone: the reset code is
//! delivered by SMS to the number already tied to the account. Accounts
//! without a linked phone simply receive nothing.

use anyhow::{bail, Result};
use tracing::info;

use crate::domains::auth::machines::{validate_code, validate_password};
use crate::domains::auth::models::{
    hash_identifier, hash_password, CodeCheck, Identity, VerificationCode,
};
use crate::domains::profile::models::UserProfile;
use crate::kernel::ServerDeps;

/// Start a password reset for an email.
///
/// Always reports success so the endpoint can't be used to probe which
/// emails are registered.
pub async fn request_password_reset(email: String, deps: &ServerDeps) -> Result<()> {
    let Some(identity) = Identity::find_by_email(email.trim(), &deps.db_pool).await? else {
        info!("Password reset requested for unknown email");
        return Ok(());
    };

    let phone = UserProfile::find_by_id_optional(identity.id, &deps.db_pool)
        .await?
        .and_then(|p| p.phone_number);

    let Some(phone) = phone else {
        info!(identity_id = %identity.id, "Password reset requested but no phone linked");
        return Ok(());
    };

    let phone_hash = hash_identifier(&phone);
    let code = VerificationCode::issue(&phone_hash, &deps.db_pool).await?;
    deps.sms.send_code(&phone, &code.code).await?;

    info!(identity_id = %identity.id, "Password reset code sent");
    Ok(())
}

/// Complete a password reset with the code delivered to the linked phone.
pub async fn reset_password(
    email: String,
    code: String,
    new_password: String,
    deps: &ServerDeps,
) -> Result<()> {
    validate_code(&code)?;
    validate_password(&new_password, &new_password)?;

    // Unknown email, missing phone and wrong code all collapse into the
    // same message; the caller learns nothing about the account.
    let invalid = || anyhow::anyhow!("Código inválido o expirado");

    let identity = Identity::find_by_email(email.trim(), &deps.db_pool)
        .await?
        .ok_or_else(invalid)?;

    let phone = UserProfile::find_by_id_optional(identity.id, &deps.db_pool)
        .await?
        .and_then(|p| p.phone_number)
        .ok_or_else(invalid)?;

    let phone_hash = hash_identifier(&phone);
    match VerificationCode::check(&phone_hash, &code, &deps.db_pool).await? {
        CodeCheck::Valid => {
            let password_hash = hash_password(&new_password)?;
            Identity::update_password(identity.id, &password_hash, &deps.db_pool).await?;
            info!(identity_id = %identity.id, "Password reset completed");
            Ok(())
        }
        CodeCheck::Invalid | CodeCheck::Expired => bail!("Código inválido o expirado"),
    }
}
