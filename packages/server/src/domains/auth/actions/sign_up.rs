//! Email sign-up action

use anyhow::{bail, Result};
use tracing::info;

use crate::domains::auth::machines::validate_password;
use crate::domains::auth::models::{hash_password, is_admin_email, Identity};
use crate::domains::auth::types::AuthSession;
use crate::kernel::ServerDeps;

/// Register a new identity with email + password.
///
/// Password confirmation and minimum length are checked before any database
/// work. The session token is minted immediately; the phone factor is
/// verified and linked afterwards by the signup flow.
pub async fn sign_up_with_email(
    email: String,
    password: String,
    password_confirmation: String,
    deps: &ServerDeps,
) -> Result<AuthSession> {
    let email = email.trim().to_string();
    if !email.contains('@') {
        bail!("Introduce un correo electrónico válido");
    }
    validate_password(&password, &password_confirmation)?;

    if Identity::find_by_email(&email, &deps.db_pool).await?.is_some() {
        bail!("Ya existe una cuenta con este correo electrónico");
    }

    let password_hash = hash_password(&password)?;
    let identity = Identity::create(&email, &password_hash, &deps.db_pool).await?;

    let is_admin = is_admin_email(&identity.email, &deps.admin_emails);
    let token = deps
        .jwt_service
        .create_token(identity.id.into_uuid(), identity.email.clone(), is_admin)?;

    info!(identity_id = %identity.id, "Identity registered");

    Ok(AuthSession {
        identity_id: identity.id,
        token,
        is_admin,
    })
}
